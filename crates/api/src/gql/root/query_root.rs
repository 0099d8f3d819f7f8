use async_graphql::MergedObject;

use crate::gql::domains::aplicacoes::AplicacaoQuery;
use crate::gql::domains::equipamentos::EquipamentoQuery;
use crate::gql::domains::geo_trajetorias::GeoTrajetoriaQuery;
use crate::gql::domains::system::SystemQuery;
use crate::gql::domains::talhoes::TalhaoQuery;
use crate::gql::domains::tipos_aplicacao::TipoAplicacaoQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    AplicacaoQuery,
    EquipamentoQuery,
    GeoTrajetoriaQuery,
    SystemQuery,
    TalhaoQuery,
    TipoAplicacaoQuery,
);
