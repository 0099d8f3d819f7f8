use async_graphql::MergedObject;

use crate::gql::domains::aplicacoes::AplicacaoMutation;
use crate::gql::domains::equipamentos::EquipamentoMutation;
use crate::gql::domains::geo_trajetorias::GeoTrajetoriaMutation;
use crate::gql::domains::talhoes::TalhaoMutation;
use crate::gql::domains::tipos_aplicacao::TipoAplicacaoMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AplicacaoMutation,
    EquipamentoMutation,
    GeoTrajetoriaMutation,
    TalhaoMutation,
    TipoAplicacaoMutation,
);
