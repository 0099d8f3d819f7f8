// Each domain contains: mod.rs, resolvers.rs, types.rs

pub mod aplicacoes;
pub mod equipamentos;
pub mod geo_trajetorias;
pub mod system;
pub mod talhoes;
pub mod tipos_aplicacao;
