pub mod common;
pub mod domains;
pub mod error;
pub mod input;
pub mod root;
pub mod scalars;
pub mod schema;

pub use root::{MutationRoot, QueryRoot};
pub use schema::{build_schema, AppSchema};
