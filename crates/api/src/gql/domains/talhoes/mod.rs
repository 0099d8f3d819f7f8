pub mod resolvers;
pub mod types;

pub use resolvers::{TalhaoMutation, TalhaoQuery};
