pub mod query_builder;
pub mod user_service;

pub use query_builder::*;
