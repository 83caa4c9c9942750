pub mod delete;
pub mod query;
pub mod upsert;

pub use delete::*;
pub use query::*;
pub use upsert::*;
