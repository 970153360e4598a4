// Postgres storage layer with sqlx
//
// models: typed row structs mapped straight off the wire (FromRow)
// repositories: the Database handle and one method per query the API issues

pub mod models;
pub mod repositories;

pub use models::*;
pub use repositories::Database;
