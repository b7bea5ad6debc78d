mod models;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use schema::CREDITS_VERSIONED_SCHEMAS;
pub use store::SqliteCreditsStore;
pub use trait_def::CreditsStore;
