mod hashmap_user_store;
mod postgres_user_store;

pub use hashmap_user_store::*;
pub use postgres_user_store::*;
