//! SQLite persistence for players, sessions and matches.

pub mod connection;
pub mod setup;
pub mod store;

pub use connection::{create_memory_pool, create_pool, get_connection, ping, DbConn, DbPool};
pub use setup::init_schema;
pub use store::{load, save};
