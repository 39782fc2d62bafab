//! Database connection utilities

pub use sea_orm;
mod connection;

pub use connection::{connect_options, establish_connection, DbConnection};
