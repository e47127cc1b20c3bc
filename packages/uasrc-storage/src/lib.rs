pub mod db;
pub mod document;
pub mod filter;
pub mod postgres;
pub mod schema;
pub mod store;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
