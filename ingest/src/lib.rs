pub mod models;
pub mod schema;

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod runner;
pub mod skiplog;
pub mod store;

pub use error::{IngestError, Result};
