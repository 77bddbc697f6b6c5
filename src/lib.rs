pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod store;
pub mod summary;
#[cfg(test)]
mod test;
mod utils;

pub use backup::Backup;
pub use config::{Backend, Config};
pub use error::Error;
pub use error::Result;
