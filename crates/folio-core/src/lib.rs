pub mod config;
pub mod types;

pub use config::FolioConfig;
pub use types::*;
