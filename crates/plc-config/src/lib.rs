pub mod config;
pub mod error;
pub mod templates;

pub use config::{Config, SpellingMode};
pub use error::ConfigError;
