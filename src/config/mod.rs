pub mod settings;

pub use settings::{Config, ConfigError, GitConfig, LogConfig};
