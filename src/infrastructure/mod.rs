pub mod config;
pub mod external;

pub use config::AppConfig;
