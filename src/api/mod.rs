pub mod config;

pub use config::ConfigApi;
