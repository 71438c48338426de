pub mod api;
pub mod app;
pub mod completions;
pub mod edit;
pub mod error;
pub mod http;
pub mod logging;
pub mod settings;
pub mod types;

pub use api::ConfigApi;
pub use app::{register_plugins, App};
pub use error::{CliError, Result};
pub use http::{HttpClient, HttpError, ReqwestHttpClient};
pub use settings::Settings;
