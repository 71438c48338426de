pub(crate) mod completions;
pub(crate) mod config;
pub(crate) mod settings;
