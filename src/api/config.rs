//! Typed read/replace operations for each configuration domain.
//!
//! Every operation is exactly one request through the shared [`HttpClient`].
//! Errors come back as the transport's own error type, unchanged.

use std::sync::Arc;

use crate::http::HttpClient;
use crate::types::{
    CloudConfig, CommandConfig, ConfigResource, HardwareConfig, HttpConfig, LogConfig, WifiConfig,
};

#[derive(Debug)]
pub struct ConfigApi<C> {
    http: Arc<C>,
}

impl<C> Clone for ConfigApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<C: HttpClient> ConfigApi<C> {
    pub fn new(http: C) -> Self {
        Self::from_shared(Arc::new(http))
    }

    pub fn from_shared(http: Arc<C>) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// GET the whole record of `R`'s domain.
    pub async fn get<R: ConfigResource>(&self) -> Result<R, C::Error> {
        self.http.get(R::DOMAIN.path()).await
    }

    /// PUT `config` as the new record of `R`'s domain, replacing the old one.
    pub async fn update<R: ConfigResource>(&self, config: &R) -> Result<(), C::Error> {
        self.http.put(R::DOMAIN.path(), config).await
    }
}

macro_rules! config_endpoints {
    ($($get:ident, $update:ident => $record:ty;)*) => {
        impl<C: HttpClient> ConfigApi<C> {
            $(
                #[doc = concat!("Read the current [`", stringify!($record), "`].")]
                pub async fn $get(&self) -> Result<$record, C::Error> {
                    self.get::<$record>().await
                }

                #[doc = concat!("Replace the stored [`", stringify!($record), "`].")]
                pub async fn $update(&self, config: &$record) -> Result<(), C::Error> {
                    self.update(config).await
                }
            )*
        }
    };
}

config_endpoints! {
    get_log_config, update_log_config => LogConfig;
    get_hardware_config, update_hardware_config => HardwareConfig;
    get_cloud_config, update_cloud_config => CloudConfig;
    get_http_config, update_http_config => HttpConfig;
    get_wifi_config, update_wifi_config => WifiConfig;
    get_command_config, update_command_config => CommandConfig;
}
