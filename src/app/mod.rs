//! Application instance and the extensions attached to it at startup.
//!
//! An [`App`] starts empty. [`register_plugins`] attaches the router, the
//! state store, notifications and the query client, in that order, and is
//! called once by the entry point. Any failure is fatal to startup.

mod notifications;
mod query;
mod router;
mod store;

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

pub use notifications::{Notification, NotificationLevel, Notifications};
pub use query::{QueryClient, QueryPlugin, QueryPluginOptions};
pub use router::{Route, Router};
pub use store::Store;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    #[error("plugin '{0}' is already installed")]
    AlreadyInstalled(&'static str),

    #[error("plugin '{plugin}' requires '{dependency}' to be installed first")]
    MissingDependency {
        plugin: &'static str,
        dependency: &'static str,
    },

    #[error("plugin '{plugin}' failed to install: {reason}")]
    Install { plugin: &'static str, reason: String },
}

/// An extension that can be attached to an [`App`].
pub trait Plugin: Sized {
    const NAME: &'static str;

    type Options: Default;

    /// Plugins that must already be installed.
    fn requires(&self) -> &'static [&'static str] {
        &[]
    }

    fn install(self, app: &mut App, options: Self::Options) -> Result<(), PluginError>;
}

/// The running application: a type-keyed set of extensions plus the names
/// of installed plugins in installation order.
pub struct App {
    name: String,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    installed: Vec<&'static str>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: HashMap::new(),
            installed: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn use_plugin<P: Plugin>(&mut self, plugin: P) -> Result<&mut Self, PluginError> {
        self.use_plugin_with(plugin, P::Options::default())
    }

    pub fn use_plugin_with<P: Plugin>(
        &mut self,
        plugin: P,
        options: P::Options,
    ) -> Result<&mut Self, PluginError> {
        if self.is_installed(P::NAME) {
            return Err(PluginError::AlreadyInstalled(P::NAME));
        }

        if let Some(dependency) = plugin
            .requires()
            .iter()
            .copied()
            .find(|dep| !self.is_installed(dep))
        {
            return Err(PluginError::MissingDependency {
                plugin: P::NAME,
                dependency,
            });
        }

        plugin.install(self, options)?;
        self.installed.push(P::NAME);
        tracing::debug!(app = %self.name, plugin = P::NAME, "Plugin installed");
        Ok(self)
    }

    /// Make `value` reachable through [`App::extension`]. Returns the value
    /// it replaced, if any.
    pub fn provide<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.extensions
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
            .map(|previous| *previous)
    }

    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn installed_plugins(&self) -> &[&'static str] {
        &self.installed
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.iter().any(|installed| *installed == name)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("installed", &self.installed)
            .finish_non_exhaustive()
    }
}

/// Attach the standard extensions: router, store, notifications, query.
pub fn register_plugins(app: &mut App, query: QueryPluginOptions) -> Result<(), PluginError> {
    app.use_plugin(Router::settings())?
        .use_plugin(Store::new())?
        .use_plugin(Notifications::default())?
        .use_plugin_with(QueryPlugin, query)?;

    tracing::info!(app = %app.name(), plugins = ?app.installed_plugins(), "Plugins registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(&'static str);

    impl Plugin for Marker {
        const NAME: &'static str = "marker";
        type Options = ();

        fn install(self, app: &mut App, _options: ()) -> Result<(), PluginError> {
            app.provide(self.0.to_string());
            Ok(())
        }
    }

    struct NeedsRouter;

    impl Plugin for NeedsRouter {
        const NAME: &'static str = "needs-router";
        type Options = ();

        fn requires(&self) -> &'static [&'static str] {
            &["router"]
        }

        fn install(self, _app: &mut App, _options: ()) -> Result<(), PluginError> {
            Ok(())
        }
    }

    struct Broken;

    impl Plugin for Broken {
        const NAME: &'static str = "broken";
        type Options = ();

        fn install(self, _app: &mut App, _options: ()) -> Result<(), PluginError> {
            Err(PluginError::Install {
                plugin: Self::NAME,
                reason: "device busy".into(),
            })
        }
    }

    #[test]
    fn registers_four_plugins_in_order() {
        let mut app = App::new("raybot");
        register_plugins(&mut app, QueryPluginOptions::default()).unwrap();

        assert_eq!(
            app.installed_plugins(),
            &["router", "store", "notifications", "query"]
        );
        assert!(app.extension::<Router>().is_some());
        assert!(app.extension::<Store>().is_some());
        assert!(app.extension::<Notifications>().is_some());
        assert!(app.extension::<QueryClient>().is_some());
    }

    #[test]
    fn query_client_receives_supplied_options() {
        let mut app = App::new("raybot");
        let options = QueryPluginOptions {
            stale_time_secs: 30,
            retry: 2,
        };
        register_plugins(&mut app, options.clone()).unwrap();

        let client = app.extension::<QueryClient>().unwrap();
        assert_eq!(client.options(), &options);
    }

    #[test]
    fn registering_twice_fails() {
        let mut app = App::new("raybot");
        register_plugins(&mut app, QueryPluginOptions::default()).unwrap();

        let err = register_plugins(&mut app, QueryPluginOptions::default()).unwrap_err();
        assert_eq!(err, PluginError::AlreadyInstalled("router"));
    }

    #[test]
    fn missing_dependency_is_reported() {
        let mut app = App::new("raybot");
        let err = app.use_plugin(NeedsRouter).unwrap_err();
        assert_eq!(
            err,
            PluginError::MissingDependency {
                plugin: "needs-router",
                dependency: "router",
            }
        );
        assert!(app.installed_plugins().is_empty());
    }

    #[test]
    fn extensions_that_assume_routing_need_the_router_first() {
        let mut app = App::new("raybot");
        let err = app.use_plugin(Store::new()).unwrap_err();
        assert!(matches!(
            err,
            PluginError::MissingDependency {
                plugin: "store",
                dependency: "router"
            }
        ));
    }

    #[test]
    fn failed_install_is_not_recorded() {
        let mut app = App::new("raybot");
        let err = app.use_plugin(Broken).unwrap_err();
        assert!(err.to_string().contains("device busy"));
        assert!(!app.is_installed("broken"));
    }

    #[test]
    fn provide_replaces_and_returns_previous_value() {
        let mut app = App::new("raybot");
        app.use_plugin(Marker("first")).unwrap();

        let previous = app.provide("second".to_string());
        assert_eq!(previous.as_deref(), Some("first"));
        assert_eq!(app.extension::<String>().map(String::as_str), Some("second"));
        assert!(app.extension::<u32>().is_none());
    }

    #[test]
    fn chained_registration_stops_at_first_failure() {
        let mut app = App::new("raybot");
        let failed = app
            .use_plugin(Marker("a"))
            .and_then(|app| app.use_plugin(Broken))
            .and_then(|app| app.use_plugin(Router::settings()))
            .is_err();

        assert!(failed);
        assert_eq!(app.installed_plugins(), &["marker"]);
    }
}
