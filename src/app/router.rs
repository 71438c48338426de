use crate::types::ConfigDomain;

use super::{App, Plugin, PluginError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: String,
    pub path: String,
}

/// Ordered table of named routes.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// One settings page per configuration domain.
    pub fn settings() -> Self {
        ConfigDomain::ALL.into_iter().fold(Self::new(), |router, domain| {
            router.route(
                format!("settings/{}", domain.name()),
                format!("/settings/{}", domain.name()),
            )
        })
    }

    /// Add a route. A route with the same name is replaced in place.
    pub fn route(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        let route = Route {
            name: name.into(),
            path: normalize(&path.into()),
        };
        match self.routes.iter_mut().find(|r| r.name == route.name) {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = normalize(path);
        self.routes.iter().find(|r| r.path == path)
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

impl Plugin for Router {
    const NAME: &'static str = "router";
    type Options = ();

    fn install(self, app: &mut App, _options: ()) -> Result<(), PluginError> {
        if self.routes.is_empty() {
            return Err(PluginError::Install {
                plugin: Self::NAME,
                reason: "no routes registered".into(),
            });
        }
        tracing::trace!(routes = self.routes.len(), "Installing router");
        app.provide(self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_has_one_route_per_domain() {
        let router = Router::settings();
        assert_eq!(router.routes().len(), ConfigDomain::ALL.len());
        assert_eq!(
            router.by_name("settings/wifi").map(|r| r.path.as_str()),
            Some("/settings/wifi")
        );
    }

    #[test]
    fn resolve_ignores_trailing_slash_and_missing_leading_slash() {
        let router = Router::new().route("home", "/");
        let router = router.route("logs", "logs/");
        assert_eq!(router.resolve("/logs").map(|r| r.name.as_str()), Some("logs"));
        assert_eq!(router.resolve("logs/").map(|r| r.name.as_str()), Some("logs"));
        assert!(router.resolve("/missing").is_none());
    }

    #[test]
    fn same_name_replaces_route_in_place() {
        let router = Router::new()
            .route("a", "/a")
            .route("b", "/b")
            .route("a", "/alpha");
        let names: Vec<_> = router.routes().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(names, vec!["/alpha", "/b"]);
    }

    #[test]
    fn empty_router_refuses_to_install() {
        let mut app = App::new("raybot");
        let err = app.use_plugin(Router::new()).unwrap_err();
        assert!(matches!(err, PluginError::Install { plugin: "router", .. }));
    }
}
