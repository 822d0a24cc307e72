//! Router core module - hot path for request routing and reverse routing.

use arc_swap::ArcSwap;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::reverse::{reverse, ActionDefinition};
use crate::config::{RouterConfig, METHOD_OVERRIDE_HEADER};
use crate::error::{ConfigError, RouteError, TreeError};
use crate::pathtree::PathTree;
use crate::registry::ActionRegistry;
use crate::routes::{parse_routes, parse_routes_file, Route, NOT_FOUND_ACTION};

/// Result of matching a request against the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// `Controller.Method` that should handle the request, or `404` for a
    /// route that deliberately answers not-found.
    pub action: String,
    /// e.g. `Application`; wildcards in the declared action already resolved.
    pub controller_name: String,
    /// e.g. `ShowApp`
    pub method_name: String,
    /// Positional arguments declared with the route.
    pub fixed_params: Vec<String>,
    /// Captured wildcards, e.g. `{id: ["123"]}`.
    pub params: HashMap<String, Vec<String>>,
}

impl RouteMatch {
    /// The outcome for a route declared with the `404` action.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            action: NOT_FOUND_ACTION.to_string(),
            controller_name: String::new(),
            method_name: String::new(),
            fixed_params: Vec::new(),
            params: HashMap::new(),
        }
    }

    /// Whether the matched route deliberately answers 404.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.action == NOT_FOUND_ACTION
    }

    /// First value captured for a wildcard.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Resolve a controller or method name, substituting `:name` from the
/// captured wildcards.
fn resolve_name(name: &str, params: &HashMap<String, Vec<String>>) -> Option<String> {
    match name.strip_prefix(':') {
        Some(wildcard) => params.get(wildcard).and_then(|values| values.first()).cloned(),
        None => Some(name.to_string()),
    }
}

fn insert_route(tree: &mut PathTree<Arc<Route>>, route: &Arc<Route>) -> Result<(), TreeError> {
    tree.add(&route.tree_path(), Arc::clone(route))?;
    // GET routes also answer HEAD.
    if route.method == "GET" {
        tree.add(&format!("/HEAD{}", route.path), Arc::clone(route))?;
    }
    Ok(())
}

/// An immutable, fully built routing table: the declared routes in order and
/// the path tree built from them.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<Route>>,
    tree: PathTree<Arc<Route>>,
}

impl RouteTable {
    /// Build the path tree for `routes`.
    ///
    /// Each route is keyed by `/<METHOD><path>`; every `GET` route is also
    /// inserted under `/HEAD<path>`.
    pub fn new(routes: Vec<Route>) -> Result<Self, ConfigError> {
        let routes: Vec<Arc<Route>> = routes.into_iter().map(Arc::new).collect();
        let mut tree = PathTree::new();

        for route in &routes {
            insert_route(&mut tree, route).map_err(|err| {
                ConfigError::route(
                    &RouteError::Tree(err),
                    route.routes_path.as_deref(),
                    route.line,
                )
            })?;
        }

        info!(
            routes_count = routes.len(),
            tree_entries = tree.len(),
            "Routing table built"
        );

        Ok(Self { routes, tree })
    }

    /// Parse route file content and build its table.
    pub fn parse(
        content: &str,
        routes_path: Option<&Path>,
        config: &RouterConfig,
        registry: &dyn ActionRegistry,
    ) -> Result<Self, ConfigError> {
        let routes = parse_routes(content, routes_path, &config.app_root, registry)?;
        Self::new(routes).map_err(|err| err.with_source(content))
    }

    /// Read `config.routes_path` and build its table.
    pub fn load(config: &RouterConfig, registry: &dyn ActionRegistry) -> Result<Self, ConfigError> {
        let (routes, content) =
            parse_routes_file(&config.routes_path, &config.app_root, registry)?;
        Self::new(routes).map_err(|err| err.with_source(&content))
    }

    /// Declared routes, in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Match an already-resolved method and a path.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - a route matched; check
    ///   [`RouteMatch::is_not_found`] for routes declared with `404`
    /// * `None` - no route matches
    #[must_use]
    pub fn route(&self, method: &str, path: &str) -> Option<RouteMatch> {
        let key = format!("/{method}{path}");
        let Some((leaf, expansions)) = self.tree.find(&key) else {
            debug!(method, path, outcome = "no_route", "No route matched");
            return None;
        };
        let route = &leaf.value;

        if route.is_not_found() {
            debug!(
                method,
                path,
                outcome = "declared_404",
                line = route.line,
                "Route declares 404"
            );
            return Some(RouteMatch::not_found());
        }

        let params: HashMap<String, Vec<String>> = leaf
            .wildcards
            .iter()
            .cloned()
            .zip(expansions.into_iter().map(|value| vec![value]))
            .collect();

        let (Some(controller_name), Some(method_name)) = (
            resolve_name(&route.controller_name, &params),
            resolve_name(&route.method_name, &params),
        ) else {
            warn!(
                method,
                path,
                action = %route.action,
                line = route.line,
                "Action wildcard not captured by the route path"
            );
            return None;
        };

        debug!(
            method,
            path,
            controller = %controller_name,
            action_method = %method_name,
            params = ?params,
            "Route matched"
        );

        Some(RouteMatch {
            action: format!("{controller_name}.{method_name}"),
            controller_name,
            method_name,
            fixed_params: route.fixed_params.clone(),
            params,
        })
    }

    /// Generate a URL for `action` from the first declared route that can
    /// produce it. See [`ActionDefinition`].
    #[must_use]
    pub fn reverse(&self, action: &str, args: &HashMap<String, String>) -> Option<ActionDefinition> {
        reverse(&self.routes, action, args)
    }

    /// Write the declared routes, one per line.
    pub fn dump_routes(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "[routes] count={}", self.routes.len())?;
        for route in &self.routes {
            if route.fixed_params.is_empty() {
                writeln!(out, "[route] {} {} -> {}", route.method, route.path, route.action)?;
            } else {
                writeln!(
                    out,
                    "[route] {} {} -> {}({})",
                    route.method,
                    route.path,
                    route.action,
                    route.fixed_params.join(", ")
                )?;
            }
        }
        Ok(())
    }
}

/// Owns the currently published [`RouteTable`].
///
/// Reads go through an `ArcSwap`, so [`route`](Self::route) and
/// [`reverse`](Self::reverse) take no locks and may run from any number of
/// threads while a [`refresh`](Self::refresh) builds a replacement. A table is
/// only published once it has been built completely.
pub struct Router {
    table: ArcSwap<RouteTable>,
    config: RouterConfig,
    registry: Arc<dyn ActionRegistry>,
}

impl Router {
    /// A router with an empty table. Call [`refresh`](Self::refresh) to load
    /// the route file.
    #[must_use]
    pub fn new(config: RouterConfig, registry: Arc<dyn ActionRegistry>) -> Self {
        Self::with_table(RouteTable::default(), config, registry)
    }

    #[must_use]
    pub fn with_table(
        table: RouteTable,
        config: RouterConfig,
        registry: Arc<dyn ActionRegistry>,
    ) -> Self {
        Self {
            table: ArcSwap::from_pointee(table),
            config,
            registry,
        }
    }

    /// Load `config.routes_path` and build a router from it.
    pub fn load(
        config: RouterConfig,
        registry: Arc<dyn ActionRegistry>,
    ) -> Result<Self, ConfigError> {
        let table = RouteTable::load(&config, registry.as_ref())?;
        Ok(Self::with_table(table, config, registry))
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The currently published table.
    #[must_use]
    pub fn table(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    /// Re-read the route file and atomically replace the table.
    ///
    /// On failure the previous table stays active.
    pub fn refresh(&self) -> Result<(), ConfigError> {
        let table = RouteTable::load(&self.config, self.registry.as_ref())
            .inspect_err(|err| self.log_refresh_failure(err))?;
        self.publish(table);
        Ok(())
    }

    /// Like [`refresh`](Self::refresh), reading routes from `content` instead
    /// of the route file.
    pub fn refresh_from_str(&self, content: &str) -> Result<(), ConfigError> {
        let table = RouteTable::parse(content, None, &self.config, self.registry.as_ref())
            .inspect_err(|err| self.log_refresh_failure(err))?;
        self.publish(table);
        Ok(())
    }

    fn publish(&self, table: RouteTable) {
        let routes_count = table.len();
        self.table.store(Arc::new(table));
        info!(
            routes_count,
            routes_path = %self.config.routes_path.display(),
            "Routing table published"
        );
    }

    fn log_refresh_failure(&self, err: &ConfigError) {
        error!(
            routes_path = ?err.path,
            line = ?err.line,
            title = %err.title,
            description = %err.description,
            "Route refresh failed; keeping previous table"
        );
    }

    /// The method a request is routed under: a `POST` carrying an allowed
    /// override verb is routed as that verb.
    fn effective_method(&self, method: &str, override_value: Option<&str>) -> String {
        let method = method.to_ascii_uppercase();
        match override_value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(verb) if method == "POST" => {
                if self.config.allows_override(verb) {
                    verb.to_ascii_uppercase()
                } else {
                    debug!(
                        override_verb = verb,
                        "Ignoring method override outside the allow-list"
                    );
                    method
                }
            }
            _ => method,
        }
    }

    /// Match a request.
    ///
    /// `override_value` is the value of the `X-HTTP-Method-Override` header,
    /// if any. A `None` result and a result with
    /// [`is_not_found`](RouteMatch::is_not_found) both mean HTTP 404.
    ///
    /// # Example
    ///
    /// ```rust
    /// use routetable::{config::RouterConfig, registry::AnyAction, router::Router};
    /// use std::sync::Arc;
    ///
    /// let router = Router::new(RouterConfig::default(), Arc::new(AnyAction));
    /// router.refresh_from_str("GET /app/:id/ Application.Show").unwrap();
    ///
    /// let m = router.route("GET", "/app/123/", None).unwrap();
    /// assert_eq!(m.controller_name, "Application");
    /// assert_eq!(m.param("id"), Some("123"));
    /// ```
    #[must_use]
    pub fn route(&self, method: &str, path: &str, override_value: Option<&str>) -> Option<RouteMatch> {
        let method = self.effective_method(method, override_value);
        self.table.load().route(&method, path)
    }

    /// Match an `http::Request`, reading the override header from it.
    #[must_use]
    pub fn route_request<B>(&self, req: &http::Request<B>) -> Option<RouteMatch> {
        let override_value = req
            .headers()
            .get(METHOD_OVERRIDE_HEADER)
            .and_then(|value| value.to_str().ok());
        self.route(req.method().as_str(), req.uri().path(), override_value)
    }

    /// Generate a URL for `action`. Never fails the caller: unknown actions
    /// yield `None` and missing arguments render as `<nil>`.
    #[must_use]
    pub fn reverse(&self, action: &str, args: &HashMap<String, String>) -> Option<ActionDefinition> {
        self.table.load().reverse(action, args)
    }
}
