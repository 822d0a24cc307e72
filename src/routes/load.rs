use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

use super::types::{Route, ANY_METHOD, METHODS};
use crate::error::{ConfigError, RouteError};
use crate::registry::ActionRegistry;

// Groups:
// 1: method
// 4: path
// 5: action
// 6: fixed args
static ROUTE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let methods = METHODS.join("|");
    let any = regex::escape(ANY_METHOD);
    Regex::new(&format!(
        concat!(
            r"(?i)^({methods}|{any})",
            r"[(]?([^)]*)(\))?[ \t]+",
            r"(.*/[^ \t]*)[ \t]+([^ \t(]+)",
            r"\(?([^)]*)\)?[ \t]*$",
        ),
        methods = methods,
        any = any,
    ))
    .expect("Failed to compile route line regex")
});

/// The raw columns of one route declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLine<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub action: &'a str,
    pub fixed_args: &'a str,
}

/// Split a trimmed, non-comment line into its columns.
///
/// Returns `None` when the line is not a route declaration.
#[must_use]
pub fn parse_route_line(line: &str) -> Option<RouteLine<'_>> {
    let caps = ROUTE_PATTERN.captures(line)?;
    Some(RouteLine {
        method: caps.get(1)?.as_str(),
        path: caps.get(4)?.as_str(),
        action: caps.get(5)?.as_str(),
        fixed_args: caps.get(6).map_or("", |m| m.as_str()),
    })
}

/// Prefix `path` with `app_root` without producing a double slash.
fn join_root(app_root: &str, path: &str) -> String {
    let root = app_root.strip_suffix('/').unwrap_or(app_root);
    format!("{root}{path}")
}

/// Check that a route's action exists, unless it is a deliberate 404 or is
/// resolved from wildcards at match time.
fn validate_route(route: &Route, registry: &dyn ActionRegistry) -> Result<(), RouteError> {
    if route.is_not_found() {
        return Ok(());
    }

    let parts = route.action.split('.').count();
    if parts != 2 {
        return Err(RouteError::MalformedAction {
            action: route.action.clone(),
            parts,
        });
    }

    if route.has_variable_action() {
        return Ok(());
    }

    if !registry.resolve_action(&route.controller_name, &route.method_name) {
        return Err(RouteError::UnknownAction {
            controller: route.controller_name.clone(),
            method: route.method_name.clone(),
        });
    }

    Ok(())
}

/// Parse route file content into routes, in declaration order.
///
/// Blank lines and lines starting with `#` are skipped. Lines that are not
/// route declarations are logged and skipped. Every other failure aborts the
/// parse with the 1-based line number and the file content attached.
pub fn parse_routes(
    content: &str,
    routes_path: Option<&Path>,
    app_root: &str,
    registry: &dyn ActionRegistry,
) -> Result<Vec<Route>, ConfigError> {
    let mut routes = Vec::new();

    for (n, raw) in content.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let lineno = n + 1;

        let Some(decl) = parse_route_line(line) else {
            warn!(
                routes_path = ?routes_path,
                line = lineno,
                source = %line,
                "Skipping unrecognised route line"
            );
            continue;
        };

        let parsed = if decl.path.starts_with('/') {
            Route::new(
                decl.method,
                &join_root(app_root, decl.path),
                decl.action,
                decl.fixed_args,
                routes_path,
                lineno,
            )
        } else {
            Err(RouteError::RelativePath(decl.path.to_string()))
        };
        let route = parsed
            .and_then(|route| validate_route(&route, registry).map(|()| route))
            .map_err(|err| ConfigError::route(&err, routes_path, lineno).with_source(content))?;

        debug!(
            method = %route.method,
            path = %route.path,
            action = %route.action,
            line = lineno,
            "Parsed route"
        );
        routes.push(route);
    }

    Ok(routes)
}

/// Read and parse a route file. Returns the routes and the file content.
pub fn parse_routes_file(
    routes_path: &Path,
    app_root: &str,
    registry: &dyn ActionRegistry,
) -> Result<(Vec<Route>, String), ConfigError> {
    let content =
        std::fs::read_to_string(routes_path).map_err(|err| ConfigError::load(routes_path, &err))?;
    let routes = parse_routes(&content, Some(routes_path), app_root, registry)?;
    Ok((routes, content))
}
