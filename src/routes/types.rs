use serde::Serialize;
use std::path::{Path, PathBuf};

use super::args::parse_fixed_args;
use crate::error::RouteError;

/// Verbs accepted in the method column of a route file, besides `*`.
pub const METHODS: [&str; 8] = ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS", "HEAD", "WS"];

/// Method column value matching any request method.
pub const ANY_METHOD: &str = "*";

/// Action that deliberately answers 404.
pub const NOT_FOUND_ACTION: &str = "404";

/// A single declaration from a route file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Upper-cased verb, or `*`.
    pub method: String,
    /// Path pattern, e.g. `/app/:id`.
    pub path: String,
    /// e.g. `Application.ShowApp`, `404`, `:controller.:action`.
    pub action: String,
    /// e.g. `Application`; empty unless the action has exactly two parts.
    pub controller_name: String,
    /// e.g. `ShowApp`; empty unless the action has exactly two parts.
    pub method_name: String,
    /// Positional arguments from `Action("a", "b")`.
    pub fixed_params: Vec<String>,
    /// Route file this declaration came from.
    pub routes_path: Option<PathBuf>,
    /// 1-based line within `routes_path`.
    pub line: usize,
}

impl Route {
    /// Build a route from the raw columns of a declaration.
    ///
    /// `fixed_args` is the text between the parentheses after the action and
    /// is read as a single CSV record.
    pub fn new(
        method: &str,
        path: &str,
        action: &str,
        fixed_args: &str,
        routes_path: Option<&Path>,
        line: usize,
    ) -> Result<Self, RouteError> {
        let fixed_params = parse_fixed_args(fixed_args).map_err(|reason| RouteError::FixedArgs {
            args: fixed_args.to_string(),
            reason,
        })?;

        if !path.starts_with('/') {
            return Err(RouteError::RelativePath(path.to_string()));
        }

        let (controller_name, method_name) = match action.split_once('.') {
            Some((controller, method)) if !method.contains('.') => {
                (controller.to_string(), method.to_string())
            }
            _ => (String::new(), String::new()),
        };

        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            action: action.to_string(),
            controller_name,
            method_name,
            fixed_params,
            routes_path: routes_path.map(Path::to_path_buf),
            line,
        })
    }

    /// Key under which the route is stored in the path tree.
    ///
    /// A `*` method becomes the wildcard element `:METHOD`, so the request
    /// method is captured as the `METHOD` parameter.
    #[must_use]
    pub fn tree_path(&self) -> String {
        let method = if self.method == ANY_METHOD {
            ":METHOD"
        } else {
            self.method.as_str()
        };
        format!("/{method}{}", self.path)
    }

    /// Whether this declaration deliberately answers 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.action == NOT_FOUND_ACTION
    }

    /// Whether the controller or method is filled in from captured wildcards.
    #[must_use]
    pub fn has_variable_action(&self) -> bool {
        self.controller_name.starts_with(':') || self.method_name.starts_with(':')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_action_and_uppercases_method() {
        let route = Route::new("get", "/app/:id", "Application.Show", "", None, 3).unwrap();
        assert_eq!(route.method, "GET");
        assert_eq!(route.controller_name, "Application");
        assert_eq!(route.method_name, "Show");
        assert!(route.fixed_params.is_empty());
        assert_eq!(route.tree_path(), "/GET/app/:id");
        assert!(!route.has_variable_action());
    }

    #[test]
    fn any_method_becomes_a_wildcard_element() {
        let route = Route::new("*", "/:controller/:action", ":controller.:action", "", None, 1)
            .unwrap();
        assert_eq!(route.tree_path(), "/:METHOD/:controller/:action");
        assert!(route.has_variable_action());
    }

    #[test]
    fn not_found_action_has_no_controller() {
        let route = Route::new("GET", "/favicon.ico", "404", "", None, 1).unwrap();
        assert!(route.is_not_found());
        assert!(route.controller_name.is_empty());
        assert!(route.method_name.is_empty());
    }

    #[test]
    fn relative_path_is_rejected() {
        assert_eq!(
            Route::new("GET", "app", "A.B", "", None, 1),
            Err(RouteError::RelativePath("app".into()))
        );
    }

    #[test]
    fn malformed_fixed_args_are_rejected() {
        let err = Route::new("GET", "/", "A.B", r#""unterminated"#, None, 1).unwrap_err();
        assert!(matches!(err, RouteError::FixedArgs { .. }));
    }
}
