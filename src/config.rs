//! # Router Configuration
//!
//! Configuration for a [`Router`](crate::router::Router), loaded from
//! environment variables at startup.
//!
//! ## Environment Variables
//!
//! ### `ROUTETABLE_ROUTES`
//!
//! Path of the route file read by every refresh. Default: `conf/routes`.
//!
//! ### `ROUTETABLE_APP_ROOT`
//!
//! Prefix prepended to every declared path, e.g. `/myapp` when the
//! application is mounted below the server root. Default: empty.
//!
//! ### `ROUTETABLE_OVERRIDE_VERBS`
//!
//! Comma-separated verbs a `POST` may tunnel through the
//! `X-HTTP-Method-Override` header. Default: `PUT,PATCH,DELETE`.
//!
//! ## Usage
//!
//! ```rust
//! use routetable::config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("Routes file: {}", config.routes_path.display());
//! ```

use std::env;
use std::path::PathBuf;

/// Header a host reads the tunnelled method from.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

const DEFAULT_ROUTES_PATH: &str = "conf/routes";
const DEFAULT_OVERRIDE_VERBS: [&str; 3] = ["PUT", "PATCH", "DELETE"];

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Route file read by [`Router::refresh`](crate::router::Router::refresh).
    pub routes_path: PathBuf,
    /// Prefix prepended to every declared path.
    pub app_root: String,
    /// Upper-cased verbs accepted from the method-override header.
    pub override_verbs: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            routes_path: PathBuf::from(DEFAULT_ROUTES_PATH),
            app_root: String::new(),
            override_verbs: DEFAULT_OVERRIDE_VERBS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            routes_path: env::var("ROUTETABLE_ROUTES")
                .map(PathBuf::from)
                .unwrap_or(defaults.routes_path),
            app_root: env::var("ROUTETABLE_APP_ROOT").unwrap_or(defaults.app_root),
            override_verbs: env::var("ROUTETABLE_OVERRIDE_VERBS")
                .map(|val| parse_verbs(&val))
                .unwrap_or(defaults.override_verbs),
        }
    }

    /// Same configuration reading a different route file.
    #[must_use]
    pub fn with_routes_path(mut self, routes_path: impl Into<PathBuf>) -> Self {
        self.routes_path = routes_path.into();
        self
    }

    #[must_use]
    pub fn with_app_root(mut self, app_root: impl Into<String>) -> Self {
        self.app_root = app_root.into();
        self
    }

    /// Whether `verb` may replace `POST` through the override header.
    #[must_use]
    pub fn allows_override(&self, verb: &str) -> bool {
        self.override_verbs
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(verb))
    }
}

fn parse_verbs(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}
