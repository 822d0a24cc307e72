//! # routetable
//!
//! **routetable** is a declarative HTTP routing engine. Routes are declared in
//! a plain-text route file, one per line:
//!
//! ```text
//! GET   /                    Application.Index
//! GET   /app/:id/            Application.Show
//! GET   /public/*filepath    Static.Serve("public")
//! *     /:controller/:action :controller.:action
//! GET   /favicon.ico         404
//! ```
//!
//! ## Architecture
//!
//! - **[`pathtree`]** - segment trie with `:name` and `*name` wildcards
//! - **[`routes`]** - route-line grammar and route file parsing
//! - **[`router`]** - request matching, method override, reverse routing and
//!   the atomically published [`RouteTable`](router::RouteTable)
//! - **[`registry`]** - how the host tells the router which actions exist
//! - **[`config`]** - [`RouterConfig`](config::RouterConfig) from the environment
//! - **[`error`]** - configuration errors with file and line context
//! - **[`hot_reload`]** - rebuild the table when the route file changes
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`cli`]** - the `routetable` command
//!
//! ## Matching
//!
//! A request is matched against the key `/<METHOD><path>`. When several
//! declarations could match, the one declared first wins. Routes declared for
//! `GET` also answer `HEAD`, and a `POST` may tunnel `PUT`, `PATCH` or
//! `DELETE` through the `X-HTTP-Method-Override` header.
//!
//! ## Example
//!
//! ```rust
//! use routetable::{config::RouterConfig, registry::AnyAction, router::Router};
//! use std::sync::Arc;
//!
//! let router = Router::new(RouterConfig::default(), Arc::new(AnyAction));
//! router
//!     .refresh_from_str("GET /public/*filepath Static.Serve(\"public\")")
//!     .unwrap();
//!
//! let m = router.route("GET", "/public/css/style.css", None).unwrap();
//! assert_eq!(m.action, "Static.Serve");
//! assert_eq!(m.fixed_params, vec!["public"]);
//! assert_eq!(m.param("filepath"), Some("css/style.css"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod pathtree;
pub mod registry;
pub mod router;
pub mod routes;

pub use config::RouterConfig;
pub use error::{ConfigError, RouteError, TreeError};
pub use router::{ActionDefinition, RouteMatch, RouteTable, Router};
