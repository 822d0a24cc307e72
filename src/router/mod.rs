//! # Router Module
//!
//! Request matching and reverse routing over a parsed route file.
//!
//! ## Overview
//!
//! - [`RouteTable`] is an immutable snapshot: the declared routes in order
//!   plus the [`PathTree`](crate::pathtree::PathTree) built from them.
//! - [`Router`] publishes the current table through an `ArcSwap` and rebuilds
//!   it on [`refresh`](Router::refresh). Readers never block.
//! - [`ActionDefinition`] is the result of a reverse lookup.
//!
//! ## Matching
//!
//! A request is looked up under the key `/<METHOD><path>`. Routes declared
//! with method `*` live under the wildcard element `:METHOD`, so the request
//! method shows up as the `METHOD` parameter. `GET` routes also answer `HEAD`.
//! A `POST` carrying an allowed `X-HTTP-Method-Override` value is matched as
//! that verb.
//!
//! ## Example
//!
//! ```rust
//! use routetable::{config::RouterConfig, registry::AnyAction, router::Router};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let router = Router::new(RouterConfig::default(), Arc::new(AnyAction));
//! router
//!     .refresh_from_str("GET /app/:id Application.Show\n* /:controller/:action :controller.:action")
//!     .unwrap();
//!
//! let m = router.route("GET", "/Hotels/Index", None).unwrap();
//! assert_eq!(m.action, "Hotels.Index");
//! assert_eq!(m.param("METHOD"), Some("GET"));
//!
//! let args = HashMap::from([("id".to_string(), "7".to_string())]);
//! let url = router.reverse("Application.Show", &args).unwrap();
//! assert_eq!(url.url, "/app/7");
//! ```

mod core;
mod reverse;

pub use core::{RouteMatch, RouteTable, Router};
pub use reverse::{encode_path_segment, ActionDefinition, MISSING_ARG};
