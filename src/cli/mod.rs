//! # CLI Module
//!
//! Command-line tooling for route files.
//!
//! ## Commands
//!
//! ### `check`
//!
//! Parse a route file and build its table, reporting the first error with the
//! surrounding declarations:
//!
//! ```bash
//! routetable check --routes conf/routes --actions conf/actions --dump
//! ```
//!
//! ### `match`
//!
//! Show which action a request resolves to:
//!
//! ```bash
//! routetable match --routes conf/routes POST /app/123 --override PATCH
//! ```
//!
//! ### `reverse`
//!
//! Generate the URL for an action:
//!
//! ```bash
//! routetable reverse --routes conf/routes Application.Show --arg id=123
//! ```
//!
//! ### `watch`
//!
//! Keep a router loaded and rebuild it whenever the route file changes.
//!
//! ## Options shared by every command
//!
//! - `--routes <FILE>` - route file (env `ROUTETABLE_ROUTES`, default `conf/routes`)
//! - `--app-root <PREFIX>` - path prefix (env `ROUTETABLE_APP_ROOT`)
//! - `--actions <FILE>` - known actions, one `Controller.Method` per line;
//!   without it every action is accepted
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use clap::Parser;
//! use routetable::cli::{run_cli, Cli};
//!
//! run_cli(Cli::parse()).unwrap();
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands, RouteSource};
