//! # Action Registry
//!
//! The route table only needs to know whether a `Controller.Method` pair
//! exists. Where the answer comes from (reflection, generated code, a list in
//! a file) belongs to the host application, which hands an
//! [`ActionRegistry`] to the [`Router`](crate::router::Router).
//!
//! Any `Fn(&str, &str) -> bool` closure is a registry, and
//! [`StaticRegistry`] covers the common case of a fixed set of actions:
//!
//! ```rust
//! use routetable::registry::{ActionRegistry, StaticRegistry};
//!
//! let mut registry = StaticRegistry::new();
//! registry.register("Application", "Index");
//!
//! assert!(registry.resolve_action("Application", "Index"));
//! assert!(!registry.resolve_action("Application", "Show"));
//! ```

use std::collections::HashSet;
use tracing::{info, warn};

/// Answers whether a controller/method combination exists.
///
/// Consulted once per static action while a route table is built; never on
/// the request path.
pub trait ActionRegistry: Send + Sync {
    fn resolve_action(&self, controller: &str, method: &str) -> bool;
}

impl<F> ActionRegistry for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn resolve_action(&self, controller: &str, method: &str) -> bool {
        self(controller, method)
    }
}

/// Registry that accepts every action.
///
/// Useful for tooling that inspects a route file without the application's
/// controllers at hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyAction;

impl ActionRegistry for AnyAction {
    fn resolve_action(&self, _controller: &str, _method: &str) -> bool {
        true
    }
}

/// A fixed set of `Controller.Method` actions.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    actions: HashSet<(String, String)>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `Controller.Method` strings. Entries without
    /// exactly one `.` are skipped.
    pub fn from_actions<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for action in actions {
            let action = action.as_ref();
            match action.split_once('.') {
                Some((controller, method)) if !method.contains('.') => {
                    registry.register(controller, method);
                }
                _ => warn!(action = %action, "Ignoring malformed action"),
            }
        }
        registry
    }

    /// Parse one `Controller.Method` per line; blank lines and `#` comments
    /// are skipped.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let registry = Self::from_actions(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        );
        info!(total_actions = registry.len(), "Action registry loaded");
        registry
    }

    /// Add an action. Registering the same action twice is a no-op.
    pub fn register(&mut self, controller: &str, method: &str) {
        self.actions
            .insert((controller.to_string(), method.to_string()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl ActionRegistry for StaticRegistry {
    fn resolve_action(&self, controller: &str, method: &str) -> bool {
        self.actions
            .contains(&(controller.to_string(), method.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_and_malformed_lines() {
        let registry = StaticRegistry::parse(
            "# actions\nApplication.Index\n\n  Static.Serve  \nBroken\nA.b.c\n",
        );
        assert_eq!(registry.len(), 2);
        assert!(registry.resolve_action("Application", "Index"));
        assert!(registry.resolve_action("Static", "Serve"));
        assert!(!registry.resolve_action("Broken", ""));
    }

    #[test]
    fn closures_are_registries() {
        let registry = |controller: &str, _method: &str| controller == "Application";
        assert!(registry.resolve_action("Application", "Anything"));
        assert!(!registry.resolve_action("Static", "Serve"));
    }

    #[test]
    fn any_action_accepts_everything() {
        assert!(AnyAction.resolve_action("Who", "Ever"));
    }
}
