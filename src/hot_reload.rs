//! # Hot Reload Module
//!
//! Watches the route file of a [`Router`] and calls
//! [`Router::refresh`] whenever it changes.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use routetable::{config::RouterConfig, hot_reload::watch_routes, registry::AnyAction, router::Router};
//! use std::sync::Arc;
//!
//! let router = Arc::new(Router::load(RouterConfig::from_env(), Arc::new(AnyAction)).unwrap());
//!
//! let watcher = watch_routes(Arc::clone(&router), |result| {
//!     if let Err(err) = result {
//!         eprintln!("{err}");
//!     }
//! })
//! .unwrap();
//!
//! // Dropping the watcher stops it.
//! # drop(watcher);
//! ```
//!
//! ## Error Handling
//!
//! A route file that fails to parse is logged and handed to the callback;
//! the previous table stays active and requests keep being served from it.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a new file and renaming it over the old one are
//! picked up too.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::ConfigError;
use crate::router::Router;

fn touches(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|path| path.file_name() == file_name)
}

/// Watch the router's route file and refresh the router when it changes.
///
/// `on_reload` receives the outcome of every refresh attempt. The returned
/// watcher must be kept alive for as long as reloading should continue.
pub fn watch_routes<F>(router: Arc<Router>, mut on_reload: F) -> notify::Result<RecommendedWatcher>
where
    F: FnMut(Result<(), ConfigError>) + Send + 'static,
{
    let routes_path: PathBuf = router.config().routes_path.clone();
    let file_name = routes_path.file_name().map(ToOwned::to_owned);
    let watch_dir = match routes_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => Path::new(".").to_path_buf(),
    };

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !touches(&event, file_name.as_deref()) {
                    return;
                }
                debug!(kind = ?event.kind, "Route file changed");
                let result = router.refresh();
                if result.is_ok() {
                    info!(
                        routes_count = router.table().len(),
                        "hot-reload: applied route updates"
                    );
                }
                on_reload(result);
            }
            Err(err) => error!(error = %err, "Route file watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
    info!(
        routes_path = %routes_path.display(),
        "Watching route file for changes"
    );
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use std::ffi::OsStr;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn only_changes_to_the_route_file_count() {
        let name = Some(OsStr::new("routes"));
        assert!(touches(
            &event(EventKind::Modify(ModifyKind::Any), "/conf/routes"),
            name
        ));
        assert!(touches(
            &event(EventKind::Create(CreateKind::File), "/conf/routes"),
            name
        ));
        assert!(!touches(
            &event(EventKind::Modify(ModifyKind::Any), "/conf/app.conf"),
            name
        ));
        assert!(!touches(
            &event(EventKind::Remove(RemoveKind::File), "/conf/routes"),
            name
        ));
    }
}
