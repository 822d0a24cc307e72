use routetable::hot_reload::watch_routes;
use routetable::registry::AnyAction;
use routetable::{Router, RouterConfig};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod common;
use common::temp_files::{create_routes_dir, routes_path};

/// Replace the file in one step so the watcher never sees it half written.
fn replace_file(path: &Path, content: &str) {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, content).unwrap();
    std::fs::rename(&tmp, path).unwrap();
}

fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..40 {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    condition()
}

#[test]
fn test_watch_routes_reload() {
    let dir = create_routes_dir("GET /foo Foo.One\n");
    let path = routes_path(dir.path());
    let router = Arc::new(
        Router::load(
            RouterConfig::default().with_routes_path(&path),
            Arc::new(AnyAction),
        )
        .unwrap(),
    );

    let outcomes: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
    let outcomes_clone = Arc::clone(&outcomes);
    let watcher = watch_routes(Arc::clone(&router), move |result| {
        outcomes_clone.lock().unwrap().push(result.is_ok());
    })
    .expect("watch_routes");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    replace_file(&path, "GET /foo Foo.Two\n");

    assert!(wait_for(|| router
        .route("GET", "/foo", None)
        .is_some_and(|m| m.action == "Foo.Two")));
    assert!(outcomes.lock().unwrap().contains(&true));

    drop(watcher);
}

#[test]
fn test_watch_routes_keeps_table_on_invalid_file() {
    let dir = create_routes_dir("GET /foo Foo.One\n");
    let path = routes_path(dir.path());
    let router = Arc::new(
        Router::load(
            RouterConfig::default().with_routes_path(&path),
            Arc::new(AnyAction),
        )
        .unwrap(),
    );

    let failures: Arc<Mutex<Vec<Option<usize>>>> = Arc::new(Mutex::new(Vec::new()));
    let failures_clone = Arc::clone(&failures);
    let watcher = watch_routes(Arc::clone(&router), move |result| {
        if let Err(err) = result {
            failures_clone.lock().unwrap().push(err.line);
        }
    })
    .expect("watch_routes");

    std::thread::sleep(Duration::from_millis(100));

    replace_file(&path, "GET /foo NoDot\n");

    assert!(wait_for(|| !failures.lock().unwrap().is_empty()));
    assert!(failures.lock().unwrap().contains(&Some(1)));
    assert_eq!(router.route("GET", "/foo", None).unwrap().action, "Foo.One");

    drop(watcher);
}
