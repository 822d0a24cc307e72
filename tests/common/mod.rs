#![allow(dead_code)]

pub mod temp_files {
    use std::io::Write;
    use std::path::Path;
    use tempfile::{NamedTempFile, TempDir};

    /// Write `content` to a fresh temporary route file.
    pub fn create_temp_routes(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp routes file");
        file.write_all(content.as_bytes())
            .expect("write temp routes file");
        file
    }

    /// A temporary directory holding a `routes` file, for tests that rewrite
    /// the file while it is being watched.
    pub fn create_routes_dir(content: &str) -> TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("routes"), content).expect("write routes file");
        dir
    }

    pub fn routes_path(dir: &Path) -> std::path::PathBuf {
        dir.join("routes")
    }
}

pub mod fixtures {
    use routetable::{registry::AnyAction, Router, RouterConfig};
    use std::sync::Arc;

    pub const TEST_ROUTES: &str = r#"
# This is a comment
GET   /                          Application.Index
GET   /test/                     Application.Index("Test", "Test2")
GET   /app/:id/                  Application.Show
GET   /app/:id.png               Application.ShowImage
GET   /app/:id.:ext              Application.ShowImageCustomExtension
GET   /app-wild/*id/             Application.WildShow
POST  /app/:id                   Application.Save
PATCH /app/:id/                  Application.Update
GET   /javascript/:filepath      Static.Serve("public/js")
GET   /public/*filepath          Static.Serve("public")
*     /:controller/:action       :controller.:action

GET   /favicon.ico               404
"#;

    pub fn router_from(content: &str) -> Router {
        let router = Router::new(RouterConfig::default(), Arc::new(AnyAction));
        router.refresh_from_str(content).expect("routes should build");
        router
    }

    pub fn test_router() -> Router {
        router_from(TEST_ROUTES)
    }
}
