use routetable::router::{encode_path_segment, MISSING_ARG};
use std::collections::HashMap;

mod common;
use common::fixtures::{router_from, test_router};

fn args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_first_declared_route_wins() {
    let router = router_from("GET /new/:id Posts.Show\nGET /old/:id Posts.Show\n");
    let def = router.reverse("Posts.Show", &args(&[("id", "4")])).unwrap();
    assert_eq!(def.url, "/new/4");
}

#[test]
fn test_wildcard_controller_fills_from_action() {
    let router = test_router();
    let def = router
        .reverse("Hotels.Book", &args(&[("id", "3")]))
        .unwrap();
    assert_eq!(def.url, "/Hotels/Book?id=3");
    assert!(def.star);
    assert_eq!(def.method, "GET");
    assert_eq!(def.args, args(&[("id", "3")]));
}

#[test]
fn test_leftover_args_are_sorted_and_form_encoded() {
    let router = router_from("GET /search Search.Run\n");
    let def = router
        .reverse("Search.Run", &args(&[("q", "rust lang"), ("page", "2"), ("a&b", "=")]))
        .unwrap();
    assert_eq!(def.url, "/search?a%26b=%3D&page=2&q=rust+lang");
    assert_eq!(def.to_string(), def.url);
}

#[test]
fn test_catch_all_escapes_like_a_path_segment() {
    let router = test_router();
    let def = router
        .reverse("Static.Serve", &args(&[("filepath", "css/a,b;c.css")]))
        .unwrap();
    // Static.Serve is first declared on /javascript/:filepath.
    assert_eq!(def.url, "/javascript/css%2Fa%2Cb%3Bc.css");

    let router = router_from("GET /public/*filepath Static.Serve\n");
    let def = router
        .reverse("Static.Serve", &args(&[("filepath", "css/a,b;c.css")]))
        .unwrap();
    assert_eq!(def.url, "/public/css%2Fa%2Cb%3Bc.css");
}

#[test]
fn test_missing_argument_is_rendered_not_fatal() {
    let router = router_from("GET /users/:user/posts/:post Posts.Show\n");
    let def = router
        .reverse("Posts.Show", &args(&[("user", "ann")]))
        .unwrap();
    assert_eq!(def.url, format!("/users/ann/posts/{MISSING_ARG}"));
}

#[test]
fn test_extension_wildcard_reverse() {
    let router = test_router();
    let def = router
        .reverse("Application.ShowImageCustomExtension", &args(&[("id", "9"), ("ext", "gif")]))
        .unwrap();
    assert_eq!(def.url, "/app/9.:ext?ext=gif");
    assert_eq!(def.args, args(&[("ext", "gif")]));

    let def = router
        .reverse("Application.ShowImageCustomExtension", &args(&[("id", "9")]))
        .unwrap();
    assert_eq!(def.url, "/app/9.:ext");
}

#[test]
fn test_catch_all_extension_is_copied_verbatim() {
    let router = router_from("GET /download/*file.zip Files.Archive\n");
    let def = router
        .reverse("Files.Archive", &args(&[("file", "reports/2024")]))
        .unwrap();
    assert_eq!(def.url, "/download/reports%2F2024.zip");

    let m = router.route("GET", "/download/reports/2024.zip", None).unwrap();
    assert_eq!(m.param("file"), Some("reports/2024"));
}

#[test]
fn test_reverse_of_not_found_route_is_none() {
    let router = router_from("GET /favicon.ico 404\n");
    assert!(router.reverse("404", &HashMap::new()).is_none());
}

#[test]
fn test_path_segment_spaces_are_percent_encoded() {
    let router = test_router();
    let def = router
        .reverse("Application.Show", &args(&[("id", "a b")]))
        .unwrap();
    assert_eq!(def.url, "/app/a%20b/");
}

#[test]
fn test_escape_sets() {
    assert_eq!(encode_path_segment("x@y:z"), "x@y:z");
    assert_eq!(encode_path_segment("?#"), "%3F%23");
    assert_eq!(encode_path_segment("a/b"), "a%2Fb");
    assert_eq!(encode_path_segment("a,b"), "a%2Cb");
}
