//! Reverse routing: from an action and its arguments back to a URL.
//!
//! Routes are scanned in declaration order and the first route whose
//! controller and method match (or are wildcards) produces the URL, the same
//! priority forward matching gives to earlier declarations.
//!
//! Path arguments are percent-encoded, leaving `A-Za-z0-9-_.~$&+:=@` as is.
//! `:name` and `*name` segments share the same set, so `/` is escaped and a
//! catch-all value never introduces new path segments. Any suffix after the
//! name (`:id.png`, `:id.:ext`, `*path.zip`) is copied verbatim. Arguments not
//! consumed by the path become the query string.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::error;
use url::form_urlencoded;

use crate::pathtree::{parse_segment, Segment};
use crate::routes::{Route, ANY_METHOD};

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

/// Rendered in place of a path argument the caller did not supply.
pub const MISSING_ARG: &str = "<nil>";

/// A URL generated for an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDefinition {
    /// Path plus query string, e.g. `/app/123?c=http%3A%2F%2Fcontinue`.
    pub url: String,
    /// Declared method; `GET` for routes declared with `*`.
    pub method: String,
    /// Whether the route was declared with method `*`.
    pub star: bool,
    /// The requested action.
    pub action: String,
    /// Arguments that went into the query string.
    pub args: HashMap<String, String>,
}

impl fmt::Display for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Percent-encode a value for a `:name` or `*name` path segment.
#[must_use]
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn take_arg(args: &mut HashMap<String, String>, name: &str) -> String {
    match args.remove(name) {
        Some(value) => encode_path_segment(&value),
        None => {
            error!(arg = name, "Reverse route missing route arg");
            MISSING_ARG.to_string()
        }
    }
}

fn render_segment(el: &str, args: &mut HashMap<String, String>) -> String {
    let name = match parse_segment(el) {
        Segment::Literal(_) => return el.to_string(),
        Segment::Wildcard { name, .. } | Segment::Star { name, .. } => name,
    };
    // Only the value is substituted; the extension stays as declared.
    let mut rendered = take_arg(args, name);
    rendered.push_str(&el[1 + name.len()..]);
    rendered
}

/// Substitute `args` into `path`, consuming them, and append whatever is
/// left as a query string with keys in sorted order.
fn build_url(path: &str, args: &mut HashMap<String, String>) -> String {
    let mut url = path
        .split('/')
        .map(|el| render_segment(el, args))
        .collect::<Vec<_>>()
        .join("/");

    if !args.is_empty() {
        let mut pairs: Vec<(&String, &String)> = args.iter().collect();
        pairs.sort();
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        url.push('?');
        url.push_str(&query);
    }
    url
}

pub(crate) fn reverse(
    routes: &[Arc<Route>],
    action: &str,
    args: &HashMap<String, String>,
) -> Option<ActionDefinition> {
    let Some((controller, method)) = action
        .split_once('.')
        .filter(|(_, method)| !method.contains('.'))
    else {
        error!(action, "Reverse router got invalid action");
        return None;
    };

    for route in routes {
        if route.controller_name.is_empty() || route.method_name.is_empty() {
            continue;
        }

        let controller_wildcard = route.controller_name.strip_prefix(':');
        let method_wildcard = route.method_name.strip_prefix(':');
        if (controller_wildcard.is_none() && route.controller_name != controller)
            || (method_wildcard.is_none() && route.method_name != method)
        {
            continue;
        }

        let mut args = args.clone();
        if let Some(name) = controller_wildcard {
            args.insert(name.to_string(), controller.to_string());
        }
        if let Some(name) = method_wildcard {
            args.insert(name.to_string(), method.to_string());
        }

        let url = build_url(&route.path, &mut args);
        let (method, star) = if route.method == ANY_METHOD {
            ("GET".to_string(), true)
        } else {
            (route.method.clone(), false)
        };

        return Some(ActionDefinition {
            url,
            method,
            star,
            action: action.to_string(),
            args,
        });
    }

    error!(action, args = ?args, "Failed to find reverse route");
    None
}
