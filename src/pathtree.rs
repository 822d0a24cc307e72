//! Segment trie for route lookup.
//!
//! Keys are `/`-separated lists of path elements. Every key must begin with
//! `/`, and leading or trailing slashes are insignificant. Elements starting
//! with `:` or `*` are wildcards:
//!
//! - `:name` matches exactly one path element. It may carry an extension,
//!   either literal (`:id.png`) or itself a wildcard (`:id.:ext`).
//! - `*name` matches one or more trailing elements, rejoined with `/`. Nothing
//!   may follow it. A suffix after the name (`*path.zip`) must end the
//!   rejoined path and is stripped from the captured value.
//!
//! Each node keeps its literal edges in a map, a single shared wildcard child,
//! extension-qualified wildcard children, an optional terminal leaf and an
//! optional catch-all leaf. Wildcard names are recorded on the leaf, not on the
//! node, so two declarations reaching the same wildcard slot under different
//! names share the node and each leaf reports its own names.
//!
//! When several leaves match a path, the one inserted first wins. Lookup cost
//! is proportional to the path depth, independent of the number of keys.
//!
//! ```rust
//! use routetable::pathtree::PathTree;
//!
//! let mut tree = PathTree::new();
//! tree.add("/:first/*star/", 1).unwrap();
//!
//! let (leaf, expansions) = tree.find("/a/b/c/d").unwrap();
//! assert_eq!(leaf.value, 1);
//! assert_eq!(expansions, vec!["a", "b/c/d"]);
//! ```

use std::collections::HashMap;

use crate::error::TreeError;

/// Terminal data stored for an inserted key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf<V> {
    /// The value associated with the key.
    pub value: V,
    /// Wildcard names, in the order they appear in the key.
    pub wildcards: Vec<String>,
    order: usize,
}

/// A parsed path element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Literal(&'a str),
    Wildcard {
        name: &'a str,
        ext: Option<Extension<'a>>,
    },
    Star {
        name: &'a str,
        /// Verbatim text after the name, leading dot included. Empty if none.
        suffix: &'a str,
    },
}

/// Suffix attached to a `:name` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extension<'a> {
    /// `.png`, leading dot included.
    Literal(&'a str),
    /// `.:ext`, name only.
    Wildcard(&'a str),
}

pub(crate) fn parse_segment(el: &str) -> Segment<'_> {
    if let Some(rest) = el.strip_prefix(':') {
        return match rest.find('.') {
            Some(dot) if dot > 0 => {
                let (name, suffix) = rest.split_at(dot);
                let ext = match suffix.strip_prefix(".:") {
                    Some(ext_name) if !ext_name.is_empty() => Extension::Wildcard(ext_name),
                    _ => Extension::Literal(suffix),
                };
                Segment::Wildcard {
                    name,
                    ext: Some(ext),
                }
            }
            _ => Segment::Wildcard {
                name: rest,
                ext: None,
            },
        };
    }
    if let Some(rest) = el.strip_prefix('*') {
        let (name, suffix) = match rest.find('.') {
            Some(dot) if dot > 0 => rest.split_at(dot),
            _ => (rest, ""),
        };
        return Segment::Star { name, suffix };
    }
    Segment::Literal(el)
}

/// Split a key into elements, dropping one leading and one trailing empty
/// element. Empty elements in the middle (`//`) are kept.
pub(crate) fn split_path(key: &str) -> Vec<&str> {
    let mut elements: Vec<&str> = key.split('/').collect();
    if elements.first() == Some(&"") {
        elements.remove(0);
    }
    if elements.last() == Some(&"") {
        elements.pop();
    }
    elements
}

type Found<'t, V> = (&'t Leaf<V>, Vec<String>);

/// Keep whichever of the two matches was inserted first.
fn earliest<'t, V>(current: Option<Found<'t, V>>, candidate: Found<'t, V>) -> Option<Found<'t, V>> {
    match current {
        Some(current) if current.0.order <= candidate.0.order => Some(current),
        _ => Some(candidate),
    }
}

#[derive(Debug, Clone)]
struct Node<V> {
    edges: HashMap<String, Node<V>>,
    wildcard: Option<Box<Node<V>>>,
    ext_literals: HashMap<String, Node<V>>,
    ext_wildcard: Option<Box<Node<V>>>,
    leaf: Option<Leaf<V>>,
    star: Option<Leaf<V>>,
    star_suffix: String,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            edges: HashMap::new(),
            wildcard: None,
            ext_literals: HashMap::new(),
            ext_wildcard: None,
            leaf: None,
            star: None,
            star_suffix: String::new(),
        }
    }

    fn add(
        &mut self,
        key: &str,
        order: usize,
        elements: &[&str],
        mut wildcards: Vec<String>,
        value: V,
    ) -> Result<(), TreeError> {
        let Some((el, rest)) = elements.split_first() else {
            if self.leaf.is_some() {
                return Err(TreeError::DuplicatePath(key.to_string()));
            }
            self.leaf = Some(Leaf {
                value,
                wildcards,
                order,
            });
            return Ok(());
        };

        match parse_segment(el) {
            Segment::Wildcard { name, ext } => {
                if name.is_empty() {
                    return Err(TreeError::EmptyWildcardName(key.to_string()));
                }
                wildcards.push(name.to_string());
                let child = match ext {
                    None => &mut **self.wildcard.get_or_insert_with(|| Box::new(Node::new())),
                    Some(Extension::Literal(suffix)) => self
                        .ext_literals
                        .entry(suffix.to_string())
                        .or_insert_with(Node::new),
                    Some(Extension::Wildcard(ext_name)) => {
                        wildcards.push(ext_name.to_string());
                        &mut **self
                            .ext_wildcard
                            .get_or_insert_with(|| Box::new(Node::new()))
                    }
                };
                child.add(key, order, rest, wildcards, value)
            }
            Segment::Star { name, suffix } => {
                if name.is_empty() {
                    return Err(TreeError::EmptyWildcardName(key.to_string()));
                }
                if !rest.is_empty() {
                    return Err(TreeError::StarNotLast(key.to_string()));
                }
                if self.star.is_some() {
                    return Err(TreeError::DuplicatePath(key.to_string()));
                }
                wildcards.push(name.to_string());
                self.star = Some(Leaf {
                    value,
                    wildcards,
                    order,
                });
                self.star_suffix = suffix.to_string();
                Ok(())
            }
            Segment::Literal(literal) => self
                .edges
                .entry(literal.to_string())
                .or_insert_with(Node::new)
                .add(key, order, rest, wildcards, value),
        }
    }

    fn find<'t>(&'t self, elements: &[&str], exp: &mut Vec<String>) -> Option<Found<'t, V>> {
        let Some((el, rest)) = elements.split_first() else {
            return self.leaf.as_ref().map(|leaf| (leaf, exp.clone()));
        };

        let mut found = self.edges.get(*el).and_then(|next| next.find(rest, exp));

        if let Some(candidate) = self.find_wildcard(el, rest, exp) {
            found = earliest(found, candidate);
        }

        if let Some(star) = &self.star {
            if found.as_ref().is_none_or(|(leaf, _)| leaf.order > star.order) {
                if let Some(captured) = self.star_capture(elements) {
                    let mut expansions = exp.clone();
                    expansions.push(captured);
                    found = Some((star, expansions));
                }
            }
        }

        found
    }

    fn star_capture(&self, elements: &[&str]) -> Option<String> {
        let joined = elements.join("/");
        if self.star_suffix.is_empty() {
            return Some(joined);
        }
        joined
            .strip_suffix(self.star_suffix.as_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    }

    /// Extension-qualified wildcards are more specific than a bare `:name`
    /// and are tried first.
    fn find_wildcard<'t>(
        &'t self,
        el: &str,
        rest: &[&str],
        exp: &mut Vec<String>,
    ) -> Option<Found<'t, V>> {
        let mut found = None;
        for (suffix, node) in &self.ext_literals {
            let Some(stem) = el.strip_suffix(suffix.as_str()) else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }
            exp.push(stem.to_string());
            let candidate = node.find(rest, exp);
            exp.pop();
            if let Some(candidate) = candidate {
                found = earliest(found, candidate);
            }
        }
        if found.is_some() {
            return found;
        }

        if let Some(node) = &self.ext_wildcard {
            if let Some((stem, ext)) = el.rsplit_once('.') {
                if !stem.is_empty() && !ext.is_empty() {
                    exp.push(stem.to_string());
                    exp.push(ext.to_string());
                    let candidate = node.find(rest, exp);
                    exp.truncate(exp.len() - 2);
                    if candidate.is_some() {
                        return candidate;
                    }
                }
            }
        }

        let node = self.wildcard.as_ref()?;
        exp.push(el.to_string());
        let candidate = node.find(rest, exp);
        exp.pop();
        candidate
    }
}

/// Trie over `/`-separated path segments.
#[derive(Debug, Clone)]
pub struct PathTree<V> {
    root: Node<V>,
    leafs: usize,
    len: usize,
}

impl<V> Default for PathTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PathTree<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            leafs: 0,
            len: 0,
        }
    }

    /// Insert `key` with its value.
    ///
    /// Fails when the key is relative, when a leaf already sits at the same
    /// tree position, or when a `*name` element is followed by anything. A
    /// failed insert leaves previously added keys reachable.
    pub fn add(&mut self, key: &str, value: V) -> Result<(), TreeError> {
        if !key.starts_with('/') {
            return Err(TreeError::RelativePath(key.to_string()));
        }
        self.leafs += 1;
        self.root
            .add(key, self.leafs, &split_path(key), Vec::new(), value)?;
        self.len += 1;
        Ok(())
    }

    /// Look up `path`, returning the matching leaf and the values captured by
    /// each wildcard along the way.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<(&Leaf<V>, Vec<String>)> {
        if !path.starts_with('/') {
            return None;
        }
        let elements = split_path(path);
        let mut expansions = Vec::with_capacity(elements.len());
        self.root.find(&elements, &mut expansions)
    }

    /// Number of keys successfully inserted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
