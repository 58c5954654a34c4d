//! Compressed prefix tree for request paths.
//!
//! # Responsibilities
//! - Store handlers under `/`-delimited patterns
//! - Match a request path in O(path length)
//! - Capture named parameters and the trailing wildcard
//!
//! # Pattern Syntax
//! - `/v5/order/create`: static
//! - `/v5/user/:uid/info`: `:name` matches one non-empty segment
//! - `/files/*rest`: `*name` matches the remainder (possibly empty) and
//!   must be the final segment
//!
//! # Design Decisions
//! - Fragments are raw bytes, so node splits never have to respect UTF-8
//!   boundaries; captures are taken from the request `&str` at segment
//!   boundaries only
//! - Children are dispatched through a dense table indexed by
//!   `first_byte - min_first_byte`, rebuilt on every insertion
//! - Lookup backtracks: a failed literal branch falls back to the
//!   parameter child, then to the node's own wildcard, so the longest
//!   applicable prefix wins
//! - Captures are pushed into a `Vec` that never allocates for purely
//!   static matches

use std::fmt;

use crate::routing::error::TreeError;

#[derive(Clone)]
enum NodeKind {
    Static,
    Param(Box<str>),
}

#[derive(Debug, Clone)]
struct Wildcard<T> {
    name: Box<str>,
    value: T,
}

/// A node of the path tree. The root is created with [`PathNode::new`].
#[derive(Clone)]
pub struct PathNode<T> {
    kind: NodeKind,
    /// Literal bytes consumed by this node. Empty for the root and for
    /// parameter nodes.
    fragment: Vec<u8>,
    /// Static children, sorted by first byte.
    children: Vec<PathNode<T>>,
    index_base: u8,
    /// `index[b - index_base]` is the child position plus one, zero if absent.
    index: Vec<u16>,
    param: Option<Box<PathNode<T>>>,
    handler: Option<T>,
    wildcard: Option<Wildcard<T>>,
}

impl<T> Default for PathNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathNode<T> {
    pub fn new() -> Self {
        Self::with_kind(NodeKind::Static, Vec::new())
    }

    fn with_kind(kind: NodeKind, fragment: Vec<u8>) -> Self {
        Self {
            kind,
            fragment,
            children: Vec::new(),
            index_base: 0,
            index: Vec::new(),
            param: None,
            handler: None,
            wildcard: None,
        }
    }

    /// Register `value` under `path`.
    ///
    /// Fails with [`TreeError::Duplicate`] if the exact pattern already has
    /// a value, and with [`TreeError::Malformed`] for patterns the matcher
    /// cannot represent.
    pub fn insert(&mut self, path: &str, value: T) -> Result<(), TreeError> {
        let pattern = path
            .strip_prefix('/')
            .ok_or_else(|| TreeError::malformed(path, "path must begin with '/'"))?
            .as_bytes();

        for (i, b) in pattern.iter().enumerate() {
            if matches!(b, b':' | b'*') && i > 0 && pattern[i - 1] != b'/' {
                return Err(TreeError::malformed(
                    path,
                    "parameters and wildcards must start a segment",
                ));
            }
        }

        self.insert_at(pattern, path, value)
    }

    fn insert_at(&mut self, pattern: &[u8], full: &str, value: T) -> Result<(), TreeError> {
        match pattern.first() {
            None => {
                if self.handler.is_some() {
                    return Err(TreeError::Duplicate { path: full.to_string() });
                }
                self.handler = Some(value);
                Ok(())
            }
            Some(b':') => {
                let end = segment_end(pattern, 1);
                let name = &pattern[1..end];
                if name.is_empty() || name.iter().any(|b| matches!(b, b':' | b'*')) {
                    return Err(TreeError::malformed(full, "invalid parameter name"));
                }
                let name = String::from_utf8_lossy(name);
                if let Some(child) = &mut self.param {
                    if let NodeKind::Param(existing) = &child.kind {
                        if **existing != *name {
                            return Err(TreeError::ParamConflict {
                                path: full.to_string(),
                                existing: existing.to_string(),
                                incoming: name.into_owned(),
                            });
                        }
                    }
                    return child.insert_at(&pattern[end..], full, value);
                }

                // attached only once the rest of the pattern is accepted
                let mut child = PathNode::with_kind(NodeKind::Param(Box::from(&*name)), Vec::new());
                child.insert_at(&pattern[end..], full, value)?;
                self.param = Some(Box::new(child));
                Ok(())
            }
            Some(b'*') => {
                let name = &pattern[1..];
                if name.is_empty() {
                    return Err(TreeError::malformed(full, "wildcard needs a name"));
                }
                if name.iter().any(|b| matches!(b, b'/' | b':' | b'*')) {
                    return Err(TreeError::malformed(full, "wildcard must be the final segment"));
                }
                if self.wildcard.is_some() {
                    return Err(TreeError::Duplicate { path: full.to_string() });
                }
                self.wildcard = Some(Wildcard {
                    name: String::from_utf8_lossy(name).into(),
                    value,
                });
                Ok(())
            }
            Some(&first) => {
                let end = pattern
                    .iter()
                    .position(|b| matches!(b, b':' | b'*'))
                    .unwrap_or(pattern.len());
                let literal = &pattern[..end];

                if let Some(pos) = self.child_position(first) {
                    let child = &mut self.children[pos];
                    let common = common_prefix(&child.fragment, literal);
                    if common < child.fragment.len() {
                        child.split(common);
                    }
                    return child.insert_at(&pattern[common..], full, value);
                }

                let mut child = PathNode::with_kind(NodeKind::Static, literal.to_vec());
                child.insert_at(&pattern[end..], full, value)?;
                self.children.push(child);
                self.rebuild_index();
                Ok(())
            }
        }
    }

    /// Move everything past `at` into a single new child.
    fn split(&mut self, at: usize) {
        let tail = PathNode {
            kind: NodeKind::Static,
            fragment: self.fragment.split_off(at),
            children: std::mem::take(&mut self.children),
            index_base: self.index_base,
            index: std::mem::take(&mut self.index),
            param: self.param.take(),
            handler: self.handler.take(),
            wildcard: self.wildcard.take(),
        };
        self.children = vec![tail];
        self.rebuild_index();
    }

    fn first_byte(&self) -> u8 {
        self.fragment.first().copied().unwrap_or(0)
    }

    fn rebuild_index(&mut self) {
        self.children.sort_by_key(PathNode::first_byte);
        self.index.clear();
        self.index_base = 0;

        let (Some(lo), Some(hi)) = (
            self.children.first().map(PathNode::first_byte),
            self.children.last().map(PathNode::first_byte),
        ) else {
            return;
        };

        self.index_base = lo;
        self.index = vec![0; usize::from(hi - lo) + 1];
        for (pos, child) in self.children.iter().enumerate() {
            self.index[usize::from(child.first_byte() - lo)] = pos as u16 + 1;
        }
    }

    fn child_position(&self, byte: u8) -> Option<usize> {
        let slot = byte.checked_sub(self.index_base)?;
        match self.index.get(usize::from(slot)) {
            Some(&pos) if pos > 0 => Some(usize::from(pos - 1)),
            _ => None,
        }
    }

    /// Match a request path. Never fails; `None` means no route.
    pub fn find<'n, 'p>(&'n self, path: &'p str) -> Option<(&'n T, Params<'n, 'p>)> {
        let rest = path.strip_prefix('/')?;
        let mut params = Params::new();
        if rest.is_empty() {
            return self.handler.as_ref().map(|h| (h, params));
        }
        let value = self.lookup(rest, 0, &mut params)?;
        Some((value, params))
    }

    fn lookup<'n, 'p>(
        &'n self,
        path: &'p str,
        pos: usize,
        params: &mut Params<'n, 'p>,
    ) -> Option<&'n T> {
        let rest = &path.as_bytes()[pos..];

        if rest.is_empty() {
            if let Some(handler) = &self.handler {
                return Some(handler);
            }
        } else {
            if let Some(child) = self.child_position(rest[0]).map(|i| &self.children[i]) {
                if rest.starts_with(&child.fragment) {
                    let mark = params.len();
                    if let Some(value) = child.lookup(path, pos + child.fragment.len(), params) {
                        return Some(value);
                    }
                    params.truncate(mark);
                }
            }

            if let Some(param) = &self.param {
                let len = segment_end(rest, 0);
                if let (true, Some(segment), NodeKind::Param(name)) =
                    (len > 0, path.get(pos..pos + len), &param.kind)
                {
                    let mark = params.len();
                    params.push(name, segment);
                    if let Some(value) = param.lookup(path, pos + len, params) {
                        return Some(value);
                    }
                    params.truncate(mark);
                }
            }
        }

        let wildcard = self.wildcard.as_ref()?;
        params.push(&wildcard.name, path.get(pos..)?);
        Some(&wildcard.value)
    }

    /// Exact lookup by pattern (not by request path), for updating a value
    /// in place.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut T> {
        let pattern = path.strip_prefix('/')?;
        self.get_mut_at(pattern.as_bytes())
    }

    fn get_mut_at(&mut self, pattern: &[u8]) -> Option<&mut T> {
        match pattern.first() {
            None => self.handler.as_mut(),
            Some(b':') => {
                let end = segment_end(pattern, 1);
                let param = self.param.as_mut()?;
                let same_name = matches!(
                    &param.kind,
                    NodeKind::Param(name) if name.as_bytes() == &pattern[1..end]
                );
                if !same_name {
                    return None;
                }
                param.get_mut_at(&pattern[end..])
            }
            Some(b'*') => match self.wildcard.as_mut() {
                Some(w) if w.name.as_bytes() == &pattern[1..] => Some(&mut w.value),
                _ => None,
            },
            Some(&first) => {
                let pos = self.child_position(first)?;
                let child = &mut self.children[pos];
                if !pattern.starts_with(&child.fragment) {
                    return None;
                }
                let consumed = child.fragment.len();
                child.get_mut_at(&pattern[consumed..])
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PathNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("PathNode");
        match &self.kind {
            NodeKind::Static => s.field("fragment", &String::from_utf8_lossy(&self.fragment)),
            NodeKind::Param(name) => s.field("param", name),
        };
        s.field("handler", &self.handler)
            .field("wildcard", &self.wildcard)
            .field("children", &self.children)
            .field("colon", &self.param)
            .finish()
    }
}

fn segment_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|b| *b == b'/')
        .map_or(bytes.len(), |i| from + i)
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Values captured while matching, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params<'n, 'p> {
    entries: Vec<(&'n str, &'p str)>,
}

impl<'n, 'p> Params<'n, 'p> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&'p str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'n str, &'p str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, name: &'n str, value: &'p str) {
        self.entries.push((name, value));
    }

    fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(paths: &[&str]) -> PathNode<String> {
        let mut root = PathNode::new();
        for path in paths {
            root.insert(path, path.to_string()).unwrap();
        }
        root
    }

    fn matched(root: &PathNode<String>, path: &str) -> Option<String> {
        root.find(path).map(|(v, _)| v.clone())
    }

    #[test]
    fn test_static_paths_with_shared_prefixes() {
        let root = tree(&[
            "/v5/order/create",
            "/v5/order/cancel",
            "/v5/order/cancel-all",
            "/v5/position/list",
            "/v3/order",
        ]);

        for path in [
            "/v5/order/create",
            "/v5/order/cancel",
            "/v5/order/cancel-all",
            "/v5/position/list",
            "/v3/order",
        ] {
            assert_eq!(matched(&root, path).as_deref(), Some(path));
        }

        assert_eq!(matched(&root, "/v5/order"), None);
        assert_eq!(matched(&root, "/v5/order/cancel-"), None);
        assert_eq!(matched(&root, "/v5/order/create/"), None);
        assert_eq!(matched(&root, "v5/order/create"), None);
        assert_eq!(matched(&root, "/"), None);
    }

    #[test]
    fn test_split_keeps_existing_handler() {
        let mut root = PathNode::new();
        root.insert("/abcd", 1).unwrap();
        root.insert("/ab", 2).unwrap();
        root.insert("/abxy", 3).unwrap();

        assert_eq!(root.find("/abcd").map(|(v, _)| *v), Some(1));
        assert_eq!(root.find("/ab").map(|(v, _)| *v), Some(2));
        assert_eq!(root.find("/abxy").map(|(v, _)| *v), Some(3));
        assert_eq!(root.find("/abc").map(|(v, _)| *v), None);
    }

    #[test]
    fn test_indexed_dispatch_over_many_children() {
        let paths: Vec<String> = (b'a'..=b'z').map(|c| format!("/{}x", c as char)).collect();
        let mut root = PathNode::new();
        for (i, path) in paths.iter().enumerate() {
            root.insert(path, i).unwrap();
        }
        for (i, path) in paths.iter().enumerate() {
            assert_eq!(root.find(path).map(|(v, _)| *v), Some(i));
        }
        assert!(root.find("/Ax").is_none());
        assert!(root.find("/{x").is_none());
    }

    #[test]
    fn test_duplicate_terminal() {
        let mut root = tree(&["/a/b", "/a/*rest"]);
        assert!(matches!(
            root.insert("/a/b", "again".into()),
            Err(TreeError::Duplicate { .. })
        ));
        assert!(matches!(
            root.insert("/a/*other", "again".into()),
            Err(TreeError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_longest_wildcard_prefix_wins() {
        let root = tree(&["/a/*path", "/a/b/*path"]);

        let (v, params) = root.find("/a/b/c").unwrap();
        assert_eq!(v, "/a/b/*path");
        assert_eq!(params.get("path"), Some("c"));

        let (v, params) = root.find("/a/c/d").unwrap();
        assert_eq!(v, "/a/*path");
        assert_eq!(params.get("path"), Some("c/d"));

        let (v, params) = root.find("/a/bx").unwrap();
        assert_eq!(v, "/a/*path");
        assert_eq!(params.get("path"), Some("bx"));

        let (v, params) = root.find("/a/").unwrap();
        assert_eq!(v, "/a/*path");
        assert_eq!(params.get("path"), Some(""));

        assert!(root.find("/a").is_none());
    }

    #[test]
    fn test_backtracks_to_parent_wildcard() {
        let root = tree(&["/a/*path", "/a/b/c", "/a/b/d"]);
        assert_eq!(matched(&root, "/a/b/c").as_deref(), Some("/a/b/c"));
        let (v, params) = root.find("/a/b/e").unwrap();
        assert_eq!(v, "/a/*path");
        assert_eq!(params.get("path"), Some("b/e"));
    }

    #[test]
    fn test_named_parameters() {
        let root = tree(&[
            "/user/:uid",
            "/user/:uid/orders/:oid",
            "/user/me",
        ]);

        assert_eq!(matched(&root, "/user/me").as_deref(), Some("/user/me"));

        let (v, params) = root.find("/user/42").unwrap();
        assert_eq!(v, "/user/:uid");
        assert_eq!(params.get("uid"), Some("42"));

        let (v, params) = root.find("/user/7/orders/99").unwrap();
        assert_eq!(v, "/user/:uid/orders/:oid");
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("uid", "7"), ("oid", "99")]);

        // falls back from the static "me" branch
        let (_, params) = root.find("/user/me/orders/1").unwrap();
        assert_eq!(params.get("uid"), Some("me"));

        assert!(root.find("/user/").is_none());
        assert!(root.find("/user/7/orders").is_none());
    }

    #[test]
    fn test_param_name_conflict() {
        let mut root = tree(&["/user/:uid"]);
        assert!(matches!(
            root.insert("/user/:id/x", "x".into()),
            Err(TreeError::ParamConflict { .. })
        ));
    }

    #[test]
    fn test_rejected_param_pattern_leaves_no_node() {
        let mut root: PathNode<String> = PathNode::new();
        assert!(matches!(
            root.insert("/user/:id/:", "bad".into()),
            Err(TreeError::Malformed { .. })
        ));

        root.insert("/user/:uid", "ok".into()).unwrap();
        let (value, params) = root.find("/user/7").unwrap();
        assert_eq!(value, "ok");
        assert_eq!(params.get("uid"), Some("7"));
    }

    #[test]
    fn test_malformed_patterns() {
        let mut root: PathNode<u8> = PathNode::new();
        for bad in ["no-slash", "/a/*", "/a/*x/b", "/a/**", "/a/b*c", "/a/:", "/a:b"] {
            assert!(
                matches!(root.insert(bad, 0), Err(TreeError::Malformed { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_multibyte_fragments_split_safely() {
        let root = tree(&["/caf\u{e9}", "/caf\u{e8}", "/\u{e9}t\u{e9}/*rest"]);
        assert_eq!(matched(&root, "/caf\u{e9}").as_deref(), Some("/caf\u{e9}"));
        assert_eq!(matched(&root, "/caf\u{e8}").as_deref(), Some("/caf\u{e8}"));
        assert_eq!(matched(&root, "/caf\u{ea}"), None);

        let (_, params) = root.find("/\u{e9}t\u{e9}/\u{fc}ber").unwrap();
        assert_eq!(params.get("rest"), Some("\u{fc}ber"));
    }

    #[test]
    fn test_get_mut_is_exact() {
        let mut root = tree(&["/a/*path", "/a/b"]);
        *root.get_mut("/a/b").unwrap() = "changed".into();
        assert_eq!(matched(&root, "/a/b").as_deref(), Some("changed"));

        assert!(root.get_mut("/a/c").is_none());
        assert!(root.get_mut("/a").is_none());
        assert!(root.get_mut("/a/*path").is_some());
        assert!(root.get_mut("/a/*other").is_none());
    }

    #[test]
    fn test_root_handler_only_matches_root() {
        let mut root = PathNode::new();
        root.insert("/", 0).unwrap();
        root.insert("/*all", 1).unwrap();
        assert_eq!(root.find("/").map(|(v, _)| *v), Some(0));
        assert_eq!(root.find("/x/y").map(|(v, _)| *v), Some(1));
    }
}
