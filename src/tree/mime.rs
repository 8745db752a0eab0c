//! Detected type handle.

use std::fmt;

use super::{EMPTY, MimeTree, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Node(NodeId),
    Empty,
}

/// A type from a [`MimeTree`], or the empty-input sentinel.
///
/// Handles are cheap copies borrowing the tree. Two handles are equal when
/// they denote the same node of the same tree.
///
/// # Examples
///
/// ```rust
/// let mime = longan::detect(b"<!DOCTYPE html><html></html>");
/// assert_eq!(mime.name(), "text/html");
///
/// // Walk up to the generic text type.
/// assert!(mime.ancestors().any(|m| m.is("text/plain")));
/// ```
#[derive(Clone, Copy)]
pub struct MimeType<'t> {
    tree: &'t MimeTree,
    slot: Slot,
}

/// Strip parameters and surrounding whitespace from a MIME string.
///
/// ```rust
/// assert_eq!(longan::tree::normalize(" Text/Plain ; charset=utf-8"), "Text/Plain");
/// ```
#[inline]
pub fn normalize(candidate: &str) -> &str {
    let essence = match candidate.find(';') {
        Some(pos) => &candidate[..pos],
        None => candidate,
    };
    essence.trim()
}

impl<'t> MimeType<'t> {
    #[inline]
    pub(crate) fn node(tree: &'t MimeTree, id: NodeId) -> Self {
        Self {
            tree,
            slot: Slot::Node(id),
        }
    }

    #[inline]
    pub(crate) fn empty(tree: &'t MimeTree) -> Self {
        Self {
            tree,
            slot: Slot::Empty,
        }
    }

    /// Canonical name, such as `application/zip`.
    pub fn name(&self) -> &'t str {
        match self.slot {
            Slot::Node(id) => self.tree.node(id).def.name.as_str(),
            Slot::Empty => EMPTY,
        }
    }

    /// Aliases accepted by [`is`](Self::is) besides the canonical name.
    pub fn aliases(&self) -> &'t [String] {
        match self.slot {
            Slot::Node(id) => self.tree.node(id).def.aliases.as_slice(),
            Slot::Empty => &[],
        }
    }

    /// Advisory file extension without the leading dot.
    pub fn extension(&self) -> Option<&'t str> {
        match self.slot {
            Slot::Node(id) => self.tree.node(id).def.extension.as_deref(),
            Slot::Empty => None,
        }
    }

    /// Whether `candidate` names this type or one of its aliases.
    ///
    /// Parameters (`; charset=...`) and surrounding whitespace are ignored
    /// and the comparison is ASCII case-insensitive.
    ///
    /// ```rust
    /// let zip = longan::detect(b"PK\x03\x04\x14\x00");
    /// assert!(zip.is("application/zip"));
    /// assert!(zip.is("Application/X-Zip; foo=bar"));
    /// assert!(!zip.is("application/pdf"));
    /// ```
    pub fn is(&self, candidate: &str) -> bool {
        let candidate = normalize(candidate);
        self.name().eq_ignore_ascii_case(candidate)
            || self
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(candidate))
    }

    /// Whether any of `candidates` names this type.
    pub fn is_any<'a>(&self, candidates: impl IntoIterator<Item = &'a str>) -> bool {
        candidates.into_iter().any(|candidate| self.is(candidate))
    }

    /// The next more generic type, or `None` at the root and for the
    /// empty-input sentinel.
    pub fn parent(&self) -> Option<MimeType<'t>> {
        match self.slot {
            Slot::Node(id) => self
                .tree
                .node(id)
                .parent
                .map(|parent| MimeType::node(self.tree, parent)),
            Slot::Empty => None,
        }
    }

    /// This type followed by each of its ancestors up to the root.
    #[inline]
    pub fn ancestors(&self) -> Ancestors<'t> {
        Ancestors { next: Some(*self) }
    }

    /// More specific types registered under this one, in precedence order.
    pub fn children(&self) -> Children<'t> {
        let ids: &'t [NodeId] = match self.slot {
            Slot::Node(id) => self.tree.node(id).children.as_slice(),
            Slot::Empty => &[],
        };
        Children {
            tree: self.tree,
            ids: ids.iter(),
        }
    }

    /// Whether this is the root of its tree.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.slot == Slot::Node(NodeId::ROOT)
    }

    /// Whether this is the empty-input sentinel.
    #[inline]
    pub fn is_empty_input(&self) -> bool {
        self.slot == Slot::Empty
    }

    /// Number of parent links between this type and the root.
    pub fn depth(&self) -> usize {
        self.ancestors().count().saturating_sub(1)
    }
}

impl PartialEq for MimeType<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.slot == other.slot
    }
}

impl Eq for MimeType<'_> {}

impl fmt::Display for MimeType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for MimeType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimeType")
            .field("name", &self.name())
            .field("extension", &self.extension())
            .finish()
    }
}

/// Iterator returned by [`MimeType::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'t> {
    next: Option<MimeType<'t>>,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = MimeType<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Iterator returned by [`MimeType::children`].
#[derive(Debug, Clone)]
pub struct Children<'t> {
    tree: &'t MimeTree,
    ids: std::slice::Iter<'t, NodeId>,
}

impl<'t> Iterator for Children<'t> {
    type Item = MimeType<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| MimeType::node(self.tree, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magic::Matcher;
    use crate::tree::{MimeDef, MimeTreeBuilder, OCTET_STREAM};

    fn tree() -> MimeTree {
        let mut builder = MimeTreeBuilder::new();
        let root = builder.root();
        let text = builder.add(root, MimeDef::new("text/plain", Matcher::Always).extension("txt"));
        builder.add(
            text,
            MimeDef::new("text/html", Matcher::prefix(b"<html"))
                .alias("application/xhtml-ish")
                .extension(".html"),
        );
        builder.build().unwrap()
    }

    #[test]
    fn test_is_normalises_candidates() {
        let tree = tree();
        let html = tree.lookup("text/html").unwrap();
        assert!(html.is("text/html"));
        assert!(html.is("TEXT/HTML"));
        assert!(html.is("text/html; charset=utf-8"));
        assert!(html.is("  text/html  "));
        assert!(html.is("Application/XHTML-ish;q=0.9"));
        assert!(!html.is("text/plain"));
        assert!(!html.is(""));
        assert!(html.is_any(["image/png", "text/html"]));
        assert!(!html.is_any(Vec::<&str>::new()));
    }

    #[test]
    fn test_parent_chain_reaches_root() {
        let tree = tree();
        let html = tree.lookup("text/html").unwrap();
        let names: Vec<&str> = html.ancestors().map(|m| m.name()).collect();
        assert_eq!(names, vec!["text/html", "text/plain", OCTET_STREAM]);
        assert_eq!(html.depth(), 2);
        assert!(tree.root().parent().is_none());
        assert!(tree.root().is_root());
    }

    #[test]
    fn test_extension_strips_dot() {
        let tree = tree();
        assert_eq!(tree.lookup("text/html").unwrap().extension(), Some("html"));
        assert_eq!(tree.lookup("text/plain").unwrap().extension(), Some("txt"));
        assert_eq!(tree.root().extension(), None);
    }

    #[test]
    fn test_empty_sentinel() {
        let tree = tree();
        let empty = tree.empty();
        assert_eq!(empty.name(), EMPTY);
        assert!(empty.is("inode/x-empty"));
        assert!(empty.is_empty_input());
        assert!(empty.parent().is_none());
        assert_eq!(empty.children().count(), 0);
        assert_eq!(empty.extension(), None);
        assert_ne!(empty, tree.root());
    }

    #[test]
    fn test_equality_is_per_tree() {
        let a = tree();
        let b = tree();
        assert_eq!(a.lookup("text/plain"), a.lookup("text/plain"));
        assert_ne!(a.lookup("text/plain").unwrap(), b.lookup("text/plain").unwrap());
        assert_eq!(a.root().to_string(), OCTET_STREAM);
    }
}
