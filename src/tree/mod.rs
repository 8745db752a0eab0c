//! The type tree.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Children are
//! owned by the arena in registration order; the parent link is just an
//! index, so the structure stays a strict tree without reference cycles.
//! A tree is assembled with [`MimeTreeBuilder`] and never changes afterwards,
//! which is what makes it safe to share between threads.

mod builder;
mod mime;

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::magic::Matcher;

pub use builder::MimeTreeBuilder;
pub use mime::{Ancestors, Children, MimeType, normalize};

/// Canonical name of the root, the generic binary fallback.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Canonical name of the zero-length input sentinel.
pub const EMPTY: &str = "inode/x-empty";

/// Index of a node inside its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Definition of a type: names, extension hint, and matcher.
///
/// # Examples
///
/// ```rust
/// use longan::magic::Matcher;
/// use longan::tree::MimeDef;
///
/// let zip = MimeDef::new("application/zip", Matcher::prefix(b"PK\x03\x04"))
///     .alias("application/x-zip")
///     .extension("zip");
/// assert_eq!(zip.name(), "application/zip");
/// ```
#[derive(Debug, Clone)]
pub struct MimeDef {
    name: String,
    aliases: SmallVec<[String; 2]>,
    extension: Option<String>,
    matcher: Matcher,
}

impl MimeDef {
    /// New definition. The name is validated when the tree is built.
    pub fn new(name: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            name: name.into(),
            aliases: SmallVec::new(),
            extension: None,
            matcher,
        }
    }

    /// Add an alias accepted by [`MimeType::is`].
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the advisory file extension, without the leading dot.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = Some(extension.trim_start_matches('.').to_string());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) def: MimeDef,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: SmallVec<[NodeId; 4]>,
}

/// Immutable hierarchy of MIME types rooted at `application/octet-stream`
/// (or the root given to the builder).
#[derive(Debug, Clone)]
pub struct MimeTree {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
}

impl MimeTree {
    /// Start building a custom tree.
    #[inline]
    pub fn builder() -> MimeTreeBuilder {
        MimeTreeBuilder::new()
    }

    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        let by_name = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.def.name.clone(), NodeId(index as u32)))
            .collect();
        Self { nodes, by_name }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The root type.
    #[inline]
    pub fn root(&self) -> MimeType<'_> {
        MimeType::node(self, NodeId::ROOT)
    }

    /// The zero-length input sentinel, `inode/x-empty`.
    #[inline]
    pub fn empty(&self) -> MimeType<'_> {
        MimeType::empty(self)
    }

    /// Number of types in the tree (the sentinel is not counted).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a type by canonical name or alias.
    ///
    /// The name is normalised the same way [`MimeType::is`] does it.
    pub fn lookup(&self, name: &str) -> Option<MimeType<'_>> {
        self.lookup_id(name).map(|id| MimeType::node(self, id))
    }

    pub(crate) fn lookup_id(&self, name: &str) -> Option<NodeId> {
        let wanted = normalize(name).to_ascii_lowercase();
        if let Some(&id) = self.by_name.get(&wanted) {
            return Some(id);
        }
        self.nodes
            .iter()
            .position(|node| node.def.aliases.iter().any(|a| a.eq_ignore_ascii_case(&wanted)))
            .map(|index| NodeId(index as u32))
    }

    /// All types, parents before children, siblings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = MimeType<'_>> + '_ {
        let mut stack = vec![NodeId::ROOT];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.node(id).children.iter().rev().copied());
            Some(MimeType::node(self, id))
        })
    }

    /// Walk from the root, descending into the first child that accepts
    /// `data` at each level, and return the deepest node reached.
    ///
    /// Siblings after an accepting child are never tried, even when none of
    /// that child's own children accept. Catalogue order therefore decides
    /// between overlapping siblings.
    pub(crate) fn walk(&self, data: &[u8]) -> NodeId {
        let mut current = NodeId::ROOT;
        'descend: loop {
            for &child in &self.node(current).children {
                if self.node(child).def.matcher.test(data) {
                    tracing::trace!(
                        parent = %self.node(current).def.name,
                        child = %self.node(child).def.name,
                        "descending"
                    );
                    current = child;
                    continue 'descend;
                }
            }
            return current;
        }
    }

    /// Detect the type of an in-memory prefix, inspecting at most
    /// [`READ_LIMIT`](crate::READ_LIMIT) bytes.
    ///
    /// Empty input yields the `inode/x-empty` sentinel; anything else yields
    /// at least the root.
    #[inline]
    pub fn detect(&self, data: &[u8]) -> MimeType<'_> {
        self.detect_with_limit(data, crate::READ_LIMIT)
    }

    /// [`detect`](Self::detect) with an explicit read limit.
    ///
    /// A limit of zero leaves nothing to inspect and yields the empty-input
    /// sentinel, like empty `data` does.
    pub fn detect_with_limit(&self, data: &[u8], read_limit: usize) -> MimeType<'_> {
        let prefix = &data[..data.len().min(read_limit)];
        if prefix.is_empty() {
            return self.empty();
        }
        let mime = MimeType::node(self, self.walk(prefix));
        tracing::debug!(mime = %mime, inspected = prefix.len(), "detected");
        mime
    }
}
