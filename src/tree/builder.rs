//! Tree construction.

use std::collections::HashSet;

use smallvec::SmallVec;

use super::{MimeDef, MimeTree, Node, NodeId, OCTET_STREAM, normalize};
use crate::common::{Error, Result};
use crate::magic::Matcher;

/// Assembles a [`MimeTree`].
///
/// Nodes are appended under a parent; the order of `add` calls is the order
/// in which siblings are tried. Problems (duplicate names, malformed names,
/// a root that does not accept everything, a parent from another builder)
/// are collected and reported once by [`build`](Self::build).
///
/// # Examples
///
/// ```rust
/// use longan::magic::Matcher;
/// use longan::tree::{MimeDef, MimeTreeBuilder};
///
/// let mut builder = MimeTreeBuilder::new();
/// let root = builder.root();
/// builder.add(root, MimeDef::new("image/png", Matcher::prefix(b"\x89PNG\r\n\x1a\n")));
/// let tree = builder.build()?;
///
/// assert_eq!(tree.detect(b"\x89PNG\r\n\x1a\n....").name(), "image/png");
/// # Ok::<(), longan::Error>(())
/// ```
#[derive(Debug)]
pub struct MimeTreeBuilder {
    nodes: Vec<Node>,
    error: Option<Error>,
}

impl Default for MimeTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MimeTreeBuilder {
    /// Builder with a bare `application/octet-stream` root.
    pub fn new() -> Self {
        Self::with_root(MimeDef::new(OCTET_STREAM, Matcher::Always))
    }

    /// Builder with a caller-supplied root. Its matcher must be
    /// [`Matcher::Always`].
    pub fn with_root(root: MimeDef) -> Self {
        Self {
            nodes: vec![Node {
                def: root,
                parent: None,
                children: SmallVec::new(),
            }],
            error: None,
        }
    }

    /// Builder pre-loaded with the built-in catalogue, for extension.
    pub fn builtin() -> Self {
        crate::catalogue::builder()
    }

    /// Id of the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Find a node added so far by canonical name or alias.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        let wanted = normalize(name);
        self.nodes
            .iter()
            .position(|node| {
                node.def.name.eq_ignore_ascii_case(wanted)
                    || node.def.aliases.iter().any(|a| a.eq_ignore_ascii_case(wanted))
            })
            .map(|index| NodeId(index as u32))
    }

    /// Append `def` as the last child of `parent` and return its id.
    pub fn add(&mut self, parent: NodeId, def: MimeDef) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        match self.nodes.get_mut(parent.index()) {
            Some(parent_node) => parent_node.children.push(id),
            None => {
                self.record(Error::InvalidTree(format!(
                    "parent of {} is not part of this tree",
                    def.name
                )));
            },
        }
        self.nodes.push(Node {
            def,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        id
    }

    fn record(&mut self, error: Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Validate and freeze the tree.
    pub fn build(mut self) -> Result<MimeTree> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        let root = &self.nodes[NodeId::ROOT.index()];
        if !root.def.matcher.is_total() {
            return Err(Error::InvalidTree(format!(
                "root {} must accept every input",
                root.def.name
            )));
        }

        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &mut self.nodes {
            let name = validate_name(&node.def.name)?;
            if !seen.insert(name.clone()) {
                return Err(Error::DuplicateType(name));
            }
            node.def.name = name;
        }

        Ok(MimeTree::from_nodes(self.nodes))
    }
}

/// Lower-case a canonical name and reject anything that is not a bare
/// `type/subtype`.
fn validate_name(name: &str) -> Result<String> {
    let valid = !name.is_empty()
        && !name.contains(';')
        && !name.chars().any(char::is_whitespace)
        && name
            .split_once('/')
            .is_some_and(|(kind, subtype)| !kind.is_empty() && !subtype.is_empty());
    if valid {
        Ok(name.to_ascii_lowercase())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}
