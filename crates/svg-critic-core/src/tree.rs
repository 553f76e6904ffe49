//! Owned element tree of an SVG document.
//!
//! The tree is an arena: every element lives in one `Vec` and refers to its
//! parent and children by [`NodeId`]. Index `0` is always the root element.
//! Text content is kept inline as [`Child::Text`] so the document can be
//! written back out without losing labels.

use indexmap::IndexMap;

/// Index of an element inside an [`SvgTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root element of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A child slot of an element: either another element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(NodeId),
    Text(String),
}

/// A single element: qualified tag name, attributes in document order, and
/// children in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Child>,
    parent: Option<NodeId>,
}

impl Node {
    /// Returns the tag name, including a namespace prefix for foreign elements
    /// (`sodipodi:namedview`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute value for `name`, if set.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns all attributes in document order.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Returns the children in document order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Returns the parent element, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the concatenated direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Child::Text(text) => Some(text.as_str()),
                Child::Element(_) => None,
            })
            .collect()
    }
}

/// Arena of elements plus the namespace declarations needed to write the
/// tree back out.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgTree {
    nodes: Vec<Node>,
    namespaces: IndexMap<String, String>,
}

impl SvgTree {
    /// Creates a tree holding only a root element named `root_name`.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                name: root_name.into(),
                attributes: IndexMap::new(),
                children: Vec::new(),
                parent: None,
            }],
            namespaces: IndexMap::new(),
        }
    }

    /// Returns the root element.
    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.0]
    }

    /// Returns the element at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree. Ids are only handed out by
    /// [`SvgTree::append_element`], so this indicates ids mixed across trees.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Returns the element at `id` mutably.
    ///
    /// # Panics
    ///
    /// Same conditions as [`SvgTree::node`].
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Returns the number of elements, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates all element ids in arena order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = NodeId> + use<> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Iterates the element children of `id`, skipping text.
    pub fn element_children(&self, id: NodeId) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.nodes[id.0].children.iter().filter_map(|child| match child {
            Child::Element(child) => Some(*child),
            Child::Text(_) => None,
        })
    }

    /// Appends a new element as the last child of `parent` and returns its id.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attributes: IndexMap<String, String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            attributes,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(Child::Element(id));
        id
    }

    /// Appends a text run as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) {
        self.nodes[parent.0].children.push(Child::Text(text.into()));
    }

    /// Records a namespace declaration (`prefix` → `uri`) for output.
    ///
    /// An empty prefix is the default namespace. The first declaration of a
    /// prefix wins.
    pub fn declare_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.namespaces.entry(prefix.into()).or_insert_with(|| uri.into());
    }

    /// Returns the namespace declarations in the order they were recorded.
    pub fn namespaces(&self) -> &IndexMap<String, String> {
        &self.namespaces
    }
}
