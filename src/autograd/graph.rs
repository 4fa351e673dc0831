//! Arena of scalar nodes addressed by stable indices.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

use super::op::Op;
use super::value::Value;

static NEXT_GRAPH: AtomicUsize = AtomicUsize::new(0);

/// Stable index of a node inside its [`Graph`].
///
/// Ids are handed out in creation order, so an operand always has a smaller id than
/// any node built from it. An id also records which graph issued it; using it with any
/// other graph panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: usize,
    pub(crate) index: usize,
}

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Internal node state: forward value, accumulated gradient, and how it was produced.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) value: f64,
    pub(crate) grad: f64,
    pub(crate) label: Option<String>,
    pub(crate) op: Op,
}

/// Owner of every node in a computation graph.
///
/// Nodes are shared by id, never owned by their consumers. Handles ([`Value`]) borrow
/// the graph immutably; node state sits behind a `RefCell` so operations and the
/// backward pass can run through shared handles.
///
/// Nodes are never removed individually. [`Graph::truncate`] drops everything created
/// after a mark, which is how a training loop discards the previous step's graph while
/// keeping its parameters.
pub struct Graph {
    tag: usize,
    pub(crate) nodes: RefCell<Vec<Node>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Graph {
            tag: NEXT_GRAPH.fetch_add(1, Ordering::Relaxed),
            nodes: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    /// Creates a leaf node with gradient 0.0.
    pub fn leaf(&self, data: f64) -> Value<'_> {
        let id = self.push(data, Op::Leaf, None);
        Value::from_parts(self, id)
    }

    /// Creates a labeled leaf node.
    pub fn leaf_labeled(&self, data: f64, label: impl Into<String>) -> Value<'_> {
        let id = self.push(data, Op::Leaf, Some(label.into()));
        Value::from_parts(self, id)
    }

    /// Returns a handle to an existing node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    pub fn value(&self, id: NodeId) -> Value<'_> {
        assert!(
            self.slot(id) < self.len(),
            "node {id} is not in a graph of {} nodes",
            self.len()
        );
        Value::from_parts(self, id)
    }

    /// Number of nodes currently in the arena. Also usable as a mark for [`Graph::truncate`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Whether the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Drops every node with an index `>= mark`.
    ///
    /// Requires `&mut self`, so no handle into the graph can survive the call. Ids below
    /// `mark` stay valid.
    pub fn truncate(&mut self, mark: usize) {
        let nodes = self.nodes.get_mut();
        let before = nodes.len();
        nodes.truncate(mark);
        debug!("graph truncated from {before} to {} nodes", nodes.len());
    }

    /// Forward value of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    #[must_use]
    pub fn data(&self, id: NodeId) -> f64 {
        self.node(id).value
    }

    /// Overwrites a node's forward value (e.g. an optimizer update on a parameter).
    ///
    /// Values of nodes already derived from it are not recomputed.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    pub fn set_data(&self, id: NodeId, data: f64) {
        self.nodes.borrow_mut()[self.slot(id)].value = data;
    }

    /// Accumulated gradient of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    #[must_use]
    pub fn grad(&self, id: NodeId) -> f64 {
        self.node(id).grad
    }

    /// Overwrites a node's gradient.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    pub fn set_grad(&self, id: NodeId, grad: f64) {
        self.nodes.borrow_mut()[self.slot(id)].grad = grad;
    }

    /// Resets the gradient of every listed node to 0.0.
    ///
    /// [`Graph::backward`] only accumulates, so callers reusing nodes across passes
    /// (e.g. model parameters) must zero them first.
    ///
    /// # Panics
    ///
    /// Panics if any id was issued by another graph or was truncated away.
    pub fn zero_grad(&self, ids: impl IntoIterator<Item = NodeId>) {
        let mut nodes = self.nodes.borrow_mut();
        for id in ids {
            nodes[self.slot(id)].grad = 0.0;
        }
    }

    /// Label of a node, if one was set.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<String> {
        self.node(id).label.clone()
    }

    /// Sets a node's label. Labels have no effect on computation.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    pub fn set_label(&self, id: NodeId, label: impl Into<String>) {
        self.nodes.borrow_mut()[self.slot(id)].label = Some(label.into());
    }

    /// Operation that produced a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    #[must_use]
    pub fn op(&self, id: NodeId) -> Op {
        self.node(id).op
    }

    /// Operand ids of a node in slot order, repeated uses included.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by another graph or was truncated away.
    #[must_use]
    pub fn operands(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).op.operands().collect()
    }

    fn node(&self, id: NodeId) -> Ref<'_, Node> {
        let slot = self.slot(id);
        Ref::map(self.nodes.borrow(), |nodes| &nodes[slot])
    }

    /// Arena position of `id`, after checking it was issued by this graph.
    pub(crate) fn slot(&self, id: NodeId) -> usize {
        assert_eq!(
            id.graph, self.tag,
            "node {id} belongs to a different graph"
        );
        id.index
    }

    /// Appends a node and returns its id. Operands of `op` must already be in the arena.
    pub(crate) fn push(&self, value: f64, op: Op, label: Option<String>) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId {
            graph: self.tag,
            index: nodes.len(),
        };
        nodes.push(Node {
            value,
            grad: 0.0,
            label,
            op,
        });
        id
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("len", &self.len()).finish()
    }
}
