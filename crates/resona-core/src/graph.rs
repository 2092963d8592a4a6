//! Declarative signal topology: a labeled, append-only DAG.
//!
//! The topology records how the host runtime's processing units are wired -
//! nothing else. Node parameters live in the typed descriptors from
//! [`crate::node`]; sample execution lives in the host. Keeping the wiring a
//! plain adjacency structure makes topology and parameter mapping
//! independently testable.
//!
//! Topology is immutable after construction in spirit: there is no node or
//! edge removal. A media-context change discards the whole graph and builds a
//! fresh one.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Unique identifier for a node in the topology.
///
/// Ids are assigned sequentially and never reused within a topology instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Errors from topology mutations.
#[derive(Debug, PartialEq, Eq)]
pub enum GraphError {
    /// The referenced node does not exist.
    NodeNotFound(NodeId),
    /// Adding this edge would create a cycle.
    CycleDetected,
    /// An identical edge already exists.
    DuplicateEdge(NodeId, NodeId),
}

impl core::fmt::Display for GraphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id} not found"),
            Self::CycleDetected => write!(f, "adding this edge would create a cycle"),
            Self::DuplicateEdge(a, b) => write!(f, "edge from {a} to {b} already exists"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GraphError {}

struct NodeEntry {
    label: &'static str,
    outgoing: Vec<NodeId>,
    incoming: Vec<NodeId>,
}

/// Labeled adjacency-list DAG describing the signal flow.
#[derive(Default)]
pub struct Topology {
    nodes: Vec<NodeEntry>,
}

impl Topology {
    /// Create an empty topology.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with a debug label. Returns its id.
    pub fn add(&mut self, label: &'static str) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeEntry {
            label,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        id
    }

    /// Connect `from` to `to`.
    ///
    /// Rejects unknown nodes, duplicate edges, self-loops, and any edge that
    /// would make the graph cyclic.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        if from.0 as usize >= self.nodes.len() {
            return Err(GraphError::NodeNotFound(from));
        }
        if to.0 as usize >= self.nodes.len() {
            return Err(GraphError::NodeNotFound(to));
        }
        if self.nodes[from.0 as usize].outgoing.contains(&to) {
            return Err(GraphError::DuplicateEdge(from, to));
        }
        if from == to || self.reaches(to, from) {
            return Err(GraphError::CycleDetected);
        }

        self.nodes[from.0 as usize].outgoing.push(to);
        self.nodes[to.0 as usize].incoming.push(from);
        Ok(())
    }

    /// Depth-first reachability from `start` to `goal`.
    fn reaches(&self, start: NodeId, goal: NodeId) -> bool {
        let mut stack = Vec::new();
        let mut visited = Vec::new();
        visited.resize(self.nodes.len(), false);
        stack.push(start);

        while let Some(node) = stack.pop() {
            if node == goal {
                return true;
            }
            if visited[node.0 as usize] {
                continue;
            }
            visited[node.0 as usize] = true;
            for &next in &self.nodes[node.0 as usize].outgoing {
                stack.push(next);
            }
        }
        false
    }

    /// Debug label of a node.
    pub fn label(&self, id: NodeId) -> Option<&'static str> {
        self.nodes.get(id.0 as usize).map(|n| n.label)
    }

    /// Nodes this node feeds into.
    pub fn outputs_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0 as usize)
            .map_or(&[], |n| n.outgoing.as_slice())
    }

    /// Nodes feeding into this node.
    pub fn inputs_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0 as usize)
            .map_or(&[], |n| n.incoming.as_slice())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.outgoing.len()).sum()
    }
}
