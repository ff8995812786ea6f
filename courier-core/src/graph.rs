//! Directed, weighted graph rooted at the travelling agent.

use std::collections::HashMap;

use thiserror::Error;

use crate::{Category, Fixed, GraphNode, ObjectId};

/// A directed, weighted connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<N> {
    /// Tail of the edge.
    pub from: N,
    /// Head of the edge.
    pub to: N,
    /// Travel time from `from` to `to`.
    pub weight: Fixed,
}

/// Errors raised while assembling a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The root must be the agent.
    #[error("graph root {object_id} is not an agent")]
    RootNotAgent {
        /// Rejected root.
        object_id: ObjectId,
    },
    /// The node is already present.
    #[error("node {object_id} is already in the graph")]
    DuplicateNode {
        /// Repeated node.
        object_id: ObjectId,
    },
    /// Only the root may be an agent.
    #[error("node {object_id} would be a second agent")]
    SecondAgent {
        /// Extra agent.
        object_id: ObjectId,
    },
    /// An edge endpoint is not in the graph.
    #[error("node {object_id} is not in the graph")]
    UnknownNode {
        /// Missing endpoint.
        object_id: ObjectId,
    },
    /// Edges must join distinct nodes.
    #[error("self-loop on {object_id}")]
    SelfLoop {
        /// Node on both ends.
        object_id: ObjectId,
    },
    /// Travel times cannot be negative.
    #[error("edge {from} -> {to} has negative weight {weight}")]
    NegativeWeight {
        /// Tail.
        from: ObjectId,
        /// Head.
        to: ObjectId,
        /// Rejected weight.
        weight: Fixed,
    },
}

/// Node set plus outgoing adjacency, rooted at a single agent.
///
/// Nodes keep their insertion order, root first; route finders rely on that
/// order for deterministic bit assignment.
///
/// # Examples
/// ```
/// use courier_core::{Fixed, Graph, Node, ObjectId};
///
/// let agent = Node::agent(ObjectId::from_u128(1));
/// let stop = Node::destination(ObjectId::from_u128(2));
/// let mut graph = Graph::new(agent)?;
/// graph.add_node(stop)?;
/// graph.add_edge(agent, stop, Fixed::from_hundredths(150))?;
/// assert_eq!(graph.edges(&agent).len(), 1);
/// assert!(graph.edges(&stop).is_empty());
/// # Ok::<(), courier_core::GraphError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Graph<N> {
    root: N,
    nodes: Vec<N>,
    adjacency: HashMap<N, Vec<Edge<N>>>,
}

impl<N: GraphNode> Graph<N> {
    /// Start a graph whose root is the agent node `root`.
    pub fn new(root: N) -> Result<Self, GraphError> {
        if root.category() != Category::Agent {
            return Err(GraphError::RootNotAgent {
                object_id: root.object_id(),
            });
        }
        let mut adjacency = HashMap::new();
        adjacency.insert(root.clone(), Vec::new());
        Ok(Self {
            nodes: vec![root.clone()],
            root,
            adjacency,
        })
    }

    /// Add a non-agent node.
    pub fn add_node(&mut self, node: N) -> Result<(), GraphError> {
        if self.adjacency.contains_key(&node) {
            return Err(GraphError::DuplicateNode {
                object_id: node.object_id(),
            });
        }
        if node.is_agent() {
            return Err(GraphError::SecondAgent {
                object_id: node.object_id(),
            });
        }
        self.adjacency.insert(node.clone(), Vec::new());
        self.nodes.push(node);
        Ok(())
    }

    /// Add a directed edge between two distinct nodes already in the graph.
    pub fn add_edge(&mut self, from: N, to: N, weight: Fixed) -> Result<(), GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop {
                object_id: from.object_id(),
            });
        }
        if weight.is_negative() {
            return Err(GraphError::NegativeWeight {
                from: from.object_id(),
                to: to.object_id(),
                weight,
            });
        }
        if !self.adjacency.contains_key(&to) {
            return Err(GraphError::UnknownNode {
                object_id: to.object_id(),
            });
        }
        let Some(outgoing) = self.adjacency.get_mut(&from) else {
            return Err(GraphError::UnknownNode {
                object_id: from.object_id(),
            });
        };
        outgoing.push(Edge { from, to, weight });
        Ok(())
    }

    /// The agent node every route starts from.
    #[must_use]
    pub const fn root(&self) -> &N {
        &self.root
    }

    /// Every node, root first, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Outgoing edges of `node`; empty when the node is unknown.
    #[must_use]
    pub fn edges(&self, node: &N) -> &[Edge<N>] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Whether `node` belongs to the graph.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Nodes of one category, in insertion order.
    pub fn nodes_in(&self, category: Category) -> impl Iterator<Item = &N> {
        self.nodes
            .iter()
            .filter(move |node| node.category() == category)
    }
}
