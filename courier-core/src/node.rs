//! Graph vertices carrying only what the route finder needs.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{Category, Coordinates, Fixed, ObjectId};

/// Behaviour shared by every vertex type a [`Graph`](crate::Graph) can hold.
pub trait GraphNode: Clone + Eq + Hash + fmt::Debug {
    /// Identity of the underlying party.
    fn object_id(&self) -> ObjectId;

    /// Role of the underlying party.
    fn category(&self) -> Category;

    /// Earliest time service may begin; zero for non-origin nodes.
    fn ready_time(&self) -> Fixed;

    /// Position, when the node is geographic.
    fn coordinates(&self) -> Option<Coordinates> {
        None
    }

    /// Whether this node is the travelling agent.
    fn is_agent(&self) -> bool {
        self.category() == Category::Agent
    }
}

/// A vertex identified solely by its party.
///
/// Two `Node`s are equal when their object ids match, whatever their
/// category or ready time.
///
/// # Examples
/// ```
/// use courier_core::{Fixed, Node, ObjectId};
///
/// let id = ObjectId::from_u128(1);
/// assert_eq!(Node::origin(id, Fixed::ZERO), Node::origin(id, Fixed::from_hundredths(500)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Node {
    /// Underlying party.
    pub object_id: ObjectId,
    /// Role of the party.
    pub category: Category,
    /// Earliest service time.
    pub ready_time: Fixed,
}

impl Node {
    /// Construct a node.
    #[must_use]
    pub const fn new(object_id: ObjectId, category: Category, ready_time: Fixed) -> Self {
        Self {
            object_id,
            category,
            ready_time,
        }
    }

    /// An agent node.
    #[must_use]
    pub const fn agent(object_id: ObjectId) -> Self {
        Self::new(object_id, Category::Agent, Fixed::ZERO)
    }

    /// An origin node ready at `ready_time`.
    #[must_use]
    pub const fn origin(object_id: ObjectId, ready_time: Fixed) -> Self {
        Self::new(object_id, Category::Origin, ready_time)
    }

    /// A destination node.
    #[must_use]
    pub const fn destination(object_id: ObjectId) -> Self {
        Self::new(object_id, Category::Destination, Fixed::ZERO)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.object_id == other.object_id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object_id.hash(state);
    }
}

impl GraphNode for Node {
    fn object_id(&self) -> ObjectId {
        self.object_id
    }

    fn category(&self) -> Category {
        self.category
    }

    fn ready_time(&self) -> Fixed {
        self.ready_time
    }
}

/// A [`Node`] pinned to a position.
///
/// Equality requires the same party *and* the same coordinates, so two
/// recorded positions of one party are distinct vertices.
#[derive(Debug, Clone, Copy)]
pub struct GeoNode {
    /// Identity, role and ready time.
    pub node: Node,
    /// Where the party is.
    pub coordinates: Coordinates,
}

impl GeoNode {
    /// Construct a geographic node.
    #[must_use]
    pub const fn new(node: Node, coordinates: Coordinates) -> Self {
        Self { node, coordinates }
    }
}

impl PartialEq for GeoNode {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.coordinates == other.coordinates
    }
}

impl Eq for GeoNode {}

impl Hash for GeoNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
        self.coordinates.hash(state);
    }
}

impl GraphNode for GeoNode {
    fn object_id(&self) -> ObjectId {
        self.node.object_id
    }

    fn category(&self) -> Category {
        self.node.category
    }

    fn ready_time(&self) -> Fixed {
        self.node.ready_time
    }

    fn coordinates(&self) -> Option<Coordinates> {
        Some(self.coordinates)
    }
}
