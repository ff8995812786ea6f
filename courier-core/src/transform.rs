//! Conversion of recorded locations into graph nodes.

use thiserror::Error;

use crate::store::{OriginStore, StoreError};
use crate::{Category, Fixed, GeoNode, Location, Node, ObjectId, OriginError};

/// Errors raised while turning a [`Location`] into a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// An origin location refers to a party the origin store does not know.
    #[error("origin {object_id} is not registered")]
    UnknownOrigin {
        /// The unresolved party.
        object_id: ObjectId,
    },
    /// A registered origin holds an invalid record.
    #[error(transparent)]
    InvalidOrigin(#[from] OriginError),
    /// The origin store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Turns recorded locations into graph nodes.
pub trait NodeTransformer: Send + Sync {
    /// Convert one location.
    fn transform_one(
        &self,
        location: &Location,
        origins: &dyn OriginStore,
    ) -> Result<GeoNode, TransformError>;

    /// Convert every location, preserving order.
    fn transform_many(
        &self,
        locations: &[Location],
        origins: &dyn OriginStore,
    ) -> Result<Vec<GeoNode>, TransformError> {
        locations
            .iter()
            .map(|location| self.transform_one(location, origins))
            .collect()
    }
}

/// Copies identity, role and coordinates; origins take their preparation
/// time as the ready time.
#[derive(Debug, Default, Clone, Copy)]
pub struct HaversineNodeTransformer;

impl NodeTransformer for HaversineNodeTransformer {
    fn transform_one(
        &self,
        location: &Location,
        origins: &dyn OriginStore,
    ) -> Result<GeoNode, TransformError> {
        let ready_time = match location.category {
            Category::Origin => match origins.origin(&location.object_id) {
                Ok(origin) => {
                    origin.validate()?;
                    origin.preparation_time
                }
                Err(StoreError::NotFound { .. }) => {
                    return Err(TransformError::UnknownOrigin {
                        object_id: location.object_id,
                    });
                }
                Err(err) => return Err(err.into()),
            },
            Category::Destination | Category::Agent => Fixed::ZERO,
        };
        let node = Node::new(location.object_id, location.category, ready_time);
        Ok(GeoNode::new(node, location.coordinates))
    }
}

/// Identifier for a node transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TransformStrategy {
    /// [`HaversineNodeTransformer`].
    #[default]
    Haversine,
}

impl TransformStrategy {
    /// Resolve the strategy to its transformer.
    #[must_use]
    pub const fn transformer(self) -> &'static dyn NodeTransformer {
        match self {
            Self::Haversine => &HaversineNodeTransformer,
        }
    }
}
