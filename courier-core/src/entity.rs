//! Delivery parties and the orders that link them.
//!
//! These records belong to the external data layer. The planner only reads
//! an agent's speed, an origin's preparation time and the destination/origin
//! pairing carried by each order.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{Fixed, ObjectId};

/// Lifecycle state shared by agents, origins and destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Status {
    /// Available for work.
    #[default]
    Active,
    /// Registered but not currently working.
    Inactive,
    /// Barred from receiving work.
    Suspended,
}

/// The mobile party whose route is planned.
///
/// # Examples
/// ```
/// use courier_core::{Agent, Fixed};
///
/// let agent = Agent::new("Ada", "555-0100", Fixed::from_int(20)?)?;
/// assert!(agent.is_active());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    /// Stable identity.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Contact number.
    pub phone: String,
    /// Travel speed in kilometres per unit of time.
    pub speed: Fixed,
    /// Availability.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Status,
}

/// Errors returned by [`Agent::new`] and [`Agent::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    /// Speed must be strictly positive.
    #[error("agent {id} has non-positive speed {speed}")]
    NonPositiveSpeed {
        /// Offending agent.
        id: ObjectId,
        /// Rejected speed.
        speed: Fixed,
    },
}

impl Agent {
    /// Create an active agent with a fresh identity.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        speed: Fixed,
    ) -> Result<Self, AgentError> {
        let agent = Self {
            id: ObjectId::new(),
            name: name.into(),
            phone: phone.into(),
            speed,
            status: Status::Active,
        };
        agent.validate()?;
        Ok(agent)
    }

    /// Re-check invariants on a value that bypassed [`Agent::new`].
    pub const fn validate(&self) -> Result<(), AgentError> {
        if self.speed.is_positive() {
            Ok(())
        } else {
            Err(AgentError::NonPositiveSpeed {
                id: self.id,
                speed: self.speed,
            })
        }
    }

    /// Whether the agent may be assigned work.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Replace the identity, keeping every other field.
    #[must_use]
    pub const fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    /// Replace the status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// A pickup party, such as a kitchen, with a typical preparation time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Origin {
    /// Stable identity.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Contact number.
    pub phone: String,
    /// Availability.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Status,
    /// Average time before an order is ready for collection.
    pub preparation_time: Fixed,
}

/// Errors returned by [`Origin::new`] and [`Origin::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OriginError {
    /// Preparation time cannot be negative.
    #[error("origin {id} has negative preparation time {preparation_time}")]
    NegativePreparationTime {
        /// Offending origin.
        id: ObjectId,
        /// Rejected value.
        preparation_time: Fixed,
    },
}

impl Origin {
    /// Create an active origin with a fresh identity.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        preparation_time: Fixed,
    ) -> Result<Self, OriginError> {
        let origin = Self {
            id: ObjectId::new(),
            name: name.into(),
            phone: phone.into(),
            status: Status::Active,
            preparation_time,
        };
        origin.validate()?;
        Ok(origin)
    }

    /// Re-check invariants on a value that bypassed [`Origin::new`].
    pub const fn validate(&self) -> Result<(), OriginError> {
        if self.preparation_time.is_negative() {
            Err(OriginError::NegativePreparationTime {
                id: self.id,
                preparation_time: self.preparation_time,
            })
        } else {
            Ok(())
        }
    }

    /// Replace the identity, keeping every other field.
    #[must_use]
    pub const fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }
}

/// A delivery party.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    /// Stable identity.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Contact number.
    pub phone: String,
    /// Availability.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Status,
}

impl Destination {
    /// Create an active destination with a fresh identity.
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            phone: phone.into(),
            status: Status::Active,
        }
    }

    /// Replace the identity, keeping every other field.
    #[must_use]
    pub const fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }
}

/// Progress of an order through fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum OrderStatus {
    /// Placed, not yet collected.
    #[default]
    Pending,
    /// Collected, not yet delivered.
    InProgress,
    /// Delivered.
    Completed,
    /// Withdrawn.
    Cancelled,
}

/// A request to carry goods from an origin to a destination.
///
/// Every order contributes one precedence requirement: its origin must be
/// visited before its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Stable identity.
    pub id: ObjectId,
    /// Party receiving the goods.
    pub destination_id: ObjectId,
    /// Party preparing the goods.
    pub origin_id: ObjectId,
    /// Order value.
    pub amount: Fixed,
    /// Placement time.
    pub placed_at: DateTime<Utc>,
    /// Fulfilment state.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: OrderStatus,
}

impl Order {
    /// Place a pending order now.
    #[must_use]
    pub fn new(destination_id: ObjectId, origin_id: ObjectId, amount: Fixed) -> Self {
        Self {
            id: ObjectId::new(),
            destination_id,
            origin_id,
            amount,
            placed_at: Utc::now(),
            status: OrderStatus::Pending,
        }
    }

    /// Replace the generated id.
    #[must_use]
    pub const fn with_id(mut self, id: ObjectId) -> Self {
        self.id = id;
        self
    }

    /// Override the placement time.
    #[must_use]
    pub const fn with_placed_at(mut self, placed_at: DateTime<Utc>) -> Self {
        self.placed_at = placed_at;
        self
    }
}
