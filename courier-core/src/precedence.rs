//! Pickup-before-delivery requirements.

use std::collections::{BTreeSet, HashMap};

use crate::{ObjectId, Order};

/// Maps each destination to the origins that must be visited before it.
///
/// # Examples
/// ```
/// use courier_core::{ObjectId, PrecedenceMap};
///
/// let (home, kitchen) = (ObjectId::from_u128(1), ObjectId::from_u128(2));
/// let mut precedence = PrecedenceMap::new();
/// precedence.require(home, kitchen);
/// assert_eq!(precedence.requirements(&home).collect::<Vec<_>>(), vec![&kitchen]);
/// assert_eq!(precedence.requirements(&kitchen).count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecedenceMap {
    requirements: HashMap<ObjectId, BTreeSet<ObjectId>>,
}

impl PrecedenceMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `origin` must precede `destination`.
    pub fn require(&mut self, destination: ObjectId, origin: ObjectId) {
        self.requirements
            .entry(destination)
            .or_default()
            .insert(origin);
    }

    /// Origins required before `destination`, in id order.
    pub fn requirements(&self, destination: &ObjectId) -> impl Iterator<Item = &ObjectId> {
        self.requirements.get(destination).into_iter().flatten()
    }

    /// Derive requirements from every order: each order's origin precedes
    /// its destination.
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        orders
            .iter()
            .map(|order| (order.destination_id, order.origin_id))
            .collect()
    }

    /// Number of destinations with at least one requirement.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether no requirement is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Every destination with its required origins.
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &BTreeSet<ObjectId>)> {
        self.requirements.iter()
    }
}

impl FromIterator<(ObjectId, ObjectId)> for PrecedenceMap {
    fn from_iter<I: IntoIterator<Item = (ObjectId, ObjectId)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (destination, origin) in iter {
            map.require(destination, origin);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fixed;
    use rstest::rstest;

    #[rstest]
    fn orders_collapse_per_destination() {
        let home = ObjectId::from_u128(1);
        let (a, b) = (ObjectId::from_u128(20), ObjectId::from_u128(10));
        let orders = vec![
            Order::new(home, a, Fixed::ZERO),
            Order::new(home, b, Fixed::ZERO),
            Order::new(home, a, Fixed::ZERO),
            Order::new(ObjectId::from_u128(2), a, Fixed::ZERO),
        ];
        let precedence = PrecedenceMap::from_orders(&orders);
        assert_eq!(precedence.len(), 2);
        assert_eq!(
            precedence.requirements(&home).copied().collect::<Vec<_>>(),
            vec![b, a]
        );
    }

    #[rstest]
    fn empty_without_orders() {
        let precedence = PrecedenceMap::from_orders(&[]);
        assert!(precedence.is_empty());
        assert_eq!(precedence.iter().count(), 0);
    }
}
