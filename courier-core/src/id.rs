//! Opaque identities for parties, orders and recorded locations.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Identifier shared by every persisted entity.
///
/// # Examples
/// ```
/// use courier_core::ObjectId;
///
/// let id = ObjectId::from_u128(7);
/// let parsed: ObjectId = id.to_string().parse()?;
/// assert_eq!(parsed, id);
/// # Ok::<(), uuid::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build a deterministic identifier, mostly useful for fixtures.
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ObjectId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for ObjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fresh_ids_are_distinct() {
        assert_ne!(ObjectId::new(), ObjectId::new());
    }

    #[rstest]
    fn displays_hyphenated_uuid() {
        let id = ObjectId::from_u128(1);
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000001");
    }

    #[rstest]
    fn rejects_garbage() {
        assert!("not-a-uuid".parse::<ObjectId>().is_err());
    }
}
