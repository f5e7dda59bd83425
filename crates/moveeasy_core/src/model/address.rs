//! Postal address owned by a user.
//!
//! # Invariants
//! - At most one active address exists per user; writes go through
//!   `AddOrUpdate`, not a database constraint.
//! - `user_id` is immutable after creation.

use super::validation::FieldSource;
use super::{EntityId, Lifecycle, OwnerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub id: EntityId,
    pub user_id: OwnerId,
    pub street: String,
    /// Digits only; kept as text to preserve leading zeros.
    pub number: String,
    /// Eight-digit postal code.
    pub postal_code: String,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state abbreviation.
    pub state: String,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Address {
    pub fn new(
        user_id: OwnerId,
        street: impl Into<String>,
        number: impl Into<String>,
        postal_code: impl Into<String>,
        neighborhood: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            street: street.into(),
            number: number.into(),
            postal_code: postal_code.into(),
            neighborhood: neighborhood.into(),
            city: city.into(),
            state: state.into(),
            lifecycle: Lifecycle::default(),
        }
    }
}

impl FieldSource for Address {
    const ENTITY: &'static str = "address";

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "street" => Some(&self.street),
            "number" => Some(&self.number),
            "postal_code" => Some(&self.postal_code),
            "neighborhood" => Some(&self.neighborhood),
            "city" => Some(&self.city),
            "state" => Some(&self.state),
            _ => None,
        }
    }
}
