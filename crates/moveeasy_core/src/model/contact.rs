//! Phone contact owned by a user. A user may hold any number of contacts.

use super::validation::FieldSource;
use super::{EntityId, Lifecycle, OwnerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: EntityId,
    pub user_id: OwnerId,
    pub name: String,
    /// International dialing prefix, three digits.
    pub country_code: String,
    /// Regional dialing prefix, three digits.
    pub area_code: String,
    /// Subscriber number, nine digits.
    pub phone_number: String,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl Contact {
    pub fn new(
        user_id: OwnerId,
        name: impl Into<String>,
        country_code: impl Into<String>,
        area_code: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            user_id,
            name: name.into(),
            country_code: country_code.into(),
            area_code: area_code.into(),
            phone_number: phone_number.into(),
            lifecycle: Lifecycle::default(),
        }
    }
}

impl FieldSource for Contact {
    const ENTITY: &'static str = "contact";

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "country_code" => Some(&self.country_code),
            "area_code" => Some(&self.area_code),
            "phone_number" => Some(&self.phone_number),
            _ => None,
        }
    }
}
