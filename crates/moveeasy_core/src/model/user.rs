//! User account row. Users own addresses, contacts and vehicle reports.

use super::validation::FieldSource;
use super::{EntityId, Lifecycle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    /// Opaque credential hash produced by the token collaborator.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            ..Self::default()
        }
    }
}

impl FieldSource for User {
    const ENTITY: &'static str = "user";

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "email" => Some(&self.email),
            "first_name" => Some(&self.first_name),
            "last_name" => Some(&self.last_name),
            _ => None,
        }
    }
}
