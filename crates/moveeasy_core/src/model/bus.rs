//! Shared bus reference data: stops and the lines running between them.
//!
//! Reference rows have no owner key; every user reads the same data.

use super::validation::FieldSource;
use super::{EntityId, Lifecycle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusStop {
    #[serde(default)]
    pub id: EntityId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub lifecycle: Lifecycle,
}

impl BusStop {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            latitude,
            longitude,
            lifecycle: Lifecycle::default(),
        }
    }
}

impl FieldSource for BusStop {
    const ENTITY: &'static str = "bus stop";

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

/// Write model for a bus line: stops are referenced by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBusLine {
    pub name: String,
    pub bus_init: EntityId,
    pub bus_end: EntityId,
}

impl NewBusLine {
    pub fn new(name: impl Into<String>, bus_init: EntityId, bus_end: EntityId) -> Self {
        Self {
            name: name.into(),
            bus_init,
            bus_end,
        }
    }
}

impl FieldSource for NewBusLine {
    const ENTITY: &'static str = "bus line";

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

/// Read model for a bus line with both terminal stops resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusLine {
    pub id: EntityId,
    pub name: String,
    pub bus_init: BusStop,
    pub bus_end: BusStop,
    pub lifecycle: Lifecycle,
}
