//! Use-case services over the repository contracts.
//!
//! # Responsibility
//! - Validate caller input before any store call.
//! - Derive bounded-read deadlines from configuration.
//!
//! # Invariants
//! - Services never swallow store errors; `None`/`false` pass through as-is.
//! - Services remain storage-agnostic (generic over repository traits).

pub mod address_service;
pub mod bus_service;
pub mod contact_service;
pub mod shared_vehicle_service;
pub mod user_service;

use crate::model::validation::ValidationError;
use crate::model::EntityId;
use crate::repo::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// A text field broke its declared constraint.
    Validation(ValidationError),
    /// An id or owner key was zero or negative.
    InvalidId(&'static str),
    /// Coordinates fell outside latitude [-90, 90] or longitude [-180, 180].
    InvalidCoordinates { latitude: f64, longitude: f64 },
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidId(field) => write!(f, "{field} is empty or negative"),
            Self::InvalidCoordinates {
                latitude,
                longitude,
            } => write!(f, "coordinates out of range: ({latitude}, {longitude})"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub(crate) fn require_id(value: EntityId, field: &'static str) -> ServiceResult<()> {
    if value <= 0 {
        return Err(ServiceError::InvalidId(field));
    }
    Ok(())
}

pub(crate) fn require_coordinates(latitude: f64, longitude: f64) -> ServiceResult<()> {
    let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
    if !valid {
        return Err(ServiceError::InvalidCoordinates {
            latitude,
            longitude,
        });
    }
    Ok(())
}
