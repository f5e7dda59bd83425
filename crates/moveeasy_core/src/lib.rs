//! Data-access core for MoveEasy.
//!
//! Users own a single address, any number of contacts and the shared vehicle
//! sightings they report; bus stops and lines are ownerless reference data.
//! Every row is soft-deleted, and unbounded listings run under a deadline.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{DbConfig, LogConfig};
pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::address::Address;
pub use model::bus::{BusLine, BusStop, NewBusLine};
pub use model::contact::Contact;
pub use model::shared_vehicle::{SharedVehicle, VehicleType};
pub use model::user::User;
pub use model::validation::ValidationError;
pub use model::{EntityId, EntityStatus, EpochMillis, Lifecycle, OwnerId};
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::bounded::{BoundedExecutor, Deadline, QueryOutcome};
pub use repo::bus_repo::{BusRepository, SqliteBusRepository};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::shared_vehicle_repo::{SharedVehicleRepository, SqliteSharedVehicleRepository};
pub use repo::upsert::UpsertOutcome;
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{StoreError, StoreResult};
pub use service::address_service::AddressService;
pub use service::bus_service::BusService;
pub use service::contact_service::ContactService;
pub use service::shared_vehicle_service::SharedVehicleService;
pub use service::user_service::UserService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
