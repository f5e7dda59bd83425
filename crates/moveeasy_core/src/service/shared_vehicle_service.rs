//! Shared vehicle use-case service.

use crate::model::shared_vehicle::SharedVehicle;
use crate::model::{EntityId, OwnerId};
use crate::repo::bounded::Deadline;
use crate::repo::shared_vehicle_repo::SharedVehicleRepository;
use crate::service::{require_coordinates, require_id, ServiceResult};
use std::time::Duration;

pub struct SharedVehicleService<R: SharedVehicleRepository> {
    repo: R,
    list_timeout: Duration,
}

impl<R: SharedVehicleRepository> SharedVehicleService<R> {
    pub fn new(repo: R, list_timeout: Duration) -> Self {
        Self { repo, list_timeout }
    }

    pub fn report_vehicle(&self, vehicle: &SharedVehicle) -> ServiceResult<EntityId> {
        require_id(vehicle.user_id, "shared vehicle user id")?;
        require_coordinates(vehicle.latitude, vehicle.longitude)?;
        Ok(self.repo.create_shared_vehicle(vehicle)?)
    }

    pub fn get_vehicle(&self, id: EntityId) -> ServiceResult<Option<SharedVehicle>> {
        require_id(id, "shared vehicle id")?;
        Ok(self.repo.get_shared_vehicle(id)?)
    }

    pub fn list_vehicles(&self) -> ServiceResult<Vec<SharedVehicle>> {
        let deadline = Deadline::after(self.list_timeout);
        Ok(self.repo.list_shared_vehicles(deadline)?)
    }

    pub fn move_vehicle(&self, vehicle: &SharedVehicle) -> ServiceResult<bool> {
        require_id(vehicle.user_id, "shared vehicle user id")?;
        require_id(vehicle.id, "shared vehicle id")?;
        require_coordinates(vehicle.latitude, vehicle.longitude)?;
        Ok(self.repo.update_shared_vehicle_location(vehicle)?)
    }

    pub fn remove_vehicle(&self, user_id: OwnerId, id: EntityId) -> ServiceResult<bool> {
        require_id(user_id, "shared vehicle user id")?;
        require_id(id, "shared vehicle id")?;
        Ok(self.repo.soft_delete_shared_vehicle(user_id, id)?)
    }
}
