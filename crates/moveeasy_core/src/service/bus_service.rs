//! Bus reference-data use-case service.

use crate::model::bus::{BusLine, BusStop, NewBusLine};
use crate::model::validation::{validate, BUS_LINE_CONSTRAINTS, BUS_STOP_CONSTRAINTS};
use crate::model::EntityId;
use crate::repo::bounded::Deadline;
use crate::repo::bus_repo::BusRepository;
use crate::service::{require_coordinates, require_id, ServiceResult};
use std::time::Duration;

pub struct BusService<R: BusRepository> {
    repo: R,
    list_timeout: Duration,
}

impl<R: BusRepository> BusService<R> {
    pub fn new(repo: R, list_timeout: Duration) -> Self {
        Self { repo, list_timeout }
    }

    pub fn create_stop(&self, stop: &BusStop) -> ServiceResult<EntityId> {
        validate(stop, BUS_STOP_CONSTRAINTS)?;
        require_coordinates(stop.latitude, stop.longitude)?;
        Ok(self.repo.create_bus_stop(stop)?)
    }

    pub fn get_stop(&self, id: EntityId) -> ServiceResult<Option<BusStop>> {
        require_id(id, "bus stop id")?;
        Ok(self.repo.get_bus_stop(id)?)
    }

    pub fn list_stops(&self) -> ServiceResult<Vec<BusStop>> {
        Ok(self.repo.list_bus_stops(Deadline::after(self.list_timeout))?)
    }

    pub fn update_stop(&self, stop: &BusStop) -> ServiceResult<bool> {
        require_id(stop.id, "bus stop id")?;
        validate(stop, BUS_STOP_CONSTRAINTS)?;
        require_coordinates(stop.latitude, stop.longitude)?;
        Ok(self.repo.update_bus_stop(stop)?)
    }

    pub fn delete_stop(&self, id: EntityId) -> ServiceResult<bool> {
        require_id(id, "bus stop id")?;
        Ok(self.repo.soft_delete_bus_stop(id)?)
    }

    pub fn create_line(&self, line: &NewBusLine) -> ServiceResult<EntityId> {
        validate(line, BUS_LINE_CONSTRAINTS)?;
        require_id(line.bus_init, "bus line initial stop id")?;
        require_id(line.bus_end, "bus line final stop id")?;
        Ok(self.repo.create_bus_line(line)?)
    }

    pub fn get_line(&self, id: EntityId) -> ServiceResult<Option<BusLine>> {
        require_id(id, "bus line id")?;
        Ok(self.repo.get_bus_line(id)?)
    }

    pub fn list_lines(&self) -> ServiceResult<Vec<BusLine>> {
        Ok(self.repo.list_bus_lines(Deadline::after(self.list_timeout))?)
    }

    pub fn delete_line(&self, id: EntityId) -> ServiceResult<bool> {
        require_id(id, "bus line id")?;
        Ok(self.repo.soft_delete_bus_line(id)?)
    }
}
