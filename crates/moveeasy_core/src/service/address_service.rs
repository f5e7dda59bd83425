//! Address use-case service.
//!
//! # Invariants
//! - Writes are validated against `ADDRESS_CONSTRAINTS` first.
//! - Saving always goes through `add_or_update_address`, keeping one active
//!   address per user.

use crate::model::address::Address;
use crate::model::validation::{validate, ADDRESS_CONSTRAINTS};
use crate::model::{EntityId, OwnerId};
use crate::repo::address_repo::AddressRepository;
use crate::repo::upsert::UpsertOutcome;
use crate::service::{require_id, ServiceResult};

pub struct AddressService<R: AddressRepository> {
    repo: R,
}

impl<R: AddressRepository> AddressService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_address(&self, user_id: OwnerId) -> ServiceResult<Option<Address>> {
        require_id(user_id, "address user id")?;
        Ok(self.repo.get_address(user_id)?)
    }

    /// Validates and stores the user's single address.
    pub fn save_address(&self, address: &Address) -> ServiceResult<UpsertOutcome> {
        require_id(address.user_id, "address user id")?;
        validate(address, ADDRESS_CONSTRAINTS)?;
        Ok(self.repo.add_or_update_address(address)?)
    }

    pub fn delete_address(&self, user_id: OwnerId, id: EntityId) -> ServiceResult<bool> {
        require_id(user_id, "address user id")?;
        require_id(id, "address id")?;
        Ok(self.repo.soft_delete_address(user_id, id)?)
    }
}
