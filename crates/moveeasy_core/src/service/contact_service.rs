//! Contact use-case service.

use crate::model::contact::Contact;
use crate::model::validation::{validate, CONTACT_CONSTRAINTS};
use crate::model::{EntityId, OwnerId};
use crate::repo::bounded::Deadline;
use crate::repo::contact_repo::ContactRepository;
use crate::service::{require_id, ServiceResult};
use std::time::Duration;

pub struct ContactService<R: ContactRepository> {
    repo: R,
    list_timeout: Duration,
}

impl<R: ContactRepository> ContactService<R> {
    /// `list_timeout` is the deadline span applied to every listing.
    pub fn new(repo: R, list_timeout: Duration) -> Self {
        Self { repo, list_timeout }
    }

    pub fn create_contact(&self, contact: &Contact) -> ServiceResult<EntityId> {
        require_id(contact.user_id, "contact user id")?;
        validate(contact, CONTACT_CONSTRAINTS)?;
        Ok(self.repo.create_contact(contact)?)
    }

    pub fn get_contact(&self, user_id: OwnerId, id: EntityId) -> ServiceResult<Option<Contact>> {
        require_id(user_id, "contact user id")?;
        require_id(id, "contact id")?;
        Ok(self.repo.get_contact(user_id, id)?)
    }

    pub fn list_contacts(&self, user_id: OwnerId) -> ServiceResult<Vec<Contact>> {
        require_id(user_id, "contact user id")?;
        let deadline = Deadline::after(self.list_timeout);
        Ok(self.repo.list_contacts(user_id, deadline)?)
    }

    pub fn update_contact(&self, contact: &Contact) -> ServiceResult<bool> {
        require_id(contact.user_id, "contact user id")?;
        require_id(contact.id, "contact id")?;
        validate(contact, CONTACT_CONSTRAINTS)?;
        Ok(self.repo.update_contact(contact)?)
    }

    pub fn delete_contact(&self, user_id: OwnerId, id: EntityId) -> ServiceResult<bool> {
        require_id(user_id, "contact user id")?;
        require_id(id, "contact id")?;
        Ok(self.repo.soft_delete_contact(user_id, id)?)
    }
}
