//! User account service.
//!
//! Password hashing happens upstream; the hash is stored as given.

use crate::model::user::User;
use crate::model::validation::{validate, USER_CONSTRAINTS};
use crate::model::EntityId;
use crate::repo::user_repo::UserRepository;
use crate::service::{require_id, ServiceResult};

pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new account.
    ///
    /// # Errors
    /// - `ServiceError::Store(StoreError::Constraint(_))` when the email is taken.
    pub fn register_user(&self, user: &User) -> ServiceResult<EntityId> {
        validate(user, USER_CONSTRAINTS)?;
        Ok(self.repo.create_user(user)?)
    }

    pub fn get_user(&self, id: EntityId) -> ServiceResult<Option<User>> {
        require_id(id, "user id")?;
        Ok(self.repo.get_user(id)?)
    }

    pub fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self.repo.find_user_by_email(email.trim())?)
    }

    pub fn delete_user(&self, id: EntityId) -> ServiceResult<bool> {
        require_id(id, "user id")?;
        Ok(self.repo.soft_delete_user(id)?)
    }
}
