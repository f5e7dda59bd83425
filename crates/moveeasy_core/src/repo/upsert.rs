//! Upsert coordinator for entities with at most one active row per owner.
//!
//! # Responsibility
//! - Decide insert vs. update by looking up the owner's active row.
//! - Report a row that vanished between lookup and update as `Vanished`.
//!
//! # Invariants
//! - Lookup and write are separate statements with no transaction and no lock.
//!   Concurrent upserts for the same owner race; the last update wins.
//! - The coordinator never retries; callers may retry a `Vanished` outcome.

use crate::model::{EntityId, OwnerId};
use crate::repo::StoreResult;
use log::debug;

/// Entity keyed by an owner for upsert purposes.
pub trait OwnerScoped {
    fn owner(&self) -> OwnerId;
}

/// Store operations the coordinator composes.
pub trait SingletonStore {
    type Entity: OwnerScoped;

    /// Entity family name for log events.
    const KIND: &'static str;

    /// Returns the owner's active row, if any.
    fn find_active(&self, owner: OwnerId) -> StoreResult<Option<(EntityId, Self::Entity)>>;

    /// Inserts a new active row and returns its surrogate id.
    fn insert(&self, entity: &Self::Entity) -> StoreResult<EntityId>;

    /// Writes every mutable field of `entity` onto the active row
    /// `(id, entity.owner())`. Returns `false` when no row matched.
    fn update_matched(&self, id: EntityId, entity: &Self::Entity) -> StoreResult<bool>;
}

/// Result of an `AddOrUpdate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No active row existed; a new one was written.
    Inserted(EntityId),
    /// The existing active row was overwritten.
    Updated(EntityId),
    /// The row found by the lookup was deleted before the update ran.
    Vanished,
}

impl UpsertOutcome {
    /// Surrogate id of the row now holding the entity, if any.
    pub fn id(self) -> Option<EntityId> {
        match self {
            Self::Inserted(id) | Self::Updated(id) => Some(id),
            Self::Vanished => None,
        }
    }
}

/// Inserts `entity` when its owner has no active row, otherwise updates it.
///
/// Any identifier carried by `entity` is ignored; the owner key decides.
pub fn add_or_update<S>(store: &S, entity: &S::Entity) -> StoreResult<UpsertOutcome>
where
    S: SingletonStore,
{
    let owner = entity.owner();
    match store.find_active(owner)? {
        None => {
            let id = store.insert(entity)?;
            debug!(
                "event=upsert module=repo status=ok kind={} decision=insert owner={} id={}",
                S::KIND,
                owner,
                id
            );
            Ok(UpsertOutcome::Inserted(id))
        }
        Some((id, _existing)) => {
            if store.update_matched(id, entity)? {
                debug!(
                    "event=upsert module=repo status=ok kind={} decision=update owner={} id={}",
                    S::KIND,
                    owner,
                    id
                );
                Ok(UpsertOutcome::Updated(id))
            } else {
                debug!(
                    "event=upsert module=repo status=ok kind={} decision=vanished owner={} id={}",
                    S::KIND,
                    owner,
                    id
                );
                Ok(UpsertOutcome::Vanished)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{add_or_update, OwnerScoped, SingletonStore, UpsertOutcome};
    use crate::model::{EntityId, OwnerId};
    use crate::repo::StoreResult;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        owner: OwnerId,
        value: &'static str,
    }

    impl OwnerScoped for Profile {
        fn owner(&self) -> OwnerId {
            self.owner
        }
    }

    #[derive(Default)]
    struct FakeStore {
        rows: RefCell<Vec<(EntityId, Profile, bool)>>,
        next_id: Cell<EntityId>,
        delete_before_update: Cell<bool>,
    }

    impl SingletonStore for FakeStore {
        type Entity = Profile;
        const KIND: &'static str = "profile";

        fn find_active(&self, owner: OwnerId) -> StoreResult<Option<(EntityId, Profile)>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .find(|(_, row, deleted)| row.owner == owner && !deleted)
                .map(|(id, row, _)| (*id, row.clone())))
        }

        fn insert(&self, entity: &Profile) -> StoreResult<EntityId> {
            let id = self.next_id.get() + 1;
            self.next_id.set(id);
            self.rows.borrow_mut().push((id, entity.clone(), false));
            Ok(id)
        }

        fn update_matched(&self, id: EntityId, entity: &Profile) -> StoreResult<bool> {
            let mut rows = self.rows.borrow_mut();
            if self.delete_before_update.get() {
                for row in rows.iter_mut() {
                    row.2 = true;
                }
            }
            match rows
                .iter_mut()
                .find(|(row_id, row, deleted)| *row_id == id && row.owner == entity.owner && !deleted)
            {
                Some(row) => {
                    row.1 = entity.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    #[test]
    fn inserts_when_owner_has_no_active_row() {
        let store = FakeStore::default();
        let outcome = add_or_update(&store, &Profile { owner: 1, value: "a" }).unwrap();
        assert_eq!(outcome, UpsertOutcome::Inserted(1));
        assert_eq!(outcome.id(), Some(1));
    }

    #[test]
    fn second_call_updates_the_same_row() {
        let store = FakeStore::default();
        add_or_update(&store, &Profile { owner: 1, value: "a" }).unwrap();
        let outcome = add_or_update(&store, &Profile { owner: 1, value: "b" }).unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated(1));
        let rows = store.rows.borrow();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.value, "b");
    }

    #[test]
    fn row_deleted_between_lookup_and_update_is_reported_as_vanished() {
        let store = FakeStore::default();
        add_or_update(&store, &Profile { owner: 7, value: "a" }).unwrap();
        store.delete_before_update.set(true);

        let outcome = add_or_update(&store, &Profile { owner: 7, value: "b" }).unwrap();
        assert_eq!(outcome, UpsertOutcome::Vanished);
        assert_eq!(outcome.id(), None);
        assert_eq!(store.rows.borrow().len(), 1);
    }
}
