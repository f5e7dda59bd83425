use moveeasy_core::repo::upsert::SingletonStore;
use moveeasy_core::{
    Address, AddressRepository, Database, SqliteAddressRepository, SqliteUserRepository,
    UpsertOutcome, User, UserRepository,
};

fn setup() -> (Database, SqliteAddressRepository, i64) {
    let db = Database::open_in_memory().unwrap();
    let user_id = SqliteUserRepository::new(db.clone())
        .create_user(&User::new("ana@example.com", "hash"))
        .unwrap();
    let repo = SqliteAddressRepository::new(db.clone());
    (db, repo, user_id)
}

fn address(user_id: i64, street: &str) -> Address {
    Address::new(
        user_id,
        street,
        "120",
        "01310100",
        "Bela Vista",
        "Sao Paulo",
        "SP",
    )
}

#[test]
fn create_update_delete_lifecycle() {
    let (_db, repo, user_id) = setup();

    let id = repo.create_address(&address(user_id, "Rua A")).unwrap();
    let outcome = repo
        .add_or_update_address(&address(user_id, "Rua B"))
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated(id));

    let loaded = repo.get_address(user_id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.street, "Rua B");
    assert!(loaded.lifecycle.updated_at.is_some());

    assert!(repo.soft_delete_address(user_id, id).unwrap());
    assert!(repo.get_address(user_id).unwrap().is_none());
    assert!(!repo.soft_delete_address(user_id, id).unwrap());
}

#[test]
fn add_or_update_inserts_when_owner_has_no_active_row() {
    let (_db, repo, user_id) = setup();

    let outcome = repo
        .add_or_update_address(&address(user_id, "Rua Nova"))
        .unwrap();
    let UpsertOutcome::Inserted(id) = outcome else {
        panic!("expected insert, got {outcome:?}");
    };

    let loaded = repo.get_address(user_id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert!(loaded.lifecycle.created_at > 0);
    assert!(loaded.lifecycle.updated_at.is_none());
    assert!(loaded.lifecycle.is_active());
}

#[test]
fn repeated_upsert_keeps_a_single_active_row() {
    let (db, repo, user_id) = setup();

    let first = repo
        .add_or_update_address(&address(user_id, "Rua Um"))
        .unwrap();
    let second = repo
        .add_or_update_address(&address(user_id, "Rua Um"))
        .unwrap();
    assert_eq!(second, UpsertOutcome::Updated(first.id().unwrap()));

    let conn = db.conn().unwrap();
    let active: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM address WHERE user_id = ?1 AND deleted_at IS NULL",
            [user_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(active, 1);
}

#[test]
fn upsert_after_soft_delete_creates_a_fresh_row() {
    let (db, repo, user_id) = setup();

    let old_id = repo.create_address(&address(user_id, "Rua Velha")).unwrap();
    assert!(repo.soft_delete_address(user_id, old_id).unwrap());

    let outcome = repo
        .add_or_update_address(&address(user_id, "Rua Nova"))
        .unwrap();
    let new_id = outcome.id().unwrap();
    assert!(matches!(outcome, UpsertOutcome::Inserted(_)));
    assert_ne!(new_id, old_id);

    let conn = db.conn().unwrap();
    let (street, deleted_at): (String, Option<i64>) = conn
        .query_row(
            "SELECT street, deleted_at FROM address WHERE id = ?1",
            [old_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(street, "Rua Velha");
    assert!(deleted_at.is_some());
}

#[test]
fn update_of_deleted_row_reports_not_found() {
    let (_db, repo, user_id) = setup();

    let id = repo.create_address(&address(user_id, "Rua A")).unwrap();
    assert!(repo.soft_delete_address(user_id, id).unwrap());

    let mut changed = address(user_id, "Rua Z");
    changed.id = id;
    assert!(!repo.update_address(&changed).unwrap());
}

#[test]
fn other_owner_cannot_delete_address() {
    let (db, repo, user_id) = setup();
    let intruder = SqliteUserRepository::new(db)
        .create_user(&User::new("bia@example.com", "hash"))
        .unwrap();

    let id = repo.create_address(&address(user_id, "Rua A")).unwrap();
    assert!(!repo.soft_delete_address(intruder, id).unwrap());
    assert!(repo.get_address(user_id).unwrap().is_some());
    assert!(repo.get_address(intruder).unwrap().is_none());
}

#[test]
fn row_deleted_between_lookup_and_update_is_not_matched() {
    let (_db, repo, user_id) = setup();
    repo.create_address(&address(user_id, "Rua A")).unwrap();

    let (found_id, _) = repo.find_active(user_id).unwrap().unwrap();
    assert!(repo.soft_delete_address(user_id, found_id).unwrap());

    assert!(!repo
        .update_matched(found_id, &address(user_id, "Rua B"))
        .unwrap());
    assert!(repo.get_address(user_id).unwrap().is_none());
}

#[test]
fn soft_delete_of_unknown_id_reports_not_found() {
    let (_db, repo, user_id) = setup();
    repo.create_address(&address(user_id, "Rua A")).unwrap();

    assert!(!repo.soft_delete_address(user_id, 4_242).unwrap());
    assert_eq!(repo.get_address(user_id).unwrap().unwrap().street, "Rua A");
}
