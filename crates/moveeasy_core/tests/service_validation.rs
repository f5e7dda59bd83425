use moveeasy_core::{
    Address, AddressService, BusService, BusStop, Contact, ContactService, Database,
    NewBusLine, ServiceError, SharedVehicle, SharedVehicleService, SqliteAddressRepository,
    SqliteBusRepository, SqliteContactRepository, SqliteSharedVehicleRepository,
    SqliteUserRepository, StoreError, UpsertOutcome, User, UserService, VehicleType,
};
use serde_json::json;
use std::time::Duration;

const LIST_TIMEOUT: Duration = Duration::from_secs(5);

fn setup() -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();
    let users = UserService::new(SqliteUserRepository::new(db.clone()));
    let user_id = users
        .register_user(&User::new("ana@example.com", "argon2-hash"))
        .unwrap();
    (db, user_id)
}

fn valid_address(user_id: i64) -> Address {
    Address::new(
        user_id,
        "Avenida Paulista",
        "1578",
        "01310200",
        "Bela Vista",
        "Sao Paulo",
        "SP",
    )
}

fn validation_message(err: ServiceError) -> String {
    match err {
        ServiceError::Validation(inner) => inner.to_string(),
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn address_rules_reject_before_touching_storage() {
    let (db, user_id) = setup();
    let service = AddressService::new(SqliteAddressRepository::new(db));

    let mut address = valid_address(user_id);
    address.street = "Av".to_string();
    assert_eq!(
        validation_message(service.save_address(&address).unwrap_err()),
        "address street must be between 3-100 characters"
    );

    let mut address = valid_address(user_id);
    address.postal_code = "0131020".to_string();
    assert_eq!(
        validation_message(service.save_address(&address).unwrap_err()),
        "address postal code must have exactly 8 characters"
    );

    let mut address = valid_address(user_id);
    address.number = "12A".to_string();
    assert_eq!(
        validation_message(service.save_address(&address).unwrap_err()),
        "address number must contain only digits in range 0-9"
    );

    assert!(service.get_address(user_id).unwrap().is_none());
}

#[test]
fn address_service_upserts_valid_input() {
    let (db, user_id) = setup();
    let service = AddressService::new(SqliteAddressRepository::new(db));

    let inserted = service.save_address(&valid_address(user_id)).unwrap();
    let mut moved = valid_address(user_id);
    moved.number = "900".to_string();
    let updated = service.save_address(&moved).unwrap();

    assert_eq!(updated, UpsertOutcome::Updated(inserted.id().unwrap()));
    assert_eq!(service.get_address(user_id).unwrap().unwrap().number, "900");
}

#[test]
fn non_positive_ids_are_rejected() {
    let (db, _) = setup();
    let contacts = ContactService::new(SqliteContactRepository::new(db.clone()), LIST_TIMEOUT);
    let addresses = AddressService::new(SqliteAddressRepository::new(db));

    assert!(matches!(
        contacts.list_contacts(0).unwrap_err(),
        ServiceError::InvalidId("contact user id")
    ));
    assert!(matches!(
        contacts.get_contact(1, 0).unwrap_err(),
        ServiceError::InvalidId("contact id")
    ));
    assert!(matches!(
        addresses.delete_address(1, -3).unwrap_err(),
        ServiceError::InvalidId("address id")
    ));
    let err = addresses.save_address(&valid_address(0)).unwrap_err();
    assert_eq!(err.to_string(), "address user id is empty or negative");
}

#[test]
fn contact_service_validates_phone_parts() {
    let (db, user_id) = setup();
    let service = ContactService::new(SqliteContactRepository::new(db), LIST_TIMEOUT);

    let short_phone = Contact::new(user_id, "Mother", "055", "011", "9123");
    assert_eq!(
        validation_message(service.create_contact(&short_phone).unwrap_err()),
        "contact phone number must have exactly 9 characters"
    );

    let blank_name = Contact::new(user_id, "   ", "055", "011", "912345678");
    assert_eq!(
        validation_message(service.create_contact(&blank_name).unwrap_err()),
        "contact name is empty"
    );

    let id = service
        .create_contact(&Contact::new(user_id, "Mother", "055", "011", "912345678"))
        .unwrap();
    let listed = service.list_contacts(user_id).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
}

#[test]
fn vehicle_coordinates_must_be_on_the_globe() {
    let (db, user_id) = setup();
    let service =
        SharedVehicleService::new(SqliteSharedVehicleRepository::new(db), LIST_TIMEOUT);

    let err = service
        .report_vehicle(&SharedVehicle::new(user_id, 91.0, 0.0, VehicleType::Bicycle))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCoordinates { .. }));

    let err = service
        .report_vehicle(&SharedVehicle::new(user_id, 0.0, -180.5, VehicleType::Bicycle))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidCoordinates { .. }));

    service
        .report_vehicle(&SharedVehicle::new(user_id, 90.0, -180.0, VehicleType::Bicycle))
        .unwrap();
    assert_eq!(service.list_vehicles().unwrap().len(), 1);
}

#[test]
fn bus_service_validates_names_and_stop_ids() {
    let db = Database::open_in_memory().unwrap();
    let service = BusService::new(SqliteBusRepository::new(db), LIST_TIMEOUT);

    assert_eq!(
        validation_message(
            service
                .create_stop(&BusStop::new("Al", -23.5, -46.6))
                .unwrap_err()
        ),
        "bus stop name must be between 3-255 characters"
    );

    let first = service
        .create_stop(&BusStop::new("Terminal Bandeira", -23.5489, -46.6388))
        .unwrap();
    let err = service
        .create_line(&NewBusLine::new("Centro", first, 0))
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidId("bus line final stop id")));

    let second = service
        .create_stop(&BusStop::new("Estacao da Luz", -23.5349, -46.6353))
        .unwrap();
    let line_id = service
        .create_line(&NewBusLine::new("Centro", first, second))
        .unwrap();
    assert_eq!(service.list_lines().unwrap()[0].id, line_id);
}

#[test]
fn duplicate_email_surfaces_as_constraint_violation() {
    let (db, _) = setup();
    let users = UserService::new(SqliteUserRepository::new(db));

    let err = users
        .register_user(&User::new("ana@example.com", "other-hash"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Constraint(_))));

    let found = users.find_user_by_email(" ana@example.com ").unwrap().unwrap();
    assert!(users.delete_user(found.id).unwrap());
    assert!(users.get_user(found.id).unwrap().is_none());
}

#[test]
fn serialized_user_never_exposes_password_hash() {
    let (db, user_id) = setup();
    let users = UserService::new(SqliteUserRepository::new(db));

    let user = users.get_user(user_id).unwrap().unwrap();
    assert_eq!(user.password_hash, "argon2-hash");

    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["email"], json!("ana@example.com"));
    assert!(value.get("password_hash").is_none());
    assert_eq!(value["lifecycle"]["deleted_at"], json!(null));
}

#[test]
fn vehicle_type_serializes_as_snake_case_name() {
    let vehicle = SharedVehicle::new(7, -23.5, -46.6, VehicleType::Motorcycle);
    let value = serde_json::to_value(&vehicle).unwrap();
    assert_eq!(value["vehicle_type"], json!("motorcycle"));
    assert_eq!(value["user_id"], json!(7));
}
