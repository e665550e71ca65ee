//! End-to-end rental lifecycle tests over a temporary data directory

use chrono::NaiveDate;

use garderobe::config::{AppConfig, StoreConfig};
use garderobe::models::costume::{CreateCostume, EventCategory};
use garderobe::models::member::RegisterMember;
use garderobe::models::rental::{CreateRental, RentalStatus};
use garderobe::repository::Repository;
use garderobe::{AppError, AppState};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn store_config(dir: &tempfile::TempDir) -> StoreConfig {
    StoreConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    }
}

/// AppState over a temp dir seeded with one costume: C1, size M stock 2
fn open_state(dir: &tempfile::TempDir) -> AppState {
    std::fs::write(
        dir.path().join("costumes.csv"),
        "# costumeId,costumeName,eventCategory,price,size:stock...,imagePath\n\
         C1,Vampire Cloak,HALLOWEEN,20.00,M:2,S:1,images/vampire.png\n",
    )
    .unwrap();
    let config = AppConfig {
        store: store_config(dir),
        ..Default::default()
    };
    AppState::open(config).unwrap()
}

fn request(member: &str, size: &str, start: &str, end: &str) -> CreateRental {
    CreateRental {
        member_id: member.into(),
        costume_id: "C1".into(),
        size: size.into(),
        rental_date: date(start),
        return_date: date(end),
    }
}

#[test]
fn fresh_catalog_is_available_and_books_at_catalog_price() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir);

    assert!(state.services.availability.is_available_for_period(
        "C1",
        "M",
        date("2025-07-01"),
        date("2025-07-03"),
    ));

    let rental = state
        .services
        .rentals
        .create_rental(request("M001", "M", "2025-07-01", "2025-07-03"))
        .unwrap();
    assert_eq!(rental.id, "R001");
    assert_eq!(rental.status, RentalStatus::Active);
    assert!((rental.total_cost - 60.0).abs() < 1e-9);
}

#[test]
fn exhausted_stock_rejects_the_third_booking() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir);
    let rentals = &state.services.rentals;

    rentals
        .create_rental(request("M001", "M", "2025-07-01", "2025-07-03"))
        .unwrap();
    rentals
        .create_rental(request("M002", "M", "2025-07-01", "2025-07-03"))
        .unwrap();

    assert!(!state.services.availability.is_available_for_period(
        "C1",
        "M",
        date("2025-07-02"),
        date("2025-07-02"),
    ));
    let err = rentals
        .create_rental(request("M003", "M", "2025-07-02", "2025-07-04"))
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable { .. }));

    // The rejected request reached neither memory nor the store
    assert_eq!(rentals.all_rentals().len(), 2);
    let reloaded = Repository::open(&store_config(&dir)).unwrap();
    assert_eq!(reloaded.rentals.all().len(), 2);
}

#[test]
fn overdue_rental_is_flagged_and_charged_on_return() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir);

    state
        .services
        .rentals
        .create_rental(request("M001", "M", "2025-07-01", "2025-07-03"))
        .unwrap();

    // Scheduled return 2025-07-03, evaluated on 2025-07-06
    let repository = Repository::open(&store_config(&dir)).unwrap();
    let rental = repository.rentals.get_by_id("R001").unwrap();
    assert_eq!(rental.overdue_days(date("2025-07-06")), 3);
    assert!(rental.is_overdue(date("2025-07-06")));

    assert!(repository.rentals.refresh_all_statuses(date("2025-07-06")).unwrap());
    assert_eq!(
        repository.rentals.get_by_id("R001").unwrap().status,
        RentalStatus::Overdue
    );
    assert_eq!(repository.rentals.overdue().len(), 1);

    // Returned three days late at a $20 daily rate: $6 late fee
    let returned = repository
        .rentals
        .return_rental("R001", date("2025-07-06"))
        .unwrap();
    assert_eq!(returned.status, RentalStatus::Returned);
    assert!((returned.late_fee - 6.0).abs() < 1e-9);
    assert!((returned.total_payment() - 66.0).abs() < 1e-9);

    // Terminal state survives further refresh passes
    assert!(!repository.rentals.refresh_all_statuses(date("2025-08-01")).unwrap());
    assert_eq!(
        repository.rentals.get_by_id("R001").unwrap().status,
        RentalStatus::Returned
    );
}

#[test]
fn cancellation_frees_units_and_the_sequence_keeps_growing() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir);
    let rentals = &state.services.rentals;

    let first = rentals
        .create_rental(request("M001", "S", "2025-07-01", "2025-07-03"))
        .unwrap();
    assert_eq!(first.id, "R001");

    // Size S has a single unit; the period is blocked until cancelled
    let err = rentals
        .create_rental(request("M002", "S", "2025-07-02", "2025-07-02"))
        .unwrap_err();
    assert!(matches!(err, AppError::Unavailable { .. }));

    let cancelled = rentals.cancel_rental("R001").unwrap();
    assert_eq!(cancelled.status, RentalStatus::Cancelled);

    let second = rentals
        .create_rental(request("M002", "S", "2025-07-02", "2025-07-02"))
        .unwrap();
    // Cancelled records still pin the id sequence
    assert_eq!(second.id, "R002");
}

#[test]
fn the_store_survives_reload_and_tolerates_bad_rows() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir);

    let created = state
        .services
        .rentals
        .create_rental(request("M001", "M", "2025-07-01", "2025-07-03"))
        .unwrap();

    // Corrupt the store with a truncated row and a comment
    let path = dir.path().join("rentals.csv");
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("# manual note\nR9,broken,row\n");
    std::fs::write(&path, contents).unwrap();

    let reloaded = Repository::open(&store_config(&dir)).unwrap();
    assert_eq!(reloaded.rentals.all(), vec![created]);
}

#[test]
fn member_registration_feeds_the_rental_flow() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir);

    let member = state
        .services
        .members
        .register(RegisterMember {
            name: "Ada Quin".into(),
            phone: "555-0104".into(),
            email: "ada@example.org".into(),
            address: "12 Rue des Masques".into(),
            password: "sesame".into(),
        })
        .unwrap();
    assert_eq!(member.id, "M001");
    state.services.members.login("M001", "sesame").unwrap();

    let rental = state
        .services
        .rentals
        .create_rental(request(&member.id, "M", "2025-07-01", "2025-07-03"))
        .unwrap();
    assert_eq!(
        state.services.rentals.active_member_rentals("M001"),
        vec![rental.clone()]
    );

    // The member cannot be deleted while the rental is open
    let err = state.services.members.delete_member("M001").unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    state
        .services
        .rentals
        .return_rental(&rental.id, date("2025-07-03"))
        .unwrap();
    state.services.members.delete_member("M001").unwrap();
}

#[test]
fn admin_catalog_flow_round_trips_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let state = open_state(&dir);

    let created = state
        .services
        .catalog
        .create_costume(CreateCostume {
            name: "Harlequin".into(),
            category: EventCategory::Carnival,
            price: 15.0,
            sizes: [("L".to_string(), 3)].into_iter().collect(),
            image_path: "images/harlequin.png".into(),
        })
        .unwrap();
    assert_eq!(created.id, "C002"); // C1 is seeded

    let reloaded = Repository::open(&store_config(&dir)).unwrap();
    assert_eq!(reloaded.costumes.get_by_id("C002").unwrap(), created);
    assert_eq!(reloaded.costumes.stock_for("C002", "L"), 3);
}
