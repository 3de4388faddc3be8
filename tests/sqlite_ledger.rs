//! Lifecycle against the SQLite ledger, including reopening the file.

use vehicle_ledger::{
    import_cars, load_chassis_numbers, CarStatus, ChaincodeHost, ImportSummary, LedgerStore,
    LifecycleConfig, SqliteLedger,
};

fn open(path: &std::path::Path) -> ChaincodeHost<SqliteLedger> {
    let ledger = SqliteLedger::open(path).expect("open ledger");
    ChaincodeHost::new(ledger, LifecycleConfig::default()).with_actor("sqlite-test")
}

#[test]
fn lifecycle_survives_reopen() {
    let temp = tempfile::tempdir().expect("tempdir");
    let db_path = temp.path().join("vlm.db");

    {
        let mut host = open(&db_path);
        assert!(host.invoke(&["createCar", "1000"]).is_ok());
        assert!(host.invoke(&["transferCar", "1000", "Rahul"]).is_ok());
        assert!(host
            .invoke(&["sellnRegisterCar", "1000", "Vaibhav", "TS071", "31DEC2025"])
            .is_ok());
        assert!(host.invoke(&["scrapCar", "1000"]).is_ok());
    }

    let mut host = open(&db_path);
    assert!(host
        .invoke(&["sellnRegisterCar", "1000", "Jyothi", "TS071", "31DEC2025"])
        .is_ok());

    let car = host.car("1000").expect("car");
    assert_eq!(car.owner, "Jyothi");
    assert_eq!(car.status, CarStatus::Registered);

    let history = host.history("1000").expect("history");
    assert_eq!(history.version_count(), 5);
    assert_eq!(history.at_version(1).unwrap().value.owner, "Manufacturer");
    assert_eq!(history.at_version(4).unwrap().value.status, CarStatus::Scrapped);

    let events = host.events("1000").expect("events");
    let kinds: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        kinds,
        vec!["createCar", "transferCar", "sellnRegisterCar", "scrapCar", "sellnRegisterCar"]
    );
    assert!(events.iter().all(|e| e.actor == "sqlite-test"));
}

#[test]
fn rejected_create_does_not_touch_database() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut host = open(&temp.path().join("vlm.db"));

    assert!(host.invoke(&["createCar", "1000"]).is_ok());
    assert_eq!(host.invoke(&["createCar", "1000"]).status, 409);

    assert_eq!(host.store().verify_count().unwrap(), 1);
    assert_eq!(host.store().history_for_key("1000").unwrap().len(), 1);
}

#[test]
fn csv_import_into_sqlite() {
    let temp = tempfile::tempdir().expect("tempdir");
    let csv_path = temp.path().join("fleet.csv");
    std::fs::write(&csv_path, "chassis_number,model\nMA1,Sedan\nMA2,SUV\nMA1,Sedan\n")
        .expect("write csv");

    let mut host = open(&temp.path().join("vlm.db"));
    let rows = load_chassis_numbers(&csv_path).expect("load csv");
    let summary = import_cars(&mut host, &rows).expect("import");

    assert_eq!(summary, ImportSummary { inserted: 2, duplicates: 1 });
    assert_eq!(host.store().keys().unwrap(), vec!["MA1", "MA2"]);

    let cars = host.cars().expect("list");
    assert!(cars.iter().all(|c| c.status == CarStatus::Active));
}
