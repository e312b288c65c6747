//! End-to-end generation over a realistic constant set.

use event_facade::*;

fn source(name: &str, members: &[(&str, i64)]) -> EventSource {
    EventSource::new(
        name,
        members.iter().map(|&(n, v)| EventMember::new(n, v)).collect(),
    )
}

fn my_app() -> EventSource {
    source(
        "MyApp",
        &[
            ("APP_Start", 1),
            ("APP_Stop", 2),
            ("DB_Connection_Open", 3),
            ("DB_Connection_Close", 4),
            ("DB_Query", 5),
            ("STARTUP", 6),
        ],
    )
}

fn area<'a>(root: &'a RootFacadeDef, field_name: &str) -> &'a FacadeDef {
    root.areas
        .iter()
        .find(|a| a.field_name == field_name)
        .unwrap_or_else(|| panic!("no area '{field_name}'"))
}

#[test]
fn scenario_produces_expected_shape() {
    let output = generate(&my_app()).unwrap();
    let root = &output.facade.root;

    assert_eq!(root.type_name, "MyAppLogger");

    // Areas come out sorted by display identifier
    let fields: Vec<_> = root.areas.iter().map(|a| a.field_name.as_str()).collect();
    assert_eq!(fields, ["App", "Db", "Startup"]);

    // App holds two leaf points
    let app = area(root, "App");
    assert!(app.children.is_empty());
    let points: Vec<_> = app.points.iter().map(|p| p.property_name.as_str()).collect();
    assert_eq!(points, ["Start", "Stop"]);

    // Db holds a Connection group plus its own Query point
    let db = area(root, "Db");
    assert_eq!(db.children.len(), 1);
    let connection = &db.children[0];
    assert_eq!(connection.field_name, "Connection");
    assert_eq!(connection.type_name, "DbConnectionFacade");
    assert_eq!(db.points.len(), 1);
    assert_eq!(db.points[0].event_path, "Db.Query");
    assert_eq!(db.points[0].event_id, 5);

    // A name without separator becomes both area and event
    let startup = area(root, "Startup");
    assert_eq!(startup.points.len(), 1);
    assert_eq!(startup.points[0].property_name, "Startup");
    assert_eq!(startup.points[0].event_path, "Startup.Startup");
}

#[test]
fn registration_lists_root_then_facades_in_tree_order() {
    let output = generate(&my_app()).unwrap();
    assert_eq!(
        output.facade.registration.scoped_types,
        [
            "MyAppLogger",
            "AppFacade",
            "DbFacade",
            "DbConnectionFacade",
            "StartupFacade",
        ]
    );
}

#[test]
fn member_order_does_not_change_the_description() {
    let forward = my_app();
    let mut members = forward.members.clone();
    members.reverse();
    let reversed = EventSource::new("MyApp", members);

    let a = generate(&forward).unwrap();
    let b = generate(&reversed).unwrap();
    assert_eq!(a.facade, b.facade);
}

#[test]
fn same_spelling_different_case_splits_areas_but_not_paths() {
    // Raw tokens "DB" and "Db" are distinct areas that normalize alike
    let output = generate(&source("MyApp", &[("DB_Open", 1), ("Db_Query", 2)])).unwrap();
    let root = &output.facade.root;

    assert_eq!(root.areas.len(), 2);
    assert_eq!(root.areas[0].field_name, "Db");
    assert_eq!(root.areas[1].field_name, "Db1");
    assert_eq!(root.areas[0].type_name, "DbFacade");
    assert_eq!(root.areas[1].type_name, "DbFacade1");

    // Path segments stay unsuffixed for both
    assert_eq!(root.areas[0].points[0].event_path, "Db.Open");
    assert_eq!(root.areas[1].points[0].event_path, "Db.Query");
}

#[test]
fn members_normalizing_alike_share_a_path_under_distinct_properties() {
    let output = generate(&source("MyApp", &[("APP_Start", 1), ("APP_START", 2)])).unwrap();
    let app = &output.facade.root.areas[0];

    let names: Vec<_> = app.points.iter().map(|p| p.property_name.as_str()).collect();
    assert_eq!(names, ["Start", "Start1"]);
    assert_eq!(app.points[0].event_path, "App.Start");
    assert_eq!(app.points[1].event_path, "App.Start");
    assert_ne!(app.points[0].event_id, app.points[1].event_id);
}

#[test]
fn generated_points_drive_the_runtime_seam() {
    let output = generate(&my_app()).unwrap();
    let db = area(&output.facade.root, "Db");
    let query = &db.points[0];

    let sink = std::sync::Arc::new(CaptureSink::new());
    let point = EventPoint::new(sink.clone(), query.event_id, query.event_path.clone());
    point.log(Level::Info, None, "query finished", &[&"users", &42]);

    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_id, 5);
    assert_eq!(events[0].event_path, "Db.Query");
    assert_eq!(events[0].args, ["users", "42"]);
}

#[test]
fn namespace_and_root_name_flow_through() {
    let mut src = my_app();
    src.namespace = Some("com.example.myapp".to_string());
    src.root_name = Some("AppEvents".to_string());

    let output = generate(&src).unwrap();
    assert_eq!(output.facade.root.type_name, "AppEvents");
    assert_eq!(output.facade.root.namespace.as_deref(), Some("com.example.myapp"));
    assert_eq!(output.facade.registration.scoped_types[0], "AppEvents");
}

#[test]
fn base_path_prefixes_every_event_path() {
    let mut src = source("MyApp", &[("APP_Start", 1), ("DB_Query", 2)]);
    src.base_path = Some("Services.MyApp".to_string());

    let output = generate(&src).unwrap();
    let root = &output.facade.root;
    assert_eq!(area(root, "App").points[0].event_path, "Services.MyApp.App.Start");
    assert_eq!(area(root, "Db").points[0].event_path, "Services.MyApp.Db.Query");
}
