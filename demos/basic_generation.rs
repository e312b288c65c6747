//! Basic facade generation from a flat constant set.
//!
//! This example shows how to:
//! - Describe an event source in code
//! - Generate the hierarchical facade description
//! - Walk areas, groups, and entry points
//! - Read the diagnostics produced alongside
//! - Drive a generated entry point through a sink

use std::sync::Arc;

use event_facade::*;

fn main() {
    // Describe a source the way a config loader would
    let source = EventSource::new(
        "MyApp",
        vec![
            EventMember::new("APP_Start", 1),
            EventMember::new("APP_Stop", 2),
            EventMember::new("DB_Connection_Open", 3),
            EventMember::new("DB_Connection_Close", 4),
            EventMember::new("DB_Query", 0),
            EventMember::new("STARTUP", 6),
        ],
    );

    println!("=== Basic Generation Example ===\n");

    // 1. Run the pipeline
    let output = generate(&source).unwrap();

    // 2. The root facade carries one field per area
    println!("Root facade: {}", output.facade.root.type_name);
    for area in &output.facade.root.areas {
        print_branch(area, 1);
    }
    println!();

    // 3. Registration order: root first, then facades in tree order
    println!("Types to register:");
    for type_name in &output.facade.registration.scoped_types {
        println!("  {}", type_name);
    }
    println!();

    // 4. Diagnostics never block generation
    println!("Diagnostics ({}):", output.diagnostics.len());
    for diagnostic in &output.diagnostics {
        println!("  {}", diagnostic);
    }
    println!();

    // 5. Wire one generated point into the runtime seam
    let db = output
        .facade
        .root
        .areas
        .iter()
        .find(|a| a.field_name == "Db")
        .unwrap();
    let query = &db.points[0];

    let sink = Arc::new(CaptureSink::new());
    let point = EventPoint::new(sink.clone(), query.event_id, query.event_path.clone());
    point.log(Level::Info, None, "query finished on {} in {}ms", &[&"users", &12]);

    println!("Captured events:");
    for event in sink.events() {
        println!(
            "  [{}] #{} {}: {} {:?}",
            event.level, event.event_id, event.event_path, event.message, event.args
        );
    }
}

fn print_branch(branch: &FacadeDef, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{} ({})", indent, branch.field_name, branch.type_name);
    for point in &branch.points {
        println!("{}  .{} -> id {}, path '{}'", indent, point.property_name, point.event_id, point.event_path);
    }
    for child in &branch.children {
        print_branch(child, depth + 1);
    }
}
