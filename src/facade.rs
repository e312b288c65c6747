//! Facade emitter: walks a finished taxonomy and describes the generated
//! surface as plain data.
//!
//! Nothing is constructed here: every descriptor only records a shape for
//! the external emission layer (type names, field names, entry points,
//! registration list). Construction semantics are part of the contract and
//! documented on each descriptor.

use serde::{Deserialize, Serialize};

use crate::naming::NameAllocator;
use crate::source::EventSource;
use crate::taxonomy::{BranchKind, BranchNode, Taxonomy};

/// One leaf entry point.
///
/// A consumer constructs the bound runtime object as
/// `EventPoint::new(category_logger, event_id, event_path)` and exposes it
/// under `property_name` on the owning facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPointDef {
    pub property_name: String,
    pub event_id: i32,
    pub event_path: String,
}

/// One composite facade for an area or group node.
///
/// The constructor-equivalent takes a single logging-category instance,
/// wires it into every owned entry point, and recursively instantiates
/// every child facade with that same instance. `type_name` is unique across
/// the whole source; `field_name` is the display identifier the parent
/// exposes this facade under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeDef {
    pub type_name: String,
    pub field_name: String,
    pub kind: BranchKind,
    pub points: Vec<EventPointDef>,
    pub children: Vec<FacadeDef>,
}

/// The root facade.
///
/// Its constructor-equivalent takes one fully constructed instance of each
/// area facade and exposes them as named fields, in the order given here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootFacadeDef {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub areas: Vec<FacadeDef>,
}

/// Batch registration for a host dependency-injection container.
///
/// Every listed type (root plus every area and group facade, never leaf
/// entry points) is registered scoped-per-request, generic over the
/// caller's logging category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDef {
    pub scoped_types: Vec<String>,
}

/// Everything the emission layer needs for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeDescription {
    pub source_name: String,
    pub root: RootFacadeDef,
    pub registration: RegistrationDef,
}

impl FacadeDescription {
    /// Describe the full facade surface for one finished tree.
    ///
    /// Type names are drawn from a source-level allocator seeded with the
    /// root name, so an area or group whose derived name collides with the
    /// root (or with another node across the tree) picks up a numeric
    /// suffix. The registration list is root first, then facades in
    /// depth-first presentation order.
    pub fn emit(source: &EventSource, taxonomy: &Taxonomy) -> Self {
        let mut type_names = NameAllocator::new();
        let root_type = type_names.allocate(&source.root_facade_name());
        let mut scoped_types = vec![root_type.clone()];

        let areas = taxonomy
            .areas()
            .iter()
            .map(|area| emit_branch(area, &mut type_names, &mut scoped_types))
            .collect();

        Self {
            source_name: source.name.clone(),
            root: RootFacadeDef {
                type_name: root_type,
                namespace: source.namespace.clone(),
                areas,
            },
            registration: RegistrationDef { scoped_types },
        }
    }
}

fn emit_branch(
    node: &BranchNode,
    type_names: &mut NameAllocator,
    scoped_types: &mut Vec<String>,
) -> FacadeDef {
    let base = format!("{}Facade", node.path_segments.join(""));
    let type_name = type_names.allocate(&base);
    scoped_types.push(type_name.clone());

    let points = node
        .events
        .iter()
        .map(|event| EventPointDef {
            property_name: event.display_ident.clone(),
            event_id: event.event_id,
            event_path: event.event_path.clone(),
        })
        .collect();
    let children = node
        .groups
        .iter()
        .map(|group| emit_branch(group, type_names, scoped_types))
        .collect();

    FacadeDef {
        type_name,
        field_name: node.display_ident.clone(),
        kind: node.kind,
        points,
        children,
    }
}

// ============================================================================
// Tests
// ============================================================================
