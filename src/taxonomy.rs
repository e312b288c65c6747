//! Taxonomy builder: merges one source's flat members into the
//! Area/Group/Event tree.
//!
//! Construction walks members in source declaration order, so collision
//! suffixes are stable for a given input. Presentation order is decided at
//! finalization: every node's children are sorted by display identifier,
//! independent of insertion order.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::GenerateError;
use crate::naming::{self, NameAllocator};
use crate::path::compose_path;
use crate::source::{EventSource, SourceKind};

/// Kind of a branch node. Leaves are [`EventNode`]s, a separate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    Area,
    Group,
}

/// One leaf event in the finished tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventNode {
    /// Collision-resolved identifier, unique among the leaf siblings of one
    /// parent (groups live in a separate namespace and may repeat it).
    pub display_ident: String,
    /// Unsuffixed normalized segments from area to leaf. Suffixes never
    /// leak into paths, so the path does not depend on insertion order.
    pub path_segments: Vec<String>,
    /// Index of the originating member in the source's member list.
    pub member_index: usize,
    /// Fully composed dotted path, base prefix included.
    pub event_path: String,
    /// Member value narrowed to the host event-id width.
    pub event_id: i32,
}

/// An area or group node with its children in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNode {
    pub kind: BranchKind,
    pub display_ident: String,
    pub path_segments: Vec<String>,
    pub groups: Vec<BranchNode>,
    pub events: Vec<EventNode>,
}

impl BranchNode {
    /// Number of leaf events in this subtree.
    pub fn event_count(&self) -> usize {
        self.events.len() + self.groups.iter().map(BranchNode::event_count).sum::<usize>()
    }
}

/// The finished tree for one source: the sorted list of area roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    source_name: String,
    areas: Vec<BranchNode>,
}

impl Taxonomy {
    /// Build the tree from one source, in member declaration order.
    ///
    /// Fails without building anything when the source is not a constant
    /// set, has no members, or carries a value outside the 32-bit event-id
    /// width. Naming problems never fail: normalization and allocation
    /// always produce a usable identifier.
    pub fn build(source: &EventSource) -> Result<Self, GenerateError> {
        if source.kind != SourceKind::ConstantSet {
            return Err(GenerateError::UnsupportedTarget {
                source_name: source.name.clone(),
                kind: source.kind,
            });
        }
        if source.members.is_empty() {
            return Err(GenerateError::EmptySource { source_name: source.name.clone() });
        }

        let base_path = source.base_path();
        let mut areas: IndexMap<String, BranchScope> = IndexMap::new();
        let mut area_names = NameAllocator::new();

        for (member_index, member) in source.members.iter().enumerate() {
            let event_id =
                i32::try_from(member.value).map_err(|_| GenerateError::ValueOutOfRange {
                    source_name: source.name.clone(),
                    member: member.name.clone(),
                    value: member.value,
                })?;
            let tokens = naming::tokenize(&member.name);

            let area = area_scope(&mut areas, &mut area_names, &tokens.first);
            match tokens.rest.split_last() {
                // Degenerate name: the single token is both area and leaf.
                None => area.push_event(&tokens.first, member_index, event_id, base_path),
                Some((leaf, middles)) => {
                    let mut scope = area;
                    for raw in middles {
                        scope = scope.descend(raw);
                    }
                    scope.push_event(leaf, member_index, event_id, base_path);
                }
            }
        }

        let mut area_nodes: Vec<BranchNode> =
            areas.into_values().map(BranchScope::finish).collect();
        area_nodes.sort_by(|a, b| a.display_ident.cmp(&b.display_ident));

        Ok(Self { source_name: source.name.clone(), areas: area_nodes })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Area roots, sorted by display identifier.
    pub fn areas(&self) -> &[BranchNode] {
        &self.areas
    }

    /// Total number of leaf events across all areas.
    pub fn event_count(&self) -> usize {
        self.areas.iter().map(BranchNode::event_count).sum()
    }
}

/// Select or create the area for a raw first token.
///
/// Areas are keyed by the raw token: the same raw token always merges into
/// one area, while distinct raw tokens that normalize to the same
/// identifier become separate areas with allocator-suffixed names.
fn area_scope<'a>(
    areas: &'a mut IndexMap<String, BranchScope>,
    area_names: &mut NameAllocator,
    raw: &str,
) -> &'a mut BranchScope {
    match areas.entry(raw.to_string()) {
        Entry::Occupied(slot) => slot.into_mut(),
        Entry::Vacant(slot) => {
            let normalized = naming::normalize_segment(raw);
            let display_ident = area_names.allocate(&normalized);
            slot.insert(BranchScope::new(BranchKind::Area, display_ident, vec![normalized]))
        }
    }
}

// ============================================================================
// Construction scope: mutable node state while members are inserted
// ============================================================================

#[derive(Debug)]
struct BranchScope {
    kind: BranchKind,
    display_ident: String,
    path_segments: Vec<String>,
    groups: IndexMap<String, BranchScope>,
    events: Vec<EventNode>,
    /// Groups and events allocate from separate namespaces: a group and an
    /// event under the same parent may share a display identifier.
    group_names: NameAllocator,
    event_names: NameAllocator,
}

impl BranchScope {
    fn new(kind: BranchKind, display_ident: String, path_segments: Vec<String>) -> Self {
        Self {
            kind,
            display_ident,
            path_segments,
            groups: IndexMap::new(),
            events: Vec::new(),
            group_names: NameAllocator::new(),
            event_names: NameAllocator::new(),
        }
    }

    /// Select or create the child group for a raw middle token.
    fn descend(&mut self, raw: &str) -> &mut BranchScope {
        match self.groups.entry(raw.to_string()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let normalized = naming::normalize_segment(raw);
                let display_ident = self.group_names.allocate(&normalized);
                let mut segments = self.path_segments.clone();
                segments.push(normalized);
                slot.insert(BranchScope::new(BranchKind::Group, display_ident, segments))
            }
        }
    }

    /// Attach one leaf event for a raw last token.
    fn push_event(&mut self, raw: &str, member_index: usize, event_id: i32, base_path: &str) {
        let normalized = naming::normalize_segment(raw);
        let display_ident = self.event_names.allocate(&normalized);
        let mut segments = self.path_segments.clone();
        segments.push(normalized);
        let event_path = compose_path(base_path, &segments);
        self.events.push(EventNode {
            display_ident,
            path_segments: segments,
            member_index,
            event_path,
            event_id,
        });
    }

    /// Freeze this scope: sort children by display identifier, recurse.
    fn finish(self) -> BranchNode {
        let mut groups: Vec<BranchNode> =
            self.groups.into_values().map(BranchScope::finish).collect();
        groups.sort_by(|a, b| a.display_ident.cmp(&b.display_ident));
        let mut events = self.events;
        events.sort_by(|a, b| a.display_ident.cmp(&b.display_ident));
        BranchNode {
            kind: self.kind,
            display_ident: self.display_ident,
            path_segments: self.path_segments,
            groups,
            events,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
