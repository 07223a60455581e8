use crate::domain::model::{Classification, PathSegment, ReferenceKind, ScalarPosition};

/// `provider` value marking an owner entry that points at a Cortex team.
pub const CORTEX_PROVIDER: &str = "CORTEX";

type Rule = fn(&ScalarPosition) -> bool;

/// Evaluated top to bottom, first match wins.
const RULES: &[(ReferenceKind, Rule)] = &[
    (ReferenceKind::ServiceId, is_service_id),
    (ReferenceKind::CrossReferenceTag, is_cortex_tag),
    (ReferenceKind::CrossReferenceTag, is_dependency_tag),
    (ReferenceKind::OwnerReference, is_cortex_groups),
    (ReferenceKind::OwnerReference, is_cortex_owner_name),
];

/// 判斷 YAML 純量位置代表哪一種 Cortex 參照
pub fn classify(position: &ScalarPosition) -> Classification {
    let value = position.value.trim();
    if value.is_empty() {
        return Classification::none(value);
    }

    let kind = RULES
        .iter()
        .find(|(_, rule)| rule(position))
        .map(|(kind, _)| *kind)
        .unwrap_or(ReferenceKind::None);

    Classification {
        kind,
        value: value.to_string(),
    }
}

fn key_at(position: &ScalarPosition, offset_from_end: usize) -> Option<&str> {
    position
        .segment_from_end(offset_from_end)
        .and_then(PathSegment::as_key)
}

/// The scalar's mapping is an item of the list stored under `list_key`.
fn is_item_of_list(position: &ScalarPosition, list_key: &str) -> bool {
    matches!(position.segment_from_end(1), Some(PathSegment::Index(_)))
        && key_at(position, 2) == Some(list_key)
}

// service:
//   id: <value>
fn is_service_id(position: &ScalarPosition) -> bool {
    position.key() == Some("id") && key_at(position, 1) == Some("service")
}

fn is_cortex_tag(position: &ScalarPosition) -> bool {
    position.key() == Some("x-cortex-tag")
}

// x-cortex-dependencies:
//   - tag: <value>
fn is_dependency_tag(position: &ScalarPosition) -> bool {
    position.key() == Some("tag") && is_item_of_list(position, "x-cortex-dependencies")
}

fn is_cortex_groups(position: &ScalarPosition) -> bool {
    position.key() == Some("x-cortex-groups")
}

// x-cortex-owners:
//   - name: <value>
//     type: group
//     provider: CORTEX
fn is_cortex_owner_name(position: &ScalarPosition) -> bool {
    position.key() == Some("name")
        && position.sibling("provider") == Some(CORTEX_PROVIDER)
        && is_item_of_list(position, "x-cortex-owners")
}
