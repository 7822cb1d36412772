use std::collections::HashSet;

use crate::{Frustum, MarkId, MarkSet, PickingMap};

/// A per-frame diagnostic report of mark visibility.
///
/// Independent of the attention loop, produced for UI reporting only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityReport {
    /// The marks fully hidden behind other geometry.
    pub occluded: HashSet<MarkId>,
    /// The marks whose bounding sphere intersects the view frustum.
    pub in_frustum: HashSet<MarkId>,
}

/// Compute the set of fully occluded marks from a full-viewport picking map.
///
/// Every pixel of the map belongs to the nearest unoccluded surface, so a
/// mark whose id appears nowhere is completely hidden. A mark outside the
/// viewport is reported occluded too, the map cannot distinguish the cases.
pub fn occluded_set(map: &PickingMap, set: &MarkSet) -> HashSet<MarkId> {
    let visible: HashSet<MarkId> = map
        .ids()
        .iter()
        .filter(|id| !id.is_background())
        .map(|id| id.mark_id())
        .collect();

    set.marks()
        .iter()
        .map(|mark| mark.id)
        .filter(|id| !visible.contains(id))
        .collect()
}

/// Compute the set of marks inside the view frustum, by bounding sphere.
pub fn in_frustum_set(frustum: &Frustum, set: &MarkSet) -> HashSet<MarkId> {
    set.marks()
        .iter()
        .filter(|mark| {
            let (center, radius) = mark.bounding_sphere();
            frustum.intersects_sphere(center, radius)
        })
        .map(|mark| mark.id)
        .collect()
}

/// Build a full visibility report from a picking map and frustum.
pub fn classify(map: &PickingMap, frustum: &Frustum, set: &MarkSet) -> VisibilityReport {
    VisibilityReport {
        occluded: occluded_set(map, set),
        in_frustum: in_frustum_set(frustum, set),
    }
}
