use glam::*;

use crate::IdentityColor;

/// A CPU-side picking buffer, row-major with row 0 at the top.
///
/// Each pixel holds a packed [`IdentityColor`], 0 for background. Regenerated
/// from a readback every time a picking pass runs, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickingMap {
    width: u32,
    height: u32,
    ids: Vec<IdentityColor>,
}

impl PickingMap {
    /// Create a picking map directly from identities.
    pub fn from_ids(width: u32, height: u32, ids: Vec<IdentityColor>) -> Self {
        debug_assert_eq!(ids.len(), (width * height) as usize);
        Self { width, height, ids }
    }

    /// Decode a tightly packed RGBA readback into a picking map.
    ///
    /// Only the RGB channels carry identity, alpha is dropped.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let ids = rgba
            .chunks_exact(4)
            .map(|px| IdentityColor(((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32))
            .collect();

        Self { width, height, ids }
    }

    /// Get the width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the identities, row-major from the top-left corner.
    pub fn ids(&self) -> &[IdentityColor] {
        &self.ids
    }

    /// Get the identity at a pixel, row 0 at the top.
    pub fn get(&self, x: u32, y: u32) -> Option<IdentityColor> {
        (x < self.width && y < self.height)
            .then(|| self.ids[(y * self.width + x) as usize])
    }

    /// Whether an identity of the given mark id appears anywhere in the map.
    pub fn contains_mark(&self, id: u8) -> bool {
        self.ids.iter().any(|c| c.mark_id() == id)
    }
}

/// An unordered collection of identities sampled from a [`PickingMap`].
///
/// Ephemeral, consumed immediately by the attention accumulator. Background
/// pixels are kept, the accumulator is responsible for discarding them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSample(pub Vec<IdentityColor>);

impl RegionSample {
    /// Whether the sample contains no identities at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of sampled pixels.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Extract a square region of the map around a focus point.
///
/// The focus arrives in bottom-up coordinates (the gaze/cursor convention,
/// origin at the bottom-left corner) and is flipped once here onto the map's
/// top-down rows. The square is clamped to the map bounds, a focus entirely
/// off the map yields an empty sample.
pub fn sample_region(map: &PickingMap, focus_x: i32, focus_y: i32, square: u32) -> RegionSample {
    if map.width == 0 || map.height == 0 || square == 0 {
        return RegionSample::default();
    }

    // Flip to top-down rows.
    let center_y = map.height as i32 - 1 - focus_y;
    let half = (square / 2) as i32;

    let x0 = (focus_x - half).clamp(0, map.width as i32);
    let x1 = (focus_x + half + 1).clamp(0, map.width as i32);
    let y0 = (center_y - half).clamp(0, map.height as i32);
    let y1 = (center_y + half + 1).clamp(0, map.height as i32);

    let mut ids = Vec::with_capacity(((x1 - x0).max(0) * (y1 - y0).max(0)) as usize);
    for y in y0..y1 {
        let row = (y * map.width as i32) as usize;
        ids.extend_from_slice(&map.ids[row + x0 as usize..row + x1 as usize]);
    }

    RegionSample(ids)
}

/// Filter a full square sample down to the circular footprint of the given
/// radius around its center.
///
/// The sample must cover the whole `square`-sided window (as produced by an
/// area picking pass, not a clamped [`sample_region`]). Distances compare
/// squared, no square root per pixel.
pub fn circle_mask(sample: &RegionSample, square: u32, radius: u32) -> RegionSample {
    debug_assert_eq!(sample.len(), (square * square) as usize);

    let center = (square / 2) as i32;
    let radius_sq = (radius * radius) as i32;

    let ids = sample
        .0
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            let dx = (*i as u32 % square) as i32 - center;
            let dy = (*i as u32 / square) as i32 - center;
            dx * dx + dy * dy <= radius_sq
        })
        .map(|(_, id)| *id)
        .collect();

    RegionSample(ids)
}

/// Sample a single pixel of the map at a bottom-up focus point.
pub fn sample_point(map: &PickingMap, focus: IVec2) -> Option<IdentityColor> {
    if focus.x < 0 || focus.y < 0 {
        return None;
    }
    let y = map.height as i64 - 1 - focus.y as i64;
    if y < 0 {
        return None;
    }
    map.get(focus.x as u32, y as u32)
}
