use glam::*;

use crate::{Error, FACE_CAPACITY, Rgb8};

/// The id of a mark.
///
/// Id 0 is reserved for the background sentinel, so valid ids are 1 to 255.
pub type MarkId = u8;

/// A renderable data mark tracked by the attention engine.
///
/// The geometry is triangle soup, vertices are not shared between faces so
/// that per-face flat colors never bleed across triangles.
#[derive(Debug, Clone)]
pub struct Mark {
    /// The id of the mark.
    pub id: MarkId,
    /// The base color of the mark.
    pub base_color: Rgb8,
    /// The triangle soup positions, three per face.
    pub positions: Vec<Vec3>,
}

impl Mark {
    /// Create a new mark.
    pub fn new(id: MarkId, base_color: Rgb8, positions: Vec<Vec3>) -> Self {
        Self {
            id,
            base_color,
            positions,
        }
    }

    /// Create a mark with a UV-sphere soup, like a scatterplot point.
    pub fn sphere(
        id: MarkId,
        base_color: Rgb8,
        center: Vec3,
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let point = |ring: u32, segment: u32| {
            let v = ring as f32 / height_segments as f32;
            let u = segment as f32 / width_segments as f32;
            let theta = v * std::f32::consts::PI;
            let phi = u * 2.0 * std::f32::consts::PI;
            center
                + radius
                    * Vec3::new(
                        theta.sin() * phi.cos(),
                        theta.cos(),
                        theta.sin() * phi.sin(),
                    )
        };

        let mut positions = Vec::new();
        for ring in 0..height_segments {
            for segment in 0..width_segments {
                let a = point(ring, segment);
                let b = point(ring + 1, segment);
                let c = point(ring + 1, segment + 1);
                let d = point(ring, segment + 1);

                // Poles produce degenerate quads, keep only the real triangle.
                if ring != 0 {
                    positions.extend([a, b, d]);
                }
                if ring != height_segments - 1 {
                    positions.extend([b, c, d]);
                }
            }
        }

        Self::new(id, base_color, positions)
    }

    /// Create a mark with a cuboid soup, like a barchart bar.
    pub fn cuboid(id: MarkId, base_color: Rgb8, center: Vec3, half_extents: Vec3) -> Self {
        let corner = |sx: f32, sy: f32, sz: f32| center + half_extents * Vec3::new(sx, sy, sz);

        // 8 corners, 12 triangles, counter-clockwise seen from outside.
        let c = [
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(-1.0, 1.0, -1.0),
            corner(-1.0, -1.0, 1.0),
            corner(1.0, -1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        ];

        const FACES: [[usize; 4]; 6] = [
            [1, 0, 3, 2], // -z
            [4, 5, 6, 7], // +z
            [0, 4, 7, 3], // -x
            [5, 1, 2, 6], // +x
            [0, 1, 5, 4], // -y
            [3, 7, 6, 2], // +y
        ];

        let mut positions = Vec::with_capacity(36);
        for [a, b, d, e] in FACES {
            positions.extend([c[a], c[b], c[d]]);
            positions.extend([c[a], c[d], c[e]]);
        }

        Self::new(id, base_color, positions)
    }

    /// Get the number of faces.
    pub fn face_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get the bounding sphere of the mark as `(center, radius)`.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        let center = self.positions.iter().sum::<Vec3>() / self.positions.len().max(1) as f32;
        let radius = self
            .positions
            .iter()
            .map(|p| (*p - center).length())
            .fold(0.0, f32::max);

        (center, radius)
    }
}

/// The set of marks registered with the engine.
///
/// Registration validates the identity capacity limits up front, so encoding
/// can never silently alias at runtime.
#[derive(Debug, Clone, Default)]
pub struct MarkSet {
    marks: Vec<Mark>,
    slot_by_id: Vec<Option<usize>>,
}

impl MarkSet {
    /// Create an empty mark set.
    pub fn new() -> Self {
        Self {
            marks: Vec::new(),
            slot_by_id: vec![None; 256],
        }
    }

    /// Create a mark set from a sequence of marks.
    pub fn from_marks(marks: impl IntoIterator<Item = Mark>) -> Result<Self, Error> {
        let mut set = Self::new();
        for mark in marks {
            set.register(mark)?;
        }
        Ok(set)
    }

    /// Register a mark.
    ///
    /// Capacity violations are configuration-time errors here, never silent
    /// aliasing during picking.
    pub fn register(&mut self, mark: Mark) -> Result<usize, Error> {
        if mark.id == 0 {
            return Err(Error::MarkIdZero);
        }
        if self.slot_by_id[mark.id as usize].is_some() {
            return Err(Error::DuplicateMarkId(mark.id));
        }
        if mark.positions.is_empty() {
            return Err(Error::EmptyGeometry(mark.id));
        }
        if mark.positions.len() % 3 != 0 {
            return Err(Error::VertexCountNotTriangles {
                id: mark.id,
                vertex_count: mark.positions.len(),
            });
        }
        if mark.face_count() > FACE_CAPACITY {
            return Err(Error::FaceCapacityExceeded {
                id: mark.id,
                face_count: mark.face_count(),
                capacity: FACE_CAPACITY,
            });
        }

        let slot = self.marks.len();
        self.slot_by_id[mark.id as usize] = Some(slot);
        self.marks.push(mark);

        log::debug!("Registered mark {} at slot {slot}", self.marks[slot].id);

        Ok(slot)
    }

    /// Get the marks in slot order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Get the number of marks.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Get the slot of a mark id.
    pub fn slot_of(&self, id: MarkId) -> Option<usize> {
        self.slot_by_id[id as usize]
    }

    /// Get a mark by id.
    pub fn by_id(&self, id: MarkId) -> Option<&Mark> {
        self.slot_of(id).map(|slot| &self.marks[slot])
    }

    /// Get a mark by slot.
    pub fn by_slot(&self, slot: usize) -> Option<&Mark> {
        self.marks.get(slot)
    }

    /// Get the total number of vertices across all marks.
    pub fn vertex_count(&self) -> usize {
        self.marks.iter().map(|m| m.positions.len()).sum()
    }

    /// Get the vertex range of a slot in the packed vertex buffer.
    pub fn vertex_range_of_slot(&self, slot: usize) -> std::ops::Range<usize> {
        let start = self
            .marks
            .iter()
            .take(slot)
            .map(|m| m.positions.len())
            .sum();
        start..start + self.marks[slot].positions.len()
    }
}
