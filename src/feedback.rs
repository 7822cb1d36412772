use glam::*;

use crate::{AttentionState, AttentionStore, MarkSet, MarkVertexBuffer, Rgb8, TintBuffer};

/// A two-color linear ramp with a hard over-range alert color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    /// The color at the low end of the range.
    pub min_color: Rgb8,
    /// The color at the high end of the range.
    pub max_color: Rgb8,
    /// The fixed color returned for any value above the range.
    ///
    /// A hard clamp rather than extrapolation, over-range values read as an
    /// alert instead of an ever-darker ramp.
    pub alert_color: Rgb8,
}

impl ColorRamp {
    /// Map a value over `[min_value, max_value]` to a ramp color.
    ///
    /// Values above `max_value` return the alert color exactly, values at or
    /// below `min_value` return the low-end color.
    pub fn color_for(&self, min_value: f32, max_value: f32, value: f32) -> Rgb8 {
        if value > max_value {
            return self.alert_color;
        }
        if value <= min_value || max_value <= min_value {
            return self.min_color;
        }

        let t = (value - min_value) / (max_value - min_value);
        self.min_color.lerp(self.max_color, t)
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            min_color: Rgb8::new(0xFF, 0xFF, 0x00),
            max_color: Rgb8::new(0xFF, 0x00, 0x00),
            alert_color: Rgb8::new(0xFF, 0x00, 0x00),
        }
    }
}

/// The tint targets of each attention state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintPalette {
    /// The tint at baseline, no modulation.
    pub baseline: Vec3,
    /// The tint of under-attended, emphasized marks.
    pub emphasized: Vec3,
    /// The tint of over-attended, deemphasized marks.
    pub deemphasized: Vec3,
}

impl TintPalette {
    /// Get the target tint of a state.
    pub fn target(&self, state: AttentionState) -> Vec3 {
        match state {
            AttentionState::Baseline => self.baseline,
            AttentionState::Emphasized => self.emphasized,
            AttentionState::Deemphasized => self.deemphasized,
        }
    }
}

impl Default for TintPalette {
    fn default() -> Self {
        Self {
            baseline: Vec3::ONE,
            emphasized: Vec3::new(1.4, 1.2, 0.6),
            deemphasized: Vec3::splat(0.25),
        }
    }
}

/// The feedback renderer.
///
/// Maps accumulated attention back onto the visual representation on two
/// decoupled channels: per-face ramp colors show where on a mark attention
/// landed, the per-mark tint communicates the coarse attention state.
#[derive(Debug, Clone)]
pub struct Feedback {
    /// The face color ramp.
    pub ramp: ColorRamp,
    /// The tint palette.
    pub palette: TintPalette,
    /// The per-frame tint blend factor.
    ///
    /// Tints move toward their target by this fraction every frame,
    /// exponential smoothing rather than time-based easing, so transitions
    /// stay gradual under frame rate variance.
    pub blend: f32,
    tints: Vec<Vec4>,
}

impl Feedback {
    /// Create a new feedback renderer with every tint at baseline.
    pub fn new(mark_count: usize) -> Self {
        Self {
            ramp: ColorRamp::default(),
            palette: TintPalette::default(),
            blend: 0.08,
            tints: vec![Vec4::ONE; mark_count],
        }
    }

    /// Rewrite the per-face colors of every touched mark from its face
    /// counters, normalized by the store's running face maximum.
    ///
    /// Faces that were never picked keep the mark's base color.
    pub fn apply_face_colors(
        &self,
        queue: &wgpu::Queue,
        vertices: &mut MarkVertexBuffer,
        set: &MarkSet,
        store: &AttentionStore,
    ) {
        let face_max = store.face_max();
        if face_max == 0 {
            return;
        }

        for (slot, mark) in set.marks().iter().enumerate() {
            let Some(attention) = store.by_slot(slot) else {
                continue;
            };
            if attention.faces.iter().all(|&count| count == 0) {
                continue;
            }

            let face_colors = attention
                .faces
                .iter()
                .map(|&count| match count {
                    0 => mark.base_color,
                    count => self.ramp.color_for(0.0, face_max as f32, count as f32),
                })
                .collect::<Vec<_>>();

            vertices.write_face_colors(queue, set, slot, &face_colors);
        }
    }

    /// Move every tint one blend step toward its state target and upload.
    ///
    /// Called once per frame while the feedback loop is live.
    pub fn smooth_tints(
        &mut self,
        queue: &wgpu::Queue,
        tint_buffer: &TintBuffer,
        store: &AttentionStore,
    ) {
        for (slot, tint) in self.tints.iter_mut().enumerate() {
            let Some(attention) = store.by_slot(slot) else {
                continue;
            };
            let target = self.palette.target(attention.state).extend(1.0);
            *tint += (target - *tint) * self.blend;
        }

        tint_buffer.update(queue, &self.tints);
    }

    /// Restore every mark's base color and snap all tints back to baseline.
    pub fn reset_colors(
        &mut self,
        queue: &wgpu::Queue,
        vertices: &mut MarkVertexBuffer,
        tint_buffer: &TintBuffer,
        set: &MarkSet,
    ) {
        for (slot, mark) in set.marks().iter().enumerate() {
            vertices.write_uniform_color(queue, set, slot, mark.base_color);
        }

        self.tints.fill(Vec4::ONE);
        tint_buffer.update(queue, &self.tints);

        log::info!("Mark colors reset to base");
    }

    /// Get the current tints in slot order.
    pub fn tints(&self) -> &[Vec4] {
        &self.tints
    }
}
