use std::collections::HashSet;

use crate::{MarkId, MarkSet, RegionSample};

bitflags::bitflags! {
    /// Which attention-driven visual states the engine may apply.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FeedbackFlags: u32 {
        /// Under-attended marks may enter [`AttentionState::Emphasized`].
        const ALLOW_EMPHASIS = 1 << 0;
        /// Over-attended marks may enter [`AttentionState::Deemphasized`].
        const ALLOW_DEEMPHASIS = 1 << 1;
    }
}

/// The visual attention state of a mark, derived from its saturating level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttentionState {
    /// Neither over- nor under-attended.
    #[default]
    Baseline,
    /// Under-attended, nudged toward the viewer.
    Emphasized,
    /// Over-attended, nudged away from the viewer.
    Deemphasized,
}

/// The attention counters of a single mark.
#[derive(Debug, Clone)]
pub struct MarkAttention {
    /// The id of the mark.
    pub id: MarkId,
    /// The monotonic lifetime counter, one per tick the mark was hovered.
    pub cumulative: u64,
    /// The saturating live counter in `[0, LEVEL_MAX]`, decays over time.
    pub level: u32,
    /// The current attention state.
    pub state: AttentionState,
    /// Per-face monotonic counters, one slot per face.
    pub faces: Vec<u32>,
}

/// The attention accumulator over a registered mark set.
///
/// All counters live here, owned state with no module-level globals, so
/// multiple independent engines can run side by side.
#[derive(Debug, Clone)]
pub struct AttentionStore {
    marks: Vec<MarkAttention>,
    slot_by_id: Vec<Option<usize>>,
    face_max: u32,
}

/// The result of recording one hover sample.
#[derive(Debug, Clone, Default)]
pub struct HoverRecord {
    /// The distinct mark ids touched by the sample.
    pub hovered: Vec<MarkId>,
}

impl HoverRecord {
    /// Whether the sample touched nothing.
    pub fn is_empty(&self) -> bool {
        self.hovered.is_empty()
    }
}

impl AttentionStore {
    /// The upper bound of the saturating level.
    pub const LEVEL_MAX: u32 = 100;

    /// The mid-point level a mark snaps to when it leaves a non-baseline
    /// state, preventing immediate re-triggering.
    pub const LEVEL_BASELINE: u32 = 50;

    /// Create a new store with all counters at zero.
    ///
    /// Face tables are sized from each mark's face count at creation time and
    /// never grow afterwards.
    pub fn new(set: &MarkSet) -> Self {
        let marks = set
            .marks()
            .iter()
            .map(|mark| MarkAttention {
                id: mark.id,
                cumulative: 0,
                level: 0,
                state: AttentionState::Baseline,
                faces: vec![0; mark.face_count()],
            })
            .collect();

        let slot_by_id = (0..256)
            .map(|id| set.slot_of(id as MarkId))
            .collect();

        Self {
            marks,
            slot_by_id,
            face_max: 0,
        }
    }

    /// Record one hover sample.
    ///
    /// Every identity in the sample is decoded, the background sentinel is
    /// discarded, and the remainder is deduplicated to the distinct marks and
    /// distinct (mark, face) pairs touched this tick. A sample with no
    /// non-background identity is a strict no-op, so an empty region never
    /// registers spurious attention.
    pub fn record_hover(&mut self, sample: &RegionSample) -> HoverRecord {
        let distinct: HashSet<_> = sample
            .0
            .iter()
            .filter(|id| !id.is_background())
            .copied()
            .collect();

        if distinct.is_empty() {
            return HoverRecord::default();
        }

        let mut hovered = Vec::new();
        let mut touched_ids = HashSet::new();

        for identity in &distinct {
            let (id, face) = identity.decode();

            let Some(slot) = self.slot_by_id[id as usize] else {
                log::warn!("Picked identity with unregistered mark id {id}");
                continue;
            };
            let mark = &mut self.marks[slot];

            if face as usize >= mark.faces.len() {
                log::warn!(
                    "Picked face {face} of mark {id} which only has {} faces",
                    mark.faces.len()
                );
                continue;
            }

            if touched_ids.insert(id) {
                hovered.push(id);
                mark.cumulative += 1;
                mark.level = (mark.level + 1).min(Self::LEVEL_MAX);
            }

            mark.faces[face as usize] += 1;
            self.face_max = self.face_max.max(mark.faces[face as usize]);
        }

        HoverRecord { hovered }
    }

    /// Apply one decay step, every saturating level drops by 1 floored at 0.
    ///
    /// Scheduled independently from hover recording, this models fading
    /// attention. Cumulative and face counters never decay.
    pub fn decay(&mut self) {
        for mark in &mut self.marks {
            mark.level = mark.level.saturating_sub(1);
        }
    }

    /// Re-derive every mark's attention state from its level.
    ///
    /// A level above `deemphasize_threshold` is deemphasized, a level below
    /// `emphasize_threshold` is emphasized, gated by `flags`. On any exit
    /// from a non-baseline state the level snaps to [`Self::LEVEL_BASELINE`],
    /// applied symmetrically to both the emphasize and deemphasize paths.
    ///
    /// Returns the transitions that occurred, as `(id, new state)`.
    pub fn update_states(
        &mut self,
        emphasize_threshold: u32,
        deemphasize_threshold: u32,
        flags: FeedbackFlags,
    ) -> Vec<(MarkId, AttentionState)> {
        let mut transitions = Vec::new();

        for mark in &mut self.marks {
            let derived = if mark.level > deemphasize_threshold
                && flags.contains(FeedbackFlags::ALLOW_DEEMPHASIS)
            {
                AttentionState::Deemphasized
            } else if mark.level < emphasize_threshold
                && flags.contains(FeedbackFlags::ALLOW_EMPHASIS)
            {
                AttentionState::Emphasized
            } else {
                AttentionState::Baseline
            };

            if derived == mark.state {
                continue;
            }

            if mark.state != AttentionState::Baseline {
                mark.level = Self::LEVEL_BASELINE;
            }

            mark.state = derived;
            transitions.push((mark.id, derived));
        }

        transitions
    }

    /// Zero every counter and reset every state to baseline.
    pub fn reset(&mut self) {
        for mark in &mut self.marks {
            mark.cumulative = 0;
            mark.level = 0;
            mark.state = AttentionState::Baseline;
            mark.faces.fill(0);
        }
        self.face_max = 0;

        log::info!("Attention counters reset");
    }

    /// Get the attention of a mark by id.
    pub fn by_id(&self, id: MarkId) -> Option<&MarkAttention> {
        self.slot_by_id[id as usize].map(|slot| &self.marks[slot])
    }

    /// Get the attention of a mark by slot.
    pub fn by_slot(&self, slot: usize) -> Option<&MarkAttention> {
        self.marks.get(slot)
    }

    /// Iterate the attentions in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkAttention> {
        self.marks.iter()
    }

    /// Get the running maximum face counter across all marks, used to
    /// normalize the face color ramp.
    pub fn face_max(&self) -> u32 {
        self.face_max
    }
}
