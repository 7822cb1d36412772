/// The tasks due after a scheduler tick.
///
/// Task counts are tagged with the generation they were issued under, a run
/// that crosses a stop/start boundary can be recognized as stale and
/// discarded instead of mutating counters that no longer belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickTasks {
    /// How many hover-recording runs are due.
    pub hover: u32,
    /// How many decay steps are due.
    pub decay: u32,
    /// The generation the tasks were issued under.
    pub generation: u64,
}

/// A fixed-timestep scheduler for the hover-recording and decay tasks.
///
/// Both tasks run on wall-clock intervals decoupled from the frame rate. The
/// host calls [`Scheduler::tick`] once per frame with the elapsed time, and
/// tasks fire whenever their accumulated time crosses their interval. No free
/// running timers, ordering stays deterministic for testing.
#[derive(Debug, Clone)]
pub struct Scheduler {
    running: bool,
    generation: u64,
    hover_interval_ms: f32,
    decay_interval_ms: f32,
    hover_elapsed_ms: f32,
    decay_elapsed_ms: f32,
}

impl Scheduler {
    /// Create a new, stopped scheduler.
    pub fn new(hover_interval_ms: f32, decay_interval_ms: f32) -> Self {
        Self {
            running: false,
            generation: 0,
            hover_interval_ms,
            decay_interval_ms,
            hover_elapsed_ms: 0.0,
            decay_elapsed_ms: 0.0,
        }
    }

    /// Start the scheduler.
    ///
    /// Idempotent, a second start while running is a no-op rather than a
    /// second set of timers. Starting from stopped clears any partially
    /// accumulated time so no stale task fires on the first tick.
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        self.running = true;
        self.generation += 1;
        self.hover_elapsed_ms = 0.0;
        self.decay_elapsed_ms = 0.0;

        log::info!("Attention collection started (generation {})", self.generation);
    }

    /// Stop the scheduler.
    ///
    /// Idempotent. Bumps the generation so any in-flight [`TickTasks`] issued
    /// before the stop is recognized as stale.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }

        self.running = false;
        self.generation += 1;

        log::info!("Attention collection stopped");
    }

    /// Whether the scheduler is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check a task batch against the current generation.
    pub fn is_current(&self, tasks: &TickTasks) -> bool {
        self.running && tasks.generation == self.generation
    }

    /// Update the hover interval.
    pub fn set_hover_interval_ms(&mut self, interval_ms: f32) {
        self.hover_interval_ms = interval_ms.max(1.0);
        self.hover_elapsed_ms = self.hover_elapsed_ms.min(self.hover_interval_ms);
    }

    /// Update the decay interval.
    pub fn set_decay_interval_ms(&mut self, interval_ms: f32) {
        self.decay_interval_ms = interval_ms.max(1.0);
        self.decay_elapsed_ms = self.decay_elapsed_ms.min(self.decay_interval_ms);
    }

    /// Advance by `dt_ms` and return the tasks now due.
    ///
    /// Stopped schedulers accumulate nothing and issue nothing.
    pub fn tick(&mut self, dt_ms: f32) -> TickTasks {
        if !self.running || dt_ms <= 0.0 {
            return TickTasks {
                generation: self.generation,
                ..TickTasks::default()
            };
        }

        self.hover_elapsed_ms += dt_ms;
        self.decay_elapsed_ms += dt_ms;

        let hover = (self.hover_elapsed_ms / self.hover_interval_ms) as u32;
        self.hover_elapsed_ms -= hover as f32 * self.hover_interval_ms;

        let decay = (self.decay_elapsed_ms / self.decay_interval_ms) as u32;
        self.decay_elapsed_ms -= decay as f32 * self.decay_interval_ms;

        TickTasks {
            hover,
            decay,
            generation: self.generation,
        }
    }
}
