mod attention;
mod buffer;
mod camera;
mod error;
mod feedback;
mod identity;
mod mark;
mod picking;
mod region;
mod renderer;
mod scheduler;
mod visibility;

use glam::*;

pub use attention::*;
pub use buffer::*;
pub use camera::*;
pub use error::*;
pub use feedback::*;
pub use identity::*;
pub use mark::*;
pub use picking::*;
pub use region::*;
pub use renderer::*;
pub use scheduler::*;
pub use visibility::*;

/// The runtime-adjustable parameters of the attention engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParams {
    /// The side length of the area pick window, must be odd.
    pub area_pick_size: u32,
    /// Levels below this enter [`AttentionState::Emphasized`].
    pub emphasize_threshold: u32,
    /// Levels above this enter [`AttentionState::Deemphasized`].
    pub deemphasize_threshold: u32,
    /// The wall-clock interval between hover recordings, in milliseconds.
    pub hover_interval_ms: f32,
    /// The wall-clock interval between decay steps, in milliseconds.
    pub decay_interval_ms: f32,
    /// Whether face colors are rewritten live after every hover recording.
    pub live_update: bool,
    /// Which attention states the feedback loop may apply.
    pub flags: FeedbackFlags,
}

impl EngineParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), Error> {
        validate_area_size(self.area_pick_size)
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            area_pick_size: 361,
            emphasize_threshold: 5,
            deemphasize_threshold: 90,
            hover_interval_ms: 100.0,
            decay_interval_ms: 1000.0,
            live_update: false,
            flags: FeedbackFlags::empty(),
        }
    }
}

/// What happened during one [`Engine::update`] call.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// The distinct mark ids hovered this frame.
    pub hovered: Vec<MarkId>,
    /// How many hover recordings ran.
    pub hover_runs: u32,
    /// How many decay steps ran.
    pub decay_runs: u32,
    /// The attention state transitions that occurred.
    pub transitions: Vec<(MarkId, AttentionState)>,
}

/// The GPU-picking attention engine.
///
/// Owns every piece of the attention loop as explicit state, no module-level
/// globals, so independent engines can coexist in one process. One
/// [`Engine::update`] call per display frame drives the whole loop: picking
/// render, region sampling, attention accumulation and visual feedback.
#[derive(Debug)]
pub struct Engine {
    /// The display camera.
    pub camera: Camera,

    params: EngineParams,
    set: MarkSet,

    camera_buffer: CameraBuffer,
    vertex_buffer: MarkVertexBuffer,
    tint_buffer: TintBuffer,
    depth_texture: DepthTexture,

    picking: PickingRenderer,
    renderer: MarkRenderer,

    store: AttentionStore,
    scheduler: Scheduler,
    feedback: Feedback,

    viewport: UVec2,
}

impl Engine {
    /// Create a new engine.
    ///
    /// All capacity and render-target validation happens here, synchronously,
    /// so picking can never alias or read back undefined contents later.
    pub fn new(
        device: &wgpu::Device,
        texture_format: wgpu::TextureFormat,
        set: MarkSet,
        viewport: UVec2,
        params: EngineParams,
    ) -> Result<Self, Error> {
        params.validate()?;

        log::debug!("Creating display camera buffer");
        let camera_buffer = CameraBuffer::new(device, "Display Camera Buffer");

        log::debug!("Creating mark vertex buffer");
        let vertex_buffer = MarkVertexBuffer::new(device, &set);

        log::debug!("Creating tint buffer");
        let tint_buffer = TintBuffer::new(device, set.len());

        log::debug!("Creating depth texture");
        let depth_texture = DepthTexture::new(device, viewport);

        log::debug!("Creating picking renderer");
        let picking = PickingRenderer::new(device, viewport, params.area_pick_size)?;

        log::debug!("Creating mark renderer");
        let renderer = MarkRenderer::new(device, texture_format, &camera_buffer, &tint_buffer);

        let store = AttentionStore::new(&set);
        let scheduler = Scheduler::new(params.hover_interval_ms, params.decay_interval_ms);
        let feedback = Feedback::new(set.len());

        log::info!(
            "Attention engine created with {} marks over a {viewport} viewport",
            set.len()
        );

        Ok(Self {
            camera: Camera::new(0.1..1000.0, std::f32::consts::FRAC_PI_4),
            params,
            set,
            camera_buffer,
            vertex_buffer,
            tint_buffer,
            depth_texture,
            picking,
            renderer,
            store,
            scheduler,
            feedback,
            viewport,
        })
    }

    /// Upload the display camera for the current viewport.
    pub fn update_camera(&self, queue: &wgpu::Queue) {
        self.camera_buffer.update(queue, &self.camera, self.viewport);
    }

    /// Resize the viewport, reallocating the depth and full-frame picking
    /// targets.
    pub fn resize(&mut self, device: &wgpu::Device, viewport: UVec2) -> Result<(), Error> {
        self.depth_texture.update_size(device, viewport);
        self.picking.set_viewport(device, viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    /// Start attention collection. Idempotent.
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    /// Stop attention collection. Idempotent.
    ///
    /// A picking readback in flight across the stop is discarded by the
    /// scheduler's generation check, counters are never mutated after a stop.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Whether attention collection is running.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Zero all collected attention data.
    pub fn reset_data(&mut self) {
        self.store.reset();
    }

    /// Stop collection and apply the final color ramp from the cumulative
    /// face counters.
    pub fn show_results(&mut self, queue: &wgpu::Queue) {
        self.scheduler.stop();
        self.feedback
            .apply_face_colors(queue, &mut self.vertex_buffer, &self.set, &self.store);

        log::info!("Applied cumulative attention results");
    }

    /// Restore every mark's original colors.
    pub fn reset_colors(&mut self, queue: &wgpu::Queue) {
        self.feedback
            .reset_colors(queue, &mut self.vertex_buffer, &self.tint_buffer, &self.set);
    }

    /// Change the area pick size, reallocating the area pick target.
    pub fn set_area_pick_size(&mut self, device: &wgpu::Device, size: u32) -> Result<(), Error> {
        self.picking.set_area_size(device, size)?;
        self.params.area_pick_size = size;
        Ok(())
    }

    /// Change the hover recording interval.
    pub fn set_hover_interval_ms(&mut self, interval_ms: f32) {
        self.params.hover_interval_ms = interval_ms;
        self.scheduler.set_hover_interval_ms(interval_ms);
    }

    /// Change the decay interval.
    pub fn set_decay_interval_ms(&mut self, interval_ms: f32) {
        self.params.decay_interval_ms = interval_ms;
        self.scheduler.set_decay_interval_ms(interval_ms);
    }

    /// Change the emphasize and deemphasize thresholds, clamped to the
    /// attention level range.
    pub fn set_thresholds(&mut self, emphasize: u32, deemphasize: u32) {
        self.params.emphasize_threshold = emphasize.min(AttentionStore::LEVEL_MAX);
        self.params.deemphasize_threshold = deemphasize.min(AttentionStore::LEVEL_MAX);
    }

    /// Change the feedback permission flags.
    pub fn set_feedback_flags(&mut self, flags: FeedbackFlags) {
        self.params.flags = flags;
    }

    /// Change whether face colors update live.
    pub fn set_live_update(&mut self, live_update: bool) {
        self.params.live_update = live_update;
    }

    /// Run one engine tick.
    ///
    /// `dt_ms` is the elapsed time since the previous call, `focus` is the
    /// focus point (cursor or gaze proxy) in viewport pixels with the origin
    /// at the bottom-left corner. Due hover recordings run an area pick with
    /// the circle mask applied, due decay steps run before them, and tints
    /// are smoothed one blend step whenever collection is live.
    pub async fn update(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        dt_ms: f32,
        focus: IVec2,
    ) -> Result<FrameReport, Error> {
        let tasks = self.scheduler.tick(dt_ms);

        let mut report = FrameReport {
            decay_runs: tasks.decay,
            ..FrameReport::default()
        };

        let mut counters_changed = tasks.decay > 0;
        for _ in 0..tasks.decay {
            self.store.decay();
        }

        if tasks.hover > 0 {
            let map = self
                .picking
                .pick_area(device, queue, &self.camera, &self.vertex_buffer, focus)
                .await?;

            // A stop may have landed between the tick and the readback.
            if self.scheduler.is_current(&tasks) {
                let area_size = self.picking.area_size();
                let sample = circle_mask(
                    &RegionSample(map.ids().to_vec()),
                    area_size,
                    area_size / 2,
                );

                for _ in 0..tasks.hover {
                    let record = self.store.record_hover(&sample);
                    for id in record.hovered {
                        if !report.hovered.contains(&id) {
                            report.hovered.push(id);
                        }
                    }
                }
                report.hover_runs = tasks.hover;
                counters_changed = true;

                if self.params.live_update {
                    self.feedback.apply_face_colors(
                        queue,
                        &mut self.vertex_buffer,
                        &self.set,
                        &self.store,
                    );
                }
            }
        }

        // States are re-derived whenever either task touched the counters,
        // so a decay-driven threshold crossing never waits for the next
        // hover batch.
        if counters_changed {
            report.transitions = self.store.update_states(
                self.params.emphasize_threshold,
                self.params.deemphasize_threshold,
                self.params.flags,
            );
        }

        if self.scheduler.is_running() {
            self.feedback
                .smooth_tints(queue, &self.tint_buffer, &self.store);
        }

        Ok(report)
    }

    /// Query the single mark identity under a focus point, outside the
    /// attention loop.
    pub async fn hover_identity(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        focus: IVec2,
    ) -> Result<IdentityColor, Error> {
        self.picking
            .pick_hover(device, queue, &self.camera, &self.vertex_buffer, focus)
            .await
    }

    /// Build the diagnostic visibility report from a full-viewport pick and
    /// the camera frustum.
    pub async fn visibility_report(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<VisibilityReport, Error> {
        let map = self
            .picking
            .pick_frame(device, queue, &self.camera, &self.vertex_buffer)
            .await?;

        let frustum = self
            .camera
            .frustum(self.viewport.x as f32 / self.viewport.y as f32);

        Ok(visibility::classify(&map, &frustum, &self.set))
    }

    /// Render the marks into the display view.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        self.renderer
            .render(encoder, view, &self.depth_texture, &self.vertex_buffer);
    }

    /// Get the registered marks.
    pub fn marks(&self) -> &MarkSet {
        &self.set
    }

    /// Get the attention store.
    pub fn attention(&self) -> &AttentionStore {
        &self.store
    }

    /// Get the current parameters.
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Get the feedback renderer.
    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    /// Get the feedback renderer mutably, for ramp and palette adjustments.
    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }
}
