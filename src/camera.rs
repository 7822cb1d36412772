use std::ops::Range;

use glam::*;

/// A camera.
#[derive(Debug, Clone)]
pub struct Camera {
    /// The position of the camera.
    pub pos: Vec3,
    /// The z range of the camera.
    pub z: Range<f32>,
    /// The vertical FOV.
    pub vertical_fov: f32,
    /// The pitch.
    pub pitch: f32,
    /// The yaw.
    pub yaw: f32,
}

impl Camera {
    /// Up direction.
    pub const UP: Vec3 = Vec3::Y;

    /// The pitch limit.
    pub const PITCH_LIMIT: Range<f32> =
        -std::f32::consts::FRAC_PI_2 + 1e-6..std::f32::consts::FRAC_PI_2 - 1e-6;

    /// Create a new camera.
    pub fn new(z: Range<f32>, vertical_fov: f32) -> Self {
        Self {
            pos: Vec3::ZERO,
            z,
            vertical_fov,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Apply pitch.
    pub fn pitch_by(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(Self::PITCH_LIMIT.start, Self::PITCH_LIMIT.end);
    }

    /// Apply yaw.
    pub fn yaw_by(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).rem_euclid(2.0 * std::f32::consts::PI);
    }

    /// Get the forward vector.
    pub fn get_forward(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    /// Get the view matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.pos, self.get_forward(), Self::UP)
    }

    /// Get the projection matrix.
    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.vertical_fov, aspect_ratio, self.z.start, self.z.end)
    }

    /// Get an off-center projection matrix covering a sub-window of the full
    /// viewport.
    ///
    /// `offset` is the top-left corner of the window in pixels from the
    /// viewport's top-left corner. Rendering with this projection into a
    /// `window`-sized target produces exactly the pixels the full-viewport
    /// projection would produce in that window, which is what makes 1x1 hover
    /// picks and small area picks cheap. The window may extend past the
    /// viewport, the off-screen part simply renders background.
    pub fn projection_window(&self, full: Vec2, offset: Vec2, window: Vec2) -> Mat4 {
        let near = self.z.start;
        let far = self.z.end;
        let aspect_ratio = full.x / full.y;

        let top = near * (self.vertical_fov * 0.5).tan();
        let height = 2.0 * top;
        let width = aspect_ratio * height;
        let left = -0.5 * width;

        let sub_left = left + offset.x * width / full.x;
        let sub_top = top - offset.y * height / full.y;
        let sub_right = sub_left + width * window.x / full.x;
        let sub_bottom = sub_top - height * window.y / full.y;

        perspective_off_center_rh(sub_left, sub_right, sub_bottom, sub_top, near, far)
    }

    /// Get the frustum of the camera for a full viewport of the given aspect
    /// ratio.
    pub fn frustum(&self, aspect_ratio: f32) -> Frustum {
        Frustum::from_view_projection(self.projection(aspect_ratio) * self.view())
    }
}

/// A right-handed off-center perspective projection with depth mapped to
/// `[0, 1]`, matching [`Mat4::perspective_rh`] when the window is centered.
fn perspective_off_center_rh(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Mat4 {
    let two_near = 2.0 * near;
    let rcp_width = 1.0 / (right - left);
    let rcp_height = 1.0 / (top - bottom);
    let r = far / (near - far);

    Mat4::from_cols(
        Vec4::new(two_near * rcp_width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, two_near * rcp_height, 0.0, 0.0),
        Vec4::new(
            (left + right) * rcp_width,
            (top + bottom) * rcp_height,
            r,
            -1.0,
        ),
        Vec4::new(0.0, 0.0, r * near, 0.0),
    )
}

/// A view frustum as six inward-facing planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// The planes as `(normal, distance)`, where a point `p` is inside when
    /// `normal.dot(p) + distance >= 0` for every plane.
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract the frustum planes from a view-projection matrix.
    pub fn from_view_projection(view_projection: Mat4) -> Self {
        let row = |i| view_projection.row(i);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        // Gribb & Hartmann plane extraction, wgpu depth convention 0 <= z <= w.
        let planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r2,      // near
            r3 - r2, // far
        ]
        .map(|p| {
            let len = p.xyz().length();
            p / len
        });

        Self { planes }
    }

    /// Whether a bounding sphere intersects the frustum.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|p| p.xyz().dot(center) + p.w >= -radius)
    }

    /// Whether a point is inside the frustum.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.intersects_sphere(point, 0.0)
    }
}
