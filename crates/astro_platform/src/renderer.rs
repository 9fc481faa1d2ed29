//! Rendering backend interface

use crate::camera::Camera;
use crate::scene::SceneGraph;

/// Backing-store size in device pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Opaque rendering backend owning the figure's scene
///
/// Rasterization, shading, and projection are the backend's business; the
/// frame loop only sizes the backing store and asks for a draw.
pub trait Renderer {
    type Scene: SceneGraph;

    fn scene_mut(&mut self) -> &mut Self::Scene;

    /// Current backing-store resolution
    fn backing_size(&self) -> PhysicalSize;

    /// Resize the backing store; the displayed size is left to the host
    fn set_backing_size(&mut self, size: PhysicalSize);

    /// Draw the scene through `camera`. Assumed to succeed.
    fn draw(&mut self, camera: &Camera);
}
