//! Viewport synchronization
//!
//! Each frame the displayed size of the drawing surface is polled and the
//! backing store is resized to `floor(displayed * device_pixel_ratio)` when it
//! no longer matches. The check is cheap and idempotent, so it runs every
//! frame instead of listening for resize notifications.

use crate::camera::Camera;
use crate::host::DisplayMetrics;
use crate::renderer::{PhysicalSize, Renderer};

/// Fallback displayed edge length for surfaces that are not laid out yet
pub const DEFAULT_FALLBACK_EDGE: f32 = 320.0;

/// Resolved displayed size and pixel ratio for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportDescriptor {
    /// Displayed width in logical pixels
    pub width: f32,
    /// Displayed height in logical pixels
    pub height: f32,
    pub device_pixel_ratio: f64,
    /// Whether any dimension had to fall back
    pub degenerate: bool,
}

impl ViewportDescriptor {
    /// Resolve host metrics, replacing unusable dimensions with `fallback`
    pub fn resolve(metrics: DisplayMetrics, fallback: (f32, f32)) -> Self {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        let width_ok = usable(metrics.width);
        let height_ok = usable(metrics.height);
        let dpr_ok = metrics.device_pixel_ratio.is_finite() && metrics.device_pixel_ratio > 0.0;

        Self {
            width: if width_ok { metrics.width } else { fallback.0 },
            height: if height_ok { metrics.height } else { fallback.1 },
            device_pixel_ratio: if dpr_ok {
                metrics.device_pixel_ratio
            } else {
                1.0
            },
            degenerate: !(width_ok && height_ok && dpr_ok),
        }
    }

    /// Backing-store size this viewport requires
    pub fn backing_size(&self) -> PhysicalSize {
        let scale = |v: f32| ((v as f64) * self.device_pixel_ratio).floor().max(1.0) as u32;
        PhysicalSize::new(scale(self.width), scale(self.height))
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Keeps a renderer's backing store and a camera's projection in step with
/// the displayed size
#[derive(Clone, Debug)]
pub struct ViewportSync {
    fallback: (f32, f32),
    resize_count: u64,
    warned_degenerate: bool,
}

impl ViewportSync {
    pub fn new(fallback_width: f32, fallback_height: f32) -> Self {
        Self {
            fallback: (fallback_width, fallback_height),
            resize_count: 0,
            warned_degenerate: false,
        }
    }

    pub fn fallback(&self) -> (f32, f32) {
        self.fallback
    }

    /// Number of resizes performed so far
    pub fn resize_count(&self) -> u64 {
        self.resize_count
    }

    /// Reconcile the backing store with the displayed size.
    ///
    /// Returns true if the backing store was resized and the projection
    /// updated. Repeated calls with unchanged metrics mutate nothing.
    pub fn sync<R: Renderer>(
        &mut self,
        metrics: DisplayMetrics,
        renderer: &mut R,
        camera: &mut Camera,
    ) -> bool {
        let viewport = ViewportDescriptor::resolve(metrics, self.fallback);

        if viewport.degenerate && !self.warned_degenerate {
            tracing::warn!(
                width = metrics.width,
                height = metrics.height,
                dpr = metrics.device_pixel_ratio,
                "display size unavailable, using fallback"
            );
        }
        self.warned_degenerate = viewport.degenerate;

        let required = viewport.backing_size();
        if renderer.backing_size() == required {
            return false;
        }

        renderer.set_backing_size(required);
        camera.set_aspect(viewport.aspect());
        camera.update_projection();
        self.resize_count += 1;

        tracing::debug!(
            width = required.width,
            height = required.height,
            aspect = viewport.aspect(),
            "viewport resized"
        );
        true
    }
}

impl Default for ViewportSync {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_EDGE, DEFAULT_FALLBACK_EDGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{FigureNode, SceneGraph};
    use astro_core::math::Axis;

    struct NullScene;

    impl SceneGraph for NullScene {
        fn set_translation(&mut self, _: FigureNode, _: Axis, _: f32) {}
        fn set_rotation(&mut self, _: FigureNode, _: Axis, _: f32) {}
        fn set_scale(&mut self, _: FigureNode, _: Axis, _: f32) {}
    }

    #[derive(Default)]
    struct CountingRenderer {
        size: PhysicalSize,
        resizes: u32,
        scene: Option<NullScene>,
    }

    impl Renderer for CountingRenderer {
        type Scene = NullScene;

        fn scene_mut(&mut self) -> &mut NullScene {
            self.scene.get_or_insert(NullScene)
        }

        fn backing_size(&self) -> PhysicalSize {
            self.size
        }

        fn set_backing_size(&mut self, size: PhysicalSize) {
            self.size = size;
            self.resizes += 1;
        }

        fn draw(&mut self, _camera: &Camera) {}
    }

    #[test]
    fn test_resize_then_idempotent() {
        let mut sync = ViewportSync::default();
        let mut renderer = CountingRenderer::default();
        let mut camera = Camera::default();
        let metrics = DisplayMetrics::new(160.0, 120.0, 2.0);

        assert!(sync.sync(metrics, &mut renderer, &mut camera));
        assert_eq!(renderer.size, PhysicalSize::new(320, 240));
        assert!((camera.aspect() - 160.0 / 120.0).abs() < 1e-6);

        let projection = camera.projection();
        assert!(!sync.sync(metrics, &mut renderer, &mut camera));
        assert_eq!(renderer.resizes, 1);
        assert_eq!(camera.projection(), projection);
        assert_eq!(sync.resize_count(), 1);
    }

    #[test]
    fn test_fractional_ratio_floors() {
        let viewport =
            ViewportDescriptor::resolve(DisplayMetrics::new(161.0, 99.0, 1.5), (320.0, 320.0));
        assert_eq!(viewport.backing_size(), PhysicalSize::new(241, 148));
    }

    #[test]
    fn test_degenerate_falls_back() {
        let viewport =
            ViewportDescriptor::resolve(DisplayMetrics::new(0.0, 200.0, 0.0), (320.0, 320.0));
        assert!(viewport.degenerate);
        assert_eq!(viewport.width, 320.0);
        assert_eq!(viewport.height, 200.0);
        assert_eq!(viewport.device_pixel_ratio, 1.0);

        let mut sync = ViewportSync::default();
        let mut renderer = CountingRenderer::default();
        let mut camera = Camera::default();
        assert!(sync.sync(DisplayMetrics::default(), &mut renderer, &mut camera));
        assert_eq!(renderer.size, PhysicalSize::new(320, 320));
        assert!(!sync.sync(DisplayMetrics::default(), &mut renderer, &mut camera));
    }

    #[test]
    fn test_pixel_ratio_change_triggers_resize() {
        let mut sync = ViewportSync::default();
        let mut renderer = CountingRenderer::default();
        let mut camera = Camera::default();

        sync.sync(DisplayMetrics::new(100.0, 100.0, 1.0), &mut renderer, &mut camera);
        assert!(sync.sync(DisplayMetrics::new(100.0, 100.0, 3.0), &mut renderer, &mut camera));
        assert_eq!(renderer.size, PhysicalSize::new(300, 300));
    }
}
