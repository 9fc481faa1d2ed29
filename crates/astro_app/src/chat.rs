//! Chat panel toggle
//!
//! The figure doubles as the trigger of a chat panel. Only the open/closed
//! flag lives here; the panel itself belongs to the host.

use astro_core::PointerEvent;

/// Host-side panel whose visibility the toggle controls
pub trait PanelSurface {
    fn set_visible(&mut self, visible: bool);
}

/// Open/closed state of the chat panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChatToggle {
    open: bool,
}

impl ChatToggle {
    /// New toggle, panel closed
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the panel and push the new visibility to it. Returns the new state.
    pub fn on_trigger_click<P: PanelSurface + ?Sized>(&mut self, panel: &mut P) -> bool {
        self.open = !self.open;
        panel.set_visible(self.open);
        tracing::debug!(open = self.open, "chat panel toggled");
        self.open
    }

    /// Route a pointer event. Only clicks are consumed.
    pub fn handle_event<P: PanelSurface + ?Sized>(
        &mut self,
        event: &PointerEvent,
        panel: &mut P,
    ) -> bool {
        match event {
            PointerEvent::Click(_) => {
                self.on_trigger_click(panel);
                true
            }
            _ => false,
        }
    }
}
