//! Pointer events
//!
//! Host input delivered to a figure. Coordinates are absolute logical pixels
//! relative to the host viewport's top-left corner.

/// Pointer position in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pointer input the figure reacts to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved within the viewport
    Move(PointerPosition),
    /// Pointer left the viewport (no payload)
    Leave,
    /// Primary button click on the figure's trigger element
    Click(PointerPosition),
}

impl PointerEvent {
    pub fn moved(x: f32, y: f32) -> Self {
        Self::Move(PointerPosition::new(x, y))
    }

    /// Position carried by the event, if any
    pub fn position(&self) -> Option<PointerPosition> {
        match self {
            Self::Move(pos) | Self::Click(pos) => Some(*pos),
            Self::Leave => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        assert_eq!(
            PointerEvent::moved(10.0, 20.0).position(),
            Some(PointerPosition::new(10.0, 20.0))
        );
        assert_eq!(PointerEvent::Leave.position(), None);
    }
}
