//! Types for touch input handling

/// Whether the touch pad is being touched right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchState {
    Touched,
    Released,
}

/// What a touch means to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Switch between the battery and tank pages
    ToggleRequested,
}

impl std::fmt::Display for TouchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TouchState::Touched => write!(f, "touched"),
            TouchState::Released => write!(f, "released"),
        }
    }
}

impl std::fmt::Display for InputEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputEvent::ToggleRequested => write!(f, "Page toggle requested"),
        }
    }
}
