//! What the panel shows: layout, field geometry bookkeeping, the two pages and the
//! full-refresh policy

pub mod glyph;
pub mod layout;
pub mod page;
pub mod refresh;
pub mod region;
pub mod status;

pub use glyph::{LinkGlyph, LinkState};
pub use layout::{Anchor, Field, Layout, Side};
pub use page::{DisplayMode, DisplayPage, PaneValue};
pub use refresh::RefreshScheduler;
pub use region::{PendingDraw, Region, RegionTracker};
pub use status::{show_status, show_status_logged};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::ssd1680::graphics::DisplayRotation;

/// Orientation every page and status screen is drawn in, 296x128
pub const LANDSCAPE: DisplayRotation = DisplayRotation::Rotate270;

/// A partially updatable display
///
/// Drawing only changes the frame in memory; nothing reaches the glass until one of
/// the refresh calls. `BinaryColor::On` is ink (black), `Off` is paper (white).
pub trait Panel: DrawTarget<Color = BinaryColor> {
    fn set_rotation(&mut self, rotation: DisplayRotation);

    /// Push the whole frame with a full update cycle
    fn refresh_full(&mut self) -> Result<(), Self::Error>;

    /// Push only `window` with a fast partial update
    fn refresh_partial(&mut self, window: Region) -> Result<(), Self::Error>;
}
