//! Fixed screen geometry: two panes under a title bar, and where each field sits
//! inside a pane

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::page::DisplayMode;

/// Which half of the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Dynamic content of a pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Volts,
    Amps,
    TankLevel,
    /// Date on the left pane, time on the right
    Clock,
    /// Right pane only
    Link,
}

impl Field {
    pub const COUNT: usize = 5;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// How content is placed inside its box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
}

const BORDER: u32 = 2;
const TITLE_BAR_HEIGHT: u32 = 37;
const TITLE_INSET: i32 = 10;
const TITLE_BASELINE: i32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    screen: Size,
    pane_size: Size,
    right_offset: i32,
}

impl Layout {
    /// Split a landscape screen into two panes below the title bar
    pub fn for_screen(screen: Size) -> Self {
        let pane_width = (screen.width / 2).saturating_sub(2 * BORDER);
        let pane_height = screen
            .height
            .saturating_sub(TITLE_BAR_HEIGHT + BORDER + 1);

        Self {
            screen,
            pane_size: Size::new(pane_width, pane_height),
            right_offset: (pane_width + 2 * BORDER) as i32,
        }
    }

    pub fn screen(&self) -> Rectangle {
        Rectangle::new(Point::zero(), self.screen)
    }

    pub fn pane(&self, side: Side) -> Rectangle {
        let left = Point::new(BORDER as i32, TITLE_BAR_HEIGHT as i32);
        let top_left = match side {
            Side::Left => left,
            Side::Right => left + Point::new(self.right_offset, 0),
        };
        Rectangle::new(top_left, self.pane_size)
    }

    /// Baseline start of the pane's title in the black bar
    pub fn title_origin(&self, side: Side) -> Point {
        Point::new(self.pane(side).top_left.x + TITLE_INSET, TITLE_BASELINE)
    }

    /// Top-left of the "WATER TANK" line in tank view
    pub fn subtitle_origin(&self, side: Side) -> Point {
        self.pane(side).top_left + Point::new(TITLE_INSET, 4)
    }

    /// Screen box and anchoring of `field`, or `None` if the field is not shown
    /// in that mode or on that side
    pub fn field_box(&self, mode: DisplayMode, side: Side, field: Field) -> Option<(Rectangle, Anchor)> {
        let (offset, size, anchor) = match (mode, field) {
            (DisplayMode::Battery, Field::Volts) => ((8, 6), (128, 22), Anchor::Left),
            (DisplayMode::Battery, Field::Amps) => ((8, 30), (128, 22), Anchor::Left),
            (DisplayMode::Tank, Field::TankLevel) => ((8, 22), (128, 28), Anchor::Center),
            (_, Field::Clock) => ((8, 64), (100, 16), Anchor::Center),
            (_, Field::Link) if side == Side::Right => ((112, 64), (24, 16), Anchor::Center),
            _ => return None,
        };

        let pane = self.pane(side);
        let rect = Rectangle::new(
            pane.top_left + Point::new(offset.0, offset.1),
            Size::new(size.0, size.1),
        );
        Some((rect.intersection(&pane), anchor))
    }
}
