//! Last-drawn geometry of every dynamic field
//!
//! E-paper keeps whatever was last written, so a new value can only be drawn after the
//! old one has been painted over with background. [`RegionTracker`] remembers the box
//! each field occupied so exactly that box is erased next time, and nothing else.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::layout::{Anchor, Field, Side};

/// Axis-aligned box in logical screen pixels; zero area means nothing drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub const EMPTY: Region = Region {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest region containing both; an empty side contributes nothing
    pub fn hull(&self, other: &Region) -> Region {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Region::new(
            left,
            top,
            (right - i32::from(left)) as u16,
            (bottom - i32::from(top)) as u16,
        )
    }

    fn right(&self) -> i32 {
        i32::from(self.x) + i32::from(self.width)
    }

    fn bottom(&self) -> i32 {
        i32::from(self.y) + i32::from(self.height)
    }
}

impl From<Rectangle> for Region {
    fn from(rect: Rectangle) -> Self {
        if rect.is_zero_sized() {
            return Region::EMPTY;
        }
        let clamp_pos = |v: i32| v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        let clamp_len = |v: u32| v.min(u32::from(u16::MAX)) as u16;
        Region::new(
            clamp_pos(rect.top_left.x),
            clamp_pos(rect.top_left.y),
            clamp_len(rect.size.width),
            clamp_len(rect.size.height),
        )
    }
}

impl From<Region> for Rectangle {
    fn from(region: Region) -> Self {
        Rectangle::new(
            Point::new(region.x.into(), region.y.into()),
            Size::new(region.width.into(), region.height.into()),
        )
    }
}

/// Outcome of an erase: where to draw and what to record once drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an erased field must be drawn and recorded"]
pub struct PendingDraw {
    side: Side,
    field: Field,
    /// Top-left the content has to be moved to
    pub origin: Point,
    /// Box the content will occupy, clipped to its layout box
    pub region: Region,
    previous: Region,
}

impl PendingDraw {
    /// Window a partial refresh has to cover: old and new content
    pub fn window(&self) -> Region {
        self.previous.hull(&self.region)
    }
}

/// One stored [`Region`] per field per pane
#[derive(Debug, Clone, Default)]
pub struct RegionTracker {
    slots: [[Region; Field::COUNT]; 2],
}

impl RegionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self, side: Side, field: Field) -> Region {
        self.slots[side.index()][field.index()]
    }

    /// Forget all geometry; used after the whole screen was repainted
    pub fn reset(&mut self) {
        self.slots = Default::default();
    }

    /// Paint the field's previous region with background and work out where content
    /// of `content_size` goes inside `layout_box`
    ///
    /// The slot keeps its old geometry until [`record`](Self::record) is given the
    /// returned [`PendingDraw`].
    pub fn erase_and_get_draw_origin<D>(
        &mut self,
        target: &mut D,
        side: Side,
        field: Field,
        content_size: Size,
        layout_box: Rectangle,
        anchor: Anchor,
    ) -> Result<PendingDraw, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let previous = self.region(side, field);
        if !previous.is_empty() {
            target.fill_solid(&previous.into(), BinaryColor::Off)?;
        }

        let origin = place(content_size, layout_box, anchor);
        let drawn = Rectangle::new(origin, content_size).intersection(&layout_box);

        Ok(PendingDraw {
            side,
            field,
            origin,
            region: drawn.into(),
            previous,
        })
    }

    /// Store the geometry of a completed draw; it replaces, never extends, the old box
    pub fn record(&mut self, pending: PendingDraw) -> Region {
        self.slots[pending.side.index()][pending.field.index()] = pending.region;
        pending.region
    }

    /// Erase, draw `item` clipped to `layout_box`, record, and return the window that
    /// needs a partial refresh
    pub fn redraw<D, T>(
        &mut self,
        target: &mut D,
        side: Side,
        field: Field,
        item: &T,
        layout_box: Rectangle,
        anchor: Anchor,
    ) -> Result<Region, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
        T: Drawable<Color = BinaryColor> + Dimensions + Transform,
    {
        let bounds = item.bounding_box();
        let pending =
            self.erase_and_get_draw_origin(target, side, field, bounds.size, layout_box, anchor)?;

        item.translate(pending.origin - bounds.top_left)
            .draw(&mut target.clipped(&layout_box))?;

        let window = pending.window();
        self.record(pending);
        Ok(window)
    }
}

/// Vertically centered; horizontally per anchor. Oversized content starts at the box edge.
fn place(content: Size, layout_box: Rectangle, anchor: Anchor) -> Point {
    let slack = |outer: u32, inner: u32| (outer.saturating_sub(inner) / 2) as i32;
    let x = match anchor {
        Anchor::Left => 0,
        Anchor::Center => slack(layout_box.size.width, content.width),
    };
    let y = slack(layout_box.size.height, content.height);
    layout_box.top_left + Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::testing::RecordingPanel;
    use embedded_graphics::mono_font::{ascii::FONT_10X20, MonoTextStyle};
    use embedded_graphics::text::{Baseline, Text};

    fn field_box() -> Rectangle {
        Rectangle::new(Point::new(10, 45), Size::new(128, 28))
    }

    fn text(s: &str) -> Text<'_, MonoTextStyle<'static, BinaryColor>> {
        Text::with_baseline(
            s,
            Point::zero(),
            MonoTextStyle::new(&FONT_10X20, BinaryColor::On),
            Baseline::Top,
        )
    }

    #[test]
    fn hull_ignores_empty_regions() {
        let a = Region::new(10, 10, 20, 5);
        let b = Region::new(15, 2, 30, 4);
        assert_eq!(a.hull(&Region::EMPTY), a);
        assert_eq!(Region::EMPTY.hull(&b), b);
        assert_eq!(a.hull(&b), Region::new(10, 2, 35, 13));
    }

    #[test]
    fn rectangle_conversion() {
        let rect = Rectangle::new(Point::new(-3, 7), Size::new(12, 9));
        assert_eq!(Rectangle::from(Region::from(rect)), rect);
        assert!(Region::from(Rectangle::zero()).is_empty());
    }

    #[test]
    fn first_erase_is_a_noop() {
        let mut panel = RecordingPanel::new();
        let mut tracker = RegionTracker::new();

        let pending = tracker
            .erase_and_get_draw_origin(
                &mut panel,
                Side::Left,
                Field::TankLevel,
                Size::new(30, 20),
                field_box(),
                Anchor::Center,
            )
            .unwrap();

        assert!(panel.touched().is_empty());
        assert_eq!(pending.origin, Point::new(10 + 49, 45 + 4));
        assert_eq!(pending.window(), pending.region);
        assert_eq!(tracker.record(pending), Region::new(59, 49, 30, 20));
    }

    #[test]
    fn stored_region_is_the_new_box_not_the_union() {
        let mut panel = RecordingPanel::new();
        let mut tracker = RegionTracker::new();

        tracker
            .redraw(&mut panel, Side::Right, Field::TankLevel, &text("100%"), field_box(), Anchor::Center)
            .unwrap();
        let wide = tracker.region(Side::Right, Field::TankLevel);
        assert_eq!(wide.width, 40);

        let window = tracker
            .redraw(&mut panel, Side::Right, Field::TankLevel, &text("0%"), field_box(), Anchor::Center)
            .unwrap();
        let narrow = tracker.region(Side::Right, Field::TankLevel);

        assert_eq!(narrow.width, 20);
        assert_eq!(narrow.height, 20);
        assert_eq!(window, wide.hull(&narrow));
        assert_eq!(window, wide);
    }

    #[test]
    fn erase_paints_exactly_the_old_box() {
        let mut panel = RecordingPanel::new();
        let mut tracker = RegionTracker::new();

        tracker
            .redraw(&mut panel, Side::Left, Field::Volts, &text("12.9 V"), field_box(), Anchor::Left)
            .unwrap();
        let old = tracker.region(Side::Left, Field::Volts);
        panel.clear_touched();

        let pending = tracker
            .erase_and_get_draw_origin(
                &mut panel,
                Side::Left,
                Field::Volts,
                Size::new(10, 20),
                field_box(),
                Anchor::Left,
            )
            .unwrap();

        let old_rect = Rectangle::from(old);
        assert_eq!(panel.touched().len() as u32, old_rect.size.width * old_rect.size.height);
        assert!(panel.touched().iter().all(|p| old_rect.contains(*p)));
        assert!(panel.touched().iter().all(|p| panel.pixel(*p) == Some(BinaryColor::Off)));
        // Geometry is only replaced on record
        assert_eq!(tracker.region(Side::Left, Field::Volts), old);
        tracker.record(pending);
        assert_eq!(tracker.region(Side::Left, Field::Volts), pending.region);
    }

    #[test]
    fn oversized_content_is_clipped_to_its_box() {
        let mut panel = RecordingPanel::new();
        let mut tracker = RegionTracker::new();
        let small = Rectangle::new(Point::new(20, 50), Size::new(30, 20));

        let window = tracker
            .redraw(&mut panel, Side::Left, Field::Clock, &text("too wide"), small, Anchor::Center)
            .unwrap();

        assert_eq!(window, Region::from(small));
        assert!(panel.touched().iter().all(|p| small.contains(*p)));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut panel = RecordingPanel::new();
        let mut tracker = RegionTracker::new();
        tracker
            .redraw(&mut panel, Side::Left, Field::Amps, &text("1.0 A"), field_box(), Anchor::Left)
            .unwrap();

        tracker.reset();
        assert!(tracker.region(Side::Left, Field::Amps).is_empty());
    }
}
