//! Network link indicator drawn with primitives

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected,
}

impl LinkState {
    pub fn from_connected(connected: bool) -> Self {
        if connected {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        }
    }
}

const GLYPH_SIZE: u32 = 12;
const BAR_WIDTH: u32 = 2;
const BAR_PITCH: i32 = 3;

/// Signal bars when connected, a cross when not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkGlyph {
    state: LinkState,
    top_left: Point,
}

impl LinkGlyph {
    pub fn new(state: LinkState, top_left: Point) -> Self {
        Self { state, top_left }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }
}

impl Dimensions for LinkGlyph {
    fn bounding_box(&self) -> Rectangle {
        Rectangle::new(self.top_left, Size::new_equal(GLYPH_SIZE))
    }
}

impl Transform for LinkGlyph {
    fn translate(&self, by: Point) -> Self {
        Self {
            top_left: self.top_left + by,
            ..*self
        }
    }

    fn translate_mut(&mut self, by: Point) -> &mut Self {
        self.top_left += by;
        self
    }
}

impl Drawable for LinkGlyph {
    type Color = BinaryColor;
    type Output = ();

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let ink = PrimitiveStyle::with_fill(BinaryColor::On);
        let bottom = self.top_left.y + GLYPH_SIZE as i32;

        match self.state {
            LinkState::Connected => {
                for bar in 0..4 {
                    let height = 3 * (bar as u32 + 1);
                    Rectangle::new(
                        Point::new(self.top_left.x + bar * BAR_PITCH, bottom - height as i32),
                        Size::new(BAR_WIDTH, height),
                    )
                    .into_styled(ink)
                    .draw(target)?;
                }
            }
            LinkState::Disconnected => {
                let thin = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
                let far = GLYPH_SIZE as i32 - 1;
                // Two one-pixel lines per diagonal give a bold cross
                for shift in [0, 1] {
                    Line::new(
                        self.top_left + Point::new(shift, 0),
                        self.top_left + Point::new(far, far - shift),
                    )
                    .into_styled(thin)
                    .draw(target)?;
                    Line::new(
                        self.top_left + Point::new(far - shift, 0),
                        self.top_left + Point::new(0, far - shift),
                    )
                    .into_styled(thin)
                    .draw(target)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::testing::RecordingPanel;

    #[test]
    fn stays_inside_its_box() {
        for state in [LinkState::Connected, LinkState::Disconnected] {
            let mut panel = RecordingPanel::new();
            let glyph = LinkGlyph::new(state, Point::new(200, 100));
            glyph.draw(&mut panel).unwrap();

            let bounds = glyph.bounding_box();
            assert!(!panel.touched().is_empty());
            assert!(panel.touched().iter().all(|p| bounds.contains(*p)), "{state:?}");
        }
    }

    #[test]
    fn translate_moves_the_box() {
        let glyph = LinkGlyph::new(LinkState::Connected, Point::zero()).translate(Point::new(5, 6));
        assert_eq!(glyph.bounding_box().top_left, Point::new(5, 6));
        assert_eq!(glyph.state(), LinkState::Connected);
    }

    #[test]
    fn states_look_different() {
        let mut connected = RecordingPanel::new();
        let mut disconnected = RecordingPanel::new();
        LinkGlyph::new(LinkState::Connected, Point::zero()).draw(&mut connected).unwrap();
        LinkGlyph::new(LinkState::Disconnected, Point::zero()).draw(&mut disconnected).unwrap();
        assert_ne!(connected.touched(), disconnected.touched());
    }
}
