//! Two-line status screen shown while sensors and WiFi come up

use embedded_graphics::mono_font::{ascii::FONT_9X18_BOLD, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use super::{Panel, LANDSCAPE};

const FIRST_LINE: Point = Point::new(10, 40);
const SECOND_LINE: Point = Point::new(10, 80);

/// Full-screen two-line message used while the panel is still being brought up
pub fn show_status<P: Panel>(panel: &mut P, first: &str, second: &str) -> Result<(), P::Error> {
    log::info!("Status: {} / {}", first, second);

    panel.set_rotation(LANDSCAPE);
    panel.clear(BinaryColor::Off)?;
    let style = MonoTextStyle::new(&FONT_9X18_BOLD, BinaryColor::On);
    Text::with_baseline(first, FIRST_LINE, style, Baseline::Top).draw(panel)?;
    Text::with_baseline(second, SECOND_LINE, style, Baseline::Top).draw(panel)?;
    panel.refresh_full()
}

/// [`show_status`] for bring-up paths that carry on without the screen
pub fn show_status_logged<P>(panel: &mut P, first: &str, second: &str)
where
    P: Panel,
    P::Error: core::fmt::Debug,
{
    if let Err(e) = show_status(panel, first, second) {
        log::error!("Failed to show status screen: {:?}", e);
    }
}
