//! The battery and tank pages and everything drawn on them

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X13_BOLD, FONT_7X13_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::PrimitiveStyle;
use embedded_graphics::text::{Baseline, Text};

use super::glyph::{LinkGlyph, LinkState};
use super::layout::{Field, Layout, Side};
use super::region::{Region, RegionTracker};
use super::{Panel, LANDSCAPE};

const VALUE_FONT: &MonoFont<'static> = &FONT_10X20;
const CLOCK_FONT: &MonoFont<'static> = &FONT_7X13_BOLD;
const SUBTITLE_FONT: &MonoFont<'static> = &FONT_6X13_BOLD;
const TANK_SUBTITLE: &str = "WATER TANK";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Battery,
    Tank,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Battery => DisplayMode::Tank,
            DisplayMode::Tank => DisplayMode::Battery,
        }
    }
}

/// Primary value of one pane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneValue {
    Battery { volts: f32, amps: f32 },
    /// Already quantized percentage
    Tank { level: u8 },
}

impl PaneValue {
    /// Page this value belongs on
    pub fn mode(&self) -> DisplayMode {
        match self {
            PaneValue::Battery { .. } => DisplayMode::Battery,
            PaneValue::Tank { .. } => DisplayMode::Tank,
        }
    }
}

/// Last content drawn into a pane, replayed by a full repaint
#[derive(Debug, Clone, PartialEq)]
struct PaneSnapshot {
    value: PaneValue,
    clock: String,
    link: LinkState,
}

/// The active page, its chrome and the geometry of everything drawn on it
pub struct DisplayPage {
    mode: DisplayMode,
    layout: Layout,
    tracker: RegionTracker,
    snapshots: [Option<PaneSnapshot>; 2],
    battery_titles: [String; 2],
    tank_titles: [String; 2],
}

impl DisplayPage {
    /// Starts on the battery page; nothing is drawn until [`start`](Self::start)
    pub fn new(layout: Layout, battery_titles: [String; 2], tank_titles: [String; 2]) -> Self {
        Self {
            mode: DisplayMode::Battery,
            layout,
            tracker: RegionTracker::new(),
            snapshots: [None, None],
            battery_titles,
            tank_titles,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn tracker(&self) -> &RegionTracker {
        &self.tracker
    }

    /// First paint of the initial page
    pub fn start<P: Panel>(&mut self, panel: &mut P) -> Result<(), P::Error> {
        self.repaint(panel)
    }

    /// Switch page and repaint its empty chrome; values appear with the next update
    pub fn toggle<P: Panel>(&mut self, panel: &mut P) -> Result<DisplayMode, P::Error> {
        self.mode = self.mode.toggled();
        self.snapshots = [None, None];
        log::info!("Switching to {:?} page", self.mode);
        self.repaint(panel)?;
        Ok(self.mode)
    }

    /// Full refresh of the current page with the last values it showed
    pub fn full_repaint<P: Panel>(&mut self, panel: &mut P) -> Result<(), P::Error> {
        log::info!("Full repaint of {:?} page", self.mode);
        self.repaint(panel)
    }

    /// Redraw one pane's value, clock and (right pane) link glyph, each with its own
    /// partial refresh
    ///
    /// Returns `false` and draws nothing if `value` belongs to the other page.
    pub fn update_pane<P: Panel>(
        &mut self,
        panel: &mut P,
        side: Side,
        value: PaneValue,
        clock: &str,
        link: LinkState,
    ) -> Result<bool, P::Error> {
        if value.mode() != self.mode {
            return Ok(false);
        }

        let snapshot = PaneSnapshot {
            value,
            clock: clock.to_string(),
            link,
        };
        self.draw_pane(panel, side, &snapshot, true)?;
        self.snapshots[side.index()] = Some(snapshot);
        Ok(true)
    }

    fn repaint<P: Panel>(&mut self, panel: &mut P) -> Result<(), P::Error> {
        panel.set_rotation(LANDSCAPE);
        self.tracker.reset();
        self.draw_chrome(panel)?;

        for side in Side::ALL {
            if let Some(snapshot) = self.snapshots[side.index()].clone() {
                self.draw_pane(panel, side, &snapshot, false)?;
            }
        }

        panel.refresh_full()
    }

    /// Black background, white panes, titles; "WATER TANK" under each tank title
    fn draw_chrome<P: Panel>(&self, panel: &mut P) -> Result<(), P::Error> {
        panel.clear(BinaryColor::On)?;

        let paper = PrimitiveStyle::with_fill(BinaryColor::Off);
        let title_style = MonoTextStyle::new(VALUE_FONT, BinaryColor::Off);
        let titles = match self.mode {
            DisplayMode::Battery => &self.battery_titles,
            DisplayMode::Tank => &self.tank_titles,
        };

        for side in Side::ALL {
            self.layout.pane(side).into_styled(paper).draw(panel)?;
            Text::with_baseline(
                &titles[side.index()],
                self.layout.title_origin(side),
                title_style,
                Baseline::Alphabetic,
            )
            .draw(panel)?;

            if self.mode == DisplayMode::Tank {
                Text::with_baseline(
                    TANK_SUBTITLE,
                    self.layout.subtitle_origin(side),
                    MonoTextStyle::new(SUBTITLE_FONT, BinaryColor::On),
                    Baseline::Top,
                )
                .draw(panel)?;
            }
        }
        Ok(())
    }

    fn draw_pane<P: Panel>(
        &mut self,
        panel: &mut P,
        side: Side,
        snapshot: &PaneSnapshot,
        partial: bool,
    ) -> Result<(), P::Error> {
        let values = match snapshot.value {
            PaneValue::Battery { volts, amps } => vec![
                (Field::Volts, format!("{:5.1} V", volts)),
                (Field::Amps, format!("{:5.1} A", amps)),
            ],
            PaneValue::Tank { level } => vec![(Field::TankLevel, format!("{}%", level))],
        };

        for (field, text) in &values {
            let window = self.draw_item(panel, side, *field, &text_item(text, VALUE_FONT))?;
            push_window(panel, window, partial)?;
        }

        let window = self.draw_item(panel, side, Field::Clock, &text_item(&snapshot.clock, CLOCK_FONT))?;
        push_window(panel, window, partial)?;

        let glyph = LinkGlyph::new(snapshot.link, Point::zero());
        let window = self.draw_item(panel, side, Field::Link, &glyph)?;
        push_window(panel, window, partial)
    }

    /// `None` when the field has no place on this page and side
    fn draw_item<P, T>(
        &mut self,
        panel: &mut P,
        side: Side,
        field: Field,
        item: &T,
    ) -> Result<Option<Region>, P::Error>
    where
        P: Panel,
        T: Drawable<Color = BinaryColor> + Dimensions + Transform,
    {
        let Some((layout_box, anchor)) = self.layout.field_box(self.mode, side, field) else {
            return Ok(None);
        };
        self.tracker
            .redraw(panel, side, field, item, layout_box, anchor)
            .map(Some)
    }
}

fn text_item<'a>(text: &'a str, font: &'static MonoFont<'static>) -> Text<'a, MonoTextStyle<'static, BinaryColor>> {
    Text::with_baseline(
        text,
        Point::zero(),
        MonoTextStyle::new(font, BinaryColor::On),
        Baseline::Top,
    )
}

fn push_window<P: Panel>(panel: &mut P, window: Option<Region>, partial: bool) -> Result<(), P::Error> {
    match window {
        Some(window) if partial && !window.is_empty() => {
            log::debug!("Partial refresh {:?}", window);
            panel.refresh_partial(window)
        }
        _ => Ok(()),
    }
}
