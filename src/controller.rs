//! One tick of the panel: touch, sensors, telemetry, partial redraws, ghosting control

use embedded_graphics::prelude::*;

use crate::clock::Clock;
use crate::config::PanelConfig;
use crate::display::{
    DisplayMode, DisplayPage, Layout, LinkState, Panel, PaneValue, RefreshScheduler, Side,
};
use crate::input::{InputEvent, TouchSensor, TouchToggle};
use crate::sensors::{BatteryMonitor, SensorSource, TankAdc};
use crate::telemetry::TelemetryPublisher;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub toggled: bool,
    pub panes_drawn: u8,
    pub full_repaint: bool,
    /// Battery banks or tank sweeps skipped because the bus failed
    pub sensor_failures: u8,
    /// Display operations that failed; the tick carried on past them
    pub display_failures: u8,
}

pub struct PanelController<P, B, A, T, I, C> {
    config: PanelConfig,
    panel: P,
    page: DisplayPage,
    scheduler: RefreshScheduler,
    sensors: SensorSource<B, A>,
    telemetry: T,
    touch: TouchToggle<I>,
    clock: C,
}

impl<P, B, A, T, I, C> PanelController<P, B, A, T, I, C>
where
    P: Panel,
    B: BatteryMonitor,
    A: TankAdc,
    T: TelemetryPublisher,
    I: TouchSensor,
    C: Clock,
{
    /// `config` is expected to have passed [`PanelConfig::validate`]
    pub fn new(
        config: PanelConfig,
        panel: P,
        sensors: SensorSource<B, A>,
        telemetry: T,
        touch: TouchToggle<I>,
        clock: C,
    ) -> Self {
        let layout = Layout::for_screen(panel.bounding_box().size);
        let battery_titles = Side::ALL.map(|side| config.battery(side).name.clone());
        let tank_titles = Side::ALL.map(|side| config.tank(side).name.clone());

        Self {
            page: DisplayPage::new(layout, battery_titles, tank_titles),
            scheduler: RefreshScheduler::new(config.refresh_threshold),
            config,
            panel,
            sensors,
            telemetry,
            touch,
            clock,
        }
    }

    /// Paint the battery page chrome; call once before the first tick
    pub fn start(&mut self) -> Result<(), P::Error> {
        self.page.start(&mut self.panel)?;
        self.scheduler.reset();
        Ok(())
    }

    /// One cycle: toggle, sample, publish, then draw
    ///
    /// Every reading is published before anything is drawn, and a failed display
    /// operation does not stop the rest of the tick. The first display error is
    /// returned once the tick is complete; the counts are logged with it.
    pub fn tick(&mut self, link: LinkState) -> Result<TickReport, P::Error> {
        let mut report = TickReport::default();
        let mut first_error = None;

        if let Some(InputEvent::ToggleRequested) = self.touch.poll() {
            let toggled = self.page.toggle(&mut self.panel);
            note(toggled.map(|_| ()), &mut report, &mut first_error);
            self.scheduler.reset();
            report.toggled = true;
        }

        let values = self.sample(&mut report);
        let clock = self.clock.now();

        for (side, value) in values {
            let drawn = self
                .page
                .update_pane(&mut self.panel, side, value, clock.for_side(side), link);
            match drawn {
                Ok(true) => report.panes_drawn += 1,
                Ok(false) => {}
                Err(e) => note(Err(e), &mut report, &mut first_error),
            }
        }

        // A toggle already repainted everything this tick
        if !report.toggled && self.scheduler.tick() {
            let repainted = self.page.full_repaint(&mut self.panel);
            note(repainted, &mut report, &mut first_error);
            report.full_repaint = true;
        }

        match first_error {
            Some(e) => {
                log::warn!(
                    "{} display operation(s) failed this tick, {} pane(s) drawn",
                    report.display_failures,
                    report.panes_drawn
                );
                Err(e)
            }
            None => Ok(report),
        }
    }

    /// Read and publish every bank and tank; the values for the panes come back
    fn sample(&mut self, report: &mut TickReport) -> Vec<(Side, PaneValue)> {
        let mut values = Vec::with_capacity(4);

        for side in Side::ALL {
            let bank = self.config.battery(side);
            let readings = match self.sensors.poll_battery(
                bank,
                self.config.shunt_micro_ohm,
                self.config.max_amps,
            ) {
                Ok(readings) => readings,
                Err(e) => {
                    log::warn!("Skipping {} this tick: {}", bank.name, e);
                    report.sensor_failures += 1;
                    continue;
                }
            };

            self.telemetry.publish_reading(&readings.voltage);
            self.telemetry.publish_reading(&readings.current);
            values.push((
                side,
                PaneValue::Battery {
                    volts: readings.voltage.value(),
                    amps: readings.current.value(),
                },
            ));
        }

        match self.sensors.poll_tanks(&self.config) {
            Ok(tanks) => {
                for (side, tank) in Side::ALL.into_iter().zip(tanks) {
                    self.telemetry.publish_reading(&tank.level);
                    values.push((
                        side,
                        PaneValue::Tank {
                            level: tank.display_level,
                        },
                    ));
                }
            }
            Err(e) => {
                log::warn!("Skipping tanks this tick: {}", e);
                report.sensor_failures += 1;
            }
        }

        values
    }

    pub fn mode(&self) -> DisplayMode {
        self.page.mode()
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }
}

/// Count a failed display operation, keeping the first error
fn note<E>(result: Result<(), E>, report: &mut TickReport, first_error: &mut Option<E>) {
    if let Err(e) = result {
        report.display_failures += 1;
        if first_error.is_none() {
            *first_error = Some(e);
        }
    }
}
