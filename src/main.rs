#[cfg(target_os = "espidf")]
mod platform;
#[cfg(target_os = "espidf")]
mod wifi;

// https://docs.esp-rs.org/esp-idf-svc/esp_idf_svc/
#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use core::cell::RefCell;

    use std::time::Duration;

    use anyhow::{anyhow, Context};
    use embedded_hal_bus::i2c::RefCellDevice;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::delay::{Delay, FreeRtos};
    use esp_idf_svc::hal::gpio::{self, PinDriver};
    use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::spi;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;

    use panel_sensors::config::WifiConfig;
    use panel_sensors::display::{show_status_logged as status, LinkState};
    use panel_sensors::input::TouchToggle;
    use panel_sensors::sensors::ads1115::{self, Ads1115};
    use panel_sensors::sensors::ina3221::{self, Ina3221Bank};
    use panel_sensors::sensors::probe::wait_for_sensors;
    use panel_sensors::sensors::SensorSource;
    use panel_sensors::ssd1680::panel::EpaperPanel;
    use panel_sensors::ssd1680::pins::Pins;
    use panel_sensors::telemetry::signalk::SignalKUdp;
    use panel_sensors::{PanelConfig, PanelController};

    use crate::platform::{log_free_heap, set_time_zone, start_sntp, wait_for_time, RtcClock, TouchPad};
    use crate::wifi::{WifiManager, WifiNetwork};

    const WIFI_TIMEOUT: Duration = Duration::from_secs(30);
    const SNTP_TIMEOUT_MS: u32 = 10_000;

    // It is necessary to call this function once. Otherwise some patches to the runtime
    // implemented by esp-idf-sys might not link properly. See https://github.com/esp-rs/esp-idf-template/issues/71
    esp_idf_svc::sys::link_patches();

    // Bind the log crate to the ESP Logging facilities
    esp_idf_svc::log::EspLogger::initialize_default();

    let config = PanelConfig {
        wifi: WifiConfig::from_env(option_env!("WIFI_SSID"), option_env!("WIFI_PASS")),
        ..PanelConfig::default()
    };
    config.validate()?;
    log_free_heap("Boot");

    let peripherals = Peripherals::take().context("Could not take peripherals")?;
    let pins = peripherals.pins;

    // Display on SPI3 (VSPI), pin numbers as in Pins
    log::info!("Configuring display SPI");
    let spi = spi::SpiDeviceDriver::new_single(
        peripherals.spi3,
        pins.gpio18,                    // Pins::SCK
        pins.gpio23,                    // Pins::MOSI
        Option::<gpio::AnyIOPin>::None, // No MISO needed for display
        Some(pins.gpio5),               // Pins::CS
        &spi::SpiDriverConfig::new(),
        &spi::SpiConfig::new().baudrate(4.MHz().into()),
    )
    .context("Could not create SPI device driver")?;

    let mut panel = EpaperPanel::new(
        spi,
        PinDriver::input(pins.gpio4)?,   // Pins::BSY
        PinDriver::output(pins.gpio17)?, // Pins::DC
        PinDriver::output(pins.gpio16)?, // Pins::RST
        Delay::default(),
    )
    .map_err(|e| anyhow!("Display init failed: {:?}", e))?;

    // INA3221 chips and the ADS1115 share one bus
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        pins.gpio21, // Pins::SDA
        pins.gpio22, // Pins::SCL
        &I2cConfig::new().baudrate(400.kHz().into()),
    )
    .context("Could not create I2C driver")?;
    let bus = RefCell::new(i2c);

    let mut delay = Delay::default();
    let monitor = wait_for_sensors(
        || {
            Ina3221Bank::probe(
                RefCellDevice::new(&bus),
                &ina3221::DEFAULT_ADDRESSES,
                config.shunt_micro_ohm,
            )
        },
        &mut panel,
        &mut delay,
        &config.sensor_retry,
    )
    .context("Battery monitor not available")?;
    let adc = Ads1115::new(RefCellDevice::new(&bus), Delay::default(), ads1115::DEFAULT_ADDRESS);

    // The panel runs without a network, telemetry and SNTP just wait for one
    let ssid = config.wifi.ssid.as_str();
    if config.wifi.is_open() {
        log::info!("Joining {} as an open network", ssid);
    }
    status(&mut panel, "Connecting to WiFi", ssid);
    let networks = [WifiNetwork::new(ssid, &config.wifi.password)];

    let mut sntp = None;
    let mut wifi = WifiManager::new(
        peripherals.modem,
        EspSystemEventLoop::take()?,
        EspDefaultNvsPartition::take()?,
    )?;
    match wifi.connect(&networks, WIFI_TIMEOUT) {
        Ok(()) => {
            let ip = wifi.ip().map(|ip| format!("IP: {}", ip)).unwrap_or_default();
            log::info!("On {} with {}", wifi.current_ssid().unwrap_or(ssid), ip);
            status(&mut panel, "Connection Successful", &ip);
            match start_sntp(&config.ntp_server) {
                Ok(handle) => {
                    wait_for_time(&handle, SNTP_TIMEOUT_MS);
                    sntp = Some(handle);
                }
                Err(e) => log::warn!("SNTP unavailable: {}", e),
            }
        }
        Err(e) => {
            log::warn!("WiFi not connected: {}", e);
            status(&mut panel, "No connection to", &format!("{} proceeding", ssid));
        }
    }
    set_time_zone(&config.time_zone);
    log::info!("SNTP {}", if sntp.is_some() { "running" } else { "off" });

    let telemetry = SignalKUdp::new(&config.telemetry);
    let pad = TouchPad::new(Pins::TOUCH_PAD).context("Touch pad init failed")?;
    let touch = TouchToggle::new(pad, config.touch_threshold);
    let tick_interval_ms = config.tick_interval_ms;

    let mut controller = PanelController::new(
        config,
        panel,
        SensorSource::new(monitor, adc),
        telemetry,
        touch,
        RtcClock,
    );
    controller
        .start()
        .map_err(|e| anyhow!("Failed to draw the first page: {:?}", e))?;
    log_free_heap("Panel started");

    loop {
        let connected = wifi.is_connected();
        match controller.tick(LinkState::from_connected(connected)) {
            Ok(report) => {
                if report.toggled {
                    log::info!("Switched to {:?} page", controller.mode());
                    log_free_heap("Page switch");
                }
                if report.sensor_failures > 0 {
                    log::debug!("{} sensor reads failed this tick", report.sensor_failures);
                }
            }
            Err(e) => log::error!("Display update failed: {:?}", e),
        }
        FreeRtos::delay_ms(tick_interval_ms);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    eprintln!("panel-sensors firmware runs on ESP-IDF only; use `cargo test` for the host library");
}
