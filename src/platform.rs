//! ESP-IDF glue: RTC clock, touch pad, SNTP and heap reporting

use core::mem::MaybeUninit;

use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};
use esp_idf_svc::sys::{self, esp, EspError};

use panel_sensors::clock::{Clock, ClockText};
use panel_sensors::input::TouchSensor;

/// Local time from the RTC, kept right by SNTP once the network is up
pub struct RtcClock;

impl Clock for RtcClock {
    fn now(&mut self) -> ClockText {
        // SAFETY: both calls only write into the locals handed to them
        let tm = unsafe {
            let mut now: sys::time_t = 0;
            sys::time(&mut now);
            let mut tm = MaybeUninit::<sys::tm>::zeroed();
            sys::localtime_r(&now, tm.as_mut_ptr());
            tm.assume_init()
        };

        ClockText::from_parts(
            1900 + tm.tm_year,
            (tm.tm_mon + 1) as u8,
            tm.tm_mday as u8,
            tm.tm_hour as u8,
            tm.tm_min as u8,
            tm.tm_sec as u8,
        )
    }
}

/// One channel of the legacy ESP32 touch peripheral
pub struct TouchPad {
    pad: sys::touch_pad_t,
}

impl TouchPad {
    pub fn new(pad: u32) -> Result<Self, EspError> {
        esp!(unsafe { sys::touch_pad_init() })?;
        // Interrupt threshold unused, the pad is polled
        esp!(unsafe { sys::touch_pad_config(pad as sys::touch_pad_t, 0) })?;
        Ok(Self {
            pad: pad as sys::touch_pad_t,
        })
    }
}

impl TouchSensor for TouchPad {
    type Error = EspError;

    fn read(&mut self) -> Result<u16, Self::Error> {
        let mut value = 0u16;
        esp!(unsafe { sys::touch_pad_read(self.pad, &mut value) })?;
        Ok(value)
    }
}

/// Apply the POSIX TZ string used by `localtime_r`
pub fn set_time_zone(tz: &str) {
    std::env::set_var("TZ", tz);
    unsafe { sys::tzset() };
    log::info!("Time zone set to {}", tz);
}

/// Start SNTP against `server`; the returned handle must stay alive
pub fn start_sntp(server: &str) -> Result<EspSntp<'static>, EspError> {
    let mut conf = SntpConf::default();
    conf.servers[0] = server;
    let sntp = EspSntp::new(&conf)?;
    log::info!("SNTP started against {}", server);
    Ok(sntp)
}

/// Poll until the first sync, at most `timeout_ms`
pub fn wait_for_time(sntp: &EspSntp<'_>, timeout_ms: u32) -> bool {
    const POLL_MS: u32 = 250;
    let mut waited = 0;
    while sntp.get_sync_status() != SyncStatus::Completed {
        if waited >= timeout_ms {
            log::warn!("No SNTP time after {} ms, using the RTC as is", waited);
            return false;
        }
        esp_idf_svc::hal::delay::FreeRtos::delay_ms(POLL_MS);
        waited += POLL_MS;
    }
    log::info!("Time synchronized");
    true
}

pub fn log_free_heap(context: &str) {
    let free = unsafe { sys::esp_get_free_heap_size() };
    log::info!("{}: free heap {} bytes", context, free);
}
