//! Start-up detection of the battery monitor
//!
//! Nothing useful can be shown without the monitor, so start-up blocks here, showing
//! a status screen, until it answers or the retry policy gives up.

use embedded_hal::delay::DelayNs;

use super::BatteryMonitor;
use crate::config::RetryPolicy;
use crate::display::{show_status_logged as status, Panel};
use crate::error::SensorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorInit {
    Searching { attempts: u32 },
    Ready { devices: u8, attempts: u32 },
    Exhausted { attempts: u32 },
}

impl SensorInit {
    pub fn new() -> Self {
        SensorInit::Searching { attempts: 0 }
    }

    /// Fold one probe outcome (`Some(channel_count)` if found) into the state
    pub fn record_attempt(self, found: Option<u8>, policy: &RetryPolicy) -> Self {
        let SensorInit::Searching { attempts } = self else {
            return self;
        };
        let attempts = attempts + 1;

        match found {
            Some(devices) => SensorInit::Ready { devices, attempts },
            None if policy.max_attempts.is_some_and(|max| attempts >= max) => {
                SensorInit::Exhausted { attempts }
            }
            None => SensorInit::Searching { attempts },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SensorInit::Ready { .. })
    }
}

impl Default for SensorInit {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `probe` until it yields a monitor, waiting `policy.delay_ms` between attempts
///
/// Status screen failures are logged and otherwise ignored; they must not keep the
/// sensors from being found.
pub fn wait_for_sensors<M, P, D, F>(
    mut probe: F,
    panel: &mut P,
    delay: &mut D,
    policy: &RetryPolicy,
) -> Result<M, SensorError>
where
    M: BatteryMonitor,
    P: Panel,
    P::Error: core::fmt::Debug,
    D: DelayNs,
    F: FnMut() -> Result<M, SensorError>,
{
    let mut state = SensorInit::new();
    status(panel, "Looking for INA device", "");

    loop {
        let outcome = probe();
        let found = outcome.as_ref().ok().map(|monitor| monitor.device_count());
        state = state.record_attempt(found, policy);

        match (state, outcome) {
            (SensorInit::Ready { devices, attempts }, Ok(monitor)) => {
                log::info!("Battery monitor ready after {} attempt(s)", attempts);
                status(panel, "INA devices detected", &format!("{} devices found", devices));
                return Ok(monitor);
            }
            (SensorInit::Exhausted { attempts }, Err(e)) => {
                log::error!("Giving up on battery monitor after {} attempts: {}", attempts, e);
                return Err(SensorError::RetriesExhausted { attempts });
            }
            (_, Err(e)) => {
                log::warn!("Battery monitor not found ({}), retrying in {} ms", e, policy.delay_ms);
                status(panel, "Looking for INA device", "Not found - retrying");
                delay.delay_ms(policy.delay_ms);
            }
            (state, Ok(_)) => {
                // record_attempt always turns a found monitor into Ready
                log::error!("Unexpected probe state {:?}", state);
                return Err(SensorError::DeviceNotFound);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::testing::RecordingPanel;
    use crate::sensors::testing::FakeSensors;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    fn policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            delay_ms: 10_000,
            max_attempts,
        }
    }

    #[test]
    fn state_machine_transitions() {
        let bounded = policy(Some(2));
        let state = SensorInit::new().record_attempt(None, &bounded);
        assert_eq!(state, SensorInit::Searching { attempts: 1 });
        assert_eq!(
            state.record_attempt(None, &bounded),
            SensorInit::Exhausted { attempts: 2 }
        );
        let ready = state.record_attempt(Some(6), &bounded);
        assert_eq!(ready, SensorInit::Ready { devices: 6, attempts: 2 });
        assert!(ready.is_ready());
        // Terminal states stay put
        assert_eq!(ready.record_attempt(None, &bounded), ready);
    }

    #[test]
    fn unbounded_policy_keeps_searching() {
        let forever = policy(None);
        let mut state = SensorInit::new();
        for _ in 0..1000 {
            state = state.record_attempt(None, &forever);
        }
        assert_eq!(state, SensorInit::Searching { attempts: 1000 });
    }

    #[test]
    fn found_after_retries() {
        let mut panel = RecordingPanel::new();
        let mut calls = 0;
        let probe = || {
            calls += 1;
            if calls < 3 {
                Err(SensorError::DeviceNotFound)
            } else {
                Ok(FakeSensors::default())
            }
        };

        let monitor = wait_for_sensors(probe, &mut panel, &mut NoopDelay::new(), &policy(None));

        assert!(monitor.is_ok());
        assert_eq!(calls, 3);
        // Initial screen, two retries, found
        assert_eq!(panel.full_refreshes(), 4);
    }

    #[test]
    fn bounded_policy_gives_up() {
        let mut panel = RecordingPanel::new();
        let mut calls = 0;
        let probe = || -> Result<FakeSensors, SensorError> {
            calls += 1;
            Err(SensorError::DeviceNotFound)
        };

        let result = wait_for_sensors(probe, &mut panel, &mut NoopDelay::new(), &policy(Some(4)));

        assert_eq!(result.err(), Some(SensorError::RetriesExhausted { attempts: 4 }));
        assert_eq!(calls, 4);
    }
}
