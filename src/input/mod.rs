//! Input handling for the capacitive touch pad
//!
//! The pad reports a raw charge reading; a finger pulls it down. Every tick the
//! reading is compared against a threshold and a touch becomes a page toggle.

pub mod types;
pub use types::*;

/// Raw capacitive touch reading
pub trait TouchSensor {
    type Error: core::fmt::Debug;

    fn read(&mut self) -> Result<u16, Self::Error>;
}

/// Turns touch readings into toggle requests
///
/// Level triggered: every tick the pad reads below the threshold requests one toggle.
/// A full repaint takes longer than a tap, so a tap is seen on a single tick.
pub struct TouchToggle<T> {
    sensor: T,
    threshold: u16,
    last_state: TouchState,
}

impl<T: TouchSensor> TouchToggle<T> {
    pub fn new(sensor: T, threshold: u16) -> Self {
        Self {
            sensor,
            threshold,
            last_state: TouchState::Released,
        }
    }

    pub fn state(&self) -> TouchState {
        self.last_state
    }

    /// Read the pad once; a failed read counts as no touch
    pub fn poll(&mut self) -> Option<InputEvent> {
        let reading = match self.sensor.read() {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("Touch read failed: {:?}", e);
                return None;
            }
        };

        let state = if reading < self.threshold {
            TouchState::Touched
        } else {
            TouchState::Released
        };
        if state != self.last_state {
            log::debug!("Touch pad {} (reading {})", state, reading);
        }
        self.last_state = state;

        (state == TouchState::Touched).then_some(InputEvent::ToggleRequested)
    }

    pub fn release(self) -> T {
        self.sensor
    }
}

/// Pad that is never touched
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTouch;

impl TouchSensor for NoTouch {
    type Error = core::convert::Infallible;

    fn read(&mut self) -> Result<u16, Self::Error> {
        Ok(u16::MAX)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TouchSensor;
    use std::collections::VecDeque;

    /// Replays readings, then reports the pad as untouched
    #[derive(Debug, Default)]
    pub struct ScriptedTouch {
        pub readings: VecDeque<Result<u16, ()>>,
    }

    impl ScriptedTouch {
        pub fn new(readings: impl IntoIterator<Item = Result<u16, ()>>) -> Self {
            Self {
                readings: readings.into_iter().collect(),
            }
        }
    }

    impl TouchSensor for ScriptedTouch {
        type Error = ();

        fn read(&mut self) -> Result<u16, Self::Error> {
            self.readings.pop_front().unwrap_or(Ok(u16::MAX))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTouch;
    use super::*;

    #[test]
    fn below_threshold_requests_toggle() {
        let sensor = ScriptedTouch::new([Ok(80), Ok(29), Ok(30), Ok(5)]);
        let mut toggle = TouchToggle::new(sensor, 30);

        assert_eq!(toggle.poll(), None);
        assert_eq!(toggle.poll(), Some(InputEvent::ToggleRequested));
        assert_eq!(toggle.state(), TouchState::Touched);
        assert_eq!(toggle.poll(), None);
        assert_eq!(toggle.state(), TouchState::Released);
        assert_eq!(toggle.poll(), Some(InputEvent::ToggleRequested));
    }

    #[test]
    fn read_errors_are_not_touches() {
        let sensor = ScriptedTouch::new([Err(()), Ok(0)]);
        let mut toggle = TouchToggle::new(sensor, 30);

        assert_eq!(toggle.poll(), None);
        assert_eq!(toggle.poll(), Some(InputEvent::ToggleRequested));
    }

    #[test]
    fn untouched_pad_never_toggles() {
        let mut toggle = TouchToggle::new(NoTouch, 30);
        assert!((0..10).all(|_| toggle.poll().is_none()));
    }
}
