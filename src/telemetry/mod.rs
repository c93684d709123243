//! Republishing readings to the boat network

pub mod signalk;

pub use signalk::SignalKUdp;

use crate::reading::SensorReading;

/// Fire-and-forget sink for `(path, value)` points
///
/// Implementations never report failure back; a point that cannot be sent is dropped.
pub trait TelemetryPublisher {
    fn publish(&mut self, path: &str, value: f32);

    fn publish_reading(&mut self, reading: &SensorReading) {
        self.publish(reading.key(), reading.value());
    }
}

/// Telemetry switched off
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTelemetry;

impl TelemetryPublisher for NoTelemetry {
    fn publish(&mut self, _path: &str, _value: f32) {}
}

impl<T: TelemetryPublisher + ?Sized> TelemetryPublisher for &mut T {
    fn publish(&mut self, path: &str, value: f32) {
        (**self).publish(path, value)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TelemetryPublisher;

    /// Keeps every published point
    #[derive(Debug, Default)]
    pub struct RecordingPublisher {
        pub points: Vec<(String, f32)>,
    }

    impl RecordingPublisher {
        pub fn value(&self, path: &str) -> Option<f32> {
            self.points
                .iter()
                .rev()
                .find(|(p, _)| p == path)
                .map(|(_, v)| *v)
        }
    }

    impl TelemetryPublisher for RecordingPublisher {
        fn publish(&mut self, path: &str, value: f32) {
            self.points.push((path.to_string(), value));
        }
    }
}
