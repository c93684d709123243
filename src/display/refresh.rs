//! Ghosting control: when the accumulated partial updates call for a full refresh

/// Counts partial updates and asks for a full repaint once `threshold` is exceeded
///
/// Partial updates leave faint ghosting on e-paper; a periodic full refresh cycles
/// every pixel and restores contrast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshScheduler {
    counter: u32,
    threshold: u32,
}

impl RefreshScheduler {
    pub fn new(threshold: u32) -> Self {
        Self {
            counter: 0,
            threshold,
        }
    }

    /// Advance one tick; `true` means this tick must end with a full repaint
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter > self.threshold {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    /// Called whenever a full repaint happened for another reason
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_on_threshold_plus_one() {
        for threshold in [1, 2, 5, 2400] {
            let mut scheduler = RefreshScheduler::new(threshold);
            for call in 1..=threshold {
                assert!(!scheduler.tick(), "call {call} of {threshold}");
            }
            assert!(scheduler.tick());
            assert_eq!(scheduler.counter(), 0);
        }
    }

    #[test]
    fn cycle_repeats_after_firing() {
        let mut scheduler = RefreshScheduler::new(3);
        let fired: Vec<bool> = (0..8).map(|_| scheduler.tick()).collect();
        assert_eq!(fired, [false, false, false, true, false, false, false, true]);
    }

    #[test]
    fn counter_stays_within_threshold() {
        let mut scheduler = RefreshScheduler::new(4);
        for _ in 0..50 {
            scheduler.tick();
            assert!(scheduler.counter() <= scheduler.threshold());
        }
    }

    #[test]
    fn reset_restarts_the_count() {
        let mut scheduler = RefreshScheduler::new(3);
        scheduler.tick();
        scheduler.tick();
        scheduler.reset();
        assert_eq!(scheduler.counter(), 0);
        assert!(!scheduler.tick());
        assert!(!scheduler.tick());
        assert!(!scheduler.tick());
        assert!(scheduler.tick());
    }
}
