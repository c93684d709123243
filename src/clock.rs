//! Wall-clock text shown under the values

use crate::display::Side;

/// Local date and time, already formatted for the panel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClockText {
    /// `MM/DD/YY`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
}

impl ClockText {
    pub fn from_parts(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            date: format!("{:02}/{:02}/{:02}", month, day, year.rem_euclid(100)),
            time: format!("{:02}:{:02}:{:02}", hour, minute, second),
        }
    }

    /// Date on the left pane, time on the right, so one glance across gives both
    pub fn for_side(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.date,
            Side::Right => &self.time,
        }
    }
}

pub trait Clock {
    fn now(&mut self) -> ClockText;
}

/// Always the same instant
#[derive(Debug, Clone, Default)]
pub struct FixedClock(pub ClockText);

impl Clock for FixedClock {
    fn now(&mut self) -> ClockText {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_strftime() {
        let text = ClockText::from_parts(2024, 3, 7, 9, 5, 0);
        assert_eq!(text.date, "03/07/24");
        assert_eq!(text.time, "09:05:00");

        let text = ClockText::from_parts(2000, 12, 31, 23, 59, 59);
        assert_eq!(text.date, "12/31/00");
        assert_eq!(text.time, "23:59:59");
    }

    #[test]
    fn panes_split_date_and_time() {
        let text = ClockText::from_parts(2024, 3, 7, 9, 5, 0);
        assert_eq!(text.for_side(Side::Left), "03/07/24");
        assert_eq!(text.for_side(Side::Right), "09:05:00");
    }
}
