use std::fmt;

use serde::{Deserialize, Serialize};

/// Seconds in a minute.
pub const SECONDS_PER_MINUTE: u8 = 60;
/// Minutes in an hour.
pub const MINUTES_PER_HOUR: u8 = 60;
/// Hours in a day.
pub const HOURS_PER_DAY: u8 = 24;
/// Days in a month.
pub const DAYS_PER_MONTH: u8 = 30;
/// Months in a year.
pub const MONTHS_PER_YEAR: u8 = 12;

/// One of the twelve months of the in-game year, three per season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Month {
    /// First month of spring.
    #[default]
    Lightwake,
    /// Second month of spring.
    Greencrest,
    /// Third month of spring.
    Blossomreach,
    /// First month of summer.
    Solarcrest,
    /// Second month of summer.
    Growrich,
    /// Third month of summer.
    Amplenuts,
    /// First month of autumn.
    Withercrown,
    /// Second month of autumn.
    Crimsongrasp,
    /// Third month of autumn.
    Stormreach,
    /// First month of winter.
    Icewane,
    /// Second month of winter.
    Nightcrown,
    /// Third month of winter.
    Whitereign,
}

/// The four seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// Lightwake to Blossomreach.
    Spring,
    /// Solarcrest to Amplenuts.
    Summer,
    /// Withercrown to Stormreach.
    Autumn,
    /// Icewane to Whitereign.
    Winter,
}

impl Month {
    const ALL: [Month; MONTHS_PER_YEAR as usize] = [
        Month::Lightwake,
        Month::Greencrest,
        Month::Blossomreach,
        Month::Solarcrest,
        Month::Growrich,
        Month::Amplenuts,
        Month::Withercrown,
        Month::Crimsongrasp,
        Month::Stormreach,
        Month::Icewane,
        Month::Nightcrown,
        Month::Whitereign,
    ];

    /// Month at a zero-based index, wrapping past the end of the year.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % MONTHS_PER_YEAR) as usize]
    }

    /// Zero-based position within the year.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The season this month belongs to.
    pub fn season(self) -> Season {
        match self.index() / 3 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Month::Lightwake => "Lightwake",
            Month::Greencrest => "Greencrest",
            Month::Blossomreach => "Blossomreach",
            Month::Solarcrest => "Solarcrest",
            Month::Growrich => "Growrich",
            Month::Amplenuts => "Amplenuts",
            Month::Withercrown => "Withercrown",
            Month::Crimsongrasp => "Crimsongrasp",
            Month::Stormreach => "Stormreach",
            Month::Icewane => "Icewane",
            Month::Nightcrown => "Nightcrown",
            Month::Whitereign => "Whitereign",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A snapshot of the in-game calendar.
///
/// All fields except `year` are zero-based. The calendar has no leap rules:
/// every month has [`DAYS_PER_MONTH`] days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarTime {
    /// Monotonic count of seconds since the world began.
    pub seconds_since_beginning: u64,
    /// Second of the minute.
    pub second: u8,
    /// Minute of the hour.
    pub minute: u8,
    /// Hour of the day.
    pub hour: u8,
    /// Day of the month.
    pub day: u8,
    /// Month of the year.
    pub month: Month,
    /// Years since the world began.
    pub year: u32,
}

impl CalendarTime {
    /// The calendar at `seconds` seconds after the beginning of time.
    pub fn from_seconds(seconds: u64) -> Self {
        let minute_len = u64::from(SECONDS_PER_MINUTE);
        let hour_len = minute_len * u64::from(MINUTES_PER_HOUR);
        let day_len = hour_len * u64::from(HOURS_PER_DAY);
        let month_len = day_len * u64::from(DAYS_PER_MONTH);
        let year_len = month_len * u64::from(MONTHS_PER_YEAR);

        Self {
            seconds_since_beginning: seconds,
            second: (seconds % minute_len) as u8,
            minute: (seconds % hour_len / minute_len) as u8,
            hour: (seconds % day_len / hour_len) as u8,
            day: (seconds % month_len / day_len) as u8,
            month: Month::from_index((seconds % year_len / month_len) as u8),
            year: (seconds / year_len) as u32,
        }
    }

    /// Advance by exactly one second, carrying into larger units.
    pub fn add_second(&mut self) {
        self.seconds_since_beginning += 1;

        self.second += 1;
        if self.second < SECONDS_PER_MINUTE {
            return;
        }
        self.second = 0;
        self.minute += 1;
        if self.minute < MINUTES_PER_HOUR {
            return;
        }
        self.minute = 0;
        self.hour += 1;
        if self.hour < HOURS_PER_DAY {
            return;
        }
        self.hour = 0;
        self.day += 1;
        if self.day < DAYS_PER_MONTH {
            return;
        }
        self.day = 0;
        if self.month == Month::Whitereign {
            self.month = Month::Lightwake;
            self.year += 1;
        } else {
            self.month = Month::from_index(self.month.index() + 1);
        }
    }

    /// Whether this is the first second of the given hour.
    pub fn is_start_of_hour(&self, hour: u8) -> bool {
        self.hour == hour && self.minute == 0 && self.second == 0
    }

    /// The season of the current month.
    pub fn season(&self) -> Season {
        self.month.season()
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Year {}, day {} of {}\n{:02}:{:02}",
            self.year,
            self.day + 1,
            self.month,
            self.hour,
            self.minute
        )
    }
}
