use std::fmt;

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::registry::City;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    UnknownZone(String),
    MalformedDisplay(String),
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::UnknownZone(id) => write!(f, "unknown IANA time zone '{id}'"),
            ClockError::MalformedDisplay(s) => write!(f, "unexpected time display '{s}'"),
        }
    }
}

impl std::error::Error for ClockError {}

/// An IANA zone identifier known to the tz database, held in its canonical
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneId {
    name: String,
    tz: Tz,
}

impl ZoneId {
    /// Matches `name` against the tz database ignoring ASCII case, the way
    /// `Intl` accepts `asia/tokyo` for `Asia/Tokyo`.
    pub fn parse(name: &str) -> Result<Self, ClockError> {
        let tz = Tz::from_str_insensitive(name)
            .map_err(|_| ClockError::UnknownZone(name.to_string()))?;
        Ok(Self {
            name: tz.name().to_string(),
            tz,
        })
    }

    pub fn for_city(city: &City) -> Result<Self, ClockError> {
        Self::parse(&city.zone_id())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Wall-clock fields ready to be written into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub zone_name: String,
}

impl ClockReading {
    /// Placeholder shown while no zone can be read.
    pub fn blank() -> Self {
        Self {
            hour: "--".to_string(),
            minute: "--".to_string(),
            second: "--".to_string(),
            zone_name: String::new(),
        }
    }
}

/// "Current time in zone Z" as display fields.
pub trait ZoneClock {
    fn read(&self, zone: &ZoneId) -> Result<ClockReading, ClockError>;
}

/// Splits a 24-hour display such as `"09:05:07 Japan Standard Time"` into
/// its fields. Everything after the first space is the zone name.
///
/// Some engines render midnight as hour `24` in 24-hour mode; that is
/// folded back to `00`.
pub fn parse_time_display(display: &str) -> Result<ClockReading, ClockError> {
    let malformed = || ClockError::MalformedDisplay(display.to_string());

    let display = display.trim();
    let (time, zone_name) = display.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let mut parts = time.split(':');
    let (Some(hour), Some(minute), Some(second), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let field = |s: &str, max: u8| -> Result<String, ClockError> {
        match s.parse::<u8>() {
            Ok(v) if v <= max => Ok(format!("{v:02}")),
            _ => Err(malformed()),
        }
    };
    let mut hour = field(hour, 24)?;
    if hour == "24" {
        hour = "00".to_string();
    }

    Ok(ClockReading {
        hour,
        minute: field(minute, 59)?,
        second: field(second, 59)?,
        zone_name: zone_name.trim().to_string(),
    })
}

/// [`ZoneClock`] backed by the bundled tz database.
///
/// The zone name is the zone's abbreviation (`JST`, `EDT`, ...): the tz
/// database carries no long-form names.
pub struct ChronoZoneClock {
    now: Box<dyn Fn() -> DateTime<Utc>>,
}

impl ChronoZoneClock {
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::from_fn(move || at)
    }

    pub fn from_fn(now: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        Self { now: Box::new(now) }
    }
}

impl fmt::Debug for ChronoZoneClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChronoZoneClock").finish_non_exhaustive()
    }
}

impl ZoneClock for ChronoZoneClock {
    fn read(&self, zone: &ZoneId) -> Result<ClockReading, ClockError> {
        let local = (self.now)().with_timezone(&zone.tz());
        Ok(ClockReading {
            hour: format!("{:02}", local.hour()),
            minute: format!("{:02}", local.minute()),
            second: format!("{:02}", local.second()),
            zone_name: local.format("%Z").to_string(),
        })
    }
}
