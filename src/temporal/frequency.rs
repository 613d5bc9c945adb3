use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Sampling frequency of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Every day
    Daily,
    /// Every week
    Weekly,
    /// Every calendar month
    Monthly,
    /// Every three calendar months
    Quarterly,
    /// Every calendar year
    Yearly,
    /// Every `n` days
    Custom(u32),
}

impl Frequency {
    /// Advance `date` by `steps` periods.
    ///
    /// Month based frequencies are computed from `date` in one jump, so a
    /// series anchored on the 31st keeps landing on month ends instead of
    /// drifting to the 28th. Returns `None` when the result leaves the
    /// calendar range.
    pub fn advance(&self, date: NaiveDate, steps: usize) -> Option<NaiveDate> {
        let steps = u32::try_from(steps).ok()?;
        match self {
            Frequency::Daily => date.checked_add_days(Days::new(u64::from(steps))),
            Frequency::Weekly => date.checked_add_days(Days::new(u64::from(steps) * 7)),
            Frequency::Monthly => date.checked_add_months(Months::new(steps)),
            Frequency::Quarterly => date.checked_add_months(Months::new(steps.checked_mul(3)?)),
            Frequency::Yearly => date.checked_add_months(Months::new(steps.checked_mul(12)?)),
            Frequency::Custom(days) => {
                date.checked_add_days(Days::new(u64::from(steps) * u64::from(*days)))
            }
        }
    }

    /// Reject steps that do not move forward in time
    pub fn validate(&self) -> Result<()> {
        match self {
            Frequency::Custom(0) => Err(Error::InvalidParameter(
                "custom frequency must step at least one day".to_string(),
            )),
            _ => Ok(()),
        }
    }

    /// Human readable unit, used for chart legends
    pub fn unit_label(&self) -> String {
        match self {
            Frequency::Daily => "Day".to_string(),
            Frequency::Weekly => "Week".to_string(),
            Frequency::Monthly => "Month".to_string(),
            Frequency::Quarterly => "Quarter".to_string(),
            Frequency::Yearly => "Year".to_string(),
            Frequency::Custom(days) => format!("{}-Day", days),
        }
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        match trimmed.to_uppercase().as_str() {
            "D" | "DAY" | "DAYS" | "DAILY" => Ok(Frequency::Daily),
            "W" | "WEEK" | "WEEKS" | "WEEKLY" => Ok(Frequency::Weekly),
            "M" | "MONTH" | "MONTHS" | "MONTHLY" => Ok(Frequency::Monthly),
            "Q" | "QUARTER" | "QUARTERS" | "QUARTERLY" => Ok(Frequency::Quarterly),
            "Y" | "YEAR" | "YEARS" | "A" | "ANNUAL" | "ANNUALLY" | "YEARLY" => {
                Ok(Frequency::Yearly)
            }
            _ => parse_custom_frequency(trimmed).ok_or_else(|| {
                Error::InvalidParameter(format!("unrecognised frequency '{}'", s))
            }),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "D"),
            Frequency::Weekly => write!(f, "W"),
            Frequency::Monthly => write!(f, "M"),
            Frequency::Quarterly => write!(f, "Q"),
            Frequency::Yearly => write!(f, "Y"),
            Frequency::Custom(days) => write!(f, "{}D", days),
        }
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse multiples such as "3D" or "2W" into a custom day step
fn parse_custom_frequency(s: &str) -> Option<Frequency> {
    let split = s.find(|c: char| !c.is_ascii_digit())?;
    if split == 0 {
        return None;
    }
    let (num, unit) = s.split_at(split);
    let num: u32 = num.parse().ok()?;
    if num == 0 {
        return None;
    }

    match unit.trim().to_uppercase().as_str() {
        "D" | "DAY" | "DAYS" => Some(if num == 1 {
            Frequency::Daily
        } else {
            Frequency::Custom(num)
        }),
        "W" | "WEEK" | "WEEKS" => Some(if num == 1 {
            Frequency::Weekly
        } else {
            Frequency::Custom(num.checked_mul(7)?)
        }),
        _ => None,
    }
}
