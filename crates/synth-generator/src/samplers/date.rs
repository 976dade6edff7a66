//! Calendar dates in a half-open range.

use crate::bounds::{Bounds, Limit, Unsatisfiable};
use chrono::format::{Item, StrftimeItems};
use chrono::{Days, NaiveDate};
use rand::Rng;
use synth_core::Value;

const ISO_DATE: &str = "%Y-%m-%d";

/// Uniform dates in `[start, end)`, rendered with a strftime format.
///
/// Order constraints compare dates, not strings: a limit value is parsed
/// with this sampler's format first and ISO `YYYY-MM-DD` second.
#[derive(Debug, Clone)]
pub struct DateSampler {
    start: NaiveDate,
    end: NaiveDate,
    format: String,
}

impl DateSampler {
    pub fn new(start: &str, end: &str, format: &str) -> Result<Self, String> {
        let start = NaiveDate::parse_from_str(start, ISO_DATE)
            .map_err(|e| format!("invalid start date '{start}': {e}"))?;
        let end = NaiveDate::parse_from_str(end, ISO_DATE)
            .map_err(|e| format!("invalid end date '{end}': {e}"))?;
        if start >= end {
            return Err(format!("start ({start}) must be before end ({end})"));
        }
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("invalid date format '{format}'"));
        }
        Ok(Self {
            start,
            end,
            format: format.to_string(),
        })
    }

    pub fn sample<R: Rng>(&self, rng: &mut R, bounds: &Bounds) -> Result<Value, Unsatisfiable> {
        let mut lo = self.start;
        let mut hi = self.end;
        if let Some(limit) = bounds.lower() {
            let (date, inclusive) = self.parse_limit(limit)?;
            let first = if inclusive { date } else { next_day(date)? };
            lo = lo.max(first);
        }
        if let Some(limit) = bounds.upper() {
            let (date, inclusive) = self.parse_limit(limit)?;
            let past_last = if inclusive { next_day(date)? } else { date };
            hi = hi.min(past_last);
        }

        if let Some(target) = bounds.equals() {
            let date = self.parse_value(target)?;
            if date < lo || date >= hi {
                return Err(Unsatisfiable(format!("{date} is outside [{lo}, {hi})")));
            }
            return Ok(self.render(date));
        }

        let days = (hi - lo).num_days();
        if days <= 0 {
            return Err(Unsatisfiable(format!("empty date range [{lo}, {hi})")));
        }
        let offset = rng.gen_range(0..days) as u64;
        let date = lo
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| Unsatisfiable("date out of range".to_string()))?;
        Ok(self.render(date))
    }

    fn render(&self, date: NaiveDate) -> Value {
        Value::String(date.format(&self.format).to_string())
    }

    fn parse_limit(&self, limit: &Limit) -> Result<(NaiveDate, bool), Unsatisfiable> {
        Ok((self.parse_value(&limit.value)?, limit.inclusive))
    }

    fn parse_value(&self, value: &Value) -> Result<NaiveDate, Unsatisfiable> {
        let text = value
            .as_str()
            .ok_or_else(|| Unsatisfiable(format!("{value} is not a date string")))?;
        NaiveDate::parse_from_str(text, &self.format)
            .or_else(|_| NaiveDate::parse_from_str(text, ISO_DATE))
            .map_err(|_| Unsatisfiable(format!("'{text}' is not a date")))
    }
}

fn next_day(date: NaiveDate) -> Result<NaiveDate, Unsatisfiable> {
    date.succ_opt()
        .ok_or_else(|| Unsatisfiable(format!("no date after {date}")))
}
