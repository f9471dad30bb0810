use chrono::{Datelike, Days, NaiveDate};
use std::fmt::Display;

/// A Sunday-to-Saturday week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// The date the week was built from.
    pub date: NaiveDate,
}

impl Week {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_sunday() as u64;
        let start = date - Days::new(offset);
        Self {
            start,
            end: start + Days::new(6),
            date,
        }
    }

    /// The week `weeks` weeks later (earlier when negative).
    pub fn shift(&self, weeks: i64) -> Self {
        let days = Days::new(weeks.unsigned_abs() * 7);
        let date = if weeks >= 0 {
            self.date + days
        } else {
            self.date - days
        };
        Self::containing(date)
    }

    /// The seven dates of the week, Sunday first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..7).map(move |d| self.start + Days::new(d))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%a %b %d %Y"),
            self.end.format("%a %b %d %Y")
        )
    }
}

/// `YYYY-MM-DD`.
pub fn short_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
