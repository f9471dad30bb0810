use super::week::Week;
use crate::model::{Bookable, BookableId, Booking};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// One slot of the bookings grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub session: &'static str,
    pub date: NaiveDate,
    pub bookable_id: BookableId,
    pub booking: Option<Booking>,
}

/// A bookable's week as sessions (rows) by dates (columns).
///
/// Only the sessions and days the bookable is available for appear.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub bookable_id: BookableId,
    pub sessions: Vec<&'static str>,
    pub dates: Vec<NaiveDate>,
    cells: HashMap<(&'static str, NaiveDate), Cell>,
}

impl Grid {
    pub fn new(bookable: &Bookable, week: &Week) -> Self {
        let sessions = bookable.session_names();
        let dates: Vec<NaiveDate> = week
            .dates()
            .filter(|d| bookable.days.contains(&d.weekday().num_days_from_sunday()))
            .collect();

        let mut cells = HashMap::with_capacity(sessions.len() * dates.len());
        for session in &sessions {
            for date in &dates {
                cells.insert(
                    (*session, *date),
                    Cell {
                        session: *session,
                        date: *date,
                        bookable_id: bookable.id,
                        booking: None,
                    },
                );
            }
        }

        Self {
            bookable_id: bookable.id,
            sessions,
            dates,
            cells,
        }
    }

    /// Places each booking in its (session, date) cell.
    ///
    /// Bookings for a different bookable, or whose slot is not in the grid, are ignored.
    pub fn with_bookings<'a>(mut self, bookings: impl IntoIterator<Item = &'a Booking>) -> Self {
        for booking in bookings {
            if booking.bookable_id != self.bookable_id {
                continue;
            }
            let key = self
                .sessions
                .iter()
                .find(|s| **s == booking.session)
                .map(|s| (*s, booking.date));
            if let Some(cell) = key.and_then(|k| self.cells.get_mut(&k)) {
                cell.booking = Some(booking.clone());
            }
        }
        self
    }

    pub fn cell(&self, session: &str, date: NaiveDate) -> Option<&Cell> {
        let session = self.sessions.iter().find(|s| **s == session)?;
        self.cells.get(&(*session, date))
    }

    pub fn rows(&self) -> impl Iterator<Item = (&'static str, Vec<&Cell>)> + '_ {
        self.sessions.iter().map(move |session| {
            let cells = self
                .dates
                .iter()
                .filter_map(|date| self.cells.get(&(*session, *date)))
                .collect();
            (*session, cells)
        })
    }

    /// Number of cells holding a booking.
    pub fn booked(&self) -> usize {
        self.cells.values().filter(|c| c.booking.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
