use super::select_or_first;
use crate::model::{Bookable, BookableId, Booking};
use crate::routes::{bookings_url, BookingsParams};
use crate::schedule::{Grid, Week};
use std::fmt::Write;

/// The bookings page: bookable picker plus the selected bookable's week grid.
#[derive(Debug, Clone)]
pub struct BookingsView<'a> {
    bookables: &'a [Bookable],
    params: BookingsParams,
    selected: Option<&'a Bookable>,
    week: Week,
    grid: Option<Grid>,
}

impl<'a> BookingsView<'a> {
    pub fn new(bookables: &'a [Bookable], params: BookingsParams, bookings: &[Booking]) -> Self {
        let selected = select_or_first(bookables, params.bookable_id);
        let week = Week::containing(params.date);
        let grid = selected.map(|b| Grid::new(b, &week).with_bookings(bookings));
        Self {
            bookables,
            params,
            selected,
            week,
            grid,
        }
    }

    pub fn selected(&self) -> Option<&'a Bookable> {
        self.selected
    }

    pub fn week(&self) -> &Week {
        &self.week
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    /// Link that selects bookable `id` while staying on the current date.
    pub fn link_for(&self, id: BookableId) -> String {
        bookings_url(Some(id), Some(self.params.date))
    }

    pub fn render(&self) -> String {
        let Some(selected) = self.selected else {
            return "No bookables.\n".to_string();
        };

        let mut out = String::new();
        for bookable in self.bookables.iter().filter(|b| b.group == selected.group) {
            let marker = if bookable.id == selected.id { ">" } else { " " };
            let _ = writeln!(out, "{marker} {:<24} {}", bookable.title, self.link_for(bookable.id));
        }
        let _ = writeln!(out, "\n{} | {}", selected.title, self.week);

        match &self.grid {
            Some(grid) if !grid.is_empty() => out.push_str(&render_grid(grid)),
            _ => out.push_str("Not available this week\n"),
        }
        out
    }
}

fn render_grid(grid: &Grid) -> String {
    let width = 14;
    let mut out = String::new();
    let _ = write!(out, "{:<width$}", "");
    for date in &grid.dates {
        let _ = write!(out, "{:<width$}", date.format("%a %d").to_string());
    }
    out.push('\n');
    for (session, cells) in grid.rows() {
        let _ = write!(out, "{session:<width$}");
        for cell in cells {
            let label = cell.booking.as_ref().map_or("-", |b| b.title.as_str());
            let label: String = label.chars().take(width - 1).collect();
            let _ = write!(out, "{label:<width$}");
        }
        out.push('\n');
    }
    out
}
