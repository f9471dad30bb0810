//! # Views
//!
//! Pure projections of fetched data into what the pages show, rendered as text.
//! Nothing here performs I/O: the caller fetches (usually through a
//! [`FetchMachine`](fetch_framework::FetchMachine)) and hands the data in.

pub mod bookables;
pub mod bookings;

pub use bookables::BookablesView;
pub use bookings::BookingsView;

use crate::api::RestResource;
use fetch_framework::FetchState;
use std::fmt::Display;

/// Shown while a read is in flight.
pub const PENDING: &str = "Loading...";

/// Finds the item with `id`, falling back to the first item.
///
/// The fallback is an arbitrary tie-break: a missing or stale id silently shows
/// the first item instead of an error. Callers that need to tell the two apart
/// should look the id up themselves.
pub fn select_or_first<T: RestResource>(items: &[T], id: Option<T::Id>) -> Option<&T> {
    id.and_then(|id| items.iter().find(|item| item.id() == id))
        .or_else(|| items.first())
}

/// Renders a fetch state: nothing while idle, [`PENDING`] while loading, the
/// error message on failure and `render(data)` on success.
pub fn render_state<T, E: Display>(state: &FetchState<T, E>, render: impl FnOnce(&T) -> String) -> String {
    match state {
        FetchState::Idle => String::new(),
        FetchState::Loading => PENDING.to_string(),
        FetchState::Error(e) => e.to_string(),
        FetchState::Success(data) => render(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bookable, BookableId};
    use fetch_framework::mock::MockError;
    use std::sync::Arc;

    fn bookables() -> Vec<Bookable> {
        (1..=3)
            .map(|i| Bookable::new(BookableId(i), "Rooms", format!("Room {i}")))
            .collect()
    }

    #[test]
    fn test_select_or_first() {
        let items = bookables();
        assert_eq!(select_or_first(&items, Some(BookableId(2))).map(|b| b.id), Some(BookableId(2)));
        assert_eq!(select_or_first(&items, Some(BookableId(99))).map(|b| b.id), Some(BookableId(1)));
        assert_eq!(select_or_first(&items, None).map(|b| b.id), Some(BookableId(1)));
        assert!(select_or_first::<Bookable>(&[], Some(BookableId(1))).is_none());
    }

    #[test]
    fn test_render_state() {
        let render = |n: &u32| format!("{n} rooms");

        let idle: FetchState<u32, MockError> = FetchState::Idle;
        assert_eq!(render_state(&idle, render), "");
        assert_eq!(render_state(&FetchState::<u32, MockError>::Loading, render), PENDING);
        assert_eq!(render_state(&FetchState::<u32, MockError>::Success(3), render), "3 rooms");

        let failed: FetchState<u32, MockError> = FetchState::Error(Arc::new("network down".into()));
        assert_eq!(render_state(&failed, render), "network down");
    }
}
