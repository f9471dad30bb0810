//! # Routes
//!
//! The page table of the application and the links between pages:
//!
//! | Path | Route |
//! |---|---|
//! | `/` | bookings, default params |
//! | `/bookings?bookableId=ID&date=YYYY-MM-DD` | bookings |
//! | `/bookables` | bookables, first selected |
//! | `/bookables/new` | new bookable form |
//! | `/bookables/{id}` | bookables, `id` selected |
//! | `/bookables/{id}/edit` | edit form |

use crate::model::BookableId;
use crate::schedule::short_iso;
use chrono::NaiveDate;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid id '{0}'")]
    InvalidId(String),
}

/// Query parameters of the bookings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingsParams {
    pub bookable_id: Option<BookableId>,
    pub date: NaiveDate,
}

impl BookingsParams {
    /// Reads `bookableId` and `date` from query pairs.
    ///
    /// A missing or unparsable date means `today`; a missing or unparsable id means none.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>, today: NaiveDate) -> Self {
        let mut params = Self {
            bookable_id: None,
            date: today,
        };
        for (key, value) in pairs {
            match key {
                "bookableId" => params.bookable_id = value.parse::<u32>().ok().map(BookableId),
                "date" => {
                    params.date = NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(today)
                }
                _ => {}
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Bookings(BookingsParams),
    Bookables { id: Option<BookableId> },
    BookableNew,
    BookableEdit { id: BookableId },
}

impl Route {
    /// Parses a path with an optional query, using the local date as "today".
    pub fn parse(path_and_query: &str) -> Result<Self, RouteError> {
        Self::parse_with_today(path_and_query, chrono::Local::now().date_naive())
    }

    pub fn parse_with_today(path_and_query: &str, today: NaiveDate) -> Result<Self, RouteError> {
        let not_found = || RouteError::NotFound(path_and_query.to_string());
        let url = Url::parse("http://localhost/")
            .and_then(|base| base.join(path_and_query))
            .map_err(|_| not_found())?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] | ["bookings"] => {
                let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
                Ok(Route::Bookings(BookingsParams::from_pairs(
                    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                    today,
                )))
            }
            ["bookables"] => Ok(Route::Bookables { id: None }),
            ["bookables", "new"] => Ok(Route::BookableNew),
            ["bookables", id] => Ok(Route::Bookables {
                id: Some(parse_id(id)?),
            }),
            ["bookables", id, "edit"] => Ok(Route::BookableEdit { id: parse_id(id)? }),
            _ => Err(not_found()),
        }
    }

    /// The canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Bookings(params) => bookings_url(params.bookable_id, Some(params.date)),
            Route::Bookables { id: None } => "/bookables".to_string(),
            Route::Bookables { id: Some(id) } => bookable_url(*id),
            Route::BookableNew => "/bookables/new".to_string(),
            Route::BookableEdit { id } => format!("/bookables/{id}/edit"),
        }
    }
}

fn parse_id(raw: &str) -> Result<BookableId, RouteError> {
    raw.parse::<u32>()
        .map(BookableId)
        .map_err(|_| RouteError::InvalidId(raw.to_string()))
}

/// `/bookables/{id}`
pub fn bookable_url(id: BookableId) -> String {
    format!("/bookables/{id}")
}

/// `/bookings?bookableId=ID[&date=YYYY-MM-DD]`, or `/bookings[?date=..]` without an id.
pub fn bookings_url(id: Option<BookableId>, date: Option<NaiveDate>) -> String {
    let mut query = Vec::new();
    if let Some(id) = id {
        query.push(format!("bookableId={id}"));
    }
    if let Some(date) = date {
        query.push(format!("date={}", short_iso(date)));
    }
    if query.is_empty() {
        "/bookings".to_string()
    } else {
        format!("/bookings?{}", query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, 24).unwrap()
    }

    fn parse(path: &str) -> Result<Route, RouteError> {
        Route::parse_with_today(path, today())
    }

    #[test]
    fn test_route_table() {
        let default_bookings = Route::Bookings(BookingsParams {
            bookable_id: None,
            date: today(),
        });
        assert_eq!(parse("/"), Ok(default_bookings.clone()));
        assert_eq!(parse("/bookings"), Ok(default_bookings));
        assert_eq!(parse("/bookables"), Ok(Route::Bookables { id: None }));
        assert_eq!(parse("/bookables/"), Ok(Route::Bookables { id: None }));
        assert_eq!(
            parse("/bookables/3"),
            Ok(Route::Bookables {
                id: Some(BookableId(3))
            })
        );
        assert_eq!(
            parse("/bookables/3/edit"),
            Ok(Route::BookableEdit { id: BookableId(3) })
        );
        assert_eq!(parse("/bookables/new"), Ok(Route::BookableNew));
    }

    #[test]
    fn test_bookings_params() {
        let route = parse("/bookings?bookableId=2&date=2020-07-01").unwrap();
        assert_eq!(
            route,
            Route::Bookings(BookingsParams {
                bookable_id: Some(BookableId(2)),
                date: NaiveDate::from_ymd_opt(2020, 7, 1).unwrap(),
            })
        );

        // Bad values fall back instead of failing.
        let route = parse("/bookings?bookableId=abc&date=someday").unwrap();
        assert_eq!(
            route,
            Route::Bookings(BookingsParams {
                bookable_id: None,
                date: today(),
            })
        );
    }

    #[test]
    fn test_unknown_and_invalid() {
        assert_eq!(
            parse("/users"),
            Err(RouteError::NotFound("/users".to_string()))
        );
        assert_eq!(
            parse("/bookables/3/delete"),
            Err(RouteError::NotFound("/bookables/3/delete".to_string()))
        );
        assert_eq!(
            parse("/bookables/lamp"),
            Err(RouteError::InvalidId("lamp".to_string()))
        );
        assert_eq!(
            parse("/bookables/lamp/edit"),
            Err(RouteError::InvalidId("lamp".to_string()))
        );
    }

    #[test]
    fn test_paths_round_trip_through_parse() {
        for path in [
            "/bookables",
            "/bookables/new",
            "/bookables/7",
            "/bookables/7/edit",
            "/bookings?bookableId=1&date=2020-06-24",
        ] {
            assert_eq!(parse(path).unwrap().path(), path);
        }
        assert_eq!(bookings_url(None, None), "/bookings");
        assert_eq!(bookings_url(Some(BookableId(4)), None), "/bookings?bookableId=4");
    }
}
