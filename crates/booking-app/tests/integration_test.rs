use booking_app::api::{
    ApiClient, ApiError, BookableClient, BookableError, BookingClient, HttpReader, RestClient,
};
use booking_app::backend::Seed;
use booking_app::lifecycle::BackendSystem;
use booking_app::model::{
    Bookable, BookableCreate, BookableId, BookableUpdate, Booking, BookingCreate,
};
use booking_app::routes::{BookingsParams, Route};
use booking_app::schedule::Week;
use booking_app::views::BookingsView;
use chrono::NaiveDate;
use fetch_framework::{FetchMachine, FetchStatus};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed() -> Seed {
    Seed::from_json(
        r#"{
            "bookables": [
                {"id": 1, "group": "Rooms", "title": "Meeting Room", "notes": "Seats 8",
                 "sessions": [1, 2, 3], "days": [1, 2, 3, 4, 5]},
                {"id": 2, "group": "Rooms", "title": "Lecture Hall",
                 "sessions": [0, 1, 2, 3, 4], "days": [0, 1, 2, 3, 4, 5, 6]},
                {"id": 3, "group": "Kit", "title": "Projector", "sessions": [1], "days": [1]}
            ],
            "bookings": [
                {"id": 1, "bookableId": 1, "bookerId": 1, "session": "Lunch",
                 "date": "2020-06-24", "title": "Planning", "notes": ""}
            ]
        }"#,
    )
    .unwrap()
}

async fn start() -> (BackendSystem, String) {
    let mut system = BackendSystem::start(seed());
    let addr = system.serve("127.0.0.1:0").await.unwrap();
    (system, format!("http://{addr}"))
}

/// Full end-to-end test: real backend over HTTP, reads through fetch machines,
/// writes through the REST clients.
#[tokio::test]
async fn test_full_booking_flow() {
    let (system, base_url) = start().await;
    let bookables = BookableClient::new(RestClient::new(&base_url, TIMEOUT).unwrap());
    let bookings = BookingClient::new(RestClient::new(&base_url, TIMEOUT).unwrap());

    // Read the bookables list through a fetch machine
    let reader = HttpReader::<Vec<Bookable>>::new(&base_url, TIMEOUT).unwrap();
    let list = FetchMachine::spawn(reader);
    let state = list.fetch("/bookables".to_string()).await.unwrap();
    let all = state.data().cloned().expect("bookables loaded");
    assert_eq!(all.len(), 3);

    // Create a bookable; ids continue after the seed
    let created = bookables
        .create_bookable(BookableCreate {
            group: "Kit".into(),
            title: "Wireless Mics".into(),
            notes: String::new(),
            sessions: vec![1, 3],
            days: vec![1, 2],
        })
        .await
        .unwrap();
    assert_eq!(created.id, BookableId(4));

    // PATCH merges
    let updated = bookables
        .update_bookable(
            created.id,
            BookableUpdate {
                notes: Some("Batteries in the drawer".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Wireless Mics");
    assert_eq!(updated.notes, "Batteries in the drawer");

    // Book it and read the week back
    let week = Week::containing(ymd(2020, 6, 24));
    bookings
        .create_booking(BookingCreate {
            bookable_id: BookableId(1),
            booker_id: 2,
            session: "Morning".into(),
            date: ymd(2020, 6, 22),
            title: "Stand-up".into(),
            notes: String::new(),
        })
        .await
        .unwrap();
    bookings
        .create_booking(BookingCreate {
            bookable_id: BookableId(1),
            booker_id: 2,
            session: "Morning".into(),
            date: ymd(2020, 6, 29),
            title: "Next week".into(),
            notes: String::new(),
        })
        .await
        .unwrap();

    let in_week = bookings.bookings_for_week(BookableId(1), &week).await.unwrap();
    let titles: Vec<_> = in_week.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Planning", "Stand-up"]);

    // The same week through a fetch machine feeds the bookings page
    let reader = HttpReader::<Vec<Booking>>::new(&base_url, TIMEOUT).unwrap();
    let grid_reader = FetchMachine::spawn(reader);
    let resource = bookings.week_url(BookableId(1), &week).unwrap();
    let state = grid_reader.fetch(resource).await.unwrap();
    let Route::Bookings(params) =
        Route::parse_with_today("/bookings?bookableId=1", ymd(2020, 6, 24)).unwrap()
    else {
        panic!("expected the bookings route");
    };
    let page = BookingsView::new(&all, params, state.data().unwrap()).render();
    assert!(page.contains("Planning"));
    assert!(page.contains("Stand-up"));
    assert!(!page.contains("Next week"));

    // Delete, then the record is gone
    bookables.delete_bookable(created.id).await.unwrap();
    assert!(bookables.get(created.id).await.unwrap().is_none());
    assert!(matches!(
        bookables.delete_bookable(created.id).await,
        Err(BookableError::NotFound(BookableId(4)))
    ));

    drop(list);
    drop(grid_reader);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_http_reader_maps_status_and_decode_errors() {
    let (system, base_url) = start().await;

    let reader = HttpReader::<Bookable>::new(&base_url, TIMEOUT).unwrap();
    let client = FetchMachine::spawn(reader);

    let state = client.fetch("/bookables/99".to_string()).await.unwrap();
    assert_eq!(state.status(), FetchStatus::Error);
    assert!(matches!(
        state.error(),
        Some(ApiError::Status { status: 404, .. })
    ));

    // An object where a list is expected
    let reader = HttpReader::<Vec<Bookable>>::new(&base_url, TIMEOUT).unwrap();
    let client = FetchMachine::spawn(reader);
    let state = client.fetch("/bookables/1".to_string()).await.unwrap();
    assert!(matches!(
        state.error(),
        Some(ApiError::Decode { .. })
    ));

    // Nothing listening
    drop(client);
    system.shutdown().await.unwrap();
    let reader = HttpReader::<Vec<Bookable>>::new(&base_url, TIMEOUT).unwrap();
    let client = FetchMachine::spawn(reader);
    let state = client.fetch("/bookables".to_string()).await.unwrap();
    assert!(matches!(
        state.error(),
        Some(ApiError::Transport { .. })
    ));
}

#[tokio::test]
async fn test_changing_bookable_refetches_and_keeps_latest() {
    let (system, base_url) = start().await;
    let reader = HttpReader::<Vec<Booking>>::new(&base_url, TIMEOUT).unwrap();
    let machine = FetchMachine::spawn(reader);
    let bookings = BookingClient::new(RestClient::new(&base_url, TIMEOUT).unwrap());
    let week = Week::containing(ymd(2020, 6, 24));

    let first = bookings.week_url(BookableId(1), &week).unwrap();
    let second = bookings.week_url(BookableId(2), &week).unwrap();

    assert!(machine.observe(first.clone()).await.unwrap());
    assert!(machine.observe(second.clone()).await.unwrap());
    let state = machine.settled().await.unwrap();

    assert_eq!(state.status(), FetchStatus::Success);
    assert_eq!(state.data(), Some(&Vec::new()));
    assert_eq!(machine.snapshot().resource.as_deref(), Some(second.as_str()));
    assert!(!machine.observe(second).await.unwrap());

    drop(machine);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_bookings_params_defaults_flow_into_view() {
    let all = seed().bookables;
    let params = BookingsParams {
        bookable_id: Some(BookableId(42)),
        date: ymd(2020, 6, 24),
    };
    let view = BookingsView::new(&all, params, &seed().bookings);
    // Unknown id falls back to the first bookable.
    assert_eq!(view.selected().map(|b| b.id), Some(BookableId(1)));
    assert_eq!(view.grid().map(|g| g.booked()), Some(1));
}
