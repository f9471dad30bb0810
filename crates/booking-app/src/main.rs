//! # bookings
//!
//! Command-line front end for the bookings service.
//!
//! ```text
//! bookings serve --db db.json              # development backend on :3001
//! bookings bookables list --id 2           # bookables page
//! bookings bookings grid --bookable 1      # this week's grid
//! bookings open "/bookings?bookableId=1&date=2020-06-24"
//! ```
//!
//! Reads go through a [`FetchMachine`] over an [`HttpReader`]; writes go through
//! the typed REST clients. Set `RUST_LOG=debug` to see every request.

use anyhow::{Context, Result};
use booking_app::api::{
    build_http_client, parse_base_url, ApiClient, ApiError, BookableClient, BookingClient,
    HttpReader, RestClient,
};
use booking_app::backend::Seed;
use booking_app::config::AppConfig;
use booking_app::form::FormState;
use booking_app::lifecycle::BackendSystem;
use booking_app::model::{
    Bookable, BookableCreate, BookableId, Booking, BookingCreate, BookingId, DAYS, SESSIONS,
};
use booking_app::routes::{BookingsParams, Route};
use booking_app::schedule::Week;
use booking_app::ui::{ErrorBoundary, PendingAction};
use booking_app::views::{render_state, select_or_first, BookablesView, BookingsView};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fetch_framework::tracing::setup_tracing;
use fetch_framework::{FetchMachine, FetchState};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt::Debug;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Instrument};

#[derive(Debug, Parser)]
#[command(name = "bookings", version, about = "Manage bookables and their bookings")]
struct Cli {
    /// Base URL of the bookings REST API
    #[arg(long, global = true, env = "BOOKINGS_API_URL")]
    api: Option<String>,

    /// Config file (default: <config dir>/bookings/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the in-memory development backend
    Serve {
        /// json-server style seed file
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// List and edit bookables
    #[command(subcommand)]
    Bookables(BookablesCommand),
    /// Show and edit bookings
    #[command(subcommand)]
    Bookings(BookingsCommand),
    /// Render the page for an application path, e.g. /bookables/3
    Open { path: String },
}

#[derive(Debug, Subcommand)]
enum BookablesCommand {
    List {
        #[arg(long)]
        id: Option<u32>,
    },
    New(BookableArgs),
    Edit {
        id: u32,
        #[command(flatten)]
        changes: BookableArgs,
    },
    Delete { id: u32 },
}

#[derive(Debug, Args)]
struct BookableArgs {
    #[arg(long)]
    group: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Day name or number (0 = Sunday); repeatable
    #[arg(long = "day", value_parser = parse_day)]
    days: Vec<u32>,
    /// Session name or number (0 = Breakfast); repeatable
    #[arg(long = "session", value_parser = parse_session)]
    sessions: Vec<u32>,
}

#[derive(Debug, Subcommand)]
enum BookingsCommand {
    Grid {
        #[arg(long)]
        bookable: Option<u32>,
        /// Any date in the week to show (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    New {
        #[arg(long)]
        bookable: u32,
        #[arg(long)]
        session: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, default_value_t = 0)]
        booker: u32,
    },
    Delete { id: u32 },
}

fn parse_index(kind: &str, names: &[&str], raw: &str) -> Result<u32, String> {
    if let Ok(n) = raw.parse::<u32>() {
        if (n as usize) < names.len() {
            return Ok(n);
        }
    }
    names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(raw))
        .map(|i| i as u32)
        .ok_or_else(|| format!("unknown {kind} '{raw}', expected one of {}", names.join(", ")))
}

fn parse_day(raw: &str) -> Result<u32, String> {
    parse_index("day", &DAYS, raw)
}

fn parse_session(raw: &str) -> Result<u32, String> {
    parse_index("session", &SESSIONS, raw)
}

/// Everything a command needs to talk to the API.
struct Session {
    config: AppConfig,
    http: reqwest::Client,
    base_url: reqwest::Url,
}

impl Session {
    fn new(config: AppConfig) -> Result<Self> {
        let http = build_http_client(config.api.timeout())?;
        let base_url = parse_base_url(&config.api.base_url)?;
        Ok(Self {
            config,
            http,
            base_url,
        })
    }

    fn bookables(&self) -> BookableClient {
        BookableClient::new(RestClient::from_parts(self.http.clone(), self.base_url.clone()))
    }

    fn bookings(&self) -> BookingClient {
        BookingClient::new(RestClient::from_parts(self.http.clone(), self.base_url.clone()))
    }

    fn pending(&self) -> PendingAction {
        PendingAction::with_timeout(self.config.api.timeout())
    }

    /// Reads `resource` through a fresh fetch machine and returns the settled state.
    async fn load<T>(&self, resource: String) -> Result<FetchState<T, ApiError>>
    where
        T: DeserializeOwned + Clone + Debug + Send + Sync + 'static,
    {
        let reader = HttpReader::<T>::from_parts(self.http.clone(), self.base_url.clone());
        let client = FetchMachine::spawn(reader);
        let state = client.fetch(resource).await?;
        client.detach().await?;
        Ok(state)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_tracing();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())
        .context("loading configuration")?
        .with_api_url(cli.api)
        .context("applying --api")?;

    let session = Session::new(config)?;
    let span = tracing::info_span!("command", api = %session.base_url);
    run(&session, cli.command).instrument(span).await
}

async fn run(session: &Session, command: Command) -> Result<ExitCode> {
    match command {
        Command::Serve { db, host, port } => serve(&session.config, db, host, port).await,
        Command::Open { path } => {
            let route = Route::parse(&path)?;
            info!(?route, "Opening");
            Ok(show(open(session, route).await))
        }
        Command::Bookables(BookablesCommand::List { id }) => Ok(show(
            bookables_page(session, id.map(BookableId)).await,
        )),
        Command::Bookables(BookablesCommand::New(args)) => {
            let mut form = FormState::default();
            apply_bookable_args(&mut form, args)?;
            let params: BookableCreate = form.into_record()?;
            let created = session
                .pending()
                .run(session.bookables().create_bookable(params))
                .await
                .output?;
            println!("Created bookable {} ({})", created.id, created.title);
            Ok(ExitCode::SUCCESS)
        }
        Command::Bookables(BookablesCommand::Edit { id, changes }) => {
            let client = session.bookables();
            let current = client.require(BookableId(id)).await?;
            let mut form = FormState::from_record(&current)?;
            apply_bookable_args(&mut form, changes)?;
            let edited: Bookable = form.into_record()?;
            let saved = session
                .pending()
                .run(client.replace_bookable(edited))
                .await
                .output?;
            println!("Saved bookable {} ({})", saved.id, saved.title);
            Ok(ExitCode::SUCCESS)
        }
        Command::Bookables(BookablesCommand::Delete { id }) => {
            session.bookables().delete_bookable(BookableId(id)).await?;
            println!("Deleted bookable {id}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Bookings(BookingsCommand::Grid { bookable, date }) => {
            let params = BookingsParams {
                bookable_id: bookable.map(BookableId),
                date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
            };
            Ok(show(bookings_page(session, params).await))
        }
        Command::Bookings(BookingsCommand::New {
            bookable,
            session: session_name,
            date,
            title,
            notes,
            booker,
        }) => {
            let params = BookingCreate {
                bookable_id: BookableId(bookable),
                booker_id: booker,
                session: session_name,
                date,
                title,
                notes,
            };
            let created = session
                .pending()
                .run(session.bookings().create_booking(params))
                .await
                .output?;
            println!(
                "Booked {} for {} on {} ({})",
                created.title, created.session, created.date, created.id
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Bookings(BookingsCommand::Delete { id }) => {
            session.bookings().delete(BookingId(id)).await?;
            println!("Deleted booking {id}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints a rendered page; a failed page shows the error fallback and a failing exit code.
fn show(page: Result<String>) -> ExitCode {
    let mut boundary = ErrorBoundary::new();
    let out = boundary.render(|| page);
    println!("{out}");
    if boundary.has_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn apply_bookable_args(form: &mut FormState, args: BookableArgs) -> Result<()> {
    for (name, value) in [("group", args.group), ("title", args.title), ("notes", args.notes)] {
        if let Some(value) = value {
            form.handle_change(name, value);
        }
    }
    for (name, values) in [("days", args.days), ("sessions", args.sessions)] {
        if values.is_empty() {
            continue;
        }
        form.handle_change(name, json!([]));
        for value in values {
            form.handle_checked(name, &value.to_string(), true)?;
        }
    }
    Ok(())
}

async fn open(session: &Session, route: Route) -> Result<String> {
    match route {
        Route::Bookings(params) => bookings_page(session, params).await,
        Route::Bookables { id } => bookables_page(session, id).await,
        Route::BookableNew => {
            let template = json!({
                "group": "", "title": "", "notes": "", "days": [], "sessions": []
            });
            let form = match template {
                Value::Object(map) => FormState::new(map),
                _ => FormState::default(),
            };
            Ok(serde_json::to_string_pretty(form.state())?)
        }
        Route::BookableEdit { id } => {
            let bookable = session.bookables().require(id).await?;
            let form = FormState::from_record(&bookable)?;
            Ok(serde_json::to_string_pretty(form.state())?)
        }
    }
}

async fn bookables_page(session: &Session, id: Option<BookableId>) -> Result<String> {
    let state = session
        .load::<Vec<Bookable>>(RestClient::<Bookable>::collection_path())
        .await?;
    if let FetchState::Error(e) = &state {
        return Err(anyhow::anyhow!("{e}"));
    }
    Ok(render_state(&state, |bookables| {
        BookablesView::new(bookables, id).render()
    }))
}

async fn bookings_page(session: &Session, params: BookingsParams) -> Result<String> {
    let bookables = match session
        .load::<Vec<Bookable>>(RestClient::<Bookable>::collection_path())
        .await?
    {
        FetchState::Success(bookables) => bookables,
        FetchState::Error(e) => return Err(anyhow::anyhow!("{e}")),
        other => return Ok(render_state(&other, |_| String::new())),
    };

    let Some(selected) = select_or_first(&bookables, params.bookable_id) else {
        return Ok(BookingsView::new(&bookables, params, &[]).render());
    };
    let week = Week::containing(params.date);
    let resource = session.bookings().week_url(selected.id, &week)?;
    let state = session.load::<Vec<Booking>>(resource).await?;
    if let FetchState::Error(e) = &state {
        return Err(anyhow::anyhow!("{e}"));
    }

    Ok(render_state(&state, |bookings| {
        BookingsView::new(&bookables, params, bookings).render()
    }))
}

async fn serve(
    config: &AppConfig,
    db: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<ExitCode> {
    let seed = match db.or(config.server.db.clone()) {
        Some(path) => Seed::from_file(&path).await?,
        None => Seed::default(),
    };
    info!(
        bookables = seed.bookables.len(),
        bookings = seed.bookings.len(),
        "Seed loaded"
    );

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let mut system = BackendSystem::start(seed);
    let addr = system
        .serve((host.as_str(), port))
        .await
        .with_context(|| format!("binding {host}:{port}"))?;
    println!("Serving bookings API on http://{addr}");

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down");
    system.shutdown().await?;
    Ok(ExitCode::SUCCESS)
}
