use std::{
    fs::OpenOptions,
    net::SocketAddr,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use pocketbook::{
    AppState, DEFAULT_REPORT_MODEL, GeminiClient, ReportGenerator, UnconfiguredGenerator,
    UpdatePolicy, build_router, graceful_shutdown, logging_middleware,
};

/// The web server for pocketbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC", value_parser = parse_timezone)]
    timezone: String,

    /// API key for the Gemini text generation service.
    ///
    /// Report generation fails with an error message when this is not set.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// The Gemini model used to write reports.
    #[arg(long, default_value = DEFAULT_REPORT_MODEL)]
    report_model: String,

    /// Respond with an error when asked to update a transaction that does not exist.
    #[arg(long)]
    reject_missing_updates: bool,
}

fn parse_timezone(name: &str) -> Result<String, String> {
    match time_tz::timezones::get_by_name(name) {
        Some(_) => Ok(name.to_owned()),
        None => Err(format!("\"{name}\" is not a canonical timezone name")),
    }
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let report_generator: Arc<dyn ReportGenerator> = match &args.gemini_api_key {
        Some(api_key) if !api_key.is_empty() => {
            Arc::new(GeminiClient::new(api_key, &args.report_model))
        }
        _ => {
            tracing::warn!("GEMINI_API_KEY is not set, report generation is disabled");
            Arc::new(UnconfiguredGenerator)
        }
    };

    let update_policy = if args.reject_missing_updates {
        UpdatePolicy::Reject
    } else {
        UpdatePolicy::Ignore
    };

    let conn = Connection::open(&args.db_path).expect("Could not open the database file.");
    let app_state = AppState::new(conn, &args.timezone, update_policy, report_generator)
        .expect("Could not initialize the app state.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(app_state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
