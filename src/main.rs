#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else, clippy::module_name_repetitions)]

use crate::{
    config::RuntimeConfiguration,
    data::{instructor::Instructor, payment::Payment, student::Student, workout::Workout},
    routes::{
        crud_router,
        index::{get_index_route, not_found},
        sse::sse_feed,
    },
    state::AcademiaState,
};
use axum::{Router, routing::get};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod api;
mod config;
mod container;
mod data;
mod error;
mod maud_conveniences;
mod routes;
mod state;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    warn!("signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() {
    //a .env file is optional, plain env vars work too
    let dotenv_result = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv_result {
        debug!(?e, "No .env file loaded");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    info!(api = config.api_config().base_url(), "Using backend");
    let state = AcademiaState::new(&config).expect("unable to create state");

    let trace_layer = TraceLayer::new_for_http();

    let app = Router::new()
        .route("/", get(get_index_route))
        .merge(crud_router::<Student>())
        .merge(crud_router::<Instructor>())
        .merge(crud_router::<Payment>())
        .merge(crud_router::<Workout>())
        .route("/sse_feed", get(sse_feed))
        .fallback(not_found)
        .layer(trace_layer)
        .with_state(state);

    let server_ip = config.server_ip();
    let listener = TcpListener::bind(server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("unable to serve app");
}
