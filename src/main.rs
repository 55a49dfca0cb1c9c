#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod cache;
mod config;
mod error;
mod fetch;
mod parse;
mod rank;

use std::{env, sync::Arc, time::Duration};

use axum::{
    body::Body,
    extract::State,
    http::Method,
    response::Response,
    routing::{get, on, MethodFilter},
    Json, Router,
};
use chrono::Local;
use tokio::{net::TcpListener, time::sleep};
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, cors::Any};

use crate::cache::{Multithreaded, Store};
use crate::config::Config;

pub use error::Result;

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// The one caller-facing operation: the cached snapshot, ranked around the
/// current day and narrowed to the default window.
async fn meals(State(cache): State<Arc<Multithreaded>>) -> Json<rank::RankedMenu> {
    if let Err(e) = cache.maybe_refresh().await {
        tracing::warn!("Error while refreshing cache: {e:?}");
    }
    let today = Local::now().date_naive();
    let data = cache.get().await;
    let menu = rank::ranked_within(data.snapshot(), today, rank::DEFAULT_WINDOW);
    if menu.is_empty() {
        log::debug!("serving an empty menu");
    }
    Json(menu)
}

async fn refresh(State(cache): State<Arc<Multithreaded>>) -> Response {
    if let Err(e) = cache.refresh().await {
        tracing::warn!("Error while refreshing cache: {e:?}");
    }
    let c = cache.get().await;
    Response::builder()
        .status(201)
        .body(Body::from(format!(
            "Last refresh: {}\nNext refresh: {}",
            c.time_since_refresh(),
            c.time_until_refresh(),
        )))
        .unwrap()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env();
    let store = match env::var("CACHE").as_deref() {
        Ok(":memory:") => Store::AdHoc,
        Ok(p) => Store::local(p).await?,
        Err(_) => {
            log::warn!("env var CACHE not set, using ad-hoc memory cache.");
            Store::AdHoc
        }
    };
    let cache = Arc::new(Multithreaded::new(store, config.clone()).await?);
    let addr = config.addr();

    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST]) // intentionally excludes request-refresh/PUT
        .allow_origin(Any);

    let app = Router::new()
        .route("/api/meals", get(meals))
        .route("/request-refresh", on(MethodFilter::PUT, refresh))
        .with_state(Arc::clone(&cache))
        .layer(cors_layer)
        .layer(compression_layer);

    tokio::spawn({
        let cache = Arc::clone(&cache);
        async move {
            loop {
                sleep(Duration::from_secs(
                    cache::REFRESH_INTERVAL
                        .num_seconds()
                        .try_into()
                        .expect("refresh interval to be positive"),
                ))
                .await;
                if let Err(e) = cache.refresh().await {
                    log::warn!("Background refresh failed: {e}");
                }
            }
        }
    });

    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to listen on {addr}: {e}"));
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
