use std::{num::NonZeroU32, sync::OnceLock, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

/// The ordering system serves an odd stripped-down page (or rejects the
/// request outright) when it does not recognize the client as a browser.
static BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// The upstream site is slow at lunch time but not this slow.
static FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub fn make_client() -> Client {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .gzip(true)
        .build()
        .expect("client creation should succeed")
}

static RATE_LIMIT: u32 = 2;
static DELAY_JITTER: u64 = 2;
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

/// Fetches the public menu page. No credentials and no cookies: the menu is
/// viewable without logging in, and login is a different feature entirely.
#[instrument(skip(client), fields(url = %url), level = Level::TRACE)]
pub async fn menu_page(client: &Client, url: &Url) -> Result<String, RequestError> {
    let rate_limiter = RATE_LIMITER.get_or_init(|| {
        governor::RateLimiter::direct(governor::Quota::per_second(
            NonZeroU32::new(RATE_LIMIT).unwrap(),
        ))
    });
    let retry_jitter = governor::Jitter::new(Duration::ZERO, Duration::from_secs(DELAY_JITTER));
    rate_limiter.until_ready_with_jitter(retry_jitter).await;
    let res = client.get(url.clone()).send().await?;
    let start = std::time::Instant::now();
    let text = res.text().await?;
    log::trace!("got menu page text in\t{:?}", start.elapsed());
    Ok(text)
}
