mod local;
mod multithreaded;

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::Config, fetch, parse::MenuSnapshot};

use local::FileStore;
pub use multithreaded::MultithreadedCache as Multithreaded;

pub const REFRESH_INTERVAL: Duration = Duration::minutes(15);

/// One scrape of the upstream menu page plus the time it was taken.
#[derive(Debug, Serialize, Deserialize)]
pub struct MenuCache {
    cached_at: DateTime<Utc>,
    snapshot: MenuSnapshot,
}

impl Default for MenuCache {
    fn default() -> Self {
        Self {
            cached_at: Utc::now(),
            snapshot: MenuSnapshot::default(),
        }
    }
}

impl MenuCache {
    #[inline]
    #[must_use]
    pub fn time_since_refresh(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.cached_at)
    }

    #[inline]
    #[must_use]
    pub fn time_until_refresh(&self) -> chrono::Duration {
        REFRESH_INTERVAL - self.time_since_refresh()
    }

    #[inline]
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.time_since_refresh() > REFRESH_INTERVAL
    }

    #[inline]
    #[must_use]
    pub const fn snapshot(&self) -> &MenuSnapshot {
        &self.snapshot
    }

    /// Scrapes a fresh snapshot. A transport failure or a page none of the
    /// scan strategies understand degrades to an empty snapshot; the
    /// upstream site being down must not take this service down with it.
    pub async fn load(config: &Config) -> Self {
        let client = fetch::make_client();
        let snapshot = match fetch::menu_page(&client, config.menu_url()).await {
            Ok(html) => MenuSnapshot::from_html(&html),
            Err(e) => {
                log::warn!("fetching the menu page failed: {e}");
                MenuSnapshot::default()
            }
        };
        if snapshot.is_empty() {
            log::warn!("menu scrape produced an empty snapshot");
        } else {
            log::info!("menu scrape found {} days", snapshot.len());
        }
        Self {
            cached_at: Utc::now(),
            snapshot,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_snapshot(snapshot: MenuSnapshot) -> Self {
        Self {
            cached_at: Utc::now(),
            snapshot,
        }
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub enum Store {
    Local(FileStore),
    AdHoc,
}

impl Store {
    #[inline]
    pub async fn local(p: impl AsRef<Path>) -> crate::Result<Self> {
        FileStore::open(p).await.map(Self::Local)
    }

    pub async fn load(&mut self, config: &Config) -> crate::Result<MenuCache> {
        let value = match self {
            Self::Local(f) => f.load().await?,
            Self::AdHoc => None,
        };

        match value {
            Some(v) => Ok(v),
            None => {
                let v = MenuCache::load(config).await;
                self.save(&v).await?;
                Ok(v)
            }
        }
    }

    pub async fn save(&mut self, data: &MenuCache) -> crate::Result<()> {
        match self {
            Self::Local(f) => f.save(data).await,
            Self::AdHoc => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn fresh_cache_does_not_need_refresh() {
        let cache = MenuCache::default();
        assert!(!cache.needs_refresh());
        assert!(cache.time_until_refresh() > Duration::zero());
    }

    #[tokio::test]
    async fn local_store_round_trips() {
        let path = std::env::temp_dir().join("canteen_menu_store_test.json");
        let _res = fs::remove_file(&path);

        let html = fs::read_to_string("./src/parse/html_examples/menu_page/week.html").unwrap();
        let cache = MenuCache::with_snapshot(MenuSnapshot::from_html(&html));

        let mut store = Store::local(&path).await.unwrap();
        store.save(&cache).await.unwrap();
        let loaded = store
            .load(&Config::from_env())
            .await
            .unwrap();
        assert_eq!(loaded.snapshot(), cache.snapshot());

        let _res = fs::remove_file(&path);
    }
}
