use std::ops::Deref;

use futures_locks::{Mutex, RwLock};

use super::{MenuCache, Store};
use crate::config::Config;
use crate::error::Error;

/// Shares one [`MenuCache`] between any number of request handlers: readers
/// take the lock concurrently, a refresh swaps the whole value under the
/// write lock while holding the store exclusively.
#[derive(Debug)]
pub struct MultithreadedCache {
    store: Mutex<Store>,
    data: RwLock<MenuCache>,
    config: Config,
}

impl MultithreadedCache {
    pub async fn new(mut store: Store, config: Config) -> Result<Self, Error> {
        let data = store.load(&config).await?;

        Ok(Self {
            store: Mutex::new(store),
            data: RwLock::new(data),
            config,
        })
    }

    pub async fn refresh(&self) -> Result<(), Error> {
        let mut store = self.store.lock().await;
        let mut fresh = MenuCache::load(&self.config).await;
        store.save(&fresh).await?;
        let mut guard = self.data.write().await;
        std::mem::swap(&mut *guard, &mut fresh);
        Ok(())
    }

    pub async fn maybe_refresh(&self) -> Result<bool, Error> {
        let stale = self.data.read().await.needs_refresh();
        if stale {
            self.refresh().await?;
        }
        Ok(stale)
    }

    pub async fn get(&self) -> impl Deref<Target = MenuCache> + '_ {
        self.data.read().await
    }
}
