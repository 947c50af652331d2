//! Configuration, store and HTTP client shared by every command.

use anyhow::{Context, Result};
use reqwest::Client;
use tripkit_core::config::TripConfig;
use tripkit_core::store::{FileStorage, Store};

pub type AppStore = Store<FileStorage>;

pub struct App {
    pub config: TripConfig,
    pub store: AppStore,
    client: Client,
}

impl App {
    pub fn load() -> Result<Self> {
        let config = TripConfig::load().context("Failed to load configuration")?;
        Ok(Self::with_config(config))
    }

    /// Open the store described by `config` and hydrate it.
    pub fn with_config(config: TripConfig) -> Self {
        let storage = FileStorage::new(config.data_path());
        let store = Store::open(storage, config.storage_key.clone());

        App {
            config,
            store,
            client: Client::new(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Record `err` in the store's error log and hand it back.
    pub fn fail(&mut self, err: anyhow::Error) -> anyhow::Error {
        self.store.log_error(&*err);
        err
    }
}
