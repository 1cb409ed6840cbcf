use crate::api::ApiClient;
use crate::habits::HabitStore;
use crate::storage::LocalStorage;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

pub type ClientStore = HabitStore<LocalStorage>;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub api: ApiClient,
    pub store: Arc<Mutex<ClientStore>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, api: ApiClient, storage: LocalStorage) -> Self {
        Self {
            data_path,
            api,
            store: Arc::new(Mutex::new(HabitStore::open(storage))),
        }
    }
}
