use shikkha_client::session::CredentialStore;
use shikkha_client::{ClientError, Result};
use wasm_bindgen::JsValue;

/// Keeps the bearer token in `window.localStorage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStorage {
    key: String,
}

fn storage_error(e: JsValue) -> ClientError {
    ClientError::Storage(format!("{e:?}"))
}

impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| ClientError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| ClientError::Storage("local storage is disabled".to_string()))
    }
}

impl CredentialStore for LocalStorage {
    fn load(&self) -> Option<String> {
        match Self::storage() {
            Ok(storage) => storage.get_item(&self.key).ok().flatten(),
            Err(e) => {
                log::warn!("Cannot read the stored credential: {e}");
                None
            }
        }
    }

    fn store(&self, token: &str) -> Result<()> {
        Self::storage()?
            .set_item(&self.key, token)
            .map_err(storage_error)
    }

    fn clear(&self) -> Result<()> {
        Self::storage()?.remove_item(&self.key).map_err(storage_error)
    }
}
