//! Browser implementations of the seams of `shikkha-client`.

pub mod fetch;
pub mod hls;
pub mod storage;

use shikkha_client::ClientConfig;

const CONFIG_ELEMENT_ID: &str = "shikkha-config";

/// Reads the runtime configuration embedded in `index.html`, falling back to the values the site
/// was built with.
pub fn load_config() -> ClientConfig {
    let embedded = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|e| e.text_content())
        .filter(|text| !text.trim().is_empty());

    if let Some(json) = embedded {
        match ClientConfig::from_json(&json) {
            Ok(config) => return config,
            Err(e) => log::error!("Ignoring embedded configuration: {e}"),
        }
    }

    ClientConfig::from_build_env().unwrap_or_else(|e| {
        log::error!("Invalid build configuration, using defaults: {e}");
        ClientConfig::default()
    })
}

/// Blocking confirmation dialog. Returns false when the browser refuses to show it.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
