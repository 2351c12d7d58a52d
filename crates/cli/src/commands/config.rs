//! `config` - inspect and change stored preferences.

use tracing::info;

use lesson_shop_storefront::config::{parse_api_base, preferences_path};
use lesson_shop_storefront::{Preferences, Result, ShopConfig};

use crate::render;

/// Print the resolved configuration and where it came from.
///
/// Problems with the stored preference are printed rather than returned so
/// they can be seen and then fixed with `set-api-base` or `clear-api-base`.
pub fn show(api_base_override: Option<&str>) {
    let path = preferences_path();
    render::message(&format!("Preferences file: {}", path.display()));

    match Preferences::load(&path) {
        Ok(stored) => render::message(&format!(
            "Stored API base:  {}",
            stored.api_base.as_deref().unwrap_or("(none)")
        )),
        Err(e) => render::message(&format!("Stored API base:  unreadable ({e})")),
    }

    match ShopConfig::from_env(api_base_override) {
        Ok(config) => {
            render::message(&format!("API base:         {}", config.api_base));
            render::message(&format!(
                "Search debounce:  {} ms",
                config.search_debounce.as_millis()
            ));
            render::message(&format!(
                "HTTP timeout:     {} s",
                config.http_timeout.as_secs()
            ));
        }
        Err(e) => render::message(&format!("API base:         invalid ({e})")),
    }
}

/// Validate and store a backend base URL.
///
/// # Errors
///
/// Returns an error if the URL is not http(s) or the preferences file cannot
/// be read or written.
pub fn set_api_base(url: &str) -> Result<()> {
    let api_base = parse_api_base(url)?;
    let path = preferences_path();

    let mut preferences = Preferences::load(&path).unwrap_or_default();
    preferences.api_base = Some(api_base.as_str().trim_end_matches('/').to_string());
    preferences.save(&path)?;

    info!(api_base = %api_base, path = %path.display(), "Stored API base");
    render::message(&format!("API base set to {api_base}"));
    Ok(())
}

/// Remove the stored backend base URL.
///
/// # Errors
///
/// Returns an error if the preferences file cannot be written.
pub fn clear_api_base() -> Result<()> {
    let path = preferences_path();

    let mut preferences = Preferences::load(&path).unwrap_or_default();
    preferences.api_base = None;
    preferences.save(&path)?;

    info!(path = %path.display(), "Cleared stored API base");
    render::message("Stored API base cleared");
    Ok(())
}
