//! "Support the author" link shown in the settings menu.

use crate::error::{Error, Result};
use crate::i18n::{Key, Locale};

pub const SUPPORT_URL: &str = "https://github.com/ztjhz/KoalaClient";

pub const HEART: &str = "♥";

pub fn label(locale: Locale) -> String {
    format!("{} {}", HEART, locale.t(Key::OriginalRepo))
}

/// Open the link in the system browser
pub fn open_link() -> Result<()> {
    tracing::info!("Opening {}", SUPPORT_URL);
    open::that(SUPPORT_URL).map_err(|source| Error::OpenLink {
        url: SUPPORT_URL.to_string(),
        source,
    })
}
