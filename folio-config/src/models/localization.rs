use std::{collections::BTreeMap, env};

use folio_core::{DEFAULT_LOCALE, Translations};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// `[localization]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Locale used when nothing else matches.
    pub default_locale: String,
    /// Saved choice; wins over the environment's language when it has a
    /// table.
    pub preferred: Option<String>,
    /// `locale -> key -> text`.
    pub tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            preferred: None,
            tables: BTreeMap::new(),
        }
    }
}

impl LocalizationConfig {
    /// Build the provider, picking the start locale from `preferred`, then
    /// `$LANG`, then `default_locale`.
    pub fn build(&self) -> Translations {
        let language = env::var("LANG").ok();
        self.build_with_environment(language.as_deref())
    }

    /// [`Self::build`] with an explicit environment language.
    pub fn build_with_environment(&self, language: Option<&str>) -> Translations {
        let translations = Translations::new(self.default_locale.clone());
        for (locale, table) in &self.tables {
            translations.insert_table(locale.clone(), table.clone());
        }

        let locale =
            translations.detect_locale(self.preferred.as_deref(), language);
        if let Err(err) = translations.set_locale_silent(&locale) {
            warn!("keeping default locale: {}", err);
        }
        debug!(
            "translations ready: locales={:?}, active={}",
            translations.available_locales(),
            locale
        );
        translations
    }
}
