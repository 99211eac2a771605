//! In-process translation tables.
//!
//! [`Translations`] keeps one key/value table per locale and publishes the
//! active locale through a `watch` channel, so every subscriber sees the
//! latest locale and nothing has to be unregistered by hand.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use folio_contracts::locale::{LocaleSubscription, Localizer};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::LocaleError;

/// Locale used when nothing better is known.
pub const DEFAULT_LOCALE: &str = "cz";

type Table = HashMap<String, String>;

/// In-memory [`Localizer`] with one table per locale.
#[derive(Debug)]
pub struct Translations {
    tables: RwLock<BTreeMap<String, Table>>,
    locale: watch::Sender<String>,
    fallback: String,
}

impl Default for Translations {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

impl Translations {
    /// Provider with an empty table for `locale`, which becomes active and
    /// is the fallback for [`Translations::detect_locale`].
    pub fn new(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        let mut tables = BTreeMap::new();
        tables.insert(locale.clone(), Table::new());
        let (tx, _) = watch::channel(locale.clone());
        Self {
            tables: RwLock::new(tables),
            locale: tx,
            fallback: locale,
        }
    }

    /// Builder form of [`Translations::insert_table`].
    pub fn with_table<I, K, V>(self, locale: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.insert_table(locale, entries);
        self
    }

    /// Merge `entries` into the table for `locale`, creating it if needed.
    pub fn insert_table<I, K, V>(&self, locale: impl Into<String>, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut tables = self.write();
        let table = tables.entry(locale.into()).or_default();
        table.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Add or replace a single entry.
    pub fn add_translation(
        &self,
        locale: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.write()
            .entry(locale.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Switch locales and notify subscribers.
    ///
    /// Unknown locales are rejected and leave the active one in place.
    /// Switching to the active locale is a no-op.
    pub fn set_locale(&self, locale: &str) -> Result<(), LocaleError> {
        self.ensure_known(locale)?;
        let changed = self.locale.send_if_modified(|current| {
            if current == locale {
                return false;
            }
            *current = locale.to_string();
            true
        });
        if changed {
            info!("locale changed: {}", locale);
        }
        Ok(())
    }

    /// Switch locales without notifying subscribers.
    pub fn set_locale_silent(&self, locale: &str) -> Result<(), LocaleError> {
        self.ensure_known(locale)?;
        self.locale.send_if_modified(|current| {
            *current = locale.to_string();
            false
        });
        debug!("locale switched silently: {}", locale);
        Ok(())
    }

    /// Known locales, sorted.
    pub fn available_locales(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Whether a table exists for `locale`.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.read().contains_key(locale)
    }

    /// Whether the active locale has an entry for `key`.
    pub fn has_translation(&self, key: &str) -> bool {
        let locale = self.locale.borrow();
        self.read()
            .get(locale.as_str())
            .is_some_and(|table| table.contains_key(key))
    }

    /// Entry for `key` in the active locale, or `fallback`.
    pub fn translate_or(&self, key: &str, fallback: &str) -> String {
        self.lookup(key).unwrap_or_else(|| fallback.to_string())
    }

    /// Entry for `key` with `{name}` placeholders substituted from `vars`.
    /// Placeholders without a value are left as they are.
    pub fn translate_with(&self, key: &str, vars: &[(&str, &str)]) -> String {
        vars.iter()
            .fold(self.resolve(key), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    /// Pick the starting locale: a saved choice, then the environment's
    /// language (`"en-US"`, `"en_US.UTF-8"` → `"en"`), then the locale the
    /// provider was created with. Candidates without a table are skipped.
    pub fn detect_locale(
        &self,
        saved: Option<&str>,
        environment: Option<&str>,
    ) -> String {
        let environment = environment.and_then(|lang| {
            lang.split(['-', '_', '.'])
                .next()
                .filter(|code| !code.is_empty())
        });

        saved
            .into_iter()
            .chain(environment)
            .find(|candidate| self.has_locale(candidate))
            .unwrap_or(self.fallback.as_str())
            .to_string()
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let locale = self.locale.borrow();
        self.read()
            .get(locale.as_str())
            .and_then(|table| table.get(key))
            .cloned()
    }

    fn ensure_known(&self, locale: &str) -> Result<(), LocaleError> {
        if self.has_locale(locale) {
            Ok(())
        } else {
            debug!("rejecting unknown locale: {}", locale);
            Err(LocaleError::UnknownLocale(locale.to_string()))
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Table>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Table>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Localizer for Translations {
    fn resolve(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    fn locale(&self) -> String {
        self.locale.borrow().clone()
    }

    fn subscribe(&self) -> LocaleSubscription {
        LocaleSubscription::new(self.locale.subscribe())
    }
}
