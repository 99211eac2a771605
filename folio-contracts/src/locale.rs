//! Localization provider surface.

use tokio::sync::watch;

/// Resolves display strings for the active locale.
pub trait Localizer: Send + Sync {
    /// Localized text for `key`, or `key` itself when there is no entry.
    /// Never fails.
    fn resolve(&self, key: &str) -> String;

    /// Code of the active locale (e.g. `"cz"`).
    fn locale(&self) -> String;

    /// Subscribe to locale changes.
    fn subscribe(&self) -> LocaleSubscription;
}

/// Explicit handle on a locale-change subscription.
///
/// Dropping the handle, or calling [`LocaleSubscription::unsubscribe`],
/// tears the subscription down; nothing is left registered with the
/// provider.
#[derive(Debug)]
pub struct LocaleSubscription {
    rx: Option<watch::Receiver<String>>,
}

impl LocaleSubscription {
    /// Subscribe through the provider's watch channel.
    pub fn new(rx: watch::Receiver<String>) -> Self {
        Self { rx: Some(rx) }
    }

    /// A subscription that never fires, for providers with a fixed locale.
    pub fn detached() -> Self {
        Self { rx: None }
    }

    /// False once unsubscribed or the provider is gone.
    pub fn is_active(&self) -> bool {
        self.rx.is_some()
    }

    /// Wait for the next locale change and return the new locale.
    ///
    /// Returns `None` once unsubscribed or when the provider is gone; the
    /// subscription is inactive from then on.
    pub async fn changed(&mut self) -> Option<String> {
        let rx = self.rx.as_mut()?;
        match rx.changed().await {
            Ok(()) => Some(rx.borrow_and_update().clone()),
            Err(_) => {
                log::debug!("locale provider dropped, closing subscription");
                self.rx = None;
                None
            }
        }
    }

    /// Stop listening. Later calls to `changed` return `None`.
    pub fn unsubscribe(&mut self) {
        self.rx = None;
    }
}
