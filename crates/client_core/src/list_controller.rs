//! Owner of the loaded product collection and the page notification.
//!
//! Every mutation is reconciled by a full reload: the collection is cleared
//! and fetched again rather than patched locally.

use std::time::{Duration, Instant};

use shared::domain::Product;
use tracing::{error, info};

use crate::{error::ApiRequestError, ProductApi};

pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(6000);
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to fetch products.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Created,
    Updated,
    Deleted,
}

impl MutationKind {
    pub fn success_message(self) -> &'static str {
        match self {
            MutationKind::Created => "Successfully added product!",
            MutationKind::Updated => "Successfully edited product!",
            MutationKind::Deleted => "Successfully deleted product!",
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            MutationKind::Created => "add",
            MutationKind::Updated => "update",
            MutationKind::Deleted => "delete",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            MutationKind::Created => "added",
            MutationKind::Updated => "edited",
            MutationKind::Deleted => "deleted",
        }
    }
}

/// What the page should render. Loading wins over a load failure, and the
/// table is only shown when neither applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ListView<'a> {
    Loading,
    Failed(&'a str),
    Table(&'a [Product]),
}

#[derive(Debug)]
pub struct ListController {
    products: Vec<Product>,
    loading: bool,
    error: Option<String>,
    notification: Option<(Notification, Instant)>,
    notification_timeout: Duration,
}

impl Default for ListController {
    fn default() -> Self {
        Self::new(NOTIFICATION_TIMEOUT)
    }
}

impl ListController {
    /// A freshly mounted controller is in the loading state until the first
    /// load finishes.
    pub fn new(notification_timeout: Duration) -> Self {
        Self {
            products: Vec::new(),
            loading: true,
            error: None,
            notification: None,
            notification_timeout,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref().map(|(notification, _)| notification)
    }

    pub fn view(&self) -> ListView<'_> {
        if self.loading {
            ListView::Loading
        } else if let Some(error) = &self.error {
            ListView::Failed(error)
        } else {
            ListView::Table(&self.products)
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Applies the outcome of a collection fetch. A failure keeps whatever
    /// collection was already present.
    pub fn finish_load(
        &mut self,
        result: Result<Vec<Product>, ApiRequestError>,
    ) -> Result<(), ApiRequestError> {
        self.loading = false;
        match result {
            Ok(products) => {
                info!(count = products.len(), "loaded products");
                self.products = products;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                error!("Failed to fetch products: {err}");
                self.error = Some(LOAD_FAILURE_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    /// Ends a load whose request never reached the backend. Shown the same
    /// way as a failed fetch.
    pub fn abandon_load(&mut self) {
        self.loading = false;
        self.error = Some(LOAD_FAILURE_MESSAGE.to_string());
    }

    pub async fn load(&mut self, api: &dyn ProductApi) -> Result<(), ApiRequestError> {
        self.begin_load();
        let result = api.list_items().await;
        self.finish_load(result)
    }

    pub fn begin_reload(&mut self) {
        self.products.clear();
        self.begin_load();
    }

    /// Finishes a post-mutation reload. `notice` is only raised when the
    /// reload succeeded; otherwise an error notification says the list is
    /// stale.
    pub fn finish_reload(
        &mut self,
        notice: Notification,
        result: Result<Vec<Product>, ApiRequestError>,
    ) -> Result<(), ApiRequestError> {
        match self.finish_load(result) {
            Ok(()) => {
                self.raise(notice);
                Ok(())
            }
            Err(err) => {
                self.raise(Notification::error(format!(
                    "{} The product list could not be reloaded.",
                    notice.message
                )));
                Err(err)
            }
        }
    }

    pub async fn notify_and_reload(
        &mut self,
        api: &dyn ProductApi,
        notice: Notification,
    ) -> Result<(), ApiRequestError> {
        self.begin_reload();
        let result = api.list_items().await;
        self.finish_reload(notice, result)
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Drops the notification once it has been visible for the configured
    /// timeout. Returns whether one was dropped.
    pub fn expire_notification(&mut self, now: Instant) -> bool {
        let expired = self.notification.as_ref().is_some_and(|(_, raised_at)| {
            now.saturating_duration_since(*raised_at) >= self.notification_timeout
        });
        if expired {
            self.notification = None;
        }
        expired
    }

    /// Time left before the current notification auto-dismisses.
    pub fn notification_remaining(&self, now: Instant) -> Option<Duration> {
        self.notification.as_ref().map(|(_, raised_at)| {
            self.notification_timeout
                .saturating_sub(now.saturating_duration_since(*raised_at))
        })
    }

    fn raise(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }
}

#[cfg(test)]
#[path = "tests/list_controller_tests.rs"]
mod tests;
