use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use shared::{
    domain::{Product, ProductDraft, ProductId},
    protocol::ItemsEnvelope,
};
use tracing::{debug, warn};
use url::Url;

pub mod config;
pub mod credentials;
pub mod error;
pub mod list_controller;
pub mod page;
pub mod row_editor;

pub use credentials::{
    CredentialProvider, MissingCredential, SessionCredentialStore, StaticToken, ACCESS_TOKEN_KEY,
};
pub use error::{ApiRequestError, EditorError, PageError};
pub use list_controller::{
    ListController, ListView, MutationKind, Notification, Severity, NOTIFICATION_TIMEOUT,
};
pub use page::ProductPage;
pub use row_editor::{EditState, PendingAction, RowEditor};

pub const DEFAULT_API_PREFIX: &str = "/api/product";

/// The four round trips the dashboard makes against the product backend.
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Product>, ApiRequestError>;
    async fn create_item(&self, draft: &ProductDraft) -> Result<Product, ApiRequestError>;
    async fn update_item(&self, product: &Product) -> Result<(), ApiRequestError>;
    async fn delete_item(&self, id: &ProductId) -> Result<(), ApiRequestError>;
}

pub struct HttpProductClient {
    http: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpProductClient {
    /// `server_url` is the backend origin and `api_prefix` the path the
    /// product resource is mounted under (`/api/product` by default).
    pub fn new(
        server_url: &str,
        api_prefix: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiRequestError> {
        Ok(Self {
            http: Client::new(),
            base_url: resource_base_url(server_url, api_prefix)?,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn items_url(&self, id: Option<&ProductId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push("items");
            if let Some(id) = id {
                segments.push(&id.0);
            }
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.credentials.access_token().unwrap_or_else(|| {
            warn!("no access token available; sending request with an empty bearer token");
            String::new()
        });
        request.bearer_auth(token)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        method: Method,
        url: &Url,
    ) -> Result<Response, ApiRequestError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|source| ApiRequestError::Transport {
                method: method.clone(),
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "product api response");
        if !status.is_success() {
            return Err(ApiRequestError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ProductApi for HttpProductClient {
    async fn list_items(&self) -> Result<Vec<Product>, ApiRequestError> {
        let url = self.items_url(None);
        let response = self
            .execute(self.http.get(url.clone()), Method::GET, &url)
            .await?;
        let envelope: ItemsEnvelope =
            response
                .json()
                .await
                .map_err(|source| ApiRequestError::Decode {
                    url: url.to_string(),
                    source,
                })?;
        Ok(envelope.data)
    }

    async fn create_item(&self, draft: &ProductDraft) -> Result<Product, ApiRequestError> {
        let url = self.items_url(None);
        let response = self
            .execute(self.http.post(url.clone()).json(draft), Method::POST, &url)
            .await?;
        response
            .json::<Product>()
            .await
            .map_err(|source| ApiRequestError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn update_item(&self, product: &Product) -> Result<(), ApiRequestError> {
        let url = self.items_url(Some(&product.id));
        self.execute(self.http.put(url.clone()).json(product), Method::PUT, &url)
            .await?;
        Ok(())
    }

    async fn delete_item(&self, id: &ProductId) -> Result<(), ApiRequestError> {
        let url = self.items_url(Some(id));
        self.execute(self.http.delete(url.clone()), Method::DELETE, &url)
            .await?;
        Ok(())
    }
}

fn resource_base_url(server_url: &str, api_prefix: &str) -> Result<Url, ApiRequestError> {
    let invalid = |reason: String| ApiRequestError::InvalidBaseUrl {
        url: server_url.to_string(),
        reason,
    };

    let mut url = Url::parse(server_url.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| invalid("url cannot be a base".to_string()))?;
        segments.pop_if_empty();
        for segment in api_prefix.split('/').filter(|s| !s.is_empty()) {
            segments.push(segment);
        }
    }
    Ok(url)
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
