//! Backend worker: owns the HTTP client and runs queued commands one at a time.

use std::{sync::Arc, thread};

use client_core::{config::DashboardSettings, HttpProductClient, ProductApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: DashboardSettings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                )));
                return;
            }
        };

        let client = match HttpProductClient::new(
            &settings.server_url,
            &settings.api_prefix,
            settings.credentials(),
        ) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!("failed to build product client: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendUnavailable(err.to_string()));
                return;
            }
        };
        let _ = ui_tx.try_send(UiEvent::Info(server_notice(&client)));
        let api: Arc<dyn ProductApi> = Arc::new(client);

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let name = cmd.name();
                let event = handle_command(api.as_ref(), cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::debug!(command = name, "ui closed; stopping backend worker");
                    break;
                }
            }
        });
    });
}

/// Status line shown before the first request completes. Nothing has been
/// sent yet, so it names the endpoint without claiming a connection.
fn server_notice(client: &HttpProductClient) -> String {
    format!("Using product server {}", client.base_url())
}

/// Runs one command. Successful mutations are followed by a full reload so
/// the UI can reconcile against the server copy.
pub async fn handle_command(api: &dyn ProductApi, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::LoadProducts => UiEvent::ProductsLoaded(api.list_items().await),
        BackendCommand::CreateProduct { draft } => {
            let result = api.create_item(&draft).await;
            let reload = if result.is_ok() {
                Some(api.list_items().await)
            } else {
                None
            };
            UiEvent::ProductCreated { result, reload }
        }
        BackendCommand::UpdateProduct { product } => {
            let result = api.update_item(&product).await;
            let reload = if result.is_ok() {
                Some(api.list_items().await)
            } else {
                None
            };
            UiEvent::ProductUpdated {
                id: product.id,
                result,
                reload,
            }
        }
        BackendCommand::DeleteProduct { id } => {
            let result = api.delete_item(&id).await;
            let reload = if result.is_ok() {
                Some(api.list_items().await)
            } else {
                None
            };
            UiEvent::ProductDeleted { id, result, reload }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use client_core::ApiRequestError;
    use reqwest::Method;
    use shared::domain::{Product, ProductDraft, ProductId};

    use super::*;

    #[derive(Default)]
    struct ScriptedApi {
        rows: Mutex<Vec<Product>>,
        reject_writes: bool,
        list_calls: Mutex<usize>,
    }

    impl ScriptedApi {
        fn rejected(method: Method) -> ApiRequestError {
            ApiRequestError::Status {
                method,
                url: "http://127.0.0.1:3000/api/product/items".into(),
                status: 500,
            }
        }

        fn list_calls(&self) -> usize {
            *self.list_calls.lock().expect("list calls")
        }
    }

    #[async_trait]
    impl ProductApi for ScriptedApi {
        async fn list_items(&self) -> Result<Vec<Product>, ApiRequestError> {
            *self.list_calls.lock().expect("list calls") += 1;
            Ok(self.rows.lock().expect("rows").clone())
        }

        async fn create_item(&self, draft: &ProductDraft) -> Result<Product, ApiRequestError> {
            if self.reject_writes {
                return Err(Self::rejected(Method::POST));
            }
            let product = Product {
                id: ProductId("new".into()),
                name: draft.name.clone(),
                quantity: draft.quantity,
                category: draft.category.clone(),
                price: draft.price,
                unit: draft.unit.clone(),
            };
            self.rows.lock().expect("rows").push(product.clone());
            Ok(product)
        }

        async fn update_item(&self, _product: &Product) -> Result<(), ApiRequestError> {
            if self.reject_writes {
                return Err(Self::rejected(Method::PUT));
            }
            Ok(())
        }

        async fn delete_item(&self, id: &ProductId) -> Result<(), ApiRequestError> {
            if self.reject_writes {
                return Err(Self::rejected(Method::DELETE));
            }
            self.rows.lock().expect("rows").retain(|p| &p.id != id);
            Ok(())
        }
    }

    #[test]
    fn server_notice_names_the_endpoint_without_claiming_a_connection() {
        let settings = DashboardSettings::default();
        let client = HttpProductClient::new(
            &settings.server_url,
            &settings.api_prefix,
            settings.credentials(),
        )
        .expect("client");

        let notice = server_notice(&client);
        assert_eq!(
            notice,
            "Using product server http://127.0.0.1:3000/api/product"
        );
        assert!(!notice.contains("Connected"));
    }

    #[tokio::test]
    async fn successful_create_is_followed_by_reload() {
        let api = ScriptedApi::default();
        let draft = ProductDraft {
            name: "Ink".into(),
            ..ProductDraft::default()
        };

        let event = handle_command(&api, BackendCommand::CreateProduct { draft }).await;

        let UiEvent::ProductCreated { result, reload } = event else {
            panic!("expected a create event");
        };
        assert_eq!(result.expect("created").name, "Ink");
        assert_eq!(reload.expect("reload").expect("listed").len(), 1);
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn failed_delete_skips_reload() {
        let api = ScriptedApi {
            reject_writes: true,
            ..ScriptedApi::default()
        };

        let event = handle_command(
            &api,
            BackendCommand::DeleteProduct {
                id: ProductId("1".into()),
            },
        )
        .await;

        let UiEvent::ProductDeleted { id, result, reload } = event else {
            panic!("expected a delete event");
        };
        assert_eq!(id, ProductId("1".into()));
        assert!(matches!(
            result,
            Err(ApiRequestError::Status { status: 500, .. })
        ));
        assert!(reload.is_none());
        assert_eq!(api.list_calls(), 0);
    }
}
