use std::{sync::Arc, time::Instant};

use shared::domain::{Product, ProductField};

use crate::{
    error::{EditorError, PageError},
    list_controller::{ListController, MutationKind, Notification},
    row_editor::RowEditor,
    ProductApi,
};

/// The product list page: a list controller and a row editor sharing one
/// backend.
pub struct ProductPage {
    api: Arc<dyn ProductApi>,
    list: ListController,
    editor: RowEditor,
}

impl ProductPage {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        Self::with_list(api, ListController::default())
    }

    pub fn with_list(api: Arc<dyn ProductApi>, list: ListController) -> Self {
        Self {
            api,
            list,
            editor: RowEditor::new(),
        }
    }

    pub fn list(&self) -> &ListController {
        &self.list
    }

    pub fn editor(&self) -> &RowEditor {
        &self.editor
    }

    pub async fn load(&mut self) -> Result<(), PageError> {
        let result = self.list.load(self.api.as_ref()).await;
        self.editor.sync_rows(self.list.products());
        result.map_err(PageError::Load)
    }

    fn row(&self, row: usize) -> Result<Product, EditorError> {
        let products = self.list.products();
        products
            .get(row)
            .cloned()
            .ok_or(EditorError::RowOutOfRange {
                row,
                len: products.len(),
            })
    }

    pub fn begin_edit(&mut self, row: usize) -> Result<(), EditorError> {
        let product = self.row(row)?;
        self.editor.begin_edit(row, &product);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel_edit();
    }

    pub fn set_field(&mut self, field: ProductField, raw: &str) -> Result<(), EditorError> {
        self.editor.set_field(field, raw)
    }

    pub fn toggle_add_panel(&mut self) -> bool {
        self.editor.toggle_add_panel()
    }

    pub fn set_draft_field(&mut self, field: ProductField, raw: &str) -> Result<(), EditorError> {
        self.editor.set_draft_field(field, raw)
    }

    /// Saves the row currently being edited, then reloads the list.
    pub async fn save_row(&mut self) -> Result<(), PageError> {
        let row = self.editor.editing_row().ok_or(EditorError::NotEditing)?;
        let record = self.row(row)?;
        let kind = self.editor.save(self.api.as_ref(), &record).await?;
        self.reload_after(kind).await
    }

    pub async fn submit_draft(&mut self) -> Result<Product, PageError> {
        let created = self.editor.submit_draft(self.api.as_ref()).await?;
        self.reload_after(MutationKind::Created).await?;
        Ok(created)
    }

    pub async fn remove_row(&mut self, row: usize) -> Result<(), PageError> {
        let record = self.row(row)?;
        let kind = self.editor.remove(self.api.as_ref(), &record).await?;
        self.reload_after(kind).await
    }

    pub fn dismiss_notification(&mut self) {
        self.list.dismiss_notification();
    }

    pub fn expire_notification(&mut self, now: Instant) -> bool {
        self.list.expire_notification(now)
    }

    async fn reload_after(&mut self, kind: MutationKind) -> Result<(), PageError> {
        let result = self
            .list
            .notify_and_reload(
                self.api.as_ref(),
                Notification::success(kind.success_message()),
            )
            .await;
        self.editor.sync_rows(self.list.products());
        result.map_err(|source| PageError::Reload { kind, source })
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
