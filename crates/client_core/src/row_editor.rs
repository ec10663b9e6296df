//! Inline row editing and the "add product" draft panel.

use std::collections::HashSet;

use shared::domain::{FieldValue, Product, ProductDraft, ProductField, ProductId, ProductPatch};
use tracing::{error, info};

use crate::{
    error::{ApiRequestError, EditorError, PageError},
    list_controller::MutationKind,
    ProductApi,
};

/// Edit mode of the table. At most one row can be in `Editing`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState {
    #[default]
    Viewing,
    Editing {
        row: usize,
        id: ProductId,
        buffer: ProductPatch,
    },
}

/// A mutation that has been sent and not yet answered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingAction {
    Save(ProductId),
    Create,
    Delete(ProductId),
}

impl PendingAction {
    fn describe(&self) -> String {
        match self {
            PendingAction::Save(id) => format!("saving product {id}"),
            PendingAction::Create => "adding a product".to_string(),
            PendingAction::Delete(id) => format!("deleting product {id}"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RowEditor {
    edit: EditState,
    add_panel_open: bool,
    draft: ProductDraft,
    in_flight: HashSet<PendingAction>,
}

impl RowEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn editing_row(&self) -> Option<usize> {
        match &self.edit {
            EditState::Editing { row, .. } => Some(*row),
            EditState::Viewing => None,
        }
    }

    pub fn is_editing(&self, row: usize) -> bool {
        self.editing_row() == Some(row)
    }

    pub fn is_add_panel_open(&self) -> bool {
        self.add_panel_open
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn is_in_flight(&self, action: &PendingAction) -> bool {
        self.in_flight.contains(action)
    }

    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Starts editing `row`. Any other row being edited is dropped together
    /// with its unsaved buffer.
    pub fn begin_edit(&mut self, row: usize, product: &Product) {
        self.edit = EditState::Editing {
            row,
            id: product.id.clone(),
            buffer: ProductPatch::default(),
        };
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Viewing;
    }

    pub fn set_field(&mut self, field: ProductField, raw: &str) -> Result<(), EditorError> {
        let EditState::Editing { buffer, .. } = &mut self.edit else {
            return Err(EditorError::NotEditing);
        };
        buffer.set(field, FieldValue::coerce(field, raw)?)?;
        Ok(())
    }

    /// Value to show for `field` of `product` at `row`.
    pub fn display_value(&self, row: usize, product: &Product, field: ProductField) -> FieldValue {
        match &self.edit {
            EditState::Editing {
                row: editing,
                buffer,
                ..
            } if *editing == row => buffer.value_or(product, field),
            _ => product.get(field),
        }
    }

    /// Opens or closes the add panel and returns the new state. Closing
    /// discards the draft.
    pub fn toggle_add_panel(&mut self) -> bool {
        self.add_panel_open = !self.add_panel_open;
        if !self.add_panel_open {
            self.draft = ProductDraft::default();
        }
        self.add_panel_open
    }

    pub fn set_draft_field(&mut self, field: ProductField, raw: &str) -> Result<(), EditorError> {
        if !self.add_panel_open {
            return Err(EditorError::PanelClosed);
        }
        self.draft.set(field, FieldValue::coerce(field, raw)?)?;
        Ok(())
    }

    /// Re-resolves the editing row by id after the collection was replaced.
    /// Editing ends if the product is gone.
    pub fn sync_rows(&mut self, products: &[Product]) {
        let EditState::Editing { row, id, .. } = &mut self.edit else {
            return;
        };
        match products.iter().position(|product| &product.id == id) {
            Some(position) => *row = position,
            None => self.edit = EditState::Viewing,
        }
    }

    fn mark_in_flight(&mut self, action: PendingAction) -> Result<(), EditorError> {
        if self.in_flight.contains(&action) {
            return Err(EditorError::InFlight(action.describe()));
        }
        self.in_flight.insert(action);
        Ok(())
    }

    /// Clears an in-flight mark for a request that was never sent.
    pub fn abandon(&mut self, action: &PendingAction) {
        self.in_flight.remove(action);
    }

    /// Validates that `record` is the row being edited and returns the
    /// merged product to send.
    pub fn prepare_save(&mut self, record: &Product) -> Result<Product, EditorError> {
        let merged = match &self.edit {
            EditState::Editing { id, buffer, .. } if *id == record.id => buffer.apply(record),
            EditState::Editing { row, .. } => {
                return Err(EditorError::RowMismatch {
                    row: *row,
                    id: record.id.to_string(),
                })
            }
            EditState::Viewing => return Err(EditorError::NotEditing),
        };
        self.mark_in_flight(PendingAction::Save(record.id.clone()))?;
        Ok(merged)
    }

    /// On success the row returns to viewing; on failure it stays in edit
    /// mode with the buffer intact.
    pub fn finish_save(
        &mut self,
        id: &ProductId,
        result: Result<(), ApiRequestError>,
    ) -> Result<MutationKind, PageError> {
        self.in_flight.remove(&PendingAction::Save(id.clone()));
        match result {
            Ok(()) => {
                info!(product_id = %id, "updated product");
                if matches!(&self.edit, EditState::Editing { id: editing, .. } if editing == id) {
                    self.edit = EditState::Viewing;
                }
                Ok(MutationKind::Updated)
            }
            Err(source) => {
                error!(product_id = %id, "Failed to update product: {source}");
                Err(PageError::Mutation {
                    kind: MutationKind::Updated,
                    source,
                })
            }
        }
    }

    pub async fn save(
        &mut self,
        api: &dyn ProductApi,
        record: &Product,
    ) -> Result<MutationKind, PageError> {
        let merged = self.prepare_save(record)?;
        let result = api.update_item(&merged).await;
        self.finish_save(&merged.id, result)
    }

    pub fn prepare_create(&mut self) -> Result<ProductDraft, EditorError> {
        if !self.add_panel_open {
            return Err(EditorError::PanelClosed);
        }
        self.mark_in_flight(PendingAction::Create)?;
        Ok(self.draft.clone())
    }

    /// On success the draft is reset and the panel closed; on failure both
    /// are kept for another attempt.
    pub fn finish_create(
        &mut self,
        result: Result<Product, ApiRequestError>,
    ) -> Result<Product, PageError> {
        self.in_flight.remove(&PendingAction::Create);
        match result {
            Ok(created) => {
                info!(product_id = %created.id, "added product");
                self.draft = ProductDraft::default();
                self.add_panel_open = false;
                Ok(created)
            }
            Err(source) => {
                error!("Failed to add product: {source}");
                Err(PageError::Mutation {
                    kind: MutationKind::Created,
                    source,
                })
            }
        }
    }

    pub async fn submit_draft(&mut self, api: &dyn ProductApi) -> Result<Product, PageError> {
        let draft = self.prepare_create()?;
        let result = api.create_item(&draft).await;
        self.finish_create(result)
    }

    pub fn prepare_remove(&mut self, record: &Product) -> Result<ProductId, EditorError> {
        self.mark_in_flight(PendingAction::Delete(record.id.clone()))?;
        Ok(record.id.clone())
    }

    pub fn finish_remove(
        &mut self,
        id: &ProductId,
        result: Result<(), ApiRequestError>,
    ) -> Result<MutationKind, PageError> {
        self.in_flight.remove(&PendingAction::Delete(id.clone()));
        match result {
            Ok(()) => {
                info!(product_id = %id, "deleted product");
                Ok(MutationKind::Deleted)
            }
            Err(source) => {
                error!(product_id = %id, "Failed to delete product: {source}");
                Err(PageError::Mutation {
                    kind: MutationKind::Deleted,
                    source,
                })
            }
        }
    }

    pub async fn remove(
        &mut self,
        api: &dyn ProductApi,
        record: &Product,
    ) -> Result<MutationKind, PageError> {
        let id = self.prepare_remove(record)?;
        let result = api.delete_item(&id).await;
        self.finish_remove(&id, result)
    }
}

#[cfg(test)]
#[path = "tests/row_editor_tests.rs"]
mod tests;
