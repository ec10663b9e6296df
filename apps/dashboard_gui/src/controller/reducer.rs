//! Page state owned by the UI thread and the transitions backend events drive.

use std::time::Duration;

use chrono::{DateTime, Local};
use client_core::{
    EditorError, ListController, MutationKind, Notification, PendingAction, RowEditor,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{ListResult, UiEvent};

pub struct DashboardState {
    pub list: ListController,
    pub editor: RowEditor,
    pub status: String,
    pub last_loaded: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn new(notification_timeout: Duration) -> Self {
        Self {
            list: ListController::new(notification_timeout),
            editor: RowEditor::new(),
            status: String::new(),
            last_loaded: None,
        }
    }

    pub fn request_load(&mut self) -> BackendCommand {
        self.list.begin_load();
        BackendCommand::LoadProducts
    }

    pub fn request_save(&mut self) -> Result<BackendCommand, EditorError> {
        let row = self.editor.editing_row().ok_or(EditorError::NotEditing)?;
        let record = self.row(row)?;
        let product = self.editor.prepare_save(&record)?;
        Ok(BackendCommand::UpdateProduct { product })
    }

    pub fn request_create(&mut self) -> Result<BackendCommand, EditorError> {
        let draft = self.editor.prepare_create()?;
        Ok(BackendCommand::CreateProduct { draft })
    }

    pub fn request_delete(&mut self, row: usize) -> Result<BackendCommand, EditorError> {
        let record = self.row(row)?;
        let id = self.editor.prepare_remove(&record)?;
        Ok(BackendCommand::DeleteProduct { id })
    }

    pub fn begin_edit(&mut self, row: usize) -> Result<(), EditorError> {
        let record = self.row(row)?;
        self.editor.begin_edit(row, &record);
        Ok(())
    }

    /// Rolls back the bookkeeping of a command that could not be queued.
    pub fn command_not_sent(&mut self, cmd: &BackendCommand) {
        match cmd {
            BackendCommand::LoadProducts => self.list.abandon_load(),
            BackendCommand::CreateProduct { .. } => self.editor.abandon(&PendingAction::Create),
            BackendCommand::UpdateProduct { product } => self
                .editor
                .abandon(&PendingAction::Save(product.id.clone())),
            BackendCommand::DeleteProduct { id } => {
                self.editor.abandon(&PendingAction::Delete(id.clone()))
            }
        }
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::BackendUnavailable(message) => {
                self.status = message;
                self.list.abandon_load();
            }
            UiEvent::ProductsLoaded(result) => {
                if self.list.finish_load(result).is_ok() {
                    self.last_loaded = Some(Local::now());
                }
                self.editor.sync_rows(self.list.products());
            }
            UiEvent::ProductCreated { result, reload } => {
                if self.editor.finish_create(result).is_ok() {
                    self.reconcile(MutationKind::Created, reload);
                }
            }
            UiEvent::ProductUpdated { id, result, reload } => {
                if self.editor.finish_save(&id, result).is_ok() {
                    self.reconcile(MutationKind::Updated, reload);
                }
            }
            UiEvent::ProductDeleted { id, result, reload } => {
                if self.editor.finish_remove(&id, result).is_ok() {
                    self.reconcile(MutationKind::Deleted, reload);
                }
            }
        }
    }

    fn reconcile(&mut self, kind: MutationKind, reload: Option<ListResult>) {
        let Some(reload) = reload else {
            return;
        };
        self.list.begin_reload();
        if self
            .list
            .finish_reload(Notification::success(kind.success_message()), reload)
            .is_ok()
        {
            self.last_loaded = Some(Local::now());
        }
        self.editor.sync_rows(self.list.products());
    }

    fn row(&self, row: usize) -> Result<shared::domain::Product, EditorError> {
        let products = self.list.products();
        products
            .get(row)
            .cloned()
            .ok_or(EditorError::RowOutOfRange {
                row,
                len: products.len(),
            })
    }
}
