use std::{collections::HashMap, time::Duration, time::Instant};

use client_core::{ListView, PendingAction, Severity};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Product, ProductField};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::{dispatch_backend_command, submit};
use crate::controller::reducer::DashboardState;

const IDLE_REPAINT: Duration = Duration::from_millis(100);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(46, 160, 67);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(218, 54, 51);

/// Things the user asked for while a frame was drawn. Applied after
/// rendering so widgets only ever borrow the state immutably.
#[derive(Debug, Clone, PartialEq)]
enum UiAction {
    Reload,
    ToggleAddPanel,
    SetDraftField(ProductField, String),
    SubmitDraft,
    BeginEdit(usize),
    CancelEdit,
    SetField(ProductField, String),
    Save,
    Delete(usize),
    DismissNotification,
}

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    title: String,
    state: DashboardState,
    /// Raw text of the edited row's inputs. Kept separately from the edit
    /// buffer so a rejected keystroke does not wipe what the user typed.
    row_inputs: HashMap<ProductField, String>,
    draft_inputs: HashMap<ProductField, String>,
}

impl DashboardApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        title: String,
        notification_timeout: Duration,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            title,
            state: DashboardState::new(notification_timeout),
            row_inputs: HashMap::new(),
            draft_inputs: HashMap::new(),
        };
        let load = app.state.request_load();
        if let Err(cmd) = dispatch_backend_command(&app.cmd_tx, load, &mut app.state.status) {
            app.state.command_not_sent(&cmd);
        }
        app
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.state.apply(event);
        }
        if self.state.editor.editing_row().is_none() {
            self.row_inputs.clear();
        }
        if !self.state.editor.is_add_panel_open() {
            self.draft_inputs.clear();
        }
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::Reload => {
                let request = Ok(self.state.request_load());
                submit(&mut self.state, &self.cmd_tx, request);
            }
            UiAction::ToggleAddPanel => {
                if self.state.editor.toggle_add_panel() {
                    let draft = self.state.editor.draft();
                    self.draft_inputs = ProductField::ALL
                        .into_iter()
                        .map(|field| (field, draft.get(field).to_string()))
                        .collect();
                } else {
                    self.draft_inputs.clear();
                }
            }
            UiAction::SetDraftField(field, raw) => {
                if let Err(err) = self.state.editor.set_draft_field(field, &raw) {
                    self.state.status = err.to_string();
                }
                self.draft_inputs.insert(field, raw);
            }
            UiAction::SubmitDraft => {
                let request = self.state.request_create();
                submit(&mut self.state, &self.cmd_tx, request);
            }
            UiAction::BeginEdit(row) => match self.state.begin_edit(row) {
                Ok(()) => self.fill_row_inputs(row),
                Err(err) => self.state.status = err.to_string(),
            },
            UiAction::CancelEdit => {
                self.state.editor.cancel_edit();
                self.row_inputs.clear();
            }
            UiAction::SetField(field, raw) => {
                if let Err(err) = self.state.editor.set_field(field, &raw) {
                    self.state.status = err.to_string();
                }
                self.row_inputs.insert(field, raw);
            }
            UiAction::Save => {
                let request = self.state.request_save();
                submit(&mut self.state, &self.cmd_tx, request);
            }
            UiAction::Delete(row) => {
                let request = self.state.request_delete(row);
                submit(&mut self.state, &self.cmd_tx, request);
            }
            UiAction::DismissNotification => self.state.list.dismiss_notification(),
        }
    }

    fn fill_row_inputs(&mut self, row: usize) {
        let Some(product) = self.state.list.products().get(row) else {
            return;
        };
        let editor = &self.state.editor;
        self.row_inputs = ProductField::ALL
            .into_iter()
            .map(|field| (field, editor.display_value(row, product, field).to_string()))
            .collect();
    }

    fn show_top_bar(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.title.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let idle = !self.state.list.is_loading();
                    if ui.add_enabled(idle, egui::Button::new("⟳ Refresh")).clicked() {
                        actions.push(UiAction::Reload);
                    }
                    if let Some(at) = self.state.last_loaded {
                        ui.label(
                            egui::RichText::new(format!("Updated {}", at.format("%H:%M:%S")))
                                .weak(),
                        );
                    }
                });
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some(notification) = self.state.list.notification() {
                let color = match notification.severity {
                    Severity::Success => SUCCESS_COLOR,
                    Severity::Error => ERROR_COLOR,
                };
                ui.horizontal(|ui| {
                    ui.colored_label(color, notification.message.as_str());
                    if ui.small_button("✕").clicked() {
                        actions.push(UiAction::DismissNotification);
                    }
                });
            }
            if !self.state.status.is_empty() {
                ui.label(egui::RichText::new(&self.state.status).weak());
            }
        });
    }

    fn show_add_panel(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let editor = &self.state.editor;
        let open = editor.is_add_panel_open();
        if ui
            .button(if open { "Cancel" } else { "Add Product" })
            .clicked()
        {
            actions.push(UiAction::ToggleAddPanel);
        }
        if !open {
            return;
        }

        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("add_product_form")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    for field in ProductField::ALL {
                        ui.label(field.label());
                        let mut text = self.draft_inputs.get(&field).cloned().unwrap_or_default();
                        if ui.text_edit_singleline(&mut text).changed() {
                            actions.push(UiAction::SetDraftField(field, text));
                        }
                        ui.end_row();
                    }
                });
            let busy = editor.is_in_flight(&PendingAction::Create);
            if ui.add_enabled(!busy, egui::Button::new("Submit")).clicked() {
                actions.push(UiAction::SubmitDraft);
            }
        });
    }

    fn show_table(&self, ui: &mut egui::Ui, products: &[Product], actions: &mut Vec<UiAction>) {
        let editor = &self.state.editor;
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("product_table")
                .striped(true)
                .num_columns(ProductField::ALL.len() + 2)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("No");
                    for field in ProductField::ALL {
                        ui.strong(field.label());
                    }
                    ui.strong("Actions");
                    ui.end_row();

                    for (row, product) in products.iter().enumerate() {
                        ui.label((row + 1).to_string());
                        let editing = editor.is_editing(row);
                        for field in ProductField::ALL {
                            if editing {
                                let mut text = self.row_inputs.get(&field).cloned().unwrap_or_else(
                                    || editor.display_value(row, product, field).to_string(),
                                );
                                let input =
                                    egui::TextEdit::singleline(&mut text).desired_width(110.0);
                                if ui.add(input).changed() {
                                    actions.push(UiAction::SetField(field, text));
                                }
                            } else {
                                ui.label(product.get(field).to_string());
                            }
                        }

                        ui.horizontal(|ui| {
                            if editing {
                                let saving =
                                    editor.is_in_flight(&PendingAction::Save(product.id.clone()));
                                if ui.add_enabled(!saving, egui::Button::new("Save")).clicked() {
                                    actions.push(UiAction::Save);
                                }
                                if ui.button("Cancel").clicked() {
                                    actions.push(UiAction::CancelEdit);
                                }
                            } else if ui.button("Edit").clicked() {
                                actions.push(UiAction::BeginEdit(row));
                            }
                            let deleting =
                                editor.is_in_flight(&PendingAction::Delete(product.id.clone()));
                            if ui.add_enabled(!deleting, egui::Button::new("Delete")).clicked() {
                                actions.push(UiAction::Delete(row));
                            }
                        });
                        ui.end_row();
                    }
                });
        });
    }

    fn show_content(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_add_panel(ui, actions);
            ui.separator();
            match self.state.list.view() {
                ListView::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading...");
                    });
                }
                ListView::Failed(message) => {
                    ui.colored_label(ERROR_COLOR, message);
                }
                ListView::Table(products) => self.show_table(ui, products, actions),
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let now = Instant::now();
        self.state.list.expire_notification(now);

        let mut actions = Vec::new();
        self.show_top_bar(ctx, &mut actions);
        self.show_status_bar(ctx, &mut actions);
        self.show_content(ctx, &mut actions);
        for action in actions {
            self.apply_action(action);
        }

        let wait = self
            .state
            .list
            .notification_remaining(now)
            .map_or(IDLE_REPAINT, |remaining| remaining.min(IDLE_REPAINT));
        ctx.request_repaint_after(wait);
    }
}
