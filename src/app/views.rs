//! Panel rendering (header, train, status, predict, settings)

use super::controller::{Banner, ModelState, PredictionPanel, PredictionView};
use super::App;
use crate::constants::{APP_NAME, BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
use crate::theme;
use crate::ui::components::{banner, feature_input, info_row, section_title};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular as icons;

impl App {
    pub(crate) fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .exact_height(theme::HEADER_HEIGHT)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                    .inner_margin(egui::Margin::symmetric(theme::SPACING_XL as i8, 0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(egui::RichText::new(icons::BRAIN).size(theme::FONT_TITLE).color(theme::ACCENT));
                    ui.label(
                        egui::RichText::new(APP_NAME.to_uppercase())
                            .size(theme::FONT_TITLE)
                            .color(theme::TEXT_PRIMARY)
                            .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add(theme::button(icons::GEAR))
                            .on_hover_text("Settings")
                            .clicked()
                        {
                            self.backend_url_input = self.client.base_url().to_string();
                            self.show_settings = true;
                        }
                        if ui
                            .add(theme::button(format!("{}  API docs", icons::BOOK_OPEN)))
                            .on_hover_text("Open the backend's interactive docs in the browser")
                            .clicked()
                        {
                            self.open_docs();
                        }
                        ui.label(
                            egui::RichText::new(self.client.base_url())
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
            });
    }

    pub(crate) fn render_body(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BG_BASE).inner_margin(theme::SPACING_XL))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.set_max_width(theme::CONTENT_MAX_WIDTH);
                        ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                            self.render_train_card(ui);
                            ui.add_space(theme::SPACING_LG);
                            self.render_status_card(ui);
                            if self.controller.prediction_visible() {
                                ui.add_space(theme::SPACING_LG);
                                self.render_predict_card(ui);
                            }
                        });
                    });
                });
            });
    }

    fn render_train_card(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            section_title(ui, icons::UPLOAD_SIMPLE, "Train model");

            ui.horizontal(|ui| {
                if ui.add(theme::button(format!("{}  Choose CSV...", icons::FOLDER_OPEN))).clicked() {
                    self.pick_csv();
                }
                match self.controller.selected_csv.as_ref().and_then(|p| p.file_name()) {
                    Some(name) => {
                        ui.label(egui::RichText::new(icons::FILE_CSV).color(theme::ACCENT));
                        ui.label(egui::RichText::new(name.to_string_lossy()).color(theme::TEXT_SECONDARY));
                        if ui
                            .add(egui::Button::new(icons::X).frame(false))
                            .on_hover_text("Clear selection")
                            .clicked()
                        {
                            self.controller.select_csv(None);
                        }
                    }
                    None => {
                        ui.label(egui::RichText::new("No file selected").color(theme::TEXT_DIM));
                    }
                }
            });

            ui.add_space(theme::SPACING_MD);
            ui.horizontal(|ui| {
                let busy = self.controller.in_flight.training;
                if ui.add_enabled(!busy, theme::button_accent("Train model")).clicked() {
                    self.submit_training(ui.ctx());
                }
                if busy {
                    ui.add(egui::Spinner::new());
                    ui.label(egui::RichText::new("Training...").color(theme::TEXT_MUTED));
                }
            });

            if let Some(message) = &self.controller.upload_message {
                banner(ui, message);
            }
        });
    }

    fn render_status_card(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            section_title(ui, icons::INFO, "Model status");

            let summary = &self.controller.summary;
            egui::Grid::new("status_grid")
                .num_columns(2)
                .spacing([theme::SPACING_XL, theme::SPACING_SM])
                .show(ui, |ui| {
                    info_row(ui, "Status", &summary.status);
                    info_row(ui, "Accuracy", &summary.accuracy);
                    info_row(ui, "Target column", &summary.target_column);
                });

            if let Some(at) = summary.refreshed_at {
                ui.add_space(theme::SPACING_SM);
                ui.label(
                    egui::RichText::new(format!("Last refreshed {}", at.format("%H:%M:%S")))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                );
            }

            ui.add_space(theme::SPACING_MD);
            ui.horizontal(|ui| {
                let busy = self.controller.in_flight.status;
                if ui
                    .add_enabled(!busy, theme::button(format!("{}  Refresh status", icons::ARROWS_CLOCKWISE)))
                    .clicked()
                {
                    self.refresh_status(ui.ctx());
                }
                if busy {
                    ui.add(egui::Spinner::new());
                }
            });

            if let Some(error) = &self.controller.status_error {
                banner(ui, &Banner::error(error.as_str()));
            }
        });
    }

    fn render_predict_card(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            section_title(ui, icons::LIGHTNING, "Predict");

            let mut submit_on_enter = false;
            if let ModelState::Trained { form, .. } = &self.controller.model {
                let inputs = &mut self.controller.inputs;
                let input_width = (ui.available_width() - theme::FIELD_LABEL_WIDTH - theme::SPACING_XL).max(120.0);
                egui::Grid::new("feature_grid")
                    .num_columns(2)
                    .min_col_width(theme::FIELD_LABEL_WIDTH)
                    .spacing([theme::SPACING_XL, theme::SPACING_MD])
                    .show(ui, |ui| {
                        for field in form {
                            ui.label(egui::RichText::new(&field.name).color(theme::TEXT_SECONDARY));
                            if let Some(value) = inputs.get_mut(&field.id) {
                                let response = feature_input(ui, field, value, input_width);
                                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                    submit_on_enter = true;
                                }
                            }
                            ui.end_row();
                        }
                    });
            }

            ui.add_space(theme::SPACING_MD);
            ui.horizontal(|ui| {
                let busy = self.controller.in_flight.predicting;
                let clicked = ui.add_enabled(!busy, theme::button_accent("Predict")).clicked();
                if clicked || (submit_on_enter && !busy) {
                    self.submit_prediction(ui.ctx());
                }
                if ui.add_enabled(!busy, theme::button("Reset")).clicked() {
                    self.controller.reset_inputs();
                }
                if busy {
                    ui.add(egui::Spinner::new());
                }
            });

            match &self.controller.prediction {
                Some(PredictionPanel::Failed(text)) => {
                    banner(ui, &Banner::error(text.as_str()));
                }
                Some(PredictionPanel::Result(view)) => {
                    ui.add_space(theme::SPACING_MD);
                    render_prediction_result(ui, view);
                }
                None => {}
            }
        });
    }

    pub(crate) fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }
        let mut open = self.show_settings;
        let mut apply = false;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .fixed_size([theme::SETTINGS_WINDOW_WIDTH, 0.0])
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("BACKEND URL").size(theme::FONT_SECTION).color(theme::TEXT_DIM));
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.backend_url_input)
                        .hint_text(DEFAULT_BACKEND_URL)
                        .desired_width(f32::INFINITY),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    apply = true;
                }
                if std::env::var_os(BACKEND_URL_ENV).is_some() {
                    ui.label(
                        egui::RichText::new(format!("{} is set; it wins again on next launch.", BACKEND_URL_ENV))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                }
                ui.add_space(theme::SPACING_MD);
                ui.horizontal(|ui| {
                    if ui.add(theme::button_accent("Apply")).clicked() {
                        apply = true;
                    }
                    if ui.add(theme::button("Reset to default")).clicked() {
                        self.backend_url_input = DEFAULT_BACKEND_URL.to_string();
                    }
                });
            });
        if apply {
            self.apply_backend_url(ctx);
            open = false;
        }
        self.show_settings = open;
    }
}

fn render_prediction_result(ui: &mut egui::Ui, view: &PredictionView) {
    theme::section_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(view.heading())
                    .size(theme::FONT_HEADING)
                    .color(theme::STATUS_SUCCESS)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(egui::Button::new(icons::COPY).frame(false))
                    .on_hover_text("Copy result")
                    .clicked()
                {
                    let mut text = view.heading();
                    for line in view.lines() {
                        text.push('\n');
                        text.push_str(&line);
                    }
                    ui.ctx().copy_text(text);
                }
            });
        });
        ui.add_space(theme::SPACING_SM);
        ui.label(egui::RichText::new("Probability per class:").color(theme::TEXT_MUTED));

        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .column(Column::auto().at_least(80.0))
            .body(|mut body| {
                for row in &view.rows {
                    body.row(20.0, |mut table_row| {
                        let winner = row.label == view.label;
                        let color = if winner { theme::ACCENT } else { theme::TEXT_SECONDARY };
                        table_row.col(|ui| {
                            ui.label(egui::RichText::new(&row.label).color(color));
                        });
                        table_row.col(|ui| {
                            ui.label(egui::RichText::new(row.percent()).color(color));
                        });
                    });
                }
            });
    });
}
