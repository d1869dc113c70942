//! Reusable UI components
//!
//! Small widgets shared by the panels in `app::views`.

use crate::app::controller::{Banner, Tone};
use crate::form::{FieldKind, FormField};
use crate::theme;
use eframe::egui;

/// Card heading: icon plus uppercase caption
pub fn section_title(ui: &mut egui::Ui, icon: &str, title: &str) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(icon).size(theme::FONT_HEADING).color(theme::ACCENT));
        ui.label(
            egui::RichText::new(title.to_uppercase())
                .size(theme::FONT_SECTION)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(theme::SPACING_MD);
}

/// Success or error message strip
pub fn banner(ui: &mut egui::Ui, banner: &Banner) {
    let (icon, color) = match banner.tone {
        Tone::Success => (egui_phosphor::regular::CHECK_CIRCLE, theme::STATUS_SUCCESS),
        Tone::Error => (egui_phosphor::regular::WARNING_CIRCLE, theme::STATUS_ERROR),
    };
    ui.add_space(theme::SPACING_MD);
    theme::banner_frame(color).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal_wrapped(|ui| {
            ui.label(egui::RichText::new(icon).color(color));
            ui.label(egui::RichText::new(&banner.text).color(theme::TEXT_SECONDARY));
        });
    });
}

/// Label/value pair for the status grid
pub fn info_row(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(egui::RichText::new(label).color(theme::TEXT_MUTED));
    ui.label(egui::RichText::new(value).color(theme::TEXT_PRIMARY).size(theme::FONT_BODY));
    ui.end_row();
}

/// Input widget for one prediction field, bound to `value`
pub fn feature_input(ui: &mut egui::Ui, field: &FormField, value: &mut String, width: f32) -> egui::Response {
    match &field.kind {
        FieldKind::Text { placeholder } => ui.add(
            egui::TextEdit::singleline(value)
                .id_salt(&field.id)
                .hint_text(placeholder.as_str())
                .desired_width(width),
        ),
        FieldKind::Select { options } => {
            let selected_text = options
                .iter()
                .find(|o| o.value == *value)
                .map(|o| o.label.clone())
                .unwrap_or_default();
            let placeholder_shown = value.is_empty();
            egui::ComboBox::from_id_salt(&field.id)
                .selected_text(egui::RichText::new(selected_text).color(if placeholder_shown {
                    theme::TEXT_DIM
                } else {
                    theme::TEXT_PRIMARY
                }))
                .width(width)
                .show_ui(ui, |ui| {
                    for option in options {
                        if option.disabled {
                            ui.add_enabled(
                                false,
                                egui::SelectableLabel::new(*value == option.value, option.label.as_str()),
                            );
                        } else {
                            ui.selectable_value(value, option.value.clone(), option.label.as_str());
                        }
                    }
                })
                .response
        }
    }
}
