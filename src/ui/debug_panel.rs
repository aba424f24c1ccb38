use super::morph_panel::{MorphPanel, MORPH_MAX, MORPH_MIN, MORPH_STEP};
use super::UiState;
use crate::assets::AssetId;
use crate::rendering::PerformanceMetrics;
use eframe::egui::{self, Color32, ComboBox, Context, Slider};

/// Draws the controls window. Returns the asset the user just picked, if any.
pub fn show_debug_panel(
    ctx: &Context,
    state: &mut UiState,
    morphs: &MorphPanel,
    metrics: &PerformanceMetrics,
) -> Option<AssetId> {
    let mut picked = None;

    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .resizable(false)
        .show(ctx, |ui| {
            let before = state.selected_asset;
            ComboBox::from_label("asset")
                .selected_text(state.selected_asset.display_name())
                .show_ui(ui, |ui| {
                    for asset in AssetId::ALL {
                        ui.selectable_value(&mut state.selected_asset, asset, asset.display_name());
                    }
                });
            if state.selected_asset != before {
                picked = Some(state.selected_asset);
            }

            if morphs.is_visible() {
                egui::CollapsingHeader::new("Morphs")
                    .default_open(true)
                    .show(ui, |ui| show_morphs(ui, morphs));
            }
        });

    show_fps(ctx, metrics);
    show_error_toast(ctx, state);
    picked
}

fn show_morphs(ui: &mut egui::Ui, morphs: &MorphPanel) {
    for folder in morphs.folders() {
        egui::CollapsingHeader::new(folder.title.as_str())
            .id_salt(&folder.title)
            .default_open(true)
            .show(ui, |ui| {
                for control in &folder.controls {
                    let mut value = control.value();
                    let response = ui.add(
                        Slider::new(&mut value, MORPH_MIN..=MORPH_MAX)
                            .step_by(MORPH_STEP)
                            .text(control.label.as_str()),
                    );
                    if response.changed() {
                        control.set_value(value);
                    }
                }
            });
    }
}

fn show_fps(ctx: &Context, metrics: &PerformanceMetrics) {
    egui::Area::new(egui::Id::new("fps"))
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{:.0} FPS ({:.1}-{:.1} ms)",
                    metrics.avg_fps, metrics.min_frame_time_ms, metrics.max_frame_time_ms
                ))
                .monospace()
                .color(Color32::WHITE),
            );
        });
}

fn show_error_toast(ctx: &Context, state: &mut UiState) {
    let Some(message) = state.error_message.clone() else {
        return;
    };
    egui::Window::new("Load failed")
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -16.0])
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.colored_label(Color32::LIGHT_RED, message.as_str());
            if ui.button("Dismiss").clicked() {
                state.error_message = None;
            }
        });
}
