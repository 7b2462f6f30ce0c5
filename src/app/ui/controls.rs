use std::time::Instant;

use eframe::egui::{self, Ui};

use super::super::settings::LinkCategory;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Settings");
        ui.add_space(6.0);

        // Widgets edit a local copy; any change hands the engine a
        // complete new snapshot, never a partial diff.
        let mut next = self.settings;
        let mut changed = false;

        for category in LinkCategory::ALL {
            ui.collapsing(category.label(), |ui| {
                let block = next.for_category_mut(category);
                changed |= ui.checkbox(&mut block.enabled, "Enabled").changed();
                ui.add_enabled_ui(block.enabled, |ui| {
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut block.strength, 0.0..=1.0)
                                .text("Strength")
                                .clamping(egui::SliderClamping::Always),
                        )
                        .changed();
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut block.distance, 5.0..=300.0)
                                .text("Distance")
                                .clamping(egui::SliderClamping::Always),
                        )
                        .changed();
                });
            });
        }

        ui.collapsing("Link appearance", |ui| {
            changed |= ui
                .add(
                    egui::Slider::new(&mut next.visual.width, 0.0..=5.0)
                        .text("Width")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut next.visual.opacity, 0.0..=1.0)
                        .text("Opacity")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            ui.horizontal(|ui| {
                ui.label("Color");
                changed |= ui
                    .color_edit_button_srgba(&mut next.visual.color)
                    .changed();
            });
        });

        ui.collapsing("Physics", |ui| {
            changed |= ui
                .add(
                    egui::Slider::new(&mut next.physics.repulsion.strength, -1000.0..=0.0)
                        .text("Repulsion")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("How strongly nodes push away from each other.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut next.physics.repulsion.max_distance, 10.0..=600.0)
                        .text("Repulsion range")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Distance beyond which repulsion no longer applies.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut next.physics.collision.radius, 0.0..=30.0)
                        .text("Collision radius")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut next.physics.collision.strength, 0.0..=1.0)
                        .text("Collision strength")
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            changed |= ui
                .checkbox(&mut next.physics.center_force, "Center gravity")
                .on_hover_text("Keeps the layout centered on the origin.")
                .changed();
        });

        if changed {
            self.apply_settings(next);
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Camera");
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Zoom in").clicked() {
                self.camera.zoom_in();
            }
            if ui.button("Zoom out").clicked() {
                self.camera.zoom_out();
            }
            if ui.button("Reset").clicked() {
                self.reset_view(Instant::now());
            }
        });
    }
}
