use eframe::egui::{self, Color32, RichText, Ui, vec2};

use crate::util::{format_author_name, split_tags};

use super::super::view::kind_color;
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(index) = self.selected else {
            return;
        };
        let Some(node) = self.content.get(index) else {
            self.selected = None;
            return;
        };

        let node = node.clone();
        let resolved_link = node.resolved_link(self.base_url.as_deref());

        ui.horizontal(|ui| {
            ui.heading("Details");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").clicked() {
                    self.selected = None;
                }
            });
        });
        ui.add_space(6.0);

        ui.horizontal_wrapped(|ui| {
            badge(ui, node.kind.label(), kind_color(node.kind));
            if let Some(tags) = node.tags.as_deref() {
                for tag in split_tags(tags) {
                    badge(ui, &tag.to_uppercase(), Color32::from_rgb(40, 40, 44));
                }
            }
        });
        ui.add_space(8.0);

        if let Some(url) = node.image_url.as_deref() {
            self.images.request(url);
            if let Some(texture) = self.images.texture(url) {
                let width = ui.available_width();
                ui.add(
                    egui::Image::new(texture)
                        .fit_to_exact_size(vec2(width, width * 9.0 / 16.0))
                        .corner_radius(6.0),
                );
                ui.add_space(8.0);
            }
        }

        ui.label(RichText::new(&node.title).strong().size(18.0));

        if let Some(descriptor) = node.descriptor.as_deref() {
            ui.small(RichText::new(descriptor).color(Color32::GRAY));
        }

        if let Some(author) = node.author.as_deref() {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if let Some(portrait) = node.author_image.as_deref() {
                    self.images.request(portrait);
                    if let Some(texture) = self.images.texture(portrait) {
                        ui.add(
                            egui::Image::new(texture)
                                .fit_to_exact_size(vec2(22.0, 22.0))
                                .corner_radius(11.0),
                        );
                    }
                }
                ui.label(format!("by {}", format_author_name(author)));
            });
        }

        if let Some(description) = node.description.as_deref() {
            ui.add_space(6.0);
            ui.label(description);
        }

        if let Some(link) = resolved_link {
            ui.add_space(10.0);
            if ui.button("Open").clicked() {
                ui.ctx().open_url(egui::OpenUrl::new_tab(link));
            }
        }
    }
}

fn badge(ui: &mut Ui, text: &str, fill: Color32) {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(3.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(Color32::WHITE).size(11.0));
        });
}
