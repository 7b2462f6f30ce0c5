use eframe::egui::{self, Context};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.update_fps_counter(ctx);

        egui::SidePanel::left("graph_settings")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.draw_controls(ui);
                });
            });

        if self.selected.is_some() {
            egui::SidePanel::right("node_details")
                .resizable(true)
                .default_width(320.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        self.draw_details(ui);
                    });
                });
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} nodes / {} edges",
                    self.sim.nodes().len(),
                    self.sim.edges().len()
                ));
                ui.separator();
                ui.label(self.fps_display_text());
                if let Some(node) = self.hovered.and_then(|index| self.content.get(index)) {
                    ui.separator();
                    ui.label(&node.title);
                }
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_graph(ui);
            });
    }

    fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 120;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    fn fps_display_text(&self) -> String {
        if self.fps_samples.is_empty() {
            return String::new();
        }
        let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        format!("FPS {:.0} (avg {:.1})", self.fps_current, avg)
    }
}
