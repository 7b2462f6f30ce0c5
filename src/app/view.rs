use std::time::Instant;

use eframe::egui::{
    self, Align2, Color32, CornerRadius, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, pos2,
    vec2,
};

use crate::content::NodeKind;

use super::ViewModel;

/// Base sprite width in world units; height follows a 16:9 card.
const SPRITE_WORLD_WIDTH: f32 = 24.0;
const SPRITE_ASPECT: f32 = 9.0 / 16.0;
const HOVER_EMPHASIS: f32 = 0.25;

pub(in crate::app) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Article => Color32::from_rgb(0x00, 0x57, 0xff),
        NodeKind::Video => Color32::from_rgb(0xfd, 0x00, 0xfd),
        NodeKind::SpecialProject => Color32::from_rgb(0xff, 0x4b, 0x00),
    }
}

struct ProjectedNode {
    index: usize,
    rect: Rect,
    screen: Pos2,
    scale: f32,
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let now = Instant::now();
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 0.0, Color32::from_rgb(12, 12, 16));

        let simulating = self.sim.step(now);

        // Manual input switches the camera out of idle orbit.
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                self.camera.orbit_drag(delta);
            }
        }
        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll > f32::EPSILON {
                self.camera.zoom_in();
            } else if scroll < -f32::EPSILON {
                self.camera.zoom_out();
            }
        }

        let dt = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let animating = self.camera.update(now, dt);

        // Edges first, under the sprites.
        let visual = *self.sim.visual();
        let edge_alpha = (visual.opacity.clamp(0.0, 1.0) * 255.0) as u8;
        if edge_alpha > 0 {
            let edge_color = Color32::from_rgba_unmultiplied(
                visual.color.r(),
                visual.color.g(),
                visual.color.b(),
                edge_alpha,
            );
            for edge in self.sim.edges() {
                let (Some(source), Some(target)) = (
                    self.sim.node_position(edge.source),
                    self.sim.node_position(edge.target),
                ) else {
                    continue;
                };
                let (Some((start, start_scale)), Some((end, end_scale))) = (
                    self.camera.project(rect, source),
                    self.camera.project(rect, target),
                ) else {
                    continue;
                };

                let width =
                    (visual.width * (start_scale + end_scale) * 0.5).clamp(0.2, 6.0);
                painter.line_segment([start, end], Stroke::new(width, edge_color));
            }
        }

        let mut projected = self.project_nodes(rect);
        // Far-to-near painter's order; nearer sprites have a larger scale.
        projected.sort_by(|a, b| a.scale.total_cmp(&b.scale));

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered_index = pointer.and_then(|pointer| {
            projected
                .iter()
                .filter(|node| node.rect.contains(pointer))
                .max_by(|a, b| a.scale.total_cmp(&b.scale))
                .map(|node| node.index)
        });
        // Hover emphasis reverts implicitly: at most one node animates in,
        // and whichever was hovered before animates back out.
        self.hovered = hovered_index;

        if hovered_index.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        self.images.poll(ui.ctx());

        let mut emphasis_animating = false;
        for node in &projected {
            let content = &self.content[node.index];
            let color = kind_color(content.kind);

            let hover_mix = ui.ctx().animate_bool(
                ui.make_persistent_id(("node-hover", content.id.as_str())),
                hovered_index == Some(node.index),
            );
            if hover_mix > 0.0 && hover_mix < 1.0 {
                emphasis_animating = true;
            }

            let grown = node.rect.scale_from_center(1.0 + (HOVER_EMPHASIS * hover_mix));
            let rounding = CornerRadius::same((grown.width() * 0.06).clamp(1.0, 12.0) as u8);

            let texture = content
                .image_url
                .as_deref()
                .and_then(|url| self.images.texture(url));
            match texture {
                Some(texture) => {
                    painter.image(
                        texture.id(),
                        grown,
                        Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
                None => {
                    // Placeholder card while loading or after a failed fetch.
                    painter.rect_filled(grown, rounding, color);
                    if let Some(url) = content.image_url.as_deref() {
                        self.images.request(url);
                    }
                }
            }

            let is_selected = self.selected == Some(node.index);
            if is_selected || hover_mix > 0.0 {
                let stroke_alpha = if is_selected {
                    255
                } else {
                    (hover_mix * 220.0) as u8
                };
                painter.rect_stroke(
                    grown,
                    rounding,
                    Stroke::new(
                        1.5,
                        Color32::from_rgba_unmultiplied(255, 255, 255, stroke_alpha),
                    ),
                    StrokeKind::Outside,
                );
            }
        }

        // Tooltip label tracks the hovered node's projected position.
        if let Some(index) = hovered_index
            && let Some(node) = projected.iter().find(|node| node.index == index)
        {
            let content = &self.content[index];
            let label_pos = node.screen - vec2(0.0, node.rect.height() * 0.5 + 10.0);
            let galley = painter.layout_no_wrap(
                content.title.to_uppercase(),
                FontId::proportional(14.0),
                Color32::WHITE,
            );
            let label_rect = Align2::CENTER_BOTTOM
                .anchor_size(label_pos, galley.size() + vec2(12.0, 6.0));
            painter.rect_filled(label_rect, 4.0, kind_color(content.kind));
            painter.galley(
                label_rect.min + vec2(6.0, 3.0),
                galley,
                Color32::WHITE,
            );
        }

        if response.clicked() {
            match hovered_index {
                Some(index) => self.set_selected(Some(index), now),
                // Empty-space click clears the selection signal.
                None => self.selected = None,
            }
        }

        if simulating || animating || emphasis_animating || self.images.has_pending() {
            ui.ctx().request_repaint();
        }
    }

    fn project_nodes(&self, rect: Rect) -> Vec<ProjectedNode> {
        self.sim
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let (screen, scale) = self.camera.project(rect, node.pos)?;
                let width = SPRITE_WORLD_WIDTH * scale;
                let size = vec2(width, width * SPRITE_ASPECT);
                let card = Rect::from_center_size(screen, size);
                if card.intersects(rect) {
                    Some(ProjectedNode {
                        index,
                        rect: card,
                        screen,
                        scale,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}
