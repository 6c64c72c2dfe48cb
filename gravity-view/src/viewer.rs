//! Interactive gravity playground window built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Controller`] and
//! implements [`eframe::App`] to forward input to it and draw its
//! [`gravity_core::controller::RenderView`] every frame.

use eframe::App;
use glam::Vec2;
use gravity_core::{
    config::Config,
    controller::{BodyField, Controller, Editor, FrameOutcome, Phase},
    types::{BodyId, Rgb},
};

/// Main application state for the playground window.
///
/// The per-frame update is:
/// 1. Build the control bar, status bar and any open editor window.
/// 2. Sync the canvas size and forward clicks on the canvas.
/// 3. Fire the pending simulation frame, if one is scheduled.
/// 4. Paint trails and bodies.
pub struct Viewer {
    controller: Controller,
    /// Canvas rect from the last frame; editor windows are laid out before
    /// the central panel, so they anchor to this.
    canvas_rect: Option<egui::Rect>,
}

impl Viewer {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        Ok(Self {
            controller: Controller::new(cfg)?,
            canvas_rect: None,
        })
    }

    /// Maps canvas pixels to egui screen space.
    ///
    /// The canvas origin sits at the top-left corner of `rect` and y grows
    /// downwards, matching egui, so this is a plain offset.
    fn canvas_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
    }

    fn screen_to_canvas(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    /// Screen point just below a body, where its editor window is pinned.
    fn editor_anchor(pos: Vec2, radius: f32, rect: egui::Rect) -> egui::Pos2 {
        Self::canvas_to_screen(pos, rect) + egui::vec2(0.0, 2.0 * radius)
    }

    /// The "click to start" hint shows only on an empty, idle canvas.
    fn show_idle_overlay(&self) -> bool {
        self.controller.phase() == Phase::Idle
    }

    fn color(rgb: Rgb) -> egui::Color32 {
        egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
    }

    fn status_text(&self) -> String {
        let n = self.controller.bodies().len();
        if self.controller.is_running() {
            format!("Simulation running... ({n} bodies)")
        } else if n > 1 {
            format!("Click to add bodies. Current count: {n}. Ready to start.")
        } else {
            format!("Click to add bodies. Current count: {n}.")
        }
    }

    /// Forwards a click at screen position `p` inside the canvas `rect`.
    fn handle_canvas_click(&mut self, p: egui::Pos2, rect: egui::Rect) {
        let outcome = self.controller.click(Self::screen_to_canvas(p, rect));
        log::trace!("canvas click at {p:?}: {outcome:?}");
    }

    /// Fires the pending simulation frame, if any.
    ///
    /// ### Returns
    /// `true` if the run loop is still active and wants another repaint.
    fn drive_frame(&mut self) -> bool {
        let Some(token) = self.controller.pending_frame() else {
            return false;
        };
        matches!(
            self.controller.on_frame(token),
            FrameOutcome::Stepped { .. }
        )
    }

    /// Builds the top panel (trail and speed controls, run actions).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut show_trails = self.controller.params().show_trails;
                if ui.checkbox(&mut show_trails, "Trails").changed() {
                    self.controller.set_show_trails(show_trails);
                }

                let cfg = self.controller.config();
                let trail_range = cfg.min_trail_length..=cfg.max_trail_length;
                let speed_range = cfg.speed.as_inclusive();

                let mut trail_length = self.controller.params().trail_length;
                if ui
                    .add_enabled(
                        show_trails,
                        egui::Slider::new(&mut trail_length, trail_range).text("Trail length"),
                    )
                    .changed()
                {
                    self.controller.set_trail_length(trail_length);
                }

                let mut speed = self.controller.params().speed;
                if ui
                    .add(
                        egui::Slider::new(&mut speed, speed_range)
                            .step_by(0.1)
                            .fixed_decimals(1)
                            .suffix("x")
                            .text("Speed"),
                    )
                    .changed()
                {
                    self.controller.set_speed(speed);
                }
            });

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(self.controller.can_start(), egui::Button::new("▶ Start"))
                    .clicked()
                {
                    self.controller.start();
                }

                if ui
                    .add_enabled(self.controller.can_restart(), egui::Button::new("⟲ Restart"))
                    .clicked()
                {
                    self.controller.restart();
                }

                if ui.button("Clear").clicked() {
                    self.controller.clear();
                }

                ui.separator();
                if ui
                    .add_enabled(
                        self.controller.can_open_bulk_editor(),
                        egui::Button::new("Edit all bodies"),
                    )
                    .clicked()
                {
                    self.controller.open_bulk_editor();
                }
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_text());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let canvas = self.controller.params().canvas;
                    ui.label(format!("canvas = {:.0}×{:.0}", canvas.width, canvas.height));
                });
            });
        });
    }

    /// Window for the body selected by clicking it, pinned just below
    /// the body once the canvas has been laid out.
    fn ui_single_editor(&mut self, ctx: &egui::Context) {
        let Editor::Single(ed) = self.controller.editor() else {
            return;
        };
        let cfg = self.controller.config();
        let mass_range = cfg.mass_edit.as_inclusive();
        let vel_range = cfg.velocity_edit.as_inclusive();
        let anchor = self
            .canvas_rect
            .map(|rect| Self::editor_anchor(ed.pos, cfg.body_radius, rect));

        let mut open = true;
        let mut done = false;
        let mut edits: Vec<(BodyField, f32)> = Vec::new();

        let mut window = egui::Window::new(format!("Edit {}", ed.id))
            .id(egui::Id::new("single_editor"))
            .open(&mut open)
            .resizable(false)
            .collapsible(false);
        if let Some(anchor) = anchor {
            window = window.pivot(egui::Align2::CENTER_TOP).fixed_pos(anchor);
        }

        window.show(ctx, |ui| {
            ui.label(format!("Position: ({:.1}, {:.1})", ed.pos.x, ed.pos.y));

            let mut mass = ed.mass;
            if ui
                .add(egui::Slider::new(&mut mass, mass_range).text("Mass"))
                .changed()
            {
                edits.push((BodyField::Mass, mass));
            }

            let mut vx = ed.vel.x;
            if ui
                .add(egui::Slider::new(&mut vx, vel_range.clone()).text("vx"))
                .changed()
            {
                edits.push((BodyField::Vx, vx));
            }

            let mut vy = ed.vel.y;
            if ui
                .add(egui::Slider::new(&mut vy, vel_range).text("vy"))
                .changed()
            {
                edits.push((BodyField::Vy, vy));
            }

            if ui.button("Done").clicked() {
                done = true;
            }
        });

        for (field, value) in edits {
            self.controller.edit(ed.id, field, value);
        }
        if !open || done {
            self.controller.close_editors();
        }
    }

    /// Window listing every body with its mass and velocity.
    fn ui_bulk_editor(&mut self, ctx: &egui::Context) {
        if self.controller.editor() != Editor::Bulk {
            return;
        }
        let cfg = self.controller.config();
        let mass_range = cfg.mass_edit.as_inclusive();
        let vel_range = cfg.velocity_edit.as_inclusive();

        let rows: Vec<(BodyId, Rgb, f32, Vec2)> = self
            .controller
            .bodies()
            .iter()
            .map(|b| (b.id, b.color, b.mass, b.vel))
            .collect();

        let mut open = true;
        let mut edits: Vec<(BodyId, BodyField, f32)> = Vec::new();

        egui::Window::new("Edit all bodies")
            .id(egui::Id::new("bulk_editor"))
            .open(&mut open)
            .default_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    egui::Grid::new("bulk_grid").striped(true).show(ui, |ui| {
                        ui.label("body");
                        ui.label("mass");
                        ui.label("vx");
                        ui.label("vy");
                        ui.end_row();

                        for (id, color, mut mass, mut vel) in rows {
                            ui.colored_label(Self::color(color), id.to_string());
                            if ui
                                .add(egui::DragValue::new(&mut mass).range(mass_range.clone()))
                                .changed()
                            {
                                edits.push((id, BodyField::Mass, mass));
                            }
                            if ui
                                .add(
                                    egui::DragValue::new(&mut vel.x)
                                        .range(vel_range.clone())
                                        .speed(0.1),
                                )
                                .changed()
                            {
                                edits.push((id, BodyField::Vx, vel.x));
                            }
                            if ui
                                .add(
                                    egui::DragValue::new(&mut vel.y)
                                        .range(vel_range.clone())
                                        .speed(0.1),
                                )
                                .changed()
                            {
                                edits.push((id, BodyField::Vy, vel.y));
                            }
                            ui.end_row();
                        }
                    });
                });
            });

        for (id, field, value) in edits {
            self.controller.edit(id, field, value);
        }
        if !open {
            self.controller.close_editors();
        }
    }

    /// Draws trails (if enabled) and bodies into `rect`.
    fn paint(&self, painter: &egui::Painter, rect: egui::Rect) {
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(17));

        let view = self.controller.render_view();
        let radius = self.controller.config().body_radius;

        if view.show_trails {
            for b in view.bodies {
                if b.path.len() < 2 {
                    continue;
                }
                let points: Vec<egui::Pos2> = b
                    .path
                    .iter()
                    .map(|&p| Self::canvas_to_screen(p, rect))
                    .collect();
                painter.add(egui::Shape::line(
                    points,
                    egui::Stroke::new(1.0, Self::color(b.color)),
                ));
            }
        }

        for b in view.bodies {
            let outline = if view.highlighted == Some(b.id) {
                egui::Stroke::new(3.0, egui::Color32::YELLOW)
            } else {
                egui::Stroke::new(0.5, egui::Color32::from_rgba_unmultiplied(255, 255, 255, 178))
            };
            painter.circle(
                Self::canvas_to_screen(b.pos, rect),
                radius,
                Self::color(b.color),
                outline,
            );
        }

        if self.show_idle_overlay() {
            painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(128));
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Click on the canvas to start.",
                egui::FontId::proportional(20.0),
                egui::Color32::WHITE,
            );
        }
    }

    /// Builds the central canvas: resize sync, clicks, stepping, painting.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
            let rect = response.rect;
            self.canvas_rect = Some(rect);

            let size = rect.size();
            let canvas = self.controller.params().canvas;
            if size.x != canvas.width || size.y != canvas.height {
                self.controller.resize(size.x, size.y);
            }

            if response.clicked()
                && let Some(p) = response.interact_pointer_pos()
            {
                self.handle_canvas_click(p, rect);
            }

            if self.drive_frame() {
                ctx.request_repaint();
            }

            let painter = ui.painter_at(rect);
            self.paint(&painter, rect);
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all panels and windows for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_single_editor(ctx);
        self.ui_bulk_editor(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(20.0, 60.0), egui::vec2(800.0, 600.0))
    }

    fn seeded_viewer() -> Viewer {
        let mut cfg = Config::default();
        cfg.seed = Some(3);
        Viewer::new(cfg).unwrap()
    }

    #[test]
    fn click_is_mapped_to_canvas_coordinates() {
        let mut viewer = seeded_viewer();
        let rect = test_rect();

        viewer.handle_canvas_click(egui::pos2(120.0, 160.0), rect);

        let bodies = viewer.controller.bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(
            Viewer::canvas_to_screen(bodies[0].pos, rect),
            egui::pos2(120.0, 160.0)
        );
    }

    #[test]
    fn status_text_reports_readiness() {
        let mut viewer = seeded_viewer();
        let rect = test_rect();
        assert!(viewer.status_text().ends_with("count: 0."));

        viewer.handle_canvas_click(egui::pos2(120.0, 160.0), rect);
        viewer.handle_canvas_click(egui::pos2(420.0, 160.0), rect);
        assert!(viewer.status_text().contains("Ready to start"));

        viewer.controller.start();
        assert_eq!(viewer.status_text(), "Simulation running... (2 bodies)");
    }

    #[test]
    fn drive_frame_is_idle_without_a_run() {
        let mut viewer = seeded_viewer();
        assert!(!viewer.drive_frame());
    }

    #[test]
    fn drive_frame_runs_until_wall_contact() {
        let mut viewer = seeded_viewer();
        let rect = test_rect();
        // Close to the right wall; default speed covers the gap in one step.
        viewer.handle_canvas_click(egui::pos2(20.0 + 785.0, 360.0), rect);
        assert!(viewer.controller.edit(BodyId(0), BodyField::Vx, 10.0));
        viewer.controller.start();

        // Step that hits the wall still asks for a repaint.
        assert!(viewer.drive_frame());
        // Following frame halts the run.
        assert!(!viewer.drive_frame());
        assert_eq!(viewer.controller.phase(), Phase::PlacingAllowed);
        assert!(!viewer.drive_frame());
    }

    #[test]
    fn idle_overlay_shows_only_on_empty_canvas() {
        let mut viewer = seeded_viewer();
        let rect = test_rect();
        assert!(viewer.show_idle_overlay());

        viewer.handle_canvas_click(egui::pos2(120.0, 160.0), rect);
        assert!(!viewer.show_idle_overlay());

        viewer.controller.clear();
        assert!(viewer.show_idle_overlay());
    }

    #[test]
    fn single_editor_is_anchored_below_its_body() {
        let rect = test_rect();
        let anchor = Viewer::editor_anchor(Vec2::new(100.0, 100.0), 8.0, rect);
        assert_eq!(anchor, egui::pos2(120.0, 176.0));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut cfg = Config::default();
        cfg.canvas_width = f32::INFINITY;
        assert!(Viewer::new(cfg).is_err());
    }
}
