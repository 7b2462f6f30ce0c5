use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Instant;

use eframe::egui::{self, Context};

use crate::content::{ContentNode, load_content};

mod camera;
mod forces;
mod images;
mod links;
mod math;
mod settings;
mod sim;
mod ui;
mod view;

use camera::CameraRig;
use images::ImageLoader;
use settings::LinkSettings;
use sim::Simulation;

pub struct ContentAtlasApp {
    state: AppState,
    base_url: Option<String>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Vec<ContentNode>, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// All per-session state once content has loaded. The simulation owns node
/// positions, the camera rig owns the viewport pose, and selection/hover
/// live here as the interaction layer's published signals.
struct ViewModel {
    content: Vec<ContentNode>,
    base_url: Option<String>,
    settings: LinkSettings,
    sim: Simulation,
    camera: CameraRig,
    selected: Option<usize>,
    hovered: Option<usize>,
    images: ImageLoader,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl ViewModel {
    fn new(content: Vec<ContentNode>, base_url: Option<String>) -> Self {
        let settings = LinkSettings::default();
        let mut sim = Simulation::new();
        sim.initialize(&content, &settings);

        Self {
            content,
            base_url,
            settings,
            sim,
            camera: CameraRig::new(),
            selected: None,
            hovered: None,
            images: ImageLoader::new(),
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        }
    }

    /// The settings panel hands over a complete new snapshot; the engine
    /// never sees partial diffs.
    fn apply_settings(&mut self, settings: LinkSettings) {
        self.settings = settings;
        self.sim
            .apply_settings(&self.content, &settings, Instant::now());
    }

    /// Selecting a node flies the camera to it; selecting empty space (or
    /// closing the detail panel) clears the signal.
    fn set_selected(&mut self, selected: Option<usize>, now: Instant) {
        self.selected = selected;
        if let Some(index) = selected
            && let Some(position) = self.sim.node_position(index)
        {
            self.camera.focus_on(position, now);
        }
    }

    fn reset_view(&mut self, now: Instant) {
        self.selected = None;
        self.camera.reset(now);
    }
}

impl ContentAtlasApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        content_path: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = load_content(content_path.as_deref()).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        Self {
            state: AppState::Loading { rx },
            base_url,
        }
    }
}

impl eframe::App for ContentAtlasApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(content) => AppState::Ready(Box::new(ViewModel::new(
                            content,
                            self.base_url.clone(),
                        ))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading content graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the content source");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
            AppState::Ready(model) => {
                model.show(ctx);
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let AppState::Ready(model) = &mut self.state {
            model.sim.teardown();
        }
    }
}
