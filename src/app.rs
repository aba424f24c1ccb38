use crate::assets::LoadQueue;
use crate::config::StageSettings;
use crate::rendering::{ResourceLedger, WireframeRenderer};
use crate::ui::{show_debug_panel, UiState};
use crate::world::animation::FrameClock;
use crate::world::{MoveKey, Simulation};
use eframe::egui::{self, PointerButton, Sense};
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// The eframe host: owns the load runtime, the simulation and the widget state.
pub struct StageApp {
    // Keeps the load workers alive for as long as the window is open.
    _runtime: Runtime,
    simulation: Simulation,
    resources: ResourceLedger,
    clock: FrameClock,
    ui_state: UiState,
}

impl StageApp {
    pub fn new(
        settings: &StageSettings,
        runtime: Runtime,
        loads: LoadQueue,
    ) -> anyhow::Result<Self> {
        let initial = settings.assets.initial_asset()?;
        let mut simulation = Simulation::new(settings, loads);
        info!(
            "Stage ready: {} obstacles, loading {} first",
            simulation.obstacles.len(),
            initial
        );
        simulation.load_asset(initial);

        Ok(Self {
            _runtime: runtime,
            simulation,
            resources: ResourceLedger::new(),
            clock: FrameClock::new(),
            ui_state: UiState::new(initial),
        })
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let pressed: Vec<MoveKey> = ctx.input(|i| {
            MoveKey::ALL
                .into_iter()
                .filter(|key| i.key_pressed(key.key()))
                .collect()
        });
        for key in pressed {
            self.simulation.handle_key(key);
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let height = response.rect.height();
        let delta = response.drag_delta();
        if response.dragged_by(PointerButton::Primary) {
            self.simulation.camera.rotate(delta.x, delta.y, height);
        } else if response.dragged_by(PointerButton::Secondary) {
            self.simulation.camera.pan(delta.x, delta.y, height);
        }
        if response.hovered() {
            let scroll = ctx.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.simulation.camera.zoom(scroll / 50.0);
            }
        }
    }
}

impl eframe::App for StageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for event in self.simulation.pump_loads(&mut self.resources) {
            self.ui_state.apply_event(&event);
        }

        self.handle_keyboard(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let viewport = ui.max_rect();
                let response = ui.allocate_rect(viewport, Sense::click_and_drag());
                self.handle_pointer(ctx, &response);

                let delta = self.clock.delta_seconds();
                let painter = ui.painter_at(viewport);
                let mut renderer = WireframeRenderer::new(&painter, viewport);
                self.simulation.tick(delta, &mut renderer);
            });

        let metrics = self.simulation.stats.metrics();
        let morphs = &self.simulation.morph_panel;
        if let Some(asset) = show_debug_panel(ctx, &mut self.ui_state, morphs, &metrics) {
            debug!("Picker selected {}", asset);
            self.simulation.load_asset(asset);
        }

        ctx.request_repaint();
    }
}
