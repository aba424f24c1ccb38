use crate::assets::bundle::AssetBundle;
use crate::assets::{AssetId, LoadCompletion, LoadError, LoadQueue, RequestToken};
use crate::config::StageSettings;
use crate::rendering::camera::OrbitCamera;
use crate::rendering::light::Environment;
use crate::rendering::scene::SceneGraph;
use crate::rendering::{Frame, FrameRenderer, FrameStats, GraphicsResources};
use crate::ui::morph_panel::MorphPanel;
use crate::world::animation::AnimationMixer;
use crate::world::character::ActiveCharacter;
use crate::world::events::{StageEvent, SwapReport};
use crate::world::input::MoveKey;
use crate::world::obstacles::{ConeShape, ObstacleField};
use crate::world::physics;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// All mutable state of the stage, driven from a single thread: one
/// `tick` per frame, key presses in between, load completions applied
/// when the host pumps them.
pub struct Simulation {
    pub scene: SceneGraph,
    pub obstacles: ObstacleField,
    pub camera: OrbitCamera,
    pub stats: FrameStats,
    pub morph_panel: MorphPanel,
    mixer: Option<AnimationMixer>,
    loads: LoadQueue,
    latest_request: Option<RequestToken>,
    last_failure: Option<LoadError>,
    rng: StdRng,
    move_distance: f32,
    collision_displacement: f32,
}

impl Simulation {
    pub fn new(settings: &StageSettings, loads: LoadQueue) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let shape = ConeShape {
            radius: settings.scene.cone_radius,
            height: settings.scene.cone_height,
        };
        let obstacles = ObstacleField::scatter(
            settings.scene.obstacle_count,
            settings.scene.scatter_half_extent,
            shape,
            &mut rng,
        );
        let cam = &settings.camera;
        let camera = OrbitCamera::new(
            Vec3::from_array(cam.position),
            Vec3::from_array(cam.target),
            cam.fov_degrees,
            cam.near,
            cam.far,
        );

        Self {
            scene: SceneGraph::new(Environment::default()),
            obstacles,
            camera,
            stats: FrameStats::new(),
            morph_panel: MorphPanel::new(),
            mixer: None,
            loads,
            latest_request: None,
            last_failure: None,
            rng,
            move_distance: settings.controls.move_distance,
            collision_displacement: settings.controls.collision_displacement,
        }
    }

    /// Replaces the obstacle set, e.g. with a hand-placed layout.
    pub fn with_obstacles(mut self, obstacles: ObstacleField) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn character(&self) -> Option<&ActiveCharacter> {
        self.scene.character()
    }

    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    pub fn latest_request(&self) -> Option<RequestToken> {
        self.latest_request
    }

    pub fn last_failure(&self) -> Option<&LoadError> {
        self.last_failure.as_ref()
    }

    pub fn loads(&self) -> &LoadQueue {
        &self.loads
    }

    /// Starts fetching `asset`. Only the most recent request may install.
    pub fn load_asset(&mut self, asset: AssetId) -> RequestToken {
        let token = self.loads.request(asset);
        self.latest_request = Some(token);
        info!("Loading {} (request {})", asset, token);
        token
    }

    /// Applies every completion that has arrived, in arrival order.
    pub fn pump_loads(&mut self, resources: &mut dyn GraphicsResources) -> Vec<StageEvent> {
        self.loads
            .drain()
            .into_iter()
            .map(|completion| self.apply_completion(completion, resources))
            .collect()
    }

    pub fn apply_completion(
        &mut self,
        completion: LoadCompletion,
        resources: &mut dyn GraphicsResources,
    ) -> StageEvent {
        let LoadCompletion { token, asset, result } = completion;

        if self.latest_request != Some(token) {
            warn!(
                "Discarding stale load of {} (request {}, latest {:?})",
                asset, token, self.latest_request
            );
            return StageEvent::Discarded { asset, token };
        }

        match result {
            Ok(bundle) => {
                self.last_failure = None;
                StageEvent::Installed(self.install_bundle(asset, bundle, resources))
            }
            Err(err) => {
                warn!("{}; keeping current character", err);
                self.last_failure = Some(err.clone());
                StageEvent::Failed(err)
            }
        }
    }

    /// Swaps the character: release the old one's resources, detach it,
    /// attach the new one, bind its first clip and rebuild the morph panel.
    pub fn install_bundle(
        &mut self,
        asset: AssetId,
        bundle: AssetBundle,
        resources: &mut dyn GraphicsResources,
    ) -> SwapReport {
        let mut released_resources = 0;
        let mut released_meshes = 0;
        let mut previous = None;

        if let Some(old) = self.scene.character() {
            let outgoing = old.resources();
            for resource in &outgoing {
                resources.release(resource);
            }
            released_resources = outgoing.len();
            released_meshes = old.mesh_count();
            previous = Some(old.asset);
            self.scene.detach_character();
        }

        let character = ActiveCharacter::from_bundle(asset, bundle);
        let incoming = character.resources();
        for resource in &incoming {
            resources.upload(resource);
        }

        self.mixer = character
            .clips
            .first()
            .map(|clip| AnimationMixer::bind(Arc::clone(clip), &character.root));
        if character.clips.len() > 1 {
            debug!("{} ships {} clips; playing only the first", asset, character.clips.len());
        }
        let clip = self.mixer.as_ref().map(|m| m.clip().name.clone());

        self.morph_panel.rebuild(&character.root);
        let morph_controls = self.morph_panel.control_count();

        self.scene.attach_character(character);

        info!(
            "Installed {} (released {} resources from {:?}, clip {:?}, {} morph controls)",
            asset, released_resources, previous, clip, morph_controls
        );

        SwapReport {
            asset,
            previous,
            released_resources,
            released_meshes,
            uploaded_resources: incoming.len(),
            clip,
            morph_controls,
            timestamp: SystemTime::now(),
        }
    }

    /// One-shot step of the character. Ignored until a character is loaded.
    pub fn handle_key(&mut self, key: MoveKey) {
        let offset = key.offset(self.move_distance);
        if let Some(character) = self.scene.character_mut() {
            character.translate(offset);
        }
    }

    /// Animation, then collisions, then drawing.
    pub fn tick(&mut self, delta_seconds: f32, renderer: &mut dyn FrameRenderer) {
        if let (Some(mixer), Some(character)) = (self.mixer.as_mut(), self.scene.character_mut()) {
            mixer.update(delta_seconds, &mut character.root);
        }

        self.check_collisions();

        renderer.render(&Frame {
            scene: &self.scene,
            obstacles: &self.obstacles,
            camera: &self.camera,
        });
        self.stats.record_frame(delta_seconds);
    }

    /// Nudges every obstacle whose bounds touch the character's. Returns the count.
    pub fn check_collisions(&mut self) -> usize {
        let Some(character) = self.scene.character() else {
            return 0;
        };
        let bounds = character.world_bounds();
        physics::resolve_collisions(
            &bounds,
            &mut self.obstacles,
            self.collision_displacement,
            &mut self.rng,
        )
    }
}
