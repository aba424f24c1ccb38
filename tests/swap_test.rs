use anyhow::{bail, Context};
use async_trait::async_trait;
use fbx_stage::assets::bundle::AssetBundle;
use fbx_stage::assets::material::Material;
use fbx_stage::assets::mesh::{Geometry, Mesh};
use fbx_stage::assets::texture::Texture;
use fbx_stage::assets::{AssetId, AssetLoader, AssetPaths, JsonBundleLoader, LoadQueue};
use fbx_stage::config::StageSettings;
use fbx_stage::rendering::scene::node::{Node, NodeKind, ReleasableResource};
use fbx_stage::rendering::{Frame, FrameRenderer, GraphicsResources, ResourceLedger};
use fbx_stage::world::animation::{AnimationClip, KeyframeTrack, TrackProperty};
use fbx_stage::world::{Simulation, StageEvent};
use glam::Vec3;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;

const WAIT: Duration = Duration::from_secs(5);

/// Serves in-memory bundles keyed by the file stem of the requested path.
#[derive(Default)]
struct StubLoader {
    delays: HashMap<AssetId, Duration>,
    failing: HashSet<AssetId>,
    requested: Mutex<Vec<PathBuf>>,
    calls: AtomicUsize,
}

impl StubLoader {
    fn with_delay(mut self, asset: AssetId, delay: Duration) -> Self {
        self.delays.insert(asset, delay);
        self
    }

    fn failing(mut self, asset: AssetId) -> Self {
        self.failing.insert(asset);
        self
    }
}

#[async_trait]
impl AssetLoader<AssetBundle> for StubLoader {
    async fn load(&self, path: &Path) -> anyhow::Result<AssetBundle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(path.to_path_buf());

        let stem = path.file_stem().and_then(|s| s.to_str()).context("no file stem")?;
        let asset = AssetId::from_display_name(stem).context("unknown asset")?;
        if let Some(delay) = self.delays.get(&asset) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&asset) {
            bail!("corrupt bundle");
        }
        Ok(bundle_for(asset))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GpuCall {
    Upload(ReleasableResource),
    Release(ReleasableResource),
}

/// Logs every upload and release in call order.
#[derive(Default)]
struct RecordingResources {
    calls: Vec<GpuCall>,
}

impl GraphicsResources for RecordingResources {
    fn upload(&mut self, resource: &ReleasableResource) {
        self.calls.push(GpuCall::Upload(*resource));
    }

    fn release(&mut self, resource: &ReleasableResource) {
        self.calls.push(GpuCall::Release(*resource));
    }
}

struct NullRenderer;

impl FrameRenderer for NullRenderer {
    fn render(&mut self, _frame: &Frame<'_>) {}
}

fn mesh_node(name: &str, morphs: &[&str], textured: bool) -> Node {
    let geometry = Geometry::new(vec![Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 180.0, 10.0)]);
    let mut material = Material::default();
    if textured {
        material = material.with_map(Texture::new(format!("{}_diffuse", name), 4, 4));
    }
    let mesh = Mesh::new(geometry, material)
        .with_morph_targets(morphs.iter().map(|m| m.to_string()).collect());
    Node::new(name, NodeKind::Mesh(mesh))
}

fn morph_clip(name: &str, target: f32) -> AnimationClip {
    AnimationClip::new(
        name,
        None,
        vec![KeyframeTrack {
            node: "Body".into(),
            property: TrackProperty::Morph("smile".into()),
            times: vec![0.0, 1.0],
            values: vec![0.0, target],
        }],
    )
}

/// Idle: two meshes (one textured), three morph channels, clips [A, B, C].
/// Running: one bare mesh, no morphs, no clips.
fn bundle_for(asset: AssetId) -> AssetBundle {
    match asset {
        AssetId::Running => AssetBundle::new(
            Node::group("Armature").with_child(mesh_node("Runner", &[], false)),
            Vec::new(),
        ),
        _ => AssetBundle::new(
            Node::group("Armature")
                .with_child(Node::new("Hips", NodeKind::Bone))
                .with_child(mesh_node("Body", &["smile", "blink"], false))
                .with_child(mesh_node("Eyes", &["look_left"], true)),
            vec![morph_clip("A", 1.0), morph_clip("B", 0.5), morph_clip("C", 0.25)],
        ),
    }
}

fn test_settings() -> StageSettings {
    let mut settings = StageSettings::default();
    settings.scene.obstacle_count = 0;
    settings.seed = Some(3);
    settings
}

fn stage(loader: StubLoader) -> (Simulation, Arc<StubLoader>) {
    let loader = Arc::new(loader);
    let queue = LoadQueue::new(loader.clone(), Handle::current(), AssetPaths::default());
    (Simulation::new(&test_settings(), queue), loader)
}

/// Blocks for the next completion and applies it.
fn apply_next(sim: &mut Simulation, ledger: &mut ResourceLedger) -> StageEvent {
    let completion = sim.loads().recv_timeout(WAIT).expect("load did not complete in time");
    sim.apply_completion(completion, ledger)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_load_resolves_default_path() {
    let (mut sim, loader) = stage(StubLoader::default());
    let mut ledger = ResourceLedger::new();

    sim.load_asset(AssetId::Idle);
    let event = apply_next(&mut sim, &mut ledger);

    assert!(event.is_installed());
    assert_eq!(
        loader.requested.lock().unwrap().as_slice(),
        &[PathBuf::from("models/fbx/Idle.fbx")]
    );
    assert_eq!(sim.character().map(|c| c.asset), Some(AssetId::Idle));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_active_character_across_swaps() {
    let (mut sim, _) = stage(StubLoader::default());
    let mut ledger = ResourceLedger::new();

    assert_eq!(sim.scene.character_count(), 0);
    for asset in [AssetId::Idle, AssetId::Running, AssetId::Walking, AssetId::Idle] {
        sim.load_asset(asset);
        let event = apply_next(&mut sim, &mut ledger);
        assert!(event.is_installed());
        assert_eq!(sim.scene.character_count(), 1);
        assert_eq!(sim.character().map(|c| c.asset), Some(asset));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_swap_releases_outgoing_resources() {
    let (mut sim, _) = stage(StubLoader::default());
    let mut ledger = ResourceLedger::new();

    sim.load_asset(AssetId::Idle);
    let StageEvent::Installed(first) = apply_next(&mut sim, &mut ledger) else {
        panic!("first load should install");
    };
    assert_eq!(first.previous, None);
    assert_eq!(first.released_resources, 0);
    // Two materials, two geometries, one texture
    assert_eq!(first.uploaded_resources, 5);
    assert_eq!(ledger.live_count(), 5);

    let outgoing = sim.character().unwrap().resources();

    sim.load_asset(AssetId::Running);
    let StageEvent::Installed(second) = apply_next(&mut sim, &mut ledger) else {
        panic!("second load should install");
    };
    assert_eq!(second.previous, Some(AssetId::Idle));
    assert_eq!(second.released_meshes, 2);
    assert_eq!(second.released_resources, outgoing.len());
    assert!(outgoing.iter().all(|r| !ledger.is_live(r)));
    assert_eq!(ledger.live_count(), 2);

    for _ in 0..5 {
        for asset in [AssetId::Idle, AssetId::Running] {
            sim.load_asset(asset);
            assert!(apply_next(&mut sim, &mut ledger).is_installed());
        }
    }
    // Only the last character's resources remain
    assert_eq!(ledger.live_count(), sim.character().unwrap().resources().len());
    assert_eq!(ledger.uploads() - ledger.releases(), ledger.live_count() as u64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_outgoing_resources_released_before_incoming_upload() {
    let (mut sim, _) = stage(StubLoader::default());
    let mut gpu = RecordingResources::default();

    sim.install_bundle(AssetId::Idle, bundle_for(AssetId::Idle), &mut gpu);
    let outgoing = sim.character().unwrap().resources();
    gpu.calls.clear();

    let incoming = bundle_for(AssetId::Running);
    let report = sim.install_bundle(AssetId::Running, incoming, &mut gpu);

    let first_upload = gpu
        .calls
        .iter()
        .position(|call| matches!(call, GpuCall::Upload(_)))
        .expect("incoming character was never uploaded");
    let releases: Vec<ReleasableResource> = gpu
        .calls
        .iter()
        .filter_map(|call| match call {
            GpuCall::Release(r) => Some(*r),
            GpuCall::Upload(_) => None,
        })
        .collect();

    // Everything released comes before anything uploaded
    assert!(gpu.calls[..first_upload].iter().all(|c| matches!(c, GpuCall::Release(_))));
    assert!(gpu.calls[first_upload..].iter().all(|c| matches!(c, GpuCall::Upload(_))));
    assert_eq!(releases, outgoing);

    // The Idle fixture is two meshes (Body, Eyes): two geometries, two materials, one texture
    assert_eq!(releases.len(), 5);
    let geometries = releases
        .iter()
        .filter(|r| matches!(r, ReleasableResource::Geometry(_)))
        .count();
    assert_eq!(geometries, 2);
    assert_eq!(report.released_meshes, 2);
    assert_eq!(report.released_resources, 5);

    // Only the incoming character's resources were uploaded
    let uploaded = gpu.calls.len() - first_upload;
    assert_eq!(uploaded, sim.character().unwrap().resources().len());
    assert_eq!(report.uploaded_resources, uploaded);
    assert_eq!(sim.scene.character_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_morph_panel_matches_character() {
    let (mut sim, _) = stage(StubLoader::default());
    let mut ledger = ResourceLedger::new();

    sim.load_asset(AssetId::Idle);
    let StageEvent::Installed(report) = apply_next(&mut sim, &mut ledger) else {
        panic!("load should install");
    };
    assert_eq!(report.morph_controls, 3);
    assert!(sim.morph_panel.is_visible());
    let titles: Vec<&str> = sim.morph_panel.folders().iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Body", "Eyes"]);
    assert!(sim.morph_panel.control("Body", "blink").is_some());
    assert!(sim.morph_panel.control("Eyes", "look_left").is_some());

    // Sliders write straight into the mesh influences
    assert!(sim.morph_panel.set("Body", "blink", 0.7));
    let body = sim.character().unwrap().root.find("Body").unwrap();
    let targets = body.mesh().unwrap().morph_targets.as_ref().unwrap();
    let blink = targets.index_of("blink").unwrap();
    assert!((targets.influence(blink).unwrap() - 0.7).abs() < 1e-6);
    assert!(!sim.morph_panel.set("Body", "frown", 0.2));

    sim.load_asset(AssetId::Running);
    let StageEvent::Installed(report) = apply_next(&mut sim, &mut ledger) else {
        panic!("load should install");
    };
    assert_eq!(report.morph_controls, 0);
    assert!(!sim.morph_panel.is_visible());
    assert!(sim.morph_panel.folders().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_only_first_clip_plays() {
    let (mut sim, _) = stage(StubLoader::default());
    let mut ledger = ResourceLedger::new();

    sim.load_asset(AssetId::Idle);
    let StageEvent::Installed(report) = apply_next(&mut sim, &mut ledger) else {
        panic!("load should install");
    };
    assert_eq!(report.clip.as_deref(), Some("A"));
    assert_eq!(sim.character().unwrap().clips.len(), 3);

    sim.tick(0.5, &mut NullRenderer);
    let mixer = sim.mixer().unwrap();
    assert_eq!(mixer.clip().name, "A");
    assert!((mixer.time() - 0.5).abs() < 1e-6);

    // Clip A drives "smile" towards 1.0; B or C would land at 0.25 or 0.125
    let smile = sim.morph_panel.control("Body", "smile").unwrap().value();
    assert!((smile - 0.5).abs() < 1e-4, "smile was {}", smile);

    sim.load_asset(AssetId::Running);
    apply_next(&mut sim, &mut ledger);
    assert!(sim.mixer().is_none());
    sim.tick(0.5, &mut NullRenderer);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_stale_completion_is_discarded() {
    let loader = StubLoader::default().with_delay(AssetId::Walking, Duration::from_millis(300));
    let (mut sim, _) = stage(loader);
    let mut ledger = ResourceLedger::new();

    let slow = sim.load_asset(AssetId::Walking);
    let fast = sim.load_asset(AssetId::Shuffling);
    assert!(fast > slow);
    assert_eq!(sim.latest_request(), Some(fast));

    let first = apply_next(&mut sim, &mut ledger);
    assert!(first.is_installed());
    assert_eq!(sim.character().map(|c| c.asset), Some(AssetId::Shuffling));

    match apply_next(&mut sim, &mut ledger) {
        StageEvent::Discarded { asset, token } => {
            assert_eq!(asset, AssetId::Walking);
            assert_eq!(token, slow);
        }
        other => panic!("expected discard, got {:?}", other),
    }
    assert_eq!(sim.character().map(|c| c.asset), Some(AssetId::Shuffling));
    assert_eq!(ledger.live_count(), sim.character().unwrap().resources().len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_load_keeps_current_character() {
    let (mut sim, _) = stage(StubLoader::default().failing(AssetId::KickSoccerball));
    let mut ledger = ResourceLedger::new();

    sim.load_asset(AssetId::Idle);
    assert!(apply_next(&mut sim, &mut ledger).is_installed());
    let live_before = ledger.live_count();

    sim.load_asset(AssetId::KickSoccerball);
    match apply_next(&mut sim, &mut ledger) {
        StageEvent::Failed(err) => {
            assert_eq!(err.asset(), AssetId::KickSoccerball);
            assert!(err.to_string().contains("corrupt bundle"));
            assert!(err.to_string().contains("Kick Soccerball.fbx"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(sim.character().map(|c| c.asset), Some(AssetId::Idle));
    assert_eq!(sim.scene.character_count(), 1);
    assert_eq!(ledger.live_count(), live_before);
    assert!(sim.last_failure().is_some());
    assert!(sim.morph_panel.is_visible());

    sim.load_asset(AssetId::Walking);
    assert!(apply_next(&mut sim, &mut ledger).is_installed());
    assert!(sim.last_failure().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_pump_loads_applies_everything_that_arrived() {
    let (mut sim, loader) = stage(StubLoader::default());
    let mut ledger = ResourceLedger::new();

    sim.load_asset(AssetId::Running);
    let deadline = std::time::Instant::now() + WAIT;
    let mut events = Vec::new();
    while events.is_empty() && std::time::Instant::now() < deadline {
        events = sim.pump_loads(&mut ledger);
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(events.len(), 1);
    assert!(events[0].is_installed());
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    assert!(sim.pump_loads(&mut ledger).is_empty());
}

#[tokio::test]
async fn test_json_bundle_loader_reads_disk_bundle() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::new(2, 2).save(dir.path().join("skin.png")).unwrap();
    let path = dir.path().join("Idle.fbx");
    std::fs::write(
        &path,
        r#"{
  "root": {
    "name": "Armature",
    "children": [
      { "name": "Hips", "kind": "bone", "translation": [0, 90, 0] },
      {
        "name": "Body",
        "kind": "mesh",
        "mesh": {
          "positions": [[-20, 0, -10], [20, 170, 10]],
          "material": { "color": [0.8, 0.6, 0.5], "map": "skin.png" },
          "morph_targets": ["smile"]
        }
      }
    ]
  },
  "clips": [
    { "name": "mixamo.com", "tracks": [
      { "node": "Hips", "property": "translation", "times": [0, 1], "values": [0, 90, 0, 0, 95, 0] }
    ] },
    { "name": "unused", "duration": 2.0 }
  ]
}"#,
    )
    .unwrap();

    let bundle = JsonBundleLoader::new().load(&path).await.unwrap();
    assert_eq!(bundle.root.mesh_count(), 1);
    assert_eq!(bundle.clips.len(), 2);
    assert_eq!(bundle.clips[0].name, "mixamo.com");
    assert!((bundle.clips[0].duration - 1.0).abs() < 1e-6);

    let body = bundle.root.find("Body").unwrap().mesh().unwrap();
    assert!(body.cast_shadow && body.receive_shadow);
    let map = body.material.map.as_ref().unwrap();
    assert_eq!((map.width, map.height), (2, 2));
    // Material, texture, geometry
    assert_eq!(bundle.root.releasable_resources().len(), 3);

    let bounds = bundle.root.world_bounds();
    assert_eq!(bounds.min, Vec3::new(-20.0, 0.0, -10.0));
    assert_eq!(bounds.max, Vec3::new(20.0, 170.0, 10.0));
}

#[tokio::test]
async fn test_json_bundle_loader_reports_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let loader = JsonBundleLoader::new();

    let missing = loader.load(&dir.path().join("Nope.fbx")).await;
    assert!(missing.is_err());

    let garbage = dir.path().join("Garbage.fbx");
    std::fs::write(&garbage, b"Kaydara FBX Binary  \x00").unwrap();
    let err = loader.load(&garbage).await.unwrap_err();
    assert!(format!("{:#}", err).contains("failed to decode"));
}
