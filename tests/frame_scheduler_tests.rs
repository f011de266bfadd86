//! Frame Scheduler Tests
//!
//! Tests for:
//! - Which airborne key drives the camera
//! - Camera drift and fov convergence during the fly-away
//! - Navigation happening exactly once
//! - Full tick ordering with a headless renderer

mod common;

use glam::Vec3;

use keyportal::animation::{AnimationMixer, LoopMode};
use keyportal::frame::{FlyAwayParams, FrameContext, FrameScheduler, FrameState};
use keyportal::input::Input;
use keyportal::keys::{KeyController, KeyId, KeySpec, RetriggerPolicy};
use keyportal::navigation::RecordingNavigator;
use keyportal::render::HeadlessRenderer;
use keyportal::scene::{Camera, NodeHandle, Scene};

use common::{key_fragment, press_clip};

const START: Vec3 = Vec3::new(15.98, 9.41, -8.09);

fn setup() -> (Scene, NodeHandle, Vec<KeyController>) {
    let mut scene = Scene::new();
    let camera = scene.add_camera(Camera::new_perspective(60.0, 16.0 / 9.0, 0.1, 100.0));
    scene.get_node_mut(camera).unwrap().transform.position = START;

    let keys = KeySpec::defaults()
        .into_iter()
        .map(|spec| {
            let mut key = KeyController::new(spec.clone(), RetriggerPolicy::Restart);
            key.populate(&mut scene, &key_fragment(&spec));
            key
        })
        .collect();
    scene.update_matrix_world();
    (scene, camera, keys)
}

fn key_mut(keys: &mut [KeyController], id: KeyId) -> &mut KeyController {
    keys.iter_mut().find(|k| k.id() == id).unwrap()
}

fn camera_position(scene: &Scene, camera: NodeHandle) -> Vec3 {
    scene.get_node(camera).unwrap().transform.position
}

#[test]
fn nothing_airborne_leaves_camera_alone() {
    let (mut scene, camera, mut keys) = setup();
    let scheduler = FrameScheduler::default();
    let mut navigator = RecordingNavigator::new();

    let report = scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, 3.0);

    assert_eq!(report.driving, None);
    assert_eq!(report.navigated, None);
    assert_eq!(camera_position(&scene, camera), START);
    assert!((scene.main_camera().unwrap().fov - 60.0).abs() < 1e-6);
}

#[test]
fn drift_grows_with_elapsed_time() {
    let (mut scene, camera, mut keys) = setup();
    let scheduler = FrameScheduler::new(FlyAwayParams::default());
    let mut navigator = RecordingNavigator::new();
    key_mut(&mut keys, KeyId::Enter).on_animation_finished(&mut scene, 0.0);

    let report = scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, 0.2);
    assert_eq!(report.driving, Some(KeyId::Enter));

    let expected = START + Vec3::new((0.2_f32 * 5.0).sin() * 0.1, -0.2 * 2.0, -0.2 * 5.0);
    assert!((camera_position(&scene, camera) - expected).length() < 1e-4);

    // Offsets accumulate frame after frame.
    scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, 0.3);
    let z = camera_position(&scene, camera).z;
    assert!((z - (START.z - 1.0 - 1.5)).abs() < 1e-4, "z = {z}");
}

#[test]
fn highest_priority_key_drives() {
    let (mut scene, _, mut keys) = setup();
    let scheduler = FrameScheduler::default();
    let mut navigator = RecordingNavigator::new();

    key_mut(&mut keys, KeyId::Space).on_animation_finished(&mut scene, 0.0);
    let report = scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, 0.1);
    assert_eq!(report.driving, Some(KeyId::Space));

    key_mut(&mut keys, KeyId::F1).on_animation_finished(&mut scene, 0.2);
    let report = scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, 0.3);
    assert_eq!(report.driving, Some(KeyId::F1));

    key_mut(&mut keys, KeyId::Enter).on_animation_finished(&mut scene, 0.4);
    let report = scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, 0.5);
    assert_eq!(report.driving, Some(KeyId::Enter));
}

#[test]
fn fov_widens_monotonically_without_overshoot() {
    let (mut scene, _, mut keys) = setup();
    let scheduler = FrameScheduler::default();
    let mut navigator = RecordingNavigator::new();
    key_mut(&mut keys, KeyId::F1).on_animation_finished(&mut scene, 0.0);

    let mut previous = scene.main_camera().unwrap().fov;
    for frame in 1..=200 {
        scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, frame as f32 * 0.016);
        let fov = scene.main_camera().unwrap().fov;
        assert!(fov > previous, "frame {frame}: {fov} <= {previous}");
        assert!(fov <= 100.0);
        previous = fov;
    }
    assert!(previous > 99.0);
}

#[test]
fn navigates_exactly_once() {
    let (mut scene, _, mut keys) = setup();
    let scheduler = FrameScheduler::default();
    let mut navigator = RecordingNavigator::new();
    key_mut(&mut keys, KeyId::Enter).on_animation_finished(&mut scene, 0.0);

    let mut navigations = Vec::new();
    for frame in 1..=60 {
        let now = frame as f32 * 0.05;
        let report = scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, now);
        if report.navigated.is_some() {
            navigations.push(now);
        }
    }

    assert_eq!(navigator.visited, vec![KeySpec::enter().destination]);
    assert_eq!(navigations.len(), 1);
    assert!(navigations[0] > KeySpec::enter().fly_threshold);
}

#[test]
fn shadowed_key_never_navigates() {
    let (mut scene, _, mut keys) = setup();
    let scheduler = FrameScheduler::default();
    let mut navigator = RecordingNavigator::new();

    // Space armed first, Enter right after: Enter keeps the camera.
    key_mut(&mut keys, KeyId::Space).on_animation_finished(&mut scene, 0.0);
    key_mut(&mut keys, KeyId::Enter).on_animation_finished(&mut scene, 0.1);

    for frame in 1..=100 {
        scheduler.resolve_fly_away(&mut scene, &mut keys, &mut navigator, frame as f32 * 0.05);
    }

    assert_eq!(navigator.visited, vec![KeySpec::enter().destination]);
}

#[test]
fn tick_runs_animations_then_renders() {
    let (mut scene, _, mut keys) = setup();
    let scheduler = FrameScheduler::default();
    let mut navigator = RecordingNavigator::new();
    let mut renderer = HeadlessRenderer::default();
    let input = Input::new();

    // A looping decorative clip on its own model.
    let text = scene.create_node_with_name("message");
    let letters = scene.add_to_parent(keyportal::scene::Node::with_name("letters"), text);
    let mut ambient = AnimationMixer::new(text);
    let clip = std::sync::Arc::new(press_clip("TextAction", "letters", 1.0));
    let handle = ambient.clip_action(&clip, &scene);
    ambient.action_mut(handle).unwrap().set_loop(LoopMode::Loop).play();
    let mut ambient = vec![ambient];

    assert!(key_mut(&mut keys, KeyId::Enter).trigger(&mut scene, 0.0));

    let mut time = 0.0;
    for frame in 1..=3 {
        time += 0.25;
        scheduler.tick(
            FrameContext {
                scene: &mut scene,
                keys: &mut keys,
                ambient: &mut ambient,
                controls: None,
                input: &input,
                renderer: &mut renderer,
                navigator: &mut navigator,
            },
            FrameState {
                time,
                dt: 0.25,
                frame_count: frame,
            },
        );
    }

    assert_eq!(renderer.frames, 3);
    // The press finished on the second frame and the camera is already moving.
    assert!(key_mut(&mut keys, KeyId::Enter).fly().is_airborne());
    assert!(renderer.last_fov > 60.0);
    // Directional light is absent here; only the spotlights remain lit.
    assert_eq!(renderer.last_light_count, 2);
    // The decorative clip loops forever and has no listener.
    assert!(ambient[0].action(handle).unwrap().is_running());
    assert!(scene.get_node(letters).unwrap().transform.position.y < 0.0);
}
