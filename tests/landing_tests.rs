//! Landing Scene Tests
//!
//! End-to-end runs through [`Landing`]: assets arriving, clicks and key
//! presses, the fly-away and the final navigation.

mod common;

use std::sync::Arc;

use glam::{Vec2, Vec3};

use keyportal::assets::{AssetEvent, SceneFragment};
use keyportal::config::{LandingConfig, ModelConfig};
use keyportal::errors::KeyportalError;
use keyportal::input::Key;
use keyportal::keys::{FlyState, KeyId, KeySpec, Playback};
use keyportal::navigation::RecordingNavigator;
use keyportal::render::HeadlessRenderer;
use keyportal::scene::BoundingBox;
use keyportal::{AssetTag, Landing};

use common::{Clock, key_cursor, key_fragment, populated_landing, press_clip, run_frames, test_config};

fn destination(id: KeyId) -> String {
    KeySpec::defaults().into_iter().find(|k| k.id == id).unwrap().destination
}

#[test]
fn new_scene_has_camera_and_sun() {
    let landing = Landing::new(test_config(), HeadlessRenderer::default(), RecordingNavigator::new());

    let camera = landing.camera().unwrap();
    assert!((camera.fov - 60.0).abs() < 1e-6);
    assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    assert_eq!(landing.renderer().width, 800);
    assert_eq!(landing.input().screen_size(), Vec2::new(800.0, 600.0));

    // Only the directional light is lit before any key arrives.
    let lights: Vec<_> = landing.scene().iter_active_lights().collect();
    assert_eq!(lights.len(), 1);
    assert!(lights[0].1.cast_shadows);

    assert!(landing.keys().iter().all(|k| !k.is_populated()));
    assert_eq!(landing.pending_assets(), 0);
}

#[test]
fn click_before_models_load_is_harmless() {
    let mut landing = Landing::new(test_config(), HeadlessRenderer::default(), RecordingNavigator::new());
    assert!(landing.handle_click(Vec2::new(400.0, 300.0)).is_empty());
    assert_eq!(landing.handle_key(Key::Enter).triggered, None);
}

#[test]
fn enter_click_flies_away_and_navigates_once() {
    let mut landing = populated_landing(test_config());
    let mut clock = Clock::new();
    run_frames(&mut landing, &mut clock, 1);

    let hits = landing.handle_click(key_cursor(KeyId::Enter));
    assert_eq!(hits, vec![KeyId::Enter]);

    let enter = landing.key(KeyId::Enter).unwrap();
    assert_eq!(enter.playback(), Playback::Playing);
    assert!(landing.scene().is_visible(enter.light().unwrap()));

    let start = landing.scene().get_node(landing.camera_node()).unwrap().transform.position;
    let reports = run_frames(&mut landing, &mut clock, 40);

    let navigated: Vec<_> = reports.iter().filter_map(|r| r.navigated).collect();
    assert_eq!(navigated, vec![KeyId::Enter]);
    assert_eq!(landing.navigator().visited, vec![destination(KeyId::Enter)]);

    let enter = landing.key(KeyId::Enter).unwrap();
    assert!(matches!(enter.fly(), FlyState::Departed { .. }));
    assert!(!landing.scene().is_visible(enter.light().unwrap()));

    let end = landing.scene().get_node(landing.camera_node()).unwrap().transform.position;
    assert!(end.z < start.z, "camera backs away");
    assert!(end.y < start.y, "camera drops");
    assert!(landing.camera().unwrap().fov > 60.0);
}

#[test]
fn f1_key_press_uses_its_own_threshold() {
    let mut landing = populated_landing(test_config());
    let mut clock = Clock::new();

    let response = landing.handle_key(Key::F1);
    assert!(response.prevent_default);
    assert_eq!(response.triggered, Some(KeyId::F1));

    let mut navigated_at = None;
    for _ in 0..30 {
        let frame = clock.step(common::DT);
        if landing.update(frame).navigated == Some(KeyId::F1) {
            navigated_at = Some(frame.time);
        }
    }

    let armed_at = landing.key(KeyId::F1).unwrap().fly().started_at().unwrap();
    let navigated_at = navigated_at.unwrap();
    assert!(navigated_at - armed_at > KeySpec::f1().fly_threshold);
    assert!(navigated_at - armed_at <= KeySpec::f1().fly_threshold + common::DT + 1e-4);
    assert_eq!(landing.navigator().visited, vec![destination(KeyId::F1)]);
}

#[test]
fn space_press_and_space_click_are_the_same_trigger() {
    let mut landing = populated_landing(test_config());
    let mut clock = Clock::new();
    run_frames(&mut landing, &mut clock, 1);

    assert_eq!(landing.handle_click(key_cursor(KeyId::Space)), vec![KeyId::Space]);
    // Pressing the key while the click animation runs restarts it.
    assert_eq!(landing.handle_key(Key::Space).triggered, Some(KeyId::Space));

    run_frames(&mut landing, &mut clock, 60);
    assert_eq!(landing.navigator().visited, vec![destination(KeyId::Space)]);
}

#[cfg(feature = "winit")]
#[test]
fn held_key_repeats_restart_the_press() {
    use keyportal::app::winit::input_adapter::{InputAction, key_action};
    use keyportal::input::ButtonState;

    let mut landing = populated_landing(test_config());
    let mut clock = Clock::new();
    run_frames(&mut landing, &mut clock, 1);

    let mut triggered = Vec::new();
    for _ in 0..2 {
        // No release in between: the second press is an auto-repeat.
        if let Some(InputAction::KeyPressed(key)) = key_action(landing.input_mut(), Key::Enter, ButtonState::Pressed) {
            triggered.push(landing.handle_key(key).triggered);
        }
        run_frames(&mut landing, &mut clock, 3);
    }
    assert_eq!(triggered, vec![Some(KeyId::Enter), Some(KeyId::Enter)]);

    // 0.6s after the first press, 0.3s after the repeat restarted the clip.
    let enter = landing.key(KeyId::Enter).unwrap();
    assert_eq!(enter.playback(), Playback::Playing);
    assert_eq!(enter.fly(), FlyState::Grounded);

    run_frames(&mut landing, &mut clock, 3);
    assert!(landing.key(KeyId::Enter).unwrap().fly().is_airborne());
}

#[test]
fn enter_overrides_a_running_space_fly_away() {
    let mut landing = populated_landing(test_config());
    let mut clock = Clock::new();

    landing.handle_key(Key::Space);
    run_frames(&mut landing, &mut clock, 7);
    assert!(landing.key(KeyId::Space).unwrap().fly().is_airborne());

    landing.handle_key(Key::Enter);
    let reports = run_frames(&mut landing, &mut clock, 40);

    assert!(reports.last().unwrap().driving == Some(KeyId::Enter));
    assert_eq!(landing.navigator().visited, vec![destination(KeyId::Enter)]);
}

#[test]
fn resize_updates_aspect_and_ignores_zero_height() {
    let mut landing = populated_landing(test_config());

    landing.resize(1000, 500);
    assert!((landing.camera().unwrap().aspect - 2.0).abs() < 1e-6);
    assert_eq!(landing.renderer().width, 1000);

    landing.resize(1000, 0);
    assert!((landing.camera().unwrap().aspect - 2.0).abs() < 1e-6);
    assert_eq!(landing.input().screen_size(), Vec2::new(1000.0, 500.0));

    // Picking follows the new viewport: the screen centre is still the
    // F1 key.
    assert_eq!(landing.handle_click(Vec2::new(500.0, 250.0)), vec![KeyId::F1]);
}

#[test]
fn failed_key_model_stays_inert() {
    let mut landing = Landing::new(test_config(), HeadlessRenderer::default(), RecordingNavigator::new());
    landing.handle_asset_event(AssetEvent::Failed {
        tag: AssetTag::Key(KeyId::Enter),
        error: KeyportalError::AssetNotFound("models/enter_key.glb".to_string()),
    });

    assert!(!landing.key(KeyId::Enter).unwrap().is_populated());
    assert_eq!(landing.handle_key(Key::Enter).triggered, None);

    let mut clock = Clock::new();
    run_frames(&mut landing, &mut clock, 5);
    assert!(landing.navigator().visited.is_empty());
}

#[test]
fn models_arrive_in_any_order() {
    let config = test_config();
    let specs = config.keys.clone();
    let mut landing = Landing::new(config, HeadlessRenderer::default(), RecordingNavigator::new());

    for spec in specs.iter().rev() {
        landing.handle_asset_event(AssetEvent::Loaded {
            tag: AssetTag::Key(spec.id),
            fragment: key_fragment(spec),
        });
    }
    assert!(landing.keys().iter().all(|k| k.is_populated()));
    assert_eq!(landing.handle_click(key_cursor(KeyId::F1)), vec![KeyId::F1]);
}

#[test]
fn decorative_model_loops_its_clip() {
    let mut config = test_config();
    config.models = vec![
        ModelConfig {
            asset: "models/message.glb".to_string(),
            position: [0.0, 5.0, 0.0],
            clip_name: Some("TextAction".to_string()),
        },
        ModelConfig {
            asset: "models/keyboard.glb".to_string(),
            position: [0.0, -1.0, 0.0],
            clip_name: None,
        },
    ];
    let mut landing = Landing::new(config, HeadlessRenderer::default(), RecordingNavigator::new());

    let mut message = SceneFragment::new("message");
    message.push_mesh("letters", None, Vec3::ZERO, BoundingBox::new(Vec3::splat(-0.1), Vec3::splat(0.1)));
    message.clips.push(Arc::new(press_clip("TextAction", "letters", 1.0)));
    landing.on_asset_loaded(AssetTag::Model(0), &message);

    let mut keyboard = SceneFragment::new("keyboard");
    keyboard.push_mesh("board", None, Vec3::ZERO, BoundingBox::new(Vec3::splat(-5.0), Vec3::splat(5.0)));
    landing.on_asset_loaded(AssetTag::Model(1), &keyboard);

    assert_eq!(landing.models().len(), 2);
    assert_eq!(landing.ambient_mixers().len(), 1);
    let root = landing.models()[0];
    assert_eq!(landing.scene().get_node(root).unwrap().transform.position, Vec3::new(0.0, 5.0, 0.0));

    let mut clock = Clock::new();
    let reports = run_frames(&mut landing, &mut clock, 25);
    assert!(reports.iter().all(|r| r.driving.is_none()));
    let mixer = &landing.ambient_mixers()[0];
    let action = mixer.action(mixer.find_action("TextAction").unwrap()).unwrap();
    assert!(action.is_running(), "looping clip never finishes");
}

#[test]
fn unknown_model_slot_is_dropped() {
    let mut landing = Landing::new(test_config(), HeadlessRenderer::default(), RecordingNavigator::new());
    let before = landing.scene().nodes.len();
    landing.on_asset_loaded(AssetTag::Model(7), &SceneFragment::new("stray"));
    assert_eq!(landing.scene().nodes.len(), before);
}

#[test]
fn default_config_builds() {
    let landing = Landing::new(LandingConfig::default(), HeadlessRenderer::default(), RecordingNavigator::new());
    assert_eq!(landing.keys().len(), 3);
    let camera = landing.scene().get_node(landing.camera_node()).unwrap();
    assert!((camera.transform.position - Vec3::new(15.98, 9.41, -8.09)).length() < 1e-5);
}
