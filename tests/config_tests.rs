//! Configuration Tests
//!
//! Tests for:
//! - The shipped defaults
//! - Partial JSON overrides
//! - Validation errors

use keyportal::config::LandingConfig;
use keyportal::errors::KeyportalError;
use keyportal::keys::{KeyId, RetriggerPolicy};
use keyportal::render::{ShadowFilter, ToneMappingMode};

#[test]
fn defaults_describe_the_landing_scene() {
    let config = LandingConfig::default();
    config.validate().unwrap();

    assert_eq!(config.camera.position, [15.98, 9.41, -8.09]);
    assert_eq!(config.orbit.target, [-2.8, -1.1, -9.0]);
    assert!(!config.orbit.enable_damping);
    assert_eq!(config.retrigger, RetriggerPolicy::Restart);

    let ids: Vec<_> = config.keys.iter().map(|k| k.id).collect();
    assert_eq!(ids, vec![KeyId::Enter, KeyId::F1, KeyId::Space]);
    let thresholds: Vec<_> = config.keys.iter().map(|k| k.fly_threshold).collect();
    assert_eq!(thresholds, vec![0.5, 1.0, 1.5]);

    assert_eq!(config.models.len(), 2);
    assert_eq!(config.models[0].clip_name.as_deref(), Some("TextAction"));

    assert_eq!(config.render.tone_mapping, ToneMappingMode::AcesFilmic);
    assert_eq!(config.render.shadow_filter, ShadowFilter::PcfSoft);
    assert!((config.fly_away.target_fov - 100.0).abs() < f32::EPSILON);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let config = LandingConfig::from_json_str(
        r#"{
            "asset_root": "public",
            "camera": { "fov": 45.0 },
            "retrigger": "ignore",
            "fly_away": { "fov_lerp": 0.1 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.asset_root, "public");
    assert!((config.camera.fov - 45.0).abs() < f32::EPSILON);
    assert_eq!(config.camera.position, [15.98, 9.41, -8.09]);
    assert_eq!(config.retrigger, RetriggerPolicy::Ignore);
    assert!((config.fly_away.fov_lerp - 0.1).abs() < f32::EPSILON);
    assert!((config.fly_away.target_fov - 100.0).abs() < f32::EPSILON);
    assert_eq!(config.keys.len(), 3);
}

#[test]
fn keys_can_be_replaced() -> anyhow::Result<()> {
    let config = LandingConfig::from_json_str(
        r#"{
            "keys": [{
                "id": "space",
                "asset": "models/space_key.glb",
                "clip_name": "space_key.Action",
                "position": [0.0, 0.0, 0.0],
                "light": { "color": 16776960, "intensity": 50.0, "distance": 0.0, "decay": 2.5, "position": [0.0, 1.0, 0.0] },
                "fly_threshold": 2.0,
                "destination": "https://example.com/"
            }]
        }"#,
    )?;

    assert_eq!(config.keys.len(), 1);
    let key = &config.keys[0];
    assert_eq!(key.id, KeyId::Space);
    assert!(key.spotlight.is_none());
    assert_eq!(key.light.color, 0xffff00);
    Ok(())
}

#[test]
fn config_serializes_back() -> anyhow::Result<()> {
    let config = LandingConfig::default();
    let json = serde_json::to_string(&config)?;
    assert!(json.contains("\"enter\""));
    assert_eq!(LandingConfig::from_json_str(&json)?, config);
    Ok(())
}

fn invalid(json: &str) -> String {
    match LandingConfig::from_json_str(json) {
        Err(KeyportalError::InvalidConfig(message)) => message,
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn rejects_bad_camera() {
    assert!(invalid(r#"{ "camera": { "fov": 0.0 } }"#).contains("fov"));
    assert!(invalid(r#"{ "camera": { "fov": 180.0 } }"#).contains("fov"));
    assert!(invalid(r#"{ "camera": { "near": 10.0, "far": 5.0 } }"#).contains("near"));
}

#[test]
fn rejects_bad_fly_away() {
    assert!(invalid(r#"{ "fly_away": { "fov_lerp": 1.5 } }"#).contains("fov_lerp"));
}

#[test]
fn rejects_duplicate_and_negative_keys() {
    let mut config = LandingConfig::default();
    config.keys.push(config.keys[0].clone());
    assert!(matches!(config.validate(), Err(KeyportalError::InvalidConfig(_))));

    let mut config = LandingConfig::default();
    config.keys[1].fly_threshold = -1.0;
    assert!(matches!(config.validate(), Err(KeyportalError::InvalidConfig(m)) if m.contains("F1")));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        LandingConfig::from_json_str("{ not json"),
        Err(KeyportalError::JsonError(_))
    ));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let config = LandingConfig::load_or_default("/definitely/not/here/keyportal.json");
    assert_eq!(config, LandingConfig::default());
}
