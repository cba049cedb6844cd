use std::fs;

use glam::Vec2;
use skill_core::{CollisionMask, EntityId, SimEvent, SkillConfig};
use skill_runtime::{ActorSpec, RuntimeConfig, ScriptedInput, Simulation};
use tempfile::TempDir;

const CONFIG: &str = "defense_k = 50.0\natk_a = 0.5\n";

const CATALOG: &str = r#"(
    templates: [],
    skills: [
        (
            kind: Normal, rank: 1, family_serial: 9,
            name: "Jab",
            hit_type: Single,
            base_damage: 55.0,
            range: 5.0,
        ),
    ],
    groups: [(name: "melee", skills: [Some("N01-0009")])],
)"#;

fn files() -> (TempDir, RuntimeConfig) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    let catalog_path = dir.path().join("skills.ron");
    fs::write(&config_path, CONFIG).expect("write config");
    fs::write(&catalog_path, CATALOG).expect("write catalog");

    let config = RuntimeConfig {
        config_path: Some(config_path),
        catalog_path: Some(catalog_path),
        ..RuntimeConfig::default()
    };
    (dir, config)
}

#[test]
fn skill_config_is_read_from_configured_path() {
    let (_dir, runtime) = files();

    let config = runtime.load_skill_config().unwrap();

    assert_eq!(config.defense_k, 50.0);
    assert_eq!(config.atk_a, 0.5);
    assert_eq!(config.k_tech, SkillConfig::DEFAULT_K_TECH);
}

#[test]
fn missing_configured_file_is_an_error() {
    let (dir, mut runtime) = files();
    runtime.config_path = Some(dir.path().join("absent.toml"));

    let err = runtime.load_skill_config().unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn loaded_files_drive_a_simulation() {
    let (_dir, runtime) = files();
    let config = runtime.load_skill_config().unwrap();
    let catalog = runtime.load_catalog().unwrap();
    assert!(catalog.library.skill("N01-0009").is_some());

    let mut sim = Simulation::new(config, catalog.library.clone(), runtime.pooling);
    sim.add_actor(ActorSpec::new(
        EntityId::PLAYER,
        "Player",
        CollisionMask::PLAYER,
        Vec2::ZERO,
    ))
    .unwrap();
    sim.add_actor(ActorSpec::new(
        EntityId(1),
        "Dummy",
        CollisionMask::ENEMY,
        Vec2::new(2.0, 0.0),
    ))
    .unwrap();
    sim.attach_caster(
        EntityId::PLAYER,
        CollisionMask::PLAYER,
        Box::new(ScriptedInput::new(Vec2::X).cast_at(1, 0)),
    )
    .unwrap();
    sim.equip_groups(EntityId::PLAYER, &catalog, &["melee"])
        .unwrap();

    let events: Vec<_> = (0..10).flat_map(|_| sim.tick(runtime.frame_dt())).collect();

    // 55 + 10 · 0.5 = 60 raw; 60 · 50 / (50 + 10) = 50.
    let dealt: Vec<f32> = events
        .iter()
        .filter_map(|event| match event {
            SimEvent::DamageApplied { target, amount, .. } if *target == EntityId(1) => {
                Some(*amount)
            }
            _ => None,
        })
        .collect();
    assert_eq!(dealt.len(), 1);
    assert!((dealt[0] - 50.0).abs() < 1e-3);
}
