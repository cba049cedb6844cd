//! Scripted encounter harness.
//!
//! Loads formula constants and the skill catalog (built-ins unless
//! `SKILL_SIM_CONFIG` / `SKILL_SIM_CATALOG` point elsewhere), then runs a
//! fixed-step fight between a player and a few targets and logs the outcome.
//!
//! ```bash
//! RUST_LOG=debug SKILL_SIM_FPS=30 cargo run -p skill-runtime --bin skill-sim
//! ```

use anyhow::Result;
use glam::Vec2;
use skill_core::{CollisionMask, EntityId, StatKind, StatVector, Vitals};
use skill_runtime::{ActorSpec, RuntimeConfig, ScriptedInput, Simulation, TracingHud};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let config = RuntimeConfig::from_env();
    tracing::info!(
        fps = config.fps,
        seconds = config.seconds,
        pooling = config.pooling,
        "starting skill simulation"
    );

    let skill_config = config.load_skill_config()?;
    let catalog = config.load_catalog()?;
    tracing::info!(
        skills = catalog.library.skill_count(),
        templates = catalog.library.template_count(),
        "content loaded"
    );

    let mut sim = Simulation::new(skill_config, catalog.library.clone(), config.pooling);
    populate(&mut sim, &catalog)?;

    let dt = config.frame_dt();
    for _ in 0..config.frame_count() {
        sim.tick(dt);
    }

    for applier in sim.combatants().iter() {
        tracing::info!(
            entity = %applier.id,
            name = %applier.display_name,
            hp = applier.vitals.hp.current(),
            mp = applier.vitals.mp.current(),
            "final vitals"
        );
    }
    tracing::info!(
        frames = sim.frame(),
        live_volumes = sim.arena().live_count(),
        pooled_volumes = sim.arena().pooled_count(),
        "simulation finished"
    );
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// One player facing three goblins behind a pillar.
fn populate(sim: &mut Simulation, catalog: &skill_content::LoadedCatalog) -> Result<()> {
    let player_stats = StatVector::default()
        .with(StatKind::Attack, 40.0)
        .with(StatKind::Technique, 20.0)
        .with(StatKind::Agility, 10.0);
    sim.add_actor(
        ActorSpec::new(EntityId::PLAYER, "Player", CollisionMask::PLAYER, Vec2::ZERO)
            .with_stats(player_stats)
            .with_vitals(Vitals::full(200.0, 150.0)),
    )?;

    let goblins = [
        (EntityId(1), Vec2::new(6.0, 0.0)),
        (EntityId(2), Vec2::new(2.5, 0.6)),
        (EntityId(3), Vec2::new(1.5, -0.9)),
    ];
    for (id, position) in goblins {
        sim.add_actor(
            ActorSpec::new(id, format!("Goblin {}", id.0), CollisionMask::ENEMY, position)
                .with_radius(0.4)
                .with_stats(StatVector::default().with(StatKind::Defense, 5.0))
                .with_vitals(Vitals::full(150.0, 0.0)),
        )?;
    }
    sim.add_obstacle(EntityId(100), Vec2::new(4.0, 2.0), 0.6);

    // offense: [Firebolt, Cleave]; utility: [Quake, Piercing Lance, Smite]
    let script = ScriptedInput::new(Vec2::X)
        .cast_at(1, 0)
        .cast_at(30, 1)
        .switch_at(60)
        .cast_at(61, 0)
        .cast_at(120, 1)
        .aim_at(150, Vec2::new(1.0, 0.4))
        .cast_at(151, 0)
        .cast_at(200, 1);
    sim.attach_caster(EntityId::PLAYER, CollisionMask::PLAYER, Box::new(script))?;
    sim.equip_groups(EntityId::PLAYER, catalog, &["offense", "utility"])?;
    sim.set_observer(EntityId::PLAYER, Box::new(TracingHud))?;
    Ok(())
}
