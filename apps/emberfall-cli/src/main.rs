use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;

use emberfall_assets::ModelAsset;
use emberfall_common::EntityId;
use emberfall_input::Action;
use emberfall_kernel::{Catalog, Entity, GameConfig, PlayerStats, VisualBackend, World, WorldEvent};
use emberfall_render::{DebugTextRenderer, HeadlessBackend, IsoCamera, Renderer};
use emberfall_scenes::{CharacterCreateScene, SceneManager, SceneName, Session};
use emberfall_tools::WorldInspector;

/// Stand-in hero model with the two clips the controller asks for.
const HERO_GLTF: &str = r#"{
    "meshes": [{ "name": "Hero" }],
    "animations": [{ "name": "idle" }, { "name": "walk" }]
}"#;

const DEFAULT_CATALOG: &str = include_str!("../data/catalog.yaml");

#[derive(Parser)]
#[command(name = "emberfall-cli", about = "CLI tool for the emberfall game core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML game config; defaults apply for anything missing
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective configuration
    Info,
    /// Click somewhere and walk the player there headlessly
    Walk {
        #[arg(long, default_value = "10", allow_hyphen_values = true)]
        x: f32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        z: f32,
        /// Maximum number of ticks to run
        #[arg(short, long, default_value = "120")]
        ticks: u32,
        /// Seconds per tick
        #[arg(long, default_value = "0.016")]
        dt: f32,
        /// glTF (JSON) model to load for the player instead of the built-in one
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Walk the scene shell from the main menu into the world
    Scenes {
        #[arg(long, default_value = "human")]
        race: String,
        #[arg(long, default_value = "warrior")]
        class: String,
        /// YAML race/class catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("emberfall-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "movement: stop_threshold={} rotation_speed={}",
                config.movement.stop_threshold, config.movement.rotation_speed
            );
            println!(
                "camera: radius={} [{}, {}] follow_lerp={}",
                config.camera.radius,
                config.camera.min_radius,
                config.camera.max_radius,
                config.camera.follow_lerp
            );
            println!(
                "world: ground={} size={} despawn_delay={}s",
                config.world.ground_name,
                config.world.ground_size,
                config.world.monster_despawn_delay
            );
        }
        Commands::Walk {
            x,
            z,
            ticks,
            dt,
            model,
        } => walk(config, x, z, ticks, dt, model)?,
        Commands::Scenes {
            race,
            class,
            catalog,
        } => {
            let catalog = match catalog {
                Some(path) => Catalog::load(&path)
                    .with_context(|| format!("loading catalog {}", path.display()))?,
                None => Catalog::from_yaml_str(DEFAULT_CATALOG).context("built-in catalog")?,
            };
            scenes(Session::new(config, catalog), &race, &class)?;
        }
    }

    Ok(())
}

fn walk(
    config: GameConfig,
    x: f32,
    z: f32,
    ticks: u32,
    dt: f32,
    model: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut visuals = HeadlessBackend::new();
    let mut world = World::new(config.clone());
    let mut camera = IsoCamera::new(&config.camera);

    let player = world.spawn(
        Entity::player(PlayerStats::default(), &config.movement).at(Vec3::ZERO),
        &mut visuals,
    );
    world.install_move_target();
    attach_player_model(&mut world, player, model, &mut visuals)?;

    world.set_move_target(x, z);
    println!("Walk: target=({x:.2}, {z:.2}) ticks<={ticks} dt={dt}");

    let mut ran = 0;
    for _ in 0..ticks {
        world.tick(dt, &mut visuals);
        ran += 1;
        if let Some(p) = world.player_position() {
            camera.follow_default(p);
        }
        if world.move_target().is_some_and(|t| !t.has_target) {
            break;
        }
    }

    println!("{}", WorldInspector::summary(&world));
    print!("{}", DebugTextRenderer::new().render(&world, &camera.view()));
    if let Some(info) = WorldInspector::inspect_entity(&world, player) {
        println!("{info}");
    }
    let arrived = world
        .events()
        .iter()
        .any(|e| matches!(e, WorldEvent::Arrived { .. }));
    tracing::debug!(ticks = ran, arrived, "walk finished");
    println!(
        "{} after {ran} ticks",
        if arrived { "Arrived" } else { "Still walking" }
    );
    Ok(())
}

/// Load the player's model through the world's loader so a failure falls
/// back the same way it would in game.
fn attach_player_model(
    world: &mut World,
    player: EntityId,
    model: Option<PathBuf>,
    visuals: &mut dyn VisualBackend,
) -> anyhow::Result<()> {
    match model {
        Some(path) => {
            world.request_model(player, path.display().to_string());
            let attached = world.resolve_loads_from_disk(visuals);
            println!("Model {}: attached={attached}", path.display());
        }
        None => {
            let hero = ModelAsset::from_gltf_json("hero", HERO_GLTF).context("built-in model")?;
            if let Some(ticket) = world.request_model(player, "builtin:hero") {
                world.complete_load(ticket, Ok(hero), visuals);
            }
        }
    }
    Ok(())
}

fn scenes(session: Session, race: &str, class: &str) -> anyhow::Result<()> {
    let mut visuals = HeadlessBackend::new();
    let mut manager = SceneManager::standard(session);

    manager.switch_to(SceneName::MainMenu, &mut visuals)?;
    for action in [
        Action::Confirm,
        Action::SelectRace(race.to_owned()),
        Action::SelectClass(class.to_owned()),
    ] {
        manager.dispatch(&action, &mut visuals)?;
    }
    if let Some(preview) = CharacterCreateScene::preview(manager.session()) {
        println!("Preview {race} {class}:");
        for (label, value) in preview {
            println!("  {label:<12} {value}");
        }
    }

    manager.dispatch(&Action::Confirm, &mut visuals)?;
    if manager.current_name() != Some(SceneName::World) {
        anyhow::bail!("unknown race {race:?} or class {class:?}");
    }
    println!("Scene: {:?}", manager.current_name());

    let ground = manager.session().config.world.ground_name.clone();
    manager.dispatch(&Action::click(ground, Vec3::new(3.0, 0.0, 4.0)), &mut visuals)?;
    for _ in 0..120 {
        manager.frame(1.0 / 60.0, &mut visuals)?;
    }
    if let Some(world) = manager.current().and_then(|s| s.world()) {
        println!("{}", WorldInspector::summary(world));
        print!("{}", DebugTextRenderer::new().render(world, &Default::default()));
    }

    manager.dispatch(&Action::Back, &mut visuals)?;
    println!("Scene: {:?} (visuals left: {})", manager.current_name(), visuals.len());
    manager.dispose(&mut visuals);
    Ok(())
}
