use engine::{LoopConfig, SceneKey, Simulation};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::town;

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) sim: Simulation,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Tile Town Startup ===");

    let sim = Simulation::new(town::build_scene_pair(), SceneKey::Outside);
    let config = LoopConfig {
        window_title: "Tile Town".to_string(),
        ..LoopConfig::default()
    };

    AppWiring { config, sim }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
