use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};
use log::info;

use opengl_sandbox::app::SandboxApp;
use opengl_sandbox::config::AppConfig;
use opengl_sandbox::logging::{self, APP};

const DEFAULT_CONFIG: &str = "sandbox.toml";

fn main() -> Result<()> {
    logging::init();
    info!(target: APP, "Démarrage d'OpenGL Sandbox v{}", opengl_sandbox::VERSION);

    // Traitement simple des arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let mut config_path = PathBuf::from(DEFAULT_CONFIG);
    let mut assets_dir: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => match iter.next() {
                Some(path) => config_path = PathBuf::from(path),
                None => bail!("--config attend un chemin"),
            },
            "--assets" => match iter.next() {
                Some(dir) => assets_dir = Some(PathBuf::from(dir)),
                None => bail!("--assets attend un répertoire"),
            },
            other => bail!("Argument inconnu : {}", other),
        }
    }

    let mut config = AppConfig::load_or_default(&config_path);
    if let Some(dir) = assets_dir {
        config.assets.root = dir;
    }

    SandboxApp::new(config).run()
}
