//! Initialisation de la journalisation
//!
//! Deux cibles nommées séparent les messages du moteur (`core`) de ceux de
//! l'application (`app`). `RUST_LOG` reste prioritaire sur le niveau par
//! défaut.

use std::io::Write;

use env_logger::{Builder, Env};

/// Cible des messages émis par le moteur (shaders, textures, géométrie)
pub const CORE: &str = "core";

/// Cible des messages émis par l'application de démonstration
pub const APP: &str = "app";

/// Niveau par défaut : tout pour nos deux cibles, avertissements seulement
/// pour les dépendances (winit, glutin...)
pub const DEFAULT_FILTER: &str = "warn,core=trace,app=trace";

/// Installe le logger global ; les appels suivants sont ignorés
pub fn init() {
    let _ = builder().try_init();
}

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "[{}] {style}{:<5}{style:#} {}: {}",
            buf.timestamp_seconds(),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder
}
