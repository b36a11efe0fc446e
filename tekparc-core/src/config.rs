use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration de l'application, chargée depuis un fichier YAML optionnel.
/// Tout champ absent retombe sur sa valeur par défaut.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Répertoire des données persistantes (magasin JSON)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Racine prioritaire des ressources (gabarits, logo)
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    /// Binaire Chromium forcé pour l'export PDF
    #[serde(default)]
    pub chromium_bin: Option<PathBuf>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("tekparc"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            assets_dir: None,
            chromium_bin: None,
        }
    }
}

impl AppConfig {
    /// Chemin du fichier magasin au sein du répertoire de données.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("tekparc.json")
    }
}

pub async fn load_config() -> AppConfig {
    let path = std::env::var("TEKPARC_CONFIG").unwrap_or_else(|_| "tekparc.yaml".into());
    if Path::new(&path).exists() {
        let txt = fs::read_to_string(&path).await.unwrap_or_default();
        if txt.trim().is_empty() {
            return AppConfig::default();
        }
        serde_yaml::from_str(&txt).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "config invalide, valeurs par défaut utilisées");
            AppConfig::default()
        })
    } else {
        AppConfig::default()
    }
}
