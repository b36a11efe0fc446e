/**
 * RECORD STORE - Persistance clé/valeur des collections Tekparc
 *
 * RÔLE :
 * Magasin unique pour les espaces de noms "clients" et "reports" : chaque
 * espace contient une séquence ordonnée d'enregistrements JSON.
 *
 * FONCTIONNEMENT :
 * - Stockage en fichier JSON unique (objet espace → tableau)
 * - Cache mémoire chargé à l'ouverture, réécrit intégralement à chaque set
 * - Aucune transaction inter-espaces : les rapports ne référencent les
 *   clients que par id et tolèrent les références pendantes
 *
 * Modèle mono-écrivain : chaque mutation relit/réécrit l'espace entier,
 * deux processus concurrents se verraient en dernier-écrit-gagnant.
 */

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Erreurs possibles lors des opérations sur le magasin
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

type Namespaces = BTreeMap<String, Vec<Value>>;

/// Magasin persistant : espaces de noms → séquences d'enregistrements.
pub struct RecordStore {
    /// Chemin du fichier de stockage JSON
    path: PathBuf,
    /// Cache mémoire des espaces de noms
    cache: Mutex<Namespaces>,
}

impl RecordStore {
    /// Ouvre le magasin, en créant le fichier vide au premier lancement.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            cache: Mutex::new(Namespaces::new()),
        };
        store.load_from_disk()?;
        tracing::info!(path = %store.path.display(), "record store initialized");
        Ok(store)
    }

    /// Charge les espaces de noms depuis le fichier vers le cache mémoire.
    fn load_from_disk(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&self.path, "{}")?;
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(());
        }
        let namespaces: Namespaces = serde_json::from_str(&content)?;

        *self.cache.lock() = namespaces;
        Ok(())
    }

    /// Réécrit l'intégralité du fichier depuis le cache.
    fn save_to_disk(&self) -> Result<(), StoreError> {
        let cache = self.cache.lock();
        let json = serde_json::to_string_pretty(&*cache)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Contenu complet d'un espace, vide si l'espace n'existe pas encore.
    pub fn get(&self, namespace: &str) -> Vec<Value> {
        self.cache.lock().get(namespace).cloned().unwrap_or_default()
    }

    /// Remplace l'espace entier et le flush sur disque.
    pub fn set(&self, namespace: &str, records: Vec<Value>) -> Result<(), StoreError> {
        self.cache.lock().insert(namespace.to_string(), records);
        self.save_to_disk()
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.cache.lock().contains_key(namespace)
    }

    /// Lecture typée d'un espace via serde.
    pub fn get_as<T: DeserializeOwned>(&self, namespace: &str) -> Result<Vec<T>, StoreError> {
        self.get(namespace)
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }

    /// Écriture typée d'un espace via serde.
    pub fn set_as<T: Serialize>(&self, namespace: &str, records: &[T]) -> Result<(), StoreError> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.set(namespace, values)
    }
}
