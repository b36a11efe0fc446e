//! Résolution des ressources statiques (gabarits HTML, logo).
//!
//! Les ressources sont cherchées dans une liste ordonnée de racines :
//! répertoire de config → `./assets` (développement) → à côté du binaire →
//! emplacements d'installation. Le premier fichier existant gagne.

use crate::models::TemplateVariant;
use crate::render::RenderError;
use base64::{engine::general_purpose, Engine as _};
use std::fs;
use std::path::PathBuf;

pub struct AssetLocator {
    roots: Vec<PathBuf>,
}

impl AssetLocator {
    /// Ordre de recherche standard, avec un répertoire prioritaire optionnel
    /// venant de la configuration.
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        let mut roots = Vec::new();
        if let Some(dir) = override_dir {
            roots.push(dir);
        }
        roots.push(PathBuf::from("./assets"));
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                roots.push(dir.join("assets"));
            }
        }
        roots.push(PathBuf::from("/usr/share/tekparc/assets"));
        if let Some(data) = dirs::data_local_dir() {
            roots.push(data.join("tekparc").join("assets"));
        }
        Self { roots }
    }

    /// Racine unique explicite (tests, déploiements contrôlés).
    pub fn from_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { roots: vec![root.into()] }
    }

    /// Premier chemin existant pour une ressource relative.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        self.roots.iter().map(|root| root.join(relative)).find(|p| p.exists())
    }

    /// Texte du gabarit HTML d'une variante. L'absence de tout candidat est
    /// une erreur dure : sans gabarit, rien à rendre.
    pub fn load_template(&self, variant: TemplateVariant) -> Result<String, RenderError> {
        let relative = format!("templates/{}", variant.asset_name());
        match self.resolve(&relative) {
            Some(path) => Ok(fs::read_to_string(path)?),
            None => Err(RenderError::TemplateNotFound {
                variant,
                searched: self.roots.clone(),
            }),
        }
    }

    /// Logo encodé en base64 pour inlining dans le document. Un logo absent
    /// ou illisible dégrade en chaîne vide (image vide), jamais en échec.
    pub fn load_logo_base64(&self) -> String {
        match self.resolve("logo.png") {
            Some(path) => match fs::read(&path) {
                Ok(bytes) => general_purpose::STANDARD.encode(bytes),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "logo illisible, rendu sans logo");
                    String::new()
                }
            },
            None => {
                tracing::warn!("logo introuvable, rendu sans logo");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace_assets() -> AssetLocator {
        AssetLocator::from_root(concat!(env!("CARGO_MANIFEST_DIR"), "/../assets"))
    }

    #[test]
    fn loads_both_template_variants() {
        let assets = workspace_assets();
        let generic = assets.load_template(TemplateVariant::Generique).unwrap();
        let sms = assets.load_template(TemplateVariant::Sms).unwrap();
        assert!(generic.contains("{{CLIENT_NAME}}"));
        assert!(sms.contains("{{TABLETS_SECTION}}"));
    }

    #[test]
    fn missing_template_is_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetLocator::from_root(dir.path());
        let err = assets.load_template(TemplateVariant::Generique).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound { .. }));
    }

    #[test]
    fn missing_logo_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let assets = AssetLocator::from_root(dir.path());
        assert_eq!(assets.load_logo_base64(), "");
    }

    #[test]
    fn first_existing_root_wins() {
        let primary = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(primary.path().join("templates")).unwrap();
        std::fs::write(
            primary.path().join("templates/rapport_generique.html"),
            "<html>{{CLIENT_NAME}}</html>",
        )
        .unwrap();

        let assets = AssetLocator {
            roots: vec![
                primary.path().to_path_buf(),
                PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../assets")),
            ],
        };
        let template = assets.load_template(TemplateVariant::Generique).unwrap();
        assert_eq!(template, "<html>{{CLIENT_NAME}}</html>");
    }
}
