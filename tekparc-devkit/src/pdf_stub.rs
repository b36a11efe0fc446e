//! Doublures des collaborateurs d'export : moteur PDF et invite de
//! destination. Permettent de tester la chaîne d'export sans navigateur
//! headless ni interaction utilisateur.

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tekparc_core::export::{ExportError, PageOptions, PdfEngine, SavePrompt};

/// Moteur PDF factice : capture les documents HTML reçus et retourne des
/// octets fixes, ou échoue sur demande.
#[derive(Clone)]
pub struct StubPdfEngine {
    rendered: Arc<Mutex<Vec<String>>>,
    seen_options: Arc<Mutex<Vec<PageOptions>>>,
    fail_with: Option<String>,
    bytes: Vec<u8>,
}

impl StubPdfEngine {
    pub fn new() -> Self {
        Self {
            rendered: Arc::new(Mutex::new(Vec::new())),
            seen_options: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            bytes: b"%PDF-1.4 stub".to_vec(),
        }
    }

    /// Moteur qui échoue systématiquement avec le message donné.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Documents HTML reçus, dans l'ordre des appels.
    pub fn rendered_documents(&self) -> Vec<String> {
        self.rendered.lock().clone()
    }

    /// Options de pagination vues par le moteur.
    pub fn seen_options(&self) -> Vec<PageOptions> {
        self.seen_options.lock().clone()
    }
}

impl Default for StubPdfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfEngine for StubPdfEngine {
    async fn render(&self, html: &str, options: &PageOptions) -> Result<Vec<u8>, ExportError> {
        self.seen_options.lock().push(options.clone());
        if let Some(message) = &self.fail_with {
            return Err(ExportError::Engine(message.clone()));
        }
        self.rendered.lock().push(html.to_string());
        Ok(self.bytes.clone())
    }
}

/// Invite factice : accepte toujours la même destination, ou annule.
pub struct StubSavePrompt {
    destination: Option<PathBuf>,
    suggestions: Arc<Mutex<Vec<String>>>,
}

impl StubSavePrompt {
    /// Invite qui accepte et renvoie `destination`.
    pub fn accepting<P: Into<PathBuf>>(destination: P) -> Self {
        Self {
            destination: Some(destination.into()),
            suggestions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Invite qui annule systématiquement.
    pub fn cancelling() -> Self {
        Self {
            destination: None,
            suggestions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Noms suggérés reçus, dans l'ordre des appels.
    pub fn seen_suggestions(&self) -> Vec<String> {
        self.suggestions.lock().clone()
    }
}

impl SavePrompt for StubSavePrompt {
    fn choose_destination(&self, suggested_name: &str) -> Result<Option<PathBuf>, ExportError> {
        self.suggestions.lock().push(suggested_name.to_string());
        Ok(self.destination.clone())
    }
}
