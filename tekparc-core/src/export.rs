/**
 * EXPORT PDF - Orchestration invite de destination → rastérisation → écriture
 *
 * RÔLE :
 * Transforme un document HTML rendu en fichier PDF sur disque. L'invite de
 * sauvegarde et le moteur de rastérisation sont des collaborateurs injectés
 * via traits : l'application branche l'invite interactive et un Chromium
 * headless, les tests branchent des doublures.
 *
 * L'annulation par l'utilisateur est une issue normale, distincte de l'échec.
 * La surface de rendu est relâchée sur tous les chemins de sortie, y compris
 * en erreur (répertoire temporaire détruit à la sortie de portée).
 */

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("aucun moteur PDF disponible : {0}")]
    EngineUnavailable(String),
    #[error("échec du moteur PDF : {0}")]
    Engine(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options de pagination transmises au moteur. A4, marges nulles, fonds
/// imprimés : le contrat du document de rapport.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub paper_size: String,
    pub margins_mm: u32,
    pub print_background: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            paper_size: "A4".to_string(),
            margins_mm: 0,
            print_background: true,
        }
    }
}

/// Invite de choix de la destination du fichier.
/// `Ok(None)` signifie que l'utilisateur a annulé.
pub trait SavePrompt {
    fn choose_destination(&self, suggested_name: &str) -> Result<Option<PathBuf>, ExportError>;
}

/// Capacité de rastérisation HTML → octets PDF.
#[allow(async_fn_in_trait)]
pub trait PdfEngine {
    async fn render(&self, html: &str, options: &PageOptions) -> Result<Vec<u8>, ExportError>;
}

/// Issue tri-valuée d'un export : réussi, annulé, ou échoué.
#[derive(Debug)]
pub enum ExportOutcome {
    Saved { file_path: PathBuf },
    Cancelled,
    Failed { error: String },
}

/// Nom de fichier proposé par défaut, dérivé du client et de la date.
pub fn suggested_filename(client_id: &str, date: &str) -> String {
    format!("rapport_{client_id}_{date}.pdf")
}

pub struct PdfExporter<E, P> {
    engine: E,
    prompt: P,
    options: PageOptions,
}

impl<E: PdfEngine, P: SavePrompt> PdfExporter<E, P> {
    pub fn new(engine: E, prompt: P) -> Self {
        Self {
            engine,
            prompt,
            options: PageOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PageOptions) -> Self {
        self.options = options;
        self
    }

    /// Chaîne complète : invite → rastérisation → écriture. Les échecs de
    /// rastérisation et d'écriture sont capturés et remontés en `Failed`,
    /// jamais propagés en panique.
    pub async fn export(&self, html: &str, suggested_name: &str) -> ExportOutcome {
        let destination = match self.prompt.choose_destination(suggested_name) {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::info!("export annulé par l'utilisateur");
                return ExportOutcome::Cancelled;
            }
            Err(e) => return ExportOutcome::Failed { error: e.to_string() },
        };

        let bytes = match self.engine.render(html, &self.options).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "rastérisation PDF échouée");
                return ExportOutcome::Failed { error: e.to_string() };
            }
        };

        match tokio::fs::write(&destination, &bytes).await {
            Ok(()) => {
                tracing::info!(path = %destination.display(), "PDF exporté");
                ExportOutcome::Saved { file_path: destination }
            }
            Err(e) => {
                tracing::error!(path = %destination.display(), error = %e, "écriture du PDF échouée");
                ExportOutcome::Failed { error: e.to_string() }
            }
        }
    }
}

/// Moteur de rastérisation fondé sur un Chromium headless piloté en
/// sous-processus. Le HTML est posé dans un répertoire temporaire qui tient
/// lieu de surface hors écran : sa destruction en sortie de fonction libère
/// la surface sur tous les chemins, succès comme échec.
pub struct ChromiumEngine {
    binary: Option<PathBuf>,
}

impl ChromiumEngine {
    const CANDIDATES: [&'static str; 4] =
        ["chromium", "chromium-browser", "google-chrome", "chrome"];

    pub fn new() -> Self {
        Self { binary: None }
    }

    /// Force un binaire précis (configuration) au lieu de la détection PATH.
    pub fn with_binary<P: Into<PathBuf>>(mut self, binary: P) -> Self {
        self.binary = Some(binary.into());
        self
    }

    fn locate_binary(&self) -> Result<PathBuf, ExportError> {
        if let Some(binary) = &self.binary {
            return Ok(binary.clone());
        }
        for name in Self::CANDIDATES {
            if let Some(path) = find_in_path(name) {
                return Ok(path);
            }
        }
        Err(ExportError::EngineUnavailable(format!(
            "aucun binaire parmi {:?} dans le PATH",
            Self::CANDIDATES
        )))
    }
}

impl Default for ChromiumEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

impl PdfEngine for ChromiumEngine {
    async fn render(&self, html: &str, options: &PageOptions) -> Result<Vec<u8>, ExportError> {
        let binary = self.locate_binary()?;

        // Surface hors écran ; détruite au drop, même en erreur.
        let workdir = tempfile::tempdir()?;
        let page_path = workdir.path().join("rapport.html");
        tokio::fs::write(&page_path, html).await?;
        let output_path = workdir.path().join("rapport.pdf");

        tracing::debug!(
            binary = %binary.display(),
            paper = %options.paper_size,
            margins_mm = options.margins_mm,
            print_background = options.print_background,
            "lancement du rendu headless"
        );

        // Le format papier et les marges sont portés par la règle @page du
        // document ; --no-pdf-header-footer supprime l'habillage du moteur.
        let output = Command::new(&binary)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output_path.display()))
            .arg(format!("file://{}", page_path.display()))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(ExportError::Engine(format!(
                "{} a terminé avec {} : {}",
                binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let bytes = tokio::fs::read(&output_path)
            .await
            .map_err(|e| ExportError::Engine(format!("aucun PDF produit : {e}")))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FixedPrompt {
        destination: Option<PathBuf>,
    }

    impl SavePrompt for FixedPrompt {
        fn choose_destination(&self, _suggested: &str) -> Result<Option<PathBuf>, ExportError> {
            Ok(self.destination.clone())
        }
    }

    struct EchoEngine {
        fail_with: Option<String>,
        seen_options: Mutex<Option<PageOptions>>,
    }

    impl EchoEngine {
        fn new() -> Self {
            Self { fail_with: None, seen_options: Mutex::new(None) }
        }

        fn failing(message: &str) -> Self {
            Self { fail_with: Some(message.to_string()), seen_options: Mutex::new(None) }
        }
    }

    impl PdfEngine for EchoEngine {
        async fn render(&self, html: &str, options: &PageOptions) -> Result<Vec<u8>, ExportError> {
            *self.seen_options.lock() = Some(options.clone());
            match &self.fail_with {
                Some(message) => Err(ExportError::Engine(message.clone())),
                None => Ok(html.as_bytes().to_vec()),
            }
        }
    }

    #[tokio::test]
    async fn export_writes_bytes_to_chosen_path() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("rapport.pdf");
        let exporter = PdfExporter::new(
            EchoEngine::new(),
            FixedPrompt { destination: Some(destination.clone()) },
        );

        let outcome = exporter.export("<html>doc</html>", "rapport_a_2024-03-15.pdf").await;
        match outcome {
            ExportOutcome::Saved { file_path } => {
                assert_eq!(file_path, destination);
                assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "<html>doc</html>");
            }
            other => panic!("attendu Saved, obtenu {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancellation_is_not_a_failure() {
        let exporter = PdfExporter::new(EchoEngine::new(), FixedPrompt { destination: None });
        let outcome = exporter.export("<html></html>", "x.pdf").await;
        assert!(matches!(outcome, ExportOutcome::Cancelled));
    }

    #[tokio::test]
    async fn engine_failure_surfaces_as_failed_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PdfExporter::new(
            EchoEngine::failing("surface indisponible"),
            FixedPrompt { destination: Some(dir.path().join("x.pdf")) },
        );
        let outcome = exporter.export("<html></html>", "x.pdf").await;
        match outcome {
            ExportOutcome::Failed { error } => assert!(error.contains("surface indisponible")),
            other => panic!("attendu Failed, obtenu {other:?}"),
        }
        assert!(!dir.path().join("x.pdf").exists());
    }

    #[tokio::test]
    async fn default_page_options_reach_the_engine() {
        let dir = tempfile::tempdir().unwrap();
        let engine = EchoEngine::new();
        let exporter = PdfExporter::new(
            engine,
            FixedPrompt { destination: Some(dir.path().join("x.pdf")) },
        );
        exporter.export("<html></html>", "x.pdf").await;
        let seen = exporter.engine.seen_options.lock().clone().unwrap();
        assert_eq!(seen.paper_size, "A4");
        assert_eq!(seen.margins_mm, 0);
        assert!(seen.print_background);
    }

    #[test]
    fn suggested_filename_combines_client_and_date() {
        assert_eq!(
            suggested_filename("mairie-champeix", "2024-03-15"),
            "rapport_mairie-champeix_2024-03-15.pdf"
        );
    }

    #[test]
    fn forced_binary_bypasses_path_lookup() {
        let engine = ChromiumEngine::new().with_binary("/opt/chromium/chrome");
        assert_eq!(engine.locate_binary().unwrap(), PathBuf::from("/opt/chromium/chrome"));
    }
}
