/**
 * RENDU DES RAPPORTS - Gabarits HTML par substitution de jetons
 *
 * RÔLE :
 * Produit le document HTML final d'un rapport : résolution de la variante
 * (générique ou SMS), substitution des jetons {{...}} du gabarit, assemblage
 * des fragments synthèse/détails poste par poste.
 *
 * FONCTIONNEMENT :
 * - Contexte de rendu fortement typé : un champ par jeton du contrat de
 *   gabarit, chaque jeton remplacé globalement en une passe
 * - Sections tablettes/observations générales injectées pour la variante SMS,
 *   effacées (contenu vide) pour les autres : un seul gabarit statique par
 *   variante
 * - Document autonome : logo inliné en base64, aucune référence externe
 */

use crate::assets::AssetLocator;
use crate::models::{
    parse_report_date, CheckState, Client, MaintenanceReport, TemplateVariant, WorkstationReport,
};
use std::path::PathBuf;

/// Nom affiché quand le client référencé par un rapport n'existe plus.
pub const SENTINEL_CLIENT_NAME: &str = "Client inconnu";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("gabarit introuvable pour la variante {variant:?} (cherché dans {searched:?})")]
    TemplateNotFound {
        variant: TemplateVariant,
        searched: Vec<PathBuf>,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Contexte de rendu : un champ par jeton du contrat de gabarit.
/// Élimine les jetons orphelins ou dupliqués à la substitution.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub client_name: String,
    pub date: String,
    pub technician: String,
    pub logo_base64: String,
    pub summary_list: String,
    pub details_content: String,
    pub tablets_section: String,
    pub observations_section: String,
}

impl RenderContext {
    fn substitutions(&self) -> [(&'static str, &str); 8] {
        [
            ("{{CLIENT_NAME}}", &self.client_name),
            ("{{DATE}}", &self.date),
            ("{{TECHNICIAN}}", &self.technician),
            ("{{LOGO_BASE64}}", &self.logo_base64),
            ("{{SUMMARY_LIST}}", &self.summary_list),
            ("{{DETAILS_CONTENT}}", &self.details_content),
            ("{{TABLETS_SECTION}}", &self.tablets_section),
            ("{{OBSERVATIONS_SECTION}}", &self.observations_section),
        ]
    }

    /// Remplace chaque jeton partout où il apparaît dans le gabarit.
    pub fn apply(&self, template: &str) -> String {
        let mut html = template.to_string();
        for (token, value) in self.substitutions() {
            html = html.replace(token, value);
        }
        html
    }
}

pub struct TemplateRenderer {
    assets: AssetLocator,
}

impl TemplateRenderer {
    pub fn new(assets: AssetLocator) -> Self {
        Self { assets }
    }

    /// Rend le document HTML complet d'un rapport. Un client introuvable
    /// (référence pendante) est rendu sous le nom sentinelle, jamais en échec.
    pub fn render(
        &self,
        report: &MaintenanceReport,
        client: Option<&Client>,
    ) -> Result<String, RenderError> {
        let variant = client.map(Client::variant).unwrap_or(TemplateVariant::Generique);
        let template = self.assets.load_template(variant)?;
        let context = self.build_context(report, client, variant);
        Ok(context.apply(&template))
    }

    fn build_context(
        &self,
        report: &MaintenanceReport,
        client: Option<&Client>,
        variant: TemplateVariant,
    ) -> RenderContext {
        let client_name = client
            .map(|c| c.name.clone())
            .unwrap_or_else(|| SENTINEL_CLIENT_NAME.to_string());

        let mut summary_list = String::new();
        let mut details_content = String::new();
        for ws in &report.workstations {
            summary_list.push_str(&summary_item(ws));
            details_content.push_str(&detail_block(ws, variant));
        }

        let (tablets_section, observations_section) = match variant {
            TemplateVariant::Sms => (
                tablets_section(report.tablets_check),
                observations_section(report.global_observations.as_deref()),
            ),
            // Jetons effacés pour les autres variantes
            TemplateVariant::Generique => (String::new(), String::new()),
        };

        RenderContext {
            client_name,
            date: display_date(&report.date),
            technician: report.technician.clone(),
            logo_base64: self.assets.load_logo_base64(),
            summary_list,
            details_content,
            tablets_section,
            observations_section,
        }
    }
}

/// Date ISO stockée → affichage jj/mm/aaaa, chaîne brute si non décodable.
fn display_date(iso: &str) -> String {
    match parse_report_date(iso) {
        Ok(date) => date
            .format(time::macros::format_description!("[day]/[month]/[year]"))
            .unwrap_or_else(|_| iso.to_string()),
        Err(_) => iso.to_string(),
    }
}

fn summary_item(ws: &WorkstationReport) -> String {
    format!(
        "<li><span class=\"ws-name\">{}</span> &middot; Disque : {}, Antivirus : {}</li>\n",
        ws.workstation_name,
        ws.hdd_health.label(),
        ws.antivirus.label()
    )
}

fn detail_block(ws: &WorkstationReport, variant: TemplateVariant) -> String {
    let mut rows = String::new();
    push_row(&mut rows, "Connexion NAS", if ws.nas_access { "OK" } else { "HS" });
    push_row(
        &mut rows,
        "Windows Updates",
        if ws.windows_updates { "Faites" } else { "En attente" },
    );
    push_row(&mut rows, "Santé Disque Dur", ws.hdd_health.label());
    push_row(&mut rows, "Heures HDD", &hdd_hours_label(ws.hdd_hours));
    push_row(&mut rows, "Services Office", if ws.office_access { "OK" } else { "Erreur" });
    push_row(&mut rows, "Journal Évènements", if ws.event_logs { "RAS" } else { "Erreurs" });
    push_row(&mut rows, "Antivirus", ws.antivirus.label());
    if variant == TemplateVariant::Sms {
        push_row(&mut rows, "Sauvegardes VEEAM", tri_label(ws.veeam_backup));
    }
    if !ws.rdx_check.is_not_checked() {
        push_row(&mut rows, "Sauvegarde RDX", tri_label(ws.rdx_check));
    }

    let observations = match ws.observations.as_deref() {
        Some(text) if !text.trim().is_empty() => {
            format!("<p class=\"ws-observations\">Observations : {text}</p>\n")
        }
        _ => String::new(),
    };

    format!(
        "<div class=\"ws-detail\">\n<h3>{}</h3>\n<table class=\"checks\">\n{}</table>\n{}</div>\n",
        ws.workstation_name, rows, observations
    )
}

fn push_row(rows: &mut String, label: &str, value: &str) {
    rows.push_str(&format!(
        "<tr><td>{label}</td><td class=\"value\">{value}</td></tr>\n"
    ));
}

/// "<n> H" quand renseigné et non nul, sinon "Non renseigné".
/// Zéro vaut absent : comportement historique conservé tel quel.
fn hdd_hours_label(hours: Option<u32>) -> String {
    match hours {
        Some(h) if h > 0 => format!("{h} H"),
        _ => "Non renseigné".to_string(),
    }
}

fn tri_label(state: CheckState) -> &'static str {
    match state {
        CheckState::Ok => "OK",
        CheckState::Failed => "Échec",
        CheckState::NotChecked => "Non vérifié",
    }
}

fn tablets_section(state: CheckState) -> String {
    let label = match state {
        CheckState::Ok => "Vérifiées",
        CheckState::Failed => "Non vérifiées",
        CheckState::NotChecked => "Non vérifié",
    };
    format!(
        "<div class=\"tablets-section\">\n<h2>Vérification des tablettes (Atelier)</h2>\n<p>{label}</p>\n</div>\n"
    )
}

fn observations_section(text: Option<&str>) -> String {
    match text {
        Some(t) if !t.trim().is_empty() => format!(
            "<div class=\"global-observations\">\n<h2>Observations générales</h2>\n<p>{t}</p>\n</div>\n"
        ),
        _ => String::new(),
    }
}
