use serde::{Deserialize, Serialize};
use time::Date;

/// Société cliente suivie par l'application.
/// Les noms de champs JSON restent en camelCase pour compatibilité avec les
/// magasins existants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Identifiant unique et stable du client
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    /// Variante de checklist/gabarit (absent = générique)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    #[serde(default)]
    pub workstations: Vec<Workstation>,
}

impl Client {
    /// Variante de gabarit applicable à tous les rapports de ce client.
    pub fn variant(&self) -> TemplateVariant {
        TemplateVariant::from_template_type(self.template_type.as_deref())
    }
}

/// Poste de travail, possédé exclusivement par son client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workstation {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: WorkstationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkstationKind {
    Desktop,
    Laptop,
    Server,
    Other,
}

/// Variante de gabarit sélectionnée par `templateType`.
/// Toute valeur autre que "sms" (y compris absente) retombe sur le générique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVariant {
    Generique,
    Sms,
}

impl TemplateVariant {
    pub fn from_template_type(template_type: Option<&str>) -> Self {
        match template_type {
            Some("sms") => TemplateVariant::Sms,
            _ => TemplateVariant::Generique,
        }
    }

    /// Nom du fichier HTML de la variante sous `templates/`.
    pub fn asset_name(&self) -> &'static str {
        match self {
            TemplateVariant::Generique => "rapport_generique.html",
            TemplateVariant::Sms => "rapport_sms.html",
        }
    }
}

/// État tri-valué d'une vérification : fait, en échec, ou non évalué.
/// Sur le disque : `true` / `false` / champ absent (format historique).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum CheckState {
    Ok,
    Failed,
    #[default]
    NotChecked,
}

impl CheckState {
    pub fn is_not_checked(&self) -> bool {
        matches!(self, CheckState::NotChecked)
    }
}

impl From<Option<bool>> for CheckState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => CheckState::Ok,
            Some(false) => CheckState::Failed,
            None => CheckState::NotChecked,
        }
    }
}

impl From<CheckState> for Option<bool> {
    fn from(state: CheckState) -> Self {
        match state {
            CheckState::Ok => Some(true),
            CheckState::Failed => Some(false),
            CheckState::NotChecked => None,
        }
    }
}

/// Santé du disque dur relevée lors de l'intervention.
/// Les anciens magasins contiennent "Prudence" pour l'état intermédiaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HddHealth {
    Bon,
    #[serde(alias = "Prudence")]
    Mauvais,
    Critique,
}

impl HddHealth {
    pub fn label(&self) -> &'static str {
        match self {
            HddHealth::Bon => "Bon",
            HddHealth::Mauvais => "Mauvais",
            HddHealth::Critique => "Critique",
        }
    }
}

/// État de l'antivirus BitDefender sur le poste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntivirusStatus {
    RAS,
    Malware,
    Licence,
    Inactif,
    #[serde(rename = "Expiré")]
    Expire,
}

impl AntivirusStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AntivirusStatus::RAS => "RAS",
            AntivirusStatus::Malware => "Malware",
            AntivirusStatus::Licence => "Licence",
            AntivirusStatus::Inactif => "Inactif",
            AntivirusStatus::Expire => "Expiré",
        }
    }
}

/// Checklist relevée pour un poste donné.
/// `workstation_name` est capturé au moment du rapport pour que l'historique
/// reste lisible même si le poste est renommé ou supprimé ensuite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkstationReport {
    pub workstation_id: String,
    pub workstation_name: String,
    pub nas_access: bool,
    pub windows_updates: bool,
    pub hdd_health: HddHealth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdd_hours: Option<u32>,
    pub office_access: bool,
    pub event_logs: bool,
    pub antivirus: AntivirusStatus,
    /// Sauvegardes VEEAM (variante SMS uniquement)
    #[serde(default, skip_serializing_if = "CheckState::is_not_checked")]
    pub veeam_backup: CheckState,
    /// Sauvegarde RDX (parc Pascal Combes)
    #[serde(default, skip_serializing_if = "CheckState::is_not_checked")]
    pub rdx_check: CheckState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

/// Rapport d'intervention : instantané figé du parc au moment de la visite.
/// Les modifications ultérieures de la liste des postes du client ne
/// réécrivent jamais les rapports enregistrés.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceReport {
    /// Généré à l'enregistrement si absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Référence molle vers un client ; un id orphelin est toléré
    pub client_id: String,
    /// Date calendaire ISO (AAAA-MM-JJ)
    pub date: String,
    pub technician: String,
    /// Vérification des tablettes d'atelier (variante SMS uniquement)
    #[serde(default, skip_serializing_if = "CheckState::is_not_checked")]
    pub tablets_check: CheckState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_observations: Option<String>,
    #[serde(default)]
    pub workstations: Vec<WorkstationReport>,
}

/// Valide et décode une date de rapport au format ISO AAAA-MM-JJ.
pub fn parse_report_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, time::macros::format_description!("[year]-[month]-[day]"))
}
