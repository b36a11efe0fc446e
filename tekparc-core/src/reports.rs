//! Dépôt CRUD des rapports d'intervention sur l'espace de noms "reports".
//!
//! L'ordre retourné est l'ordre de stockage (insertion) ; l'affichage
//! du plus récent en premier est une affaire de présentation, pas du dépôt.

use crate::models::{parse_report_date, MaintenanceReport};
use crate::store::{RecordStore, StoreError};
use std::sync::Arc;
use uuid::Uuid;

pub const NS_REPORTS: &str = "reports";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("le responsable de la maintenance doit être renseigné")]
    MissingTechnician,
    #[error("date de rapport invalide `{date}`: {source}")]
    InvalidDate {
        date: String,
        #[source]
        source: time::error::Parse,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ReportRepository {
    store: Arc<RecordStore>,
}

impl ReportRepository {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Tous les rapports, ou seulement ceux d'un client donné.
    pub fn list(&self, client_id: Option<&str>) -> Result<Vec<MaintenanceReport>, StoreError> {
        let reports: Vec<MaintenanceReport> = self.store.get_as(NS_REPORTS)?;
        Ok(match client_id {
            Some(id) => reports.into_iter().filter(|r| r.client_id == id).collect(),
            None => reports,
        })
    }

    pub fn find(&self, id: &str) -> Result<Option<MaintenanceReport>, StoreError> {
        Ok(self
            .list(None)?
            .into_iter()
            .find(|report| report.id.as_deref() == Some(id)))
    }

    /// Valide puis enregistre le rapport (upsert par id). Un id absent ou
    /// vide est remplacé par un UUID fraîchement généré. Retourne l'id
    /// effectivement stocké.
    pub fn save(&self, report: &MaintenanceReport) -> Result<String, ReportError> {
        if report.technician.trim().is_empty() {
            return Err(ReportError::MissingTechnician);
        }
        parse_report_date(&report.date).map_err(|source| ReportError::InvalidDate {
            date: report.date.clone(),
            source,
        })?;

        let mut stored = report.clone();
        let id = match stored.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let fresh = Uuid::new_v4().to_string();
                stored.id = Some(fresh.clone());
                fresh
            }
        };

        let mut reports: Vec<MaintenanceReport> = self.store.get_as(NS_REPORTS)?;
        match reports.iter().position(|r| r.id.as_deref() == Some(id.as_str())) {
            Some(index) => reports[index] = stored,
            None => reports.push(stored),
        }
        self.store.set_as(NS_REPORTS, &reports)?;
        tracing::debug!(report = %id, "report saved");
        Ok(id)
    }

    /// Supprime par id ; sans effet si absent.
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut reports: Vec<MaintenanceReport> = self.store.get_as(NS_REPORTS)?;
        reports.retain(|report| report.id.as_deref() != Some(id));
        self.store.set_as(NS_REPORTS, &reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AntivirusStatus, CheckState, HddHealth, WorkstationReport};

    fn ws_report(name: &str) -> WorkstationReport {
        WorkstationReport {
            workstation_id: format!("ws-{name}"),
            workstation_name: name.into(),
            nas_access: true,
            windows_updates: true,
            hdd_health: HddHealth::Bon,
            hdd_hours: None,
            office_access: true,
            event_logs: true,
            antivirus: AntivirusStatus::RAS,
            veeam_backup: CheckState::NotChecked,
            rdx_check: CheckState::NotChecked,
            observations: None,
        }
    }

    fn report(id: Option<&str>, client_id: &str) -> MaintenanceReport {
        MaintenanceReport {
            id: id.map(Into::into),
            client_id: client_id.into(),
            date: "2024-03-15".into(),
            technician: "A. Martin".into(),
            tablets_check: CheckState::NotChecked,
            global_observations: None,
            workstations: vec![ws_report("Accueil")],
        }
    }

    fn repo() -> (tempfile::TempDir, ReportRepository) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::open(dir.path().join("store.json")).unwrap());
        (dir, ReportRepository::new(store))
    }

    #[test]
    fn save_without_id_generates_fresh_unique_id() {
        let (_dir, repo) = repo();
        let first = repo.save(&report(Some("r-existing"), "a")).unwrap();
        let generated = repo.save(&report(None, "a")).unwrap();

        assert!(!generated.is_empty());
        assert_ne!(generated, first);
        let reports = repo.list(None).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].id.as_deref(), Some(generated.as_str()));
    }

    #[test]
    fn save_upsert_replaces_in_place() {
        let (_dir, repo) = repo();
        repo.save(&report(Some("r1"), "a")).unwrap();
        repo.save(&report(Some("r2"), "b")).unwrap();

        let mut updated = report(Some("r1"), "a");
        updated.technician = "B. Dupont".into();
        repo.save(&updated).unwrap();
        repo.save(&updated).unwrap();

        let reports = repo.list(None).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].id.as_deref(), Some("r1"));
        assert_eq!(reports[0].technician, "B. Dupont");
        assert_eq!(reports[1].id.as_deref(), Some("r2"));
    }

    #[test]
    fn list_filter_matches_full_scan_in_order() {
        let (_dir, repo) = repo();
        repo.save(&report(Some("r1"), "a")).unwrap();
        repo.save(&report(Some("r2"), "b")).unwrap();
        repo.save(&report(Some("r3"), "a")).unwrap();

        let all = repo.list(None).unwrap();
        let filtered = repo.list(Some("a")).unwrap();
        let expected: Vec<_> = all.into_iter().filter(|r| r.client_id == "a").collect();
        let filtered_ids: Vec<_> = filtered.iter().map(|r| r.id.clone()).collect();
        let expected_ids: Vec<_> = expected.iter().map(|r| r.id.clone()).collect();
        assert_eq!(filtered_ids, expected_ids);
        assert_eq!(filtered_ids.len(), 2);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let (_dir, repo) = repo();
        repo.save(&report(Some("r1"), "a")).unwrap();
        repo.delete("absent").unwrap();
        assert_eq!(repo.list(None).unwrap().len(), 1);
    }

    #[test]
    fn save_rejects_blank_technician() {
        let (_dir, repo) = repo();
        let mut invalid = report(None, "a");
        invalid.technician = "   ".into();
        assert!(matches!(repo.save(&invalid), Err(ReportError::MissingTechnician)));
        assert!(repo.list(None).unwrap().is_empty());
    }

    #[test]
    fn save_rejects_non_iso_date() {
        let (_dir, repo) = repo();
        let mut invalid = report(None, "a");
        invalid.date = "15/03/2024".into();
        assert!(matches!(repo.save(&invalid), Err(ReportError::InvalidDate { .. })));
    }
}
