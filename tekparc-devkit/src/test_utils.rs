/*!
Harness de test pour les composants Tekparc

Facilite l'écriture de tests avec:
- Magasin temporaire jetable (supprimé avec le test)
- Constructeurs de clients et rapports d'exemple
- Accès aux ressources (gabarits, logo) du dépôt
*/

use std::path::PathBuf;
use std::sync::Arc;
use tekparc_core::assets::AssetLocator;
use tekparc_core::models::{
    AntivirusStatus, CheckState, Client, HddHealth, MaintenanceReport, Workstation,
    WorkstationKind, WorkstationReport,
};
use tekparc_core::{ClientRepository, RecordStore, ReportRepository};

/// Magasin temporaire : le répertoire vit aussi longtemps que la valeur.
pub struct TestStore {
    pub store: Arc<RecordStore>,
    _dir: tempfile::TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(RecordStore::open(dir.path().join("store.json")).expect("store"));
        Self { store, _dir: dir }
    }

    pub fn clients(&self) -> ClientRepository {
        ClientRepository::new(self.store.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.store.clone())
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Ressources réelles du dépôt (gabarits HTML + logo).
pub fn workspace_assets() -> AssetLocator {
    AssetLocator::from_root(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../assets")))
}

/// Client générique avec deux postes.
pub fn sample_client(id: &str) -> Client {
    Client {
        id: id.into(),
        name: format!("Client {id}"),
        address: Some("1 Rue du Test".into()),
        contact_name: None,
        template_type: None,
        workstations: vec![
            Workstation {
                id: format!("{id}-1"),
                name: "PC Accueil".into(),
                kind: WorkstationKind::Desktop,
                notes: None,
            },
            Workstation {
                id: format!("{id}-2"),
                name: "Serveur".into(),
                kind: WorkstationKind::Server,
                notes: None,
            },
        ],
    }
}

/// Client en variante SMS avec un poste.
pub fn sms_client() -> Client {
    let mut client = sample_client("sms");
    client.name = "SMS".into();
    client.template_type = Some("sms".into());
    client.workstations.truncate(1);
    client
}

/// Checklist poste sans anomalie.
pub fn clean_ws_report(workstation: &Workstation) -> WorkstationReport {
    WorkstationReport {
        workstation_id: workstation.id.clone(),
        workstation_name: workstation.name.clone(),
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

/// Rapport sans id couvrant le parc actuel du client.
pub fn sample_report(client: &Client) -> MaintenanceReport {
    MaintenanceReport {
        id: None,
        client_id: client.id.clone(),
        date: "2024-03-15".into(),
        technician: "A. Martin".into(),
        tablets_check: CheckState::NotChecked,
        global_observations: None,
        workstations: client.workstations.iter().map(clean_ws_report).collect(),
    }
}
