//! Parc client par défaut, installé au premier lancement uniquement
//! (espace "clients" absent du magasin).

use tekparc_core::clients::NS_CLIENTS;
use tekparc_core::models::{Client, Workstation, WorkstationKind};
use tekparc_core::store::{RecordStore, StoreError};
use tekparc_core::ClientRepository;

fn workstation(id: &str, name: &str, kind: WorkstationKind) -> Workstation {
    Workstation {
        id: id.into(),
        name: name.into(),
        kind,
        notes: None,
    }
}

fn client(
    id: &str,
    name: &str,
    address: &str,
    template_type: Option<&str>,
    workstations: Vec<Workstation>,
) -> Client {
    Client {
        id: id.into(),
        name: name.into(),
        address: if address.is_empty() { None } else { Some(address.into()) },
        contact_name: None,
        template_type: template_type.map(Into::into),
        workstations,
    }
}

pub fn default_clients() -> Vec<Client> {
    vec![
        client(
            "demo-client",
            "Entreprise Démo SARL",
            "123 Rue de l'Exemple",
            None,
            vec![
                workstation("ws-d1", "PC Accueil", WorkstationKind::Desktop),
                workstation("ws-d2", "PC Direction", WorkstationKind::Laptop),
                workstation("ws-d3", "Serveur", WorkstationKind::Server),
            ],
        ),
        client(
            "mairie-champeix",
            "Mairie de Champeix",
            "Champeix",
            None,
            vec![
                workstation("ch-1", "Aurélie", WorkstationKind::Desktop),
                workstation("ch-2", "Mélanie", WorkstationKind::Desktop),
                workstation("ch-3", "Marie-Christine", WorkstationKind::Desktop),
                workstation("ch-4", "Karime", WorkstationKind::Desktop),
                workstation("ch-5", "M.Meallet", WorkstationKind::Laptop),
                workstation("ch-6", "Camille", WorkstationKind::Desktop),
            ],
        ),
        client(
            "sms",
            "SMS",
            "",
            Some("sms"),
            vec![
                workstation("sms-1", "M.Rechat", WorkstationKind::Desktop),
                workstation("sms-2", "PC Secrétaire", WorkstationKind::Desktop),
            ],
        ),
        client(
            "combes",
            "Combes",
            "",
            None,
            vec![workstation("combes-1", "Pascal Combes", WorkstationKind::Desktop)],
        ),
    ]
}

/// Seed uniquement quand l'espace "clients" n'existe pas encore : les
/// modifications faites ensuite par l'utilisateur ne sont jamais écrasées.
pub fn seed_if_first_run(store: &RecordStore, clients: &ClientRepository) -> Result<bool, StoreError> {
    if store.contains(NS_CLIENTS) {
        return Ok(false);
    }
    for client in default_clients() {
        clients.save(&client)?;
    }
    tracing::info!(count = default_clients().len(), "parc client par défaut installé");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn seed_runs_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::open(dir.path().join("store.json")).unwrap());
        let repo = ClientRepository::new(store.clone());

        assert!(seed_if_first_run(&store, &repo).unwrap());
        assert_eq!(repo.list().unwrap().len(), 4);

        // Une suppression utilisateur doit survivre au relancement
        repo.delete("combes").unwrap();
        assert!(!seed_if_first_run(&store, &repo).unwrap());
        assert_eq!(repo.list().unwrap().len(), 3);
    }

    #[test]
    fn sms_client_uses_sms_variant() {
        let clients = default_clients();
        let sms = clients.iter().find(|c| c.id == "sms").unwrap();
        assert_eq!(sms.template_type.as_deref(), Some("sms"));
    }
}
