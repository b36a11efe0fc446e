//! Dépôt CRUD des clients sur l'espace de noms "clients".

use crate::models::Client;
use crate::store::{RecordStore, StoreError};
use std::sync::Arc;

pub const NS_CLIENTS: &str = "clients";

pub struct ClientRepository {
    store: Arc<RecordStore>,
}

impl ClientRepository {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Liste les clients dans l'ordre de stockage.
    pub fn list(&self) -> Result<Vec<Client>, StoreError> {
        self.store.get_as(NS_CLIENTS)
    }

    pub fn find(&self, id: &str) -> Result<Option<Client>, StoreError> {
        Ok(self.list()?.into_iter().find(|client| client.id == id))
    }

    /// Upsert par id : remplace en place (position conservée) ou ajoute en fin.
    pub fn save(&self, client: &Client) -> Result<(), StoreError> {
        let mut clients = self.list()?;
        match clients.iter().position(|c| c.id == client.id) {
            Some(index) => clients[index] = client.clone(),
            None => clients.push(client.clone()),
        }
        self.store.set_as(NS_CLIENTS, &clients)?;
        tracing::debug!(client = %client.id, "client saved");
        Ok(())
    }

    /// Supprime par id ; sans effet si absent. Ne supprime jamais les
    /// rapports du client (conservés pour l'historique).
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut clients = self.list()?;
        let initial_len = clients.len();
        clients.retain(|client| client.id != id);
        if clients.len() != initial_len {
            tracing::debug!(client = %id, "client deleted");
        }
        self.store.set_as(NS_CLIENTS, &clients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Workstation, WorkstationKind};

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.into(),
            name: name.into(),
            address: None,
            contact_name: None,
            template_type: None,
            workstations: vec![Workstation {
                id: format!("{id}-1"),
                name: "PC Accueil".into(),
                kind: WorkstationKind::Desktop,
                notes: None,
            }],
        }
    }

    fn repo() -> (tempfile::TempDir, ClientRepository) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::open(dir.path().join("store.json")).unwrap());
        (dir, ClientRepository::new(store))
    }

    #[test]
    fn save_appends_then_replaces_in_place() {
        let (_dir, repo) = repo();
        repo.save(&client("a", "Alpha")).unwrap();
        repo.save(&client("b", "Beta")).unwrap();
        repo.save(&client("c", "Gamma")).unwrap();

        // upsert du milieu : position conservée, voisins intacts
        repo.save(&client("b", "Beta SARL")).unwrap();
        let clients = repo.list().unwrap();
        let ids: Vec<_> = clients.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(clients[1].name, "Beta SARL");
    }

    #[test]
    fn double_save_keeps_single_record() {
        let (_dir, repo) = repo();
        repo.save(&client("a", "Alpha")).unwrap();
        repo.save(&client("a", "Alpha v2")).unwrap();
        let clients = repo.list().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].name, "Alpha v2");
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let (_dir, repo) = repo();
        repo.save(&client("a", "Alpha")).unwrap();
        repo.save(&client("b", "Beta")).unwrap();
        repo.delete("zzz").unwrap();
        let ids: Vec<_> = repo.list().unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn find_returns_matching_client() {
        let (_dir, repo) = repo();
        repo.save(&client("a", "Alpha")).unwrap();
        assert_eq!(repo.find("a").unwrap().unwrap().name, "Alpha");
        assert!(repo.find("b").unwrap().is_none());
    }
}
