//! In-process hall store, used when no database is configured and in tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::models::{Hala, HalaPayload};
use crate::database::store::{HalaStore, StoreError};

#[derive(Debug)]
struct MemoryState {
    next_id: i32,
    rows: BTreeMap<i32, Hala>,
}

#[derive(Debug)]
pub struct MemoryHalaStore {
    state: RwLock<MemoryState>,
}

impl Default for MemoryHalaStore {
    fn default() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

#[async_trait]
impl HalaStore for MemoryHalaStore {
    async fn get(&self, id: i32) -> Result<Option<Hala>, StoreError> {
        Ok(self.state.read().await.rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Hala>, StoreError> {
        Ok(self.state.read().await.rows.values().cloned().collect())
    }

    async fn insert(&self, payload: HalaPayload) -> Result<Hala, StoreError> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let hala = payload.into_hala(id);
        state.rows.insert(id, hala.clone());
        Ok(hala)
    }

    async fn update(&self, id: i32, payload: HalaPayload) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.rows.get_mut(&id) {
            Some(existing) => {
                existing.nazwa = payload.nazwa;
                existing.adres = payload.adres;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<Hala>, StoreError> {
        Ok(self.state.write().await.rows.remove(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(nazwa: &str, adres: Option<&str>) -> HalaPayload {
        HalaPayload {
            nazwa: nazwa.to_string(),
            adres: adres.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryHalaStore::default();

        let a = store.insert(payload("Hala A", None)).await.unwrap();
        let b = store.insert(payload("Hala B", Some("ul. Fabryczna 2"))).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryHalaStore::default();
        let hala = store.insert(payload("Stara", None)).await.unwrap();

        assert!(store.update(hala.id, payload("Nowa", Some("Łódź"))).await.unwrap());
        let updated = store.get(hala.id).await.unwrap().unwrap();
        assert_eq!(updated.nazwa, "Nowa");
        assert_eq!(updated.adres.as_deref(), Some("Łódź"));

        assert!(!store.update(99, payload("x", None)).await.unwrap());

        assert_eq!(store.delete(hala.id).await.unwrap(), Some(updated));
        assert_eq!(store.delete(hala.id).await.unwrap(), None);
        assert!(store.get(hala.id).await.unwrap().is_none());
    }
}
