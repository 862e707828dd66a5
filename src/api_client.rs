// Data-access layer over the persistence gateway.
//
// Holds a cached view of the client collection. Mutations (create, update,
// delete) invalidate the cache on success so the next read refetches; there
// is no optimistic patching of the cached list. Failures surface once to the
// caller, with no retry anywhere.

use crate::types::{Client, ClientInput};
use crate::validation::SchemaValidator;
use anyhow::{bail, Result};

pub struct ClientsApi {
    base_url: String,
    http: reqwest::Client,
    cache: Option<Vec<Client>>,
}

impl ClientsApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            cache: None,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/clients", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/api/clients/{}", self.base_url, id)
    }

    /// The cached collection view, if one is loaded.
    pub fn cached(&self) -> Option<&[Client]> {
        self.cache.as_deref()
    }

    /// The client collection. The first call fetches from the gateway;
    /// later calls reuse the cached view until a mutation invalidates it.
    pub async fn clients(&mut self) -> Result<&[Client]> {
        if self.cache.is_none() {
            let fresh = self.fetch_clients().await?;
            self.cache = Some(fresh);
        }
        Ok(self.cache.as_deref().unwrap_or(&[]))
    }

    /// Drop the cached view and refetch immediately.
    pub async fn refresh(&mut self) -> Result<Vec<Client>> {
        let fresh = self.fetch_clients().await?;
        self.cache = Some(fresh.clone());
        Ok(fresh)
    }

    async fn fetch_clients(&self) -> Result<Vec<Client>> {
        let response = self.http.get(self.collection_url()).send().await?;
        if !response.status().is_success() {
            bail!("Failed to fetch clients");
        }
        Ok(response.json().await?)
    }

    /// Create a client. The schema check runs locally before the request
    /// goes out, mirroring the gateway's own constraints.
    pub async fn create_client(&mut self, input: &ClientInput) -> Result<Client> {
        self.check_schema(input)?;

        let response = self
            .http
            .post(self.collection_url())
            .json(input)
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Failed to create client");
        }

        let created: Client = response.json().await?;
        self.cache = None;
        Ok(created)
    }

    /// Replace a client's business fields.
    pub async fn update_client(&mut self, id: &str, input: &ClientInput) -> Result<Client> {
        self.check_schema(input)?;

        let response = self
            .http
            .put(self.item_url(id))
            .json(input)
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("Failed to update client");
        }

        let updated: Client = response.json().await?;
        self.cache = None;
        Ok(updated)
    }

    /// Hard-delete a client.
    pub async fn delete_client(&mut self, id: &str) -> Result<()> {
        let response = self.http.delete(self.item_url(id)).send().await?;
        if !response.status().is_success() {
            bail!("Failed to delete client");
        }

        self.cache = None;
        Ok(())
    }

    fn check_schema(&self, input: &ClientInput) -> Result<()> {
        if let Err(violations) = SchemaValidator::new().validate(input) {
            let detail = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            bail!("Validation failed: {}", detail);
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(all(test, feature = "server"))]
mod e2e_tests {
    use super::*;
    use crate::api::{router, AppState};
    use crate::db::setup_database;
    use rusqlite::Connection;

    async fn spawn_gateway() -> String {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        let app = router(AppState::new(conn));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn ana() -> ClientInput {
        ClientInput {
            name: "Ana Silva".to_string(),
            email: "ana@x.com".to_string(),
            phone: "5551234567".to_string(),
            document: "12345".to_string(),
            address: "Rua A, 10".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mutations_invalidate_the_cached_view() {
        let base = spawn_gateway().await;
        let mut api = ClientsApi::new(&base);

        assert!(api.clients().await.unwrap().is_empty());

        let created = api.create_client(&ana()).await.unwrap();
        assert!(!created.id.is_empty());

        // The cache was dropped by the mutation; this read refetches and
        // must include the new record exactly once.
        let listed = api.clients().await.unwrap();
        assert_eq!(listed.iter().filter(|c| c.id == created.id).count(), 1);

        let mut changed = ana();
        changed.address = "Rua C, 30".to_string();
        let updated = api.update_client(&created.id, &changed).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.address, "Rua C, 30");

        api.delete_client(&created.id).await.unwrap();
        assert!(api.clients().await.unwrap().is_empty());

        // Second delete surfaces the gateway's not-found as an error.
        assert!(api.delete_client(&created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_create_fails_and_list_stays_consistent() {
        let base = spawn_gateway().await;
        let mut api = ClientsApi::new(&base);

        api.create_client(&ana()).await.unwrap();

        let mut dup = ana();
        dup.document = "99999".to_string();
        let err = api.create_client(&dup).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create client");

        assert_eq!(api.clients().await.unwrap().len(), 1);
    }
}
