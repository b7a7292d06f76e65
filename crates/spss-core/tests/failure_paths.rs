//! Backend failures surfacing through the services

use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::always;
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use spss_core::messages;
use spss_core::{view, ConnectError, Dashboard, ImportInput, ImportService, MemberService};
use spss_core::ConnectConfig;
use spss_model::{Role, MEMBER_DETAILS};
use spss_store::{Document, DocumentStore, StoreError};
use spss_test_utils::session;
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl DocumentStore for Store {
        async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError>;
        async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;
        async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError>;
        async fn update(
            &self,
            collection: &str,
            id: &str,
            patch: Map<String, Value>,
        ) -> Result<(), StoreError>;
        async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
        async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
        async fn query_eq(
            &self,
            collection: &str,
            field_path: &str,
            value: &Value,
        ) -> Result<Vec<Document>, StoreError>;
        async fn batch_write(&self, collection: &str, docs: Vec<Value>) -> Result<usize, StoreError>;
    }
}

fn members(store: MockStore) -> MemberService {
    MemberService::new(Arc::new(store))
}

#[tokio::test]
async fn permission_denied_on_view() {
    let mut store = MockStore::new();
    store.expect_get().returning(|_, _| {
        Err(StoreError::PermissionDenied {
            collection: MEMBER_DETAILS.to_string(),
        })
    });

    let err = view::open(&members(store), &session(Role::User, None), Some("r1"), None)
        .await
        .unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(err.user_message(), messages::PERMISSION_DENIED);
}

#[tokio::test]
async fn backend_failure_on_view_is_retryable() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .times(1)
        .returning(|_, _| Err(StoreError::Backend("unavailable".into())));

    let err = view::open(&members(store), &session(Role::Admin, None), Some("r1"), Some("1"))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), messages::RECORD_LOAD_FAIL);
}

#[tokio::test]
async fn missing_record_on_view() {
    let mut store = MockStore::new();
    store.expect_get().returning(|_, _| Ok(None));

    let err = view::open(&members(store), &session(Role::User, None), Some("gone"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::RecordNotFound(ref id) if id == "gone"));
    assert_eq!(err.user_message(), messages::RECORD_NOT_FOUND);
}

#[tokio::test]
async fn scoped_dashboard_queries_by_sabha() {
    let mut store = MockStore::new();
    store.expect_list().never();
    store
        .expect_query_eq()
        .with(always(), always(), mockall::predicate::eq(json!("Aluva")))
        .times(1)
        .returning(|_, _, _| Ok(vec![Document::new("a", json!({"personalDetails": {"name": "A"}}))]));

    let mut dashboard = Dashboard::new(members(store), Arc::new(ConnectConfig::default()));
    let loaded = dashboard.load(&session(Role::Admin, Some("Aluva"))).await.unwrap();
    assert_eq!(loaded, 1);
}

#[tokio::test]
async fn dashboard_load_failure() {
    let mut store = MockStore::new();
    store
        .expect_list()
        .returning(|_| Err(StoreError::Backend("timeout".into())));

    let mut dashboard = Dashboard::new(members(store), Arc::new(ConnectConfig::default()));
    let err = dashboard.load(&session(Role::SuperAdmin, Some("Aluva"))).await.unwrap_err();
    assert!(matches!(err, ConnectError::Store(StoreError::Backend(_))));
    assert!(dashboard.records().is_empty());
}

#[tokio::test]
async fn import_writes_in_configured_batches() {
    let mut store = MockStore::new();
    store
        .expect_batch_write()
        .withf(|_, docs| docs.len() <= 2)
        .times(3)
        .returning(|_, docs| Ok(docs.len()));

    let records: Vec<Value> = (0..5)
        .map(|i| json!({"personalDetails": {"name": format!("Owner {i}")}}))
        .collect();
    let input = ImportInput::pasted(Value::Array(records).to_string());

    let service = ImportService::new(members(store), 2);
    let report = service
        .import(&session(Role::SuperAdmin, None), &input)
        .await
        .unwrap();
    assert_eq!(report.imported, 5);
    assert!(report.skipped.is_empty());
}

#[tokio::test]
async fn import_batch_failure_propagates() {
    let mut store = MockStore::new();
    store
        .expect_batch_write()
        .times(1)
        .returning(|_, _| Err(StoreError::Backend("quota".into())));

    let input = ImportInput::pasted(r#"{"personalDetails": {"name": "A"}}"#);
    let err = ImportService::new(members(store), 500)
        .import(&session(Role::SuperAdmin, None), &input)
        .await
        .unwrap_err();
    assert!(err.is_retryable());
}

#[tokio::test]
async fn import_denied_before_touching_backend() {
    let mut store = MockStore::new();
    store.expect_batch_write().never();

    let input = ImportInput::pasted(r#"{"personalDetails": {"name": "A"}}"#);
    let err = ImportService::new(members(store), 500)
        .import(&session(Role::Admin, None), &input)
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::Access(_)));
}
