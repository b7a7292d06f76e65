//! Testing utilities for SPSS Connect workspace
//!
//! Shared fixtures: valid household records, sessions per role, and a
//! service stack over in-memory backends.

#![allow(missing_docs)]

use chrono::Utc;
use spss_core::{ConnectConfig, Session, SpssConnect};
use spss_model::catalog::PRADESHIKA_SABHAS;
use spss_model::{
    Address, Member, NonMember, PersonalDetails, Record, RecordData, RecordId, RecordMetadata, Role,
    UserId, UserProfile, MEMBER_DETAILS, USERS,
};
use spss_store::{AuthUser, DocumentStore, IdentityProvider, MemoryIdentityProvider, MemoryStore};
use std::sync::Arc;

pub const PASSWORD: &str = "secret123";

/// Owner details that pass validation
pub fn sample_details(name: &str, sabha: &str) -> PersonalDetails {
    PersonalDetails {
        name: name.to_string(),
        dob: "1975-08-15".to_string(),
        house_name: format!("{name} Bhavan"),
        gender: "male".to_string(),
        pradeshika_sabha: sabha.to_string(),
        blood_group: "O+".to_string(),
        occupation: "private".to_string(),
        area_of_expertise: "Accounts".to_string(),
        phone: "9847012345".to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        membership_type: "ordinary".to_string(),
        highest_education: "graduate".to_string(),
        address: Address {
            address1: "Temple Road".to_string(),
            address2: String::new(),
            place: sabha.to_string(),
            pin: "683101".to_string(),
        },
        ..PersonalDetails::default()
    }
}

/// Household with one member and one non-member, valid as entered
pub fn sample_record_data(name: &str, sabha: &str) -> RecordData {
    RecordData {
        personal_details: sample_details(name, sabha),
        members: vec![Member {
            name: format!("{name} Jr"),
            dob: "2001-02-03".to_string(),
            relationship: "son".to_string(),
            occupation: "student".to_string(),
            membership_type: "ordinary".to_string(),
            ..Member::default()
        }],
        non_members: vec![NonMember {
            name: format!("{name} Sr"),
            relationship: "father".to_string(),
            reason_for_no_membership: "Elderly".to_string(),
            ..NonMember::default()
        }],
    }
}

/// Stored record with id and metadata
pub fn sample_record(id: &str, name: &str, sabha: &str) -> Record {
    sample_record_data(name, sabha)
        .into_record(RecordMetadata::stamped("seed", Utc::now()))
        .with_id(RecordId::from(id))
}

/// `count` records spread over the sabhas in catalog order
pub fn sample_records(count: usize) -> Vec<Record> {
    let sabhas: Vec<&str> = PRADESHIKA_SABHAS.keys().collect();
    (0..count)
        .map(|i| {
            let sabha = sabhas[i % sabhas.len()];
            sample_record(&format!("rec-{i:04}"), &format!("Owner {i:04}"), sabha)
        })
        .collect()
}

/// Signed-in session without touching a backend
pub fn session(role: Role, sabha: Option<&str>) -> Session {
    let email = format!("{}@spss.in", role.as_str());
    let mut profile = UserProfile::new(email.clone(), role, Utc::now()).with_uid(UserId::from(role.as_str()));
    if let Some(sabha) = sabha {
        profile = profile.with_sabha(sabha);
    }
    Session::signed_in(AuthUser { uid: UserId::from(role.as_str()), email }, Some(profile))
}

/// Services plus handles on their in-memory backends
pub struct TestBed {
    pub app: SpssConnect,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentityProvider>,
}

impl TestBed {
    /// Empty backends, default configuration
    pub fn new() -> Self {
        Self::with_config(ConnectConfig::default())
    }

    /// Empty backends, given configuration
    pub fn with_config(config: ConnectConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentityProvider::new());
        let app = SpssConnect::new(store.clone(), identity.clone(), config).unwrap();
        Self { app, store, identity }
    }

    /// Write records straight into the backend, keeping their ids
    pub async fn seed(&self, records: &[Record]) {
        for record in records {
            let body = serde_json::to_value(record).unwrap();
            self.store.set(MEMBER_DETAILS, record.id_str(), body).await.unwrap();
        }
    }

    /// Create an account with a profile, then sign it in
    pub async fn sign_in_as(&self, email: &str, role: Role, sabha: Option<&str>) -> Session {
        let user = self.identity.create_user(email, PASSWORD).await.unwrap();
        let mut profile = UserProfile::new(email, role, Utc::now());
        if let Some(sabha) = sabha {
            profile = profile.with_sabha(sabha);
        }
        self.store
            .set(USERS, user.uid.as_str(), serde_json::to_value(&profile).unwrap())
            .await
            .unwrap();
        self.app.auth().login(email, PASSWORD).await.unwrap()
    }
}

impl Default for TestBed {
    fn default() -> Self {
        Self::new()
    }
}
