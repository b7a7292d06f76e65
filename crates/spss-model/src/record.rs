//! Household census record
//!
//! A record is one household: the house owner (`personalDetails`), the family
//! members who hold membership and the ones who do not. Every field decodes
//! leniently; bulk imports and older documents omit fields freely
//! and write `null`, numbers or `"yes"` where text or flags belong.

use crate::ids::RecordId;
use crate::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored `member_details` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    /// Document id (not part of the stored body)
    #[serde(skip)]
    pub id: Option<RecordId>,
    /// House owner details
    #[serde(deserialize_with = "lenient::or_default")]
    pub personal_details: PersonalDetails,
    /// Family members holding membership
    #[serde(deserialize_with = "lenient::or_default")]
    pub members: Vec<Member>,
    /// Family members without membership
    #[serde(deserialize_with = "lenient::or_default")]
    pub non_members: Vec<NonMember>,
    /// Audit stamps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecordMetadata>,
}

impl Record {
    /// Build a record from its stored body and document id
    #[must_use]
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Id as str, empty when the record was never stored
    #[inline]
    #[must_use]
    pub fn id_str(&self) -> &str {
        self.id.as_ref().map_or("", RecordId::as_str)
    }

    /// Owner name
    #[inline]
    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.personal_details.name
    }

    /// Pradeshika Sabha the household belongs to
    #[inline]
    #[must_use]
    pub fn sabha(&self) -> &str {
        &self.personal_details.pradeshika_sabha
    }

    /// Writable body without id and metadata
    #[must_use]
    pub fn data(&self) -> RecordData {
        RecordData {
            personal_details: self.personal_details.clone(),
            members: self.members.clone(),
            non_members: self.non_members.clone(),
        }
    }
}

/// The part of a record an editor supplies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordData {
    /// House owner details
    #[serde(deserialize_with = "lenient::or_default")]
    pub personal_details: PersonalDetails,
    /// Family members holding membership
    #[serde(deserialize_with = "lenient::or_default")]
    pub members: Vec<Member>,
    /// Family members without membership
    #[serde(deserialize_with = "lenient::or_default")]
    pub non_members: Vec<NonMember>,
}

impl RecordData {
    /// Attach metadata, producing a full record body
    #[must_use]
    pub fn into_record(self, metadata: RecordMetadata) -> Record {
        Record {
            id: None,
            personal_details: self.personal_details,
            members: self.members,
            non_members: self.non_members,
            metadata: Some(metadata),
        }
    }
}

/// House owner details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Date of birth, `YYYY-MM-DD`
    #[serde(deserialize_with = "lenient::text")]
    pub dob: String,
    #[serde(deserialize_with = "lenient::text")]
    pub house_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub gender: String,
    #[serde(deserialize_with = "lenient::text")]
    pub pradeshika_sabha: String,
    #[serde(rename = "photoURL", deserialize_with = "lenient::text")]
    pub photo_url: String,
    #[serde(deserialize_with = "lenient::text")]
    pub blood_group: String,
    #[serde(deserialize_with = "lenient::text")]
    pub occupation: String,
    #[serde(deserialize_with = "lenient::text")]
    pub area_of_expertise: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub membership_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub highest_education: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub address: Address,
    #[serde(deserialize_with = "lenient::flag")]
    pub holds_spss_position: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub spss_position_name: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub health_insurance: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub term_life_insurance: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub ration_card_type: String,
}

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    #[serde(deserialize_with = "lenient::text")]
    pub address1: String,
    #[serde(deserialize_with = "lenient::text")]
    pub address2: String,
    #[serde(deserialize_with = "lenient::text")]
    pub place: String,
    #[serde(deserialize_with = "lenient::text")]
    pub pin: String,
}

/// Family member holding membership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub dob: String,
    #[serde(deserialize_with = "lenient::text")]
    pub relationship: String,
    #[serde(deserialize_with = "lenient::text")]
    pub blood_group: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub highest_education: String,
    #[serde(deserialize_with = "lenient::text")]
    pub occupation: String,
    #[serde(deserialize_with = "lenient::text")]
    pub area_of_expertise: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub living_outside_kerala: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub outside_reason: String,
    #[serde(deserialize_with = "lenient::text")]
    pub membership_type: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub holds_spss_position: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub spss_position_name: String,
}

/// Family member without membership
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NonMember {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub dob: String,
    #[serde(deserialize_with = "lenient::text")]
    pub relationship: String,
    #[serde(deserialize_with = "lenient::text")]
    pub blood_group: String,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub highest_education: String,
    #[serde(deserialize_with = "lenient::text")]
    pub occupation: String,
    #[serde(deserialize_with = "lenient::text")]
    pub area_of_expertise: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub living_outside_kerala: bool,
    #[serde(deserialize_with = "lenient::text")]
    pub outside_reason: String,
    #[serde(deserialize_with = "lenient::text")]
    pub reason_for_no_membership: String,
}

/// Audit stamps written by the services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RecordMetadata {
    /// Stamp a new document
    #[must_use]
    pub fn stamped(created_by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(at),
            created_by: created_by.into(),
            updated_at: Some(at),
        }
    }
}

/// Fields shared by members and non-members
///
/// Search and the entry form treat both kinds of person alike.
pub trait Person {
    fn name(&self) -> &str;
    fn phone(&self) -> &str;
    fn email(&self) -> &str;
    fn blood_group(&self) -> &str;
    fn highest_education(&self) -> &str;
    fn occupation(&self) -> &str;
}

macro_rules! impl_person {
    ($ty:ty) => {
        impl Person for $ty {
            fn name(&self) -> &str {
                &self.name
            }
            fn phone(&self) -> &str {
                &self.phone
            }
            fn email(&self) -> &str {
                &self.email
            }
            fn blood_group(&self) -> &str {
                &self.blood_group
            }
            fn highest_education(&self) -> &str {
                &self.highest_education
            }
            fn occupation(&self) -> &str {
                &self.occupation
            }
        }
    };
}

impl_person!(Member);
impl_person!(NonMember);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_partial_document() {
        let value = json!({
            "personalDetails": { "name": "Raman", "pradeshikaSabha": "Aluva" },
            "members": [{ "name": "Sita", "livingOutsideKerala": true }]
        });

        let record: Record = serde_json::from_value(value).unwrap();
        assert_eq!(record.owner_name(), "Raman");
        assert_eq!(record.sabha(), "Aluva");
        assert_eq!(record.members.len(), 1);
        assert!(record.members[0].living_outside_kerala);
        assert!(record.non_members.is_empty());
        assert!(record.metadata.is_none());
    }

    #[test]
    fn decodes_loosely_typed_document() {
        let value = json!({
            "personalDetails": {
                "name": "Raman",
                "email": null,
                "phone": 9_847_012_345_u64,
                "holdsSpssPosition": "yes",
                "healthInsurance": null,
                "address": null
            },
            "members": null,
            "nonMembers": [{ "name": "Anu", "livingOutsideKerala": "no" }]
        });

        let record: Record = serde_json::from_value(value).unwrap();
        let pd = &record.personal_details;
        assert_eq!(pd.email, "");
        assert_eq!(pd.phone, "9847012345");
        assert!(pd.holds_spss_position);
        assert!(!pd.health_insurance);
        assert_eq!(pd.address, Address::default());
        assert!(record.members.is_empty());
        assert!(!record.non_members[0].living_outside_kerala);
    }

    #[test]
    fn rejects_structured_value_in_text_field() {
        let value = json!({ "personalDetails": { "name": { "first": "Raman" } } });
        assert!(serde_json::from_value::<Record>(value).is_err());
    }

    #[test]
    fn serializes_camel_case_keys() {
        let mut record = Record::default();
        record.personal_details.photo_url = "x".into();
        record.personal_details.address.pin = "682001".into();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["personalDetails"]["photoURL"], "x");
        assert_eq!(value["personalDetails"]["address"]["pin"], "682001");
        assert!(value.get("id").is_none());
        assert!(value.get("nonMembers").is_some());
    }

    #[test]
    fn data_round_trips_into_record() {
        let mut data = RecordData::default();
        data.personal_details.name = "Owner".into();
        let meta = RecordMetadata::stamped("uid-1", Utc::now());

        let record = data.clone().into_record(meta.clone());
        assert_eq!(record.data(), data);
        assert_eq!(record.metadata, Some(meta));
        assert_eq!(record.id_str(), "");
    }
}
