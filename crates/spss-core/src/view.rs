//! Single record page
//!
//! Resolves the record and mode from the page parameters and lays the
//! record out as labelled sections.

use crate::auth::Session;
use crate::error::ConnectError;
use crate::form::RecordForm;
use crate::members::MemberService;
use spss_access::{require_page, Page, ViewMode};
use spss_model::format::{format_label, format_timestamp, or_dash};
use spss_model::{Person, Record, RecordId};
use tracing::{debug, warn};

/// Label and display value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

/// Titled group of fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub title: String,
    pub fields: Vec<DetailField>,
}

/// Loaded record page
#[derive(Debug, Clone, PartialEq)]
pub struct RecordView {
    pub record: Record,
    pub mode: ViewMode,
    pub sections: Vec<DetailSection>,
}

impl RecordView {
    /// Edit form for the record when the mode allows editing
    #[must_use]
    pub fn edit_form(&self, session: &Session) -> Option<RecordForm> {
        if !self.mode.is_edit() {
            return None;
        }
        let mut form = RecordForm::new();
        form.populate(&self.record, self.mode == ViewMode::SharedEdit);
        form.lock_sabha(session);
        Some(form)
    }
}

/// Open the record page
///
/// `edit_param` is the `edit` query value: `share` opens the shared edit
/// form for anyone, `1` opens the admin edit form for admins.
///
/// # Errors
/// - `ConnectError::NoRecordId` for a blank id
/// - `ConnectError::RecordNotFound` when the record does not exist
/// - `ConnectError::Store` when the backend refuses or fails
pub async fn open(
    members: &MemberService,
    session: &Session,
    id: Option<&str>,
    edit_param: Option<&str>,
) -> Result<RecordView, ConnectError> {
    require_page(Page::View, &session.viewer())?;

    let id = id.map(str::trim).filter(|id| !id.is_empty()).ok_or_else(|| {
        warn!("record page opened without an id");
        ConnectError::NoRecordId
    })?;

    let record = members
        .get(&RecordId::from(id))
        .await?
        .ok_or_else(|| ConnectError::RecordNotFound(id.to_string()))?;

    let mode = ViewMode::resolve(edit_param, session.is_admin());
    debug!(record_id = id, ?mode, "record opened");
    Ok(RecordView {
        sections: sections(&record),
        record,
        mode,
    })
}

fn field(label: &'static str, value: &str) -> DetailField {
    DetailField {
        label,
        value: or_dash(value).to_string(),
    }
}

fn labelled(label: &'static str, key: &str) -> DetailField {
    field(label, &if key.is_empty() { String::new() } else { format_label(key) })
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Personal, address, health, members, non-members and metadata sections
#[must_use]
pub fn sections(record: &Record) -> Vec<DetailSection> {
    let pd = &record.personal_details;
    let addr = &pd.address;

    let mut personal = vec![
        field("Name", &pd.name),
        field("Date of Birth", &pd.dob),
        labelled("Gender", &pd.gender),
        field("House Name", &pd.house_name),
        field("Pradeshika Sabha", &pd.pradeshika_sabha),
        field("Blood Group", &pd.blood_group),
        labelled("Occupation", &pd.occupation),
        field("Phone", &pd.phone),
        field("Email", &pd.email),
        labelled("Membership", &pd.membership_type),
        labelled("Education", &pd.highest_education),
    ];
    if pd.holds_spss_position {
        personal.push(field("SPSS Position", &pd.spss_position_name));
    }

    let mut out = vec![
        DetailSection { title: "Personal Details".into(), fields: personal },
        DetailSection {
            title: "Address".into(),
            fields: vec![
                field("Address Line 1", &addr.address1),
                field("Address Line 2", &addr.address2),
                field("Place", &addr.place),
                field("PIN", &addr.pin),
            ],
        },
        DetailSection {
            title: "Health & Family".into(),
            fields: vec![field("Health Insurance", yes_no(pd.health_insurance))],
        },
    ];

    for (i, m) in record.members.iter().enumerate() {
        out.push(person_section("Member", i + 1, m, &m.dob, &m.relationship, None));
    }
    for (i, m) in record.non_members.iter().enumerate() {
        out.push(person_section(
            "Non-Member",
            i + 1,
            m,
            &m.dob,
            &m.relationship,
            Some(m.reason_for_no_membership.as_str()),
        ));
    }

    if let Some(meta) = &record.metadata {
        out.push(DetailSection {
            title: "Record Info".into(),
            fields: vec![
                field("Created At", &format_timestamp(meta.created_at.as_ref())),
                field("Created By", &meta.created_by),
                field("Updated At", &format_timestamp(meta.updated_at.as_ref())),
            ],
        });
    }
    out
}

fn person_section<P: Person>(
    kind: &str,
    number: usize,
    p: &P,
    dob: &str,
    relationship: &str,
    reason: Option<&str>,
) -> DetailSection {
    let mut fields = vec![
        field("DOB", dob),
        labelled("Relationship", relationship),
        field("Blood Group", p.blood_group()),
        field("Phone", p.phone()),
        field("Email", p.email()),
        labelled("Education", p.highest_education()),
        labelled("Occupation", p.occupation()),
    ];
    if let Some(reason) = reason {
        fields.push(field("Reason", reason));
    }
    DetailSection {
        title: format!("{kind} #{number} — {}", or_dash(p.name())),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spss_model::{Member, NonMember, PersonalDetails};

    #[test]
    fn sections_cover_record() {
        let record = Record {
            personal_details: PersonalDetails {
                name: "Asha".into(),
                membership_type: "life_member".into(),
                health_insurance: true,
                ..PersonalDetails::default()
            },
            members: vec![Member { name: "Ravi".into(), ..Member::default() }],
            non_members: vec![NonMember { reason_for_no_membership: "Minor".into(), ..NonMember::default() }],
            metadata: None,
            ..Record::default()
        };

        let sections = sections(&record);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Personal Details", "Address", "Health & Family", "Member #1 — Ravi", "Non-Member #1 — —"]
        );
        assert!(sections[0].fields.contains(&field("Membership", "Life Member")));
        assert!(sections[0].fields.contains(&field("Phone", "—")));
        assert_eq!(sections[2].fields[0].value, "Yes");
        assert_eq!(sections[4].fields.last().map(|f| f.value.as_str()), Some("Minor"));
    }
}
