//! Household entry form
//!
//! Holds what the editor has typed, including the dynamic member and
//! non-member blocks, and turns it into a [`RecordData`] on submit:
//! - blocks are numbered from 1 and renumber when one is removed
//! - conditional fields are dropped unless their toggle is on
//! - admins scoped to a sabha cannot pick another one

use crate::auth::Session;
use crate::error::ConnectError;
use crate::members::MemberService;
use crate::validation::{validate_form, ValidationReport};
use spss_access::Route;
use spss_model::catalog::needs_expertise;
use spss_model::{Member, NonMember, PersonalDetails, Record, RecordData, RecordId};
use tracing::debug;

/// What a submit did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// New record stored
    Created { id: RecordId, redirect: String },
    /// Existing record updated
    Updated { id: RecordId, redirect: String },
    /// Nothing stored; fields need attention
    Invalid(ValidationReport),
}

/// Entry form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordForm {
    /// House owner inputs
    pub owner: PersonalDetails,
    members: Vec<Member>,
    non_members: Vec<NonMember>,
    editing: Option<RecordId>,
    shared: bool,
    locked_sabha: Option<String>,
}

impl RecordForm {
    /// Blank form for a new record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank form with the session's sabha lock applied
    #[must_use]
    pub fn for_session(session: &Session) -> Self {
        let mut form = Self::new();
        form.lock_sabha(session);
        form
    }

    /// Load an existing record for editing
    ///
    /// `shared` marks an edit opened from a share link.
    pub fn populate(&mut self, record: &Record, shared: bool) {
        self.owner = record.personal_details.clone();
        self.members = record.members.clone();
        self.non_members = record.non_members.clone();
        self.editing = record.id.clone();
        self.shared = shared;
    }

    /// Fill every input from a record body, keeping edit state and sabha lock
    pub fn fill(&mut self, data: RecordData) {
        self.owner = data.personal_details;
        self.members = data.members;
        self.non_members = data.non_members;
        if let Some(sabha) = &self.locked_sabha {
            self.owner.pradeshika_sabha.clone_from(sabha);
        }
    }

    /// Fix the sabha for admins scoped to one
    ///
    /// Super admins and unscoped accounts keep a free choice.
    pub fn lock_sabha(&mut self, session: &Session) {
        if !session.is_admin() || session.is_super_admin() {
            return;
        }
        if let Some(sabha) = session.pradeshika_sabha() {
            self.owner.pradeshika_sabha = sabha.to_string();
            self.locked_sabha = Some(sabha.to_string());
        }
    }

    /// Sabha the form is locked to
    #[must_use]
    pub fn locked_sabha(&self) -> Option<&str> {
        self.locked_sabha.as_deref()
    }

    /// Record being edited
    #[must_use]
    pub fn editing(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    /// Append a member block, returning its 1-based index
    pub fn add_member(&mut self, member: Member) -> usize {
        self.members.push(member);
        self.members.len()
    }

    /// Remove member block `index` (1-based); later blocks move up
    pub fn remove_member(&mut self, index: usize) -> Option<Member> {
        let i = index.checked_sub(1).filter(|i| *i < self.members.len())?;
        Some(self.members.remove(i))
    }

    /// Member block `index` (1-based)
    pub fn member_mut(&mut self, index: usize) -> Option<&mut Member> {
        self.members.get_mut(index.checked_sub(1)?)
    }

    /// Member blocks in order
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Append a non-member block, returning its 1-based index
    pub fn add_non_member(&mut self, non_member: NonMember) -> usize {
        self.non_members.push(non_member);
        self.non_members.len()
    }

    /// Remove non-member block `index` (1-based); later blocks move up
    pub fn remove_non_member(&mut self, index: usize) -> Option<NonMember> {
        let i = index.checked_sub(1).filter(|i| *i < self.non_members.len())?;
        Some(self.non_members.remove(i))
    }

    /// Non-member block `index` (1-based)
    pub fn non_member_mut(&mut self, index: usize) -> Option<&mut NonMember> {
        self.non_members.get_mut(index.checked_sub(1)?)
    }

    /// Non-member blocks in order
    #[must_use]
    pub fn non_members(&self) -> &[NonMember] {
        &self.non_members
    }

    /// Trimmed record body with the conditional-field rules applied
    #[must_use]
    pub fn collect(&self) -> RecordData {
        let o = &self.owner;
        let occupation = o.occupation.trim();
        let mut pd = PersonalDetails {
            name: trimmed(&o.name),
            dob: trimmed(&o.dob),
            house_name: trimmed(&o.house_name),
            gender: trimmed(&o.gender),
            pradeshika_sabha: trimmed(&o.pradeshika_sabha),
            photo_url: o.photo_url.clone(),
            blood_group: trimmed(&o.blood_group),
            occupation: occupation.to_string(),
            area_of_expertise: keep_if(needs_expertise(occupation), &o.area_of_expertise),
            phone: trimmed(&o.phone),
            email: trimmed(&o.email),
            membership_type: trimmed(&o.membership_type),
            highest_education: trimmed(&o.highest_education),
            address: spss_model::Address {
                address1: trimmed(&o.address.address1),
                address2: trimmed(&o.address.address2),
                place: trimmed(&o.address.place),
                pin: trimmed(&o.address.pin),
            },
            holds_spss_position: o.holds_spss_position,
            spss_position_name: keep_if(o.holds_spss_position, &o.spss_position_name),
            health_insurance: o.health_insurance,
            term_life_insurance: o.term_life_insurance,
            ration_card_type: trimmed(&o.ration_card_type),
        };
        if let Some(sabha) = &self.locked_sabha {
            pd.pradeshika_sabha.clone_from(sabha);
        }

        RecordData {
            personal_details: pd,
            members: self.members.iter().map(collect_member).collect(),
            non_members: self.non_members.iter().map(collect_non_member).collect(),
        }
    }

    /// Validate, then create or update
    ///
    /// Admins land on the dashboard after creating; everyone else on the
    /// success page. Updates return to the record's view page.
    ///
    /// # Errors
    /// Access and backend failures from [`MemberService`]
    pub async fn submit(
        &self,
        session: &Session,
        members: &MemberService,
    ) -> Result<SubmitOutcome, ConnectError> {
        let data = self.collect();
        let report = validate_form(&data);
        if !report.is_valid() {
            debug!(invalid = report.len(), "submit rejected by validation");
            return Ok(SubmitOutcome::Invalid(report));
        }

        if let Some(id) = &self.editing {
            members.update(session, id, data, self.shared).await?;
            return Ok(SubmitOutcome::Updated {
                redirect: format!("view?id={id}"),
                id: id.clone(),
            });
        }

        let id = members.create(session, data).await?;
        let redirect = if session.is_admin() {
            Route::Dashboard.path().to_string()
        } else {
            format!("success?id={id}")
        };
        Ok(SubmitOutcome::Created { id, redirect })
    }
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn keep_if(keep: bool, value: &str) -> String {
    if keep {
        trimmed(value)
    } else {
        String::new()
    }
}

fn collect_member(m: &Member) -> Member {
    let occupation = m.occupation.trim();
    Member {
        name: trimmed(&m.name),
        dob: trimmed(&m.dob),
        relationship: trimmed(&m.relationship),
        blood_group: trimmed(&m.blood_group),
        phone: trimmed(&m.phone),
        email: trimmed(&m.email),
        highest_education: trimmed(&m.highest_education),
        occupation: occupation.to_string(),
        area_of_expertise: keep_if(needs_expertise(occupation), &m.area_of_expertise),
        living_outside_kerala: m.living_outside_kerala,
        outside_reason: keep_if(m.living_outside_kerala, &m.outside_reason),
        membership_type: trimmed(&m.membership_type),
        holds_spss_position: m.holds_spss_position,
        spss_position_name: keep_if(m.holds_spss_position, &m.spss_position_name),
    }
}

fn collect_non_member(m: &NonMember) -> NonMember {
    let occupation = m.occupation.trim();
    NonMember {
        name: trimmed(&m.name),
        dob: trimmed(&m.dob),
        relationship: trimmed(&m.relationship),
        blood_group: trimmed(&m.blood_group),
        phone: trimmed(&m.phone),
        email: trimmed(&m.email),
        highest_education: trimmed(&m.highest_education),
        occupation: occupation.to_string(),
        area_of_expertise: keep_if(needs_expertise(occupation), &m.area_of_expertise),
        living_outside_kerala: m.living_outside_kerala,
        outside_reason: keep_if(m.living_outside_kerala, &m.outside_reason),
        reason_for_no_membership: trimmed(&m.reason_for_no_membership),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use spss_model::{Role, UserId, UserProfile};
    use spss_store::AuthUser;

    fn admin(role: Role, sabha: &str) -> Session {
        Session::signed_in(
            AuthUser { uid: UserId::from("u"), email: "a@b.in".into() },
            Some(UserProfile::new("a@b.in", role, Utc::now()).with_sabha(sabha)),
        )
    }

    #[test]
    fn blocks_renumber_on_removal() {
        let mut form = RecordForm::new();
        assert_eq!(form.add_member(Member { name: "one".into(), ..Member::default() }), 1);
        assert_eq!(form.add_member(Member { name: "two".into(), ..Member::default() }), 2);
        assert_eq!(form.add_member(Member { name: "three".into(), ..Member::default() }), 3);

        assert_eq!(form.remove_member(1).map(|m| m.name), Some("one".to_string()));
        assert_eq!(form.member_mut(1).map(|m| m.name.clone()), Some("two".to_string()));
        assert_eq!(form.members().len(), 2);
        assert!(form.remove_member(0).is_none());
        assert!(form.remove_member(3).is_none());
        assert!(form.remove_non_member(1).is_none());
    }

    #[test]
    fn conditional_fields_are_dropped() {
        let mut form = RecordForm::new();
        form.owner.occupation = "retired".into();
        form.owner.area_of_expertise = "Law".into();
        form.owner.holds_spss_position = false;
        form.owner.spss_position_name = "Secretary".into();
        form.add_member(Member {
            occupation: "govt".into(),
            area_of_expertise: " Finance ".into(),
            living_outside_kerala: false,
            outside_reason: "job".into(),
            holds_spss_position: true,
            spss_position_name: "Treasurer".into(),
            ..Member::default()
        });
        form.add_non_member(NonMember {
            living_outside_kerala: true,
            outside_reason: "studying".into(),
            reason_for_no_membership: "Minor".into(),
            ..NonMember::default()
        });

        let data = form.collect();
        assert_eq!(data.personal_details.area_of_expertise, "");
        assert_eq!(data.personal_details.spss_position_name, "");
        assert_eq!(data.members[0].area_of_expertise, "Finance");
        assert_eq!(data.members[0].outside_reason, "");
        assert_eq!(data.members[0].spss_position_name, "Treasurer");
        assert_eq!(data.non_members[0].outside_reason, "studying");
        assert_eq!(data.non_members[0].reason_for_no_membership, "Minor");
    }

    #[test]
    fn scoped_admin_sabha_is_locked() {
        let mut form = RecordForm::for_session(&admin(Role::Admin, "Aluva"));
        assert_eq!(form.locked_sabha(), Some("Aluva"));
        form.owner.pradeshika_sabha = "Edappally".into();
        assert_eq!(form.collect().personal_details.pradeshika_sabha, "Aluva");

        assert!(RecordForm::for_session(&admin(Role::SuperAdmin, "Aluva")).locked_sabha().is_none());
        assert!(RecordForm::for_session(&admin(Role::User, "Aluva")).locked_sabha().is_none());
        assert!(RecordForm::for_session(&admin(Role::Admin, "")).locked_sabha().is_none());
    }

    #[test]
    fn populate_switches_to_edit() {
        let record = Record {
            personal_details: PersonalDetails { name: "Asha".into(), ..PersonalDetails::default() },
            ..Record::default()
        }
        .with_id(RecordId::from("r1"));

        let mut form = RecordForm::new();
        form.populate(&record, true);
        assert_eq!(form.editing(), Some(&RecordId::from("r1")));
        assert_eq!(form.collect().personal_details.name, "Asha");
    }
}
