//! Entry form validation
//!
//! Errors are keyed by the form field id they belong to (`ownerName`,
//! `member_phone_2`, ...) and kept in form order.

use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use spss_model::contact::is_email;
use spss_model::format::parse_dob;
use spss_model::{Address, Person, PersonalDetails, RecordData};

static PIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("pin regex is valid"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone regex is valid"));

pub const REQUIRED: &str = "This field is required";
pub const NAME_REQUIRED: &str = "Name is required";
pub const DOB_REQUIRED: &str = "Date of birth is required";
pub const DOB_FUTURE: &str = "Date of birth cannot be in the future";
pub const GENDER_REQUIRED: &str = "Gender is required";
pub const HOUSE_NAME_REQUIRED: &str = "House name is required";
pub const SABHA_REQUIRED: &str = "Pradeshika Sabha is required";
pub const BLOOD_GROUP_REQUIRED: &str = "Blood group is required";
pub const OCCUPATION_REQUIRED: &str = "Occupation is required";
pub const MEMBERSHIP_REQUIRED: &str = "Membership type is required";
pub const EDUCATION_REQUIRED: &str = "Education is required";
pub const ADDRESS1_REQUIRED: &str = "Address Line 1 is required";
pub const PLACE_REQUIRED: &str = "Place is required";
pub const PIN_INVALID: &str = "Enter a valid 6-digit PIN";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const PHONE_INVALID: &str = "Enter a valid 10-digit phone number";
pub const EMAIL_INVALID: &str = "Enter a valid email address";

/// Result of one field check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCheck {
    pub valid: bool,
    pub message: &'static str,
}

impl FieldCheck {
    const OK: FieldCheck = FieldCheck { valid: true, message: "" };

    const fn fail(message: &'static str) -> Self {
        Self { valid: false, message }
    }

    fn when(valid: bool, message: &'static str) -> Self {
        if valid {
            Self::OK
        } else {
            Self::fail(message)
        }
    }
}

/// Non-blank
#[must_use]
pub fn required(value: &str) -> FieldCheck {
    FieldCheck::when(!value.trim().is_empty(), REQUIRED)
}

/// Optional; when present must look like an email address
#[must_use]
pub fn email(value: &str) -> FieldCheck {
    let value = value.trim();
    FieldCheck::when(value.is_empty() || is_email(value), EMAIL_INVALID)
}

/// Required, exactly 6 digits
#[must_use]
pub fn pin(value: &str) -> FieldCheck {
    FieldCheck::when(PIN.is_match(value.trim()), PIN_INVALID)
}

/// Optional; when present exactly 10 digits
#[must_use]
pub fn phone(value: &str) -> FieldCheck {
    let value = value.trim();
    FieldCheck::when(value.is_empty() || PHONE.is_match(value), PHONE_INVALID)
}

/// Required date, not after today
#[must_use]
pub fn dob(value: &str) -> FieldCheck {
    dob_on(value, Local::now().date_naive())
}

/// [`dob`] against a fixed day
#[must_use]
pub fn dob_on(value: &str, today: NaiveDate) -> FieldCheck {
    match parse_dob(value) {
        None => FieldCheck::fail(DOB_REQUIRED),
        Some(date) if date > today => FieldCheck::fail(DOB_FUTURE),
        Some(_) => FieldCheck::OK,
    }
}

/// Field id → message, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: IndexMap<String, &'static str>,
}

impl ValidationReport {
    /// Empty report
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No errors
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of invalid fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Same as [`Self::is_valid`]
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field id
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.errors.get(field).copied()
    }

    /// Field ids and messages in form order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// `n field(s) need attention. ...`
    #[must_use]
    pub fn summary(&self) -> String {
        crate::messages::validation_summary(self.len())
    }

    /// Record `check` under `field`; `message` replaces the check's own text
    fn check(&mut self, field: impl Into<String>, check: FieldCheck, message: Option<&'static str>) {
        if !check.valid {
            self.errors.insert(field.into(), message.unwrap_or(check.message));
        }
    }

    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
    }
}

/// House owner fields
#[must_use]
pub fn validate_personal_details(pd: &PersonalDetails) -> ValidationReport {
    validate_personal_details_on(pd, Local::now().date_naive())
}

fn validate_personal_details_on(pd: &PersonalDetails, today: NaiveDate) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.check("ownerName", required(&pd.name), Some(NAME_REQUIRED));
    report.check("ownerDOB", dob_on(&pd.dob, today), None);
    report.check("ownerGender", required(&pd.gender), Some(GENDER_REQUIRED));
    report.check("houseName", required(&pd.house_name), Some(HOUSE_NAME_REQUIRED));
    report.check("pradeshikaSabha", required(&pd.pradeshika_sabha), Some(SABHA_REQUIRED));
    report.check("ownerBloodGroup", required(&pd.blood_group), Some(BLOOD_GROUP_REQUIRED));
    report.check("ownerOccupation", required(&pd.occupation), Some(OCCUPATION_REQUIRED));
    report.check("ownerMembership", required(&pd.membership_type), Some(MEMBERSHIP_REQUIRED));
    report.check("ownerEducation", required(&pd.highest_education), Some(EDUCATION_REQUIRED));
    if pd.phone.trim().is_empty() {
        report.check("ownerPhone", FieldCheck::fail(PHONE_REQUIRED), None);
    } else {
        report.check("ownerPhone", phone(&pd.phone), None);
    }
    report.check("ownerEmail", email(&pd.email), None);
    report
}

/// Address fields
#[must_use]
pub fn validate_address(address: &Address) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.check("address1", required(&address.address1), Some(ADDRESS1_REQUIRED));
    report.check("place", required(&address.place), Some(PLACE_REQUIRED));
    report.check("pin", pin(&address.pin), None);
    report
}

/// One member or non-member block; `index` is 1-based
#[must_use]
pub fn validate_member_entry<P: Person + ?Sized>(entry: &P, index: usize, prefix: &str) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.check(format!("{prefix}_name_{index}"), required(entry.name()), Some(NAME_REQUIRED));
    report.check(format!("{prefix}_phone_{index}"), phone(entry.phone()), None);
    report.check(format!("{prefix}_email_{index}"), email(entry.email()), None);
    report
}

/// Whole form
#[must_use]
pub fn validate_form(data: &RecordData) -> ValidationReport {
    validate_form_on(data, Local::now().date_naive())
}

/// [`validate_form`] against a fixed day
#[must_use]
pub fn validate_form_on(data: &RecordData, today: NaiveDate) -> ValidationReport {
    let mut report = validate_personal_details_on(&data.personal_details, today);
    report.merge(validate_address(&data.personal_details.address));
    for (i, member) in data.members.iter().enumerate() {
        report.merge(validate_member_entry(member, i + 1, "member"));
    }
    for (i, non_member) in data.non_members.iter().enumerate() {
        report.merge(validate_member_entry(non_member, i + 1, "nonMember"));
    }
    report
}
