//! Record ordering for the dashboard

use serde::{Deserialize, Serialize};
use spss_model::Record;
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse `asc` / `desc`; anything but `desc` is ascending
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Owner field a record's sort key is read from
///
/// `name`, `pradeshikaSabha`, `bloodGroup`, `highestEducation` plus any other
/// owner field by its stored name. Unknown and non-text fields sort as empty.
#[must_use]
pub fn sort_value<'a>(record: &'a Record, field: &str) -> &'a str {
    let pd = &record.personal_details;
    match field {
        "name" => &pd.name,
        "pradeshikaSabha" => &pd.pradeshika_sabha,
        "bloodGroup" => &pd.blood_group,
        "highestEducation" => &pd.highest_education,
        "dob" => &pd.dob,
        "houseName" => &pd.house_name,
        "gender" => &pd.gender,
        "occupation" => &pd.occupation,
        "areaOfExpertise" => &pd.area_of_expertise,
        "phone" => &pd.phone,
        "email" => &pd.email,
        "membershipType" => &pd.membership_type,
        "spssPositionName" => &pd.spss_position_name,
        "rationCardType" => &pd.ration_card_type,
        _ => "",
    }
}

/// Case-insensitive comparison of two sort keys
///
/// Accents are not folded: `É` sorts after `Z`. Keys are compared by
/// lowercased code point, not by locale collation.
#[must_use]
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    let a = a.chars().flat_map(char::to_lowercase);
    let b = b.chars().flat_map(char::to_lowercase);
    a.cmp(b)
}

/// Sorted copy of `records`; stable, so equal keys keep their prior order
#[must_use]
pub fn sort<'a>(records: &[&'a Record], field: &str, direction: SortDirection) -> Vec<&'a Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| direction.apply(compare_keys(sort_value(a, field), sort_value(b, field))));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use spss_model::PersonalDetails;

    fn record(name: &str, blood: &str) -> Record {
        Record {
            personal_details: PersonalDetails {
                name: name.into(),
                blood_group: blood.into(),
                ..PersonalDetails::default()
            },
            ..Record::default()
        }
    }

    fn names(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.owner_name().to_string()).collect()
    }

    #[test]
    fn case_insensitive_ascending() {
        let data = vec![record("bindu", ""), record("Anil", ""), record("arun", "")];
        let refs: Vec<&Record> = data.iter().collect();
        assert_eq!(names(&sort(&refs, "name", SortDirection::Asc)), ["Anil", "arun", "bindu"]);
        assert_eq!(names(&sort(&refs, "name", SortDirection::Desc)), ["bindu", "arun", "Anil"]);
    }

    #[test]
    fn missing_values_sort_first_and_ties_are_stable() {
        let data = vec![record("C", "O+"), record("A", ""), record("B", "O+")];
        let refs: Vec<&Record> = data.iter().collect();
        assert_eq!(names(&sort(&refs, "bloodGroup", SortDirection::Asc)), ["A", "C", "B"]);
        // Unknown field: every key is empty, original order kept
        assert_eq!(names(&sort(&refs, "nope", SortDirection::Asc)), ["C", "A", "B"]);
    }

    #[test]
    fn accents_are_not_folded() {
        assert_eq!(compare_keys("ÉMILE", "émile"), Ordering::Equal);
        assert_eq!(compare_keys("Émile", "Zara"), Ordering::Greater);
    }

    #[test]
    fn direction_parse() {
        assert_eq!(SortDirection::parse("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse("sideways"), SortDirection::Asc);
    }
}
