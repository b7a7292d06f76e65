//! Free-text record search

use spss_model::{Person, Record};

/// Records matching `query`
///
/// A blank query matches everything. Otherwise the trimmed, lower-cased
/// query must appear in one of the owner's searchable fields or in a
/// member's or non-member's.
#[must_use]
pub fn search<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|r| matches(r, &query)).collect()
}

/// Whether `record` matches an already-normalized query
#[must_use]
pub fn matches(record: &Record, query: &str) -> bool {
    searchable_fields(record).any(|field| field.to_lowercase().contains(query))
}

fn searchable_fields(record: &Record) -> impl Iterator<Item = &str> {
    let pd = &record.personal_details;
    let owner = [
        pd.name.as_str(),
        pd.pradeshika_sabha.as_str(),
        pd.blood_group.as_str(),
        pd.highest_education.as_str(),
        pd.house_name.as_str(),
        pd.occupation.as_str(),
    ];
    let members = record.members.iter().flat_map(|m| person_fields(m));
    let non_members = record.non_members.iter().flat_map(|m| person_fields(m));

    owner
        .into_iter()
        .chain(members)
        .chain(non_members)
        .filter(|f| !f.is_empty())
}

fn person_fields<P: Person>(person: &P) -> [&str; 4] {
    [
        person.name(),
        person.blood_group(),
        person.highest_education(),
        person.occupation(),
    ]
}
