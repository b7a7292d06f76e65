//! Option catalogs
//!
//! Keys are what gets stored in documents; labels are the English display
//! text used by reports and the CLI.

/// One selectable option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Stored key
    pub key: &'static str,
    /// Display label
    pub label: &'static str,
}

const fn entry(key: &'static str, label: &'static str) -> CatalogEntry {
    CatalogEntry { key, label }
}

/// A fixed list of options
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    /// Catalog name, used in diagnostics
    pub name: &'static str,
    entries: &'static [CatalogEntry],
}

impl Catalog {
    /// All entries in display order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    /// Stored keys in display order
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|e| e.key)
    }

    /// Whether `key` is a known option
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Display label for `key`
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&'static str> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.label)
    }
}

pub const PRADESHIKA_SABHAS: Catalog = Catalog {
    name: "pradeshikaSabha",
    entries: &[
        entry("Ernakulam", "Ernakulam"),
        entry("Edappally", "Edappally"),
        entry("Tripunithura", "Tripunithura"),
        entry("Chottanikkara", "Chottanikkara"),
        entry("Perumbavoor", "Perumbavoor"),
        entry("Aluva", "Aluva"),
        entry("Panangad", "Panangad"),
    ],
};

pub const OCCUPATIONS: Catalog = Catalog {
    name: "occupation",
    entries: &[
        entry("govt", "Government"),
        entry("private", "Private"),
        entry("business", "Business"),
        entry("kazhakam", "Kazhakam"),
        entry("retired", "Retired"),
        entry("non_salaried", "Non-Salaried"),
    ],
};

/// Member occupations add `student` to the owner list
pub const MEMBER_OCCUPATIONS: Catalog = Catalog {
    name: "memberOccupation",
    entries: &[
        entry("govt", "Government"),
        entry("private", "Private"),
        entry("business", "Business"),
        entry("kazhakam", "Kazhakam"),
        entry("retired", "Retired"),
        entry("non_salaried", "Non-Salaried"),
        entry("student", "Student"),
    ],
};

/// Occupations for which the form asks for an area of expertise
pub const EXPERTISE_OCCUPATIONS: &[&str] = &["govt", "private", "business"];

pub const BLOOD_GROUPS: Catalog = Catalog {
    name: "bloodGroup",
    entries: &[
        entry("A+", "A+"),
        entry("A-", "A-"),
        entry("B+", "B+"),
        entry("B-", "B-"),
        entry("AB+", "AB+"),
        entry("AB-", "AB-"),
        entry("O+", "O+"),
        entry("O-", "O-"),
    ],
};

pub const GENDERS: Catalog = Catalog {
    name: "gender",
    entries: &[
        entry("male", "Male"),
        entry("female", "Female"),
        entry("other", "Other"),
    ],
};

pub const MEMBERSHIP_TYPES: Catalog = Catalog {
    name: "membershipType",
    entries: &[
        entry("life_member", "Life Member"),
        entry("ordinary_member", "Ordinary Member"),
    ],
};

pub const EDUCATION: Catalog = Catalog {
    name: "highestEducation",
    entries: &[
        entry("below_10th", "Below 10th"),
        entry("10th", "10th"),
        entry("plus_two", "Plus Two"),
        entry("diploma", "Diploma"),
        entry("bachelors", "Bachelor's Degree"),
        entry("masters", "Master's Degree"),
        entry("doctorate", "Doctorate"),
        entry("professional", "Professional"),
        entry("other", "Other"),
    ],
};

pub const OUTSIDE_REASONS: Catalog = Catalog {
    name: "outsideReason",
    entries: &[entry("studying", "Studying"), entry("job", "Job")],
};

pub const RELATIONSHIPS: Catalog = Catalog {
    name: "relationship",
    entries: &[
        entry("spouse", "Spouse"),
        entry("son", "Son"),
        entry("daughter", "Daughter"),
        entry("father", "Father"),
        entry("mother", "Mother"),
        entry("brother", "Brother"),
        entry("sister", "Sister"),
        entry("daughter_in_law", "Daughter-in-law"),
        entry("son_in_law", "Son-in-law"),
        entry("grandchild", "Grandchild"),
        entry("other", "Other"),
    ],
};

pub const RATION_CARD_TYPES: Catalog = Catalog {
    name: "rationCardType",
    entries: &[
        entry("none", "No Ration Card"),
        entry("white", "White"),
        entry("yellow", "Yellow"),
        entry("pink", "Pink"),
        entry("blue", "Blue"),
    ],
};

/// Whether an occupation reveals the area-of-expertise field
#[inline]
#[must_use]
pub fn needs_expertise(occupation: &str) -> bool {
    EXPERTISE_OCCUPATIONS.contains(&occupation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_occupations_extend_owner_list() {
        for key in OCCUPATIONS.keys() {
            assert!(MEMBER_OCCUPATIONS.contains(key), "{key} missing");
        }
        assert!(MEMBER_OCCUPATIONS.contains("student"));
        assert!(!OCCUPATIONS.contains("student"));
    }

    #[test]
    fn labels_resolve() {
        assert_eq!(MEMBERSHIP_TYPES.label("life_member"), Some("Life Member"));
        assert_eq!(BLOOD_GROUPS.label("Z+"), None);
    }

    #[test]
    fn expertise_occupations_are_known() {
        for key in EXPERTISE_OCCUPATIONS {
            assert!(OCCUPATIONS.contains(key));
        }
        assert!(needs_expertise("govt"));
        assert!(!needs_expertise("retired"));
    }

    #[test]
    fn seven_sabhas() {
        assert_eq!(PRADESHIKA_SABHAS.entries().len(), 7);
    }
}
