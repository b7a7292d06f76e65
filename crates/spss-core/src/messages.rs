//! User-facing message strings

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";

pub const NO_RECORDS: &str = "No records found.";
pub const LOAD_ERROR: &str = "Failed to load records.";
pub const RECORD_CREATED: &str = "Record created successfully!";
pub const RECORD_UPDATED: &str = "Record updated successfully!";
pub const SELECT_SABHA: &str = "Please select a Pradeshika Sabha.";

pub const DELETE_SUCCESS: &str = "Record deleted.";
pub const DELETE_FAIL: &str = "Failed to delete record.";

pub const RECORD_NOT_FOUND: &str = "Record not found. It may have been deleted.";
pub const NO_RECORD_ID: &str =
    "No record specified. Please go back to the dashboard and select a record.";
pub const PERMISSION_DENIED: &str =
    "You do not have permission to view this record. Please contact an administrator.";
pub const RECORD_LOAD_FAIL: &str = "Failed to load record. Please try again.";
pub const SHARE_COPIED: &str = "Shareable edit link copied to clipboard!";

/// Appended to the invalid field count
pub const VALIDATION_ATTENTION: &str =
    " field(s) need attention. Please check the highlighted fields.";

pub const NO_USERS: &str = "No users found.";
pub const USERS_LOAD_FAIL: &str = "Failed to load users.";

pub const IMPORT_NO_DATA: &str = "No JSON data provided.";
pub const IMPORT_INVALID_JSON: &str = "Invalid JSON format.";
pub const IMPORT_NO_VALID: &str = "No valid records to import.";
pub const IMPORT_FAIL: &str = "Import failed.";

pub const PDF_NO_RECORDS: &str = "No records to export.";
pub const PDF_FAIL: &str = "PDF generation failed.";

/// `3 field(s) need attention. ...`
#[must_use]
pub fn validation_summary(count: usize) -> String {
    format!("{count}{VALIDATION_ATTENTION}")
}

/// `Showing 1 record` / `Showing 4 records`
#[must_use]
pub fn showing_records(total: usize) -> String {
    format!("Showing {}", spss_model::format::plural(total, "record"))
}
