//! Plain-text rendering of service results

use spss_core::import::ImportReport;
use spss_core::{DashboardView, RecordView, Session, SubmitOutcome, UserRow, ValidationReport};
use std::fmt::Write;

pub(crate) fn whoami(session: &Session) -> String {
    match session.email() {
        Some(email) => match session.pradeshika_sabha() {
            Some(sabha) => format!("{email} ({}, {sabha})\n", session.role()),
            None => format!("{email} ({})\n", session.role()),
        },
        None => "guest\n".to_string(),
    }
}

pub(crate) fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    if let Some(message) = view.empty_message {
        let _ = writeln!(out, "{message}");
    }
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:<12} {:<10} {:<14} {:<12} {} / {}  [{}]",
            row.index,
            row.name,
            row.dob,
            row.age,
            row.sabha,
            row.phone,
            row.members,
            row.non_members,
            row.id,
        );
    }
    let _ = writeln!(out, "{}", view.record_count);
    if view.total_pages > 1 {
        let _ = writeln!(out, "Page {} of {}", view.current_page, view.total_pages);
    }
    out
}

pub(crate) fn record_view(view: &RecordView) -> String {
    let mut out = String::new();
    for section in &view.sections {
        let _ = writeln!(out, "== {} ==", section.title);
        for field in &section.fields {
            let _ = writeln!(out, "  {:<18} {}", field.label, field.value);
        }
    }
    if view.mode.is_edit() {
        let _ = writeln!(out, "(editable: {:?})", view.mode);
    }
    out
}

pub(crate) fn validation(report: &ValidationReport) -> String {
    if report.is_valid() {
        return "Valid\n".to_string();
    }
    let mut out = format!("{}\n", report.summary());
    for (field, message) in report.iter() {
        let _ = writeln!(out, "  {field}: {message}");
    }
    out
}

pub(crate) fn submit(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Created { id, redirect } => {
            format!("{} {id}\n-> {redirect}\n", spss_core::messages::RECORD_CREATED)
        }
        SubmitOutcome::Updated { id, redirect } => {
            format!("{} {id}\n-> {redirect}\n", spss_core::messages::RECORD_UPDATED)
        }
        SubmitOutcome::Invalid(report) => validation(report),
    }
}

pub(crate) fn import(report: &ImportReport) -> String {
    let mut out = format!("{}\n", report.summary());
    for skipped in &report.skipped {
        let _ = writeln!(out, "  #{}: {}", skipped.index, skipped.reason);
    }
    out
}

pub(crate) fn users(rows: &[UserRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", spss_core::messages::NO_USERS);
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:>3}  {:<32} {:<12} {:<14} {}",
            row.index,
            row.email,
            row.role.as_str(),
            row.sabha,
            row.created
        );
    }
    out
}
