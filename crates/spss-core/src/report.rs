//! Printable record reports
//!
//! Builds the HTML that the PDF renderer consumes:
//! - single household report with every section
//! - sabha and full dataset tables
//!
//! Rendering to a file goes through [`ReportRenderer`].

use crate::auth::Session;
use crate::config::ConnectConfig;
use crate::error::{ConnectError, ReportError};
use async_trait::async_trait;
use spss_access::Action;
use spss_model::format::{format_dob, format_label, EMPTY};
use spss_model::{Member, NonMember, Person, Record};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;

const PRIMARY: &str = "#7a2e04";
const KEEP_TOGETHER: &str =
    "display:table;width:100%;page-break-inside:avoid;break-inside:avoid;overflow:hidden;";
const CELL: &str = "padding:4px;border:1px solid #ddd;";
const HEAD_CELL: &str = "padding:6px;border:1px solid #ddd;";

/// Report ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Suggested output name, e.g. `Asha_Menon.pdf`
    pub filename: String,
    pub html: String,
}

/// Escape text for HTML content and attributes
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds report HTML with the configured letterhead
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    org_name: String,
    org_subtitle: String,
}

impl ReportBuilder {
    /// Letterhead from configuration
    #[must_use]
    pub fn new(config: &ConnectConfig) -> Self {
        Self {
            org_name: config.org_name.clone(),
            org_subtitle: config.org_subtitle.clone(),
        }
    }

    fn letterhead(&self) -> String {
        format!(
            "<div style=\"text-align:center;margin-bottom:8px;\">\
             <img src=\"assets/logo.png\" style=\"width:80px;height:auto;\">\
             <h1 style=\"margin:6px 0 2px;font-size:18px;color:{PRIMARY};font-weight:800;\">{}</h1>\
             <p style=\"margin:0 0 8px;font-size:13px;color:#555;font-weight:600;\">{}</p>\
             <hr style=\"border:none;border-top:2.5px solid {PRIMARY};margin:0 auto 16px;width:100%;\">\
             </div>",
            escape_html(&self.org_name),
            escape_html(&self.org_subtitle),
        )
    }

    /// One household, every section
    #[must_use]
    pub fn member_report(&self, record: &Record) -> Report {
        let pd = &record.personal_details;
        let addr = &pd.address;

        let mut personal = vec![
            row("Name", &pd.name),
            row("House Name", &pd.house_name),
            row("Date of Birth", &format_dob(&pd.dob)),
            row("Gender", &label(&pd.gender)),
            row("Phone", &pd.phone),
            row("Email", &pd.email),
            row("Blood Group", &pd.blood_group),
            row("Education", &label(&pd.highest_education)),
            row("Occupation", &label(&pd.occupation)),
        ];
        if !pd.area_of_expertise.is_empty() {
            personal.push(row("Area of Expertise", &pd.area_of_expertise));
        }

        let mut membership = vec![
            row("Pradeshika Sabha", &pd.pradeshika_sabha),
            row("Membership", &label(&pd.membership_type)),
        ];
        if pd.holds_spss_position {
            membership.push(row("SPSS Position", &pd.spss_position_name));
        }

        let mut welfare = vec![
            row("Family Health Insurance", yes_no(pd.health_insurance)),
            row("Term/Life Insurance", yes_no(pd.term_life_insurance)),
        ];
        if !pd.ration_card_type.is_empty() {
            welfare.push(row("Ration Card Color", &label(&pd.ration_card_type)));
        }

        let mut html = String::from("<div style=\"font-family:Arial,sans-serif;font-size:12px;color:#333;\">");
        html.push_str(&self.letterhead());
        html.push_str(&section("Personal Details", &personal));
        html.push_str(&section("Membership Details", &membership));
        html.push_str(&section("Family & Welfare", &welfare));
        html.push_str(&format!(
            "<div style=\"{KEEP_TOGETHER}\"><h4 style=\"color:{PRIMARY};\">Address</h4>\
             <p style=\"margin:4px 0;\">{} {}<br>{} — {}</p></div>",
            escape_html(&addr.address1),
            escape_html(&addr.address2),
            escape_html(&addr.place),
            escape_html(&addr.pin),
        ));
        if !record.members.is_empty() {
            html.push_str(&person_list("Members", &record.members, member_rows));
        }
        if !record.non_members.is_empty() {
            html.push_str(&person_list("Non-Members", &record.non_members, non_member_rows));
        }
        html.push_str("</div>");

        Report {
            filename: format!("{}.pdf", safe_stem(&pd.name, "record")),
            html,
        }
    }

    /// Households of one sabha, matched case-insensitively
    ///
    /// # Errors
    /// `ReportError::NoRecords` when no household belongs to `sabha`
    pub fn sabha_report(&self, records: &[Record], sabha: &str) -> Result<Report, ReportError> {
        let wanted = sabha.to_lowercase();
        let matched: Vec<&Record> = records
            .iter()
            .filter(|r| r.sabha().to_lowercase() == wanted)
            .collect();
        if matched.is_empty() {
            return Err(ReportError::NoRecords {
                sabha: Some(sabha.to_string()),
            });
        }
        Ok(Report {
            filename: format!("SPSS_{}.pdf", safe_stem(sabha, "sabha")),
            html: self.table(&matched),
        })
    }

    /// Every household
    ///
    /// # Errors
    /// `ReportError::NoRecords` when `records` is empty
    pub fn full_report(&self, records: &[Record]) -> Result<Report, ReportError> {
        if records.is_empty() {
            return Err(ReportError::NoRecords { sabha: None });
        }
        let all: Vec<&Record> = records.iter().collect();
        Ok(Report {
            filename: "SPSS_Full_Dataset.pdf".to_string(),
            html: self.table(&all),
        })
    }

    fn table(&self, records: &[&Record]) -> String {
        let mut body = String::new();
        for (i, record) in records.iter().enumerate() {
            let pd = &record.personal_details;
            body.push_str(&format!(
                "<tr><td style=\"{CELL}\">{}</td><td style=\"{CELL}\">{}</td>\
                 <td style=\"{CELL}\">{}</td><td style=\"{CELL}\">{}</td>\
                 <td style=\"{CELL}\">{}</td><td style=\"{CELL}\">{}</td></tr>",
                i + 1,
                value(&pd.name),
                value(&pd.house_name),
                value(&pd.pradeshika_sabha),
                value(&pd.phone),
                record.members.len(),
            ));
        }

        let head: String = ["#", "Name", "House", "Pradeshika Sabha", "Phone", "Members"]
            .iter()
            .map(|h| format!("<th style=\"{HEAD_CELL}\">{h}</th>"))
            .collect();

        format!(
            "<div style=\"font-family:Arial,sans-serif;font-size:11px;color:#333;\">{}\
             <table style=\"width:100%;border-collapse:collapse;font-size:10px;\">\
             <thead><tr style=\"background:{PRIMARY};color:#fff;\">{head}</tr></thead>\
             <tbody>{body}</tbody></table></div>",
            self.letterhead(),
        )
    }
}

/// Turns report HTML into an output file
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render `report`, returning where it was written
    async fn render(&self, report: &Report) -> Result<PathBuf, ReportError>;
}

/// Writes the HTML document into a directory, named after the report
///
/// `Asha_Menon.pdf` is written as `Asha_Menon.html`, ready for any
/// HTML-to-PDF tool.
#[derive(Debug, Clone)]
pub struct HtmlFileRenderer {
    out_dir: PathBuf,
}

impl HtmlFileRenderer {
    /// Create renderer writing into `out_dir`
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    /// Output directory
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

#[async_trait]
impl ReportRenderer for HtmlFileRenderer {
    async fn render(&self, report: &Report) -> Result<PathBuf, ReportError> {
        // Output must land directly in out_dir
        if Path::new(&report.filename).file_name().and_then(OsStr::to_str) != Some(report.filename.as_str()) {
            return Err(ReportError::UnsafeName { name: report.filename.clone() });
        }
        let path = self.out_dir.join(&report.filename).with_extension("html");
        let io = |source: std::io::Error| ReportError::Io { path: path.clone(), source };

        tokio::fs::create_dir_all(&self.out_dir).await.map_err(io)?;
        let document = format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>\n",
            escape_html(&report.filename),
            report.html,
        );
        tokio::fs::write(&path, document).await.map_err(io)?;
        Ok(path)
    }
}

/// Render a report for a session allowed to export
///
/// # Errors
/// - `ConnectError::Access` unless the role may export
/// - `ConnectError::Report` when the renderer fails
pub async fn export(
    session: &Session,
    renderer: &dyn ReportRenderer,
    report: &Report,
) -> Result<PathBuf, ConnectError> {
    session.require(Action::ExportPdf)?;
    let path = renderer.render(report).await?;
    info!(file = %report.filename, path = %path.display(), "report exported");
    Ok(path)
}

/// File stem from free text: words joined by `_`, keeping only letters,
/// digits, `-` and `_`
fn safe_stem(text: &str, fallback: &str) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .map(|word| word.chars().filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_')).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        fallback.to_string()
    } else {
        words.join("_")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Label for a stored key; blank stays blank so the row shows the dash
fn label(key: &str) -> String {
    if key.is_empty() {
        String::new()
    } else {
        format_label(key)
    }
}

/// Escaped value or the dash
fn value(text: &str) -> String {
    if text.is_empty() {
        EMPTY.to_string()
    } else {
        escape_html(text)
    }
}

fn row(name: &str, text: &str) -> String {
    format!(
        "<tr><td style=\"padding:4px 8px;border-bottom:1px solid #eee;font-weight:600;width:180px;\">{}</td>\
         <td style=\"padding:4px 8px;border-bottom:1px solid #eee;\">{}</td></tr>",
        escape_html(name),
        value(text),
    )
}

fn section(heading: &str, rows: &[String]) -> String {
    format!(
        "<div style=\"{KEEP_TOGETHER}\"><h4 style=\"color:{PRIMARY};\">{}</h4>\
         <table style=\"width:100%;border-collapse:collapse;margin-bottom:16px;\">{}</table></div>",
        escape_html(heading),
        rows.concat(),
    )
}

fn person_rows<P: Person>(p: &P, dob: &str, relationship: &str) -> Vec<String> {
    vec![
        row("Date of Birth", &format_dob(dob)),
        row("Relationship", &label(relationship)),
        row("Phone", p.phone()),
        row("Email", p.email()),
        row("Blood Group", p.blood_group()),
        row("Education", &label(p.highest_education())),
        row("Occupation", &label(p.occupation())),
    ]
}

fn outside_rows(living_outside: bool, reason: &str) -> Vec<String> {
    let mut rows = vec![row("Living Outside Kerala", yes_no(living_outside))];
    if living_outside {
        rows.push(row("Reason", &label(reason)));
    }
    rows
}

fn member_rows(m: &Member) -> Vec<String> {
    let mut rows = person_rows(m, &m.dob, &m.relationship);
    let mut at = 2;
    if !m.membership_type.is_empty() {
        rows.insert(at, row("Membership", &label(&m.membership_type)));
        at += 1;
    }
    if m.holds_spss_position {
        rows.insert(at, row("SPSS Position", &m.spss_position_name));
    }
    if !m.area_of_expertise.is_empty() {
        rows.push(row("Area of Expertise", &m.area_of_expertise));
    }
    rows.extend(outside_rows(m.living_outside_kerala, &m.outside_reason));
    rows
}

fn non_member_rows(m: &NonMember) -> Vec<String> {
    let mut rows = person_rows(m, &m.dob, &m.relationship);
    if !m.area_of_expertise.is_empty() {
        rows.push(row("Area of Expertise", &m.area_of_expertise));
    }
    rows.push(row("Reason for No Membership", &m.reason_for_no_membership));
    rows.extend(outside_rows(m.living_outside_kerala, &m.outside_reason));
    rows
}

fn person_list<P: Person>(heading: &str, persons: &[P], rows: fn(&P) -> Vec<String>) -> String {
    let mut html = format!(
        "<h4 style=\"color:{PRIMARY};margin-top:16px;page-break-after:avoid;break-after:avoid;\">{}</h4>",
        escape_html(heading)
    );
    for (i, person) in persons.iter().enumerate() {
        html.push_str(&format!(
            "<div style=\"{KEEP_TOGETHER}margin-bottom:12px;padding:8px;border:1px solid #ddd;\">\
             <h5 style=\"margin:0 0 6px;color:{PRIMARY};\">#{} — {}</h5>\
             <table style=\"width:100%;border-collapse:collapse;font-size:11px;\">{}</table></div>",
            i + 1,
            value(person.name()),
            rows(person).concat(),
        ));
    }
    html
}
