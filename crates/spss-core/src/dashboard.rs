//! Dashboard table
//!
//! Holds the loaded records plus the search, sort and page state, and
//! produces a [`DashboardView`] through search → sort → clamp → paginate.

use crate::auth::Session;
use crate::config::ConnectConfig;
use crate::error::ConnectError;
use crate::members::MemberService;
use crate::messages;
use crate::pagination::Paginator;
use crate::search::search;
use crate::sort::{sort, SortDirection};
use chrono::{Local, NaiveDate};
use spss_access::{require_page, share_url, Page};
use spss_model::format::{age_on, format_dob, or_dash, plural};
use spss_model::{Record, RecordId};
use std::sync::Arc;
use tracing::{debug, info};

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRow {
    /// 1-based position across all pages
    pub index: usize,
    pub id: String,
    pub name: String,
    pub house_name: String,
    pub dob: String,
    /// `42 years`, a dash without a usable date
    pub age: String,
    pub sabha: String,
    pub place: String,
    pub phone: String,
    /// `2 members`
    pub members: String,
    /// `1 non-member`
    pub non_members: String,
}

/// Pagination control entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub label: String,
    /// Page the link leads to
    pub page: usize,
    pub active: bool,
    pub disabled: bool,
}

/// Rendered dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub rows: Vec<DashboardRow>,
    /// Empty when everything fits on one page
    pub pages: Vec<PageLink>,
    /// `Showing N record(s)`
    pub record_count: String,
    /// Shown instead of rows when nothing matches
    pub empty_message: Option<&'static str>,
    pub total: usize,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Dashboard state
pub struct Dashboard {
    members: MemberService,
    config: Arc<ConnectConfig>,
    records: Vec<Record>,
    query: String,
    sort_field: String,
    direction: SortDirection,
    paginator: Paginator,
}

impl Dashboard {
    /// Empty dashboard with the configured page size and default sort
    #[must_use]
    pub fn new(members: MemberService, config: Arc<ConnectConfig>) -> Self {
        Self {
            members,
            records: Vec::new(),
            query: String::new(),
            sort_field: config.default_sort_field.clone(),
            direction: config.default_sort_direction,
            paginator: Paginator::new(config.page_size),
            config,
        }
    }

    /// Fetch the records the session may see
    ///
    /// Everyone but super admins is limited to their own sabha when one is
    /// assigned.
    ///
    /// # Errors
    /// - `ConnectError::Access` when the role may not open the dashboard
    /// - `ConnectError::Store` on backend failure
    pub async fn load(&mut self, session: &Session) -> Result<usize, ConnectError> {
        require_page(Page::Dashboard, &session.viewer())?;

        let scope = session.pradeshika_sabha().filter(|_| !session.is_super_admin());
        self.records = match scope {
            Some(sabha) => self.members.list_by_sabha(sabha).await?,
            None => self.members.list_all().await?,
        };
        self.paginator.reset();

        info!(count = self.records.len(), sabha = scope.unwrap_or("all"), "dashboard loaded");
        Ok(self.records.len())
    }

    /// Loaded records in backend order
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Current search text
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Change the search text; back to page 1
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.paginator.reset();
    }

    /// Change the sort; back to page 1
    pub fn set_sort(&mut self, field: &str, direction: SortDirection) {
        self.sort_field = field.to_string();
        self.direction = direction;
        self.paginator.reset();
    }

    /// Jump to a page; out-of-range pages are clamped on render
    pub fn set_page(&mut self, page: usize) {
        self.paginator.set_page(page);
    }

    /// Search and sort the loaded records
    #[must_use]
    pub fn processed(&self) -> Vec<&Record> {
        process(&self.records, &self.query, &self.sort_field, self.direction)
    }

    /// Render with `query`, resetting the page if the text changed
    pub fn render(&mut self, query: &str) -> DashboardView {
        self.render_on(query, Local::now().date_naive())
    }

    /// [`Self::render`] with ages computed on `today`
    pub fn render_on(&mut self, query: &str, today: NaiveDate) -> DashboardView {
        if query != self.query {
            self.set_query(query);
        }

        let processed = process(&self.records, &self.query, &self.sort_field, self.direction);
        let total = processed.len();
        let current_page = self.paginator.clamp(total);
        let total_pages = self.paginator.total_pages(total);
        let offset = self.paginator.offset();

        let rows = self
            .paginator
            .paginate(&processed)
            .iter()
            .enumerate()
            .map(|(i, record)| row(offset + i + 1, record, today))
            .collect();

        debug!(total, current_page, total_pages, "dashboard rendered");
        DashboardView {
            rows,
            pages: page_links(current_page, total_pages),
            record_count: messages::showing_records(total),
            empty_message: (total == 0).then_some(messages::NO_RECORDS),
            total,
            current_page,
            total_pages,
        }
    }

    /// Delete from the backend and drop from the loaded set
    ///
    /// # Errors
    /// `ConnectError::Access` unless the role may delete
    pub async fn delete(&mut self, session: &Session, id: &RecordId) -> Result<(), ConnectError> {
        self.members.delete(session, id).await?;
        self.records.retain(|r| r.id.as_ref() != Some(id));
        Ok(())
    }

    /// Record behind row `index` (1-based, as numbered in the table)
    #[must_use]
    pub fn record_at(&self, index: usize) -> Option<&Record> {
        self.processed().get(index.checked_sub(1)?).copied()
    }

    /// Shareable edit link for a record
    #[must_use]
    pub fn share_url(&self, id: &RecordId) -> String {
        share_url(&self.config.share_base_url, id.as_str())
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("records", &self.records.len())
            .field("query", &self.query)
            .field("sort_field", &self.sort_field)
            .field("direction", &self.direction)
            .field("paginator", &self.paginator)
            .finish_non_exhaustive()
    }
}

fn process<'a>(
    records: &'a [Record],
    query: &str,
    field: &str,
    direction: SortDirection,
) -> Vec<&'a Record> {
    sort(&search(records, query), field, direction)
}

fn row(index: usize, record: &Record, today: NaiveDate) -> DashboardRow {
    let pd = &record.personal_details;
    DashboardRow {
        index,
        id: record.id_str().to_string(),
        name: or_dash(&pd.name).to_string(),
        house_name: pd.house_name.clone(),
        dob: format_dob(&pd.dob),
        age: age_on(&pd.dob, today).map_or_else(|| or_dash("").to_string(), |age| format!("{age} years")),
        sabha: or_dash(&pd.pradeshika_sabha).to_string(),
        place: pd.address.place.clone(),
        phone: or_dash(&pd.phone).to_string(),
        members: plural(record.members.len(), "member"),
        non_members: plural(record.non_members.len(), "non-member"),
    }
}

/// «, 1..=n, »; nothing for a single page
fn page_links(current: usize, total_pages: usize) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let mut links = Vec::with_capacity(total_pages + 2);
    links.push(PageLink {
        label: "«".to_string(),
        page: current.saturating_sub(1).max(1),
        active: false,
        disabled: current <= 1,
    });
    links.extend((1..=total_pages).map(|p| PageLink {
        label: p.to_string(),
        page: p,
        active: p == current,
        disabled: false,
    }));
    links.push(PageLink {
        label: "»".to_string(),
        page: (current + 1).min(total_pages),
        active: false,
        disabled: current >= total_pages,
    });
    links
}
