//! Table view-model: rendered rows, global filter and pagination.
//!
//! DESIGN
//! ======
//! Rows are rendered to display text once per list result and the filter runs
//! over that text, so what the user can see is exactly what they can search.
//! Paging state is kept as `(page_index, page_size)` and clamped against the
//! filtered row count whenever the page is computed, so a shrinking list
//! never leaves the table on a page past the end.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use users::{User, truncate_chars};

use crate::util::format::format_timestamp;

/// Selectable page sizes.
pub const PAGE_SIZE_OPTIONS: [usize; 6] = [5, 10, 20, 30, 40, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Characters of `about` shown before the preview is cut.
pub const ABOUT_PREVIEW_CHARS: usize = 20;
/// Placeholder for absent optional fields.
pub const NOT_PROVIDED: &str = "Not provided";
/// Shown in place of the table body when the list cannot be read.
pub const LIST_ERROR_MESSAGE: &str = "Failed to load users. Please try again later.";

/// Load state of the users list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ListPhase {
    #[default]
    Loading,
    Ready(Vec<User>),
    /// Read failed; carries the inline message shown in place of the table body.
    Failed(String),
}

/// Rendered `about` column: preview text plus the full text for the tooltip
/// when the preview is truncated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AboutCell {
    pub text: String,
    pub tooltip: Option<String>,
}

impl AboutCell {
    pub fn from_about(about: Option<&str>) -> Self {
        match about {
            None | Some("") => Self {
                text: NOT_PROVIDED.to_owned(),
                tooltip: None,
            },
            Some(full) if full.chars().count() > ABOUT_PREVIEW_CHARS => Self {
                text: truncate_chars(full, ABOUT_PREVIEW_CHARS),
                tooltip: Some(full.to_owned()),
            },
            Some(full) => Self {
                text: full.to_owned(),
                tooltip: None,
            },
        }
    }
}

/// One table row rendered to display text, plus the record it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub about: AboutCell,
    pub created: String,
    pub updated: String,
    pub user: User,
}

impl UserRow {
    pub fn from_user(user: &User) -> Self {
        let name = match user.name.as_deref() {
            None | Some("") => NOT_PROVIDED.to_owned(),
            Some(name) => name.to_owned(),
        };
        Self {
            id: user.id.clone(),
            name,
            email: user.email.clone(),
            about: AboutCell::from_about(user.about.as_deref()),
            created: format_timestamp(user.created_at),
            updated: format_timestamp(user.updated_at),
            user: user.clone(),
        }
    }

    /// Case-insensitive substring match over every rendered cell.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let tooltip = self.about.tooltip.as_deref().unwrap_or_default();
        [
            self.name.as_str(),
            self.email.as_str(),
            self.about.text.as_str(),
            tooltip,
            self.created.as_str(),
            self.updated.as_str(),
        ]
        .iter()
        .any(|cell| cell.to_lowercase().contains(needle))
    }
}

/// Render every user in server order.
pub fn rows_from_users(users: &[User]) -> Vec<UserRow> {
    users.iter().map(UserRow::from_user).collect()
}

/// Filter text and paging position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableState {
    pub filter: String,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            filter: String::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The slice of rows to display and the pager state around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TablePage {
    pub rows: Vec<UserRow>,
    pub page_index: usize,
    pub page_count: usize,
    /// Rows matching the filter across all pages.
    pub matched: usize,
}

impl TablePage {
    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self) -> bool {
        self.page_index + 1 < self.page_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TableState {
    /// Replace the filter text and return to the first page.
    pub fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.page_index = 0;
    }

    /// Switch page size, keeping the current top row on screen.
    ///
    /// Sizes outside [`PAGE_SIZE_OPTIONS`] are ignored. Returns whether the
    /// size changed.
    pub fn set_page_size(&mut self, page_size: usize, matched: usize) -> bool {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) || page_size == self.page_size {
            return false;
        }
        let top_row = self.page_index * self.page_size;
        self.page_size = page_size;
        self.page_index = top_row / page_size;
        self.clamp(matched);
        true
    }

    /// Number of pages for `matched` rows; an empty table still has one page.
    pub fn page_count(&self, matched: usize) -> usize {
        matched.div_ceil(self.page_size.max(1)).max(1)
    }

    pub fn clamp(&mut self, matched: usize) {
        self.page_index = self.page_index.min(self.page_count(matched) - 1);
    }

    pub fn previous(&mut self) {
        self.page_index = self.page_index.saturating_sub(1);
    }

    pub fn next(&mut self, matched: usize) {
        if self.page_index + 1 < self.page_count(matched) {
            self.page_index += 1;
        }
    }

    /// Rows matching the filter, in input order.
    pub fn filtered<'a>(&self, rows: &'a [UserRow]) -> Vec<&'a UserRow> {
        let needle = self.filter.to_lowercase();
        rows.iter().filter(|row| row.matches(&needle)).collect()
    }

    /// Filter `rows` and cut out the current page.
    pub fn page(&self, rows: &[UserRow]) -> TablePage {
        let filtered = self.filtered(rows);
        let matched = filtered.len();
        let page_count = self.page_count(matched);
        let page_index = self.page_index.min(page_count - 1);
        let start = page_index * self.page_size;
        let rows = filtered
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        TablePage {
            rows,
            page_index,
            page_count,
            matched,
        }
    }
}
