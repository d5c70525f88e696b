//! Per-popup session state: pagination, accumulation, and scroll.
//!
//! Each open-to-close lifetime of a list popup is one session. A session
//! owns its accumulated list, filtered view, pagination cursor, and scroll
//! state; its number is the key used to drop stale fetch results. Opening
//! or switching a popup always starts a fresh session, so no scroll or
//! list state can bleed between the two popups.

use crate::contact::Contact;
use crate::filter::ContactFilter;

/// Identity of a list popup: the unscoped collection or the
/// country-scoped one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    All,
    Country,
}

impl ListKind {
    /// Letter mirrored into the route marker (`modal=A` / `modal=B`).
    pub fn marker_letter(self) -> char {
        match self {
            ListKind::All => 'A',
            ListKind::Country => 'B',
        }
    }

    pub fn from_marker_letter(letter: char) -> Option<Self> {
        match letter {
            'A' => Some(ListKind::All),
            'B' => Some(ListKind::Country),
            _ => None,
        }
    }

    /// Popup title shown in the overlay border.
    pub fn title(self, country: &str) -> String {
        match self {
            ListKind::All => "All Contacts".to_string(),
            ListKind::Country => {
                if country.eq_ignore_ascii_case("united states") {
                    "US Contacts".to_string()
                } else {
                    format!("{} Contacts", country)
                }
            }
        }
    }
}

/// Rows the viewport is assumed to show before the first render pass
/// reports the real height.
const DEFAULT_VIEWPORT: usize = 10;

/// State of one list popup session.
#[derive(Debug, Clone)]
pub struct ListSession {
    pub kind: ListKind,
    /// Stale-guard key: fetch results carry it and are dropped when it no
    /// longer matches the open session.
    pub id: u64,
    /// Accumulated list, append-only within the session.
    pub contacts: Vec<Contact>,
    /// Filtered view: indices into `contacts`, in original order.
    pub filtered: Vec<usize>,
    /// Last page applied (0 before page 1 lands).
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    /// Cursor position within the filtered view.
    pub cursor: usize,
    /// First visible row of the filtered view.
    pub scroll: usize,
    /// Viewport height in rows, updated during rendering.
    pub viewport: usize,
}

impl ListSession {
    pub fn new(kind: ListKind, id: u64) -> Self {
        Self {
            kind,
            id,
            contacts: Vec::new(),
            filtered: Vec::new(),
            page: 0,
            has_more: true,
            loading: false,
            cursor: 0,
            scroll: 0,
            viewport: DEFAULT_VIEWPORT,
        }
    }

    /// Apply a successfully fetched page: page 1 replaces the accumulated
    /// list, later pages append. A page shorter than `page_size` is the
    /// end of the collection and stops further pagination.
    pub fn apply_page(&mut self, page: u32, batch: Vec<Contact>, page_size: usize) {
        self.loading = false;
        self.has_more = batch.len() >= page_size;
        if page == 1 {
            self.contacts = batch;
        } else {
            self.contacts.extend(batch);
        }
        self.page = page;
    }

    /// A fetch for this session failed: clear the loading flag, leave
    /// everything else untouched.
    pub fn fetch_failed(&mut self) {
        self.loading = false;
    }

    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    /// Recompute the filtered view and keep cursor and scroll in range.
    pub fn refresh_filter(&mut self, filter: &ContactFilter) {
        self.filtered = filter.apply(&self.contacts);
        self.clamp();
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.filtered
            .get(self.cursor)
            .and_then(|&idx| self.contacts.get(idx))
    }

    /// Move the cursor within the filtered view, scrolling to keep it
    /// visible.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.scroll = 0;
            return;
        }
        let max = self.filtered.len() - 1;
        let cursor = self.cursor as isize + delta;
        self.cursor = cursor.clamp(0, max as isize) as usize;
        self.scroll_to_cursor();
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
        self.scroll_to_cursor();
    }

    pub fn select_last(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = self.filtered.len() - 1;
        self.scroll_to_cursor();
    }

    /// Counterpart of the scroll-container bottom check: the visible
    /// window has reached the end of the filtered view.
    pub fn at_bottom(&self) -> bool {
        self.scroll + self.viewport >= self.filtered.len()
    }

    pub fn set_viewport(&mut self, height: usize) {
        self.viewport = height.max(1);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + self.viewport {
            self.scroll = self.cursor + 1 - self.viewport;
        }
    }

    fn clamp(&mut self) {
        if self.filtered.is_empty() {
            self.cursor = 0;
            self.scroll = 0;
            return;
        }
        self.cursor = self.cursor.min(self.filtered.len() - 1);
        let max_scroll = self.filtered.len().saturating_sub(self.viewport);
        self.scroll = self.scroll.min(max_scroll);
        self.scroll_to_cursor();
    }
}
