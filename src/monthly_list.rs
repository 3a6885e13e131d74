// ============================================================================
// MONTHLY LIST - month tabs, category filter, paging and swipe gestures
// ============================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::ledger::{Ledger, Transaction, default_month, months_desc};

const HIGHLIGHT_DURATION: Duration = Duration::from_millis(1500);

/// Grows the number of shown rows as the user nears the bottom of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    visible: usize,
    page_size: usize,
    threshold: usize,
}

impl Pager {
    pub fn new(page_size: usize, threshold: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            visible: page_size,
            page_size,
            threshold,
        }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn reset(&mut self) {
        self.visible = self.page_size;
    }

    /// `last_seen` is the index of the lowest row currently on screen.
    /// Returns true when another page was revealed.
    pub fn on_scroll(&mut self, last_seen: usize, total: usize) -> bool {
        let shown = self.visible.min(total);
        let near_bottom = last_seen + self.threshold >= shown;
        if near_bottom && self.visible < total {
            self.visible = (self.visible + self.page_size).min(total);
            return true;
        }
        false
    }

    /// Makes sure row `index` is within the shown rows.
    pub fn reveal(&mut self, index: usize) {
        while self.visible <= index {
            self.visible += self.page_size;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeAction {
    None,
    Edit,
    Delete,
}

/// Horizontal drag on a row: right opens the editor, left asks to delete.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: HashMap<Uuid, u16>,
    offsets: HashMap<Uuid, i32>,
    threshold: u16,
    max: u16,
}

impl SwipeTracker {
    pub fn new(threshold: u16, max: u16) -> Self {
        Self {
            threshold,
            max: max.max(threshold),
            ..Self::default()
        }
    }

    pub fn start(&mut self, id: Uuid, column: u16) {
        self.start.insert(id, column);
        self.offsets.insert(id, 0);
    }

    pub fn is_tracking(&self, id: Uuid) -> bool {
        self.start.contains_key(&id)
    }

    pub fn active(&self) -> Option<Uuid> {
        self.start.keys().next().copied()
    }

    pub fn drag(&mut self, id: Uuid, column: u16) -> i32 {
        let Some(start) = self.start.get(&id) else {
            return 0;
        };
        let max = i32::from(self.max);
        let diff = (i32::from(column) - i32::from(*start)).clamp(-max, max);
        self.offsets.insert(id, diff);
        diff
    }

    pub fn offset(&self, id: Uuid) -> i32 {
        self.offsets.get(&id).copied().unwrap_or(0)
    }

    /// Decides the action and snaps the row back.
    pub fn end(&mut self, id: Uuid) -> SwipeAction {
        let offset = self.offset(id);
        self.start.remove(&id);
        self.offsets.insert(id, 0);

        let threshold = i32::from(self.threshold);
        if offset > threshold {
            SwipeAction::Edit
        } else if offset < -threshold {
            SwipeAction::Delete
        } else {
            SwipeAction::None
        }
    }

    pub fn cancel(&mut self) {
        self.start.clear();
        self.offsets.clear();
    }
}

#[derive(Debug, Clone)]
pub struct MonthlyList {
    pub selected_month: Option<String>,
    pub category_filter: Option<String>,
    pub selected: usize,
    pub scroll: usize,
    pub pager: Pager,
    pub swipe: SwipeTracker,
    pub show_categories: bool,
    highlight: Option<(Uuid, Instant)>,
}

impl MonthlyList {
    pub fn new(page_size: usize, scroll_threshold: usize, swipe_threshold: u16, max_swipe: u16) -> Self {
        Self {
            selected_month: None,
            category_filter: None,
            selected: 0,
            scroll: 0,
            pager: Pager::new(page_size, scroll_threshold),
            swipe: SwipeTracker::new(swipe_threshold, max_swipe),
            show_categories: false,
            highlight: None,
        }
    }

    /// Picks the current month if it has data, otherwise the newest one.
    pub fn ensure_month(&mut self, ledger: &Ledger, current: &str) {
        let months = months_desc(&ledger.transactions);
        let still_valid = self
            .selected_month
            .as_ref()
            .is_some_and(|m| months.contains(m));
        if !still_valid {
            self.selected_month = default_month(&ledger.transactions, current);
            self.reset_view();
        }
    }

    pub fn select_month(&mut self, month: &str) {
        if self.selected_month.as_deref() != Some(month) {
            self.selected_month = Some(month.to_string());
            self.category_filter = None;
            self.reset_view();
        }
    }

    /// Moves to the neighbouring month tab; `delta` < 0 goes to older months.
    pub fn step_month(&mut self, ledger: &Ledger, delta: i32) {
        let months = months_desc(&ledger.transactions);
        let Some(current) = self.selected_month.as_ref() else {
            return;
        };
        let Some(pos) = months.iter().position(|m| m == current) else {
            return;
        };
        // months are newest first
        let next = pos as i32 - delta;
        if let Some(month) = usize::try_from(next).ok().and_then(|i| months.get(i)) {
            let month = month.clone();
            self.select_month(&month);
        }
    }

    /// Selecting the active category again clears the filter.
    pub fn toggle_category(&mut self, code: &str) {
        if self.category_filter.as_deref() == Some(code) {
            self.category_filter = None;
        } else {
            self.category_filter = Some(code.to_string());
        }
        self.reset_view();
    }

    fn reset_view(&mut self) {
        self.pager.reset();
        self.selected = 0;
        self.scroll = 0;
        self.swipe.cancel();
    }

    /// All rows for the month and filter, newest first.
    pub fn rows<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Transaction> {
        let Some(month) = self.selected_month.as_deref() else {
            return Vec::new();
        };
        let mut rows: Vec<&Transaction> = ledger
            .transactions
            .iter()
            .filter(|t| t.month() == month)
            .filter(|t| {
                self.category_filter
                    .as_deref()
                    .is_none_or(|code| t.category == code)
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }

    pub fn visible_rows<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Transaction> {
        let mut rows = self.rows(ledger);
        rows.truncate(self.pager.visible());
        rows
    }

    pub fn selected_id(&self, ledger: &Ledger) -> Option<Uuid> {
        self.visible_rows(ledger).get(self.selected).map(|t| t.id)
    }

    pub fn move_selection(&mut self, ledger: &Ledger, delta: i32, viewport_rows: usize) {
        let total = self.rows(ledger).len();
        let shown = self.pager.visible().min(total);
        if shown == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as i64 + i64::from(delta)).clamp(0, shown as i64 - 1);
        self.selected = next as usize;
        self.keep_selection_visible(viewport_rows);
        self.pager.on_scroll(self.selected, total);
    }

    pub fn scroll_by(&mut self, ledger: &Ledger, delta: i32, viewport_rows: usize) {
        let total = self.rows(ledger).len();
        let shown = self.pager.visible().min(total);
        let max_scroll = shown.saturating_sub(viewport_rows);
        self.scroll = (self.scroll as i64 + i64::from(delta)).clamp(0, max_scroll as i64) as usize;
        let last_seen = (self.scroll + viewport_rows).saturating_sub(1);
        self.pager.on_scroll(last_seen, total);
    }

    fn keep_selection_visible(&mut self, viewport_rows: usize) {
        let viewport_rows = viewport_rows.max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + viewport_rows {
            self.scroll = self.selected + 1 - viewport_rows;
        }
    }

    /// Jumps to a transaction (e.g. one just added) and highlights it briefly.
    pub fn focus_transaction(&mut self, ledger: &Ledger, id: Uuid, viewport_rows: usize) -> bool {
        let Some(tx) = ledger.transaction(id) else {
            return false;
        };
        self.select_month(&tx.month());
        if self.category_filter.as_deref().is_some_and(|c| c != tx.category) {
            self.category_filter = None;
        }
        let rows = self.rows(ledger);
        let Some(index) = rows.iter().position(|t| t.id == id) else {
            return false;
        };
        self.pager.reveal(index);
        self.selected = index;
        self.keep_selection_visible(viewport_rows);
        self.highlight = Some((id, Instant::now() + HIGHLIGHT_DURATION));
        true
    }

    pub fn is_highlighted(&self, id: Uuid, now: Instant) -> bool {
        self.highlight
            .is_some_and(|(hid, until)| hid == id && now < until)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ledger_with(days: &[(u32, u32, &str)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (month, day, category) in days {
            ledger.add_transaction(Transaction::new(
                NaiveDate::from_ymd_opt(2026, *month, *day).unwrap(),
                category.to_string(),
                -1_000,
                String::new(),
            ));
        }
        ledger
    }

    #[test]
    fn pager_grows_near_bottom_only() {
        let mut pager = Pager::new(15, 3);
        assert!(!pager.on_scroll(5, 40));
        assert_eq!(pager.visible(), 15);
        assert!(pager.on_scroll(12, 40));
        assert_eq!(pager.visible(), 30);
        assert!(pager.on_scroll(29, 40));
        assert_eq!(pager.visible(), 40);
        assert!(!pager.on_scroll(39, 40));
        pager.reset();
        assert_eq!(pager.visible(), 15);
    }

    #[test]
    fn pager_reveal_covers_index() {
        let mut pager = Pager::new(15, 3);
        pager.reveal(31);
        assert_eq!(pager.visible(), 45);
    }

    #[test]
    fn swipe_right_edits_left_deletes() {
        let id = Uuid::new_v4();
        let mut swipe = SwipeTracker::new(7, 9);

        swipe.start(id, 10);
        assert_eq!(swipe.drag(id, 30), 9);
        assert_eq!(swipe.end(id), SwipeAction::Edit);
        assert_eq!(swipe.offset(id), 0);

        swipe.start(id, 30);
        assert_eq!(swipe.drag(id, 22), -8);
        assert_eq!(swipe.end(id), SwipeAction::Delete);

        swipe.start(id, 30);
        swipe.drag(id, 37);
        assert_eq!(swipe.end(id), SwipeAction::None);
        assert!(!swipe.is_tracking(id));
    }

    #[test]
    fn drag_without_start_is_ignored() {
        let mut swipe = SwipeTracker::new(7, 9);
        let id = Uuid::new_v4();
        assert_eq!(swipe.drag(id, 50), 0);
        assert_eq!(swipe.end(id), SwipeAction::None);
    }

    #[test]
    fn rows_filter_by_month_and_category() {
        let ledger = ledger_with(&[(2, 1, "FOOD"), (2, 9, "CAFE"), (2, 5, "FOOD"), (1, 3, "FOOD")]);
        let mut list = MonthlyList::new(15, 3, 7, 9);
        list.ensure_month(&ledger, "2026-02");
        assert_eq!(list.selected_month.as_deref(), Some("2026-02"));

        let days: Vec<u32> = list.rows(&ledger).iter().map(|t| chrono::Datelike::day(&t.date)).collect();
        assert_eq!(days, [9, 5, 1]);

        list.toggle_category("FOOD");
        assert_eq!(list.rows(&ledger).len(), 2);
        list.toggle_category("FOOD");
        assert_eq!(list.rows(&ledger).len(), 3);
    }

    #[test]
    fn month_change_clears_filter_and_paging() {
        let ledger = ledger_with(&[(2, 1, "FOOD"), (1, 3, "FOOD")]);
        let mut list = MonthlyList::new(1, 0, 7, 9);
        list.ensure_month(&ledger, "2026-10");
        assert_eq!(list.selected_month.as_deref(), Some("2026-02"));
        list.toggle_category("FOOD");
        list.pager.reveal(5);

        list.step_month(&ledger, -1);
        assert_eq!(list.selected_month.as_deref(), Some("2026-01"));
        assert_eq!(list.category_filter, None);
        assert_eq!(list.pager.visible(), 1);

        list.step_month(&ledger, -1);
        assert_eq!(list.selected_month.as_deref(), Some("2026-01"));
        list.step_month(&ledger, 1);
        assert_eq!(list.selected_month.as_deref(), Some("2026-02"));
    }

    #[test]
    fn focus_transaction_reveals_and_highlights() {
        let days: Vec<(u32, u32, &str)> = (1..=28).map(|d| (2, d, "FOOD")).collect();
        let ledger = ledger_with(&days);
        let oldest = ledger.transactions[0].id;

        let mut list = MonthlyList::new(15, 3, 7, 9);
        list.selected_month = Some("2026-01".into());
        assert!(list.focus_transaction(&ledger, oldest, 10));
        assert_eq!(list.selected_month.as_deref(), Some("2026-02"));
        assert_eq!(list.selected, 27);
        assert!(list.pager.visible() > 27);
        assert_eq!(list.selected_id(&ledger), Some(oldest));
        assert!(list.is_highlighted(oldest, Instant::now()));
        assert!(!list.is_highlighted(oldest, Instant::now() + Duration::from_secs(2)));
    }

    #[test]
    fn selection_drives_paging() {
        let days: Vec<(u32, u32, &str)> = (1..=28).map(|d| (2, d, "FOOD")).collect();
        let ledger = ledger_with(&days);
        let mut list = MonthlyList::new(15, 3, 7, 9);
        list.ensure_month(&ledger, "2026-02");
        list.move_selection(&ledger, 13, 10);
        assert_eq!(list.selected, 13);
        assert_eq!(list.pager.visible(), 28);
        assert_eq!(list.scroll, 4);
    }
}
