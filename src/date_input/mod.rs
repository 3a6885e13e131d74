// ============================================================================
// MASKED DATE INPUT
// ============================================================================
//
// A text field that only accepts digits and renders them as a localized date
// (`2026년02월15일`), plus a popover calendar for picking a date with the
// mouse. The owner receives `ChangeEvent`s carrying the normalized
// `YYYY[-MM[-DD]]` value; it never sees the display string.

pub mod buffer;
pub mod calendar;
pub mod popover;
pub mod widget;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

pub use buffer::{DateMode, DigitBuffer};
pub use calendar::ViewCursor;
pub use popover::{CloseReason, Popover};

use popover::rect_contains;

/// Emitted on every user-driven change, never on construction or `set_value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Field,
    Popover,
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    Focus { name: String },
    Blur { name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateInputResponse {
    pub consumed: bool,
    pub change: Option<ChangeEvent>,
    pub focus: Option<FocusEvent>,
}

impl DateInputResponse {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            consumed: true,
            ..Self::default()
        }
    }

    fn changed(change: Option<ChangeEvent>) -> Self {
        Self {
            consumed: true,
            change,
            focus: None,
        }
    }

    fn with_focus(mut self, focus: Option<FocusEvent>) -> Self {
        self.focus = focus;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellTarget {
    Day(u32),
    Month(u32),
    Prev,
    Next,
}

#[derive(Debug, Clone)]
pub struct DateInput {
    name: String,
    buffer: DigitBuffer,
    view: ViewCursor,
    popover: Popover,
    focus: FocusTarget,
    // Geometry recorded by the last draw, used for mouse hit-testing.
    field_area: Rect,
    hit_rects: Vec<(CellTarget, Rect)>,
}

impl DateInput {
    pub fn new(name: &str, value: &str, mode: DateMode, today: NaiveDate, margin: u16) -> Self {
        Self {
            name: name.to_string(),
            buffer: DigitBuffer::from_value(value, mode),
            view: ViewCursor::from_value(value, today),
            popover: Popover::new(margin),
            focus: FocusTarget::Outside,
            field_area: Rect::default(),
            hit_rects: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> DateMode {
        self.buffer.mode()
    }

    pub fn value(&self) -> String {
        self.buffer.normalized()
    }

    pub fn display(&self) -> String {
        self.buffer.display()
    }

    pub fn buffer(&self) -> &DigitBuffer {
        &self.buffer
    }

    pub fn view(&self) -> ViewCursor {
        self.view
    }

    pub fn popover(&self) -> &Popover {
        &self.popover
    }

    pub fn is_open(&self) -> bool {
        self.popover.is_open()
    }

    /// Parsed date once every digit is present (day mode only).
    pub fn date(&self) -> Option<NaiveDate> {
        if self.mode() != DateMode::Day || !self.buffer.is_full() {
            return None;
        }
        NaiveDate::parse_from_str(&self.value(), "%Y-%m-%d").ok()
    }

    /// Programmatic replacement of the bound value. Does not notify.
    pub fn set_value(&mut self, value: &str) {
        if value != self.value() {
            self.buffer.set_from_external(value);
        }
        self.view.sync_from_value(value);
    }

    fn change(&self) -> ChangeEvent {
        ChangeEvent {
            name: self.name.clone(),
            value: self.value(),
        }
    }

    pub fn append_digit(&mut self, c: char) -> Option<ChangeEvent> {
        self.buffer.append_digit(c).then(|| self.change())
    }

    pub fn delete_last(&mut self) -> Option<ChangeEvent> {
        self.buffer.delete_last().then(|| self.change())
    }

    pub fn clear(&mut self) -> Option<ChangeEvent> {
        if self.buffer.is_empty() {
            return None;
        }
        self.buffer.clear();
        Some(self.change())
    }

    // ---- popover ----------------------------------------------------------

    pub fn open(&mut self) {
        if self.popover.is_open() {
            return;
        }
        let value = self.value();
        self.view.sync_from_value(&value);
        self.popover.open(self.field_area);
        self.focus = FocusTarget::Popover;
    }

    pub fn close(&mut self, reason: CloseReason) -> bool {
        let closed = self.popover.close(reason);
        if closed {
            self.hit_rects.clear();
            if self.focus == FocusTarget::Popover {
                self.focus = FocusTarget::Field;
            }
        }
        closed
    }

    pub fn on_scroll(&mut self) -> bool {
        self.close(CloseReason::Scroll)
    }

    pub fn on_resize(&mut self) -> bool {
        self.close(CloseReason::Resize)
    }

    /// Moves the grid back one step: a month in day mode, a year in month mode.
    pub fn prev(&mut self) {
        match self.mode() {
            DateMode::Day => self.view.prev_month(),
            DateMode::Month => self.view.prev_year(),
        }
    }

    pub fn next(&mut self) {
        match self.mode() {
            DateMode::Day => self.view.next_month(),
            DateMode::Month => self.view.next_year(),
        }
    }

    pub fn select_day(&mut self, day: u32) -> Option<ChangeEvent> {
        let date = NaiveDate::from_ymd_opt(self.view.year, self.view.month, day)?;
        let value = date.format("%Y-%m-%d").to_string();
        self.buffer.set_from_external(&value);
        self.close(CloseReason::Selection);
        Some(self.change())
    }

    pub fn select_month(&mut self, month: u32) -> Option<ChangeEvent> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let value = format!("{:04}-{:02}", self.view.year, month);
        self.buffer.set_from_external(&value);
        self.close(CloseReason::Selection);
        Some(self.change())
    }

    // ---- focus ------------------------------------------------------------

    pub fn is_focused(&self) -> bool {
        self.focus != FocusTarget::Outside
    }

    /// Focus moving between the field and its own popover is not reported.
    pub fn focus(&mut self, target: FocusTarget) -> Option<FocusEvent> {
        let was_inside = self.is_focused();
        self.focus = target;
        match (was_inside, target) {
            (false, FocusTarget::Field | FocusTarget::Popover) => Some(FocusEvent::Focus {
                name: self.name.clone(),
            }),
            (true, FocusTarget::Outside) => {
                self.close(CloseReason::OutsideClick);
                Some(FocusEvent::Blur {
                    name: self.name.clone(),
                })
            }
            _ => None,
        }
    }

    // ---- input handling ---------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> DateInputResponse {
        if self.popover.is_open() {
            match key.code {
                KeyCode::Esc => {
                    self.close(CloseReason::Dismiss);
                    return DateInputResponse::consumed();
                }
                KeyCode::Left => {
                    self.prev();
                    return DateInputResponse::consumed();
                }
                KeyCode::Right => {
                    self.next();
                    return DateInputResponse::consumed();
                }
                KeyCode::Up => {
                    self.view.next_year();
                    return DateInputResponse::consumed();
                }
                KeyCode::Down => {
                    self.view.prev_year();
                    return DateInputResponse::consumed();
                }
                KeyCode::Enter | KeyCode::F(2) => {
                    self.close(CloseReason::Dismiss);
                    return DateInputResponse::consumed();
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char(_) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                DateInputResponse::ignored()
            }
            KeyCode::Char(c) => DateInputResponse::changed(self.append_digit(c)),
            KeyCode::Backspace => DateInputResponse::changed(self.delete_last()),
            KeyCode::Delete => DateInputResponse::changed(self.clear()),
            KeyCode::F(2) | KeyCode::Enter => {
                self.open();
                DateInputResponse::consumed()
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::ALT) => {
                self.open();
                DateInputResponse::consumed()
            }
            _ => DateInputResponse::ignored(),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> DateInputResponse {
        match mouse.kind {
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                self.on_scroll();
                DateInputResponse::ignored()
            }
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.column, mouse.row),
            _ => DateInputResponse::ignored(),
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) -> DateInputResponse {
        let on_field = rect_contains(self.field_area, column, row);

        if self.popover.is_open() && self.popover.contains(column, row) {
            let focus = self.focus(FocusTarget::Popover);
            let target = self
                .hit_rects
                .iter()
                .find(|(_, rect)| rect_contains(*rect, column, row))
                .map(|(target, _)| *target);
            let change = match target {
                Some(CellTarget::Day(day)) => self.select_day(day),
                Some(CellTarget::Month(month)) => self.select_month(month),
                Some(CellTarget::Prev) => {
                    self.prev();
                    None
                }
                Some(CellTarget::Next) => {
                    self.next();
                    None
                }
                None => None,
            };
            return DateInputResponse::changed(change).with_focus(focus);
        }

        if on_field {
            let focus = self.focus(FocusTarget::Field);
            if !self.close(CloseReason::Dismiss) {
                self.open();
            }
            return DateInputResponse::consumed().with_focus(focus);
        }

        // Blur closes an open popover with `OutsideClick`
        let focus = self.focus(FocusTarget::Outside);
        self.close(CloseReason::OutsideClick);
        DateInputResponse::ignored().with_focus(focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn field_at(input: &mut DateInput, area: Rect) {
        input.field_area = area;
    }

    #[test]
    fn initial_value_sets_view_and_display_without_emitting() {
        let input = DateInput::new("date", "2026-02-15", DateMode::Day, today(), 1);
        assert_eq!(input.view(), ViewCursor::new(2026, 2));
        assert_eq!(input.display(), "2026년02월15일");
        assert_eq!(input.value(), "2026-02-15");
        assert_eq!(input.date(), NaiveDate::from_ymd_opt(2026, 2, 15));
    }

    #[test]
    fn typing_emits_normalized_value() {
        let mut input = DateInput::new("date", "", DateMode::Day, today(), 1);
        let mut last = None;
        for c in "202602".chars() {
            let response = input.handle_key(key(KeyCode::Char(c)));
            assert!(response.consumed);
            last = response.change;
        }
        assert_eq!(
            last,
            Some(ChangeEvent {
                name: "date".into(),
                value: "2026-02".into()
            })
        );
    }

    #[test]
    fn ignored_keys_do_not_emit() {
        let mut input = DateInput::new("date", "2026-02-15", DateMode::Day, today(), 1);
        assert_eq!(input.handle_key(key(KeyCode::Char('x'))).change, None);
        assert_eq!(input.handle_key(key(KeyCode::Char('1'))).change, None);
        assert!(!input.handle_key(key(KeyCode::Tab)).consumed);
        assert_eq!(input.value(), "2026-02-15");
    }

    #[test]
    fn backspace_and_delete_edit_buffer() {
        let mut input = DateInput::new("date", "2026-02-15", DateMode::Day, today(), 1);
        let change = input.handle_key(key(KeyCode::Backspace)).change.unwrap();
        assert_eq!(change.value, "2026-02-1");
        let change = input.handle_key(key(KeyCode::Delete)).change.unwrap();
        assert_eq!(change.value, "");
        assert_eq!(input.handle_key(key(KeyCode::Delete)).change, None);
    }

    #[test]
    fn selecting_day_emits_once_and_closes() {
        let mut input = DateInput::new("date", "", DateMode::Day, today(), 1);
        input.open();
        input.view = ViewCursor::new(2026, 2);
        assert!(input.is_open());

        let change = input.select_day(15);
        assert_eq!(
            change,
            Some(ChangeEvent {
                name: "date".into(),
                value: "2026-02-15".into()
            })
        );
        assert!(!input.is_open());
        assert_eq!(input.display(), "2026년02월15일");
    }

    #[test]
    fn invalid_day_is_noop() {
        let mut input = DateInput::new("date", "2026-02-01", DateMode::Day, today(), 1);
        input.open();
        assert_eq!(input.select_day(30), None);
        assert!(input.is_open());
        assert_eq!(input.value(), "2026-02-01");
    }

    #[test]
    fn month_mode_selects_year_month() {
        let mut input = DateInput::new("month", "2026-02", DateMode::Month, today(), 1);
        input.open();
        input.prev();
        assert_eq!(input.view(), ViewCursor::new(2025, 2));
        let change = input.select_month(11).unwrap();
        assert_eq!(change.value, "2025-11");
        assert_eq!(input.display(), "2025년11월");
        assert!(!input.is_open());
    }

    #[test]
    fn navigation_does_not_touch_value() {
        let mut input = DateInput::new("date", "2026-02-15", DateMode::Day, today(), 1);
        input.open();
        for code in [KeyCode::Left, KeyCode::Left, KeyCode::Up, KeyCode::Right] {
            let response = input.handle_key(key(code));
            assert_eq!(response.change, None);
        }
        assert_eq!(input.view(), ViewCursor::new(2027, 1));
        assert_eq!(input.value(), "2026-02-15");
    }

    #[test]
    fn scroll_closes_without_emitting() {
        let mut input = DateInput::new("date", "2026-02-15", DateMode::Day, today(), 1);
        input.open();
        let response = input.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(response.change, None);
        assert!(!input.is_open());
        assert_eq!(input.value(), "2026-02-15");
    }

    #[test]
    fn resize_and_escape_close() {
        let mut input = DateInput::new("date", "", DateMode::Day, today(), 1);
        input.open();
        assert!(input.on_resize());
        input.open();
        assert!(input.handle_key(key(KeyCode::Esc)).consumed);
        assert!(!input.is_open());
    }

    #[test]
    fn clicking_field_opens_and_outside_closes() {
        let mut input = DateInput::new("date", "", DateMode::Day, today(), 1);
        field_at(&mut input, Rect { x: 2, y: 2, width: 20, height: 3 });
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        assert!(input.handle_mouse(click(5, 3)).consumed);
        assert!(input.is_open());
        let response = input.handle_mouse(click(70, 20));
        assert!(!response.consumed);
        assert_eq!(response.change, None);
        assert!(!input.is_open());
    }

    #[test]
    fn clicks_report_focus_and_blur() {
        let mut input = DateInput::new("date", "", DateMode::Day, today(), 1);
        field_at(&mut input, Rect { x: 2, y: 2, width: 20, height: 3 });
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };

        let response = input.handle_mouse(click(5, 3));
        assert_eq!(response.focus, Some(FocusEvent::Focus { name: "date".into() }));
        assert!(input.is_focused());
        assert!(input.is_open());

        // Clicking the field again only toggles the popover
        let response = input.handle_mouse(click(5, 3));
        assert_eq!(response.focus, None);
        assert!(!input.is_open());
        assert!(input.is_focused());

        input.handle_mouse(click(5, 3));
        let response = input.handle_mouse(click(70, 20));
        assert_eq!(response.focus, Some(FocusEvent::Blur { name: "date".into() }));
        assert!(!input.is_focused());
        assert!(!input.is_open());
        assert_eq!(input.focus(FocusTarget::Outside), None);

        // With the popover closed an outside click still blurs
        input.focus(FocusTarget::Field);
        let response = input.handle_mouse(click(70, 20));
        assert!(!response.consumed);
        assert_eq!(response.focus, Some(FocusEvent::Blur { name: "date".into() }));
        assert_eq!(input.handle_mouse(click(70, 20)).focus, None);
    }

    #[test]
    fn focus_moves_between_field_and_popover_silently() {
        let mut input = DateInput::new("date", "", DateMode::Day, today(), 1);
        assert_eq!(
            input.focus(FocusTarget::Field),
            Some(FocusEvent::Focus { name: "date".into() })
        );
        assert_eq!(input.focus(FocusTarget::Popover), None);
        assert_eq!(input.focus(FocusTarget::Field), None);
        assert_eq!(
            input.focus(FocusTarget::Outside),
            Some(FocusEvent::Blur { name: "date".into() })
        );
        assert_eq!(input.focus(FocusTarget::Outside), None);
    }

    #[test]
    fn set_value_syncs_without_emitting() {
        let mut input = DateInput::new("date", "", DateMode::Day, today(), 1);
        input.set_value("2024-12-01");
        assert_eq!(input.display(), "2024년12월01일");
        assert_eq!(input.view(), ViewCursor::new(2024, 12));
        input.set_value("oops");
        assert_eq!(input.view(), ViewCursor::new(2024, 12));
        assert_eq!(input.value(), "");
    }
}
