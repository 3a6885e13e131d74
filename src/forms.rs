// ============================================================================
// FORMS - transaction entry, fixed cost editor and monthly budget
// ============================================================================

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::{CursorMove, Input, Key, TextArea};
use uuid::Uuid;

use crate::date_input::{ChangeEvent, DateInput, DateMode, FocusTarget};
use crate::ledger::{
    AMOUNT_PRESETS, Category, FixedCost, Ledger, MAX_AMOUNT_DIGITS, Transaction, TxKind,
    format_with_comma,
};

pub const MAX_RECENT_CATEGORIES: usize = 3;
pub const MAX_CYCLE_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    Changed(Option<ChangeEvent>),
    Submit,
    Cancel,
}

/// Same key mapping the editor panes use for `tui_textarea`.
pub fn textarea_input(key: KeyEvent) -> Input {
    Input {
        key: match key.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => Key::Null,
        },
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
    }
}

fn single_line(text: &str) -> TextArea<'static> {
    let mut area = TextArea::new(vec![text.to_string()]);
    area.move_cursor(CursorMove::End);
    area
}

fn text_of(area: &TextArea<'_>) -> String {
    area.lines().join(" ")
}

fn is_submit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Moves to the next (or previous) active category, wrapping around.
pub fn cycle_category(categories: &[Category], current: Option<&str>, delta: i32) -> Option<String> {
    let active: Vec<&Category> = categories.iter().filter(|c| !c.deleted).collect();
    if active.is_empty() {
        return None;
    }
    let len = active.len() as i32;
    let next = match current.and_then(|code| active.iter().position(|c| c.code == code)) {
        Some(pos) => (pos as i32 + delta).rem_euclid(len),
        None if delta < 0 => len - 1,
        None => 0,
    };
    active.get(next as usize).map(|c| c.code.clone())
}

// ---- amount ------------------------------------------------------------------

/// Digits-only amount entry shown with thousands separators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountField {
    digits: String,
}

impl AmountField {
    pub fn from_value(value: u64) -> Self {
        let digits = if value == 0 { String::new() } else { value.to_string() };
        Self { digits }
    }

    pub fn value(&self) -> u64 {
        self.digits.parse().unwrap_or(0)
    }

    pub fn display(&self) -> String {
        if self.digits.is_empty() {
            String::new()
        } else {
            format_with_comma(self.value() as i64)
        }
    }

    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.digits.len() >= MAX_AMOUNT_DIGITS {
            return false;
        }
        if self.digits.is_empty() && c == '0' {
            return false;
        }
        self.digits.push(c);
        true
    }

    pub fn pop(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn add(&mut self, amount: u64) {
        let total = self.value().saturating_add(amount);
        let text = total.to_string();
        if text.len() <= MAX_AMOUNT_DIGITS {
            self.digits = text;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => self.push(c),
            KeyCode::Backspace => self.pop(),
            KeyCode::Delete => {
                self.clear();
                true
            }
            _ => false,
        }
    }
}

/// F5..F8 add the amount presets.
fn preset_for(key: KeyEvent) -> Option<u64> {
    match key.code {
        KeyCode::F(n @ 5..=8) => AMOUNT_PRESETS.get(usize::from(n - 5)).copied(),
        _ => None,
    }
}

// ---- transaction form --------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxField {
    #[default]
    Date,
    Category,
    Amount,
    Kind,
    Memo,
}

impl TxField {
    const ORDER: [TxField; 5] = [
        TxField::Date,
        TxField::Category,
        TxField::Amount,
        TxField::Kind,
        TxField::Memo,
    ];

    fn step(self, delta: i32) -> Self {
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as i32;
        let len = Self::ORDER.len() as i32;
        Self::ORDER[(pos + delta).rem_euclid(len) as usize]
    }
}

pub struct TransactionForm {
    pub date: DateInput,
    pub category: Option<String>,
    pub amount: AmountField,
    pub kind: TxKind,
    pub memo: TextArea<'static>,
    pub fix_date: bool,
    pub recent: Vec<String>,
    pub focus: TxField,
    pub suggestions: Vec<String>,
    pub suggestion: Option<usize>,
    pub editing: Option<Uuid>,
}

impl TransactionForm {
    pub fn new(today: NaiveDate, margin: u16) -> Self {
        let mut date = DateInput::new("date", &today.to_string(), DateMode::Day, today, margin);
        date.focus(FocusTarget::Field);
        Self {
            date,
            category: None,
            amount: AmountField::default(),
            kind: TxKind::Expense,
            memo: single_line(""),
            fix_date: false,
            recent: Vec::new(),
            focus: TxField::Date,
            suggestions: Vec::new(),
            suggestion: None,
            editing: None,
        }
    }

    /// A form pre-filled from an existing transaction.
    pub fn for_edit(tx: &Transaction, today: NaiveDate, margin: u16) -> Self {
        let mut form = Self::new(today, margin);
        form.date.set_value(&tx.date.to_string());
        form.category = Some(tx.category.clone());
        form.amount = AmountField::from_value(tx.amount.unsigned_abs());
        form.kind = tx.kind();
        form.memo = single_line(&tx.memo);
        form.focus_field(TxField::Amount);
        form.editing = Some(tx.id);
        form
    }

    pub fn memo_text(&self) -> String {
        text_of(&self.memo).trim().to_string()
    }

    pub fn focus_field(&mut self, field: TxField) {
        let target = if field == TxField::Date {
            FocusTarget::Field
        } else {
            FocusTarget::Outside
        };
        if let Some(event) = self.date.focus(target) {
            log::trace!("date field {event:?}");
        }
        self.focus = field;
    }

    pub fn select_category(&mut self, code: &str) {
        self.category = Some(code.to_string());
    }

    /// Drops a deleted category from the selection and the recent list.
    pub fn forget_category(&mut self, code: &str) {
        self.recent.retain(|c| c != code);
        if self.category.as_deref() == Some(code) {
            self.category = None;
        }
    }

    pub fn toggle_kind(&mut self) {
        self.kind = self.kind.toggled();
    }

    pub fn toggle_fix_date(&mut self) {
        self.fix_date = !self.fix_date;
    }

    pub fn refresh_suggestions(&mut self, ledger: &Ledger) {
        self.suggestions = ledger.memo_suggestions(&self.memo_text());
        self.suggestion = None;
    }

    pub fn apply_suggestion(&mut self, index: usize) -> bool {
        let Some(text) = self.suggestions.get(index).cloned() else {
            return false;
        };
        self.memo = single_line(&text);
        self.suggestions.clear();
        self.suggestion = None;
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent, ledger: &Ledger) -> FormAction {
        if self.focus == TxField::Date && self.date.is_open() {
            let response = self.date.handle_key(key);
            if response.consumed {
                return FormAction::Changed(response.change);
            }
        }

        if is_submit(key) {
            return FormAction::Submit;
        }
        if let Some(preset) = preset_for(key) {
            self.amount.add(preset);
            return FormAction::Changed(None);
        }
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Tab => {
                self.focus_field(self.focus.step(1));
                return FormAction::None;
            }
            KeyCode::BackTab => {
                self.focus_field(self.focus.step(-1));
                return FormAction::None;
            }
            KeyCode::F(3) => {
                self.toggle_kind();
                return FormAction::Changed(None);
            }
            KeyCode::F(4) => {
                self.toggle_fix_date();
                return FormAction::Changed(None);
            }
            _ => {}
        }

        match self.focus {
            TxField::Date => {
                let response = self.date.handle_key(key);
                if response.consumed {
                    FormAction::Changed(response.change)
                } else {
                    FormAction::None
                }
            }
            TxField::Category => match key.code {
                KeyCode::Left | KeyCode::Up => {
                    self.category = cycle_category(&ledger.categories, self.category.as_deref(), -1);
                    FormAction::Changed(None)
                }
                KeyCode::Right | KeyCode::Down => {
                    self.category = cycle_category(&ledger.categories, self.category.as_deref(), 1);
                    FormAction::Changed(None)
                }
                KeyCode::Char(c @ '1'..='3') => {
                    let index = c as usize - '1' as usize;
                    if let Some(code) = self.recent.get(index).cloned() {
                        self.category = Some(code);
                    }
                    FormAction::Changed(None)
                }
                KeyCode::Enter => FormAction::Submit,
                _ => FormAction::None,
            },
            TxField::Amount => match key.code {
                KeyCode::Enter => FormAction::Submit,
                _ if self.amount.handle_key(key) => FormAction::Changed(None),
                _ => FormAction::None,
            },
            TxField::Kind => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    self.toggle_kind();
                    FormAction::Changed(None)
                }
                KeyCode::Enter => FormAction::Submit,
                _ => FormAction::None,
            },
            TxField::Memo => self.handle_memo_key(key, ledger),
        }
    }

    fn handle_memo_key(&mut self, key: KeyEvent, ledger: &Ledger) -> FormAction {
        match key.code {
            KeyCode::Down if !self.suggestions.is_empty() => {
                let last = self.suggestions.len() - 1;
                self.suggestion = Some(self.suggestion.map_or(0, |i| (i + 1).min(last)));
                FormAction::None
            }
            KeyCode::Up if !self.suggestions.is_empty() => {
                self.suggestion = self.suggestion.and_then(|i| i.checked_sub(1));
                FormAction::None
            }
            KeyCode::Enter => match self.suggestion {
                Some(index) => {
                    self.apply_suggestion(index);
                    FormAction::Changed(None)
                }
                None => FormAction::Submit,
            },
            _ => {
                if self.memo.input(textarea_input(key)) {
                    self.refresh_suggestions(ledger);
                }
                FormAction::Changed(None)
            }
        }
    }

    /// Builds the transaction, or the message to show the user.
    pub fn validate(&self) -> Result<Transaction, String> {
        let Some(category) = self.category.clone() else {
            return Err("카테고리를 선택해주세요.".to_string());
        };
        let amount = self.amount.value();
        if amount == 0 {
            return Err("금액을 입력해주세요.".to_string());
        }
        let Some(date) = self.date.date() else {
            return Err("날짜를 YYYY년MM월DD일 형식으로 입력해주세요.".to_string());
        };
        let mut tx = Transaction::new(date, category, self.kind.signed(amount), self.memo_text());
        if let Some(id) = self.editing {
            tx.id = id;
        }
        Ok(tx)
    }

    /// Clears the form for the next entry. The date survives only when fixed.
    pub fn after_submit(&mut self, today: NaiveDate) {
        if let Some(category) = self.category.take() {
            self.recent.retain(|c| *c != category);
            self.recent.insert(0, category);
            self.recent.truncate(MAX_RECENT_CATEGORIES);
        }
        self.amount.clear();
        self.memo = single_line("");
        self.suggestions.clear();
        self.suggestion = None;
        self.editing = None;
        if !self.fix_date {
            self.date.set_value(&today.to_string());
        }
        self.focus_field(TxField::Category);
    }
}

// ---- fixed cost form ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixedField {
    #[default]
    Category,
    Amount,
    Day,
    Memo,
    Active,
}

impl FixedField {
    const ORDER: [FixedField; 5] = [
        FixedField::Category,
        FixedField::Amount,
        FixedField::Day,
        FixedField::Memo,
        FixedField::Active,
    ];

    fn step(self, delta: i32) -> Self {
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as i32;
        let len = Self::ORDER.len() as i32;
        Self::ORDER[(pos + delta).rem_euclid(len) as usize]
    }
}

/// Keeps the cycle day within 1..=365 while typing.
pub fn clamp_cycle_day(text: &str) -> String {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return digits;
    }
    match digits.parse::<u32>() {
        Ok(0) => "1".to_string(),
        Ok(day) if day <= MAX_CYCLE_DAYS => day.to_string(),
        _ => MAX_CYCLE_DAYS.to_string(),
    }
}

pub struct FixedCostForm {
    pub category: Option<String>,
    pub amount: AmountField,
    pub day: String,
    pub memo: TextArea<'static>,
    pub active: bool,
    pub focus: FixedField,
    original: Option<FixedCost>,
}

impl Default for FixedCostForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedCostForm {
    pub fn new() -> Self {
        Self {
            category: None,
            amount: AmountField::default(),
            day: String::new(),
            memo: single_line(""),
            active: true,
            focus: FixedField::Category,
            original: None,
        }
    }

    pub fn for_edit(cost: &FixedCost) -> Self {
        Self {
            category: Some(cost.category.clone()),
            amount: AmountField::from_value(cost.amount),
            day: cost.day.to_string(),
            memo: single_line(&cost.memo),
            active: cost.active,
            focus: FixedField::Amount,
            original: Some(cost.clone()),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    pub fn memo_text(&self) -> String {
        text_of(&self.memo).trim().to_string()
    }

    /// In edit mode, whether any field differs from the stored cost.
    pub fn is_dirty(&self) -> bool {
        let Some(original) = &self.original else {
            return true;
        };
        self.category.as_deref() != Some(original.category.as_str())
            || self.amount.value() != original.amount
            || self.day.parse::<u32>().ok() != Some(original.day)
            || self.memo_text() != original.memo.trim()
            || self.active != original.active
    }

    pub fn handle_key(&mut self, key: KeyEvent, categories: &[Category]) -> FormAction {
        if is_submit(key) {
            return FormAction::Submit;
        }
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Tab => {
                self.focus = self.focus.step(1);
                return FormAction::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.step(-1);
                return FormAction::None;
            }
            KeyCode::Enter => return FormAction::Submit,
            _ => {}
        }

        match self.focus {
            FixedField::Category => match key.code {
                KeyCode::Left | KeyCode::Up => {
                    self.category = cycle_category(categories, self.category.as_deref(), -1);
                    FormAction::Changed(None)
                }
                KeyCode::Right | KeyCode::Down => {
                    self.category = cycle_category(categories, self.category.as_deref(), 1);
                    FormAction::Changed(None)
                }
                _ => FormAction::None,
            },
            FixedField::Amount => {
                if let Some(preset) = preset_for(key) {
                    self.amount.add(preset);
                    return FormAction::Changed(None);
                }
                if self.amount.handle_key(key) {
                    FormAction::Changed(None)
                } else {
                    FormAction::None
                }
            }
            FixedField::Day => match key.code {
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    let mut next = self.day.clone();
                    next.push(c);
                    self.day = clamp_cycle_day(&next);
                    FormAction::Changed(None)
                }
                KeyCode::Backspace => {
                    self.day.pop();
                    FormAction::Changed(None)
                }
                _ => FormAction::None,
            },
            FixedField::Memo => {
                self.memo.input(textarea_input(key));
                FormAction::Changed(None)
            }
            FixedField::Active => match key.code {
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    self.active = !self.active;
                    FormAction::Changed(None)
                }
                _ => FormAction::None,
            },
        }
    }

    pub fn validate(&self) -> Result<FixedCost, String> {
        let Some(category) = self.category.clone() else {
            return Err("카테고리를 선택해주세요.".to_string());
        };
        let amount = self.amount.value();
        if amount == 0 {
            return Err("금액은 0보다 커야 합니다.".to_string());
        }
        let day = match self.day.parse::<u32>() {
            Ok(day) if (1..=MAX_CYCLE_DAYS).contains(&day) => day,
            _ => return Err(format!("주기는 1~{MAX_CYCLE_DAYS}일 사이로 입력해주세요.")),
        };
        if self.is_edit() && !self.is_dirty() {
            return Err("변경된 내용이 없습니다.".to_string());
        }
        Ok(FixedCost {
            id: self.original.as_ref().map_or_else(Uuid::new_v4, |c| c.id),
            category,
            amount,
            day,
            memo: self.memo_text(),
            active: self.active,
        })
    }

    /// Add mode starts over; edit mode keeps the saved values as the new baseline.
    pub fn after_submit(&mut self, saved: &FixedCost) {
        if self.is_edit() {
            self.original = Some(saved.clone());
        } else {
            *self = Self::new();
        }
    }
}

// ---- category editor ---------------------------------------------------------

/// One-line name editor used to add (`code == None`) or rename a category.
pub struct CategoryEditor {
    pub code: Option<String>,
    pub name: TextArea<'static>,
}

impl CategoryEditor {
    pub fn add() -> Self {
        Self {
            code: None,
            name: single_line(""),
        }
    }

    pub fn rename(category: &Category) -> Self {
        Self {
            code: Some(category.code.clone()),
            name: single_line(&category.description),
        }
    }

    pub fn text(&self) -> String {
        text_of(&self.name).trim().to_string()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Enter => FormAction::Submit,
            _ if is_submit(key) => FormAction::Submit,
            _ => {
                if self.name.input(textarea_input(key)) {
                    FormAction::Changed(None)
                } else {
                    FormAction::None
                }
            }
        }
    }
}

// ---- budget form -------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BudgetField {
    #[default]
    Month,
    Amount,
}

pub struct BudgetForm {
    pub month: DateInput,
    pub amount: AmountField,
    pub focus: BudgetField,
}

impl BudgetForm {
    pub fn new(current_month: &str, today: NaiveDate, margin: u16, ledger: &Ledger) -> Self {
        let mut form = Self {
            month: DateInput::new("month", current_month, DateMode::Month, today, margin),
            amount: AmountField::default(),
            focus: BudgetField::Month,
        };
        form.sync_amount(ledger);
        form
    }

    /// The selected `YYYY-MM`, once both segments are typed and the month is
    /// a real one.
    pub fn month_key(&self) -> Option<String> {
        if !self.month.buffer().is_full() {
            return None;
        }
        let value = self.month.value();
        let month: u32 = value.get(5..7)?.parse().ok()?;
        (1..=12).contains(&month).then_some(value)
    }

    pub fn sync_amount(&mut self, ledger: &Ledger) {
        if let Some(month) = self.month_key() {
            self.amount = AmountField::from_value(ledger.budget_for(&month));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, ledger: &Ledger) -> FormAction {
        if self.focus == BudgetField::Month {
            let response = self.month.handle_key(key);
            if response.consumed {
                if response.change.is_some() {
                    self.sync_amount(ledger);
                }
                return FormAction::Changed(response.change);
            }
        }
        if is_submit(key) {
            return FormAction::Submit;
        }
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    BudgetField::Month => BudgetField::Amount,
                    BudgetField::Amount => BudgetField::Month,
                };
                FormAction::None
            }
            KeyCode::Enter => FormAction::Submit,
            _ if self.focus == BudgetField::Amount => {
                if let Some(preset) = preset_for(key) {
                    self.amount.add(preset);
                    return FormAction::Changed(None);
                }
                if self.amount.handle_key(key) {
                    FormAction::Changed(None)
                } else {
                    FormAction::None
                }
            }
            _ => FormAction::None,
        }
    }

    pub fn validate(&self) -> Result<(String, u64), String> {
        let Some(month) = self.month_key() else {
            return Err("월을 YYYY년MM월 형식으로 입력해주세요.".to_string());
        };
        Ok((month, self.amount.value()))
    }
}
