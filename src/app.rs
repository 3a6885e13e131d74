// ============================================================================
// APP - state and event handling
// ============================================================================

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tui_textarea::TextArea;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::date_input::popover::rect_contains;
use crate::date_input::{CloseReason, DateInput, DateInputResponse, FocusEvent};
use crate::forms::{
    BudgetField, BudgetForm, CategoryEditor, FixedCostForm, FormAction, TransactionForm, TxField,
    textarea_input,
};
use crate::import::import_transactions;
use crate::ledger::{Category, month_key, today_at};
use crate::monthly_list::{MonthlyList, SwipeAction};
use crate::storage::{LedgerData, save_ledger};
use crate::theme::Theme;

const SCROLL_STEP: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Input,
    Monthly,
    Budget,
    FixedCosts,
    Categories,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Input,
        View::Monthly,
        View::Budget,
        View::FixedCosts,
        View::Categories,
    ];

    pub fn title(self) -> &'static str {
        match self {
            View::Input => "입력",
            View::Monthly => "월별 내역",
            View::Budget => "예산/요약",
            View::FixedCosts => "고정비",
            View::Categories => "카테고리",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Transaction(Uuid),
    FixedCost(Uuid),
    Category(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirm {
    pub message: String,
    pub action: PendingDelete,
}

pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub data_dir: PathBuf,
    pub data: LedgerData,
    pub today: NaiveDate,
    pub view: View,

    pub tx_form: TransactionForm,
    pub edit_form: Option<TransactionForm>,
    pub budget_form: BudgetForm,
    pub fixed_form: FixedCostForm,
    pub fixed_selected: Option<usize>,
    pub list: MonthlyList,
    pub list_viewport: usize,
    /// Index into the active categories.
    pub category_selected: usize,
    pub category_editor: Option<CategoryEditor>,

    pub show_validation_error: bool,
    pub validation_error_message: String,
    pub show_success: bool,
    pub success_message: String,
    pub confirm: Option<Confirm>,
    pub import_prompt: Option<TextArea<'static>>,
    pub status: String,

    // Hit areas recorded by the last draw
    pub tab_btns: Vec<(View, Rect)>,
    pub tx_field_rects: Vec<(TxField, Rect)>,
    pub category_chips: Vec<(String, Rect)>,
    pub preset_btns: Vec<(u64, Rect)>,
    pub suggestion_rows: Vec<(usize, Rect)>,
    pub kind_btn: Rect,
    pub fix_date_btn: Rect,
    pub save_btn: Rect,
    pub month_tabs: Vec<(String, Rect)>,
    pub filter_rows: Vec<(String, Rect)>,
    pub list_rows: Vec<(Uuid, Rect)>,
    pub fixed_rows: Vec<(usize, Rect)>,
    pub category_rows: Vec<(usize, Rect)>,
    pub confirm_btns: (Rect, Rect),
}

impl App {
    pub fn new(config: AppConfig, data_dir: PathBuf, data: LedgerData) -> Result<Self> {
        let theme = config.theme()?;
        let today = today_at(config.utc_offset_hours);
        let margin = config.popover_margin;

        let mut tx_form = TransactionForm::new(today, margin);
        tx_form.fix_date = data.fix_date;

        let mut list = MonthlyList::new(
            config.page_size,
            config.scroll_threshold,
            config.swipe_threshold,
            config.max_swipe,
        );
        list.selected_month = data.selected_month.clone();
        list.ensure_month(&data.ledger, &month_key(today));

        let budget_form = BudgetForm::new(&month_key(today), today, margin, &data.ledger);

        Ok(Self {
            config,
            theme,
            data_dir,
            data,
            today,
            view: View::Input,
            tx_form,
            edit_form: None,
            budget_form,
            fixed_form: FixedCostForm::new(),
            fixed_selected: None,
            list,
            list_viewport: 10,
            category_selected: 0,
            category_editor: None,
            show_validation_error: false,
            validation_error_message: String::new(),
            show_success: false,
            success_message: String::new(),
            confirm: None,
            import_prompt: None,
            status: String::new(),
            tab_btns: Vec::new(),
            tx_field_rects: Vec::new(),
            category_chips: Vec::new(),
            preset_btns: Vec::new(),
            suggestion_rows: Vec::new(),
            kind_btn: Rect::default(),
            fix_date_btn: Rect::default(),
            save_btn: Rect::default(),
            month_tabs: Vec::new(),
            filter_rows: Vec::new(),
            list_rows: Vec::new(),
            fixed_rows: Vec::new(),
            category_rows: Vec::new(),
            confirm_btns: (Rect::default(), Rect::default()),
        })
    }

    pub fn current_month(&self) -> String {
        month_key(self.today)
    }

    /// Picks up a date change while the app is left running overnight.
    pub fn tick(&mut self) {
        let today = today_at(self.config.utc_offset_hours);
        if today != self.today {
            log::info!("date rolled over to {today}");
            self.today = today;
        }
    }

    /// Show validation error popup without saving
    pub fn show_error(&mut self, context: &str, message: &str) {
        self.show_validation_error = true;
        self.validation_error_message = format!("[{context}] {message}");
    }

    fn persist(&mut self) {
        self.data.selected_month = self.list.selected_month.clone();
        self.data.fix_date = self.tx_form.fix_date;
        if let Err(err) = save_ledger(&self.data, &self.data_dir) {
            log::error!("failed to save ledger: {err:#}");
            self.show_error("저장", &format!("저장하지 못했습니다: {err}"));
        }
    }

    pub fn save_on_exit(&mut self) {
        self.persist();
    }

    /// The date field that currently receives input, if any.
    pub fn active_date_input(&mut self) -> Option<&mut DateInput> {
        if let Some(form) = self.edit_form.as_mut() {
            return Some(&mut form.date);
        }
        match self.view {
            View::Input => Some(&mut self.tx_form.date),
            View::Budget => Some(&mut self.budget_form.month),
            View::Monthly | View::FixedCosts | View::Categories => None,
        }
    }

    pub fn set_view(&mut self, view: View) {
        if view == self.view {
            return;
        }
        self.close_popovers(CloseReason::Dismiss);
        self.category_editor = None;
        self.view = view;
        if view == View::Monthly {
            let current = self.current_month();
            self.list.ensure_month(&self.data.ledger, &current);
        }
    }

    fn close_popovers(&mut self, reason: CloseReason) {
        self.tx_form.date.close(reason);
        self.budget_form.month.close(reason);
        if let Some(form) = self.edit_form.as_mut() {
            form.date.close(reason);
        }
    }

    pub fn on_resize(&mut self) {
        self.close_popovers(CloseReason::Resize);
    }

    // ---- actions ------------------------------------------------------------

    fn submit_transaction(&mut self) {
        match self.tx_form.validate() {
            Ok(tx) => {
                let id = self.data.ledger.add_transaction(tx);
                self.tx_form.after_submit(self.today);
                self.persist();
                self.list
                    .focus_transaction(&self.data.ledger, id, self.list_viewport);
                self.status = "저장했습니다.".to_string();
            }
            Err(message) => self.show_error("입력", &message),
        }
    }

    fn submit_edit(&mut self) {
        let Some(form) = self.edit_form.as_ref() else {
            return;
        };
        match form.validate() {
            Ok(tx) => {
                let id = tx.id;
                if self.data.ledger.update_transaction(tx) {
                    self.edit_form = None;
                    self.persist();
                    self.list
                        .focus_transaction(&self.data.ledger, id, self.list_viewport);
                    self.status = "수정했습니다.".to_string();
                } else {
                    self.edit_form = None;
                    self.show_error("수정", "이미 삭제된 내역입니다.");
                }
            }
            Err(message) => self.show_error("수정", &message),
        }
    }

    pub fn open_edit(&mut self, id: Uuid) {
        if let Some(tx) = self.data.ledger.transaction(id) {
            self.edit_form = Some(TransactionForm::for_edit(
                tx,
                self.today,
                self.config.popover_margin,
            ));
        }
    }

    pub fn ask_delete_transaction(&mut self, id: Uuid) {
        let Some(tx) = self.data.ledger.transaction(id) else {
            return;
        };
        let name = self.data.ledger.category_name(&tx.category);
        self.confirm = Some(Confirm {
            message: format!(
                "{} {} {}원 내역을 삭제할까요?",
                tx.date,
                name,
                crate::ledger::format_with_comma(tx.amount)
            ),
            action: PendingDelete::Transaction(id),
        });
    }

    fn ask_delete_fixed(&mut self) {
        let Some(cost) = self
            .fixed_selected
            .and_then(|i| self.data.ledger.fixed_costs.get(i))
        else {
            return;
        };
        self.confirm = Some(Confirm {
            message: format!(
                "고정비 '{}'을(를) 삭제할까요?",
                self.data.ledger.category_name(&cost.category)
            ),
            action: PendingDelete::FixedCost(cost.id),
        });
    }

    pub fn resolve_confirm(&mut self, accepted: bool) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        if !accepted {
            return;
        }
        let removed = match confirm.action {
            PendingDelete::Transaction(id) => self.data.ledger.delete_transaction(id),
            PendingDelete::FixedCost(id) => {
                let removed = self.data.ledger.delete_fixed_cost(id);
                self.fixed_selected = None;
                self.fixed_form = FixedCostForm::new();
                removed
            }
            PendingDelete::Category(code) => match self.data.ledger.soft_delete_category(&code) {
                Ok(()) => {
                    self.forget_category(&code);
                    true
                }
                Err(message) => {
                    self.show_error("카테고리", &message);
                    return;
                }
            },
        };
        if removed {
            self.persist();
            let current = self.current_month();
            self.list.ensure_month(&self.data.ledger, &current);
            self.status = "삭제했습니다.".to_string();
        } else {
            self.show_error("삭제", "삭제하지 못했습니다. 이미 삭제된 항목입니다.");
        }
    }

    pub fn run_import(&mut self, path: &Path) {
        match import_transactions(path, self.today) {
            Ok(report) => {
                let skipped = report.skipped;
                let added = self.data.ledger.add_transactions(report.transactions);
                self.persist();
                let current = self.current_month();
                self.list.ensure_month(&self.data.ledger, &current);
                self.success_message = format!("{added}건을 가져왔습니다. (건너뜀 {skipped}건)");
                self.show_success = true;
            }
            Err(err) => {
                log::warn!("import from {} failed: {err:#}", path.display());
                self.show_error("가져오기", &err.to_string());
            }
        }
    }

    fn select_fixed(&mut self, index: usize) {
        if let Some(cost) = self.data.ledger.fixed_costs.get(index) {
            self.fixed_selected = Some(index);
            self.fixed_form = FixedCostForm::for_edit(cost);
        }
    }

    fn step_fixed(&mut self, delta: i32) {
        let len = self.data.ledger.fixed_costs.len();
        if len == 0 {
            return;
        }
        let next = match self.fixed_selected {
            Some(i) => (i as i32 + delta).clamp(0, len as i32 - 1) as usize,
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.select_fixed(next);
    }

    /// Cycles the monthly filter through the categories used this month.
    fn cycle_filter(&mut self) {
        let Some(month) = self.list.selected_month.clone() else {
            return;
        };
        let mut codes: Vec<&str> = self
            .data
            .ledger
            .in_month(&month)
            .map(|t| t.category.as_str())
            .collect();
        codes.sort_unstable();
        codes.dedup();
        let next = match self.list.category_filter.as_deref() {
            None => codes.first().map(|c| c.to_string()),
            Some(current) => codes
                .iter()
                .position(|c| *c == current)
                .and_then(|i| codes.get(i + 1))
                .map(|c| c.to_string()),
        };
        match next {
            Some(code) => {
                self.list.category_filter = None;
                self.list.toggle_category(&code);
            }
            None => {
                if let Some(current) = self.list.category_filter.clone() {
                    self.list.toggle_category(&current);
                }
            }
        }
    }

    // ---- categories ---------------------------------------------------------

    fn selected_category(&self) -> Option<&Category> {
        self.data.ledger.active_categories().nth(self.category_selected)
    }

    fn clamp_category_selection(&mut self) {
        let count = self.data.ledger.active_categories().count();
        self.category_selected = self.category_selected.min(count.saturating_sub(1));
    }

    fn step_category(&mut self, delta: i32) {
        let count = self.data.ledger.active_categories().count() as i32;
        if count == 0 {
            return;
        }
        self.category_selected = (self.category_selected as i32 + delta).clamp(0, count - 1) as usize;
    }

    fn move_selected_category(&mut self, delta: i32) {
        let Some(code) = self.selected_category().map(|c| c.code.clone()) else {
            return;
        };
        if self.data.ledger.move_category(&code, delta) {
            self.step_category(delta.signum());
            self.persist();
        }
    }

    fn ask_delete_category(&mut self) {
        let Some(category) = self.selected_category().cloned() else {
            return;
        };
        self.confirm = Some(Confirm {
            message: format!(
                "카테고리 '{}'을(를) 삭제할까요? 기존 내역은 그대로 남습니다.",
                category.description
            ),
            action: PendingDelete::Category(category.code),
        });
    }

    fn submit_category(&mut self) {
        let Some(editor) = self.category_editor.as_ref() else {
            return;
        };
        let name = editor.text();
        let result = match editor.code.clone() {
            Some(code) => self
                .data
                .ledger
                .rename_category(&code, &name)
                .map(|()| "카테고리 이름을 바꿨습니다."),
            None => self.data.ledger.add_category(&name).map(|_| {
                self.category_selected = self.data.ledger.active_categories().count() - 1;
                "카테고리를 추가했습니다."
            }),
        };
        match result {
            Ok(status) => {
                self.category_editor = None;
                self.persist();
                self.status = status.to_string();
            }
            Err(message) => self.show_error("카테고리", &message),
        }
    }

    /// Clears a deleted category out of the entry forms.
    fn forget_category(&mut self, code: &str) {
        self.tx_form.forget_category(code);
        if !self.fixed_form.is_edit() && self.fixed_form.category.as_deref() == Some(code) {
            self.fixed_form.category = None;
        }
        self.clamp_category_selection();
    }

    // ---- keyboard -----------------------------------------------------------

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        if self.show_validation_error {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.show_validation_error = false;
            }
            return Ok(false);
        }
        if self.show_success {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.show_success = false;
            }
            return Ok(false);
        }
        if self.confirm.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.resolve_confirm(true),
                KeyCode::Char('n') | KeyCode::Esc => self.resolve_confirm(false),
                _ => {}
            }
            return Ok(false);
        }
        if self.import_prompt.is_some() {
            self.handle_import_key(key);
            return Ok(false);
        }
        if self.edit_form.is_some() {
            self.handle_edit_key(key);
            return Ok(false);
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char(c @ '1'..='5') = key.code {
                let index = c as usize - '1' as usize;
                self.set_view(View::ALL[index]);
                return Ok(false);
            }
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Char('o') => {
                    self.close_popovers(CloseReason::Dismiss);
                    self.import_prompt = Some(TextArea::new(vec![String::new()]));
                    return Ok(false);
                }
                _ => {}
            }
        }

        match self.view {
            View::Input => self.handle_input_key(key),
            View::Monthly => return Ok(self.handle_monthly_key(key)),
            View::Budget => self.handle_budget_key(key),
            View::FixedCosts => self.handle_fixed_key(key),
            View::Categories => self.handle_category_key(key),
        }
        Ok(false)
    }

    fn log_action(action: &FormAction) {
        if let FormAction::Changed(Some(change)) = action {
            log::debug!("{} changed to '{}'", change.name, change.value);
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        let action = self.tx_form.handle_key(key, &self.data.ledger);
        Self::log_action(&action);
        if action == FormAction::Submit {
            self.submit_transaction();
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Some(form) = self.edit_form.as_mut() else {
            return;
        };
        let action = form.handle_key(key, &self.data.ledger);
        Self::log_action(&action);
        match action {
            FormAction::Submit => self.submit_edit(),
            FormAction::Cancel => self.edit_form = None,
            _ => {}
        }
    }

    fn handle_import_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.import_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.import_prompt = None,
            KeyCode::Enter => {
                let path = prompt.lines().join("").trim().to_string();
                self.import_prompt = None;
                if path.is_empty() {
                    return;
                }
                self.run_import(Path::new(&path));
            }
            _ => {
                prompt.input(textarea_input(key));
            }
        }
    }

    fn handle_monthly_key(&mut self, key: KeyEvent) -> bool {
        let viewport = self.list_viewport;
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Left => self.list.step_month(&self.data.ledger, -1),
            KeyCode::Right => self.list.step_month(&self.data.ledger, 1),
            KeyCode::Up => self.list.move_selection(&self.data.ledger, -1, viewport),
            KeyCode::Down => self.list.move_selection(&self.data.ledger, 1, viewport),
            KeyCode::PageUp => self
                .list
                .move_selection(&self.data.ledger, -(viewport as i32), viewport),
            KeyCode::PageDown => self
                .list
                .move_selection(&self.data.ledger, viewport as i32, viewport),
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('c') => self.list.show_categories = !self.list.show_categories,
            KeyCode::Esc => {
                if let Some(code) = self.list.category_filter.clone() {
                    self.list.toggle_category(&code);
                }
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = self.list.selected_id(&self.data.ledger) {
                    self.open_edit(id);
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(id) = self.list.selected_id(&self.data.ledger) {
                    self.ask_delete_transaction(id);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_budget_key(&mut self, key: KeyEvent) {
        let action = self.budget_form.handle_key(key, &self.data.ledger);
        Self::log_action(&action);
        if action == FormAction::Submit {
            match self.budget_form.validate() {
                Ok((month, amount)) => {
                    self.data.ledger.set_budget(&month, amount);
                    self.persist();
                    self.status = format!("{month} 예산을 저장했습니다.");
                }
                Err(message) => self.show_error("예산", &message),
            }
        }
    }

    fn handle_fixed_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Up => return self.step_fixed(-1),
                KeyCode::Down => return self.step_fixed(1),
                KeyCode::Char('n') => {
                    self.fixed_selected = None;
                    self.fixed_form = FixedCostForm::new();
                    return;
                }
                KeyCode::Char('d') => return self.ask_delete_fixed(),
                _ => {}
            }
        }

        let action = self.fixed_form.handle_key(key, &self.data.ledger.categories);
        match action {
            FormAction::Submit => match self.fixed_form.validate() {
                Ok(cost) => {
                    self.data.ledger.upsert_fixed_cost(cost.clone());
                    self.fixed_form.after_submit(&cost);
                    self.persist();
                    self.status = "고정비를 저장했습니다.".to_string();
                }
                Err(message) => self.show_error("고정비", &message),
            },
            FormAction::Cancel => {
                self.fixed_selected = None;
                self.fixed_form = FixedCostForm::new();
            }
            _ => {}
        }
    }

    fn handle_category_key(&mut self, key: KeyEvent) {
        if let Some(editor) = self.category_editor.as_mut() {
            match editor.handle_key(key) {
                FormAction::Submit => self.submit_category(),
                FormAction::Cancel => self.category_editor = None,
                _ => {}
            }
            return;
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up if shift => self.move_selected_category(-1),
            KeyCode::Down if shift => self.move_selected_category(1),
            KeyCode::Char('[') => self.move_selected_category(-1),
            KeyCode::Char(']') => self.move_selected_category(1),
            KeyCode::Up => self.step_category(-1),
            KeyCode::Down => self.step_category(1),
            KeyCode::Char('a') => self.category_editor = Some(CategoryEditor::add()),
            KeyCode::Enter | KeyCode::Char('r') => {
                self.category_editor = self.selected_category().map(CategoryEditor::rename);
            }
            KeyCode::Delete | KeyCode::Char('d') => self.ask_delete_category(),
            _ => {}
        }
    }

    // ---- mouse --------------------------------------------------------------

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let click = matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left));
        let hit = |rect: Rect| rect_contains(rect, mouse.column, mouse.row);

        if self.show_validation_error || self.show_success {
            if click {
                self.show_validation_error = false;
                self.show_success = false;
            }
            return;
        }
        if self.confirm.is_some() {
            if click {
                let (yes, no) = self.confirm_btns;
                if hit(yes) {
                    self.resolve_confirm(true);
                } else if hit(no) {
                    self.resolve_confirm(false);
                }
            }
            return;
        }
        if self.import_prompt.is_some() {
            return;
        }

        // The open popover sits on top of everything, so it sees the event first
        if let Some(input) = self.active_date_input() {
            let response = input.handle_mouse(mouse);
            if response.consumed {
                self.after_date_response(response);
                return;
            }
            if let Some(FocusEvent::Blur { name }) = &response.focus {
                log::trace!("{name} blurred");
            }
        }
        if self.edit_form.is_some() {
            return;
        }

        if click {
            if let Some(view) = self.tab_btns.iter().find(|(_, r)| hit(*r)).map(|(v, _)| *v) {
                self.set_view(view);
                return;
            }
        }

        match self.view {
            View::Input if click => self.handle_input_click(mouse),
            View::Monthly => self.handle_monthly_mouse(mouse),
            View::FixedCosts if click => {
                if let Some(index) = self.fixed_rows.iter().find(|(_, r)| hit(*r)).map(|(i, _)| *i) {
                    self.select_fixed(index);
                }
            }
            View::Categories if click && self.category_editor.is_none() => {
                if let Some(index) = self.category_rows.iter().find(|(_, r)| hit(*r)).map(|(i, _)| *i) {
                    self.category_selected = index;
                }
            }
            _ => {}
        }
    }

    fn after_date_response(&mut self, response: DateInputResponse) {
        if self.edit_form.is_none() {
            match self.view {
                View::Input => self.tx_form.focus = TxField::Date,
                View::Budget => {
                    self.budget_form.focus = BudgetField::Month;
                    if response.change.is_some() {
                        self.budget_form.sync_amount(&self.data.ledger);
                    }
                }
                View::Monthly | View::FixedCosts | View::Categories => {}
            }
        }
        if let Some(FocusEvent::Focus { name }) = &response.focus {
            log::trace!("{name} focused");
        }
        if let Some(change) = response.change {
            log::debug!("{} picked '{}'", change.name, change.value);
        }
    }

    fn handle_input_click(&mut self, mouse: MouseEvent) {
        let hit = |rect: Rect| rect_contains(rect, mouse.column, mouse.row);

        if let Some(code) = self.category_chips.iter().find(|(_, r)| hit(*r)).map(|(c, _)| c.clone()) {
            self.tx_form.select_category(&code);
            self.tx_form.focus_field(TxField::Category);
        } else if let Some(amount) = self.preset_btns.iter().find(|(_, r)| hit(*r)).map(|(a, _)| *a) {
            self.tx_form.amount.add(amount);
        } else if let Some(index) = self.suggestion_rows.iter().find(|(_, r)| hit(*r)).map(|(i, _)| *i) {
            self.tx_form.apply_suggestion(index);
        } else if hit(self.kind_btn) {
            self.tx_form.toggle_kind();
        } else if hit(self.fix_date_btn) {
            self.tx_form.toggle_fix_date();
        } else if hit(self.save_btn) {
            self.submit_transaction();
        } else if let Some(field) = self.tx_field_rects.iter().find(|(_, r)| hit(*r)).map(|(f, _)| *f) {
            self.tx_form.focus_field(field);
        }
    }

    fn handle_monthly_mouse(&mut self, mouse: MouseEvent) {
        let hit = |rect: Rect| rect_contains(rect, mouse.column, mouse.row);
        let viewport = self.list_viewport;

        match mouse.kind {
            MouseEventKind::ScrollUp => self.list.scroll_by(&self.data.ledger, -SCROLL_STEP, viewport),
            MouseEventKind::ScrollDown => self.list.scroll_by(&self.data.ledger, SCROLL_STEP, viewport),
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(month) = self.month_tabs.iter().find(|(_, r)| hit(*r)).map(|(m, _)| m.clone()) {
                    self.list.select_month(&month);
                } else if let Some(code) =
                    self.filter_rows.iter().find(|(_, r)| hit(*r)).map(|(c, _)| c.clone())
                {
                    self.list.toggle_category(&code);
                } else if let Some(id) = self.list_rows.iter().find(|(_, r)| hit(*r)).map(|(id, _)| *id) {
                    if let Some(index) = self
                        .list
                        .visible_rows(&self.data.ledger)
                        .iter()
                        .position(|t| t.id == id)
                    {
                        self.list.selected = index;
                    }
                    self.list.swipe.start(id, mouse.column);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(id) = self.list.swipe.active() {
                    self.list.swipe.drag(id, mouse.column);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(id) = self.list.swipe.active() {
                    match self.list.swipe.end(id) {
                        SwipeAction::Edit => self.open_edit(id),
                        SwipeAction::Delete => self.ask_delete_transaction(id),
                        SwipeAction::None => {}
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventKind;

    use super::*;
    use crate::ledger::{Ledger, Transaction};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn alt(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app_in(dir: &Path) -> App {
        let config = AppConfig::default();
        App::new(config, dir.to_path_buf(), LedgerData::new(Ledger::new())).unwrap()
    }

    #[test]
    fn submitting_the_input_form_saves_and_focuses_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());

        app.tx_form.select_category("FOOD");
        app.tx_form.amount.add(8_000);
        app.handle_key(ctrl('s')).unwrap();

        assert!(!app.show_validation_error);
        assert_eq!(app.data.ledger.transactions.len(), 1);
        let tx = &app.data.ledger.transactions[0];
        assert_eq!(tx.amount, -8_000);
        assert_eq!(app.list.selected_month, Some(tx.month()));
        assert!(dir.path().join("ledger.bin").exists());
        assert_eq!(app.tx_form.category, None);
    }

    #[test]
    fn invalid_submit_shows_error_until_dismissed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_key(ctrl('s')).unwrap();
        assert!(app.show_validation_error);
        assert!(app.validation_error_message.contains("카테고리"));

        app.handle_key(key(KeyCode::Char('1'))).unwrap();
        assert!(app.show_validation_error);
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(!app.show_validation_error);
    }

    #[test]
    fn swipe_left_asks_before_deleting() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let tx = Transaction::new(app.today, "FOOD".into(), -3_000, String::new());
        let id = app.data.ledger.add_transaction(tx);
        app.set_view(View::Monthly);
        app.list_rows = vec![(id, Rect::new(0, 5, 40, 1))];

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 30, 5));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 5));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20, 5));
        assert!(matches!(
            app.confirm,
            Some(Confirm {
                action: PendingDelete::Transaction(pending),
                ..
            }) if pending == id
        ));
        assert_eq!(app.data.ledger.transactions.len(), 1);

        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert!(app.confirm.is_none());
        assert!(app.data.ledger.transactions.is_empty());
    }

    #[test]
    fn swipe_right_opens_editor() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let tx = Transaction::new(app.today, "FOOD".into(), -3_000, "점심".into());
        let id = app.data.ledger.add_transaction(tx);
        app.set_view(View::Monthly);
        app.list_rows = vec![(id, Rect::new(0, 5, 40, 1))];

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 25, 5));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 25, 5));
        assert_eq!(app.edit_form.as_ref().and_then(|f| f.editing), Some(id));

        let form = app.edit_form.as_mut().unwrap();
        form.amount.clear();
        form.amount.add(4_000);
        app.handle_key(ctrl('s')).unwrap();
        assert!(app.edit_form.is_none());
        assert_eq!(app.data.ledger.transaction(id).map(|t| t.amount), Some(-4_000));
    }

    #[test]
    fn declined_confirm_keeps_row() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let id = app
            .data
            .ledger
            .add_transaction(Transaction::new(app.today, "FOOD".into(), -1, String::new()));
        app.ask_delete_transaction(id);
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.confirm.is_none());
        assert!(app.data.ledger.transaction(id).is_some());
    }

    #[test]
    fn budget_view_saves_budget_for_month() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.set_view(View::Budget);
        let month = app.current_month();

        app.handle_key(key(KeyCode::Tab)).unwrap();
        for c in "500000".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.data.ledger.budget_for(&month), 500_000);
    }

    #[test]
    fn import_prompt_reports_result() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("rows.csv");
        std::fs::write(
            &csv,
            "date,category,amount,memo,type\n2026-10-01,FOOD,5000,국밥,expense\n2026-10-02,,100,,\n",
        )
        .unwrap();
        let mut app = app_in(dir.path());

        app.handle_key(ctrl('o')).unwrap();
        assert!(app.import_prompt.is_some());
        for c in csv.display().to_string().chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert!(app.show_success, "{}", app.validation_error_message);
        assert_eq!(app.data.ledger.transactions.len(), 1);
        assert!(app.success_message.contains("1건"));
    }

    #[test]
    fn resize_closes_popover() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.tx_form.date.open();
        assert!(app.tx_form.date.is_open());
        app.on_resize();
        assert!(!app.tx_form.date.is_open());
        assert_eq!(app.tx_form.date.popover().last_close(), Some(CloseReason::Resize));
    }

    #[test]
    fn switching_views_dismisses_popovers() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.tx_form.date.open();
        app.set_view(View::Budget);
        assert!(!app.tx_form.date.is_open());
        assert_eq!(app.tx_form.date.popover().last_close(), Some(CloseReason::Dismiss));

        app.budget_form.month.open();
        app.handle_key(ctrl('o')).unwrap();
        assert!(app.import_prompt.is_some());
        assert_eq!(app.budget_form.month.popover().last_close(), Some(CloseReason::Dismiss));
    }

    #[test]
    fn categories_view_adds_renames_moves_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_key(alt('5')).unwrap();
        assert_eq!(app.view, View::Categories);
        let active = |app: &App| -> Vec<String> {
            app.data
                .ledger
                .active_categories()
                .map(|c| c.description.clone())
                .collect()
        };

        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        for c in "반려동물".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.category_editor.is_none());
        assert_eq!(active(&app).last().map(String::as_str), Some("반려동물"));
        assert_eq!(app.category_selected, active(&app).len() - 1);

        // Shift+Up swaps the new category with its neighbour and follows it
        app.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::SHIFT)).unwrap();
        let names = active(&app);
        assert_eq!(names[names.len() - 2], "반려동물");
        assert_eq!(app.category_selected, names.len() - 2);

        app.handle_key(key(KeyCode::Char('r'))).unwrap();
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(active(&app).contains(&"반려".to_string()));

        // Duplicate names keep the editor open behind the error popup
        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        for c in "식비".chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(app.show_validation_error);
        assert!(app.category_editor.is_some());
        app.handle_key(key(KeyCode::Esc)).unwrap();
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.category_editor.is_none());

        app.category_selected = 0;
        app.tx_form.select_category("FOOD");
        app.handle_key(key(KeyCode::Char('d'))).unwrap();
        assert!(app.confirm.is_some());
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert!(!active(&app).contains(&"식비".to_string()));
        assert_eq!(app.data.ledger.category_name("FOOD"), "식비");
        assert_eq!(app.tx_form.category, None);

        let saved = crate::storage::load_ledger(dir.path()).unwrap();
        assert_eq!(saved.ledger.categories, app.data.ledger.categories);
    }

    #[test]
    fn quit_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert!(app.handle_key(ctrl('c')).unwrap());
        assert!(!app.handle_key(key(KeyCode::Char('q'))).unwrap());
        app.set_view(View::Monthly);
        let press = KeyEvent {
            kind: KeyEventKind::Press,
            ..key(KeyCode::Char('q'))
        };
        assert!(app.handle_key(press).unwrap());
    }
}
