// ============================================================================
// LEDGER - transactions, categories, budgets, fixed costs and summaries
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, FixedOffset, NaiveDate, Utc};
use strsim::jaro_winkler;
use uuid::Uuid;

pub const AMOUNT_PRESETS: [u64; 4] = [100, 1_000, 10_000, 100_000];
/// Amounts are capped at 12 digits, in the forms and on import alike.
pub const MAX_AMOUNT_DIGITS: usize = 12;
pub const MAX_AMOUNT: u64 = 999_999_999_999;
const MAX_SUGGESTIONS: usize = 5;
const MIN_SUGGESTION_QUERY: usize = 2;
const FUZZY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum TxKind {
    #[default]
    Expense,
    Income,
}

impl TxKind {
    pub fn label(self) -> &'static str {
        match self {
            TxKind::Expense => "지출",
            TxKind::Income => "수입",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            TxKind::Expense => TxKind::Income,
            TxKind::Income => TxKind::Expense,
        }
    }

    pub fn of(amount: i64) -> Self {
        if amount < 0 { TxKind::Expense } else { TxKind::Income }
    }

    /// Expenses are stored negative, income positive.
    pub fn signed(self, amount: u64) -> i64 {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        match self {
            TxKind::Expense => -amount,
            TxKind::Income => amount,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "expense" | "지출" | "out" => Some(TxKind::Expense),
            "income" | "수입" | "in" => Some(TxKind::Income),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub category: String,
    pub amount: i64,
    pub memo: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, category: String, amount: i64, memo: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            category,
            amount,
            memo,
        }
    }

    pub fn kind(&self) -> TxKind {
        TxKind::of(self.amount)
    }

    pub fn month(&self) -> String {
        month_key(self.date)
    }
}

/// Deleted categories stay in the list so old transactions keep their names.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Category {
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub deleted: bool,
}

impl Category {
    pub fn new(code: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            deleted: false,
        }
    }
}

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("FOOD", "식비"),
        Category::new("CAFE", "카페/간식"),
        Category::new("LIVING", "생활용품"),
        Category::new("TRANSPORT", "교통"),
        Category::new("HOUSING", "주거/공과금"),
        Category::new("COMM", "통신"),
        Category::new("HEALTH", "의료/건강"),
        Category::new("LEISURE", "문화/여가"),
        Category::new("GIFT", "경조사/선물"),
        Category::new("SALARY", "급여"),
        Category::new("ETC", "기타"),
    ]
}

/// A recurring cost. `day` is the repeat cycle in days.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FixedCost {
    pub id: Uuid,
    pub category: String,
    pub amount: u64,
    pub day: u32,
    pub memo: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    /// `YYYY-MM` -> budget amount
    pub budgets: BTreeMap<String, u64>,
    pub fixed_costs: Vec<FixedCost>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            categories: default_categories(),
            ..Self::default()
        }
    }

    pub fn category_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.description.as_str())
            .unwrap_or(code)
    }

    /// Categories offered for new entries, in display order.
    pub fn active_categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| !c.deleted)
    }

    fn check_description(&self, description: &str, skip: Option<&str>) -> Result<String, String> {
        let description = description.trim();
        if description.is_empty() {
            return Err("카테고리 이름을 입력해주세요.".to_string());
        }
        let taken = self
            .active_categories()
            .any(|c| c.description == description && Some(c.code.as_str()) != skip);
        if taken {
            return Err(format!("'{description}' 카테고리가 이미 있습니다."));
        }
        Ok(description.to_string())
    }

    /// Appends a category after the existing ones and returns its new code.
    pub fn add_category(&mut self, description: &str) -> Result<String, String> {
        let description = self.check_description(description, None)?;
        let id = Uuid::new_v4().simple().to_string();
        let code = format!("cat_{}", &id[..8]);
        log::info!("added category {code} ({description})");
        self.categories.push(Category::new(&code, &description));
        Ok(code)
    }

    pub fn rename_category(&mut self, code: &str, description: &str) -> Result<(), String> {
        let description = self.check_description(description, Some(code))?;
        let Some(category) = self.categories.iter_mut().find(|c| c.code == code && !c.deleted)
        else {
            return Err("이미 삭제된 카테고리입니다.".to_string());
        };
        log::info!("renamed category {code} to {description}");
        category.description = description;
        Ok(())
    }

    /// Swaps a category with its nearest active neighbour; deleted entries are
    /// stepped over. Returns false at either end of the list.
    pub fn move_category(&mut self, code: &str, delta: i32) -> bool {
        let Some(from) = self.categories.iter().position(|c| c.code == code && !c.deleted) else {
            return false;
        };
        let to = if delta < 0 {
            self.categories[..from].iter().rposition(|c| !c.deleted)
        } else {
            self.categories[from + 1..]
                .iter()
                .position(|c| !c.deleted)
                .map(|i| from + 1 + i)
        };
        match to {
            Some(to) => {
                self.categories.swap(from, to);
                true
            }
            None => false,
        }
    }

    /// Hides a category from new entries. The last active one cannot go.
    pub fn soft_delete_category(&mut self, code: &str) -> Result<(), String> {
        if self.active_categories().count() <= 1 {
            return Err("카테고리는 하나 이상 있어야 합니다.".to_string());
        }
        let Some(category) = self.categories.iter_mut().find(|c| c.code == code && !c.deleted)
        else {
            return Err("이미 삭제된 카테고리입니다.".to_string());
        };
        category.deleted = true;
        log::info!("deleted category {code}");
        Ok(())
    }

    pub fn add_transaction(&mut self, tx: Transaction) -> Uuid {
        let id = tx.id;
        log::info!("added transaction {id} ({} {})", tx.date, tx.amount);
        self.transactions.push(tx);
        id
    }

    /// Bulk insert; returns how many rows were added.
    pub fn add_transactions(&mut self, txs: Vec<Transaction>) -> usize {
        let count = txs.len();
        self.transactions.extend(txs);
        log::info!("added {count} transactions");
        count
    }

    pub fn update_transaction(&mut self, updated: Transaction) -> bool {
        match self.transactions.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => {
                log::warn!("update for unknown transaction {}", updated.id);
                false
            }
        }
    }

    pub fn delete_transaction(&mut self, id: Uuid) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        let removed = self.transactions.len() != before;
        if removed {
            log::info!("deleted transaction {id}");
        }
        removed
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn budget_for(&self, month: &str) -> u64 {
        self.budgets.get(month).copied().unwrap_or(0)
    }

    pub fn set_budget(&mut self, month: &str, amount: u64) {
        log::info!("budget for {month} set to {amount}");
        self.budgets.insert(month.to_string(), amount);
    }

    pub fn in_month<'a>(&'a self, month: &'a str) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |t| t.month() == month)
    }

    pub fn budget_status(&self, month: &str) -> BudgetStatus {
        let spent = total_spent(self.in_month(month));
        BudgetStatus::new(self.budget_for(month), spent)
    }

    pub fn upsert_fixed_cost(&mut self, cost: FixedCost) {
        match self.fixed_costs.iter_mut().find(|c| c.id == cost.id) {
            Some(slot) => *slot = cost,
            None => self.fixed_costs.push(cost),
        }
    }

    pub fn delete_fixed_cost(&mut self, id: Uuid) -> bool {
        let before = self.fixed_costs.len();
        self.fixed_costs.retain(|c| c.id != id);
        self.fixed_costs.len() != before
    }

    /// Total of active fixed costs, for the fixed-cost header.
    pub fn active_fixed_total(&self) -> u64 {
        self.fixed_costs
            .iter()
            .filter(|c| c.active)
            .map(|c| c.amount)
            .sum()
    }

    /// Past memos matching `query`, best match first. Queries shorter than two
    /// characters yield nothing.
    pub fn memo_suggestions(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.chars().count() < MIN_SUGGESTION_QUERY {
            return Vec::new();
        }

        let memos: BTreeSet<&str> = self
            .transactions
            .iter()
            .map(|t| t.memo.trim())
            .filter(|m| !m.is_empty())
            .collect();

        let mut scored: Vec<(f64, &str)> = memos
            .into_iter()
            .filter_map(|memo| {
                let lower = memo.to_lowercase();
                if lower == query {
                    return None;
                }
                if lower.contains(&query) {
                    return Some((2.0 - lower.len() as f64 / 1_000.0, memo));
                }
                let score = jaro_winkler(&lower, &query);
                (score >= FUZZY_THRESHOLD).then_some((score, memo))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, memo)| memo.to_string())
            .collect()
    }
}

// ---- summaries ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    pub budget: u64,
    pub spent: u64,
    pub percent: f64,
    pub remaining: i64,
    pub over: bool,
}

impl BudgetStatus {
    pub fn new(budget: u64, spent: u64) -> Self {
        let percent = if budget > 0 {
            spent as f64 / budget as f64 * 100.0
        } else {
            0.0
        };
        Self {
            budget,
            spent,
            percent,
            remaining: to_i64(budget).saturating_sub(to_i64(spent)),
            over: percent > 100.0,
        }
    }

    pub fn is_set(&self) -> bool {
        self.budget > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub code: String,
    pub name: String,
    pub spent: u64,
    pub count: usize,
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn total_income<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> u64 {
    txs.into_iter()
        .filter(|t| t.amount > 0)
        .fold(0u64, |acc, t| acc.saturating_add(t.amount.unsigned_abs()))
}

pub fn total_spent<'a>(txs: impl IntoIterator<Item = &'a Transaction>) -> u64 {
    txs.into_iter()
        .filter(|t| t.amount < 0)
        .fold(0u64, |acc, t| acc.saturating_add(t.amount.unsigned_abs()))
}

/// Expense totals per category, largest first.
pub fn category_summary<'a>(
    txs: impl IntoIterator<Item = &'a Transaction>,
    ledger: &Ledger,
) -> Vec<CategorySummary> {
    let mut by_code: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for tx in txs.into_iter().filter(|t| t.amount < 0) {
        let entry = by_code.entry(tx.category.as_str()).or_default();
        entry.0 = entry.0.saturating_add(tx.amount.unsigned_abs());
        entry.1 += 1;
    }

    let mut summary: Vec<CategorySummary> = by_code
        .into_iter()
        .map(|(code, (spent, count))| CategorySummary {
            code: code.to_string(),
            name: ledger.category_name(code).to_string(),
            spent,
            count,
        })
        .collect();
    summary.sort_by(|a, b| b.spent.cmp(&a.spent).then_with(|| a.code.cmp(&b.code)));
    summary
}

/// Distinct `YYYY-MM` keys, newest first.
pub fn months_desc(txs: &[Transaction]) -> Vec<String> {
    let months: BTreeSet<String> = txs.iter().map(Transaction::month).collect();
    months.into_iter().rev().collect()
}

/// The current month when it has data, otherwise the newest month with data.
pub fn default_month(txs: &[Transaction], current: &str) -> Option<String> {
    let months = months_desc(txs);
    if months.iter().any(|m| m == current) {
        return Some(current.to_string());
    }
    months.into_iter().next()
}

/// Spending per month of `year`, January first.
pub fn monthly_trend(txs: &[Transaction], year: i32) -> [u64; 12] {
    let mut totals = [0u64; 12];
    for tx in txs.iter().filter(|t| t.date.year() == year && t.amount < 0) {
        let slot = &mut totals[(tx.date.month() - 1) as usize];
        *slot = slot.saturating_add(tx.amount.unsigned_abs());
    }
    totals
}

// ---- amounts & dates -----------------------------------------------------------

pub fn format_with_comma(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_won(value: i64) -> String {
    format!("{}원", format_with_comma(value))
}

/// Keeps only the digits of `value` (`"1,234원"` -> `"1234"`).
pub fn parse_amount(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn amount_value(value: &str) -> Option<u64> {
    parse_amount(value).parse().ok()
}

pub fn preset_label(amount: u64) -> String {
    let label = match amount {
        100 => "1백".to_string(),
        1_000 => "1천".to_string(),
        10_000 => "1만".to_string(),
        100_000 => "10만".to_string(),
        other => format_with_comma(other as i64),
    };
    format!("+{label}원")
}

/// Today's date at a fixed UTC offset (the household uses KST, +9).
pub fn today_at(utc_offset_hours: i32) -> NaiveDate {
    let now = Utc::now();
    FixedOffset::east_opt(utc_offset_hours * 3600)
        .map(|offset| now.with_timezone(&offset).date_naive())
        .unwrap_or_else(|| now.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(d: NaiveDate, category: &str, amount: i64, memo: &str) -> Transaction {
        Transaction::new(d, category.to_string(), amount, memo.to_string())
    }

    fn sample() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_transactions(vec![
            tx(date(2026, 2, 1), "SALARY", 3_000_000, "월급"),
            tx(date(2026, 2, 3), "FOOD", -12_000, "점심 김밥"),
            tx(date(2026, 2, 5), "FOOD", -30_000, "마트 장보기"),
            tx(date(2026, 2, 9), "TRANSPORT", -55_000, "교통카드 충전"),
            tx(date(2026, 1, 20), "FOOD", -8_000, "점심 국밥"),
            tx(date(2025, 12, 24), "GIFT", -100_000, "크리스마스 선물"),
        ]);
        ledger
    }

    #[test]
    fn signs_amounts_by_kind() {
        assert_eq!(TxKind::Expense.signed(5_000), -5_000);
        assert_eq!(TxKind::Income.signed(5_000), 5_000);
        assert_eq!(TxKind::of(-1), TxKind::Expense);
        assert_eq!(TxKind::parse("수입"), Some(TxKind::Income));
        assert_eq!(TxKind::parse("refund"), None);
    }

    #[test]
    fn totals_split_income_and_spending() {
        let ledger = sample();
        let feb: Vec<_> = ledger.in_month("2026-02").collect();
        assert_eq!(total_income(feb.iter().copied()), 3_000_000);
        assert_eq!(total_spent(feb.iter().copied()), 97_000);
    }

    #[test]
    fn category_summary_sorts_by_spending() {
        let ledger = sample();
        let summary = category_summary(ledger.in_month("2026-02"), &ledger);
        let codes: Vec<_> = summary.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["TRANSPORT", "FOOD"]);
        assert_eq!(summary[1].spent, 42_000);
        assert_eq!(summary[1].count, 2);
        assert_eq!(summary[1].name, "식비");
    }

    #[test]
    fn budget_status_reports_overrun() {
        let status = BudgetStatus::new(100_000, 97_000);
        assert!(!status.over);
        assert_eq!(status.remaining, 3_000);
        assert!((status.percent - 97.0).abs() < 1e-9);

        let over = BudgetStatus::new(50_000, 97_000);
        assert!(over.over);
        assert_eq!(over.remaining, -47_000);

        let unset = BudgetStatus::new(0, 97_000);
        assert!(!unset.is_set());
        assert_eq!(unset.percent, 0.0);
        assert!(!unset.over);
    }

    #[test]
    fn summaries_saturate_instead_of_overflowing() {
        let huge = vec![
            tx(date(2026, 2, 1), "FOOD", -i64::MAX, "a"),
            tx(date(2026, 2, 2), "FOOD", -i64::MAX, "b"),
            tx(date(2026, 2, 3), "FOOD", -i64::MAX, "c"),
            tx(date(2026, 2, 4), "SALARY", i64::MAX, "d"),
            tx(date(2026, 2, 5), "SALARY", i64::MAX, "e"),
            tx(date(2026, 2, 6), "SALARY", i64::MAX, "f"),
        ];
        assert_eq!(total_spent(&huge), u64::MAX);
        assert_eq!(total_income(&huge), u64::MAX);
        assert_eq!(monthly_trend(&huge, 2026)[1], u64::MAX);

        let mut ledger = Ledger::new();
        ledger.add_transactions(huge.clone());
        let summary = category_summary(&huge, &ledger);
        assert_eq!(summary[0].spent, u64::MAX);
        assert_eq!(summary[0].count, 3);

        let status = BudgetStatus::new(100, u64::MAX);
        assert_eq!(status.remaining, 100 - i64::MAX);
        assert!(status.over);
    }

    #[test]
    fn ledger_budget_status_uses_month_spending() {
        let mut ledger = sample();
        ledger.set_budget("2026-02", 90_000);
        let status = ledger.budget_status("2026-02");
        assert_eq!(status.spent, 97_000);
        assert!(status.over);
        assert_eq!(ledger.budget_for("2026-03"), 0);
    }

    #[test]
    fn default_month_prefers_current() {
        let ledger = sample();
        assert_eq!(
            months_desc(&ledger.transactions),
            ["2026-02", "2026-01", "2025-12"]
        );
        assert_eq!(default_month(&ledger.transactions, "2026-01").as_deref(), Some("2026-01"));
        assert_eq!(default_month(&ledger.transactions, "2026-10").as_deref(), Some("2026-02"));
        assert_eq!(default_month(&[], "2026-10"), None);
    }

    #[test]
    fn monthly_trend_counts_expenses_only() {
        let ledger = sample();
        let trend = monthly_trend(&ledger.transactions, 2026);
        assert_eq!(trend[0], 8_000);
        assert_eq!(trend[1], 97_000);
        assert_eq!(trend[11], 0);
    }

    #[test]
    fn categories_can_be_added_renamed_and_reordered() {
        let mut ledger = Ledger::new();
        let code = ledger.add_category("  반려동물 ").unwrap();
        assert!(code.starts_with("cat_"));
        assert_eq!(ledger.categories.last().unwrap().description, "반려동물");
        assert!(ledger.add_category("   ").is_err());
        assert!(ledger.add_category("식비").is_err());

        ledger.rename_category(&code, "펫").unwrap();
        assert_eq!(ledger.category_name(&code), "펫");
        assert!(ledger.rename_category(&code, "식비").is_err());
        ledger.rename_category("FOOD", "식비").unwrap();

        let codes = |ledger: &Ledger| -> Vec<String> {
            ledger.active_categories().map(|c| c.code.clone()).collect()
        };
        assert!(!ledger.move_category("FOOD", -1));
        assert!(ledger.move_category("FOOD", 1));
        assert_eq!(codes(&ledger)[..2], ["CAFE", "FOOD"]);
        assert!(!ledger.move_category(&code, 1));
        assert!(ledger.move_category(&code, -1));
        assert_eq!(codes(&ledger).last().map(String::as_str), Some("ETC"));
    }

    #[test]
    fn soft_deleted_categories_keep_their_names() {
        let mut ledger = sample();
        ledger.soft_delete_category("CAFE").unwrap();
        assert!(ledger.soft_delete_category("CAFE").is_err());
        assert!(ledger.active_categories().all(|c| c.code != "CAFE"));
        assert_eq!(ledger.category_name("CAFE"), "카페/간식");
        assert!(ledger.rename_category("CAFE", "커피").is_err());

        // Moving steps over the deleted entry
        assert!(ledger.move_category("LIVING", -1));
        let first: Vec<&str> = ledger.categories.iter().take(3).map(|c| c.code.as_str()).collect();
        assert_eq!(first, ["LIVING", "CAFE", "FOOD"]);

        // A deleted name can be reused
        ledger.add_category("카페/간식").unwrap();

        let mut single = Ledger::new();
        single.categories = vec![Category::new("ONLY", "하나")];
        assert!(single.soft_delete_category("ONLY").is_err());
    }

    #[test]
    fn update_and_delete_by_id() {
        let mut ledger = sample();
        let mut first = ledger.transactions[1].clone();
        first.memo = "저녁".to_string();
        assert!(ledger.update_transaction(first.clone()));
        assert_eq!(ledger.transaction(first.id).unwrap().memo, "저녁");
        assert!(ledger.delete_transaction(first.id));
        assert!(!ledger.delete_transaction(first.id));
        assert!(ledger.transaction(first.id).is_none());
    }

    #[test]
    fn formats_amounts_with_commas() {
        assert_eq!(format_with_comma(0), "0");
        assert_eq!(format_with_comma(999), "999");
        assert_eq!(format_with_comma(1_000), "1,000");
        assert_eq!(format_with_comma(1_234_567), "1,234,567");
        assert_eq!(format_with_comma(-45_000), "-45,000");
        assert_eq!(format_won(12_000), "12,000원");
    }

    #[test]
    fn parse_amount_strips_everything_but_digits() {
        assert_eq!(parse_amount("1,234원"), "1234");
        assert_eq!(parse_amount(""), "");
        assert_eq!(amount_value("12,000"), Some(12_000));
        assert_eq!(amount_value("abc"), None);
    }

    #[test]
    fn preset_labels() {
        let labels: Vec<_> = AMOUNT_PRESETS.iter().map(|a| preset_label(*a)).collect();
        assert_eq!(labels, ["+1백원", "+1천원", "+1만원", "+10만원"]);
    }

    #[test]
    fn memo_suggestions_need_two_chars() {
        let ledger = sample();
        assert!(ledger.memo_suggestions("점").is_empty());
        let hits = ledger.memo_suggestions("점심");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|m| m.contains("점심")));
    }

    #[test]
    fn memo_suggestions_skip_exact_match() {
        let ledger = sample();
        assert!(!ledger.memo_suggestions("월급").contains(&"월급".to_string()));
    }

    #[test]
    fn fixed_cost_total_counts_active_only() {
        let mut ledger = Ledger::new();
        for (amount, active) in [(17_000, true), (55_000, true), (9_900, false)] {
            ledger.upsert_fixed_cost(FixedCost {
                id: Uuid::new_v4(),
                category: "COMM".into(),
                amount,
                day: 30,
                memo: String::new(),
                active,
            });
        }
        assert_eq!(ledger.active_fixed_total(), 72_000);
        let id = ledger.fixed_costs[0].id;
        assert!(ledger.delete_fixed_cost(id));
        assert_eq!(ledger.active_fixed_total(), 55_000);
    }
}
