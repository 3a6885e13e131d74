// ============================================================================
// RENDERING
// ============================================================================

use std::time::Instant;

use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tui_textarea::TextArea;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, View};
use crate::forms::{BudgetField, FixedField, TransactionForm, TxField};
use crate::ledger::{
    AMOUNT_PRESETS, Ledger, TxKind, category_summary, format_won, monthly_trend, preset_label,
    total_income, total_spent,
};
use crate::theme::Theme;

const BAR_WIDTH: usize = 30;
const MAX_SUGGESTION_ROWS: u16 = 5;

/// Get centered popup area for overlays
fn get_popup_area(frame_width: u16, frame_height: u16, width_percent: u16, height_percent: u16) -> Rect {
    let width = frame_width.saturating_mul(width_percent) / 100;
    let height = frame_height.saturating_mul(height_percent) / 100;
    let x = (frame_width.saturating_sub(width)) / 2;
    let y = (frame_height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}

fn render_button(frame: &mut Frame, text: &str, area: Rect, color: Color) {
    let btn = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(color));
    frame.render_widget(btn, area);
}

fn field_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let color = if focused { theme.main } else { theme.muted };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (value as f64 / max as f64 * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn amount_style(amount: i64, theme: &Theme) -> Style {
    match TxKind::of(amount) {
        TxKind::Expense => Style::default().fg(theme.expense),
        TxKind::Income => Style::default().fg(theme.income),
    }
}

/// Single-line text field backed by a `TextArea`, with the terminal cursor
/// placed at the edit position when focused.
fn render_text_line(frame: &mut Frame, area: Rect, text: &TextArea<'_>, block: Block<'_>, focused: bool) {
    let line = text.lines().first().cloned().unwrap_or_default();
    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(line.clone()).block(block), area);

    if focused && inner.width > 0 {
        let (_, col) = text.cursor();
        let width: usize = line
            .chars()
            .take(col)
            .map(|c| c.width().unwrap_or(0))
            .sum();
        let x = inner.x + (width as u16).min(inner.width - 1);
        frame.set_cursor(x, inner.y);
    }
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.size();
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(size);

    draw_tabs(frame, app, outer[0]);
    match app.view {
        View::Input => draw_input_view(frame, app, outer[1]),
        View::Monthly => draw_monthly_view(frame, app, outer[1]),
        View::Budget => draw_budget_view(frame, app, outer[1]),
        View::FixedCosts => draw_fixed_view(frame, app, outer[1]),
        View::Categories => draw_categories_view(frame, app, outer[1]),
    }
    draw_footer(frame, app, outer[2]);

    if app.edit_form.is_some() {
        draw_edit_modal(frame, app);
    }
    if app.import_prompt.is_some() {
        draw_import_prompt(frame, app);
    }
    if app.confirm.is_some() {
        draw_confirm_popup(frame, app);
    }
    if app.show_validation_error {
        draw_validation_error_popup(frame, app);
    }
    if app.show_success {
        draw_success_popup(frame, app);
    }

    // Calendar popover goes last so it sits above everything
    let theme = app.theme;
    let today = app.today;
    if let Some(input) = app.active_date_input() {
        input.render_popover(frame, &theme, today);
    }
}

fn draw_tabs(frame: &mut Frame, app: &mut App, area: Rect) {
    app.tab_btns.clear();
    let block = Block::default()
        .title(format!(" 가계부 · {} ", app.config.profile))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.main));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut x = inner.x;
    for (i, view) in View::ALL.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, view.title());
        let width = label.width() as u16;
        if x + width > inner.x + inner.width {
            break;
        }
        let rect = Rect::new(x, inner.y, width, 1);
        let style = if *view == app.view {
            Style::default()
                .bg(app.theme.main)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(Paragraph::new(label).style(style), rect);
        app.tab_btns.push((*view, rect));
        x += width + 1;
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.view {
        View::Input => "Tab 이동 · F3 수입/지출 · F4 날짜고정 · F5-F8 금액 · Ctrl+S 저장",
        View::Monthly => "←/→ 월 · ↑/↓ 선택 · e 수정 · d 삭제 · f 필터 · c 카테고리",
        View::Budget => "Tab 이동 · Enter 저장",
        View::FixedCosts => "Ctrl+↑/↓ 선택 · Ctrl+N 새로 · Ctrl+D 삭제 · Enter 저장",
        View::Categories if app.category_editor.is_some() => "Enter 저장 · Esc 취소",
        View::Categories => "↑/↓ 선택 · Shift+↑/↓ 순서 · a 추가 · r 이름 · d 삭제",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {help} "), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(app.status.as_str(), Style::default().fg(app.theme.main)),
        Span::styled("  Alt+1-5 화면 · Ctrl+O 가져오기 · Ctrl+Q 종료", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// ---- transaction form --------------------------------------------------------

#[derive(Default)]
struct TxFormLayout {
    fields: Vec<(TxField, Rect)>,
    chips: Vec<(String, Rect)>,
    presets: Vec<(u64, Rect)>,
    suggestions: Vec<(usize, Rect)>,
    kind: Rect,
    fix_date: Rect,
    save: Rect,
}

/// Lays chips left to right, wrapping to the next row when one does not fit.
fn layout_chips(area: Rect, labels: &[(String, String)]) -> Vec<(String, Rect)> {
    let mut out = Vec::new();
    let (mut x, mut y) = (area.x, area.y);
    for (code, label) in labels {
        let width = label.width() as u16 + 2;
        if x + width > area.x + area.width {
            x = area.x;
            y += 1;
        }
        if y >= area.y + area.height {
            break;
        }
        out.push((code.clone(), Rect::new(x, y, width.min(area.width), 1)));
        x += width + 1;
    }
    out
}

fn draw_transaction_form(
    frame: &mut Frame,
    area: Rect,
    form: &mut TransactionForm,
    ledger: &Ledger,
    theme: &Theme,
) -> TxFormLayout {
    let mut layout = TxFormLayout::default();
    let suggestion_rows = (form.suggestions.len() as u16).min(MAX_SUGGESTION_ROWS);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(suggestion_rows),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    // Date + fix toggle
    let date_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(16)])
        .split(rows[0]);
    let date_focused = form.focus == TxField::Date;
    form.date
        .render_field(frame, date_row[0], theme, "날짜", date_focused);
    layout.fields.push((TxField::Date, date_row[0]));
    let fix_label = if form.fix_date { "[x] 날짜 고정" } else { "[ ] 날짜 고정" };
    render_button(frame, fix_label, date_row[1], if form.fix_date { theme.main } else { Color::Gray });
    layout.fix_date = date_row[1];

    // Category chips, recent first
    let category_block = field_block("카테고리", form.focus == TxField::Category, theme);
    let inner = category_block.inner(rows[1]);
    frame.render_widget(category_block, rows[1]);
    layout.fields.push((TxField::Category, rows[1]));
    if inner.height > 0 {
        let recent: Vec<Span> = std::iter::once(Span::styled("최근 ", Style::default().fg(Color::DarkGray)))
            .chain(form.recent.iter().enumerate().map(|(i, code)| {
                Span::raw(format!("[{}] {}  ", i + 1, ledger.category_name(code)))
            }))
            .collect();
        frame.render_widget(Paragraph::new(Line::from(recent)), Rect { height: 1, ..inner });

        let labels: Vec<(String, String)> = ledger
            .active_categories()
            .map(|c| (c.code.clone(), c.description.clone()))
            .collect();
        let chip_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        for (code, rect) in layout_chips(chip_area, &labels) {
            let selected = form.category.as_deref() == Some(code.as_str());
            let style = if selected {
                Style::default().bg(theme.main).fg(Color::Black).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let name = format!(" {} ", ledger.category_name(&code));
            frame.render_widget(Paragraph::new(name).style(style), rect);
            layout.chips.push((code, rect));
        }
    }

    // Amount + kind toggle
    let amount_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(10)])
        .split(rows[2]);
    let amount_focused = form.focus == TxField::Amount;
    let amount_text = form.amount.display();
    let amount = Paragraph::new(Line::from(vec![
        Span::styled(amount_text.clone(), amount_style(form.kind.signed(1), theme)),
        Span::raw(" 원"),
    ]))
    .block(field_block("금액", amount_focused, theme));
    frame.render_widget(amount, amount_row[0]);
    layout.fields.push((TxField::Amount, amount_row[0]));
    if amount_focused && amount_row[0].width > 2 {
        let x = amount_row[0].x + 1 + (amount_text.width() as u16).min(amount_row[0].width - 3);
        frame.set_cursor(x, amount_row[0].y + 1);
    }
    let kind_color = match form.kind {
        TxKind::Expense => theme.expense,
        TxKind::Income => theme.income,
    };
    let kind_block = field_block("구분", form.focus == TxField::Kind, theme);
    frame.render_widget(
        Paragraph::new(form.kind.label())
            .alignment(Alignment::Center)
            .style(Style::default().fg(kind_color).add_modifier(Modifier::BOLD))
            .block(kind_block),
        amount_row[1],
    );
    layout.kind = amount_row[1];
    layout.fields.push((TxField::Kind, amount_row[1]));

    // Presets
    let preset_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[3]);
    for (amount, rect) in AMOUNT_PRESETS.iter().zip(preset_cols.iter()) {
        render_button(frame, &preset_label(*amount), *rect, theme.hover);
        layout.presets.push((*amount, *rect));
    }

    // Memo + suggestions
    let memo_focused = form.focus == TxField::Memo;
    render_text_line(
        frame,
        rows[4],
        &form.memo,
        field_block("메모", memo_focused, theme),
        memo_focused,
    );
    layout.fields.push((TxField::Memo, rows[4]));
    for (i, text) in form.suggestions.iter().take(MAX_SUGGESTION_ROWS as usize).enumerate() {
        let rect = Rect::new(rows[5].x + 2, rows[5].y + i as u16, rows[5].width.saturating_sub(4), 1);
        let style = if form.suggestion == Some(i) {
            Style::default().bg(theme.hover).fg(Color::Black)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(Paragraph::new(format!("↳ {text}")).style(style), rect);
        layout.suggestions.push((i, rect));
    }

    let save_label = if form.editing.is_some() { "수정 (Ctrl+S)" } else { "저장 (Ctrl+S)" };
    render_button(frame, save_label, rows[6], theme.main);
    layout.save = rows[6];

    layout
}

fn draw_input_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title("내역 입력")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let theme = app.theme;
    let layout = draw_transaction_form(frame, inner, &mut app.tx_form, &app.data.ledger, &theme);
    app.tx_field_rects = layout.fields;
    app.category_chips = layout.chips;
    app.preset_btns = layout.presets;
    app.suggestion_rows = layout.suggestions;
    app.kind_btn = layout.kind;
    app.fix_date_btn = layout.fix_date;
    app.save_btn = layout.save;
}

fn draw_edit_modal(frame: &mut Frame, app: &mut App) {
    let size = frame.size();
    let area = get_popup_area(size.width, size.height, 80, 90);
    let block = Block::default()
        .title("내역 수정 (Esc 취소)")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.main));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let theme = app.theme;
    if let Some(form) = app.edit_form.as_mut() {
        draw_transaction_form(frame, inner, form, &app.data.ledger, &theme);
    }
}

// ---- monthly list ------------------------------------------------------------

fn draw_monthly_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    draw_month_tabs(frame, app, chunks[0]);
    draw_month_summary(frame, app, chunks[1]);

    if app.list.show_categories {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        draw_transaction_list(frame, app, main[0]);
        draw_category_panel(frame, app, main[1]);
    } else {
        app.filter_rows.clear();
        draw_transaction_list(frame, app, chunks[2]);
    }
}

fn draw_month_tabs(frame: &mut Frame, app: &mut App, area: Rect) {
    app.month_tabs.clear();
    let block = Block::default().title("월").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let months = crate::ledger::months_desc(&app.data.ledger.transactions);
    let mut x = inner.x;
    for month in months {
        let label = format!(" {month} ");
        let width = label.width() as u16;
        if x + width > inner.x + inner.width {
            break;
        }
        let rect = Rect::new(x, inner.y, width, 1);
        let style = if app.list.selected_month.as_deref() == Some(month.as_str()) {
            Style::default().bg(app.theme.main).fg(Color::Black)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(Paragraph::new(label).style(style), rect);
        app.month_tabs.push((month, rect));
        x += width + 1;
    }
}

fn draw_month_summary(frame: &mut Frame, app: &App, area: Rect) {
    let Some(month) = app.list.selected_month.as_deref() else {
        let empty = Paragraph::new("내역이 없습니다.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };
    let ledger = &app.data.ledger;
    let income = total_income(ledger.in_month(month));
    let spent = total_spent(ledger.in_month(month));
    let status = ledger.budget_status(month);

    let mut lines = vec![Line::from(vec![
        Span::raw("수입 "),
        Span::styled(format_won(income as i64), Style::default().fg(app.theme.income)),
        Span::raw("   지출 "),
        Span::styled(format_won(spent as i64), Style::default().fg(app.theme.expense)),
    ])];
    lines.push(budget_line(&status, &app.theme));

    let title = match app.list.category_filter.as_deref() {
        Some(code) => format!("{month} 요약 · 필터: {}", ledger.category_name(code)),
        None => format!("{month} 요약"),
    };
    let widget = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn budget_line(status: &crate::ledger::BudgetStatus, theme: &Theme) -> Line<'static> {
    if !status.is_set() {
        return Line::from(Span::styled("예산 미설정", Style::default().fg(Color::DarkGray)));
    }
    let color = if status.over { theme.expense } else { theme.main };
    let remaining = if status.over {
        format!("초과 {}", format_won(-status.remaining))
    } else {
        format!("남음 {}", format_won(status.remaining))
    };
    Line::from(vec![
        Span::raw(format!("예산 {} ", format_won(status.budget as i64))),
        Span::styled(bar(status.spent.min(status.budget), status.budget), Style::default().fg(color)),
        Span::styled(format!(" {:.0}% ", status.percent), Style::default().fg(color)),
        Span::raw(remaining),
    ])
}

fn draw_transaction_list(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_rows.clear();
    let total = app.list.rows(&app.data.ledger).len();
    let block = Block::default()
        .title(format!("내역 {}/{}", app.list.pager.visible().min(total), total))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.list_viewport = inner.height.max(1) as usize;

    let now = Instant::now();
    let rows = app.list.visible_rows(&app.data.ledger);
    for (row, (index, tx)) in rows.iter().enumerate().skip(app.list.scroll).enumerate() {
        if row as u16 >= inner.height {
            break;
        }
        let rect = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        let offset = app.list.swipe.offset(tx.id);

        let mut spans = Vec::new();
        if offset > 0 {
            spans.push(Span::styled(
                " ".repeat(offset as usize),
                Style::default().bg(app.theme.main),
            ));
        }
        spans.push(Span::raw(format!(
            "{:02}-{:02}  {:<10} ",
            tx.date.month(),
            tx.date.day(),
            app.data.ledger.category_name(&tx.category)
        )));
        spans.push(Span::styled(
            format!("{:>12}", format_won(tx.amount)),
            amount_style(tx.amount, &app.theme),
        ));
        if !tx.memo.is_empty() {
            spans.push(Span::styled(format!("  {}", tx.memo), Style::default().fg(Color::Gray)));
        }
        if offset < 0 {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                " ".repeat(offset.unsigned_abs() as usize),
                Style::default().bg(app.theme.expense),
            ));
        }

        let mut style = Style::default();
        if app.list.is_highlighted(tx.id, now) {
            style = style.bg(app.theme.hover).fg(Color::Black);
        }
        if index == app.list.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(style), rect);
        app.list_rows.push((tx.id, rect));
    }

    if rows.is_empty() {
        let empty = Paragraph::new("이 달의 내역이 없습니다.").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn draw_category_panel(frame: &mut Frame, app: &mut App, area: Rect) {
    app.filter_rows.clear();
    let block = Block::default().title("카테고리별 지출 (클릭: 필터)").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(month) = app.list.selected_month.clone() else {
        return;
    };
    let ledger = &app.data.ledger;
    let summary = category_summary(ledger.in_month(&month), ledger);
    let max = summary.first().map_or(0, |s| s.spent);
    for (i, item) in summary.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let rect = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        let active = app.list.category_filter.as_deref() == Some(item.code.as_str());
        let label_style = if active {
            Style::default().fg(app.theme.main).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::styled(format!("{:<8} ", item.name), label_style),
            Span::styled(bar(item.spent, max), Style::default().fg(app.theme.hover)),
            Span::raw(format!(" {} ({}건)", format_won(item.spent as i64), item.count)),
        ]);
        frame.render_widget(Paragraph::new(line), rect);
        app.filter_rows.push((item.code.clone(), rect));
    }
}

// ---- budget & summary --------------------------------------------------------

fn draw_budget_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(20)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(cols[0]);

    let theme = app.theme;
    let form = &mut app.budget_form;
    form.month
        .render_field(frame, left[0], &theme, "월", form.focus == BudgetField::Month);
    let amount_focused = form.focus == BudgetField::Amount;
    let amount_text = form.amount.display();
    frame.render_widget(
        Paragraph::new(format!("{amount_text} 원")).block(field_block("예산", amount_focused, &theme)),
        left[1],
    );
    if amount_focused && left[1].width > 2 {
        let x = left[1].x + 1 + (amount_text.width() as u16).min(left[1].width - 3);
        frame.set_cursor(x, left[1].y + 1);
    }
    render_button(frame, "저장 (Enter)", left[2], theme.main);

    let month = app.budget_form.month_key().unwrap_or_else(|| app.current_month());
    draw_budget_summary(frame, app, cols[1], &month);
}

fn draw_budget_summary(frame: &mut Frame, app: &App, area: Rect, month: &str) {
    let ledger = &app.data.ledger;
    let theme = &app.theme;
    let status = ledger.budget_status(month);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{month} 예산 현황"),
            Style::default().fg(theme.main).add_modifier(Modifier::BOLD),
        )),
        budget_line(&status, theme),
        Line::from(format!(
            "사용 {} · 고정비(활성) {}",
            format_won(status.spent as i64),
            format_won(ledger.active_fixed_total() as i64)
        )),
        Line::from(""),
    ];

    let summary = category_summary(ledger.in_month(month), ledger);
    let max = summary.first().map_or(0, |s| s.spent);
    for item in &summary {
        lines.push(Line::from(vec![
            Span::raw(format!("{:<8} ", item.name)),
            Span::styled(bar(item.spent, max), Style::default().fg(theme.hover)),
            Span::raw(format!(" {}", format_won(item.spent as i64))),
        ]));
    }

    let year: i32 = month.get(..4).and_then(|y| y.parse().ok()).unwrap_or(app.today.year());
    let current: u32 = month.get(5..7).and_then(|m| m.parse().ok()).unwrap_or(0);
    let trend = monthly_trend(&ledger.transactions, year);
    let max_month = trend.iter().copied().max().unwrap_or(0);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{year}년 월별 지출"),
        Style::default().fg(theme.main),
    )));
    for (i, total) in trend.iter().enumerate() {
        let is_current = i as u32 + 1 == current;
        let style = if is_current {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>3}월 ", i + 1), style),
            Span::styled(
                bar(*total, max_month),
                Style::default().fg(if is_current { theme.main } else { theme.active }),
            ),
            Span::raw(format!(" {}", format_won(*total as i64))),
        ]));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().title("요약").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
}

// ---- fixed costs -------------------------------------------------------------

fn draw_fixed_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    app.fixed_rows.clear();
    let ledger = &app.data.ledger;
    let block = Block::default()
        .title(format!("고정비 · 활성 합계 {}", format_won(ledger.active_fixed_total() as i64)))
        .borders(Borders::ALL);
    let inner = block.inner(cols[0]);
    frame.render_widget(block, cols[0]);
    for (i, cost) in ledger.fixed_costs.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let rect = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        let mut style = if cost.active {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if app.fixed_selected == Some(i) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let text = format!(
            "{:<8} {:>12}  {}일마다  {}",
            ledger.category_name(&cost.category),
            format_won(cost.amount as i64),
            cost.day,
            cost.memo
        );
        frame.render_widget(Paragraph::new(text).style(style), rect);
        app.fixed_rows.push((i, rect));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(cols[1]);
    let theme = app.theme;
    let form = &app.fixed_form;
    let category = form
        .category
        .as_deref()
        .map(|c| ledger.category_name(c).to_string())
        .unwrap_or_else(|| "선택 안 함".to_string());
    let title = if form.is_edit() { "카테고리 (수정)" } else { "카테고리 (추가)" };
    frame.render_widget(
        Paragraph::new(format!("◀ {category} ▶"))
            .block(field_block(title, form.focus == FixedField::Category, &theme)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(format!("{} 원", form.amount.display()))
            .block(field_block("금액", form.focus == FixedField::Amount, &theme)),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(format!("{} 일", form.day))
            .block(field_block("주기 (1-365일)", form.focus == FixedField::Day, &theme)),
        rows[2],
    );
    render_text_line(
        frame,
        rows[3],
        &form.memo,
        field_block("메모", form.focus == FixedField::Memo, &theme),
        form.focus == FixedField::Memo,
    );
    let active = if form.active { "[x] 사용" } else { "[ ] 사용 안 함" };
    frame.render_widget(
        Paragraph::new(active).block(field_block("상태", form.focus == FixedField::Active, &theme)),
        rows[4],
    );
}

// ---- categories --------------------------------------------------------------

fn draw_categories_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let editor_height = if app.category_editor.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(editor_height)])
        .split(area);

    app.category_rows.clear();
    let theme = app.theme;
    let ledger = &app.data.ledger;
    let active: Vec<_> = ledger.active_categories().collect();
    let block = Block::default()
        .title(format!("카테고리 · {}개", active.len()))
        .borders(Borders::ALL);
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    // Keep the selection on screen
    let height = inner.height as usize;
    let first = (app.category_selected + 1).saturating_sub(height);
    for (row, (index, category)) in active.iter().enumerate().skip(first).enumerate() {
        if row >= height {
            break;
        }
        let rect = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        let used = ledger
            .transactions
            .iter()
            .filter(|t| t.category == category.code)
            .count();
        let style = if index == app.category_selected {
            Style::default().bg(theme.main).fg(Color::Black)
        } else {
            Style::default()
        };
        let text = format!("{:>2}. {:<16} {}건", index + 1, category.description, used);
        frame.render_widget(Paragraph::new(text).style(style), rect);
        app.category_rows.push((index, rect));
    }

    if let Some(editor) = app.category_editor.as_ref() {
        let title = if editor.code.is_some() { "이름 바꾸기" } else { "새 카테고리" };
        render_text_line(frame, chunks[1], &editor.name, field_block(title, true, &theme), true);
    }
}

// ---- popups ------------------------------------------------------------------

fn draw_import_prompt(frame: &mut Frame, app: &App) {
    let Some(prompt) = app.import_prompt.as_ref() else {
        return;
    };
    let size = frame.size();
    let area = get_popup_area(size.width, size.height, 70, 30);
    let block = Block::default()
        .title("가져오기 (CSV / JSON)")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.main));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);
    frame.render_widget(
        Paragraph::new("열: date,category,amount,memo,type\n카테고리가 없거나 금액이 0인 행은 건너뜁니다.")
            .style(Style::default().fg(Color::Gray)),
        chunks[0],
    );
    render_text_line(
        frame,
        chunks[1],
        prompt,
        Block::default().title("파일 경로").borders(Borders::ALL),
        true,
    );
    frame.render_widget(
        Paragraph::new("Enter 가져오기 · Esc 취소")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray).italic()),
        chunks[2],
    );
}

fn draw_confirm_popup(frame: &mut Frame, app: &mut App) {
    let Some(confirm) = app.confirm.as_ref() else {
        return;
    };
    let size = frame.size();
    let area = get_popup_area(size.width, size.height, 60, 30);
    let block = Block::default()
        .title("확인")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Yellow).bg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(3)])
        .split(inner);
    frame.render_widget(
        Paragraph::new(confirm.message.as_str())
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White)),
        chunks[0],
    );
    let btns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_button(frame, "삭제 (y)", btns[0], Color::Red);
    render_button(frame, "취소 (n)", btns[1], Color::Gray);
    app.confirm_btns = (btns[0], btns[1]);
}

fn draw_validation_error_popup(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let area = get_popup_area(size.width, size.height, 70, 38);

    let block = Block::default()
        .title("[!] 확인해주세요")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Red).bg(Color::Black));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let para = Paragraph::new(app.validation_error_message.as_str())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    frame.render_widget(para, chunks[0]);

    let hint = Paragraph::new("Esc 닫기")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray).italic());
    frame.render_widget(hint, chunks[1]);
}

fn draw_success_popup(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let area = get_popup_area(size.width, size.height, 55, 28);

    let block = Block::default()
        .title("[OK] 완료")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Green).bg(Color::Black));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(inner);

    let para = Paragraph::new(app.success_message.as_str())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White));
    frame.render_widget(para, chunks[0]);

    let hint = Paragraph::new("Esc 닫기")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray).italic());
    frame.render_widget(hint, chunks[1]);
}
