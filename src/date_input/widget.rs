// ============================================================================
// DATE INPUT RENDERING
// ============================================================================

use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph,
        block::{Position, Title},
    },
};
use unicode_width::UnicodeWidthStr;

use super::calendar::{
    CellEmphasis, DayCell, GRID_COLUMNS, MONTH_GRID_COLUMNS, WEEKDAY_LABELS, build_day_grid,
    build_month_grid,
};
use super::{CellTarget, DateInput, DateMode};
use crate::theme::Theme;

const DAY_CELL_WIDTH: u16 = 4;
const MONTH_CELL_WIDTH: u16 = 7;
const NAV_WIDTH: u16 = 2;

fn placeholder(mode: DateMode) -> &'static str {
    match mode {
        DateMode::Day => "YYYY년MM월DD일",
        DateMode::Month => "YYYY년MM월",
    }
}

fn emphasis_style(emphasis: CellEmphasis, theme: &Theme, base: Style) -> Style {
    match emphasis {
        CellEmphasis::Selected => Style::default()
            .bg(theme.main)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
        CellEmphasis::Today => Style::default()
            .fg(theme.main)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        CellEmphasis::Plain => base,
    }
}

impl DateInput {
    pub fn render_field(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        label: &str,
        focused: bool,
    ) {
        self.field_area = area;

        let border = if focused || self.is_open() {
            Style::default().fg(theme.main)
        } else {
            Style::default().fg(theme.muted)
        };
        let text = if self.buffer.is_empty() {
            Line::from(Span::styled(
                placeholder(self.mode()),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(self.display())
        };
        let hint = if self.is_open() { " ▲ " } else { " ▼ " };

        let field = Paragraph::new(text).block(
            Block::default()
                .title(label.to_string())
                .title(
                    Title::from(hint)
                        .position(Position::Bottom)
                        .alignment(Alignment::Right),
                )
                .borders(Borders::ALL)
                .border_style(border),
        );
        frame.render_widget(field, area);

        if focused && !self.is_open() && area.width > 2 && area.height > 2 {
            let column = area.x + 1 + self.buffer.caret_column().min(area.width - 3);
            frame.set_cursor(column, area.y + 1);
        }
    }

    fn popover_size(&self, today: NaiveDate) -> (u16, u16) {
        match self.mode() {
            DateMode::Day => {
                let rows = build_day_grid(self.view, "", today).row_count() as u16;
                (GRID_COLUMNS as u16 * DAY_CELL_WIDTH + 2, rows + 4)
            }
            DateMode::Month => {
                let rows = (12 / MONTH_GRID_COLUMNS) as u16;
                (MONTH_GRID_COLUMNS as u16 * MONTH_CELL_WIDTH + 2, rows + 3)
            }
        }
    }

    /// Draws the calendar over everything else. Must run after the rest of the
    /// frame so the popover sits on top.
    pub fn render_popover(&mut self, frame: &mut Frame, theme: &Theme, today: NaiveDate) {
        if !self.is_open() {
            return;
        }
        let size = self.popover_size(today);
        let Some(area) = self.popover.measure(size, frame.size()) else {
            return;
        };

        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.main))
            .style(Style::default().bg(Color::Black));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width < NAV_WIDTH * 2 || inner.height < 2 {
            return;
        }

        self.hit_rects.clear();
        let mut lines = vec![self.header_line(inner, theme)];
        match self.mode() {
            DateMode::Day => self.day_lines(inner, theme, today, &mut lines),
            DateMode::Month => self.month_lines(inner, theme, today, &mut lines),
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn header_line(&mut self, inner: Rect, theme: &Theme) -> Line<'static> {
        let title = match self.mode() {
            DateMode::Day => self.view.title(),
            DateMode::Month => format!("{}년", self.view.year),
        };
        let free = inner.width.saturating_sub(NAV_WIDTH * 2) as usize;
        let title_width = title.width().min(free);
        let left_pad = (free - title_width) / 2;
        let right_pad = free - title_width - left_pad;

        self.hit_rects.push((
            CellTarget::Prev,
            Rect { x: inner.x, y: inner.y, width: NAV_WIDTH, height: 1 },
        ));
        self.hit_rects.push((
            CellTarget::Next,
            Rect { x: inner.right() - NAV_WIDTH, y: inner.y, width: NAV_WIDTH, height: 1 },
        ));

        let nav = Style::default().fg(theme.main);
        Line::from(vec![
            Span::styled("◄ ", nav),
            Span::raw(" ".repeat(left_pad)),
            Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(right_pad)),
            Span::styled(" ►", nav),
        ])
    }

    fn day_lines(&mut self, inner: Rect, theme: &Theme, today: NaiveDate, lines: &mut Vec<Line<'static>>) {
        let weekday_spans = WEEKDAY_LABELS
            .iter()
            .enumerate()
            .map(|(col, label)| {
                let style = match col {
                    0 => Style::default().fg(theme.expense),
                    6 => Style::default().fg(theme.income),
                    _ => Style::default().fg(theme.muted),
                };
                Span::styled(format!(" {label} "), style)
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(weekday_spans));

        let value = self.value();
        let grid = build_day_grid(self.view, &value, today);
        for (row_idx, row) in grid.rows().enumerate() {
            let y = inner.y + 2 + row_idx as u16;
            let mut spans = Vec::with_capacity(GRID_COLUMNS);
            for (col, cell) in row.iter().enumerate() {
                let DayCell::Day { day, .. } = *cell else {
                    spans.push(Span::raw("    "));
                    continue;
                };
                let base = match col {
                    0 => Style::default().fg(theme.expense),
                    6 => Style::default().fg(theme.income),
                    _ => Style::default(),
                };
                spans.push(Span::styled(
                    format!(" {day:2} "),
                    emphasis_style(cell.emphasis(), theme, base),
                ));
                if y < inner.bottom() {
                    self.hit_rects.push((
                        CellTarget::Day(day),
                        Rect {
                            x: inner.x + col as u16 * DAY_CELL_WIDTH,
                            y,
                            width: DAY_CELL_WIDTH,
                            height: 1,
                        },
                    ));
                }
            }
            lines.push(Line::from(spans));
        }
    }

    fn month_lines(&mut self, inner: Rect, theme: &Theme, today: NaiveDate, lines: &mut Vec<Line<'static>>) {
        let value = self.value();
        let cells = build_month_grid(self.view, &value, today);
        for (row_idx, row) in cells.chunks(MONTH_GRID_COLUMNS).enumerate() {
            let y = inner.y + 1 + row_idx as u16;
            let mut spans = Vec::with_capacity(MONTH_GRID_COLUMNS);
            for (col, cell) in row.iter().enumerate() {
                spans.push(Span::styled(
                    format!(" {:>3}월 ", cell.month),
                    emphasis_style(cell.emphasis(), theme, Style::default()),
                ));
                if y < inner.bottom() {
                    self.hit_rects.push((
                        CellTarget::Month(cell.month),
                        Rect {
                            x: inner.x + col as u16 * MONTH_CELL_WIDTH,
                            y,
                            width: MONTH_CELL_WIDTH,
                            height: 1,
                        },
                    ));
                }
            }
            lines.push(Line::from(spans));
        }
    }
}
