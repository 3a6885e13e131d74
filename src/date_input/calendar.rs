// ============================================================================
// VIEW CURSOR & CALENDAR GRID
// ============================================================================

use chrono::{Datelike, NaiveDate};

pub const WEEKDAY_LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
pub const GRID_COLUMNS: usize = 7;
pub const MONTH_GRID_COLUMNS: usize = 3;

/// The year/month the popover grid shows. Independent of the selected value:
/// only explicit navigation moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCursor {
    pub year: i32,
    pub month: u32,
}

impl ViewCursor {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Starts at the bound value when it parses, otherwise at `today`.
    pub fn from_value(value: &str, today: NaiveDate) -> Self {
        let mut cursor = Self::from_date(today);
        cursor.sync_from_value(value);
        cursor
    }

    /// Adopts the year (and month, if present) of `value`. Segments that do not
    /// parse leave the cursor untouched. Returns whether anything changed.
    pub fn sync_from_value(&mut self, value: &str) -> bool {
        let mut parts = value.split('-');
        let Some(year) = parts.next().and_then(parse_year) else {
            return false;
        };
        let month = parts.next().and_then(parse_month);

        let before = *self;
        self.year = year;
        if let Some(month) = month {
            self.month = month;
        }
        before != *self
    }

    pub fn prev_month(&mut self) {
        if self.month > 1 {
            self.month -= 1;
        } else {
            self.month = 12;
            self.year -= 1;
        }
    }

    pub fn next_month(&mut self) {
        if self.month < 12 {
            self.month += 1;
        } else {
            self.month = 1;
            self.year += 1;
        }
    }

    pub fn prev_year(&mut self) {
        self.year -= 1;
    }

    pub fn next_year(&mut self) {
        self.year += 1;
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn title(&self) -> String {
        format!("{}년 {}월", self.year, self.month)
    }
}

fn parse_year(segment: &str) -> Option<i32> {
    if segment.len() != 4 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn parse_month(segment: &str) -> Option<u32> {
    if segment.len() != 2 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok().filter(|m| (1..=12).contains(m))
}

/// Last valid day number of the month (the "day 0 of next month" rule).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    Blank,
    Day { day: u32, selected: bool, today: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEmphasis {
    Selected,
    Today,
    Plain,
}

impl DayCell {
    pub fn day(&self) -> Option<u32> {
        match self {
            DayCell::Blank => None,
            DayCell::Day { day, .. } => Some(*day),
        }
    }

    /// `selected` wins over `today` when both apply.
    pub fn emphasis(&self) -> CellEmphasis {
        match self {
            DayCell::Day { selected: true, .. } => CellEmphasis::Selected,
            DayCell::Day { today: true, .. } => CellEmphasis::Today,
            _ => CellEmphasis::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarGrid {
    pub view: ViewCursor,
    pub cells: Vec<DayCell>,
}

impl CalendarGrid {
    pub fn rows(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(GRID_COLUMNS)
    }

    pub fn row_count(&self) -> usize {
        self.cells.len().div_ceil(GRID_COLUMNS)
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| **c == DayCell::Blank).count()
    }
}

/// Leading blanks equal the weekday of the 1st (0 = Sunday); no trailing padding.
pub fn build_day_grid(view: ViewCursor, selected: &str, today: NaiveDate) -> CalendarGrid {
    let Some(first) = view.first_day() else {
        return CalendarGrid { view, cells: Vec::new() };
    };
    let selected = NaiveDate::parse_from_str(selected, "%Y-%m-%d").ok();
    let leading = first.weekday().num_days_from_sunday() as usize;
    let last = days_in_month(view.year, view.month);

    let mut cells = Vec::with_capacity(leading + last as usize);
    cells.extend(std::iter::repeat(DayCell::Blank).take(leading));
    for day in 1..=last {
        let date = NaiveDate::from_ymd_opt(view.year, view.month, day);
        cells.push(DayCell::Day {
            day,
            selected: date.is_some() && date == selected,
            today: date == Some(today),
        });
    }

    CalendarGrid { view, cells }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCell {
    pub month: u32,
    pub selected: bool,
    pub current: bool,
}

impl MonthCell {
    pub fn emphasis(&self) -> CellEmphasis {
        if self.selected {
            CellEmphasis::Selected
        } else if self.current {
            CellEmphasis::Today
        } else {
            CellEmphasis::Plain
        }
    }
}

pub fn build_month_grid(view: ViewCursor, selected: &str, today: NaiveDate) -> Vec<MonthCell> {
    let mut parts = selected.split('-');
    let selected_year = parts.next().and_then(parse_year);
    let selected_month = parts.next().and_then(parse_month);

    (1..=12)
        .map(|month| MonthCell {
            month,
            selected: selected_year == Some(view.year) && selected_month == Some(month),
            current: today.year() == view.year && today.month() == month,
        })
        .collect()
}
