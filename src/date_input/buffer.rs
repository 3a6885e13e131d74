// ============================================================================
// DIGIT BUFFER & FORMATTER
// ============================================================================
//
// The buffer only ever holds the digits the user typed. The localized display
// string, the normalized `YYYY[-MM[-DD]]` value and the caret offset are all
// derived from it on demand.

use unicode_width::UnicodeWidthStr;

const YEAR_DIGITS: usize = 4;
const MONTH_END: usize = 6;

const YEAR_SUFFIX: &str = "년";
const MONTH_SUFFIX: &str = "월";
const DAY_SUFFIX: &str = "일";

// Caret offset (in chars of the display string) indexed by digit count.
// A segment's suffix appears as soon as its first digit is typed, so the caret
// sits right after the last digit and before that suffix.
const DAY_CURSOR: [usize; 9] = [0, 1, 2, 3, 4, 6, 7, 9, 10];
const MONTH_CURSOR: [usize; 7] = [0, 1, 2, 3, 4, 6, 7];

/// Granularity of a date field, fixed for the field's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateMode {
    #[default]
    Day,
    Month,
}

impl DateMode {
    pub fn max_digits(self) -> usize {
        match self {
            DateMode::Day => 8,
            DateMode::Month => MONTH_END,
        }
    }

    fn cursor_table(self) -> &'static [usize] {
        match self {
            DateMode::Day => &DAY_CURSOR,
            DateMode::Month => &MONTH_CURSOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: String,
    mode: DateMode,
}

impl DigitBuffer {
    pub fn new(mode: DateMode) -> Self {
        Self {
            digits: String::with_capacity(mode.max_digits()),
            mode,
        }
    }

    /// Builds a buffer from an external `YYYY`, `YYYY-MM` or `YYYY-MM-DD` value.
    pub fn from_value(value: &str, mode: DateMode) -> Self {
        let mut buffer = Self::new(mode);
        buffer.set_from_external(value);
        buffer
    }

    pub fn mode(&self) -> DateMode {
        self.mode
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() >= self.mode.max_digits()
    }

    /// Returns false when the character is not a digit or the buffer is full.
    pub fn append_digit(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.is_full() {
            return false;
        }
        self.digits.push(c);
        true
    }

    pub fn delete_last(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn set_from_external(&mut self, value: &str) {
        self.digits = value
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(self.mode.max_digits())
            .collect();
    }

    pub fn display(&self) -> String {
        let n = self.digits.len();
        if n <= YEAR_DIGITS {
            return self.digits.clone();
        }

        let mut out = String::with_capacity(n + 3 * DAY_SUFFIX.len());
        out.push_str(&self.digits[..YEAR_DIGITS]);
        out.push_str(YEAR_SUFFIX);
        out.push_str(&self.digits[YEAR_DIGITS..n.min(MONTH_END)]);
        out.push_str(MONTH_SUFFIX);
        if n > MONTH_END {
            out.push_str(&self.digits[MONTH_END..]);
            out.push_str(DAY_SUFFIX);
        }
        out
    }

    /// Machine-readable value handed to consumers. Below four digits the raw
    /// digits are returned so callers can tell "not yet a date" apart.
    pub fn normalized(&self) -> String {
        let n = self.digits.len();
        if n <= YEAR_DIGITS {
            return self.digits.clone();
        }

        let mut out = String::with_capacity(10);
        out.push_str(&self.digits[..YEAR_DIGITS]);
        out.push('-');
        out.push_str(&self.digits[YEAR_DIGITS..n.min(MONTH_END)]);
        if n > MONTH_END {
            out.push('-');
            out.push_str(&self.digits[MONTH_END..]);
        }
        out
    }

    /// Caret offset in chars of [`Self::display`].
    pub fn cursor(&self) -> usize {
        let table = self.mode.cursor_table();
        table[self.digits.len().min(table.len() - 1)]
    }

    /// Caret offset in terminal columns; Hangul suffixes are double width.
    pub fn caret_column(&self) -> u16 {
        let display = self.display();
        let prefix: String = display.chars().take(self.cursor()).collect();
        prefix.width() as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(digits: &str, mode: DateMode) -> DigitBuffer {
        let mut buffer = DigitBuffer::new(mode);
        for c in digits.chars() {
            buffer.append_digit(c);
        }
        buffer
    }

    #[test]
    fn day_mode_display_by_digit_count() {
        let expected = [
            "",
            "2",
            "20",
            "202",
            "2026",
            "2026년0월",
            "2026년02월",
            "2026년02월1일",
            "2026년02월15일",
        ];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(typed(&"20260215"[..n], DateMode::Day).display(), *want, "n = {n}");
        }
    }

    #[test]
    fn month_mode_caps_at_six_and_omits_day() {
        let buffer = typed("20260215", DateMode::Month);
        assert_eq!(buffer.digits(), "202602");
        assert_eq!(buffer.display(), "2026년02월");
        assert_eq!(buffer.normalized(), "2026-02");
    }

    #[test]
    fn normalized_is_prefix_of_final_value() {
        for full in ["20260215", "19991231", "00000000", "98765432"] {
            let complete = typed(full, DateMode::Day).normalized();
            let mut buffer = DigitBuffer::new(DateMode::Day);
            assert!(complete.starts_with(&buffer.normalized()));
            for c in full.chars() {
                buffer.append_digit(c);
                assert!(
                    complete.starts_with(&buffer.normalized()),
                    "{} is not a prefix of {}",
                    buffer.normalized(),
                    complete
                );
            }
            assert_eq!(complete.len(), 10);
        }
    }

    #[test]
    fn short_buffers_emit_raw_digits() {
        assert_eq!(typed("202", DateMode::Day).normalized(), "202");
        assert_eq!(typed("2026", DateMode::Day).normalized(), "2026");
        assert_eq!(typed("20261", DateMode::Day).normalized(), "2026-1");
    }

    #[test]
    fn delete_after_append_restores_buffer() {
        for prefix in ["", "2", "2026", "202602", "2026021"] {
            for d in '0'..='9' {
                let before = typed(prefix, DateMode::Day);
                let mut buffer = before.clone();
                assert!(buffer.append_digit(d));
                assert!(buffer.delete_last());
                assert_eq!(buffer, before);
            }
        }
    }

    #[test]
    fn append_past_cap_is_noop() {
        let mut day = typed("20260215", DateMode::Day);
        let display = day.display();
        assert!(!day.append_digit('9'));
        assert_eq!(day.len(), 8);
        assert_eq!(day.display(), display);

        let mut month = typed("202602", DateMode::Month);
        assert!(!month.append_digit('1'));
        assert_eq!(month.len(), 6);
        assert_eq!(month.display(), "2026년02월");
    }

    #[test]
    fn non_digits_are_ignored() {
        let mut buffer = typed("20", DateMode::Day);
        assert!(!buffer.append_digit('a'));
        assert!(!buffer.append_digit('-'));
        assert_eq!(buffer.digits(), "20");
    }

    #[test]
    fn external_value_replaces_buffer() {
        let mut buffer = typed("1999", DateMode::Day);
        buffer.set_from_external("2026-02-15");
        assert_eq!(buffer.display(), "2026년02월15일");
        assert_eq!(buffer.normalized(), "2026-02-15");

        buffer.set_from_external("");
        assert!(buffer.is_empty());

        let month = DigitBuffer::from_value("2026-02-15", DateMode::Month);
        assert_eq!(month.normalized(), "2026-02");
    }

    #[test]
    fn cursor_lands_after_last_digit() {
        let full = "20260215";
        for n in 0..=8 {
            let buffer = typed(&full[..n], DateMode::Day);
            let before_cursor: String = buffer.display().chars().take(buffer.cursor()).collect();
            let last_digit = before_cursor.chars().last();
            if n == 0 {
                assert_eq!(last_digit, None);
            } else {
                assert_eq!(last_digit, full.chars().nth(n - 1), "n = {n}");
            }
        }
    }

    #[test]
    fn caret_column_counts_wide_suffixes() {
        assert_eq!(typed("2026", DateMode::Day).caret_column(), 4);
        // "2026년0" -> 4 + 2 + 1
        assert_eq!(typed("20260", DateMode::Day).caret_column(), 7);
        // "2026년02월15" -> 4 + 2 + 2 + 2 + 2
        assert_eq!(typed("20260215", DateMode::Day).caret_column(), 12);
    }
}
