//! Date resolver: free-text statement dates against an ordered format table.
//!
//! Patterns use strptime-style directives:
//!   %d / %m   one or two digits
//!   %Y        exactly four digits
//!   %y        exactly two digits, windowed by `TWO_DIGIT_YEAR_PIVOT`
//!   %b        three-letter English month abbreviation (any case)
//!   %B        full English month name (any case)
//!   ' '       one or more whitespace characters
//!
//! The first format whose pattern matches the whole trimmed input *and*
//! yields a real calendar date wins. Ambiguous inputs such as `01/02/2025`
//! resolve through whichever layout comes first in `DATE_FORMATS`.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::trace;

use crate::types::ParsedDate;

/// Two-digit years below the pivot land in the 2000s, the rest in the 1900s.
pub const TWO_DIGIT_YEAR_PIVOT: i32 = 69;

/// (name, pattern) in priority order. Earlier entries win on overlap.
pub const DATE_FORMATS: &[(&str, &str)] = &[
    ("iso", "%Y-%m-%d"),
    ("us-slash", "%m/%d/%Y"),
    ("eu-slash", "%d/%m/%Y"),
    ("us-dash", "%m-%d-%Y"),
    ("eu-dash", "%d-%m-%Y"),
    ("ymd-slash", "%Y/%m/%d"),
    ("eu-dot", "%d.%m.%Y"),
    ("us-dot", "%m.%d.%Y"),
    ("dd-mon-yy", "%d-%b-%y"),
    ("dd-mon-yyyy", "%d-%b-%Y"),
    ("dd/mon/yyyy", "%d/%b/%Y"),
    ("dd-mon-yyyy-spaced", "%d %b %Y"),
    ("dd-mon-yy-spaced", "%d %b %y"),
    ("mon-dd-yyyy", "%b %d, %Y"),
    ("month-dd-yyyy", "%B %d, %Y"),
];

const MONTH_ABBR: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// One entry of the format table with its compiled matcher.
#[derive(Debug, Clone)]
pub struct DateFormat {
    name: &'static str,
    pattern: &'static str,
    matcher: Regex,
}

impl DateFormat {
    fn compile(name: &'static str, pattern: &'static str) -> Result<Self> {
        let matcher = Regex::new(&pattern_to_regex(pattern))
            .with_context(|| format!("compiling date format {name} ({pattern})"))?;
        Ok(Self { name, pattern, matcher })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// strptime-style layout, e.g. `%d-%b-%y`
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    /// Interpret `input` with this layout only.
    pub fn parse(&self, input: &str) -> Option<NaiveDate> {
        let caps = self.matcher.captures(input)?;
        // Calendar years start at 1; chrono alone would accept year 0.
        let year = year_of(&caps).filter(|y| *y >= 1)?;
        let month = month_of(&caps)?;
        let day: u32 = caps.name("day")?.as_str().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Render `date` in this layout.
    pub fn format(&self, date: NaiveDate) -> String {
        date.format(self.pattern).to_string()
    }
}

fn pattern_to_regex(pattern: &str) -> String {
    let mut re = String::from("^");
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '%' => match chars.next() {
                Some('d') => re.push_str(r"(?P<day>\d{1,2})"),
                Some('m') => re.push_str(r"(?P<month>\d{1,2})"),
                Some('Y') => re.push_str(r"(?P<year>\d{4})"),
                Some('y') => re.push_str(r"(?P<yy>\d{2})"),
                Some('b') => re.push_str(r"(?P<mon>[A-Za-z]{3})"),
                Some('B') => re.push_str(r"(?P<month_name>[A-Za-z]+)"),
                Some(other) => re.push_str(&regex::escape(&other.to_string())),
                None => re.push('%'),
            },
            ' ' => re.push_str(r"\s+"),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');
    re
}

fn year_of(caps: &Captures<'_>) -> Option<i32> {
    if let Some(y) = caps.name("year") {
        return y.as_str().parse().ok();
    }
    let yy: i32 = caps.name("yy")?.as_str().parse().ok()?;
    Some(window_two_digit_year(yy))
}

fn month_of(caps: &Captures<'_>) -> Option<u32> {
    if let Some(m) = caps.name("month") {
        return m.as_str().parse().ok();
    }
    if let Some(m) = caps.name("mon") {
        return month_index(&MONTH_ABBR, m.as_str());
    }
    month_index(&MONTH_NAMES, caps.name("month_name")?.as_str())
}

fn month_index(names: &[&str; 12], s: &str) -> Option<u32> {
    let s = s.to_ascii_lowercase();
    names
        .iter()
        .position(|name| *name == s)
        .map(|i| i as u32 + 1)
}

/// Map a two-digit year into a full year.
pub fn window_two_digit_year(yy: i32) -> i32 {
    if yy < TWO_DIGIT_YEAR_PIVOT { 2000 + yy } else { 1900 + yy }
}

/// Ordered, stateless date resolver.
#[derive(Debug, Clone)]
pub struct DateResolver {
    formats: Vec<DateFormat>,
}

impl DateResolver {
    pub fn new() -> Result<Self> {
        let formats = DATE_FORMATS
            .iter()
            .map(|(name, pattern)| DateFormat::compile(name, pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { formats })
    }

    pub fn formats(&self) -> &[DateFormat] {
        &self.formats
    }

    pub fn resolve(&self, raw: &str) -> ParsedDate {
        self.resolve_with_format(raw)
            .map(|(date, _)| date)
            .into()
    }

    /// Like `resolve`, also reporting which format won.
    pub fn resolve_with_format(&self, raw: &str) -> Option<(NaiveDate, &DateFormat)> {
        let input = raw.trim();
        let hit = self
            .formats
            .iter()
            .find_map(|f| f.parse(input).map(|date| (date, f)));
        if let Some((date, f)) = &hit {
            trace!(input, format = f.name(), %date, "resolved date");
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolver() -> DateResolver {
        DateResolver::new().unwrap()
    }

    #[test]
    fn test_reference_rows() {
        let r = resolver();
        assert_eq!(r.resolve("01-Jan-25"), ParsedDate::Resolved(ymd(2025, 1, 1)));
        assert_eq!(r.resolve("02-Jan-25"), ParsedDate::Resolved(ymd(2025, 1, 2)));
        let (_, f) = r.resolve_with_format("01-Jan-25").unwrap();
        assert_eq!(f.pattern(), "%d-%b-%y");
    }

    #[test]
    fn test_each_layout() {
        let r = resolver();
        let cases = [
            ("2025-03-14", "%Y-%m-%d"),
            ("03/14/2025", "%m/%d/%Y"),
            ("14/03/2025", "%d/%m/%Y"),
            ("03-14-2025", "%m-%d-%Y"),
            ("14-03-2025", "%d-%m-%Y"),
            ("2025/03/14", "%Y/%m/%d"),
            ("14.03.2025", "%d.%m.%Y"),
            ("14-Mar-25", "%d-%b-%y"),
            ("14-Mar-2025", "%d-%b-%Y"),
            ("14/Mar/2025", "%d/%b/%Y"),
            ("14 Mar 2025", "%d %b %Y"),
            ("14 Mar 25", "%d %b %y"),
            ("Mar 14, 2025", "%b %d, %Y"),
            ("March 14, 2025", "%B %d, %Y"),
        ];
        for (input, pattern) in cases {
            let (date, f) = r
                .resolve_with_format(input)
                .unwrap_or_else(|| panic!("{input} should resolve"));
            assert_eq!(date, ymd(2025, 3, 14), "{input}");
            assert_eq!(f.pattern(), pattern, "{input}");
        }
    }

    #[test]
    fn test_us_dot_reached_when_eu_dot_invalid() {
        let r = resolver();
        let (date, f) = r.resolve_with_format("03.14.2025").unwrap();
        assert_eq!(date, ymd(2025, 3, 14));
        assert_eq!(f.pattern(), "%m.%d.%Y");
    }

    #[test]
    fn test_ambiguous_input_takes_earlier_layout() {
        let r = resolver();
        for _ in 0..3 {
            assert_eq!(r.resolve("01/02/2025"), ParsedDate::Resolved(ymd(2025, 1, 2)));
            assert_eq!(r.resolve("01-02-2025"), ParsedDate::Resolved(ymd(2025, 1, 2)));
            assert_eq!(r.resolve("01.02.2025"), ParsedDate::Resolved(ymd(2025, 2, 1)));
        }
        // US layout is invalid for month 13, so EU takes over.
        assert_eq!(r.resolve("13/02/2025"), ParsedDate::Resolved(ymd(2025, 2, 13)));
    }

    #[test]
    fn test_two_digit_year_not_read_as_numeric() {
        let r = resolver();
        // Numeric layouts all need a four-digit year.
        assert_eq!(r.resolve("01-02-25"), ParsedDate::Unparseable);
        // Four-digit abbreviated form is not swallowed by %y.
        let (date, f) = r.resolve_with_format("01-Jan-2025").unwrap();
        assert_eq!(date, ymd(2025, 1, 1));
        assert_eq!(f.pattern(), "%d-%b-%Y");
    }

    #[test]
    fn test_two_digit_year_window() {
        assert_eq!(window_two_digit_year(0), 2000);
        assert_eq!(window_two_digit_year(25), 2025);
        assert_eq!(window_two_digit_year(68), 2068);
        assert_eq!(window_two_digit_year(69), 1969);
        assert_eq!(window_two_digit_year(99), 1999);
        let r = resolver();
        assert_eq!(r.resolve("31 Dec 99"), ParsedDate::Resolved(ymd(1999, 12, 31)));
    }

    #[test]
    fn test_trim_and_whitespace_rules() {
        let r = resolver();
        assert_eq!(r.resolve("  2025-01-05\t"), ParsedDate::Resolved(ymd(2025, 1, 5)));
        assert_eq!(r.resolve("05  Jan   2025"), ParsedDate::Resolved(ymd(2025, 1, 5)));
        assert_eq!(r.resolve("2025 -01-05"), ParsedDate::Unparseable);
    }

    #[test]
    fn test_month_names_any_case_single_digit_fields() {
        let r = resolver();
        assert_eq!(r.resolve("5-JAN-25"), ParsedDate::Resolved(ymd(2025, 1, 5)));
        assert_eq!(r.resolve("january 5, 2025"), ParsedDate::Resolved(ymd(2025, 1, 5)));
        assert_eq!(r.resolve("1/5/2025"), ParsedDate::Resolved(ymd(2025, 1, 5)));
        assert_eq!(r.resolve("Sept 5, 2025"), ParsedDate::Unparseable);
    }

    #[test]
    fn test_calendar_validity() {
        let r = resolver();
        assert_eq!(r.resolve("2024-02-29"), ParsedDate::Resolved(ymd(2024, 2, 29)));
        assert_eq!(r.resolve("2025-02-29"), ParsedDate::Unparseable);
        assert_eq!(r.resolve("2025-00-10"), ParsedDate::Unparseable);
        assert_eq!(r.resolve("31-Apr-25"), ParsedDate::Unparseable);
        assert_eq!(r.resolve("0000-01-05"), ParsedDate::Unparseable);
        assert_eq!(r.resolve("05-Jan-0000"), ParsedDate::Unparseable);
        assert_eq!(r.resolve("0001-01-05"), ParsedDate::Resolved(ymd(1, 1, 5)));
    }

    #[test]
    fn test_unparseable_inputs() {
        let r = resolver();
        for input in ["not-a-date", "", "   ", "2025-01", "01/02/2025 10:00", "Jan 2025", "20250101"] {
            assert_eq!(r.resolve(input), ParsedDate::Unparseable, "{input:?}");
        }
    }

    #[test]
    fn test_round_trip_per_format() {
        let r = resolver();
        // Day > 12 keeps every numeric layout unambiguous; years stay inside the %y window.
        let dates = [ymd(2025, 1, 13), ymd(2024, 2, 29), ymd(1999, 12, 31), ymd(2068, 7, 20)];
        for f in r.formats() {
            for &d in &dates {
                let text = f.format(d);
                assert_eq!(r.resolve(&text), ParsedDate::Resolved(d), "{} via {}", text, f.pattern());
            }
        }
    }
}
