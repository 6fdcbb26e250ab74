use std::sync::LazyLock;

use regex::Regex;

static EXAM_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{4})(?:-([0-9]{4}|[0-9]{2}))?$").expect("exam year pattern is valid")
});

/// A parsed exam year: the sortable starting year plus an optional display range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamYear {
    pub start: i32,
    pub academic_year: Option<String>,
}

/// Parse free-text exam year input.
///
/// Accepts `2024`, `2024-25` and `2024-2025`. En and em dashes count as
/// hyphens and whitespace is ignored. A two-digit end year borrows the start
/// year's century; an end year before the start becomes `start + 1`.
/// Returns `None` for anything else.
pub fn parse_exam_year(input: &str) -> Option<ExamYear> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => '-',
            other => other,
        })
        .collect();

    let caps = EXAM_YEAR.captures(&cleaned)?;
    let start: i32 = caps.get(1)?.as_str().parse().ok()?;

    let Some(end_part) = caps.get(2) else {
        return Some(ExamYear {
            start,
            academic_year: None,
        });
    };

    let digits: i32 = end_part.as_str().parse().ok()?;
    let mut end = if end_part.as_str().len() == 4 {
        digits
    } else {
        start / 100 * 100 + digits
    };
    if end < start {
        end = start + 1;
    }

    Some(ExamYear {
        start,
        academic_year: Some(format!("{start}-{end}")),
    })
}
