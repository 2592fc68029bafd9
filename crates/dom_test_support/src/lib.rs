pub mod form_fixture;

pub use form_fixture::{FormFixture, Selection, load_form_fixture};

/// Reads an expected snapshot: one line per entry, `#` comment lines and
/// trailing blank lines dropped.
pub fn parse_expected_lines(source: &str) -> Vec<String> {
    let mut lines: Vec<String> = source
        .lines()
        .filter(|line| !line.starts_with('#') || line.starts_with("#document"))
        .map(str::to_string)
        .collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Human-readable report of the first differing line with two lines of
/// context on either side.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;

    const MISSING: &str = "<missing>";
    let max = expected.len().max(actual.len());
    let line: for<'a> fn(&'a [String], usize) -> &'a str =
        |side, i| side.get(i).map(String::as_str).unwrap_or(MISSING);
    let mismatch = (0..max).find(|i| line(expected, *i) != line(actual, *i));

    let mut out = String::new();
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for idx in start..end {
            let marker = if idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {}", idx + 1, line(expected, idx));
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {}", idx + 1, line(actual, idx));
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Panics with a line diff when the two snapshots differ.
pub fn assert_lines_eq(expected: &[String], actual: &[String], context: &str) {
    if expected != actual {
        panic!("{context}: snapshot mismatch\n{}", diff_lines(expected, actual));
    }
}
