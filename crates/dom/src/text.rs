use memchr::memmem;

/// Case-insensitive substring test.
///
/// Both sides are lowercased with full Unicode case mapping before searching, so
/// `"RED"` is found in `"Red-Orange"`. An empty needle always matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.len() < needle.len() && haystack.is_ascii() && needle.is_ascii() {
        return false;
    }
    let hay = haystack.to_lowercase();
    let needle = needle.to_lowercase();
    memmem::find(hay.as_bytes(), needle.as_bytes()).is_some()
}

/// Collapses runs of whitespace to one space and trims the ends, roughly what
/// a rendered label reads as.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
