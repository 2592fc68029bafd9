use crate::config::LabelTemplates;

const COUNT_PLACEHOLDER: &str = "%d";

/// Picks the toggle label for `checked` of `total` boxes and fills in the
/// count. Only the first `%d` is substituted.
pub fn render_label(templates: &LabelTemplates, checked: usize, total: usize) -> String {
    let template = match checked {
        0 => &templates.none,
        1 => &templates.single,
        n if n == total => &templates.all,
        _ => &templates.plural,
    };
    template.replacen(COUNT_PLACEHOLDER, &checked.to_string(), 1)
}
