/// Fills placeholders in `template`.
///
/// Each `(placeholder, value)` pair replaces the first occurrence of its
/// placeholder; unknown placeholders are left alone.
pub fn render(template: &str, data: &[(&str, &str)]) -> String {
    data.iter()
        .fold(template.to_string(), |page, (placeholder, value)| {
            page.replacen(placeholder, value, 1)
        })
}

#[cfg(test)]
mod tests {
    use super::render;

    #[test]
    fn replaces_first_occurrence_only() {
        let page = render("<h1>__NAME__</h1><p>__NAME__</p>", &[("__NAME__", "ana")]);
        assert_eq!(page, "<h1>ana</h1><p>__NAME__</p>");
    }

    #[test]
    fn missing_placeholder_is_a_no_op() {
        assert_eq!(render("plain", &[("__X__", "y")]), "plain");
    }
}
