//! Small markup building blocks.

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A Bootstrap icon, e.g. `icon("bi-inbox", "")`.
pub fn icon(name: &str, extra_class: &str) -> String {
    if extra_class.is_empty() {
        format!(r#"<i class="bi {}"></i>"#, escape(name))
    } else {
        format!(r#"<i class="bi {} {}"></i>"#, escape(name), escape(extra_class))
    }
}

/// A `<span class="badge ...">` with the given background class and label.
pub fn badge(bg_class: &str, label: &str) -> String {
    format!(r#"<span class="badge {}">{}</span>"#, bg_class, escape(label))
}
