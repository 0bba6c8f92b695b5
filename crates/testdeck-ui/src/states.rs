//! Loading, empty and error placeholders for content areas.
//!
//! Each renderer replaces the target's content and reports whether the
//! target existed. A missing target is a silent no-op.

use tracing::debug;

use crate::markup::{escape, icon};
use crate::page::Document;

/// Default icon for [`show_empty_state`].
pub const DEFAULT_EMPTY_ICON: &str = "inbox";

pub fn loading_html() -> String {
    concat!(
        r#"<div class="spinner-container">"#,
        r#"<div class="spinner-border text-primary" role="status">"#,
        r#"<span class="visually-hidden">加载中...</span>"#,
        "</div></div>"
    )
    .to_owned()
}

pub fn empty_state_html(message: &str, icon_name: Option<&str>) -> String {
    let name = format!("bi-{}", icon_name.unwrap_or(DEFAULT_EMPTY_ICON));
    format!(
        r#"<div class="empty-state">{}<p>{}</p></div>"#,
        icon(&name, ""),
        escape(message)
    )
}

pub fn error_html(message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger" role="alert">{} {}</div>"#,
        icon("bi-exclamation-triangle", ""),
        escape(message)
    )
}

fn replace<D: Document + ?Sized>(doc: &mut D, id: &str, html: String) -> bool {
    match doc.element_mut(id) {
        Some(el) => {
            el.set_inner_html(html);
            true
        }
        None => {
            debug!(id, "render target not found");
            false
        }
    }
}

/// Show a spinner in `id`.
pub fn show_loading<D: Document + ?Sized>(doc: &mut D, id: &str) -> bool {
    replace(doc, id, loading_html())
}

/// Show an empty-state notice in `id`. `icon_name` defaults to `inbox`.
pub fn show_empty_state<D: Document + ?Sized>(
    doc: &mut D,
    id: &str,
    message: &str,
    icon_name: Option<&str>,
) -> bool {
    replace(doc, id, empty_state_html(message, icon_name))
}

/// Show an error alert in `id`.
pub fn show_error<D: Document + ?Sized>(doc: &mut D, id: &str, message: &str) -> bool {
    replace(doc, id, error_html(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Element, Page};

    fn page() -> Page {
        Page::new().with(Element::div("cases").with_html("<table></table>"))
    }

    #[test]
    fn loading_replaces_content() {
        let mut page = page();
        assert!(show_loading(&mut page, "cases"));
        let html = page.inner_html("cases").unwrap();
        assert!(html.contains("spinner-border text-primary"));
        assert!(html.contains("加载中..."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn empty_state_uses_default_icon() {
        let mut page = page();
        assert!(show_empty_state(&mut page, "cases", "暂无数据", None));
        assert_eq!(
            page.inner_html("cases").unwrap(),
            r#"<div class="empty-state"><i class="bi bi-inbox"></i><p>暂无数据</p></div>"#
        );

        show_empty_state(&mut page, "cases", "暂无报告", Some("file-earmark"));
        assert!(page.inner_html("cases").unwrap().contains("bi-file-earmark"));
    }

    #[test]
    fn error_is_escaped() {
        let mut page = page();
        assert!(show_error(&mut page, "cases", "<b>boom</b>"));
        let html = page.inner_html("cases").unwrap();
        assert!(html.starts_with(r#"<div class="alert alert-danger" role="alert">"#));
        assert!(html.contains("bi-exclamation-triangle"));
        assert!(html.contains("&lt;b&gt;boom&lt;/b&gt;"));
    }

    #[test]
    fn missing_target_is_a_no_op() {
        let mut page = page();
        let before = page.clone();
        assert!(!show_loading(&mut page, "nope"));
        assert!(!show_empty_state(&mut page, "nope", "x", None));
        assert!(!show_error(&mut page, "nope", "x"));
        assert_eq!(page, before);
    }
}
