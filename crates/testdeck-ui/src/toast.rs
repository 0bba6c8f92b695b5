//! Transient toast notifications.

use std::str::FromStr;
use std::time::{Duration, Instant};

use strum::EnumString;
use tracing::debug;

use crate::markup::{escape, icon};
use crate::page::{Document, Element};

/// Id of the container all toasts are appended to.
pub const TOAST_CONTAINER_ID: &str = "toast-container";

/// How long a toast stays on the page.
pub const TOAST_LIFETIME: Duration = Duration::from_millis(3000);

/// Visual flavour of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl ToastKind {
    /// Parse a kind tag; anything unknown is [`ToastKind::Info`].
    pub fn from_tag(tag: &str) -> Self {
        ToastKind::from_str(tag).unwrap_or_default()
    }

    pub fn bg_class(self) -> &'static str {
        match self {
            ToastKind::Success => "bg-success",
            ToastKind::Error => "bg-danger",
            ToastKind::Warning => "bg-warning",
            ToastKind::Info => "bg-info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "bi-check-circle",
            ToastKind::Error => "bi-exclamation-circle",
            ToastKind::Warning => "bi-exclamation-triangle",
            ToastKind::Info => "bi-info-circle",
        }
    }
}

/// Build the toast element with the given id.
pub fn toast_element(id: &str, message: &str, kind: ToastKind) -> Element {
    let body = format!(
        concat!(
            r#"<div class="d-flex">"#,
            r#"<div class="toast-body">{} {}</div>"#,
            r#"<button type="button" class="btn-close btn-close-white me-2 m-auto" data-bs-dismiss="toast"></button>"#,
            "</div>"
        ),
        icon(kind.icon(), ""),
        escape(message)
    );
    Element::div(id)
        .with_class(format!(
            "toast align-items-center text-white {} border-0",
            kind.bg_class()
        ))
        .with_attr("role", "alert")
        .with_html(body)
}

#[derive(Debug, Clone)]
struct ActiveToast {
    id: String,
    expires_at: Instant,
}

/// Shows toasts and removes them once their lifetime has elapsed.
///
/// The host calls [`Toaster::sweep`] from its own timer; nothing here spawns.
#[derive(Debug, Default)]
pub struct Toaster {
    active: Vec<ActiveToast>,
    seq: u64,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast now. Returns its element id.
    pub fn show<D: Document + ?Sized>(&mut self, doc: &mut D, message: &str, kind: ToastKind) -> String {
        self.show_at(doc, message, kind, Instant::now())
    }

    /// Show a toast as of `now`. Creates `#toast-container` on demand.
    pub fn show_at<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        message: &str,
        kind: ToastKind,
        now: Instant,
    ) -> String {
        let id = self.next_id();

        if !doc.contains(TOAST_CONTAINER_ID) {
            doc.append_to_body(Element::div(TOAST_CONTAINER_ID).with_class("toast-container"));
        }
        if let Some(container) = doc.element_mut(TOAST_CONTAINER_ID) {
            container.append_child(toast_element(&id, message, kind));
        }

        self.active.push(ActiveToast {
            id: id.clone(),
            expires_at: now + TOAST_LIFETIME,
        });
        id
    }

    /// Remove every toast whose lifetime ended at or before `now`. Returns
    /// how many were removed.
    pub fn sweep<D: Document + ?Sized>(&mut self, doc: &mut D, now: Instant) -> usize {
        let (expired, alive): (Vec<_>, Vec<_>) =
            self.active.drain(..).partition(|t| t.expires_at <= now);
        self.active = alive;

        if let Some(container) = doc.element_mut(TOAST_CONTAINER_ID) {
            for toast in &expired {
                if container.remove_child(&toast.id).is_none() {
                    debug!(id = %toast.id, "toast already gone");
                }
            }
        }
        expired.len()
    }

    pub fn active(&self) -> usize {
        self.active.len()
    }

    fn next_id(&mut self) -> String {
        let base = format!("toast-{}", chrono::Utc::now().timestamp_millis());
        if self.active.iter().any(|t| t.id == base) {
            self.seq += 1;
            format!("{base}-{}", self.seq)
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    #[test]
    fn kind_tags_fall_back_to_info() {
        assert_eq!(ToastKind::from_tag("success"), ToastKind::Success);
        assert_eq!(ToastKind::from_tag("error"), ToastKind::Error);
        assert_eq!(ToastKind::from_tag("loud"), ToastKind::Info);
        assert_eq!(ToastKind::from_tag("loud").bg_class(), "bg-info");
        assert_eq!(ToastKind::Warning.icon(), "bi-exclamation-triangle");
    }

    #[test]
    fn container_is_created_on_demand() {
        let mut page = Page::new();
        let mut toaster = Toaster::new();

        let id = toaster.show(&mut page, "已保存", ToastKind::Success);

        let container = page.element(TOAST_CONTAINER_ID).unwrap();
        assert_eq!(container.class, "toast-container");
        let toast = container.find(&id).unwrap();
        assert!(toast.class.contains("bg-success"));
        assert!(toast.inner_html.contains("bi-check-circle"));
        assert!(toast.inner_html.contains("已保存"));
        assert!(id.starts_with("toast-"));
    }

    #[test]
    fn existing_container_is_reused() {
        let mut page = Page::new()
            .with(Element::div(TOAST_CONTAINER_ID).with_class("toast-container custom"));
        let mut toaster = Toaster::new();

        toaster.show(&mut page, "one", ToastKind::Info);
        toaster.show(&mut page, "two", ToastKind::Info);

        assert_eq!(page.body().children.len(), 1);
        let container = page.element(TOAST_CONTAINER_ID).unwrap();
        assert_eq!(container.class, "toast-container custom");
        assert_eq!(container.children.len(), 2);
        assert_ne!(container.children[0].id, container.children[1].id);
    }

    #[test]
    fn message_is_escaped() {
        let mut page = Page::new();
        let id = Toaster::new().show(&mut page, "<img src=x>", ToastKind::Error);
        let html = &page.element(&id).unwrap().inner_html;
        assert!(html.contains("&lt;img src=x&gt;"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let mut page = Page::new();
        let mut toaster = Toaster::new();
        let t0 = Instant::now();

        let first = toaster.show_at(&mut page, "first", ToastKind::Info, t0);
        let second =
            toaster.show_at(&mut page, "second", ToastKind::Info, t0 + Duration::from_secs(2));

        assert_eq!(toaster.sweep(&mut page, t0 + Duration::from_millis(2999)), 0);
        assert_eq!(toaster.sweep(&mut page, t0 + TOAST_LIFETIME), 1);
        assert!(!page.contains(&first));
        assert!(page.contains(&second));
        assert_eq!(toaster.active(), 1);

        assert_eq!(toaster.sweep(&mut page, t0 + Duration::from_secs(10)), 1);
        assert!(!page.contains(&second));
        assert_eq!(toaster.active(), 0);
    }
}
