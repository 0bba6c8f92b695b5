//! One-time activation of tooltip and popover triggers.

use crate::page::{Document, Element};

const TOGGLE_ATTR: &str = "data-bs-toggle";
const ACTIVE_ATTR: &str = "data-testdeck-active";

/// How many triggers [`init_page`] activated on this call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInit {
    pub tooltips: usize,
    pub popovers: usize,
}

/// Activate every `data-bs-toggle="tooltip"` and `"popover"` element not yet
/// activated. Calling it again only picks up newly added triggers.
pub fn init_page<D: Document + ?Sized>(doc: &mut D) -> PageInit {
    PageInit {
        tooltips: activate(doc, "tooltip"),
        popovers: activate(doc, "popover"),
    }
}

/// Whether `el` has been activated by [`init_page`].
pub fn is_active(el: &Element) -> bool {
    el.attr(ACTIVE_ATTR).is_some()
}

fn activate<D: Document + ?Sized>(doc: &mut D, kind: &str) -> usize {
    let mut count = 0;
    doc.for_each_with_attr(TOGGLE_ATTR, kind, &mut |el: &mut Element| {
        if !is_active(el) {
            el.attrs.insert(ACTIVE_ATTR.to_owned(), kind.to_owned());
            count += 1;
        }
    });
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    fn page() -> Page {
        Page::new()
            .with(Element::new("button").with_id("a").with_attr(TOGGLE_ATTR, "tooltip"))
            .with(Element::new("button").with_id("b").with_attr(TOGGLE_ATTR, "tooltip"))
            .with(Element::new("span").with_id("c").with_attr(TOGGLE_ATTR, "popover"))
            .with(Element::new("a").with_id("d").with_attr(TOGGLE_ATTR, "dropdown"))
    }

    #[test]
    fn activates_tooltips_and_popovers() {
        let mut page = page();
        assert_eq!(
            init_page(&mut page),
            PageInit {
                tooltips: 2,
                popovers: 1
            }
        );
        assert!(is_active(page.element("a").unwrap()));
        assert!(is_active(page.element("c").unwrap()));
        assert!(!is_active(page.element("d").unwrap()));
    }

    #[test]
    fn second_call_is_idempotent() {
        let mut page = page();
        init_page(&mut page);
        assert_eq!(init_page(&mut page), PageInit::default());

        page.append_to_body(Element::new("i").with_id("e").with_attr(TOGGLE_ATTR, "popover"));
        assert_eq!(
            init_page(&mut page),
            PageInit {
                tooltips: 0,
                popovers: 1
            }
        );
    }
}
