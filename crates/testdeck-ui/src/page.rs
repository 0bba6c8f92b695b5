//! Minimal document model the rendering helpers write into.
//!
//! Helpers only need four things from a host page: find an element by id,
//! append an element to the body, walk elements carrying an attribute, and
//! replace an element's content. [`Document`] captures exactly that, and
//! [`Page`] is the in-memory implementation used by the CLI and the tests.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::markup::escape;

/// One element of the page tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub class: String,
    pub attrs: BTreeMap<String, String>,
    /// Raw markup content, rendered before `children`.
    pub inner_html: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// A `<div>` with the given id.
    pub fn div(id: impl Into<String>) -> Self {
        Self::new("div").with_id(id)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.inner_html = html.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Replace the element's whole content.
    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
        self.children.clear();
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Remove the direct child with the given id.
    pub fn remove_child(&mut self, id: &str) -> Option<Element> {
        let pos = self
            .children
            .iter()
            .position(|c| c.id.as_deref() == Some(id))?;
        Some(self.children.remove(pos))
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn visit_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Serialise the element and its subtree.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, r#" id="{}""#, escape(id));
        }
        if !self.class.is_empty() {
            let _ = write!(out, r#" class="{}""#, escape(&self.class));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, r#" {}="{}""#, name, escape(value));
        }
        out.push('>');
        out.push_str(&self.inner_html);
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// The operations rendering helpers need from a host document.
pub trait Document {
    fn element(&self, id: &str) -> Option<&Element>;

    fn element_mut(&mut self, id: &str) -> Option<&mut Element>;

    fn append_to_body(&mut self, element: Element);

    /// Call `f` on every element whose attribute `name` equals `value`.
    fn for_each_with_attr(&mut self, name: &str, value: &str, f: &mut dyn FnMut(&mut Element));

    fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }
}

/// In-memory page: a `<body>` and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    body: Element,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            body: Element::new("body"),
        }
    }

    /// Builder-style [`Document::append_to_body`].
    pub fn with(mut self, element: Element) -> Self {
        self.body.append_child(element);
        self
    }

    pub fn body(&self) -> &Element {
        &self.body
    }

    /// Content of the element with the given id, if present.
    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.element(id).map(|e| e.inner_html.as_str())
    }

    pub fn to_html(&self) -> String {
        self.body.outer_html()
    }
}

impl Document for Page {
    fn element(&self, id: &str) -> Option<&Element> {
        self.body.find(id)
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.find_mut(id)
    }

    fn append_to_body(&mut self, element: Element) {
        self.body.append_child(element);
    }

    fn for_each_with_attr(&mut self, name: &str, value: &str, f: &mut dyn FnMut(&mut Element)) {
        self.body.visit_mut(&mut |el: &mut Element| {
            if el.attr(name) == Some(value) {
                f(el);
            }
        });
    }
}
