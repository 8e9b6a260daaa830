//! Host pages that widgets are applied to.

use scraper::{Html, Selector};

/// A page holding zero or more widget containers, addressed by element id.
pub trait HostDocument {
    /// Whether an element with this id exists.
    fn has_container(&self, id: &str) -> bool;

    /// Replace every child of the container with `markup`.
    ///
    /// Returns `false` without touching the document when the container is absent.
    fn replace_contents(&mut self, id: &str, markup: &str) -> bool;
}

/// An HTML page parsed into a mutable tree.
pub struct HtmlDocument {
    html: Html,
}

fn container_selector(id: &str) -> Option<Selector> {
    let escaped = id.replace('\\', "\\\\").replace('"', "\\\"");
    Selector::parse(&format!("[id=\"{}\"]", escaped)).ok()
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Serialize the whole page.
    pub fn to_html(&self) -> String {
        self.html.html()
    }

    /// Inner markup of a container, if present.
    pub fn container_html(&self, id: &str) -> Option<String> {
        let selector = container_selector(id)?;
        self.html.select(&selector).next().map(|el| el.inner_html())
    }
}

impl HostDocument for HtmlDocument {
    fn has_container(&self, id: &str) -> bool {
        container_selector(id)
            .is_some_and(|selector| self.html.select(&selector).next().is_some())
    }

    fn replace_contents(&mut self, id: &str, markup: &str) -> bool {
        let Some(selector) = container_selector(id) else {
            return false;
        };
        let Some(target) = self.html.select(&selector).next().map(|el| el.id()) else {
            return false;
        };

        {
            let Some(mut container) = self.html.tree.get_mut(target) else {
                return false;
            };
            while let Some(mut child) = container.first_child() {
                child.detach();
            }
        }

        // Copy the fragment's nodes in document order, tracking the open parent
        // at each depth below the container.
        let fragment = Html::parse_fragment(markup);
        let root = fragment.root_element();
        let root_depth = root.ancestors().count();
        let mut parents = vec![target];

        for node in root.descendants().skip(1) {
            let level = node.ancestors().count() - root_depth - 1;
            parents.truncate(level + 1);
            let Some(mut parent) = self.html.tree.get_mut(parents[level]) else {
                return false;
            };
            let appended = parent.append(node.value().clone()).id();
            parents.push(appended);
        }

        true
    }
}
