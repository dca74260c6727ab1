//! Fetched documents and the tree helpers shared by the recovery chains.
//!
//! A [`Document`] is owned by exactly one extraction call. It keeps the raw
//! markup, the parsed tree, and the page-level `<meta>` key/value pairs.

use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::{debug, warn};

static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[content]").expect("static selector"));

/// Attributes that name a `<meta>` tag, in lookup order.
const META_KEY_ATTRS: [&str; 4] = ["property", "name", "itemprop", "http-equiv"];

/// Elements whose text is never visible on the page.
const INVISIBLE: [&str; 4] = ["script", "style", "noscript", "template"];

/// A fetched page.
#[derive(Debug)]
pub struct Document {
    /// The markup as returned by the server.
    pub raw: String,
    /// The parsed tree.
    pub tree: Html,
    /// Page metadata from `<meta>` tags. The first occurrence of a key wins.
    pub meta: HashMap<String, String>,
}

impl Document {
    /// Parse raw markup and collect its metadata.
    pub fn parse(raw: String) -> Self {
        let tree = Html::parse_document(&raw);
        let meta = collect_meta(&tree);
        debug!(meta_tags = meta.len(), bytes = raw.len(), "Parsed document");
        Self { raw, tree, meta }
    }

    /// Look up a metadata value by tag name.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }
}

fn collect_meta(tree: &Html) -> HashMap<String, String> {
    let mut meta = HashMap::new();
    for element in tree.select(&META_SELECTOR) {
        let attrs = element.value();
        let Some(content) = attrs.attr("content") else {
            continue;
        };
        let key = META_KEY_ATTRS.iter().find_map(|name| attrs.attr(name));
        if let Some(key) = key {
            meta.entry(key.trim().to_string())
                .or_insert_with(|| content.trim().to_string());
        }
    }
    meta
}

/// Visible text of an element with whitespace collapsed.
///
/// Text inside `script`, `style`, `noscript` and `template` descendants is skipped.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let raw: String = element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|a| a.id() != element.id())
                .filter_map(ElementRef::wrap)
                .any(|a| INVISIBLE.contains(&a.value().name()));
            (!hidden).then_some(&**text)
        })
        .collect();
    collapse_whitespace(&raw)
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// A copy of `tree` with every element matching one of `tags` detached.
pub fn strip_elements(tree: &Html, tags: &[&str]) -> Html {
    let mut cleaned = tree.clone();
    let selector = match Selector::parse(&tags.join(", ")) {
        Ok(selector) => selector,
        Err(e) => {
            warn!(?tags, error = %e, "Invalid strip selector; leaving tree untouched");
            return cleaned;
        }
    };

    let ids: Vec<_> = tree.select(&selector).map(|element| element.id()).collect();
    for id in ids {
        if let Some(mut node) = cleaned.tree.get_mut(id) {
            node.detach();
        }
    }
    cleaned
}

/// Whether any ancestor of `element` is one of `tags`.
pub fn has_ancestor(element: ElementRef<'_>, tags: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| tags.contains(&a.value().name()))
}
