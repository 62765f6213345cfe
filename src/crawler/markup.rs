//! Narrow view over parsed HTML nodes
//!
//! The extractor and the pagination scan only need three capabilities from a
//! node: look up an attribute, find descendants matching a tag/class/attribute
//! predicate, and read the node's last text content. `MarkupNode` captures
//! exactly that, so the crawl logic can run against `scraper` elements or
//! against a hand-built tree in tests.

use crate::ExtractionError;
use scraper::{ElementRef, Selector};
use std::cell::RefCell;
use std::collections::HashMap;

/// How a query matches the `class` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassMatch {
    /// No constraint on classes
    Any,

    /// The whitespace-separated class list contains this token
    Token(&'static str),

    /// The raw `class` attribute equals this string exactly
    Exact(&'static str),
}

/// How a query matches an additional attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrMatch {
    /// The attribute is present, whatever its value
    Present(&'static str),

    /// The attribute is present with exactly this value
    Equals(&'static str, &'static str),
}

/// A tag + class + attribute predicate over descendant elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Query {
    tag: Option<&'static str>,
    class: ClassMatch,
    attr: Option<AttrMatch>,
}

impl Query {
    /// Matches any element carrying the given class token
    pub const fn class(token: &'static str) -> Self {
        Self {
            tag: None,
            class: ClassMatch::Token(token),
            attr: None,
        }
    }

    /// Matches elements whose `class` attribute is exactly `classes`
    pub const fn exact_class(classes: &'static str) -> Self {
        Self {
            tag: None,
            class: ClassMatch::Exact(classes),
            attr: None,
        }
    }

    /// Matches elements where `name` has exactly `value`
    pub const fn attr_equals(name: &'static str, value: &'static str) -> Self {
        Self {
            tag: None,
            class: ClassMatch::Any,
            attr: Some(AttrMatch::Equals(name, value)),
        }
    }

    /// Restricts the query to one tag name
    pub const fn tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Additionally requires the attribute `name` to be present
    pub const fn with_attr(mut self, name: &'static str) -> Self {
        self.attr = Some(AttrMatch::Present(name));
        self
    }

    /// Renders the query as a CSS selector
    pub fn to_css(&self) -> String {
        let mut css = self.tag.unwrap_or("*").to_string();

        match self.class {
            ClassMatch::Any => {}
            ClassMatch::Token(token) => {
                css.push('.');
                css.push_str(token);
            }
            ClassMatch::Exact(classes) => css.push_str(&format!("[class=\"{}\"]", classes)),
        }

        match self.attr {
            None => {}
            Some(AttrMatch::Present(name)) => css.push_str(&format!("[{}]", name)),
            Some(AttrMatch::Equals(name, value)) => {
                css.push_str(&format!("[{}=\"{}\"]", name, value))
            }
        }

        css
    }

    /// Evaluates the query against an element's tag name and attribute lookup
    pub fn matches<'a>(&self, tag: &str, attr: impl Fn(&str) -> Option<&'a str>) -> bool {
        if let Some(expected) = self.tag {
            if !tag.eq_ignore_ascii_case(expected) {
                return false;
            }
        }

        let class_ok = match self.class {
            ClassMatch::Any => true,
            ClassMatch::Token(token) => attr("class")
                .map(|classes| classes.split_whitespace().any(|c| c == token))
                .unwrap_or(false),
            ClassMatch::Exact(classes) => attr("class") == Some(classes),
        };
        if !class_ok {
            return false;
        }

        match self.attr {
            None => true,
            Some(AttrMatch::Present(name)) => attr(name).is_some(),
            Some(AttrMatch::Equals(name, value)) => attr(name) == Some(value),
        }
    }
}

/// Capabilities the crawler needs from a parsed HTML element
pub trait MarkupNode: Sized {
    /// Returns the value of attribute `name`, if present
    fn attr(&self, name: &str) -> Option<&str>;

    /// Returns the first descendant matching `query`, in document order
    fn find_first(&self, query: &Query) -> Option<Self>;

    /// Returns every descendant matching `query`, in document order
    fn find_all(&self, query: &Query) -> Vec<Self>;

    /// Returns the last non-blank text node inside this element, trimmed
    fn last_text(&self) -> Option<String>;

    /// Like `attr`, but a missing attribute is an extraction error
    fn required_attr(&self, name: &str) -> Result<&str, ExtractionError> {
        self.attr(name)
            .ok_or_else(|| ExtractionError::MissingAttribute {
                name: name.to_string(),
            })
    }
}

thread_local! {
    // Queries are a handful of constants; each is parsed once per thread
    static SELECTORS: RefCell<HashMap<Query, Option<Selector>>> = RefCell::new(HashMap::new());
}

fn compile(query: &Query) -> Option<Selector> {
    let css = query.to_css();
    let selector = Selector::parse(&css)
        .map_err(|e| tracing::warn!("Invalid selector {}: {:?}", css, e))
        .ok();
    selector
}

/// Runs `f` with the compiled selector for `query`, parsing it on first use
fn with_selector<T>(query: &Query, f: impl FnOnce(Option<&Selector>) -> T) -> T {
    SELECTORS.with(|cache| {
        let mut cache = cache.borrow_mut();
        let selector = cache.entry(*query).or_insert_with(|| compile(query));
        f(selector.as_ref())
    })
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn find_first(&self, query: &Query) -> Option<Self> {
        with_selector(query, |selector| selector.and_then(|s| self.select(s).next()))
    }

    fn find_all(&self, query: &Query) -> Vec<Self> {
        with_selector(query, |selector| match selector {
            Some(s) => self.select(s).collect(),
            None => Vec::new(),
        })
    }

    fn last_text(&self) -> Option<String> {
        self.text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .last()
            .map(str::to_string)
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeNode;
    use super::*;
    use scraper::Html;

    #[test]
    fn test_query_to_css() {
        assert_eq!(Query::class("seller-type").to_css(), "*.seller-type");
        assert_eq!(
            Query::exact_class("page-link next").tag("a").with_attr("href").to_css(),
            "a[class=\"page-link next\"][href]"
        );
        assert_eq!(
            Query::attr_equals("data-webm-clickvalue", "sv-title").to_css(),
            "*[data-webm-clickvalue=\"sv-title\"]"
        );
    }

    #[test]
    fn test_exact_class_does_not_match_superset() {
        let query = Query::exact_class("page-link next");
        assert!(query.matches("a", |n| (n == "class").then_some("page-link next")));
        assert!(!query.matches("a", |n| (n == "class").then_some("page-link next disabled")));
    }

    #[test]
    fn test_class_token_match() {
        let query = Query::class("seller-type");
        assert!(query.matches("span", |n| (n == "class").then_some("badge seller-type")));
        assert!(!query.matches("span", |n| (n == "class").then_some("seller-types")));
        assert!(!query.matches("span", |_| None));
    }

    #[test]
    fn test_tag_restriction() {
        let query = Query::class("next").tag("a");
        assert!(query.matches("A", |n| (n == "class").then_some("next")));
        assert!(!query.matches("span", |n| (n == "class").then_some("next")));
    }

    #[test]
    fn test_scraper_find_all_in_document_order() {
        let html = Html::parse_document(
            r#"<div><p class="x">one</p><span><p class="x">two</p></span><p class="x">three</p></div>"#,
        );
        let found = html.root_element().find_all(&Query::class("x").tag("p"));
        let texts: Vec<_> = found.iter().filter_map(|n| n.last_text()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_scraper_last_text_skips_blank_nodes() {
        let html = Html::parse_document(
            r#"<span class="seller-type"><i class="icon"></i> Particular
            </span>"#,
        );
        let node = html.root_element().find_first(&Query::class("seller-type")).unwrap();
        assert_eq!(node.last_text(), Some("Particular".to_string()));
    }

    #[test]
    fn test_selector_compiled_once_per_query() {
        let html = Html::parse_document(r#"<p class="once">a</p><p class="once">b</p>"#);
        let query = Query::class("once").tag("p");
        let root = html.root_element();

        assert_eq!(root.find_all(&query).len(), 2);
        assert!(root.find_first(&query).is_some());
        assert_eq!(root.find_all(&query).len(), 2);

        SELECTORS.with(|cache| {
            let cache = cache.borrow();
            assert!(matches!(cache.get(&query), Some(Some(_))));
            assert_eq!(cache.keys().filter(|q| **q == query).count(), 1);
        });
    }

    #[test]
    fn test_required_attr() {
        let node = FakeNode::new("div").with_attr("data-webm-make", "Kia");
        assert_eq!(node.required_attr("data-webm-make"), Ok("Kia"));
        assert_eq!(
            node.required_attr("data-webm-model"),
            Err(ExtractionError::MissingAttribute {
                name: "data-webm-model".to_string()
            })
        );
    }

    #[test]
    fn test_fake_tree_matches_scraper() {
        let fake = FakeNode::new("div").with_child(
            FakeNode::new("span")
                .with_attr("class", "seller-type")
                .with_text("Automotora"),
        );
        let html = Html::parse_document(r#"<div><span class="seller-type">Automotora</span></div>"#);

        let query = Query::class("seller-type");
        assert_eq!(
            fake.find_first(&query).and_then(|n| n.last_text()),
            html.root_element().find_first(&query).and_then(|n| n.last_text())
        );
    }
}
