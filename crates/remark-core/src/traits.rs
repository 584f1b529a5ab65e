//! Document model trait definitions.
//!
//! The extractor only needs two queries over a parsed document, so any tree
//! engine can back it. `remark-sources` implements [`TreeNode`] over `scraper`.

use regex::Regex;

use crate::error::RemarkError;

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Matches an element by tag name and a regex over one of its attributes.
#[derive(Debug, Clone)]
pub struct AttrQuery {
    /// Element tag name (e.g. "div").
    pub tag: String,
    /// Attribute whose value is tested.
    pub attribute: String,
    /// Pattern searched for anywhere in the attribute value.
    pub pattern: Regex,
}

impl AttrQuery {
    /// Compile a query from a raw pattern string.
    pub fn new(tag: &str, attribute: &str, pattern: &str) -> Result<Self, RemarkError> {
        let pattern = Regex::new(pattern).map_err(|source| RemarkError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            pattern,
        })
    }

    /// Test a tag name and the attribute value (if the element has one).
    pub fn matches(&self, tag: &str, value: Option<&str>) -> bool {
        tag == self.tag && value.is_some_and(|v| self.pattern.is_match(v))
    }
}

/// Matches an element by tag name and one of its state labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelQuery {
    /// Element tag name (e.g. "li").
    pub tag: String,
    /// Label the element must carry.
    pub label: String,
}

impl LabelQuery {
    pub fn new(tag: &str, label: &str) -> Self {
        Self {
            tag: tag.to_string(),
            label: label.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tree node trait
// ---------------------------------------------------------------------------

/// A node of an already-parsed document tree.
///
/// Nodes are cheap handles into a tree owned elsewhere, hence `Sized` and
/// returned by value from the queries.
pub trait TreeNode: Sized {
    /// First descendant in depth-first document order matching the query.
    fn find_first(&self, query: &AttrQuery) -> Option<Self>;

    /// All descendants matching the query, in document order.
    fn find_all(&self, query: &LabelQuery) -> Vec<Self>;

    /// Whether this node carries the given state label.
    fn has_label(&self, label: &str) -> bool;

    /// Concatenated text of this node and its descendants.
    fn text(&self) -> String;
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
