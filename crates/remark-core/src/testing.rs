//! In-memory document tree for unit tests.

use crate::traits::{AttrQuery, LabelQuery, TreeNode};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeNode {
    tag: String,
    attrs: Vec<(String, String)>,
    labels: Vec<String>,
    text: String,
    children: Vec<FakeNode>,
}

pub(crate) fn el(tag: &str) -> FakeNode {
    FakeNode {
        tag: tag.to_string(),
        ..Default::default()
    }
}

impl FakeNode {
    pub(crate) fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub(crate) fn label(mut self, label: &str) -> Self {
        self.labels.push(label.to_string());
        self
    }

    pub(crate) fn with_text(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    pub(crate) fn child(mut self, child: FakeNode) -> Self {
        self.children.push(child);
        self
    }

    fn descendants(&self) -> Vec<&FakeNode> {
        let mut out = Vec::new();
        for child in &self.children {
            out.push(child);
            out.extend(child.descendants());
        }
        out
    }
}

impl<'a> TreeNode for &'a FakeNode {
    fn find_first(&self, query: &AttrQuery) -> Option<Self> {
        let node: &'a FakeNode = *self;
        node.descendants().into_iter().find(|n| {
            let value = n
                .attrs
                .iter()
                .find(|(k, _)| *k == query.attribute)
                .map(|(_, v)| v.as_str());
            query.matches(&n.tag, value)
        })
    }

    fn find_all(&self, query: &LabelQuery) -> Vec<Self> {
        let node: &'a FakeNode = *self;
        node.descendants()
            .into_iter()
            .filter(|n| n.tag == query.tag && n.labels.contains(&query.label))
            .collect()
    }

    fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    fn text(&self) -> String {
        let mut text = self.text.clone();
        for child in &self.children {
            text.push_str(&child.text());
        }
        text
    }
}

/// One option with the given state labels.
pub(crate) fn option(states: &[&str]) -> FakeNode {
    states
        .iter()
        .fold(el("li").label("lrn-mcq-option"), |node, s| node.label(s))
}

/// A question region holding the given options.
pub(crate) fn question(options: Vec<FakeNode>) -> FakeNode {
    options.into_iter().fold(
        el("ul").label("lrn-response-validate-wrapper"),
        |node, o| node.child(o),
    )
}

/// A full report page for `name` with the given question regions.
pub(crate) fn report_page(name: &str, questions: Vec<FakeNode>) -> FakeNode {
    let header = el("div")
        .attr("ng-if", "selectedParticipant && !selectedGroup")
        .child(el("div").with_text(&format!("\n   {name}\n  ")));
    let body = questions
        .into_iter()
        .fold(el("div").label("results"), |node, q| node.child(q));
    el("html").child(el("body").child(header).child(body))
}
