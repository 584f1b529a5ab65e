//! HTML document model backed by `scraper`.

use remark_core::traits::{AttrQuery, LabelQuery, TreeNode};
use scraper::{ElementRef, Html};

/// A parsed exam report page.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parse a full HTML document. Parsing is lenient; malformed markup
    /// still yields a tree.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// The `<html>` element.
    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode(self.html.root_element())
    }
}

/// An element inside an [`HtmlDocument`]. Labels are its `class` tokens.
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl<'a> HtmlNode<'a> {
    /// Descendant elements in depth-first document order, excluding self.
    fn descendant_elements(&self) -> impl Iterator<Item = ElementRef<'a>> {
        self.0.descendants().skip(1).filter_map(ElementRef::wrap)
    }

    /// Tag name of the element.
    pub fn tag(&self) -> &'a str {
        self.0.value().name()
    }
}

impl<'a> TreeNode for HtmlNode<'a> {
    fn find_first(&self, query: &AttrQuery) -> Option<Self> {
        self.descendant_elements()
            .find(|el| query.matches(el.value().name(), el.value().attr(&query.attribute)))
            .map(HtmlNode)
    }

    fn find_all(&self, query: &LabelQuery) -> Vec<Self> {
        self.descendant_elements()
            .filter(|el| {
                el.value().name() == query.tag && el.value().classes().any(|c| c == query.label)
            })
            .map(HtmlNode)
            .collect()
    }

    fn has_label(&self, label: &str) -> bool {
        self.0.value().classes().any(|c| c == label)
    }

    fn text(&self) -> String {
        self.0.text().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remark_core::config::MarkupConfig;
    use remark_core::extract::Extractor;
    use remark_core::RemarkError;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="header" ng-if="selectedParticipant &amp;&amp; !selectedGroup">
  <div class="participant">
    Grace
      Hopper
  </div>
</div>
<div class="questions">
  <ul class="lrn-response-validate-wrapper">
    <li class="lrn-mcq-option lrn_correct">A</li>
    <li class="lrn-mcq-option">B</li>
    <li class="lrn-mcq-option">C</li>
  </ul>
  <section>
    <ul class="lrn-response-validate-wrapper lrn_widget">
      <li class="lrn-mcq-option lrn_valid">A</li>
      <li class="lrn-mcq-option lrn_incorrect">B</li>
      <li class="lrn-mcq-option lrn_correct">C</li>
      <li class="lrn-mcq-option">D</li>
    </ul>
  </section>
</div>
</body></html>"#;

    fn extractor() -> Extractor {
        Extractor::new(&MarkupConfig::default()).unwrap()
    }

    #[test]
    fn root_is_html_element() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.root().tag(), "html");
    }

    #[test]
    fn extracts_name_from_identifier_div() {
        let doc = HtmlDocument::parse(PAGE);
        let name = extractor().find_participant_name(&doc.root()).unwrap();
        assert_eq!(name, "Grace Hopper");
    }

    #[test]
    fn finds_regions_in_document_order() {
        let doc = HtmlDocument::parse(PAGE);
        let ex = extractor();
        let regions = ex.find_question_regions(&doc.root()).unwrap();
        assert_eq!(regions.len(), 2);

        let first = ex.tally_region(1, &regions[0]).unwrap();
        assert_eq!(first.total_options(), 3);
        assert_eq!(first.selected_correct(), 1);

        let second = ex.tally_region(2, &regions[1]).unwrap();
        assert_eq!(second.total_options(), 4);
        assert_eq!(second.total_correct(), 2);
        assert_eq!(second.selected_incorrect(), 1);
    }

    #[test]
    fn label_match_is_whole_token() {
        let doc = HtmlDocument::parse(
            r#"<html><body><ul class="lrn-response-validate-wrapper-old"><li class="lrn-mcq-option">A</li></ul></body></html>"#,
        );
        let err = extractor().find_question_regions(&doc.root()).unwrap_err();
        assert!(matches!(err, RemarkError::NoQuestionsFound));
    }

    #[test]
    fn page_without_identifier_fails() {
        let doc = HtmlDocument::parse("<html><body><p>Nothing here</p></body></html>");
        let err = extractor().extract(&doc.root()).unwrap_err();
        assert!(matches!(err, RemarkError::IdentifierNotFound));
    }
}
