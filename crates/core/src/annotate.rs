//! Turns documentation markers into hyperlinks.
//!
//! Two marker families exist on documentation pages:
//!
//! - `<span class="mhcf">HumdrumFile::printCSV</span>` keeps its element and
//!   gets its content replaced by links to the class page and the member anchor.
//! - `<span class="topic-foo">text</span>` (and `ref-`, `snippet-`, `example-`,
//!   `class-`) is swapped out entirely for `<a href="/doc/topic/#foo">text</a>`.
//!
//! Annotation is not idempotent; run [`annotate_links`] once per page.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{Document, Query};
use crate::error::AnnotationReport;

/// Class carried by function-reference markers.
pub const FUNCTION_MARKER_CLASS: &str = "mhcf";
/// Root of the generated URL space.
pub const DOC_ROOT: &str = "/doc";

/// `<class>::<member>`; greedy on the class side, single line.
pub static FUNCTION_REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(.*)::(.*)").expect("Invalid FUNCTION_REFERENCE_RE regex"));

/// A parsed `Class::member` marker text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionReference {
    /// Text before the last `::` on the matched line
    pub class: String,
    /// Text after it
    pub member: String,
}

impl FunctionReference {
    /// `/doc/class/<class>`
    pub fn class_href(&self) -> String {
        format!("{DOC_ROOT}/class/{}", self.class)
    }

    /// `/doc/class/<class>#<member>`
    pub fn member_href(&self) -> String {
        format!("{DOC_ROOT}/class/{}#{}", self.class, self.member)
    }
}

/// Rendering flags read from a function-reference marker's class list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// `noc`: omit the class link and the `::` separator
    pub no_class: bool,
    /// `dot`: with `noc`, prefix the member with `.`
    pub dot: bool,
    /// `paren`: styling hook only, does not change the markup
    pub paren: bool,
}

impl Modifiers {
    /// Reads the flags from a whitespace-separated class attribute.
    pub fn from_class_list(class_attr: &str) -> Self {
        let mut modifiers = Self::default();
        for token in class_attr.split_ascii_whitespace() {
            match token {
                "noc" => modifiers.no_class = true,
                "dot" => modifiers.dot = true,
                "paren" => modifiers.paren = true,
                _ => {}
            }
        }
        modifiers
    }
}

/// Splits marker text on `::`, returning `None` when the separator is missing.
pub fn parse_function_reference(text: &str) -> Option<FunctionReference> {
    let caps = FUNCTION_REFERENCE_RE.captures(text)?;
    Some(FunctionReference {
        class: caps[1].to_string(),
        member: caps[2].to_string(),
    })
}

/// Builds the replacement inner markup for a function-reference marker.
pub fn render_function_reference(reference: &FunctionReference, modifiers: Modifiers) -> String {
    let mut out = String::new();
    if !modifiers.no_class {
        out.push_str(&format!(
            "<a href=\"{}\">{}</a>::",
            reference.class_href(),
            reference.class
        ));
    } else if modifiers.dot {
        out.push('.');
    }
    out.push_str(&format!(
        "<a href=\"{}\">{}</a>",
        reference.member_href(),
        reference.member
    ));
    out
}

/// Rewrites the content of every `.mhcf` element into class/member links.
pub fn annotate_function_references<D: Document>(doc: &mut D) -> AnnotationReport {
    let mut report = AnnotationReport::default();
    for node in doc.query_all(&Query::class(FUNCTION_MARKER_CLASS)) {
        let inner = doc.inner_html(&node);
        let Some(reference) = parse_function_reference(&inner) else {
            log::debug!("Skipping function marker without '::': {:?}", inner);
            report.skipped += 1;
            continue;
        };
        let modifiers = Modifiers::from_class_list(&doc.class_name(&node));
        doc.set_inner_html(&node, &render_function_reference(&reference, modifiers));
        report.function_references += 1;
    }
    report
}

/// Documentation sections that tagged spans can link into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocLinkTag {
    /// `ref-<name>` → `/doc/ref/#<name>`
    Ref,
    /// `snippet-<name>` → `/doc/snippet/#<name>`
    Snippet,
    /// `example-<name>` → `/doc/example/#<name>`
    Example,
    /// `topic-<name>` → `/doc/topic/#<name>`
    Topic,
    /// `class-<name>` → `/doc/class/<name>`
    Class,
}

impl DocLinkTag {
    /// All tags, in the order they are annotated.
    pub const ALL: [DocLinkTag; 5] = [
        DocLinkTag::Ref,
        DocLinkTag::Snippet,
        DocLinkTag::Example,
        DocLinkTag::Topic,
        DocLinkTag::Class,
    ];

    /// Tag name as it appears in class attributes and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            DocLinkTag::Ref => "ref",
            DocLinkTag::Snippet => "snippet",
            DocLinkTag::Example => "example",
            DocLinkTag::Topic => "topic",
            DocLinkTag::Class => "class",
        }
    }

    /// Text placed between `/doc/<tag>/` and the marker value.
    pub fn prefix(self) -> &'static str {
        match self {
            DocLinkTag::Class => "",
            _ => "#",
        }
    }

    /// Start of the class attribute on matching spans (`topic-`).
    pub fn class_prefix(self) -> String {
        format!("{}-", self.as_str())
    }

    /// Extracts the link value from a span's class attribute.
    ///
    /// Everything after the first `<tag>-` is the value, like the class
    /// pattern the pages were written against.
    pub fn value_from_class<'a>(self, class_attr: &'a str) -> Option<&'a str> {
        let prefix = self.class_prefix();
        class_attr
            .find(&prefix)
            .map(|start| &class_attr[start + prefix.len()..])
    }

    /// `/doc/<tag>/<prefix><value>`
    pub fn href(self, value: &str) -> String {
        format!("{DOC_ROOT}/{}/{}{}", self.as_str(), self.prefix(), value)
    }
}

impl std::str::FromStr for DocLinkTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocLinkTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| format!("unknown documentation tag '{s}'"))
    }
}

/// Replaces every `span[class^="<tag>-"]` with a link carrying its content.
pub fn annotate_tagged_spans<D: Document>(doc: &mut D, tag: DocLinkTag) -> AnnotationReport {
    let mut report = AnnotationReport::default();
    for node in doc.query_all(&Query::class_prefix("span", tag.class_prefix())) {
        let class_attr = doc.class_name(&node);
        let Some(value) = tag.value_from_class(&class_attr) else {
            report.skipped += 1;
            continue;
        };
        let html = format!(
            "<a href=\"{}\">{}</a>",
            tag.href(value),
            doc.inner_html(&node)
        );
        doc.replace_outer_html(&node, &html);
        report.tagged_spans += 1;
    }
    report
}

/// Runs every annotation on the page.
///
/// Function references go first: tagged-span replacement swaps whole
/// elements, and markers nested inside them must already carry their links.
pub fn annotate_links<D: Document>(doc: &mut D) -> AnnotationReport {
    let mut report = annotate_function_references(doc);
    for tag in DocLinkTag::ALL {
        report.merge(annotate_tagged_spans(doc, tag));
    }
    if report.has_skips() {
        log::debug!(
            "Annotated {} markers ({} skipped)",
            report.rewritten(),
            report.skipped
        );
    } else {
        log::debug!("Annotated {} markers", report.rewritten());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, MemoryElement};

    fn marker(doc: &mut MemoryDocument, class: &str, text: &str) -> crate::memory::NodeId {
        doc.push(MemoryElement::new("span").class(class).html(text))
    }

    #[test]
    fn plain_reference() {
        let mut doc = MemoryDocument::new();
        let node = marker(&mut doc, "mhcf", "HumdrumFile::printCSV");
        annotate_function_references(&mut doc);
        assert_eq!(
            doc.inner_html(&node),
            "<a href=\"/doc/class/HumdrumFile\">HumdrumFile</a>::\
             <a href=\"/doc/class/HumdrumFile#printCSV\">printCSV</a>"
        );
    }

    #[test]
    fn no_class_modifier_drops_class_link() {
        let mut doc = MemoryDocument::new();
        let node = marker(&mut doc, "mhcf noc", "HumNum::getFloat");
        annotate_function_references(&mut doc);
        assert_eq!(
            doc.inner_html(&node),
            "<a href=\"/doc/class/HumNum#getFloat\">getFloat</a>"
        );
    }

    #[test]
    fn no_class_with_dot() {
        let mut doc = MemoryDocument::new();
        let node = marker(&mut doc, "mhcf noc dot", "HumNum::getFloat");
        annotate_function_references(&mut doc);
        assert_eq!(
            doc.inner_html(&node),
            ".<a href=\"/doc/class/HumNum#getFloat\">getFloat</a>"
        );
    }

    #[test]
    fn dot_without_noc_is_ignored() {
        let mut doc = MemoryDocument::new();
        let node = marker(&mut doc, "mhcf dot paren", "A::b");
        annotate_function_references(&mut doc);
        assert_eq!(
            doc.inner_html(&node),
            "<a href=\"/doc/class/A\">A</a>::<a href=\"/doc/class/A#b\">b</a>"
        );
    }

    #[test]
    fn malformed_marker_left_alone() {
        let mut doc = MemoryDocument::new();
        let node = marker(&mut doc, "mhcf", "printCSV");
        let report = annotate_function_references(&mut doc);
        assert_eq!(doc.inner_html(&node), "printCSV");
        assert_eq!(report.skipped, 1);
        assert_eq!(report.function_references, 0);
    }

    #[test]
    fn greedy_split_on_last_separator() {
        let reference = parse_function_reference("hum::HumdrumLine::getTokenCount").unwrap();
        assert_eq!(reference.class, "hum::HumdrumLine");
        assert_eq!(reference.member, "getTokenCount");
    }

    #[test]
    fn modifiers_need_whole_tokens() {
        let modifiers = Modifiers::from_class_list("mhcf nocturne dotted");
        assert_eq!(modifiers, Modifiers::default());
        let modifiers = Modifiers::from_class_list("mhcf  noc\tdot");
        assert!(modifiers.no_class && modifiers.dot && !modifiers.paren);
    }

    #[test]
    fn topic_span_becomes_link() {
        let mut doc = MemoryDocument::new();
        let node = marker(&mut doc, "topic-foo", "the <em>foo</em> topic");
        annotate_tagged_spans(&mut doc, DocLinkTag::Topic);
        assert!(doc.is_replaced(node));
        assert_eq!(
            doc.outer_html(node),
            "<a href=\"/doc/topic/#foo\">the <em>foo</em> topic</a>"
        );
    }

    #[test]
    fn class_span_has_no_hash_prefix() {
        let mut doc = MemoryDocument::new();
        let node = marker(&mut doc, "class-HumdrumToken", "HumdrumToken");
        annotate_tagged_spans(&mut doc, DocLinkTag::Class);
        assert_eq!(
            doc.outer_html(node),
            "<a href=\"/doc/class/HumdrumToken\">HumdrumToken</a>"
        );
    }

    #[test]
    fn tagged_spans_only_match_spans() {
        let mut doc = MemoryDocument::new();
        let details = doc.push(MemoryElement::new("details").class("class-intro"));
        let report = annotate_tagged_spans(&mut doc, DocLinkTag::Class);
        assert!(!doc.is_replaced(details));
        assert_eq!(report.tagged_spans, 0);
    }

    #[test]
    fn every_tag_has_its_url() {
        assert_eq!(DocLinkTag::Ref.href("x"), "/doc/ref/#x");
        assert_eq!(DocLinkTag::Snippet.href("x"), "/doc/snippet/#x");
        assert_eq!(DocLinkTag::Example.href("x"), "/doc/example/#x");
        assert_eq!(DocLinkTag::Topic.href("x"), "/doc/topic/#x");
        assert_eq!(DocLinkTag::Class.href("x"), "/doc/class/x");
        assert_eq!("snippet".parse::<DocLinkTag>(), Ok(DocLinkTag::Snippet));
        assert!("bogus".parse::<DocLinkTag>().is_err());
    }

    #[test]
    fn annotate_links_counts_everything() {
        let mut doc = MemoryDocument::new();
        marker(&mut doc, "mhcf", "A::b");
        marker(&mut doc, "mhcf", "broken");
        marker(&mut doc, "ref-x", "x");
        marker(&mut doc, "example-y", "y");
        marker(&mut doc, "plain", "z");
        let report = annotate_links(&mut doc);
        assert_eq!(report.function_references, 1);
        assert_eq!(report.tagged_spans, 2);
        assert_eq!(report.skipped, 1);
        assert!(report.has_skips());
    }
}
