//! Annotates a serialized page in one `lol_html` streaming pass.
//!
//! Produces the same links as the live-page hooks, for pages annotated ahead
//! of time or inside a worker. Without a DOM there is no inner HTML to match,
//! so each text node inside a `.mhcf` marker is matched on its own.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use lol_html::html_content::ContentType;
use lol_html::{ElementContentHandlers, RewriteStrSettings, Selector, element, rewrite_str, text};

use crate::annotate::{
    DocLinkTag, FUNCTION_MARKER_CLASS, Modifiers, parse_function_reference,
    render_function_reference,
};
use crate::config::PageConfig;
use crate::error::DocPageError;
use crate::external::is_external_href;

type Handler = (Cow<'static, Selector>, ElementContentHandlers<'static>);

#[derive(Default)]
struct MarkerText {
    modifiers: Modifiers,
    buffer: String,
}

/// Rewrites markers and external links in an HTML document or fragment.
pub fn annotate_html(html: &str, config: &PageConfig) -> Result<String, DocPageError> {
    config.validate()?;
    let mut handlers = function_reference_handlers();
    handlers.extend(DocLinkTag::ALL.into_iter().map(tagged_span_handler));
    if config.rewrite_external_links() {
        handlers.push(external_link_handler(config.external_target().to_string()));
    }

    let output = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::new()
        },
    )?;
    Ok(output)
}

fn function_reference_handlers() -> Vec<Handler> {
    let selector = format!(".{FUNCTION_MARKER_CLASS}");
    let state = Rc::new(RefCell::new(MarkerText::default()));

    let on_element = {
        let state = Rc::clone(&state);
        element!(selector, move |el| {
            let class_attr = el.get_attribute("class").unwrap_or_default();
            let mut state = state.borrow_mut();
            state.modifiers = Modifiers::from_class_list(&class_attr);
            state.buffer.clear();
            Ok(())
        })
    };

    // Text arrives in chunks; hold them back until the node is complete.
    let on_text = text!(selector, move |chunk| {
        let mut state = state.borrow_mut();
        state.buffer.push_str(chunk.as_str());
        if !chunk.last_in_text_node() {
            chunk.remove();
            return Ok(());
        }
        let text = std::mem::take(&mut state.buffer);
        match parse_function_reference(&text) {
            Some(reference) => {
                let markup = render_function_reference(&reference, state.modifiers);
                chunk.replace(&markup, ContentType::Html);
            }
            None => {
                if !text.trim().is_empty() {
                    log::debug!("Skipping function marker without '::': {:?}", text);
                }
                chunk.replace(&text, ContentType::Html);
            }
        }
        Ok(())
    });

    vec![on_element, on_text]
}

fn tagged_span_handler(tag: DocLinkTag) -> Handler {
    let selector = format!("span[class^=\"{}\"]", tag.class_prefix());
    element!(selector, move |el| {
        let class_attr = el.get_attribute("class").unwrap_or_default();
        let Some(value) = tag.value_from_class(&class_attr) else {
            return Ok(());
        };
        let href = tag.href(value);
        let names: Vec<String> = el.attributes().iter().map(|attr| attr.name()).collect();
        for name in names {
            el.remove_attribute(&name);
        }
        el.set_tag_name("a")?;
        el.set_attribute("href", &href)?;
        Ok(())
    })
}

fn external_link_handler(target: String) -> Handler {
    element!("a[href]", move |el| {
        let href = el.get_attribute("href").unwrap_or_default();
        if !href.is_empty() && is_external_href(&href) {
            el.set_attribute("target", &target)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn annotate(html: &str) -> String {
        annotate_html(html, &PageConfig::default()).unwrap()
    }

    #[test]
    fn function_reference() {
        assert_snapshot!(
            annotate(r#"<span class="mhcf">HumdrumFile::printCSV</span>"#),
            @r#"<span class="mhcf"><a href="/doc/class/HumdrumFile">HumdrumFile</a>::<a href="/doc/class/HumdrumFile#printCSV">printCSV</a></span>"#
        );
    }

    #[test]
    fn function_reference_modifiers() {
        assert_snapshot!(
            annotate(r#"<span class="mhcf noc">HumNum::getFloat</span>"#),
            @r#"<span class="mhcf noc"><a href="/doc/class/HumNum#getFloat">getFloat</a></span>"#
        );
        assert_snapshot!(
            annotate(r#"<span class="mhcf noc dot">HumNum::getFloat</span>"#),
            @r#"<span class="mhcf noc dot">.<a href="/doc/class/HumNum#getFloat">getFloat</a></span>"#
        );
    }

    #[test]
    fn malformed_marker_is_untouched() {
        let html = r#"<p>See <span class="mhcf">printCSV &amp; friends</span>.</p>"#;
        assert_eq!(annotate(html), html);
    }

    #[test]
    fn tagged_spans() {
        assert_snapshot!(
            annotate(r#"<span class="topic-foo">the <em>foo</em> topic</span>"#),
            @r#"<a href="/doc/topic/#foo">the <em>foo</em> topic</a>"#
        );
        assert_snapshot!(
            annotate(r#"<span class="class-HumdrumToken" title="t">HumdrumToken</span>"#),
            @r#"<a href="/doc/class/HumdrumToken">HumdrumToken</a>"#
        );
    }

    #[test]
    fn function_reference_inside_tagged_span() {
        assert_snapshot!(
            annotate(r#"<span class="topic-x">see <span class="mhcf">A::b</span></span>"#),
            @r#"<a href="/doc/topic/#x">see <span class="mhcf"><a href="/doc/class/A">A</a>::<a href="/doc/class/A#b">b</a></span></a>"#
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PageConfig {
            details_tag: Some(String::new()),
            ..PageConfig::default()
        };
        let err = annotate_html("<p></p>", &config).unwrap_err();
        assert!(matches!(err, DocPageError::Config(_)));
    }

    #[test]
    fn details_with_tag_classes_are_not_links() {
        let html = r#"<details class="class-intro"><summary>Intro</summary></details>"#;
        assert_eq!(annotate(html), html);
    }

    #[test]
    fn external_links() {
        assert_snapshot!(
            annotate(r#"<a href="https://example.com">x</a><a href="/local/path">y</a><a href="">z</a>"#),
            @r#"<a href="https://example.com" target="new">x</a><a href="/local/path">y</a><a href="">z</a>"#
        );
    }

    #[test]
    fn external_target_from_config() {
        let config = PageConfig {
            external_target: Some("docs".to_string()),
            ..PageConfig::default()
        };
        let out = annotate_html(r#"<a href="http://example.com">x</a>"#, &config).unwrap();
        assert_eq!(out, r#"<a href="http://example.com" target="docs">x</a>"#);

        let config = PageConfig {
            rewrite_external_links: Some(false),
            ..PageConfig::default()
        };
        let html = r#"<a href="http://example.com">x</a>"#;
        assert_eq!(annotate_html(html, &config).unwrap(), html);
    }

    #[test]
    fn generated_links_are_not_rescanned() {
        // The class link is relative, so the external handler must leave it alone,
        // and nothing inside the generated markup is treated as a marker again.
        let out = annotate(r#"<span class="mhcf">A::b</span> <span class="ref-x">x</span>"#);
        assert!(!out.contains("target="));
        assert_eq!(out.matches("<a ").count(), 3);
    }
}
