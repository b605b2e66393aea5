//! HTML toot rendering
//!
//! Mastodon serves status bodies as HTML fragments. [`TootParser`] walks one
//! fragment tag-by-tag (events come from the html5ever tokenizer) and
//! produces a terminal-displayable plain-text rendering plus the list of
//! hyperlink targets found along the way, with mention and hashtag anchors
//! kept apart from ordinary web links.
//!
//! The server wraps URLs in markup like:
//!
//! ```html
//! <a href="https://example.com/very/long/path">
//!   <span class="invisible">https://</span>
//!   <span class="ellipsis">example.com/very</span>
//!   <span class="invisible">/long/path</span>
//! </a>
//! ```
//!
//! With link shortening enabled the invisible spans are suppressed so the
//! display text matches what a browser would show, while the full `href`
//! is still collected for the `links` command.

pub mod emoji;

use std::cell::RefCell;
use std::collections::HashSet;
use std::hash::Hash;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Classification of the anchor currently being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// Anchor referencing another account (`class="mention"`).
    Mention,
    /// Anchor referencing a topic tag (`class="hashtag"`).
    Hashtag,
    /// Any other anchor.
    Link,
}

/// Stateful renderer for one HTML status body.
///
/// Create a fresh parser per status, call [`TootParser::parse`], then query
/// [`TootParser::text`], [`TootParser::links`] and [`TootParser::weblinks`].
/// No state is retained across fragments.
#[derive(Debug)]
pub struct TootParser {
    /// Text fragments accumulated since the last drain.
    fed: Vec<String>,
    /// Every anchor target, insertion order, duplicates included.
    links: Vec<String>,
    /// Targets of anchors that are neither mentions nor hashtags.
    weblinks: Vec<String>,
    /// Classification of the currently open anchor, if any.
    cur_type: Option<LinkType>,
    /// Suppress text while inside an invisible span.
    hide: bool,
    /// Whether invisible-span text is dropped from the rendering.
    shorten_links: bool,
}

impl TootParser {
    /// Create a parser; `shorten_links` controls whether invisible-span
    /// text inside anchors is suppressed.
    pub fn new(shorten_links: bool) -> Self {
        Self {
            fed: Vec::new(),
            links: Vec::new(),
            weblinks: Vec::new(),
            cur_type: None,
            hide: false,
            shorten_links,
        }
    }

    /// Feed one HTML fragment through the tokenizer and handle its events.
    pub fn parse(&mut self, html: &str) {
        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(html));

        let tokenizer = Tokenizer::new(EventSink::default(), TokenizerOpts::default());
        let _ = tokenizer.feed(&input);
        tokenizer.end();

        for event in tokenizer.sink.events.into_inner() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: TagEvent) {
        match event {
            TagEvent::Open(name, attrs) => self.handle_starttag(&name, &attrs),
            TagEvent::Text(text) => self.handle_data(&text),
            TagEvent::Close(name) => self.handle_endtag(&name),
        }
    }

    fn handle_starttag(&mut self, name: &str, attrs: &[(String, String)]) {
        match name {
            // Block separators become literal text so that `text()` can
            // stay a plain concatenation.
            "p" if !self.fed.is_empty() => self.fed.push("\n\n".to_string()),
            "br" => self.fed.push("\n".to_string()),
            "a" => self.parse_link(attrs),
            "span" => self.parse_span(attrs),
            _ => {}
        }
    }

    /// Register an anchor and classify it. Anchors without `href` are
    /// silently skipped.
    fn parse_link(&mut self, attrs: &[(String, String)]) {
        let Some(href) = find_attr("href", attrs) else {
            return;
        };
        let link_type = if has_class("mention", attrs) {
            LinkType::Mention
        } else if has_class("hashtag", attrs) {
            LinkType::Hashtag
        } else {
            LinkType::Link
        };
        self.cur_type = Some(link_type);
        self.links.push(href.to_string());
        if link_type == LinkType::Link {
            self.weblinks.push(href.to_string());
        }
    }

    /// Spans only matter inside an anchor when shortening is on: the
    /// invisible parts of a wrapped URL are dropped, the ellipsis part is
    /// the shortened display text and must render.
    fn parse_span(&mut self, attrs: &[(String, String)]) {
        if self.cur_type.is_none() || !self.shorten_links {
            return;
        }
        if has_class("invisible", attrs) {
            self.hide = true;
        } else if has_class("ellipsis", attrs) {
            self.hide = false;
        }
    }

    fn handle_data(&mut self, text: &str) {
        if self.hide {
            return;
        }
        // Servers may ship shortcodes in body text; convert per fragment so
        // already-converted text is never reprocessed.
        self.fed.push(emoji::shortcode_to_unicode(text));
    }

    /// Anchors and spans are assumed non-nested in status markup, so the
    /// close of either resets its scalar flag unconditionally. A span close
    /// inside a genuinely nested invisible span would un-hide text; that
    /// matches the upstream behavior and is covered by a test.
    fn handle_endtag(&mut self, name: &str) {
        match name {
            "a" => self.cur_type = None,
            "span" => self.hide = false,
            _ => {}
        }
    }

    /// The rendering so far: all fragments concatenated in insertion order.
    pub fn text(&self) -> String {
        self.fed.concat()
    }

    /// Like [`TootParser::text`] but drains the accumulated fragments, for
    /// incremental consumption.
    pub fn pop_line(&mut self) -> String {
        let line = self.fed.concat();
        self.fed.clear();
        line
    }

    /// All anchor targets, first-occurrence order, deduplicated.
    pub fn links(&self) -> Vec<String> {
        unique(&self.links)
    }

    /// Web links first (mentions/hashtags excluded), then the rest of the
    /// full link list, deduplicated in first-occurrence order.
    pub fn weblinks(&self) -> Vec<String> {
        let mut merged = self.weblinks.clone();
        merged.extend(self.links());
        unique(&merged)
    }
}

impl Default for TootParser {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Value of the first attribute named `name`, if any. Later duplicates are
/// ignored, matching first-wins HTML attribute semantics.
pub fn find_attr<'a>(name: &str, attrs: &'a [(String, String)]) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(attr, _)| attr == name)
        .map(|(_, value)| value.as_str())
}

/// True iff the `class` attribute exists and equals `class_name` exactly.
/// This is a whole-value comparison, not a token-list membership test,
/// which is what status markup calls for.
pub fn has_class(class_name: &str, attrs: &[(String, String)]) -> bool {
    find_attr("class", attrs) == Some(class_name)
}

/// Order-preserving deduplication: each distinct element once, in order of
/// first occurrence.
pub fn unique<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert((*item).clone()))
        .cloned()
        .collect()
}

/// Simplified tag event delivered by the tokenizer glue.
#[derive(Debug)]
enum TagEvent {
    Open(String, Vec<(String, String)>),
    Text(String),
    Close(String),
}

/// html5ever sink that flattens the token stream into [`TagEvent`]s.
/// Interior mutability because `process_token` takes `&self`.
#[derive(Default)]
struct EventSink {
    events: RefCell<Vec<TagEvent>>,
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut events = self.events.borrow_mut();
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let attrs = tag
                            .attrs
                            .iter()
                            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                            .collect();
                        events.push(TagEvent::Open(name.clone(), attrs));
                        if tag.self_closing {
                            events.push(TagEvent::Close(name));
                        }
                    }
                    TagKind::EndTag => events.push(TagEvent::Close(name)),
                }
            }
            Token::CharacterTokens(text) => events.push(TagEvent::Text(text.to_string())),
            // Malformed-HTML policy belongs to the tokenizer; comments,
            // doctypes and errors carry no renderable content.
            Token::NullCharacterToken
            | Token::CommentToken(_)
            | Token::DoctypeToken(_)
            | Token::ParseError(_)
            | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn test_unique() {
        let sequence = [1, 2, 2, 3, 4, 4, 4, 5, 6, 6, 7];
        assert_eq!(unique(&sequence), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_unique_with_strings() {
        let sequence: Vec<String> = ["a", "b", "b", "c", "d", "d", "d", "e", "f", "f", "g"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        assert_eq!(unique(&sequence), vec!["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_unique_empty() {
        let sequence: Vec<i32> = Vec::new();
        assert!(unique(&sequence).is_empty());
    }

    #[test]
    fn test_unique_all_same() {
        assert_eq!(unique(&[1, 1, 1, 1, 1]), vec![1]);
    }

    #[test]
    fn test_unique_idempotent() {
        let sequence = [3, 1, 3, 2, 1];
        let once = unique(&sequence);
        assert_eq!(unique(&once), once);
    }

    #[test]
    fn test_find_attr_returns_first_value() {
        let attrs = attrs(&[("class", "myclass"), ("id", "myid")]);
        assert_eq!(find_attr("id", &attrs), Some("myid"));
    }

    #[test]
    fn test_find_attr_missing() {
        let attrs = attrs(&[("class", "myclass"), ("id", "myid")]);
        assert_eq!(find_attr("name", &attrs), None);
    }

    #[test]
    fn test_find_attr_empty_list() {
        assert_eq!(find_attr("name", &[]), None);
    }

    #[test]
    fn test_find_attr_duplicate_first_wins() {
        let attrs = attrs(&[("class", "myclass"), ("class", "secondclass")]);
        assert_eq!(find_attr("class", &attrs), Some("myclass"));
    }

    #[test]
    fn test_has_class_exact_match_only() {
        assert!(has_class("myclass", &attrs(&[("class", "myclass")])));
        assert!(!has_class("a", &attrs(&[("class", "a b")])));
        assert!(!has_class("myclass", &attrs(&[("id", "myclass")])));
        assert!(!has_class("myclass", &[]));
    }

    #[test]
    fn test_pop_line_drains() {
        let mut parser = TootParser::new(false);
        parser.parse("<p>Hello</p>");
        assert_eq!(parser.pop_line(), "Hello");
        assert_eq!(parser.pop_line(), "");
        assert_eq!(parser.text(), "");
    }

    #[test]
    fn test_text_does_not_drain() {
        let mut parser = TootParser::new(false);
        parser.parse("<p>Hello</p>");
        assert_eq!(parser.text(), "Hello");
        assert_eq!(parser.text(), "Hello");
    }

    #[test]
    fn test_mention_excluded_from_weblinks() {
        let mut parser = TootParser::new(true);
        parser.parse(r#"<a href="http://x" class="mention">@user</a>"#);
        assert_eq!(parser.links(), vec!["http://x"]);
        // The mention still appears in the merged tail, but never in the
        // weblinks-first segment.
        assert!(parser.weblinks.is_empty());
        assert_eq!(parser.weblinks(), vec!["http://x"]);
    }

    #[test]
    fn test_hashtag_excluded_from_weblinks() {
        let mut parser = TootParser::new(true);
        parser.parse(r##"<a href="http://tag" class="hashtag">#rust</a>"##);
        assert!(parser.weblinks.is_empty());
        assert_eq!(parser.links(), vec!["http://tag"]);
    }

    #[test]
    fn test_invisible_span_suppressed_when_shortening() {
        let mut parser = TootParser::new(true);
        parser.parse(r#"<a href="http://y"><span class="invisible">http://</span>y</a>"#);
        assert_eq!(parser.text(), "y");
        assert_eq!(parser.links(), vec!["http://y"]);
    }

    #[test]
    fn test_invisible_span_kept_without_shortening() {
        let mut parser = TootParser::new(false);
        parser.parse(r#"<a href="http://y"><span class="invisible">http://</span>y</a>"#);
        assert_eq!(parser.text(), "http://y");
    }

    #[test]
    fn test_ellipsis_span_renders() {
        let mut parser = TootParser::new(true);
        parser.parse(concat!(
            r#"<a href="https://example.com/long/path">"#,
            r#"<span class="invisible">https://</span>"#,
            r#"<span class="ellipsis">example.com/long</span>"#,
            r#"<span class="invisible">/path</span></a>"#,
        ));
        assert_eq!(parser.text(), "example.com/long");
        assert_eq!(parser.links(), vec!["https://example.com/long/path"]);
    }

    #[test]
    fn test_anchor_without_href_not_registered() {
        let mut parser = TootParser::new(true);
        parser.parse(r#"<a class="mention">@nobody</a>"#);
        assert!(parser.links().is_empty());
        assert_eq!(parser.text(), "@nobody");
    }

    #[test]
    fn test_span_close_always_clears_hide() {
        // Known simplification: closing any span un-hides, even inside a
        // nested invisible span.
        let mut parser = TootParser::new(true);
        parser.parse(concat!(
            r#"<a href="http://z"><span class="invisible">hidden"#,
            r#"<span>inner</span>visible-again</span>z</a>"#,
        ));
        assert_eq!(parser.text(), "visible-againz");
    }

    #[test]
    fn test_weblinks_order_web_first() {
        let mut parser = TootParser::new(true);
        parser.parse(concat!(
            r#"<a href="http://m" class="mention">@a</a>"#,
            r#"<a href="http://w">w</a>"#,
            r#"<a href="http://m" class="mention">@a</a>"#,
        ));
        assert_eq!(parser.links(), vec!["http://m", "http://w"]);
        assert_eq!(parser.weblinks(), vec!["http://w", "http://m"]);
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        let mut parser = TootParser::new(true);
        parser.parse("<p>one</p><p>two<br>three</p>");
        assert_eq!(parser.text(), "one\n\ntwo\nthree");
    }

    #[test]
    fn test_end_to_end_mention_toot() {
        let mut parser = TootParser::new(true);
        parser.parse(r#"<p>Hello <a href="http://ex.com" class="mention">@user</a> world</p>"#);
        assert_eq!(parser.text(), "Hello @user world");
        assert_eq!(parser.links(), vec!["http://ex.com"]);
        assert!(parser.weblinks.is_empty());
    }

    #[test]
    fn test_entities_decoded_by_tokenizer() {
        let mut parser = TootParser::new(true);
        parser.parse("<p>fish &amp; chips</p>");
        assert_eq!(parser.text(), "fish & chips");
    }

    #[test]
    fn test_shortcodes_converted_in_data() {
        let mut parser = TootParser::new(true);
        parser.parse("<p>hi :grinning:</p>");
        assert_eq!(parser.text(), "hi 😀");
    }
}
