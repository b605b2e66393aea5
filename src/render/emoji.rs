//! Emoji shortcode transcoding
//!
//! Two pure functions converting between `:shortcode:` notation and Unicode
//! glyphs, backed by the gemoji database (shortcodes and their aliases) via
//! the `emojis` crate. Unknown tokens and non-emoji text pass through
//! verbatim; neither direction can fail.

use unicode_segmentation::UnicodeSegmentation;

/// Characters allowed inside a shortcode name (`+1`, `red-car`, `a_b`).
fn is_shortcode_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')
}

/// Replace every well-formed `:shortcode:` token with its glyph.
///
/// Tokens with no known mapping are left unchanged. The closing colon of an
/// unknown token may open the next token, so `:nope:grinning:` still
/// converts the trailing `:grinning:`.
pub fn shortcode_to_unicode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(':') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let name_len = after.chars().take_while(|c| is_shortcode_char(*c)).count();
        let name: String = after.chars().take(name_len).collect();
        let candidate = &after[name.len()..];

        if !name.is_empty() && candidate.starts_with(':') {
            if let Some(emoji) = emojis::get_by_shortcode(&name) {
                out.push_str(emoji.as_str());
                rest = &candidate[1..];
                continue;
            }
        }
        // Not a known token; keep the colon and rescan after it.
        out.push(':');
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Replace every Unicode emoji glyph with its canonical `:shortcode:` form.
///
/// Segmentation is by extended grapheme cluster, so multi-codepoint emoji
/// (flags, ZWJ sequences) convert as a unit and back-to-back glyphs each
/// become their own token with no separator.
pub fn unicode_to_shortcodes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for grapheme in text.graphemes(true) {
        match emojis::get(grapheme).and_then(emojis::Emoji::shortcode) {
            Some(shortcode) => {
                out.push(':');
                out.push_str(shortcode);
                out.push(':');
            }
            None => out.push_str(grapheme),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcode_to_unicode() {
        assert_eq!(shortcode_to_unicode(":grinning:"), "😀");
        assert_eq!(shortcode_to_unicode("hi :grinning: there"), "hi 😀 there");
    }

    #[test]
    fn test_shortcode_alias() {
        // gemoji aliases resolve too.
        assert_eq!(shortcode_to_unicode(":+1:"), "👍");
    }

    #[test]
    fn test_unknown_shortcode_verbatim() {
        assert_eq!(shortcode_to_unicode(":notarealemoji:"), ":notarealemoji:");
        assert_eq!(shortcode_to_unicode("a : b : c"), "a : b : c");
    }

    #[test]
    fn test_unknown_then_known() {
        assert_eq!(shortcode_to_unicode(":nope:grinning:"), ":nope😀");
    }

    #[test]
    fn test_unicode_to_shortcodes() {
        assert_eq!(unicode_to_shortcodes("🙂"), ":slightly_smiling_face:");
    }

    #[test]
    fn test_adjacent_glyphs_no_separator() {
        assert_eq!(unicode_to_shortcodes("🍇🍇"), ":grapes::grapes:");
    }

    #[test]
    fn test_multi_codepoint_flag() {
        assert_eq!(unicode_to_shortcodes("🇫🇷"), ":fr:");
    }

    #[test]
    fn test_mixed_text_passthrough() {
        assert_eq!(unicode_to_shortcodes("ok 🙂 bye"), "ok :slightly_smiling_face: bye");
    }

    #[test]
    fn test_round_trip() {
        for sample in ["🙂", "😀", "🍇"] {
            assert_eq!(shortcode_to_unicode(&unicode_to_shortcodes(sample)), sample);
        }
    }
}
