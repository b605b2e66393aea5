//! Terminal output formatting
//!
//! Colored printing helpers plus the layout of toots, user cards and
//! notifications. Status bodies go through [`TootParser`]; everything else
//! (account bios) is stripped with the simple entity-decode + tag-strip
//! fallback since bios carry no links worth collecting.

use crossterm::style::{Color, Stylize};
use unicode_width::UnicodeWidthStr;

use crate::models::{Account, List, Notification, Status};
use crate::render::TootParser;
use crate::shell::IdMap;

/// Glyphs used in status and user lines
pub mod glyphs {
    /// Favorite marker
    pub const FAV: &str = "♥";
    /// Boost marker
    pub const BOOST: &str = "🔁";
    /// Reply marker
    pub const REPLY: &str = "💬";
    /// Locked (follow-approval) account marker
    pub const LOCKED: &str = "🔒";
    /// Status count marker
    pub const TOOTS: &str = "📪";
    /// Following count marker
    pub const FOLLOWING: &str = "👣";
    /// Follower count marker
    pub const FOLLOWED_BY: &str = "🐾";
}

/// Display preferences threaded through the printers
#[derive(Debug, Clone, Copy)]
pub struct DisplayPrefs {
    /// Shorten displayed links the way browsers do
    pub shorten_links: bool,
    /// Render display-name emoji as `:shortcodes:` instead of glyphs
    pub emoji_shortcodes: bool,
}

/// Print `text` in `color`, followed by a newline
pub fn cprint(text: &str, color: Color) {
    println!("{}", text.with(color));
}

/// Username with the lock glyph for approval-required accounts
pub fn format_username(account: &Account) -> String {
    if account.locked {
        format!("{} {}", account.handle(), glyphs::LOCKED)
    } else {
        account.handle()
    }
}

/// Display name with emoji rendered as shortcodes when the terminal should
/// avoid glyphs
pub fn format_display_name(name: &str, emoji_to_shortcode: bool) -> String {
    if emoji_to_shortcode {
        crate::render::emoji::unicode_to_shortcodes(name)
    } else {
        name.to_string()
    }
}

/// Status / following / follower counts on one line
pub fn format_user_counts(account: &Account) -> String {
    format!(
        "{} :{} {} :{} {} :{}",
        glyphs::TOOTS,
        account.statuses_count,
        glyphs::FOLLOWING,
        account.following_count,
        glyphs::FOLLOWED_BY,
        account.followers_count,
    )
}

/// Name line: display name, handle, relative age — age right-aligned when
/// the terminal is wide enough
pub fn format_toot_nameline(status: &Status, width: usize, prefs: DisplayPrefs) -> String {
    let left = format!(
        "{} {}",
        format_display_name(&status.account.display_name, prefs.emoji_shortcodes),
        format_username(&status.account),
    );
    let age = status.relative_time();
    let used = left.width() + age.width();
    if width > used + 1 {
        format!("{}{}{}", left, " ".repeat(width - used), age)
    } else {
        format!("{left} {age}")
    }
}

/// Counter line: local id, favorites, boosts, replies, visibility
pub fn format_toot_idline(status: &Status, local_id: usize) -> String {
    format!(
        "id:{}  {}:{}  {}:{}  {}:{}  {}",
        local_id,
        glyphs::FAV,
        status.favourites_count,
        glyphs::BOOST,
        status.reblogs_count,
        glyphs::REPLY,
        status.replies_count,
        status.visibility,
    )
}

/// Media attachment summary lines
pub fn format_media(status: &Status) -> Vec<String> {
    let mut lines = vec![format!(
        "  media: {}{}",
        status.media_attachments.len(),
        if status.sensitive { " (sensitive)" } else { "" },
    )];
    for media in &status.media_attachments {
        if let Some(url) = &media.url {
            lines.push(format!(
                "    [{}] {} {}",
                media.media_type,
                url,
                media.description.as_deref().unwrap_or(""),
            ));
        }
    }
    lines
}

/// Render one status body to plain text plus its web links
pub fn render_content(html: &str, shorten_links: bool) -> (String, Vec<String>) {
    let mut parser = TootParser::new(shorten_links);
    parser.parse(html);
    let text = parser.pop_line();
    (text, parser.weblinks())
}

fn term_width() -> usize {
    textwrap::termwidth().clamp(40, 100)
}

/// Print one toot: name line, wrapped body, media, counters
pub fn print_toot(status: &Status, ids: &mut IdMap, prefs: DisplayPrefs) {
    let width = term_width();

    if status.reblog.is_some() {
        cprint(
            &format!(
                "{} boosted by {}",
                glyphs::BOOST,
                format_username(&status.account)
            ),
            Color::DarkGrey,
        );
    }
    let original = status.original();
    let local_id = ids.to_local(&original.id);

    cprint(&format_toot_nameline(original, width, prefs), Color::Green);

    if !original.spoiler_text.is_empty() {
        cprint(&format!("  CW: {}", original.spoiler_text), Color::Red);
    }

    let (text, _) = render_content(&original.content, prefs.shorten_links);
    let options = textwrap::Options::new(width)
        .initial_indent("  ")
        .subsequent_indent("  ");
    println!("{}", textwrap::fill(&text, options));

    if let Some(poll) = &original.poll {
        for (index, option) in poll.options.iter().enumerate() {
            let votes = option
                .votes_count
                .map_or_else(String::new, |n| format!(" ({n})"));
            println!("  [{}] {}{}", index + 1, option.title, votes);
        }
        if poll.expired {
            cprint("  poll closed", Color::DarkGrey);
        }
    }

    if !original.media_attachments.is_empty() {
        for line in format_media(original) {
            cprint(&line, Color::Magenta);
        }
    }

    cprint(
        &format!("  {}", format_toot_idline(original, local_id)),
        Color::DarkGrey,
    );
}

/// Print a batch of toots with a context header
pub fn print_toots(statuses: &[Status], ids: &mut IdMap, prefs: DisplayPrefs, ctx_name: &str) {
    if statuses.is_empty() {
        cprint(&format!("  Nothing to show in {ctx_name}"), Color::Yellow);
        return;
    }
    cprint(&format!("=== {ctx_name} ==="), Color::Cyan);
    // Oldest first, so the newest toot ends up next to the prompt.
    for status in statuses.iter().rev() {
        println!();
        print_toot(status, ids, prefs);
    }
}

/// Print a full user card with bio
pub fn print_user(account: &Account, prefs: DisplayPrefs) {
    cprint(
        &format_display_name(&account.display_name, prefs.emoji_shortcodes),
        Color::Cyan,
    );
    cprint(&format_username(account), Color::Green);
    println!("{}", account.url);
    cprint(&format_user_counts(account), Color::DarkGrey);

    // Bios are HTML too, but plain stripping is enough here.
    let note = html_escape::decode_html_entities(&account.note).to_string();
    let note = regex_lite::Regex::new(r"<[^>]+>")
        .map(|re| re.replace_all(&note, "").to_string())
        .unwrap_or(note);
    if !note.trim().is_empty() {
        println!("{}", textwrap::fill(note.trim(), term_width()));
    }
}

/// One-line user summary
pub fn format_user_short(account: &Account, prefs: DisplayPrefs) -> String {
    format!(
        "  {} {} (id: {})",
        format_display_name(&account.display_name, prefs.emoji_shortcodes),
        format_username(account),
        account.id,
    )
}

/// Print a one-line user summary
pub fn print_user_short(account: &Account, prefs: DisplayPrefs) {
    println!("{}", format_user_short(account, prefs));
}

/// Print a list title and ID
pub fn print_list(list: &List) {
    print!("{}", list.title.as_str().with(Color::Cyan));
    println!("{}", format!(" (id: {})", list.id).with(Color::Red));
}

/// Print one notification
pub fn print_notification(notification: &Notification, ids: &mut IdMap, prefs: DisplayPrefs) {
    let who = format_username(&notification.account);
    match notification.kind.as_str() {
        "mention" => {
            cprint(&format!("{who} mentioned you:"), Color::Magenta);
            if let Some(status) = &notification.status {
                print_toot(status, ids, prefs);
            }
        }
        "favourite" => cprint(
            &format!("{} {who} favorited your toot", glyphs::FAV),
            Color::Yellow,
        ),
        "reblog" => cprint(
            &format!("{} {who} boosted your toot", glyphs::BOOST),
            Color::Yellow,
        ),
        "follow" => cprint(&format!("{who} followed you"), Color::Green),
        other => cprint(&format!("{who}: {other}"), Color::DarkGrey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(locked: bool) -> Account {
        Account {
            id: "1".to_string(),
            username: "test_account".to_string(),
            acct: "test_account".to_string(),
            display_name: "Test Account".to_string(),
            locked,
            note: String::new(),
            url: "https://example.social/@test_account".to_string(),
            statuses_count: 50,
            following_count: 30,
            followers_count: 100,
            created_at: None,
        }
    }

    fn prefs(emoji_shortcodes: bool) -> DisplayPrefs {
        DisplayPrefs {
            shorten_links: true,
            emoji_shortcodes,
        }
    }

    #[test]
    fn test_format_username_locked() {
        assert_eq!(format_username(&account(true)), "@test_account 🔒");
    }

    #[test]
    fn test_format_username_unlocked() {
        assert_eq!(format_username(&account(false)), "@test_account");
    }

    #[test]
    fn test_format_user_counts() {
        assert_eq!(
            format_user_counts(&account(false)),
            "📪 :50 👣 :30 🐾 :100"
        );
    }

    #[test]
    fn test_format_display_name_passthrough() {
        assert_eq!(format_display_name("emoji", false), "emoji");
        assert_eq!(
            format_display_name("hi 🙂", true),
            "hi :slightly_smiling_face:"
        );
    }

    #[test]
    fn test_format_user_short_respects_emoji_preference() {
        let mut glyphy = account(false);
        glyphy.display_name = "Glyphy 🙂".to_string();
        assert_eq!(
            format_user_short(&glyphy, prefs(false)),
            "  Glyphy 🙂 @test_account (id: 1)"
        );
        assert_eq!(
            format_user_short(&glyphy, prefs(true)),
            "  Glyphy :slightly_smiling_face: @test_account (id: 1)"
        );
    }

    #[test]
    fn test_render_content_collects_weblinks() {
        let html = r#"<p>see <a href="https://a.example/x">link</a> and <a href="https://b.example" class="mention">@b</a></p>"#;
        let (text, weblinks) = render_content(html, true);
        assert_eq!(text, "see link and @b");
        assert_eq!(weblinks, vec!["https://a.example/x", "https://b.example"]);
    }
}
