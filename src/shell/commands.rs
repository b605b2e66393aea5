//! Shell command handlers
//!
//! One method per REPL command. Handlers resolve local toot numbers and
//! user arguments, call the API client and print through [`crate::format`].

use anyhow::{anyhow, bail, Result};
use crossterm::style::Color;

use crate::api::mastodon::NewStatus;
use crate::format::{self, cprint};
use crate::models::Status;

use super::{args, Shell};

impl Shell {
    /// Resolve a local toot number to its server ID
    fn to_global(&self, local: &str) -> Result<String> {
        self.ids
            .to_global(local)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Unknown toot id '{local}'"))
    }

    /// Resolve a user argument (`@name`, `name@domain` or a numeric ID) to
    /// an account ID, searching the instance when needed
    async fn get_unique_userid(&self, rest: &str) -> Result<String> {
        let name = rest.trim().trim_start_matches('@');
        if name.is_empty() {
            bail!("User argument missing.");
        }
        if name.chars().all(|c| c.is_ascii_digit()) {
            return Ok(name.to_string());
        }

        let matches = self.client.account_search(name, Some(5)).await?;
        if let Some(account) = matches
            .iter()
            .find(|a| a.acct.eq_ignore_ascii_case(name) || a.username.eq_ignore_ascii_case(name))
        {
            return Ok(account.id.clone());
        }
        match matches.len() {
            0 => bail!("user {rest} not found"),
            1 => Ok(matches[0].id.clone()),
            n => bail!("user {rest} is ambiguous ({n} matches); use id or full handle"),
        }
    }

    /// Resolve a list argument (title or numeric ID) to a list ID
    async fn get_list_id(&self, rest: &str) -> Result<String> {
        let arg = rest.trim();
        if arg.is_empty() {
            bail!("List argument missing.");
        }
        if arg.chars().all(|c| c.is_ascii_digit()) {
            return Ok(arg.to_string());
        }
        let lists = self.client.lists().await?;
        lists
            .into_iter()
            .find(|list| list.title == arg)
            .map(|list| list.id)
            .ok_or_else(|| anyhow!("List '{arg}' is not found."))
    }

    fn rendered(&self, status: &Status) -> String {
        format::render_content(&status.original().content, self.prefs.shorten_links).0
    }

    fn limit_or_default(&self, limit: Option<usize>) -> Option<usize> {
        limit.or(Some(self.fetch_limit))
    }

    // ==================== Posting ====================

    pub(super) async fn toot(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: toot <text>");
        }
        let status = self
            .client
            .post_status(&NewStatus {
                status: rest.to_string(),
                ..Default::default()
            })
            .await?;
        cprint(
            &format!("  You tooted:\n  {}", self.rendered(&status)),
            Color::Magenta,
        );
        Ok(())
    }

    pub(super) async fn reply(&mut self, rest: &str) -> Result<()> {
        let Some((local, text)) = rest.split_once(char::is_whitespace) else {
            bail!("Usage: rep <id> <text>");
        };
        let parent_id = self.to_global(local)?;
        let parent = self.client.status(&parent_id).await?;

        // The reply must mention the original author to reach them.
        let mention = parent.account.handle();
        let text = text.trim();
        let body = if text.contains(&mention) {
            text.to_string()
        } else {
            format!("{mention} {text}")
        };

        let status = self
            .client
            .post_status(&NewStatus {
                status: body,
                in_reply_to_id: Some(parent.id.clone()),
                visibility: Some(parent.visibility.clone()),
                ..Default::default()
            })
            .await?;
        cprint(
            &format!("  You replied:\n  {}", self.rendered(&status)),
            Color::Magenta,
        );
        Ok(())
    }

    pub(super) async fn delete(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: delete <id>");
        }
        let id = self.to_global(rest)?;
        self.client.delete_status(&id).await?;
        println!("Poof! It's gone.");
        Ok(())
    }

    // ==================== Timelines ====================

    pub(super) async fn home(&mut self, rest: &str) -> Result<()> {
        self.context = None;
        let (limit, _) = args::limit_flag(rest);
        let statuses = self
            .client
            .timeline_home(self.limit_or_default(limit))
            .await?;
        format::print_toots(&statuses, &mut self.ids, self.prefs, "home");
        Ok(())
    }

    pub(super) async fn public(&mut self, rest: &str, local: bool) -> Result<()> {
        self.context = None;
        let (limit, _) = args::limit_flag(rest);
        let statuses = self
            .client
            .timeline_public(local, self.limit_or_default(limit))
            .await?;
        let ctx_name = if local { "local" } else { "federated" };
        format::print_toots(&statuses, &mut self.ids, self.prefs, ctx_name);
        Ok(())
    }

    pub(super) async fn tag(&mut self, rest: &str) -> Result<()> {
        self.context = None;
        let (tag, limit) = args::rest_limit(rest);
        let tag = tag.trim_start_matches('#');
        if tag.is_empty() {
            bail!("Usage: tag <tag> [limit]");
        }
        let statuses = self
            .client
            .timeline_tag(tag, self.limit_or_default(limit))
            .await?;
        format::print_toots(&statuses, &mut self.ids, self.prefs, &format!("#{tag}"));
        Ok(())
    }

    pub(super) async fn thread(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: thread <id>");
        }
        let id = self.to_global(rest)?;
        let status = self.client.status(&id).await?;
        let thread = self.client.status_context(&id).await?;

        cprint("=== thread ===", Color::Cyan);
        for ancestor in &thread.ancestors {
            println!();
            format::print_toot(ancestor, &mut self.ids, self.prefs);
        }
        println!();
        format::print_toot(&status, &mut self.ids, self.prefs);
        for descendant in &thread.descendants {
            println!();
            format::print_toot(descendant, &mut self.ids, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn view(&mut self, rest: &str) -> Result<()> {
        self.context = None;
        let (user, limit) = args::rest_limit(rest);
        if user.is_empty() {
            bail!("Usage: view <user> [limit]");
        }
        let userid = self.get_unique_userid(&user).await?;
        let statuses = self
            .client
            .account_statuses(&userid, self.limit_or_default(limit))
            .await?;
        format::print_toots(
            &statuses,
            &mut self.ids,
            self.prefs,
            &format!("{user} timeline"),
        );
        Ok(())
    }

    pub(super) async fn history(&mut self, rest: &str) -> Result<()> {
        self.context = None;
        let (limit, _) = args::limit_flag(rest);
        let me = self.client.verify_credentials().await?;
        let statuses = self
            .client
            .account_statuses(&me.id, self.limit_or_default(limit))
            .await?;
        format::print_toots(&statuses, &mut self.ids, self.prefs, "history");
        Ok(())
    }

    pub(super) async fn links(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: links <id>");
        }
        let id = self.to_global(rest)?;
        let status = self.client.status(&id).await?;
        let original = status.original();

        let mut parser = crate::render::TootParser::new(self.prefs.shorten_links);
        parser.parse(&original.content);
        let mut targets = parser.weblinks();
        targets.extend(
            original
                .media_attachments
                .iter()
                .filter_map(|media| media.url.clone()),
        );

        if targets.is_empty() {
            cprint("  No links in this toot", Color::Yellow);
            return Ok(());
        }
        for (index, target) in targets.iter().enumerate() {
            println!("  [{}] {}", index + 1, target);
        }
        Ok(())
    }

    pub(super) async fn open(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: open <id>");
        }
        let id = self.to_global(rest)?;
        let status = self.client.status(&id).await?;
        let Some(url) = status.original().url.clone() else {
            bail!("This toot has no web URL");
        };
        open::that(&url)?;
        cprint(&format!("  Opened {url}"), Color::Green);
        Ok(())
    }

    // ==================== Favorites, boosts & bookmarks ====================

    pub(super) async fn fav(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: fav <id>[,<id>...]");
        }
        for local in rest.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id = self.to_global(local)?;
            let status = self.client.favourite(&id).await?;
            cprint(
                &format!("  Favorited ({local}):\n  {}", self.rendered(&status)),
                Color::Yellow,
            );
        }
        Ok(())
    }

    pub(super) async fn unfav(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: unfav <id>[,<id>...]");
        }
        for local in rest.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id = self.to_global(local)?;
            let status = self.client.unfavourite(&id).await?;
            cprint(
                &format!("  Removed favorite ({local}):\n  {}", self.rendered(&status)),
                Color::Yellow,
            );
        }
        Ok(())
    }

    pub(super) async fn faves(&mut self, rest: &str) -> Result<()> {
        self.context = None;
        let (limit, _) = args::limit_flag(rest);
        let statuses = self
            .client
            .favourites(self.limit_or_default(limit))
            .await?;
        format::print_toots(&statuses, &mut self.ids, self.prefs, "faves");
        Ok(())
    }

    pub(super) async fn boost(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: boost <id>");
        }
        let id = self.to_global(rest)?;
        self.client.reblog(&id).await?;
        let status = self.client.status(&id).await?;
        cprint(
            &format!("  Boosted:\n  {}", self.rendered(&status)),
            Color::Green,
        );
        Ok(())
    }

    pub(super) async fn unboost(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: unboost <id>");
        }
        let id = self.to_global(rest)?;
        self.client.unreblog(&id).await?;
        let status = self.client.status(&id).await?;
        cprint(
            &format!("  Removed boost:\n  {}", self.rendered(&status)),
            Color::DarkGrey,
        );
        Ok(())
    }

    pub(super) async fn bookmark(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: bookmark <id>[,<id>...]");
        }
        for local in rest.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id = self.to_global(local)?;
            let status = self.client.bookmark(&id).await?;
            cprint(
                &format!("  Bookmarked ({local}):\n  {}", self.rendered(&status)),
                Color::Cyan,
            );
        }
        Ok(())
    }

    pub(super) async fn unbookmark(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            bail!("Usage: unbookmark <id>[,<id>...]");
        }
        for local in rest.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let id = self.to_global(local)?;
            let status = self.client.unbookmark(&id).await?;
            cprint(
                &format!("  Removed bookmark ({local}):\n  {}", self.rendered(&status)),
                Color::DarkGrey,
            );
        }
        Ok(())
    }

    pub(super) async fn bookmarks(&mut self, rest: &str) -> Result<()> {
        self.context = None;
        let (limit, _) = args::limit_flag(rest);
        let statuses = self
            .client
            .bookmarks(self.limit_or_default(limit))
            .await?;
        format::print_toots(&statuses, &mut self.ids, self.prefs, "bookmarks");
        Ok(())
    }

    pub(super) async fn vote(&mut self, rest: &str) -> Result<()> {
        let Some((local, choices)) = rest.split_once(char::is_whitespace) else {
            bail!("Usage: vote <id> <choice>[,<choice>...]");
        };
        let id = self.to_global(local)?;
        let status = self.client.status(&id).await?;
        let Some(poll) = status.original().poll.clone() else {
            cprint("  This toot has no poll", Color::Yellow);
            return Ok(());
        };

        let choices: Vec<usize> = choices
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .ok_or_else(|| anyhow!("Invalid choice '{s}'"))
            })
            .collect::<Result<_>>()?;
        if choices.is_empty() {
            bail!("Usage: vote <id> <choice>[,<choice>...]");
        }
        if !poll.multiple && choices.len() > 1 {
            cprint("  This poll accepts a single choice", Color::Yellow);
            return Ok(());
        }

        self.client.poll_vote(&poll.id, &choices).await?;
        cprint("  Vote cast", Color::Green);
        Ok(())
    }

    // ==================== Notifications ====================

    pub(super) async fn note(&mut self, rest: &str) -> Result<()> {
        let (limit, _) = args::limit_flag(rest);
        let notifications = self
            .client
            .notifications(self.limit_or_default(limit))
            .await?;
        if notifications.is_empty() {
            cprint("  No notifications", Color::Yellow);
            return Ok(());
        }
        for notification in notifications.iter().rev() {
            println!();
            cprint(&format!("(note {})", notification.id), Color::DarkGrey);
            format::print_notification(notification, &mut self.ids, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn mentions(&mut self, rest: &str) -> Result<()> {
        let (limit, _) = args::limit_flag(rest);
        let notifications = self
            .client
            .notifications(self.limit_or_default(limit))
            .await?;
        let mentions: Vec<_> = notifications
            .into_iter()
            .filter(|n| n.kind == "mention")
            .collect();
        if mentions.is_empty() {
            cprint("  No mentions", Color::Yellow);
            return Ok(());
        }
        for notification in mentions.iter().rev() {
            println!();
            format::print_notification(notification, &mut self.ids, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn dismiss(&mut self, rest: &str) -> Result<()> {
        if rest.is_empty() {
            self.client.clear_notifications().await?;
            cprint("  All notifications dismissed", Color::Green);
            return Ok(());
        }
        for id in rest.split_whitespace() {
            self.client.dismiss_notification(id).await?;
            cprint(&format!("  Dismissed {id}"), Color::Green);
        }
        Ok(())
    }

    // ==================== Users ====================

    pub(super) async fn me(&mut self) -> Result<()> {
        let account = self.client.verify_credentials().await?;
        format::print_user(&account, self.prefs);
        Ok(())
    }

    pub(super) async fn whois(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        let account = self.client.account(&userid).await?;
        format::print_user(&account, self.prefs);
        Ok(())
    }

    pub(super) async fn follow(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        let relationship = self.client.follow(&userid).await?;
        if relationship.following {
            let account = self.client.account(&userid).await?;
            cprint(
                &format!("  {} is now followed", account.handle()),
                Color::Blue,
            );
        }
        Ok(())
    }

    pub(super) async fn unfollow(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        let relationship = self.client.unfollow(&userid).await?;
        if !relationship.following {
            cprint(&format!("  user {userid} is now unfollowed"), Color::Blue);
        }
        Ok(())
    }

    pub(super) async fn followers(&mut self, rest: &str) -> Result<()> {
        let (limit, _) = args::limit_flag(rest);
        let me = self.client.verify_credentials().await?;
        let users = self.client.followers(&me.id, limit).await?;
        if users.is_empty() {
            cprint("  No one follows you (... yet)", Color::Red);
            return Ok(());
        }
        cprint(&format!("  Your followers ({}):", users.len()), Color::Magenta);
        for user in &users {
            format::print_user_short(user, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn following(&mut self, rest: &str) -> Result<()> {
        let (limit, _) = args::limit_flag(rest);
        let me = self.client.verify_credentials().await?;
        let users = self.client.following(&me.id, limit).await?;
        if users.is_empty() {
            cprint("  You aren't following anyone", Color::Red);
            return Ok(());
        }
        cprint(
            &format!("  People you follow ({}):", users.len()),
            Color::Magenta,
        );
        for user in &users {
            format::print_user_short(user, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn block(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        let relationship = self.client.block(&userid).await?;
        if relationship.blocking {
            cprint(&format!("  user {userid} is now blocked"), Color::Red);
        }
        Ok(())
    }

    pub(super) async fn unblock(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        let relationship = self.client.unblock(&userid).await?;
        if !relationship.blocking {
            cprint(&format!("  user {userid} is now unblocked"), Color::Blue);
        }
        Ok(())
    }

    pub(super) async fn mute(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        let relationship = self.client.mute(&userid).await?;
        if relationship.muting {
            cprint(&format!("  user {userid} is now muted"), Color::Red);
        }
        Ok(())
    }

    pub(super) async fn unmute(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        let relationship = self.client.unmute(&userid).await?;
        if !relationship.muting {
            cprint(&format!("  user {userid} is now unmuted"), Color::Blue);
        }
        Ok(())
    }

    pub(super) async fn blocks(&mut self, rest: &str) -> Result<()> {
        let (limit, _) = args::limit_flag(rest);
        let users = self.client.blocks(limit).await?;
        if users.is_empty() {
            cprint("  You haven't blocked anyone (... yet)", Color::Red);
            return Ok(());
        }
        cprint("  You have blocked:", Color::Magenta);
        for user in &users {
            format::print_user_short(user, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn mutes(&mut self, rest: &str) -> Result<()> {
        let (limit, _) = args::limit_flag(rest);
        let users = self.client.mutes(limit).await?;
        if users.is_empty() {
            cprint("  You haven't muted anyone (... yet)", Color::Red);
            return Ok(());
        }
        cprint("  You have muted:", Color::Magenta);
        for user in &users {
            format::print_user_short(user, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn requests(&mut self) -> Result<()> {
        let users = self.client.follow_requests().await?;
        if users.is_empty() {
            cprint("  You have no incoming requests", Color::Red);
            return Ok(());
        }
        cprint("  These users want to follow you:", Color::Magenta);
        cprint("  run 'accept <id>' to accept", Color::Magenta);
        cprint("   or 'reject <id>' to reject", Color::Magenta);
        for user in &users {
            format::print_user_short(user, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn accept(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        self.client.authorize_follow(&userid).await?;
        cprint(
            &format!("  user {rest}'s follow request is accepted"),
            Color::Green,
        );
        Ok(())
    }

    pub(super) async fn reject(&mut self, rest: &str) -> Result<()> {
        let userid = self.get_unique_userid(rest).await?;
        self.client.reject_follow(&userid).await?;
        cprint(
            &format!("  user {rest}'s follow request is rejected"),
            Color::Blue,
        );
        Ok(())
    }

    // ==================== Lists ====================

    pub(super) async fn lists(&mut self) -> Result<()> {
        let lists = self.client.lists().await?;
        if lists.is_empty() {
            cprint("  You have no lists", Color::Yellow);
            return Ok(());
        }
        for list in &lists {
            format::print_list(list);
        }
        Ok(())
    }

    pub(super) async fn list_create(&mut self, rest: &str) -> Result<()> {
        let title = rest.trim();
        if title.is_empty() {
            bail!("Usage: listcreate <title>");
        }
        let list = self.client.create_list(title).await?;
        cprint(&format!("  List '{}' created", list.title), Color::Green);
        Ok(())
    }

    pub(super) async fn list_rename(&mut self, rest: &str) -> Result<()> {
        let Some((list_arg, title)) = rest.split_once(char::is_whitespace) else {
            bail!("Usage: listrename <list> <title>");
        };
        let list_id = self.get_list_id(list_arg).await?;
        let list = self.client.rename_list(&list_id, title.trim()).await?;
        cprint(&format!("  List renamed to '{}'", list.title), Color::Green);
        Ok(())
    }

    pub(super) async fn list_destroy(&mut self, rest: &str) -> Result<()> {
        let list_id = self.get_list_id(rest).await?;
        self.client.delete_list(&list_id).await?;
        cprint("  List deleted", Color::Green);
        Ok(())
    }

    pub(super) async fn list_add(&mut self, rest: &str) -> Result<()> {
        let Some((list_arg, user)) = rest.split_once(char::is_whitespace) else {
            bail!("Usage: listadd <list> <user>");
        };
        let list_id = self.get_list_id(list_arg).await?;
        let userid = self.get_unique_userid(user).await?;
        self.client
            .list_add_accounts(&list_id, &[userid])
            .await?;
        cprint(&format!("  Added {user} to the list"), Color::Green);
        Ok(())
    }

    pub(super) async fn list_remove(&mut self, rest: &str) -> Result<()> {
        let Some((list_arg, user)) = rest.split_once(char::is_whitespace) else {
            bail!("Usage: listremove <list> <user>");
        };
        let list_id = self.get_list_id(list_arg).await?;
        let userid = self.get_unique_userid(user).await?;
        self.client
            .list_remove_accounts(&list_id, &[userid])
            .await?;
        cprint(&format!("  Removed {user} from the list"), Color::Green);
        Ok(())
    }

    pub(super) async fn list_accounts(&mut self, rest: &str) -> Result<()> {
        let list_id = self.get_list_id(rest).await?;
        let users = self.client.list_accounts(&list_id).await?;
        if users.is_empty() {
            cprint("  This list is empty", Color::Yellow);
            return Ok(());
        }
        for user in &users {
            format::print_user_short(user, self.prefs);
        }
        Ok(())
    }

    pub(super) async fn list_home(&mut self, rest: &str) -> Result<()> {
        let list_id = self.get_list_id(rest).await?;
        let statuses = self
            .client
            .timeline_list(&list_id, Some(self.fetch_limit))
            .await?;
        self.context = Some(rest.trim().to_string());
        format::print_toots(
            &statuses,
            &mut self.ids,
            self.prefs,
            &format!("list {}", rest.trim()),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{IdMap, HELP};
    use super::Shell;
    use crate::api::MastodonClient;
    use crate::format::DisplayPrefs;

    // Unreachable address so handlers fail fast after their local work.
    fn offline_shell() -> Shell {
        Shell {
            client: MastodonClient::new("http://127.0.0.1:1", "token"),
            ids: IdMap::new(),
            prefs: DisplayPrefs {
                shorten_links: true,
                emoji_shortcodes: false,
            },
            fetch_limit: 20,
            username: "tester".to_string(),
            profile: "default".to_string(),
            context: Some("friends".to_string()),
        }
    }

    #[tokio::test]
    async fn test_home_clears_list_context() {
        let mut shell = offline_shell();
        let _ = shell.home("").await;
        assert_eq!(shell.context, None);
    }

    #[tokio::test]
    async fn test_local_timeline_clears_list_context() {
        let mut shell = offline_shell();
        let _ = shell.public("", true).await;
        assert_eq!(shell.context, None);
    }

    #[tokio::test]
    async fn test_tag_timeline_clears_list_context() {
        let mut shell = offline_shell();
        let _ = shell.tag("rust").await;
        assert_eq!(shell.context, None);
    }

    #[tokio::test]
    async fn test_view_clears_list_context() {
        let mut shell = offline_shell();
        let _ = shell.view("12345").await;
        assert_eq!(shell.context, None);
    }

    #[test]
    fn test_help_lists_saved_toot_commands() {
        for command in ["bookmark", "unbookmark", "bookmarks", "faves", "history"] {
            assert!(HELP.contains(command), "help is missing '{command}'");
        }
    }
}
