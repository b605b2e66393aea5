//! Interactive shell
//!
//! The REPL reads one line at a time, splits off the command word and
//! hands the rest to the matching handler in [`commands`]. Handler errors
//! are printed and the loop keeps going; only `quit` (or EOF) ends the
//! session.

pub mod args;
mod commands;
mod ids;

use std::io::Write;

use anyhow::{Context, Result};
use crossterm::style::Color;

use crate::api::mastodon::oauth;
use crate::api::MastodonClient;
use crate::config::{Config, Profile};
use crate::format::{cprint, DisplayPrefs};

pub use ids::IdMap;

/// State for one interactive session
pub struct Shell {
    client: MastodonClient,
    ids: IdMap,
    prefs: DisplayPrefs,
    fetch_limit: usize,
    username: String,
    profile: String,
    /// Browsing context shown in the prompt (e.g. the active list)
    context: Option<String>,
}

impl Shell {
    /// Connect with the given profile and verify its credentials
    pub async fn new(config: &Config, profile_name: &str, profile: &Profile) -> Result<Self> {
        let client = MastodonClient::new(&profile.instance, &profile.token);
        let account = client
            .verify_credentials()
            .await
            .context("Could not verify credentials; try deleting the profile and logging in again")?;
        tracing::debug!("logged in as @{}", account.acct);

        Ok(Self {
            client,
            ids: IdMap::new(),
            prefs: DisplayPrefs {
                shorten_links: config.shorten_links,
                emoji_shortcodes: config.emoji_shortcodes,
            },
            fetch_limit: config.fetch_limit,
            username: account.acct,
            profile: profile_name.to_string(),
            context: None,
        })
    }

    /// Run the REPL until `quit` or EOF
    pub async fn run(&mut self) -> Result<()> {
        cprint(
            "Welcome to tootline! Type 'help' for a list of commands.",
            Color::Cyan,
        );

        let stdin = std::io::stdin();
        loop {
            let prompt = args::update_prompt(&self.username, self.context.as_deref(), &self.profile);
            print!("{prompt}");
            std::io::stdout().flush().context("Failed to flush stdout")?;

            let mut line = String::new();
            let read = stdin.read_line(&mut line).context("Failed to read input")?;
            if read == 0 {
                // EOF
                println!();
                return Ok(());
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (command, rest) = match line.split_once(char::is_whitespace) {
                Some((command, rest)) => (command, rest.trim()),
                None => (line, ""),
            };

            match self.dispatch(command, rest).await {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(error) => cprint(&format!("  error: {error:#}"), Color::Red),
            }
        }
    }

    /// Route one command line; returns false when the session should end
    async fn dispatch(&mut self, command: &str, rest: &str) -> Result<bool> {
        match command {
            "help" | "?" => Self::help(),
            "quit" | "exit" | "q" => return Ok(false),

            "toot" | "t" => self.toot(rest).await?,
            "rep" | "reply" => self.reply(rest).await?,
            "delete" | "del" => self.delete(rest).await?,

            "home" | "h" => self.home(rest).await?,
            "local" | "l" => self.public(rest, true).await?,
            "fed" | "public" => self.public(rest, false).await?,
            "tag" => self.tag(rest).await?,
            "thread" => self.thread(rest).await?,
            "view" => self.view(rest).await?,
            "links" => self.links(rest).await?,
            "open" => self.open(rest).await?,

            "fav" => self.fav(rest).await?,
            "unfav" => self.unfav(rest).await?,
            "faves" => self.faves(rest).await?,
            "boost" | "rt" => self.boost(rest).await?,
            "unboost" => self.unboost(rest).await?,
            "bookmark" => self.bookmark(rest).await?,
            "unbookmark" => self.unbookmark(rest).await?,
            "bookmarks" => self.bookmarks(rest).await?,
            "history" => self.history(rest).await?,
            "vote" => self.vote(rest).await?,

            "note" | "n" => self.note(rest).await?,
            "mentions" => self.mentions(rest).await?,
            "dismiss" => self.dismiss(rest).await?,

            "me" | "info" => self.me().await?,
            "whois" | "user" => self.whois(rest).await?,
            "follow" => self.follow(rest).await?,
            "unfollow" => self.unfollow(rest).await?,
            "followers" => self.followers(rest).await?,
            "following" => self.following(rest).await?,
            "block" => self.block(rest).await?,
            "unblock" => self.unblock(rest).await?,
            "mute" => self.mute(rest).await?,
            "unmute" => self.unmute(rest).await?,
            "blocks" => self.blocks(rest).await?,
            "mutes" => self.mutes(rest).await?,
            "requests" => self.requests().await?,
            "accept" => self.accept(rest).await?,
            "reject" => self.reject(rest).await?,

            "lists" => self.lists().await?,
            "listcreate" => self.list_create(rest).await?,
            "listrename" => self.list_rename(rest).await?,
            "listdestroy" => self.list_destroy(rest).await?,
            "listadd" => self.list_add(rest).await?,
            "listremove" => self.list_remove(rest).await?,
            "listaccounts" => self.list_accounts(rest).await?,
            "listhome" => self.list_home(rest).await?,

            other => cprint(
                &format!("  Unknown command '{other}'; try 'help'"),
                Color::Red,
            ),
        }
        Ok(true)
    }

    fn help() {
        println!("{HELP}");
    }
}

const HELP: &str = r"Commands:
  toot <text>                 Post a toot (t)
  rep <id> <text>             Reply to a toot
  delete <id>                 Delete your toot
  home [n]                    Home timeline (h)
  local [n] / fed [n]         Local / federated public timeline
  tag <tag> [n]               Hashtag timeline
  thread <id>                 Show the conversation around a toot
  view <user> [n]             A user's recent toots
  links <id>                  List the links in a toot
  open <id>                   Open a toot in the browser
  fav/unfav <id>[,<id>...]    (Un)favorite toots
  faves [n]                   Toots you have favorited
  boost/unboost <id>          (Un)boost a toot
  bookmark/unbookmark <id>    (Un)bookmark toots (also: bookmarks)
  history [n]                 Your own recent toots
  vote <id> <choice>[,...]    Vote on a toot's poll
  note [n] / mentions         Notifications / just mentions (n)
  dismiss [id]                Dismiss one or all notifications
  me / whois <user>           Profiles
  follow/unfollow <user>      Manage follows
  followers / following [n]   Who follows you / whom you follow
  block/unblock <user>        Manage blocks (also: blocks)
  mute/unmute <user>          Manage mutes (also: mutes)
  requests / accept / reject  Handle follow requests
  lists                       Your lists
  listcreate <title>          Create a list
  listrename <list> <title>   Rename a list
  listdestroy <list>          Delete a list
  listadd <list> <user>       Add a user to a list
  listremove <list> <user>    Remove a user from a list
  listaccounts <list>         Users in a list
  listhome <list>             A list's timeline
  help                        This text
  quit                        Leave the shell";

/// Interactive OAuth login: register the app, send the user to the
/// authorization URL, trade the code for a token and persist the profile.
pub async fn login(config: &mut Config, profile_name: &str) -> Result<Profile> {
    cprint(
        &format!("Setting up profile '{profile_name}'"),
        Color::Cyan,
    );
    print!("Which instance (e.g. mastodon.social)? ");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut instance = String::new();
    std::io::stdin()
        .read_line(&mut instance)
        .context("Failed to read instance")?;
    let instance = instance.trim();
    let instance = if instance.starts_with("http") {
        instance.to_string()
    } else {
        format!("https://{instance}")
    };

    let app = oauth::register_app(&instance).await?;

    let auth_url = oauth::get_auth_url(&instance, &app.client_id);
    println!("Click the link to authorize login.");
    println!("{auth_url}");
    println!();
    let _ = open::that(&auth_url);

    print!("Enter the code you received >");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut code = String::new();
    std::io::stdin()
        .read_line(&mut code)
        .context("Failed to read authorization code")?;

    let token =
        oauth::get_token(&instance, &app.client_id, &app.client_secret, code.trim()).await?;

    let profile = Profile {
        instance,
        client_id: app.client_id,
        client_secret: app.client_secret,
        token: token.access_token,
    };
    config.set_profile(profile_name, profile.clone());
    config.save()?;
    cprint("Profile saved.", Color::Green);

    Ok(profile)
}
