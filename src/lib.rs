//! # tootline
//!
//! An interactive command-line client for Mastodon.
//!
//! tootline is a REPL: it connects to an instance, then reads commands
//! like `home`, `toot hello world` or `fav 3` from stdin. Toots are
//! numbered per session so commands can refer to them with short local
//! IDs instead of server snowflakes.
//!
//! ## Modules
//!
//! - [`api`] — Mastodon REST client and OAuth registration
//! - [`config`] — profiles and preferences in a TOML file
//! - [`format`] — terminal rendering of toots, users and notifications
//! - [`models`] — Mastodon API entities
//! - [`render`] — HTML-to-text toot rendering and emoji transcoding
//! - [`shell`] — the interactive command loop
//!
//! ## Example
//!
//! ```no_run
//! use tootline::render::TootParser;
//!
//! let mut parser = TootParser::new(true);
//! parser.parse("<p>hello <a href=\"https://example.com\">world</a></p>");
//! assert_eq!(parser.text(), "hello world");
//! assert_eq!(parser.weblinks(), vec!["https://example.com".to_string()]);
//! ```

#![doc(html_root_url = "https://docs.rs/tootline/0.2.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::single_match_else)]

pub mod api;
pub mod config;
pub mod format;
pub mod models;
pub mod paths;
pub mod render;
pub mod shell;

// Re-export main types for convenience
pub use api::MastodonClient;
pub use config::{Config, Profile};
pub use render::{LinkType, TootParser};
pub use shell::Shell;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
