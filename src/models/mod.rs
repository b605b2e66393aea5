//! Data models for tootline (Mastodon API entities)

mod account;
mod list;
mod notification;
mod status;

pub use account::{Account, Relationship};
pub use list::List;
pub use notification::Notification;
pub use status::{MediaAttachment, Poll, PollOption, Status};
