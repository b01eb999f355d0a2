pub mod app_error;
pub mod book;
pub mod category;
pub mod chapter;
pub mod club;
pub mod error;
pub mod notification;
pub mod ordering;
pub mod poll;
pub mod series;
pub mod site_content;
pub mod user;

pub use app_error::ErrorReport;
pub use book::{Book, HubButtons, SpiceLevel};
pub use category::Topics;
pub use chapter::{Chapter, ChapterContent, ContentBlock};
pub use club::{BonusScene, ClubConfig, HolidaySpecial, Post, SneakPeek};
pub use notification::{
    Audience, Notification, NotificationStatus, NotificationTarget, RichFormat,
};
pub use poll::{Poll, PollOption, PollStatus, PollVote};
pub use series::{Episode, EpisodeFields, Series};
pub use site_content::{PageType, SiteContent, SocialAccounts};
pub use user::User;
