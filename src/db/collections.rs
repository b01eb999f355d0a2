pub const AUDIOBOOKS: &str = "audiobooks";
pub const SERIES: &str = "series";
pub const USERS: &str = "users";
pub const CATEGORIES: &str = "categories";
pub const NOTIFICATIONS: &str = "notifications";
pub const SITE_CONTENT: &str = "siteContent";
pub const APP_ERRORS: &str = "app_errors";

pub const CLUB: &str = "subscriber_club";
pub const BONUS_SCENES: &str = "subscriber_club/clubData/bonusScenes";
pub const POLLS: &str = "subscriber_club/clubData/poll";
pub const POLL_VOTES: &str = "subscriber_club/clubData/pollVotes";
pub const POSTS: &str = "subscriber_club/clubData/posts";

pub const TOPICS_ID: &str = "topics";
pub const CLUB_DATA_ID: &str = "clubData";
pub const ACTIVE_POLL_ID: &str = "active";
pub const SOCIAL_ACCOUNTS_ID: &str = "socialAccounts";
