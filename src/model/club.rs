use chrono::{DateTime, Utc};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SneakPeek {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HolidaySpecial {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// The `clubData` singleton.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClubConfig {
    #[serde(default)]
    pub welcome_message: String,
    #[serde(default)]
    pub quote_of_week: String,
    #[serde(default)]
    pub sneak_peek: SneakPeek,
    #[serde(default)]
    pub is_holiday_special: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holiday_special: Option<HolidaySpecial>,
}

impl ClubConfig {
    /// Holiday media is only kept while the holiday special is switched on.
    pub fn normalized(mut self) -> Self {
        if !self.is_holiday_special {
            self.holiday_special = None;
        }
        self
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BonusScene {
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub audio_url: String,
    pub selected_book_id: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Default for BonusScene {
    fn default() -> Self {
        BonusScene {
            title: "New Scene".to_string(),
            author: String::new(),
            image_url: String::new(),
            audio_url: String::new(),
            selected_book_id: None,
            scheduled_at: None,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub author_name: String,
    pub author_avatar_url: String,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub liked_by: Vec<String>,
    #[serde(default)]
    pub comments: i64,
}

pub const DEFAULT_AUTHOR_NAME: &str = "Admin";
pub const DEFAULT_AVATAR_URL: &str = "https://i.ibb.co/QDgYxYm/user.jpg";

impl Post {
    /// Likes or unlikes on behalf of `uid`; returns whether the post is now liked.
    pub fn toggle_like(&mut self, uid: &str) -> bool {
        let liked = match self.liked_by.iter().position(|u| u == uid) {
            Some(position) => {
                self.liked_by.remove(position);
                false
            }
            None => {
                self.liked_by.push(uid.to_string());
                true
            }
        };
        self.likes = self.liked_by.len() as i64;

        liked
    }
}
