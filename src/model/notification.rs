use chrono::{DateTime, Utc};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Draft,
    /// A dispatch is in flight.
    Sending,
    Scheduled,
    Sent,
    Failed,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RichFormat {
    pub bold: bool,
    pub italic: bool,
    pub line_breaks: bool,
    pub emojis: bool,
}

impl Default for RichFormat {
    fn default() -> Self {
        RichFormat {
            bold: false,
            italic: false,
            line_breaks: true,
            emojis: true,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    All,
    Subscribers,
}

/// Either a named audience or an explicit list of uids.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum NotificationTarget {
    Audience(Audience),
    Users(Vec<String>),
}

impl Default for NotificationTarget {
    fn default() -> Self {
        NotificationTarget::Audience(Audience::All)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub status: NotificationStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deep_link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rich_format: RichFormat,
    #[serde(default)]
    pub target: NotificationTarget,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl Notification {
    /// Only drafts and failed notifications may be handed to the dispatcher.
    pub fn can_send(&self) -> bool {
        matches!(
            self.status,
            NotificationStatus::Draft | NotificationStatus::Failed
        )
    }

    /// Status after a successful hand-off to the dispatch service.
    pub fn mark_dispatched(&mut self, now: DateTime<Utc>) {
        self.status = match self.scheduled_at {
            Some(at) if at > now => NotificationStatus::Scheduled,
            _ => NotificationStatus::Sent,
        };
        self.sent_at = Some(now);
        self.last_error = None;
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = NotificationStatus::Failed;
        self.last_error = Some(error);
    }
}
