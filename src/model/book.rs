use super::chapter::Chapter;

/// Books created by the older add form carry `Level 1`..`Level 5`; they read
/// back on the four-step scale and are written in its names.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiceLevel {
    #[default]
    #[serde(alias = "Level 1")]
    Mild,
    #[serde(alias = "Level 2")]
    Medium,
    #[serde(alias = "Level 3")]
    Spicy,
    #[serde(alias = "Level 4", alias = "Level 5")]
    Extreme,
}

/// Which entry points the app hub shows for a book.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubButtons {
    pub listen: bool,
    pub read: bool,
    pub watch: bool,
}

impl Default for HubButtons {
    fn default() -> Self {
        HubButtons {
            listen: true,
            read: true,
            watch: false,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub teaser_quote: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub spice_level: SpiceLevel,
    #[serde(default)]
    pub book_cover: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub hub_buttons: HubButtons,
    #[serde(default = "default_true")]
    pub reading_mode_enabled: bool,
    #[serde(default)]
    pub watch_mode_enabled: bool,
    #[serde(default)]
    pub is_downloadable: bool,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}
