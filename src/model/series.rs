use super::{
    error::ContentError,
    ordering::{Ordered, move_item, renumber, sort_by_order},
};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub episode_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    /// Seconds.
    #[serde(default)]
    pub duration: u32,
    pub order: i32,
}

impl Ordered for Episode {
    fn order(&self) -> i32 {
        self.order
    }

    fn set_order(&mut self, order: i32) {
        self.order = order;
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub trailer_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Fields an editor supplies for an episode.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeFields {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: u32,
}

impl Series {
    pub fn episode_count(&self) -> i32 {
        self.episodes.len() as i32
    }

    fn position_of(&self, episode_id: &str) -> Result<usize, ContentError> {
        self.episodes
            .iter()
            .position(|e| e.episode_id == episode_id)
            .ok_or_else(|| ContentError::EpisodeNotFound(episode_id.to_string()))
    }

    pub fn add_episode(&mut self, fields: EpisodeFields) -> Episode {
        sort_by_order(&mut self.episodes);

        let episode = Episode {
            episode_id: uuid::Uuid::new_v4().simple().to_string(),
            title: fields.title,
            description: fields.description,
            video_url: fields.video_url,
            thumbnail_url: fields.thumbnail_url,
            duration: fields.duration,
            order: self.episodes.len() as i32,
        };
        self.episodes.push(episode.clone());
        renumber(&mut self.episodes);

        episode
    }

    pub fn update_episode(
        &mut self,
        episode_id: &str,
        fields: EpisodeFields,
    ) -> Result<Episode, ContentError> {
        let position = self.position_of(episode_id)?;

        let episode = &mut self.episodes[position];
        episode.title = fields.title;
        episode.description = fields.description;
        episode.video_url = fields.video_url;
        episode.thumbnail_url = fields.thumbnail_url;
        episode.duration = fields.duration;

        Ok(episode.clone())
    }

    pub fn remove_episode(&mut self, episode_id: &str) -> Result<Episode, ContentError> {
        sort_by_order(&mut self.episodes);
        let position = self.position_of(episode_id)?;

        let removed = self.episodes.remove(position);
        renumber(&mut self.episodes);

        Ok(removed)
    }

    pub fn move_episode(&mut self, from: usize, to: usize) -> Result<(), ContentError> {
        sort_by_order(&mut self.episodes);
        move_item(&mut self.episodes, from, to)?;
        renumber(&mut self.episodes);

        Ok(())
    }
}
