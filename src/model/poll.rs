use chrono::{DateTime, Utc};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub votes: i64,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    #[default]
    Active,
    Archived,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub poll_id: String,
    pub question: String,
    #[serde(default)]
    pub multi_choice: bool,
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub total_votes: i64,
    #[serde(default)]
    pub status: PollStatus,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
}

/// `A`, `B`, … `Z`, `AA`, `AB`, …
pub fn option_key(index: usize) -> String {
    let mut key = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        key.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    key.reverse();

    String::from_utf8_lossy(&key).into_owned()
}

impl Poll {
    /// A fresh active poll with keyed options and all counters at zero.
    pub fn new(
        question: String,
        multi_choice: bool,
        labels: Vec<String>,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Self {
        let options = labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| PollOption {
                key: option_key(index),
                label,
                votes: 0,
            })
            .collect();

        Poll {
            poll_id: uuid::Uuid::new_v4().simple().to_string(),
            question,
            multi_choice,
            options,
            total_votes: 0,
            status: PollStatus::Active,
            scheduled_at,
            ended_at: None,
        }
    }

    pub fn option_index(&self, key: &str) -> Option<usize> {
        self.options.iter().position(|o| o.key == key)
    }

    /// Closes the poll; the total is recomputed from the option counters.
    pub fn archive(mut self, ended_at: DateTime<Utc>) -> Self {
        self.total_votes = self.options.iter().map(|o| o.votes).sum();
        self.status = PollStatus::Archived;
        self.ended_at = Some(ended_at);
        self
    }
}

/// One member's ballot, stored once per poll and uid.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollVote {
    pub poll_id: String,
    pub uid: String,
    pub voted_option: String,
    pub timestamp: DateTime<Utc>,
}

pub fn vote_id(poll_id: &str, uid: &str) -> String {
    format!("{}_{}", poll_id, uid)
}
