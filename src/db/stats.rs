use crate::{error::Error, model::User};

use super::{
    DocumentStore,
    categories::get_topics,
    collections::{AUDIOBOOKS, NOTIFICATIONS, USERS},
    fetch_all,
};

#[derive(serde::Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub audiobooks: i64,
    pub users: i64,
    pub subscribers: i64,
    pub categories: i64,
    pub notifications: i64,
}

#[tracing::instrument(name = "dashboard stats", skip_all)]
pub async fn get_stats(store: &dyn DocumentStore) -> Result<DashboardStats, Error> {
    let users = fetch_all::<User>(store, USERS).await?;

    Ok(DashboardStats {
        audiobooks: store.count(AUDIOBOOKS).await?,
        users: users.len() as i64,
        subscribers: users.iter().filter(|u| u.data.is_subscriber).count() as i64,
        categories: get_topics(store).await?.list.len() as i64,
        notifications: store.count(NOTIFICATIONS).await?,
    })
}
