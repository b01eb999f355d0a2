use crate::{
    error::Error,
    model::{Episode, EpisodeFields, Series},
};

use super::{
    DocumentStore, Stored, collections::SERIES, fetch, fetch_all, insert, modify, newest_first,
    remove,
};

#[tracing::instrument(name = "list series", skip_all)]
pub async fn list_series(store: &dyn DocumentStore) -> Result<Vec<Stored<Series>>, Error> {
    Ok(newest_first(fetch_all(store, SERIES).await?))
}

#[tracing::instrument(name = "get series", skip(store))]
pub async fn get_series(store: &dyn DocumentStore, id: &str) -> Result<Stored<Series>, Error> {
    fetch(store, SERIES, id).await
}

#[tracing::instrument(name = "create series", skip_all, fields(title = %series.title))]
pub async fn create_series(
    store: &dyn DocumentStore,
    mut series: Series,
) -> Result<Stored<Series>, Error> {
    series.episodes.clear();

    insert(store, SERIES, &series).await
}

/// Replaces title, description and artwork; episodes are kept as stored.
#[tracing::instrument(name = "update series", skip(store, series))]
pub async fn update_series(
    store: &dyn DocumentStore,
    id: &str,
    series: Series,
    expected_version: Option<i64>,
) -> Result<Stored<Series>, Error> {
    let (stored, _) = modify(store, SERIES, id, expected_version, |current: &mut Series| {
        let episodes = std::mem::take(&mut current.episodes);
        *current = series;
        current.episodes = episodes;
        Ok(())
    })
    .await?;

    Ok(stored)
}

#[tracing::instrument(name = "delete series", skip(store))]
pub async fn delete_series(store: &dyn DocumentStore, id: &str) -> Result<(), Error> {
    remove(store, SERIES, id).await
}

#[tracing::instrument(name = "add episode", skip(store, fields))]
pub async fn create_episode(
    store: &dyn DocumentStore,
    series_id: &str,
    fields: EpisodeFields,
    expected_version: Option<i64>,
) -> Result<(Stored<Series>, Episode), Error> {
    modify(store, SERIES, series_id, expected_version, |series: &mut Series| {
        Ok(series.add_episode(fields))
    })
    .await
}

#[tracing::instrument(name = "update episode", skip(store, fields))]
pub async fn edit_episode(
    store: &dyn DocumentStore,
    series_id: &str,
    episode_id: &str,
    fields: EpisodeFields,
    expected_version: Option<i64>,
) -> Result<(Stored<Series>, Episode), Error> {
    modify(store, SERIES, series_id, expected_version, |series: &mut Series| {
        Ok(series.update_episode(episode_id, fields)?)
    })
    .await
}

#[tracing::instrument(name = "delete episode", skip(store))]
pub async fn delete_episode(
    store: &dyn DocumentStore,
    series_id: &str,
    episode_id: &str,
    expected_version: Option<i64>,
) -> Result<(Stored<Series>, Episode), Error> {
    modify(store, SERIES, series_id, expected_version, |series: &mut Series| {
        Ok(series.remove_episode(episode_id)?)
    })
    .await
}

#[tracing::instrument(name = "reorder episodes", skip(store))]
pub async fn reorder_episodes(
    store: &dyn DocumentStore,
    series_id: &str,
    from: usize,
    to: usize,
    expected_version: Option<i64>,
) -> Result<Stored<Series>, Error> {
    let (stored, _) = modify(store, SERIES, series_id, expected_version, |series: &mut Series| {
        Ok(series.move_episode(from, to)?)
    })
    .await?;

    Ok(stored)
}
