use chrono::Utc;

use crate::{
    error::Error,
    model::{
        BonusScene, ClubConfig, Poll, PollStatus, PollVote, Post,
        error::ContentError,
        poll::vote_id,
    },
};

use super::{
    DocumentStore, Precondition, Stored,
    collections::{ACTIVE_POLL_ID, BONUS_SCENES, CLUB, CLUB_DATA_ID, POLL_VOTES, POLLS, POSTS},
    error::DatabaseError,
    fetch, fetch_all, fetch_optional, increment, insert, is_conflict, modify, newest_first,
    remove, write,
};

/// Attempts at applying a like before giving up on contention.
const WRITE_ATTEMPTS: usize = 5;

#[tracing::instrument(name = "get club config", skip_all)]
pub async fn get_config(store: &dyn DocumentStore) -> Result<ClubConfig, Error> {
    Ok(fetch_optional::<ClubConfig>(store, CLUB, CLUB_DATA_ID)
        .await?
        .map(|stored| stored.data)
        .unwrap_or_default())
}

#[tracing::instrument(name = "save club config", skip_all)]
pub async fn save_config(
    store: &dyn DocumentStore,
    config: ClubConfig,
) -> Result<Stored<ClubConfig>, Error> {
    write(
        store,
        CLUB,
        CLUB_DATA_ID,
        &config.normalized(),
        Precondition::Any,
    )
    .await
}

#[tracing::instrument(name = "list bonus scenes", skip_all)]
pub async fn list_bonus_scenes(
    store: &dyn DocumentStore,
) -> Result<Vec<Stored<BonusScene>>, Error> {
    fetch_all(store, BONUS_SCENES).await
}

#[tracing::instrument(name = "add bonus scene", skip_all)]
pub async fn create_bonus_scene(
    store: &dyn DocumentStore,
    scene: &BonusScene,
) -> Result<Stored<BonusScene>, Error> {
    insert(store, BONUS_SCENES, scene).await
}

#[tracing::instrument(name = "update bonus scene", skip(store, scene))]
pub async fn update_bonus_scene(
    store: &dyn DocumentStore,
    id: &str,
    scene: BonusScene,
    expected_version: Option<i64>,
) -> Result<Stored<BonusScene>, Error> {
    let (stored, _) = modify(store, BONUS_SCENES, id, expected_version, |current: &mut BonusScene| {
        *current = scene;
        Ok(())
    })
    .await?;

    Ok(stored)
}

#[tracing::instrument(name = "delete bonus scene", skip(store))]
pub async fn delete_bonus_scene(store: &dyn DocumentStore, id: &str) -> Result<(), Error> {
    remove(store, BONUS_SCENES, id).await
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ActivePoll {
    #[serde(flatten)]
    pub poll: Stored<Poll>,
    pub has_voted: bool,
}

/// Opens a poll; refused while another one is still active.
#[tracing::instrument(name = "create poll", skip_all)]
pub async fn create_poll(store: &dyn DocumentStore, poll: &Poll) -> Result<Stored<Poll>, Error> {
    match write(store, POLLS, ACTIVE_POLL_ID, poll, Precondition::Absent).await {
        Err(error) if is_conflict(&error) => Err(ContentError::PollAlreadyActive.into()),
        other => other,
    }
}

async fn fetch_active(store: &dyn DocumentStore) -> Result<Stored<Poll>, Error> {
    match fetch_optional::<Poll>(store, POLLS, ACTIVE_POLL_ID).await? {
        Some(stored) if stored.data.status == PollStatus::Active => Ok(stored),
        _ => Err(ContentError::NoActivePoll.into()),
    }
}

#[tracing::instrument(name = "get active poll", skip(store))]
pub async fn get_active_poll(store: &dyn DocumentStore, uid: &str) -> Result<ActivePoll, Error> {
    let poll = fetch_active(store).await?;
    let has_voted = store
        .get(POLL_VOTES, &vote_id(&poll.data.poll_id, uid))
        .await?
        .is_some();

    Ok(ActivePoll { poll, has_voted })
}

/// Records one ballot per uid and poll. The ballot document is created first so
/// that a second vote fails before any counter moves; the counters are then
/// bumped atomically, and only while the same poll is still open.
#[tracing::instrument(name = "vote", skip(store))]
pub async fn vote(store: &dyn DocumentStore, uid: &str, option: &str) -> Result<Stored<Poll>, Error> {
    let active = fetch_active(store).await?;
    let index = active
        .data
        .option_index(option)
        .ok_or_else(|| ContentError::UnknownOption(option.to_string()))?;

    let poll_id = active.data.poll_id;
    let ballot_id = vote_id(&poll_id, uid);
    let ballot = PollVote {
        poll_id: poll_id.clone(),
        uid: uid.to_string(),
        voted_option: option.to_string(),
        timestamp: Utc::now(),
    };
    match write(store, POLL_VOTES, &ballot_id, &ballot, Precondition::Absent).await {
        Err(error) if is_conflict(&error) => return Err(ContentError::AlreadyVoted.into()),
        other => other?,
    };

    let counters = [format!("/options/{}/votes", index), "/totalVotes".to_string()];
    let outcome = match increment(
        store,
        POLLS,
        ACTIVE_POLL_ID,
        &[("pollId", poll_id.as_str()), ("status", "active")],
        &counters,
    )
    .await
    {
        Err(Error::Database(DatabaseError::NotFound)) => Err(ContentError::NoActivePoll.into()),
        other => other,
    };

    if outcome.is_err() {
        if let Err(error) = store.delete(POLL_VOTES, &ballot_id).await {
            tracing::error!(err.msg = %error, %ballot_id, "Failed to withdraw ballot");
        }
    }

    outcome
}

/// Archives the active poll under its own id and clears the active slot.
///
/// The slot is closed first so no vote lands after the totals are taken. A
/// slot left holding an archived poll by an interrupted earlier call is
/// finished off here.
#[tracing::instrument(name = "end poll", skip_all)]
pub async fn end_poll(store: &dyn DocumentStore) -> Result<Stored<Poll>, Error> {
    let current = fetch_optional::<Poll>(store, POLLS, ACTIVE_POLL_ID)
        .await?
        .ok_or(ContentError::NoActivePoll)?;

    let archived = match current.data.status {
        PollStatus::Active => {
            let archived = current.data.archive(Utc::now());
            write(
                store,
                POLLS,
                ACTIVE_POLL_ID,
                &archived,
                Precondition::Version(current.version),
            )
            .await?;
            archived
        }
        PollStatus::Archived => {
            tracing::warn!(poll_id = %current.data.poll_id, "Resuming an interrupted poll archive");
            current.data
        }
    };

    let stored = write(
        store,
        POLLS,
        &archived.poll_id,
        &archived,
        Precondition::Any,
    )
    .await?;
    store.delete(POLLS, ACTIVE_POLL_ID).await?;

    Ok(stored)
}

#[tracing::instrument(name = "list archived polls", skip_all)]
pub async fn list_archived_polls(store: &dyn DocumentStore) -> Result<Vec<Stored<Poll>>, Error> {
    let mut polls: Vec<Stored<Poll>> = fetch_all::<Poll>(store, POLLS)
        .await?
        .into_iter()
        .filter(|poll| poll.id != ACTIVE_POLL_ID)
        .collect();
    polls.sort_by(|a, b| b.data.ended_at.cmp(&a.data.ended_at));

    Ok(polls)
}

#[tracing::instrument(name = "list posts", skip_all)]
pub async fn list_posts(store: &dyn DocumentStore) -> Result<Vec<Stored<Post>>, Error> {
    Ok(newest_first(fetch_all(store, POSTS).await?))
}

#[tracing::instrument(name = "add post", skip_all)]
pub async fn create_post(store: &dyn DocumentStore, post: &Post) -> Result<Stored<Post>, Error> {
    insert(store, POSTS, post).await
}

/// Replaces the editable fields; author, likes and comments stay as stored.
#[tracing::instrument(name = "update post", skip(store, post))]
pub async fn update_post(
    store: &dyn DocumentStore,
    id: &str,
    post: Post,
    expected_version: Option<i64>,
) -> Result<Stored<Post>, Error> {
    let (stored, _) = modify(store, POSTS, id, expected_version, |current: &mut Post| {
        current.description = post.description;
        current.image_url = post.image_url;
        current.scheduled_at = post.scheduled_at;
        Ok(())
    })
    .await?;

    Ok(stored)
}

#[tracing::instrument(name = "delete post", skip(store))]
pub async fn delete_post(store: &dyn DocumentStore, id: &str) -> Result<(), Error> {
    remove(store, POSTS, id).await
}

#[tracing::instrument(name = "toggle post like", skip(store))]
pub async fn toggle_like(
    store: &dyn DocumentStore,
    id: &str,
    uid: &str,
) -> Result<(Stored<Post>, bool), Error> {
    for attempt in 1..=WRITE_ATTEMPTS {
        let current = fetch::<Post>(store, POSTS, id).await?;
        let mut post = current.data;
        let liked = post.toggle_like(uid);

        match write(store, POSTS, id, &post, Precondition::Version(current.version)).await {
            Ok(stored) => return Ok((stored, liked)),
            Err(error) if is_conflict(&error) => {
                tracing::debug!(attempt, "Post changed while liking, retrying");
            }
            Err(error) => return Err(error),
        }
    }

    Err(ContentError::Contention.into())
}
