use crate::{error::Error, model::User};

use super::{
    DocumentStore, Precondition, Stored, collections::USERS, fetch, fetch_all, modify, remove,
    write,
};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Position in the `(email, id)` ordering. Emails are not unique, so the id
/// breaks ties; without one the page starts after every user with that email.
#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserCursor {
    pub email: String,
    pub id: Option<String>,
}

impl UserCursor {
    fn precedes(&self, user: &Stored<User>) -> bool {
        match &self.id {
            Some(id) => {
                (user.data.email.as_str(), user.id.as_str()) > (self.email.as_str(), id.as_str())
            }
            None => user.data.email > self.email,
        }
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<Stored<User>>,
    pub has_more: bool,
    /// Pass back as `after` and `afterId` for the next page.
    pub next_cursor: Option<UserCursor>,
}

/// Users ordered by email then id, starting strictly after `after`.
#[tracing::instrument(name = "list users", skip(store))]
pub async fn list_users(
    store: &dyn DocumentStore,
    after: Option<&UserCursor>,
    limit: usize,
) -> Result<UserPage, Error> {
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    let mut users: Vec<Stored<User>> = fetch_all(store, USERS).await?;
    users.sort_by(|a, b| a.data.email.cmp(&b.data.email).then_with(|| a.id.cmp(&b.id)));

    let mut page: Vec<Stored<User>> = users
        .into_iter()
        .filter(|user| after.is_none_or(|cursor| cursor.precedes(user)))
        .take(limit + 1)
        .collect();

    let has_more = page.len() > limit;
    page.truncate(limit);
    let next_cursor = if has_more {
        page.last().map(|user| UserCursor {
            email: user.data.email.clone(),
            id: Some(user.id.clone()),
        })
    } else {
        None
    };

    Ok(UserPage {
        users: page,
        has_more,
        next_cursor,
    })
}

#[tracing::instrument(name = "get user", skip(store))]
pub async fn get_user(store: &dyn DocumentStore, id: &str) -> Result<Stored<User>, Error> {
    fetch(store, USERS, id).await
}

/// User documents are keyed by their uid.
#[tracing::instrument(name = "create user", skip_all, fields(uid = %user.uid))]
pub async fn create_user(store: &dyn DocumentStore, user: User) -> Result<Stored<User>, Error> {
    let uid = user.uid.clone();

    write(store, USERS, &uid, &user, Precondition::Absent).await
}

/// The uid is the document key and cannot change.
#[tracing::instrument(name = "update user", skip(store, user))]
pub async fn update_user(
    store: &dyn DocumentStore,
    id: &str,
    mut user: User,
    expected_version: Option<i64>,
) -> Result<Stored<User>, Error> {
    let (stored, _) = modify(store, USERS, id, expected_version, |current: &mut User| {
        user.uid = std::mem::take(&mut current.uid);
        *current = user;
        Ok(())
    })
    .await?;

    Ok(stored)
}

#[tracing::instrument(name = "delete user", skip(store))]
pub async fn delete_user(store: &dyn DocumentStore, id: &str) -> Result<(), Error> {
    remove(store, USERS, id).await
}
