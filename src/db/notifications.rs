use crate::{
    error::Error,
    model::{Notification, NotificationStatus, error::ContentError},
};

use super::{
    DocumentStore, Stored, collections::NOTIFICATIONS, fetch_all, insert, modify,
    newest_first, remove,
};

#[tracing::instrument(name = "list notifications", skip_all)]
pub async fn list_notifications(
    store: &dyn DocumentStore,
) -> Result<Vec<Stored<Notification>>, Error> {
    Ok(newest_first(fetch_all(store, NOTIFICATIONS).await?))
}

#[tracing::instrument(name = "create notification", skip_all, fields(title = %notification.title))]
pub async fn create_notification(
    store: &dyn DocumentStore,
    notification: &Notification,
) -> Result<Stored<Notification>, Error> {
    insert(store, NOTIFICATIONS, notification).await
}

/// Moves a draft or failed notification to `sending`. Of two concurrent
/// claims only one passes the version check, so a push goes out once.
#[tracing::instrument(name = "claim notification for sending", skip(store))]
pub async fn claim_for_sending(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Stored<Notification>, Error> {
    let (stored, _) = modify(store, NOTIFICATIONS, id, None, |current: &mut Notification| {
        if !current.can_send() {
            return Err(ContentError::AlreadyDispatched(id.to_string()).into());
        }
        current.status = NotificationStatus::Sending;
        Ok(())
    })
    .await?;

    Ok(stored)
}

/// Stores the dispatch outcome over the claimed copy read at `version`.
#[tracing::instrument(name = "record notification outcome", skip(store, notification))]
pub async fn record_outcome(
    store: &dyn DocumentStore,
    id: &str,
    version: i64,
    notification: Notification,
) -> Result<Stored<Notification>, Error> {
    let (stored, _) = modify(store, NOTIFICATIONS, id, Some(version), |current: &mut Notification| {
        *current = notification;
        Ok(())
    })
    .await?;

    Ok(stored)
}

#[tracing::instrument(name = "delete notification", skip(store))]
pub async fn delete_notification(store: &dyn DocumentStore, id: &str) -> Result<(), Error> {
    remove(store, NOTIFICATIONS, id).await
}
