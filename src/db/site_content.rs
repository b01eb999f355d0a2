use crate::{
    error::Error,
    model::{PageType, SiteContent, SocialAccounts},
};

use super::{
    DocumentStore, Precondition, Stored,
    collections::{SITE_CONTENT, SOCIAL_ACCOUNTS_ID},
    fetch, fetch_optional, is_conflict, write,
};

/// Returns the page, seeding it with its default copy on first read.
#[tracing::instrument(name = "get page content", skip(store))]
pub async fn get_page(
    store: &dyn DocumentStore,
    page: PageType,
) -> Result<Stored<SiteContent>, Error> {
    if let Some(stored) = fetch_optional(store, SITE_CONTENT, page.as_str()).await? {
        return Ok(stored);
    }

    let seed = SiteContent {
        content: page.default_content().to_string(),
    };
    match write(store, SITE_CONTENT, page.as_str(), &seed, Precondition::Absent).await {
        Err(error) if is_conflict(&error) => fetch(store, SITE_CONTENT, page.as_str()).await,
        other => other,
    }
}

#[tracing::instrument(name = "save page content", skip(store, content))]
pub async fn save_page(
    store: &dyn DocumentStore,
    page: PageType,
    content: String,
) -> Result<Stored<SiteContent>, Error> {
    write(
        store,
        SITE_CONTENT,
        page.as_str(),
        &SiteContent { content },
        Precondition::Any,
    )
    .await
}

#[tracing::instrument(name = "get social accounts", skip_all)]
pub async fn get_social_accounts(store: &dyn DocumentStore) -> Result<SocialAccounts, Error> {
    Ok(
        fetch_optional::<SocialAccounts>(store, SITE_CONTENT, SOCIAL_ACCOUNTS_ID)
            .await?
            .map(|stored| stored.data)
            .unwrap_or_default(),
    )
}

#[tracing::instrument(name = "save social accounts", skip_all)]
pub async fn save_social_accounts(
    store: &dyn DocumentStore,
    accounts: &SocialAccounts,
) -> Result<Stored<SocialAccounts>, Error> {
    write(
        store,
        SITE_CONTENT,
        SOCIAL_ACCOUNTS_ID,
        accounts,
        Precondition::Any,
    )
    .await
}
