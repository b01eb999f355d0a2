use crate::{error::Error, model::ErrorReport};

use super::{DocumentStore, Stored, collections::APP_ERRORS, fetch_all, insert, newest_first};

#[tracing::instrument(name = "report error", skip_all)]
pub async fn report_error(
    store: &dyn DocumentStore,
    report: &ErrorReport,
) -> Result<Stored<ErrorReport>, Error> {
    insert(store, APP_ERRORS, report).await
}

#[tracing::instrument(name = "list errors", skip_all)]
pub async fn list_errors(store: &dyn DocumentStore) -> Result<Vec<Stored<ErrorReport>>, Error> {
    Ok(newest_first(fetch_all(store, APP_ERRORS).await?))
}
