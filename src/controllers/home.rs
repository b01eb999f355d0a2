#[tracing::instrument(name = "[GET] home", skip_all)]
pub async fn index() -> &'static str {
    "Alive"
}
