use audiobook_admin::{
    run,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("audiobook-admin".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;
    std::panic::set_hook(Box::new(tracing_panic::panic_hook));

    run().await
}
