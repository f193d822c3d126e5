use blog_system::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("blog-system".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    blog_system::run().await
}
