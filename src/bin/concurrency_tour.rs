use std::time::Duration;

use blog_system::{
    concurrency::{
        Job, atomic_counter, buffered_relay, mutex_counter, print_odd_and_even, run_jobs,
        unbuffered_relay,
    },
    telemetry::{get_subscriber, init_subscriber},
};
use futures::FutureExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("concurrency-tour".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    print_odd_and_even(10, Duration::from_millis(100)).await?;

    let jobs: Vec<(String, Job)> = vec![
        (
            "job-1".to_string(),
            async { tracing::info!("Running job 1") }.boxed(),
        ),
        (
            "job-2".to_string(),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                tracing::info!("Running job 2");
            }
            .boxed(),
        ),
    ];
    run_jobs(jobs).await?;

    let received = unbuffered_relay(10).await?;
    tracing::info!(?received, "Unbuffered relay finished");

    let received = buffered_relay(100, 10).await?;
    tracing::info!(count = received.len(), "Buffered relay finished");

    mutex_counter(10, 1000).await?;
    atomic_counter(10, 1000).await?;

    Ok(())
}
