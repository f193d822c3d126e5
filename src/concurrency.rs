//! A tour of tokio's concurrency primitives: spawned tasks, channels,
//! a mutex and an atomic counter. Every demo returns what it observed so it
//! can be checked, and logs what it does.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use futures::future::BoxFuture;
use tokio::{
    sync::{Mutex, mpsc},
    task::{JoinError, JoinSet},
};

pub type Job = BoxFuture<'static, ()>;

#[derive(Debug, Clone)]
pub struct JobReport {
    pub name: String,
    pub elapsed: Duration,
}

/// One task emits the odd numbers up to `limit`, another the even ones.
/// Returns every number emitted, in emission order.
#[tracing::instrument(name = "print odd and even")]
pub async fn print_odd_and_even(limit: u32, pause: Duration) -> Result<Vec<u32>, JoinError> {
    let emitted = Arc::new(Mutex::new(Vec::new()));

    let spawn_printer = |start: u32, label: &'static str| {
        let emitted = Arc::clone(&emitted);
        tokio::spawn(async move {
            for n in (start..=limit).step_by(2) {
                tracing::info!(number = n, "{}", label);
                emitted.lock().await.push(n);
                tokio::time::sleep(pause).await;
            }
        })
    };

    let odd = spawn_printer(1, "odd");
    let even = spawn_printer(2, "even");
    odd.await?;
    even.await?;

    tracing::info!("All printers finished");

    let emitted = emitted.lock().await.clone();
    Ok(emitted)
}

/// Runs every job concurrently and reports how long each one took.
/// Reports come back in completion order.
#[tracing::instrument(name = "run jobs", skip_all, fields(count = jobs.len()))]
pub async fn run_jobs(jobs: Vec<(String, Job)>) -> Result<Vec<JobReport>, JoinError> {
    let mut set = JoinSet::new();

    for (name, job) in jobs {
        set.spawn(async move {
            let start = Instant::now();
            job.await;
            let elapsed = start.elapsed();
            tracing::info!(job = %name, elapsed = ?elapsed, "Job finished");
            JobReport { name, elapsed }
        });
    }

    let mut reports = Vec::with_capacity(set.len());
    while let Some(report) = set.join_next().await {
        reports.push(report?);
    }

    Ok(reports)
}

/// A producer sends `1..=count` through a channel of `capacity` slots and a
/// consumer collects them until the channel closes.
#[tracing::instrument(name = "relay")]
pub async fn relay(count: u32, capacity: usize) -> Result<Vec<u32>, JoinError> {
    let (tx, mut rx) = mpsc::channel(capacity.max(1));

    let producer = tokio::spawn(async move {
        for n in 1..=count {
            if tx.send(n).await.is_err() {
                tracing::warn!(number = n, "Consumer went away");
                break;
            }
        }
    });

    let consumer = tokio::spawn(async move {
        let mut received = Vec::with_capacity(count as usize);
        while let Some(n) = rx.recv().await {
            tracing::debug!(number = n, "Received");
            received.push(n);
        }
        received
    });

    producer.await?;
    consumer.await
}

/// tokio has no rendezvous channel; a single slot is the closest match.
pub async fn unbuffered_relay(count: u32) -> Result<Vec<u32>, JoinError> {
    relay(count, 1).await
}

pub async fn buffered_relay(count: u32, capacity: usize) -> Result<Vec<u32>, JoinError> {
    relay(count, capacity).await
}

#[tracing::instrument(name = "mutex counter")]
pub async fn mutex_counter(workers: usize, increments: usize) -> Result<u64, JoinError> {
    let counter = Arc::new(Mutex::new(0u64));
    let mut set = JoinSet::new();

    for _ in 0..workers {
        let counter = Arc::clone(&counter);
        set.spawn(async move {
            for _ in 0..increments {
                *counter.lock().await += 1;
            }
        });
    }

    while let Some(result) = set.join_next().await {
        result?;
    }

    let total = *counter.lock().await;
    tracing::info!(total, "Mutex counter finished");

    Ok(total)
}

#[tracing::instrument(name = "atomic counter")]
pub async fn atomic_counter(workers: usize, increments: usize) -> Result<u64, JoinError> {
    let counter = Arc::new(AtomicU64::new(0));
    let mut set = JoinSet::new();

    for _ in 0..workers {
        let counter = Arc::clone(&counter);
        set.spawn(async move {
            for _ in 0..increments {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });
    }

    while let Some(result) = set.join_next().await {
        result?;
    }

    let total = counter.load(Ordering::SeqCst);
    tracing::info!(total, "Atomic counter finished");

    Ok(total)
}
