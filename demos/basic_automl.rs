//! Basic AutoML example for the H2O AutoML client.
//!
//! Runs a short AutoML search on frames that already exist on the cluster,
//! prints the leaderboard and scores a test frame with the leader.
//!
//! Run with: `cargo run --example basic_automl -- <train frame> <response> [test frame]`
//!
//! The cluster address comes from `H2O_URL` (default `http://localhost:54321`);
//! see `ConnectionConfig::load_from_environment` for the other variables.

use anyhow::{bail, Context};
use h2o_automl::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    h2o_automl::init()?;

    println!("H2O AutoML Client - Basic Example");
    println!("=================================");

    let mut args = std::env::args().skip(1);
    let (train_id, response) = match (args.next(), args.next()) {
        (Some(train), Some(response)) => (train, response),
        _ => bail!("usage: basic_automl <train frame> <response column> [test frame]"),
    };
    let test_id = args.next();

    let connection = ConnectionConfig::load_from_environment()
        .context("invalid H2O_* environment variables")?;
    let client = H2oClient::connect(&connection)?;

    let config = AutoMLConfig::builder()
        .max_runtime_secs(120)
        .max_models(10)
        .seed(1)
        .build()?;
    let mut automl = AutoML::new(client.clone(), config).await;

    let train = client
        .frame(&train_id)
        .await
        .with_context(|| format!("training frame {} not found", train_id))?;
    println!(
        "Training frame {}: {} columns, {} rows",
        train.id(),
        train.ncols(),
        train.nrows().unwrap_or_default()
    );

    // Run and wait; Ctrl-C cancels the remote job before exiting.
    let request = TrainRequest::new(response.as_str(), &train);
    let job = automl.submit(&request).await?;
    println!("Submitted job {} (run {})", job.job_key(), job.dest_key());

    tokio::select! {
        result = job.wait(&client) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            job.cancel(&client).await?;
            bail!("interrupted; job {} cancelled", job.job_key());
        }
    }

    if !automl.refresh().await? {
        bail!("the run finished without building a model");
    }

    if let Some(leaderboard) = automl.leaderboard() {
        println!();
        println!("Leaderboard ({} models):", leaderboard.len());
        println!("{}", leaderboard.table());
    }

    if let Some(leader) = automl.leader().await? {
        println!();
        println!("Leader: {} ({})", leader.id(), leader.algo());
    }

    if let Some(test_id) = test_id {
        let test = client.frame(&test_id).await?;
        let predictions = automl.predict(&test).await?;
        println!(
            "Predictions written to frame {} ({} columns)",
            predictions.id(),
            predictions.ncols()
        );
    }

    Ok(())
}
