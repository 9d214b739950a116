//! One-shot believer score CLI
//!
//! scorer [--snapshot FILE] [report | token ADDRESS | believers ADDRESS [LIMIT]]

use std::{env, error::Error};

use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorer::{BelieverPipeline, GraphAccess, MemoryGraph, PgGraph, PipelineConfig};

#[derive(Debug)]
enum Command {
    Report,
    Token(String),
    Believers(String, Option<usize>),
}

fn usage() -> String {
    "usage: scorer [--snapshot FILE] [report | token ADDRESS | believers ADDRESS [LIMIT]]"
        .to_string()
}

fn parse_args(mut args: Vec<String>) -> Result<(Option<String>, Command), String> {
    let snapshot = match args.iter().position(|a| a == "--snapshot") {
        Some(idx) => {
            if idx + 1 >= args.len() {
                return Err(usage());
            }
            let path = args.remove(idx + 1);
            args.remove(idx);
            Some(path)
        }
        None => None,
    };

    let command = match args.as_slice() {
        [] => Command::Report,
        [cmd] if cmd == "report" => Command::Report,
        [cmd, address] if cmd == "token" => Command::Token(address.clone()),
        [cmd, address] if cmd == "believers" => Command::Believers(address.clone(), None),
        [cmd, address, limit] if cmd == "believers" => {
            let limit = limit.parse::<usize>().map_err(|_| usage())?;
            Command::Believers(address.clone(), Some(limit))
        }
        _ => return Err(usage()),
    };

    Ok((snapshot, command))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run<G>(pipeline: BelieverPipeline<G>, command: Command) -> Result<(), Box<dyn Error>>
where
    G: GraphAccess + Sync,
{
    match command {
        Command::Report => print_json(&pipeline.token_report().await?),
        Command::Token(address) => print_json(&pipeline.token_score(&address).await?),
        Command::Believers(address, limit) => {
            print_json(&pipeline.believers(&address, limit).await?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let (snapshot, command) = parse_args(env::args().skip(1).collect())?;
    let config = PipelineConfig::from_env()?;
    tracing::debug!(?config, ?command, "Starting believer score run");

    match snapshot {
        Some(path) => {
            let graph = MemoryGraph::from_json_file(&path)?;
            tracing::info!(snapshot = %path, "Loaded graph snapshot");
            run(BelieverPipeline::new(graph, config), command).await
        }
        None => {
            let db_pool = believer_db::initialize_database().await?;
            tracing::info!("Connected to Postgres");
            run(BelieverPipeline::new(PgGraph::new(db_pool), config), command).await
        }
    }
}
