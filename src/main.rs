use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use closings::board::{CheckOutcome, SharedBoard, StatusBoard, run_check};
use closings::cli::Cli;
use closings::config::Config;
use closings::gemini::{GeminiClient, GenerationClient};
use closings::prompts::PromptEngine;
use closings::render::{render_json, render_text};
use closings::service::StatusService;

/// Exit code when the check produced no usable answer.
const SOFT_FAILURE_EXIT: i32 = 2;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    info!(?config, "config loaded");

    let client = match GeminiClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let prompts = PromptEngine::new(config.prompt_dir.clone());
    let service = Arc::new(StatusService::new(client, prompts, config.mode));
    let board: SharedBoard = Arc::new(Mutex::new(StatusBoard::new()));

    if config.interactive {
        interactive(board, service).await;
        return;
    }

    match run_check(&board, service.clone()).await {
        CheckOutcome::Applied(result) => {
            let error = result.is_soft_failure();
            if config.json {
                match render_json(&result) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("error: {e}");
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", render_text(&result, error, service.district()));
            }
            if error {
                std::process::exit(SOFT_FAILURE_EXIT);
            }
        }
        outcome => {
            eprintln!("error: status check did not complete ({outcome:?})");
            std::process::exit(1);
        }
    }
}

async fn interactive<C>(board: SharedBoard, service: Arc<StatusService<C>>)
where
    C: GenerationClient + Send + Sync + 'static,
{
    spawn_check(board.clone(), service.clone());
    eprintln!("Enter: refresh, c: cancel, q: quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match line.trim() {
            "q" | "quit" => break,
            "c" | "cancel" => {
                if board.lock().await.cancel() {
                    eprintln!("check cancelled");
                }
            }
            _ => spawn_check(board.clone(), service.clone()),
        }
    }
}

fn spawn_check<C>(board: SharedBoard, service: Arc<StatusService<C>>)
where
    C: GenerationClient + Send + Sync + 'static,
{
    tokio::spawn(async move {
        match run_check(&board, service.clone()).await {
            CheckOutcome::Applied(result) => {
                let error = result.is_soft_failure();
                println!("{}", render_text(&result, error, service.district()));
            }
            CheckOutcome::Failed => eprintln!("status check failed; press Enter to retry"),
            CheckOutcome::Refused => eprintln!("a check is already in progress"),
            CheckOutcome::Stale => {}
        }
    });
}
