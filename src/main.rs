// Copyright 2026 The Llmtap Project
// SPDX-License-Identifier: Apache-2.0

use clap::{Parser, Subcommand};
use llmtap::cook;
use llmtap::detect::FormatChoice;
use llmtap::proxy::{self, AppState};
use llmtap::storage::JsonlSink;
use llmtap::upstream::ReqwestUpstream;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "llmtap", about = "Tracing proxy and trace cooker for LLM APIs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the capture proxy
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1", env = "LLMTAP_HOST")]
        host: IpAddr,

        /// Port to listen on
        #[arg(long, default_value_t = 8080, env = "LLMTAP_PORT")]
        port: u16,

        /// Upstream origin to forward traffic to
        #[arg(long, default_value = "https://api.openai.com", env = "LLMTAP_TARGET")]
        target: String,

        /// Trace output file (JSONL, appended)
        #[arg(long, default_value = "./traces/trace.jsonl", env = "LLMTAP_OUTPUT")]
        output: PathBuf,
    },

    /// Cook a raw trace file into a deduplicated dataset
    Cook {
        /// Raw trace input (JSON array, single object, or JSONL)
        input: PathBuf,

        /// Cooked output path
        #[arg(short, long, default_value = "./output.json")]
        output: PathBuf,

        /// Wire format, or auto-detect per record
        #[arg(long, value_enum, default_value_t = FormatChoice::Auto)]
        format: FormatChoice,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve {
            host,
            port,
            target,
            output,
        } => serve(SocketAddr::new(host, port), target, output).await,
        Command::Cook {
            input,
            output,
            format,
        } => run_cook(&input, &output, format),
    }
}

async fn serve(addr: SocketAddr, target: String, output: PathBuf) {
    let sink = match JsonlSink::open(&output).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("failed to open trace sink: {e}");
            std::process::exit(1);
        }
    };

    let upstream = match ReqwestUpstream::new() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("failed to build upstream client: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState::new(upstream, sink, &target);
    let app = proxy::build_router(state);

    println!("llmtap proxy listening on http://{addr}");
    println!("  forwarding to {target}");
    println!("  tracing to {}", output.display());
    tracing::info!(%addr, %target, output = %output.display(), "llmtap listening");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, "failed to bind: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

fn run_cook(input: &PathBuf, output: &PathBuf, format: FormatChoice) {
    match cook::cook_traces(input, output, format) {
        Ok(summary) => {
            println!("Processed {} records", summary.records);
            println!("  Messages: {} (deduplicated)", summary.messages);
            println!("  Tools: {} (deduplicated)", summary.tools);
            println!("  Requests: {}", summary.requests);
            println!("Output written to: {}", output.display());
        }
        Err(e) => {
            tracing::error!("cook failed: {e}");
            eprintln!("cook failed: {e}");
            std::process::exit(1);
        }
    }
}
