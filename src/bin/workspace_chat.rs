//! workspace-chat: command-line client for the workspace chat backend
//!
//! Usage:
//!   workspace-chat send <prompt> [--uuid <id>]   Stream a reply to stdout
//!   workspace-chat list                          List workspaces
//!
//! Reads `WORKSPACE_API_BASE_URL` and the other `WORKSPACE_*` variables.

use anyhow::{bail, Context};
use std::io::Write;
use tracing_subscriber::EnvFilter;
use workspace_chat::types::{ModelResponse, Publication};
use workspace_chat::{ChatClient, ChatPayload, Error, Notice, Outcome, StreamHandler};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "send" => cmd_send(&args[2..]).await,
        "list" => cmd_list().await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"workspace-chat — workspace chat command-line client

USAGE:
    workspace-chat <COMMAND> [OPTIONS]

COMMANDS:
    send <prompt> [--uuid <id>]   Send a prompt and stream the reply
    list                          List workspaces
    version                       Show version information
    help                          Show this help message

ENVIRONMENT:
    WORKSPACE_API_BASE_URL             Backend root URL (required)
    WORKSPACE_HTTP_TIMEOUT_MS          Request timeout (default 10000)
    WORKSPACE_STREAM_IDLE_TIMEOUT_MS   Max silence inside a chat stream
    WORKSPACE_STRICT_FRAMES=1          Abort on undecodable stream lines
    RUST_LOG                           Log filter (default warn)"#
    );
}

fn cmd_version() {
    println!("workspace-chat {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
            continue;
        }
        out.push(arg.as_str());
    }
    out
}

async fn cmd_send(args: &[String]) -> anyhow::Result<()> {
    let prompt = positional(args).join(" ");
    if prompt.trim().is_empty() {
        bail!("send needs a prompt");
    }

    let client = ChatClient::from_env().context("building client")?;
    let mut payload = ChatPayload::new(prompt);
    if let Some(uuid) = flag_value(args, "--uuid") {
        payload = payload.with_uuid(uuid);
    }

    let session = client.session();
    let cancel = session.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut printer = Printer::default();
    let summary = session.run(&payload, &mut printer).await;
    ctrl_c.abort();

    match summary.outcome {
        Outcome::Completed => Ok(()),
        Outcome::Cancelled => {
            eprintln!("cancelled");
            Ok(())
        }
        Outcome::Failed { status } => match Notice::from_status(status) {
            Some(notice) => bail!("{}", notice.message),
            None if status == 0 => bail!("network error"),
            None => bail!("request failed with HTTP {status}"),
        },
    }
}

async fn cmd_list() -> anyhow::Result<()> {
    let client = ChatClient::from_env().context("building client")?;
    let workspaces = client
        .list_workspaces()
        .await
        .context("listing workspaces")?;

    if workspaces.is_empty() {
        println!("No workspaces.");
        return Ok(());
    }
    println!("{:<38} NAME", "UUID");
    for ws in workspaces {
        println!("{:<38} {}", ws.uuid, ws.name);
    }
    Ok(())
}

/// Writes `ai` text as it arrives; everything else goes to stderr.
#[derive(Default)]
struct Printer {
    wrote_text: bool,
}

impl StreamHandler for Printer {
    fn on_chat(&mut self, fragment: ModelResponse) {
        match fragment {
            ModelResponse::Ai { content } => {
                let mut out = std::io::stdout().lock();
                let _ = out.write_all(content.as_bytes());
                let _ = out.flush();
                self.wrote_text = true;
            }
            ModelResponse::ToolCall(progress) => {
                let state = if progress.is_complete { "done" } else { "running" };
                eprintln!("[tool {} {}]", progress.tool_name, state);
            }
        }
    }

    fn on_record(&mut self, name: String, uuid: String) {
        eprintln!("[workspace {} ({})]", name, uuid);
    }

    fn on_query(&mut self, publications: Vec<Publication>) {
        eprintln!("[{} results]", publications.len());
        for p in publications {
            eprintln!("  - {} ({})", p.title, p.source);
        }
    }

    fn on_stream_error(&mut self, message: String) {
        eprintln!("[server error] {}", message);
    }

    fn on_error(&mut self, status: u16, error: &Error) {
        tracing::debug!(status, error = %error, "chat request failed");
    }

    fn on_end(&mut self) {
        if self.wrote_text {
            println!();
        }
    }
}
