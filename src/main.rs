//! echoroute CLI: run utterances through the assistant pipeline.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use echoroute::console::{ConsoleObserver, ConsolePlayback, ConsoleRenderer};
use echoroute::{Config, Orchestrator, PipelineReport, RandomSampler, ToolCatalog};

#[derive(Parser)]
#[command(name = "echoroute", version, about = "Voice-first hybrid assistant demo")]
struct Cli {
    /// Config file path (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start with spoken confirmations muted.
    #[arg(long, global = true)]
    no_voice: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single utterance through the pipeline.
    Ask {
        /// The utterance, as one or more words.
        #[arg(required = true, trailing_var_arg = true)]
        utterance: Vec<String>,
    },
    /// Interactive session: type utterances, `:voice on|off`, `exit`.
    Repl,
    /// Print the built-in tool catalog.
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("echoroute=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_voice {
        config.voice.enabled = false;
    }

    match cli.command {
        Command::Ask { utterance } => {
            let orch = build_orchestrator(config);
            let report = orch.submit(&utterance.join(" ")).await?;
            print_summary(&report);
        }
        Command::Repl => repl(build_orchestrator(config)).await?,
        Command::Tools => print_catalog(),
    }
    Ok(())
}

fn build_orchestrator(config: Config) -> Orchestrator {
    Orchestrator::new(
        config,
        Box::new(RandomSampler),
        Box::new(ConsolePlayback),
        Box::new(ConsoleRenderer),
        Box::new(ConsoleObserver),
    )
}

async fn repl(orch: Orchestrator) -> Result<()> {
    println!("🎙️  echoroute — type an utterance, `:voice on|off`, or `exit`.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        use std::io::Write as _;
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => break,
            ":voice on" => orch.set_voice_enabled(true),
            ":voice off" => orch.set_voice_enabled(false),
            _ => match orch.submit(line).await {
                Ok(report) => print_summary(&report),
                Err(error) => eprintln!("⚠️  {error}"),
            },
        }
    }
    Ok(())
}

fn print_summary(report: &PipelineReport) {
    let intents = if report.intents.is_empty() {
        "none".to_string()
    } else {
        report
            .intents
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!();
    println!(
        "  {} · confidence {:.2} vs {} threshold {:.2} · intents: {intents} · {} ms total",
        report.decision.target,
        report.decision.confidence,
        report.complexity.level,
        report.complexity.threshold,
        report.total_ms,
    );
}

fn print_catalog() {
    for schema in ToolCatalog::builtin().schemas() {
        println!("🔧 {} — {}", schema.name, schema.description);
        for param in &schema.parameters {
            let req = if param.required { "required" } else { "optional" };
            println!("     {} ({:?}, {req}) — {}", param.name, param.kind, param.description);
        }
    }
}
