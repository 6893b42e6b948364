use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use coursegrab::chapter::{ChapterNumber, fetch_chapter};
use coursegrab::error::GrabError;
use coursegrab::fetch::HttpArchiveSource;
use coursegrab::grab::{ProgressEvent, ProgressSink};
use coursegrab::workspace::CODESPACES_ROOT;

#[derive(Parser)]
#[command(name = "grabchapter")]
#[command(about = "Grab a book chapter's files into your codespace")]
#[command(version, author)]
struct Cli {
    /// Chapter number, 1 through 18
    chapter: String,
}

struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn event(&self, event: ProgressEvent) {
        println!("... {}", event.message);
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("ERROR: {report}");
        if let Some(error) = report.downcast_ref::<GrabError>() {
            return ExitCode::from(error.exit_code());
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let number: ChapterNumber = cli.chapter.parse().into_diagnostic()?;

    println!("STARTING grabchapter ...");

    let source = HttpArchiveSource::new().into_diagnostic()?;
    let root = Utf8PathBuf::from(CODESPACES_ROOT);
    let outcome = fetch_chapter(number, &source, &root, &ConsoleSink).into_diagnostic()?;

    println!("grabchapter COMPLETE");
    println!();
    println!(
        "To run a script in {}, make sure to put yourself",
        outcome.dir_name
    );
    println!(
        "in that directory by executing: cd {}",
        outcome.workspace.join(&outcome.dir_name)
    );
    println!();
    Ok(())
}
