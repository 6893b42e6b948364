use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use coursegrab::error::GrabError;
use coursegrab::fetch::HttpArchiveSource;
use coursegrab::grab::{Grabber, ProgressEvent, ProgressSink};
use coursegrab::resource::Resource;

#[derive(Parser)]
#[command(name = "grab32")]
#[command(about = "Grab CS32 chapter, pset, or setup files into your codespace")]
#[command(version, author)]
struct Cli {
    /// chapNN (01-10), psetN (1-5), or cs32-setup
    resource: String,
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
    let resource: Resource = cli.resource.parse().into_diagnostic()?;

    println!("STARTING grab32 ...");

    let source = HttpArchiveSource::new().into_diagnostic()?;
    let grabber = Grabber::new(source);
    let outcome = grabber.run(&resource, &ConsoleSink).into_diagnostic()?;

    println!("grab32 COMPLETE");
    println!();
    if !outcome.setup {
        println!("To run a script in {}, make sure to put yourself", outcome.repo);
        println!(
            "in that directory by executing: cd {}",
            outcome.workspace.join(&outcome.repo)
        );
        println!();
    }
    Ok(())
}
