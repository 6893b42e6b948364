use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use coursegrab::error::GrabError;
use coursegrab::notebook::{StripEvent, output_path, read_notebook, strip_notes, write_notebook};

#[derive(Parser)]
#[command(name = "strip-notes")]
#[command(about = "Remove presenter-only notes cells from a Jupyter notebook")]
#[command(version, author)]
struct Cli {
    /// Path to a .ipynb file; output lands next to it with a -nonotes suffix
    notebook: String,
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
    let out_path = Utf8PathBuf::from(output_path(&cli.notebook).into_diagnostic()?);
    let in_path = Utf8PathBuf::from(cli.notebook);

    let mut notebook = read_notebook(&in_path).into_diagnostic()?;
    println!(
        "Processing {in_path}, which contains {} cells",
        notebook.cells.len()
    );

    let report = strip_notes(&mut notebook);
    for event in &report.events {
        match event {
            StripEvent::Deleted(i) => println!("Deleting cell {i}"),
            StripEvent::MissingMetadata(i) => println!("Cell {i} has no metadata"),
        }
    }

    write_notebook(&out_path, &notebook).into_diagnostic()?;
    println!("Wrote {out_path}");
    Ok(())
}
