//! Confdoc CLI - generates configuration reference documentation

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use confdoc_core::{ConfigDocument, GeneratedDocs, Verdict};

#[derive(Parser)]
#[command(name = "confdoc")]
#[command(version = confdoc_core::VERSION)]
#[command(about = "Generate configuration reference documentation", long_about = None)]
struct Cli {
    /// Path to the metadata document (JSON)
    #[arg(long, short)]
    input: PathBuf,

    /// Directory to write one Markdown file per struct into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write all structs into a single combined Markdown file
    #[arg(long)]
    combined: Option<PathBuf>,

    /// Treat schema anomalies as diagnostics instead of hard errors
    #[arg(long)]
    lenient: bool,

    /// Suppress the diagnostics report when the run succeeds
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(Verdict::Success) => ExitCode::SUCCESS,
        Ok(Verdict::Failure) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<Verdict> {
    let json = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let document: ConfigDocument = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    let docs = if cli.lenient {
        confdoc_core::generate_lenient(document)?
    } else {
        confdoc_core::generate(document)?
    };

    // Best-effort output is written even on a Failure verdict; the exit
    // code tells CI what happened.
    write_output(cli, &docs)?;

    let verdict = docs.report.verdict();
    if !(cli.quiet && verdict == Verdict::Success) {
        eprint!("{}", docs.report.render());
    }

    Ok(verdict)
}

fn write_output(cli: &Cli, docs: &GeneratedDocs) -> Result<()> {
    if let Some(output_dir) = &cli.output_dir {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;
        for document in &docs.documents {
            let path = output_dir.join(&document.file_name);
            write_file(&path, &document.markdown)?;
        }
    }

    if let Some(combined) = &cli.combined {
        write_file(combined, &docs.combined())?;
    }

    if cli.output_dir.is_none() && cli.combined.is_none() {
        print!("{}", docs.combined());
    }

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
