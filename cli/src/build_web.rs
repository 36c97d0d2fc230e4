//! build-web - render a slide spec into a static HTML deck

mod common;

use clap::Parser;
use colored::*;
use deckgen::{build_deck, BuildOptions};
use std::path::PathBuf;

/// Render a YAML or JSON slide spec into a themed HTML deck
#[derive(Parser)]
#[command(
    name = "build-web",
    author = "iyulab",
    version,
    about = "Render a slide spec into a static HTML deck",
    long_about = "build-web - render a slide spec into a static HTML deck.\n\n\
                  Writes one page per slide under slides/, copies chart images to\n\
                  assets/ and creates an index.html viewer."
)]
struct Cli {
    /// Spec file (.yml, .yaml or .json)
    #[arg(long)]
    spec: PathBuf,

    /// Output directory (default: output.web_dir from the spec)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Replace the output directory if it exists
    #[arg(long)]
    force: bool,

    /// Theme token file (default: bundled theme)
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Log each rendered slide and copied asset
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli: Cli = common::parse_args();
    common::init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = BuildOptions::new(&cli.spec).with_force(cli.force);
    if let Some(out) = cli.out {
        options = options.with_out(out);
    }
    if let Some(theme) = cli.theme {
        options = options.with_theme(theme);
    }

    let pb = common::create_spinner("Rendering slides...");
    let result = build_deck(&options);
    pb.finish_and_clear();
    let summary = result?;

    println!(
        "{} Built {} slides in {}",
        "✓".green().bold(),
        summary.slides.len(),
        summary.out_dir.display()
    );
    if summary.assets > 0 {
        println!("  {} assets copied", summary.assets);
    }
    println!(
        "  Open {}",
        summary.out_dir.join("index.html").display().to_string().cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_spec_is_required() {
        assert!(Cli::try_parse_from(["build-web"]).is_err());
        let cli = Cli::try_parse_from(["build-web", "--spec", "deck.yml", "--force", "-v"]).unwrap();
        assert!(cli.force && cli.verbose);
        assert!(cli.out.is_none());
    }
}
