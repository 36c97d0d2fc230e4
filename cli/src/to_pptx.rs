//! to-pptx - export rendered slide HTML files to a PowerPoint deck

mod common;

use clap::Parser;
use colored::*;
use deckgen::{export_pptx, ExportOptions, SlideLayout};
use std::path::PathBuf;

/// Convert a directory of slide HTML files into a .pptx presentation
#[derive(Parser)]
#[command(
    name = "to-pptx",
    author = "iyulab",
    version,
    about = "Export slide HTML files to PowerPoint",
    long_about = "to-pptx - export slide HTML files to PowerPoint.\n\n\
                  Every .html file in the slides directory becomes one slide,\n\
                  in natural file name order (slide2 before slide10)."
)]
struct Cli {
    /// Directory holding the slide HTML files
    #[arg(long)]
    slides: PathBuf,

    /// Output .pptx path
    #[arg(long)]
    out: PathBuf,

    /// Presentation title
    #[arg(long)]
    title: Option<String>,

    /// Presentation author
    #[arg(long)]
    author: Option<String>,

    /// Slide size: 16x9, 16x10, 4x3 or wide
    #[arg(long, default_value = "16x9")]
    layout: SlideLayout,

    /// Log each converted file
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
    let mut options = ExportOptions::new().with_layout(cli.layout);
    if let Some(title) = cli.title {
        options = options.with_title(title);
    }
    if let Some(author) = cli.author {
        options = options.with_author(author);
    }

    let pb = common::create_spinner("Converting slides...");
    let result = export_pptx(&cli.slides, &cli.out, &options);
    pb.finish_and_clear();
    let summary = result?;

    println!(
        "{} Exported {} slides to {}",
        "✓".green().bold(),
        summary.slides,
        summary.out.display()
    );
    if summary.images > 0 {
        println!("  {} images embedded", summary.images);
    }
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
    fn test_layout_argument() {
        let cli = Cli::try_parse_from([
            "to-pptx", "--slides", "web/slides", "--out", "deck.pptx", "--layout", "wide",
        ])
        .unwrap();
        assert_eq!(cli.layout, SlideLayout::Wide);

        let cli = Cli::try_parse_from(["to-pptx", "--slides", "s", "--out", "d.pptx"]).unwrap();
        assert_eq!(cli.layout, SlideLayout::Widescreen16x9);

        assert!(Cli::try_parse_from([
            "to-pptx", "--slides", "s", "--out", "d.pptx", "--layout", "a4"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["to-pptx", "--slides", "s"]).is_err());
    }
}
