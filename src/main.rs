use anyhow::{bail, Context, Result};
use cli::{Cli, Commands, RenderArgs, StylesArgs};
use config::Settings;
use error::ProcessingError;
use indicatif::{ProgressBar, ProgressStyle};
use sinks::html::{self, styles, DocumentShell};
use sinks::pdf;
use source::RemoteSource;
use std::path::Path;
use std::process::ExitCode;
use transform::MarkdownRenderer;

mod cli;
mod config;
mod error;
mod sinks;
mod source;
mod transform;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(e) = e.downcast_ref::<ProcessingError>() {
                println!("{}: {e}", console::style("Error").red());
            } else {
                println!("{}: {e:#}", console::style("Unexpected error").red());
                println!(
                    "This program is licensed under AGPL-3.0. Source code is available at: {}",
                    html::SOURCE_CODE_URL
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        None => render(&cli.config, &RenderArgs::default()),
        Some(Commands::Render(args)) => render(&cli.config, args),
        Some(Commands::Config) => write_config(&cli.config),
        Some(Commands::Styles(args)) => write_styles(&cli.config, args),
    }
}

fn write_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists, refusing to overwrite it", path.display());
    }

    let contents = toml::to_string_pretty(&Settings::default())
        .with_context(|| "Failed to serialize default settings")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

fn write_styles(config: &Path, args: &StylesArgs) -> Result<()> {
    let settings = Settings::load(config)?;
    let path = &settings.content.stylesheet;
    if path.exists() && !args.force {
        bail!(
            "{} already exists, use --force to overwrite it",
            path.display()
        );
    }

    styles::write_default(path)?;
    println!("Wrote default stylesheet to {}", path.display());
    Ok(())
}

fn render(config: &Path, args: &RenderArgs) -> Result<()> {
    println!(
        "{} v{}",
        console::style(env!("CARGO_PKG_NAME")).bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("This program comes with ABSOLUTELY NO WARRANTY; it is free software licensed under the AGPL-3.0.\n");

    println!("Loading configuration...");
    let settings = Settings::load(config)?;
    let css = styles::load_or_create(&settings.content.stylesheet)?;

    // removed when dropped, whichever way the run ends
    let workdir = tempfile::tempdir().with_context(|| "Failed to create working directory")?;

    let remote = RemoteSource::from_settings(&settings.source)?;
    println!("Syncing {} ({})...", remote.url, remote.branch);
    source::sync(&remote)?;

    let documents = source::discover(&remote.docs_root())?;
    println!("Found {} documents", documents.len());

    let renderer = MarkdownRenderer::new(&settings.content.syntax_theme)?;
    let progress = ProgressBar::new(documents.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("can parse progress style")
            .progress_chars("#>-"),
    );
    progress.set_message("Processing documents...");

    let book = html::assemble(
        &documents,
        &renderer,
        &settings.content.image_base_url,
        &progress,
    )?;
    progress.finish_and_clear();

    let shell = DocumentShell::new(&settings.content, &css);
    let document = book.to_html(&shell);
    if let Some(path) = &args.html {
        std::fs::write(path, &document)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let outfile = args
        .output
        .clone()
        .unwrap_or_else(|| settings.pdf.outfile());
    println!("Generating PDF...");
    let size = pdf::render(&document, &outfile, &settings.pdf, workdir.path())?;
    let size = byte_unit::Byte::from_u64(size).get_appropriate_unit(byte_unit::UnitType::Binary);

    println!();
    println!("  Pages:    {}", book.pages.len());
    if book.skipped > 0 {
        println!(
            "  Skipped:  {}",
            console::style(format!("{} documents", book.skipped)).yellow()
        );
    }
    if let Some(path) = &args.html {
        println!("  HTML:     {}", path.display());
    }
    println!("  PDF:      {} ({size:.2})", outfile.display());

    Ok(())
}
