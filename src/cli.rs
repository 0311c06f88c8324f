use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Also write the assembled HTML document to this path
    #[clap(long)]
    pub html: Option<PathBuf>,

    /// Write the PDF here instead of the dated default file name
    #[clap(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StylesArgs {
    /// Overwrite an existing stylesheet
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetches the documentation and renders it into a single PDF (default)
    Render(RenderArgs),
    /// Generates a docs-pdf.toml config file containing the default settings
    Config,
    /// Writes the default stylesheet so it can be customised
    Styles(StylesArgs),
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Settings file; defaults are used for anything it doesn't set
    #[clap(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}
