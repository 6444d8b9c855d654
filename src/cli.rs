//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// AI passport photos and stylized portraits from a single photo.
#[derive(Parser, Debug)]
#[command(name = "photoforge", version, about)]
pub struct Cli {
    /// What to make.
    #[command(subcommand)]
    pub command: Command,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a photo into an official passport photo.
    Passport(PassportArgs),
    /// Generate two stylized portraits from a photo.
    Portrait(PortraitArgs),
    /// List countries, attire, styles and other choices.
    Options,
}

/// Where the photo comes from and where the result goes.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Photo to convert (PNG or JPEG, up to 4MB).
    #[arg(required_unless_present = "camera", conflicts_with = "camera")]
    pub image: Option<PathBuf>,

    /// Take the photo with the configured camera instead.
    #[arg(long)]
    pub camera: bool,

    /// Use the first camera capture without asking (camera only).
    #[arg(short, long, conflicts_with = "image")]
    pub yes: bool,

    /// Directory to save the download in (default from config, else current dir).
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

/// `passport` options.
#[derive(Args, Debug)]
pub struct PassportArgs {
    /// Photo source.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Target country (name or slug, see `photoforge options`).
    #[arg(short, long)]
    pub country: Option<String>,

    /// Attire change.
    #[arg(short, long)]
    pub attire: Option<String>,

    /// Background colour; must be allowed for the country.
    #[arg(short, long)]
    pub background: Option<String>,
}

/// `portrait` options.
#[derive(Args, Debug)]
pub struct PortraitArgs {
    /// Photo source.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Portrait style.
    #[arg(short, long)]
    pub style: Option<String>,

    /// Scene override.
    #[arg(long)]
    pub scene: Option<String>,

    /// Pose override.
    #[arg(long)]
    pub pose: Option<String>,

    /// Expression override.
    #[arg(long)]
    pub expression: Option<String>,

    /// Output aspect ratio (e.g., 1:1, 3:4, 9:16).
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Additional instructions for the model.
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Which of the two portraits to save.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub pick: u8,
}

impl SourceArgs {
    /// Download directory: the flag, else the configured default.
    #[must_use]
    pub fn resolve_out_dir(&self, configured: &std::path::Path) -> PathBuf {
        self.out_dir.clone().unwrap_or_else(|| configured.to_path_buf())
    }
}
