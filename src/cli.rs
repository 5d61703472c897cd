// src/cli.rs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "inkwiz - history of image-to-text extraction results",
    long_about = "inkwiz keeps the 30 most recent extraction results (raw text, corrected text and an image thumbnail) in a local store and lists them grouped by day."
)]
pub struct Cli {
    /// Path to the history database. Defaults to ~/.config/inkwiz/history.db
    #[arg(long, global = true, env = "INKWIZ_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Maximum size in bytes of the stored history snapshot.
    #[arg(long, global = true, env = "INKWIZ_QUOTA_BYTES", value_name = "BYTES")]
    pub quota_bytes: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initializes the history database.
    Init,

    /// Records an extraction result together with a thumbnail of its image.
    Add {
        #[arg(short, long, help = "Text recognized in the image")]
        extracted: String,
        #[arg(short, long, help = "Text after correction")]
        corrected: String,
        #[arg(short, long, help = "The source image (PNG, JPG or WEBP, max 16MB)")]
        image: PathBuf,
    },

    /// Lists history grouped by day, newest first.
    List,

    /// Shows a single history entry by its ID.
    Show {
        #[arg(help = "The numeric ID of the history entry")]
        id: i64,
    },

    /// Deletes the entire history.
    Clear {
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}
