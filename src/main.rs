// src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use inkwiz_history::db::DEFAULT_QUOTA_BYTES;
use inkwiz_history::Result;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn run(cli: Cli) -> Result<()> {
    let db_path = commands::resolve_db_path(cli.db)?;
    let quota = cli.quota_bytes.unwrap_or(DEFAULT_QUOTA_BYTES);

    match cli.command {
        Commands::Init => commands::handle_init(&db_path),
        Commands::Add {
            extracted,
            corrected,
            image,
        } => {
            let mut store = commands::open_store(&db_path, quota)?;
            commands::handle_add(&mut store, &mut io::stdout().lock(), &extracted, &corrected, &image)
        }
        Commands::List => commands::handle_list(&commands::open_store(&db_path, quota)?),
        Commands::Show { id } => commands::handle_show(&commands::open_store(&db_path, quota)?, id),
        Commands::Clear { yes } => {
            let mut store = commands::open_store(&db_path, quota)?;
            commands::handle_clear(&mut store, yes)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
