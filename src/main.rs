use std::io::{self, Write as _};

use anyhow::Context as _;
use clap::Parser as _;
use manual_sort::MergeEngine;
use rand::SeedableRng as _;

mod cli;
mod config;
mod items;
mod session;
mod store;

/// Program entry point
fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never end up between the questions on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli::Args { config, command } = cli::Args::parse();

    let config_path = match config {
        Some(path) => path,
        None => config::config_path()?,
    };

    match command {
        cli::Command::Sort(args) => run_sort(args, &config::load_config(&config_path)?),
        cli::Command::Status(args) => run_status(args, &config::load_config(&config_path)?),
        cli::Command::Init => {
            config::create_default_config(&config_path)?;
            println!("Created config at {}", config_path.display());
            Ok(())
        }
    }
}

/// Run an interactive sort, resuming saved progress if there is any
fn run_sort(args: cli::SortArgs, config: &config::Config) -> anyhow::Result<()> {
    let state_path = config.state_file(args.state.clone());
    let autosave = config.autosave(args.no_autosave);

    let saved = if args.fresh {
        store::clear(&state_path)?;
        None
    } else {
        store::load::<String>(&state_path)?
    };

    let mut engine = match saved {
        Some(engine) => {
            if args.items.is_some() || !args.inline_items.is_empty() {
                tracing::warn!("ignoring the given items, resuming saved progress instead");
            }
            println!(
                "Resuming {} items from {} ({:.0}% done)",
                engine.len(),
                state_path.display(),
                engine.percent()
            );
            engine
        }
        None => {
            let items = items::load_items(&args)?;
            println!("Sorting {} items", items.len());
            match args.seed {
                Some(seed) => {
                    MergeEngine::with_rng(items, &mut rand::rngs::StdRng::seed_from_u64(seed))
                }
                None => MergeEngine::new(items),
            }
        }
    };

    let bar = indicatif::ProgressBar::new(100).with_style(
        indicatif::ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}%")?,
    );

    let outcome = session::run(
        &mut engine,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
        &bar,
        |engine| {
            if autosave {
                store::save(&state_path, engine)?;
            }
            Ok(())
        },
    )?;

    match outcome {
        session::Outcome::Finished => {
            let comparisons = engine.comparisons();
            let sorted = engine
                .into_sorted()
                .map_err(|_| anyhow::anyhow!("session finished before the sort did"))?;

            print_order(&sorted, args.json)?;
            if let Some(path) = &args.output {
                std::fs::write(path, sorted.join("\n") + "\n")
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            store::clear(&state_path)?;

            eprintln!("Done after {comparisons} decisions");
        }
        session::Outcome::Paused => {
            store::save(&state_path, &engine)?;
            println!("\nProgress saved to {}", state_path.display());
        }
        session::Outcome::Abandoned => {
            if autosave {
                println!("Stopped, progress up to the last decision is in {}", state_path.display());
            } else {
                println!("Stopped without saving");
            }
        }
    }

    Ok(())
}

/// Report how far the saved sort has come
fn run_status(args: cli::StatusArgs, config: &config::Config) -> anyhow::Result<()> {
    let state_path = config.state_file(args.state);

    match store::load::<String>(&state_path)? {
        None => println!("No saved progress at {}", state_path.display()),
        Some(engine) if engine.is_done() => {
            println!("{} items, finished", engine.len());
        }
        Some(engine) => println!(
            "{} items, {} of about {} decisions made ({:.0}%)",
            engine.len(),
            engine.comparisons(),
            engine.max_comparisons(),
            engine.percent()
        ),
    }

    Ok(())
}

/// Print the final order, best first
fn print_order(sorted: &[String], json: bool) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();

    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(sorted)?)?;
    } else {
        writeln!(stdout)?;
        let width = sorted.len().to_string().len();
        for (rank, item) in sorted.iter().enumerate() {
            writeln!(stdout, "{:>width$}. {item}", rank + 1)?;
        }
    }

    Ok(())
}
