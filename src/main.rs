use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use homedir::my_home;
use serde_json::json;
use tracing_subscriber::EnvFilter;

mod app;
mod catalog;
mod cli;
mod config;
mod dataset;
#[cfg(test)]
mod tests;
mod text;
mod web;

use app::RecommenderService;
use catalog::CatalogBuilder;
use config::Config;

fn base_path() -> anyhow::Result<String> {
    if let Ok(path) = std::env::var("REEL_BASE_PATH") {
        return Ok(path);
    }

    let home = my_home()
        .ok()
        .flatten()
        .context("couldn't determine home directory")?;
    Ok(format!("{}/.local/share/reel", home.to_string_lossy()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();

    let mut config = Config::load_with(&base_path()?)?;
    if let Some(movies) = args.movies {
        config.dataset.movies_path = movies;
    }
    if let Some(credits) = args.credits {
        config.dataset.credits_path = credits;
    }

    let builder = CatalogBuilder::new().vocabulary_size(config.vocabulary_size);
    let service = Arc::new(RecommenderService::new(
        config.dataset_paths(),
        builder,
        config.service_options(),
    ));

    let count = service.load().context("couldn't build catalog")?;
    log::info!("loaded {count} movies");

    match args.command {
        cli::Command::Serve { addr } => {
            let addr = addr.unwrap_or(config.listen_addr);
            web::start_daemon(service, &addr)
        }

        cli::Command::Recommend { title, count } => {
            let recommendations = service.recommend(&title, count)?;
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
            Ok(())
        }

        cli::Command::Search { query } => {
            let titles = service.search(&query)?;
            println!("{}", serde_json::to_string_pretty(&titles)?);
            Ok(())
        }

        cli::Command::Titles { count } => {
            let titles = service.list_titles()?;
            if count {
                println!("{} movies", titles.len());
            } else {
                println!("{}", serde_json::to_string_pretty(&titles)?);
            }
            Ok(())
        }

        cli::Command::Inspect { terms } => {
            let catalog = service.snapshot()?;
            let vocabulary = catalog.vocabulary();
            let top_terms = &vocabulary.terms()[..terms.min(vocabulary.len())];

            let stats = json!({
                "movies": catalog.len(),
                "vocabulary_size": vocabulary.len(),
                "top_terms": top_terms,
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}
