pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "freshwire")]
#[command(about = "Scrape and summarize FreshProduce.com articles", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/freshwire/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of browser pages used in parallel
    #[arg(short = 'j', long, global = true)]
    pub concurrency: Option<usize>,

    /// Category to crawl; repeat for several (overrides the config file)
    #[arg(long = "category", global = true)]
    pub categories: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape articles and write them to a CSV file
    Scrape {
        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize previously scraped articles
    Analyze {
        /// Scraped CSV to read
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Scrape, then summarize
    Run,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(concurrency) = self.concurrency {
            config.scraper.max_concurrency = concurrency;
        }
        if !self.categories.is_empty() {
            config.scraper.categories = self.categories.clone();
        }
        match &self.command {
            Commands::Scrape { output } => {
                if let Some(output) = output {
                    config.output.scraped_path = output.clone();
                }
            }
            Commands::Analyze { input, output } => {
                if let Some(input) = input {
                    config.output.scraped_path = input.clone();
                }
                if let Some(output) = output {
                    config.output.analysis_path = output.clone();
                }
            }
            Commands::Run => {}
        }
    }
}
