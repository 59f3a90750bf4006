use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Content-based movie recommendations", long_about = None)]
pub struct Args {
    /// Movies metadata table (overrides config)
    #[clap(long, global = true)]
    pub movies: Option<String>,

    /// Credits table (overrides config)
    #[clap(long, global = true)]
    pub credits: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the catalog and serve the HTTP API
    Serve {
        /// Listen address (overrides config)
        #[clap(long)]
        addr: Option<String>,
    },

    /// Print movies similar to a title
    Recommend {
        /// Exact movie title
        title: String,

        /// Number of recommendations
        #[clap(short = 'n', long)]
        count: Option<usize>,
    },

    /// Search titles (case-insensitive substring)
    Search { query: String },

    /// List every title in catalog order
    Titles {
        /// Print only the number of titles
        #[clap(long, default_value = "false")]
        count: bool,
    },

    /// Print catalog statistics
    Inspect {
        /// Number of top vocabulary terms to show
        #[clap(long, default_value = "20")]
        terms: usize,
    },
}
