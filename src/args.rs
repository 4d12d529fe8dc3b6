use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "letter-scout")]
#[command(about = "Ingests economic letters from a paginated listing into a local store")]
#[command(version)]
pub struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Path to the JSON letter store (overrides config)
    #[arg(short, long)]
    pub store: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the first listing page for new letters
    FetchNew,

    /// Search older listing pages for letters not yet stored
    FetchMore {
        /// Last listing page already ingested; the search starts after it
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// List stored letters, newest first
    List {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        #[arg(short, long, default_value_t = 0)]
        offset: usize,
    },

    /// Show one stored letter with its questions
    Show {
        /// Letter ID
        id: i64,
    },
}
