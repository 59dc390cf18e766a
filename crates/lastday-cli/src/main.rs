mod point;
mod run;

use clap::{Parser, Subcommand};
use lastday_core::Deadline;
use tracing_subscriber::EnvFilter;

use crate::point::{parse_content_type, parse_deadline, PointArg};
use crate::run::{run_places, run_room, run_station, SearchArgs};

#[derive(Debug, Parser)]
#[command(name = "lastday-cli")]
#[command(about = "Recommend tourist spots that fit before a departure time")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Spots worth a stop between two points
    Room {
        /// Start point, as `x,y` or a place name
        #[arg(long)]
        from: PointArg,
        /// Point that must be reached by the deadline, as `x,y` or a place name
        #[arg(long)]
        to: PointArg,
        #[command(flatten)]
        search: SearchOpts,
    },
    /// Spots worth a round trip from one point
    Station {
        /// Start point, as `x,y` or a place name
        #[arg(long)]
        at: PointArg,
        /// Search radius in meters
        #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u32).range(1..))]
        radius: u32,
        #[command(flatten)]
        search: SearchOpts,
    },
    /// Look up place names and their coordinates
    Places {
        query: String,
        /// Maximum number of places to show (1-15)
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..=15))]
        limit: u16,
    },
}

#[derive(Debug, clap::Args)]
struct SearchOpts {
    /// Catalog category, as an id or a label such as `restaurant`
    #[arg(long, default_value = "12", value_parser = parse_content_type)]
    content_type: u16,
    /// Number of nearest catalog spots to score
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    candidates: u16,
    /// Departure deadline today, Seoul time
    #[arg(long, default_value = "15:30", value_parser = parse_deadline)]
    until: Deadline,
}

impl From<SearchOpts> for SearchArgs {
    fn from(opts: SearchOpts) -> Self {
        SearchArgs {
            content_type: opts.content_type,
            candidates: usize::from(opts.candidates),
            deadline: opts.until,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("lastday-cli ready; see --help for commands");
        return Ok(());
    };

    let config = lastday_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Room { from, to, search } => {
            run_room(&config, &from, &to, search.into()).await?;
        }
        Commands::Station { at, radius, search } => {
            run_station(&config, &at, radius, search.into()).await?;
        }
        Commands::Places { query, limit } => {
            run_places(&config, &query, usize::from(limit)).await?;
        }
    }

    Ok(())
}
