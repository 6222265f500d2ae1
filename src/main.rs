use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use veloplan::{
    Itinerary, OpenCageClient, OsrmClient, StationFeedClient, TripPlanner, TripRequest,
    VeloplanConfig, VenueCatalog,
};

#[derive(Parser)]
#[command(name = "veloplan", version, about = "Plan a walk + bike-share + walk trip to a cultural venue")]
struct Cli {
    /// Path to a config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan a trip from an address to a venue
    Plan {
        /// Free-text start address
        #[arg(long)]
        address: String,

        /// Destination venue name, as listed by `venues`
        #[arg(long)]
        venue: String,

        /// Number of people; each needs one bike and one dock
        #[arg(long, default_value_t = 1)]
        party_size: u32,
    },
    /// List the venue names available in the catalog
    Venues,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = VeloplanConfig::load_from_path(cli.config.clone())?;

    let filter = if cli.verbose {
        EnvFilter::new("veloplan=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("veloplan={}", config.logging.level)))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Venues => {
            let catalog = VenueCatalog::from_csv_path(&config.defaults.venues_file)?;
            for name in catalog.names() {
                println!("{name}");
            }
        }
        Command::Plan {
            address,
            venue,
            party_size,
        } => {
            if party_size > config.defaults.max_party_size {
                anyhow::bail!(
                    "Party size cannot exceed {}",
                    config.defaults.max_party_size
                );
            }

            let catalog = VenueCatalog::from_csv_path(&config.defaults.venues_file)?;
            let feed = StationFeedClient::new(&config.station_feed)?;
            let geocoder = OpenCageClient::new(&config.geocoder, &config.defaults.city)?;
            let router = OsrmClient::new(&config.routing)?;
            let planner = TripPlanner::new(Arc::new(geocoder), Arc::new(router));

            let stations = feed.fetch_stations().await?;
            let request = TripRequest {
                address,
                venue_name: venue,
                party_size,
            };

            match planner.plan(&request, &catalog, &stations).await {
                Ok(itinerary) => print_itinerary(&itinerary, party_size),
                Err(e) => {
                    eprintln!("{}", e.user_message());
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

fn print_itinerary(itinerary: &Itinerary, party_size: u32) {
    println!("Trip to {}", itinerary.venue.name);
    println!();
    println!(
        "Pick-up station:  {} ({} bikes available)",
        itinerary.origin_station.address, itinerary.origin_station.bikes_available
    );
    println!(
        "Drop-off station: {} ({} free docks)",
        itinerary.destination_station.address, itinerary.destination_station.docks_free
    );
    println!();
    println!(
        "Walk to station:    {:.2} km  ({:.1} min)",
        itinerary.walk1_km, itinerary.walk1_min
    );
    println!(
        "Bike between docks: {:.2} km  ({:.1} min)",
        itinerary.bike.distance_km, itinerary.bike.duration_min
    );
    println!(
        "Walk to venue:      {:.2} km  ({:.1} min)",
        itinerary.walk2_km, itinerary.walk2_min
    );
    println!();
    println!(
        "CO2 avoided: {:.0} g ({} person(s) by bike)",
        itinerary.co2_grams, party_size
    );
}
