use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use freightmatch_api::{
    config::{self, AppConfig},
    db::{self, DbPool},
    services::fleet::FleetService,
};
use serde::Serialize;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = AdminContext::initialize().await?;

    match cli.command {
        Commands::LoadLocations(args) => handle_load_locations(&context, args, cli.json).await?,
        Commands::CreateCars(args) => handle_create_cars(&context, args, cli.json).await?,
        Commands::UpdateCarLocations(args) => handle_update_car_locations(&context, args).await?,
        Commands::Migrate => {
            db::run_migrations(&context.db)
                .await
                .context("failed to run migrations")?;
            println!("Migrations applied");
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "freight-admin",
    version,
    about = "Administrative tasks for the FreightMatch database"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON when available"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace every location with the rows of a zip code CSV export
    LoadLocations(LoadLocationsArgs),
    /// Create vehicles at random locations
    CreateCars(CreateCarsArgs),
    /// Periodically move every vehicle to a random location
    UpdateCarLocations(UpdateCarLocationsArgs),
    /// Apply database migrations
    Migrate,
}

#[derive(Args)]
struct LoadLocationsArgs {
    /// CSV with city, state_name, zip, lat and lng columns (defaults to `locations_csv_path`)
    #[arg(long)]
    path: Option<PathBuf>,
}

#[derive(Args)]
struct CreateCarsArgs {
    /// Number of vehicles to create (defaults to `fleet_size`)
    #[arg(long)]
    count: Option<usize>,
}

#[derive(Args)]
struct UpdateCarLocationsArgs {
    /// Seconds between passes (defaults to `location_update_interval_secs`)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval_secs: Option<u64>,
    /// Run a single pass and exit
    #[arg(long, action = ArgAction::SetTrue)]
    once: bool,
}

struct AdminContext {
    config: AppConfig,
    db: Arc<DbPool>,
}

impl AdminContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;

        Ok(Self {
            config,
            db: Arc::new(db_pool),
        })
    }

    fn fleet_service(&self) -> FleetService {
        FleetService::new(self.db.clone())
    }
}

#[derive(Serialize)]
struct LoadSummary {
    path: String,
    loaded: usize,
}

async fn handle_load_locations(
    context: &AdminContext,
    args: LoadLocationsArgs,
    json: bool,
) -> Result<()> {
    let path = args
        .path
        .unwrap_or_else(|| PathBuf::from(&context.config.locations_csv_path));

    let loaded = context
        .fleet_service()
        .load_locations_from_csv(&path)
        .await
        .with_context(|| format!("failed to load locations from {}", path.display()))?;

    if json {
        print_json(&LoadSummary {
            path: path.display().to_string(),
            loaded,
        })?;
    } else {
        println!("Loaded {} locations from {}", loaded, path.display());
    }
    Ok(())
}

async fn handle_create_cars(context: &AdminContext, args: CreateCarsArgs, json: bool) -> Result<()> {
    let count = args.count.unwrap_or(context.config.fleet_size as usize);

    let vehicles = context
        .fleet_service()
        .create_fleet(count)
        .await
        .context("failed to create vehicles")?;

    if json {
        print_json(&vehicles)?;
    } else {
        for vehicle in &vehicles {
            println!(
                "- Vehicle {} • location {} • capacity {}",
                vehicle.unique_number, vehicle.current_location_id, vehicle.payload_capacity
            );
        }
        println!("Created {} vehicles", vehicles.len());
    }
    Ok(())
}

async fn handle_update_car_locations(
    context: &AdminContext,
    args: UpdateCarLocationsArgs,
) -> Result<()> {
    let interval = args
        .interval_secs
        .map(Duration::from_secs)
        .unwrap_or_else(|| context.config.location_update_interval());
    let fleet = context.fleet_service();

    if args.once {
        let moved = fleet
            .randomize_locations()
            .await
            .context("failed to update vehicle locations")?;
        println!("Moved {} vehicles", moved);
        return Ok(());
    }

    info!(interval_secs = interval.as_secs(), "Starting vehicle location updates");
    let mut ticker = tokio::time::interval(interval);
    let shutdown = signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match fleet.randomize_locations().await {
                    Ok(moved) => info!(moved, "Vehicle locations updated"),
                    Err(e) => error!(error = %e, "Vehicle location update failed"),
                }
            }
            result = &mut shutdown => {
                result.context("failed to listen for Ctrl+C")?;
                info!("Stopping vehicle location updates");
                break;
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
