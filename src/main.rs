use std::sync::Arc;

use clap::Parser;
use tracing::info;

use flight_mint::cli::{Cli, Command, LookupCommand};
use flight_mint::client::{FlightClient, HttpFlightApi, SearchPhase};
use flight_mint::server::{self, AppState};
use flight_mint::{init_logging, Config, FlightLookup};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Serve => serve(&config).await,
        Command::Lookup(cmd) => lookup(&config, &cmd).await,
    }
}

async fn serve(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let lookup = FlightLookup::from_config(config)?;
    info!(upstream = %config.upstream.base_url, cache = config.cache.enabled, "Starting flight endpoint");
    server::serve(config.bind_addr()?, AppState::new(lookup)).await?;
    Ok(())
}

async fn lookup(config: &Config, cmd: &LookupCommand) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = cmd.endpoint.clone()
        .unwrap_or_else(|| format!("http://{}", config.server.bind));
    let client = FlightClient::new(Arc::new(HttpFlightApi::new(&endpoint)));

    match client.search(&cmd.term).await? {
        SearchPhase::Success { flights, .. } => {
            println!("Matching Flights");
            for (ix, flight) in flights.iter().enumerate() {
                println!("  [{ix}] {}", flight.summary());
            }
        }
        SearchPhase::Failed(report) => return Err(report.to_string().into()),
        _ => {}
    }

    if let Some(index) = cmd.select {
        let flight = client.select(index)?;
        println!();
        println!("{flight}");
    }
    Ok(())
}
