use std::path::Path;

use tracing::Instrument;

use config::Config;
use readings::Readings;
use system::SystemMonitor;

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod readings;
pub mod system;

#[derive(Copy, Clone)]
pub struct StatePackage<'a> {
    readings: &'a Readings,
    system: &'a SystemMonitor,
    assets: &'a Path,
}

impl<'a> StatePackage<'a> {
    pub fn new(readings: &'a Readings, system: &'a SystemMonitor, assets: &'a Path) -> Self {
        StatePackage {
            readings,
            system,
            assets,
        }
    }
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let readings = Readings::default();
    let system = tokio::task::spawn_blocking(SystemMonitor::new).await?;

    let state = StatePackage::new(&readings, &system, &config.assets);

    let (api_addr, api) =
        warp::serve(api::routes(state)).try_bind_ephemeral((config.bind, config.api_port))?;
    let (ingest_addr, ingest) = warp::serve(ingest::routes(&readings))
        .try_bind_ephemeral((config.bind, config.ingest_port))?;

    tracing::info!("{api_addr}/  <- website");
    tracing::info!("{api_addr}/{}  <- host data", models::routes::DATA);
    tracing::info!("{api_addr}/{}  <- temperature", models::routes::TEMPERATURE);
    tracing::info!("ws://{ingest_addr}/  <- sensor ingest");

    tokio::join!(
        api.instrument(tracing::info_span!("api")),
        ingest.instrument(tracing::info_span!("ingest")),
    );

    Ok(())
}
