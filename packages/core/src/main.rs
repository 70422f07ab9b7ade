use clap::Parser;
use dotenvy::dotenv;
use serde::Serialize;

use baselime_provider::cli::{Cli, Command};
use baselime_provider::config::Config;
use baselime_provider::error::AppError;
use baselime_provider::lifecycle;
use baselime_provider::logging::init_logging;
use baselime_provider::provider::{Provider, Resource, ResourceKind};
use baselime_provider::store::StateStore;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let provider = Provider::new(env!("CARGO_PKG_VERSION"));

    let Some(kind) = cli.command.kind() else {
        for name in provider.resources() {
            println!("{}", name);
        }
        return Ok(());
    };

    let config = Config::from_env(&cli).map_err(AppError::Config)?;
    tracing::debug!("Loaded config: {:?}", config);

    let data = provider.configure(&config.provider_config())?;
    let mut store = StateStore::open(&config.state_file)?;

    match kind {
        ResourceKind::Query => execute(&data.query_resource(), &cli.command, &mut store).await?,
        ResourceKind::Alert => execute(&data.alert_resource(), &cli.command, &mut store).await?,
        ResourceKind::Dashboard => {
            execute(&data.dashboard_resource(), &cli.command, &mut store).await?
        }
    }

    store.save()?;
    Ok(())
}

async fn execute<R: Resource>(
    resource: &R,
    command: &Command,
    store: &mut StateStore,
) -> Result<(), AppError> {
    match command {
        Command::Resources => Ok(()),
        Command::Create { plan, .. } => {
            let plan = lifecycle::load_plan::<R::Model>(plan)?;
            let state = lifecycle::create(resource, store, plan).await?;
            print_json(&state)
        }
        Command::Read { id, .. } => match lifecycle::read(resource, store, id).await? {
            Some(state) => print_json(&state),
            None => {
                println!("null");
                Ok(())
            }
        },
        Command::Update { plan, .. } => {
            let plan = lifecycle::load_plan::<R::Model>(plan)?;
            let state = lifecycle::update(resource, store, plan).await?;
            print_json(&state)
        }
        Command::Delete { id, .. } => lifecycle::delete(resource, store, id).await,
        Command::Import { id, .. } => {
            let state = lifecycle::import(resource, store, id).await?;
            print_json(&state)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
