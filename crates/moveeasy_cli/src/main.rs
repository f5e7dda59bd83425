//! Operator probe for a MoveEasy database.
//!
//! # Responsibility
//! - Open (and migrate) the database named by `MOVEEASY_DB_PATH`.
//! - Print schema version and active reference counts as `key=value` lines.

use log::error;
use moveeasy_core::{
    BusService, DbConfig, LogConfig, ServiceError, SharedVehicleService, SqliteBusRepository,
    SqliteSharedVehicleRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let log_config = LogConfig::from_env();
    if let Err(err) = moveeasy_core::init_from_config(&log_config) {
        eprintln!("moveeasy logging disabled: {err}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_probe module=cli status=error error={message}");
            eprintln!("moveeasy: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = DbConfig::from_env()?;
    let db = moveeasy_core::Database::open(&config).map_err(|err| err.to_string())?;

    println!("moveeasy_core version={}", moveeasy_core::core_version());
    println!(
        "schema_version={}",
        db.schema_version().map_err(|err| err.to_string())?
    );

    let vehicles = SharedVehicleService::new(
        SqliteSharedVehicleRepository::new(db.clone()),
        config.list_timeout(),
    );
    let buses = BusService::new(SqliteBusRepository::new(db), config.list_timeout());

    println!(
        "active_shared_vehicles={}",
        vehicles.list_vehicles().map_err(describe)?.len()
    );
    println!("active_bus_lines={}", buses.list_lines().map_err(describe)?.len());
    Ok(())
}

fn describe(err: ServiceError) -> String {
    err.to_string()
}
