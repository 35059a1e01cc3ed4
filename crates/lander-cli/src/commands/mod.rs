pub mod landing;
pub mod snapshot;
pub mod sync;
pub mod variant;

use lander_engine::Settings;
use rusqlite::Connection;
use serde::Serialize;

/// Open the configured database with migrations applied
pub(crate) fn open_db(settings: &Settings) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(parent) = settings.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(lander_store::db::open_ready(&settings.database_path)?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
