//! Schedule file: a JSON snapshot `{movies, rooms, showtimes}` standing in for the
//! backend's three collections.

use std::path::Path;

use anyhow::{Context, Result};
use showtime_engine::{Catalog, MemoryCollection};
use tracing::debug;

pub fn load(path: &Path) -> Result<MemoryCollection> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule file: {}", path.display()))?;
    let catalog: Catalog = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse schedule file: {}", path.display()))?;
    debug!(
        path = %path.display(),
        movies = catalog.movies.len(),
        rooms = catalog.rooms.len(),
        showtimes = catalog.showtimes.len(),
        "loaded schedule"
    );
    Ok(MemoryCollection::new(catalog))
}

pub fn save(path: &Path, store: &MemoryCollection) -> Result<()> {
    let json = serde_json::to_string_pretty(store.catalog())?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write schedule file: {}", path.display()))?;
    debug!(path = %path.display(), "saved schedule");
    Ok(())
}
