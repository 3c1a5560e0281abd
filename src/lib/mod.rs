use self::error::ShapeError;
use self::geometry::{Geometry, RawShape};
use log::debug;
use serde::de::DeserializeOwned;
use std::io::BufRead;

pub mod capture;
pub mod config;
pub mod controller;
pub mod error;
pub mod geo;
mod geojson;
pub mod geometry;
pub mod notify;
pub mod output;
pub mod store;
pub mod widget;

#[cfg(test)]
mod test_helpers;

/// Reads one JSON document per line, blank lines are skipped.
pub fn read_json_lines<T: DeserializeOwned>(reader: impl BufRead) -> Result<Vec<T>, ShapeError> {
    let mut items = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|source| ShapeError::Parse {
            line: idx + 1,
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}

/// Turns recorded widget events into canonical geometries, dropping layer
/// types that are not captured.
pub fn normalize(reader: impl BufRead) -> Result<Vec<Geometry>, ShapeError> {
    let shapes: Vec<RawShape> = read_json_lines(reader)?;
    let geometries = shapes
        .iter()
        .filter_map(|raw| {
            let geometry = raw.to_geometry();
            if geometry.is_none() {
                debug!("skipping {} layer", raw.layer_type());
            }
            geometry
        })
        .collect();
    Ok(geometries)
}
