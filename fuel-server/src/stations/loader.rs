//! Fuel price CSV loader.
//!
//! Reads the truck stop price sheet (`OPIS Truckstop ID`, `Truckstop Name`,
//! `Address`, `City`, `State`, `Rack ID`, `Retail Price`) with optional
//! `lat`/`lon` columns filled in by a geocoding pass, and an optional `id`
//! column for exports that already carry catalog ids.

use std::collections::HashMap;
use std::io::Read;

use serde::Deserialize;

use crate::domain::{GeoPoint, Station, StationId};

use super::error::StationError;

/// One row of the price sheet.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(default)]
    id: Option<u64>,
    #[serde(rename = "OPIS Truckstop ID")]
    opis_id: u64,
    #[serde(rename = "Truckstop Name")]
    name: String,
    #[serde(rename = "Address")]
    address: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Rack ID")]
    rack_id: u64,
    #[serde(rename = "Retail Price")]
    price: Option<f64>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// A catalog entry: the station plus the price sheet fields the planner
/// does not use.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelStop {
    pub station: Station,
    pub opis_id: u64,
    pub address: String,
    pub rack_id: u64,
}

/// Outcome of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub created: usize,
    pub updated: usize,
}

/// Rows are the same stop when these fields match.
type UpsertKey = (u64, String, String, String);

/// Parse a price sheet into fuel stops.
///
/// Rows are upserted on (OPIS id, address, city, state): a later row with
/// the same key replaces the earlier one but keeps its id. Stops without an
/// `id` column get sequential ids after the largest id seen so far.
pub fn load_csv<R: Read>(reader: R) -> Result<(Vec<FuelStop>, LoadSummary), StationError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut stops: Vec<FuelStop> = Vec::new();
    let mut index: HashMap<UpsertKey, usize> = HashMap::new();
    let mut summary = LoadSummary::default();
    let mut next_id = 1;

    for row in csv.deserialize() {
        let row: PriceRow = row?;
        let key = (
            row.opis_id,
            row.address.clone(),
            row.city.clone(),
            row.state.clone(),
        );

        let location = match (row.lat, row.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };

        match index.get(&key) {
            Some(&pos) => {
                let existing = &mut stops[pos];
                let id = row.id.map(StationId).unwrap_or(existing.station.id);
                next_id = next_id.max(id.0 + 1);
                *existing = build_stop(row, id, location);
                summary.updated += 1;
            }
            None => {
                let id = StationId(row.id.unwrap_or(next_id));
                next_id = next_id.max(id.0 + 1);
                index.insert(key, stops.len());
                stops.push(build_stop(row, id, location));
                summary.created += 1;
            }
        }
    }

    Ok((stops, summary))
}

fn build_stop(row: PriceRow, id: StationId, location: Option<GeoPoint>) -> FuelStop {
    FuelStop {
        station: Station {
            id,
            name: row.name,
            city: row.city,
            state: row.state,
            price: row.price,
            location,
        },
        opis_id: row.opis_id,
        address: row.address,
        rack_id: row.rack_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,lat,lon\n";

    #[test]
    fn loads_rows_with_coordinates() {
        let data = format!(
            "{HEADER}\
             7,WOODSHED OF BIG CABIN , I-44 EXIT 283,Big Cabin,OK,307,3.00733,36.55,-95.21\n\
             8,KWIK TRIP #796,I-94 EXIT 143,Tomah,WI,420,3.28733,,\n"
        );

        let (stops, summary) = load_csv(data.as_bytes()).unwrap();
        assert_eq!(summary, LoadSummary { created: 2, updated: 0 });
        assert_eq!(stops.len(), 2);

        let first = &stops[0];
        assert_eq!(first.station.id, StationId(1));
        assert_eq!(first.station.name, "WOODSHED OF BIG CABIN");
        assert_eq!(first.station.state, "OK");
        assert_eq!(first.station.price, Some(3.00733));
        assert_eq!(first.station.location, Some(GeoPoint::new(36.55, -95.21)));
        assert_eq!(first.rack_id, 307);

        let second = &stops[1];
        assert_eq!(second.station.id, StationId(2));
        assert!(second.station.location.is_none());
    }

    #[test]
    fn later_row_updates_same_stop() {
        let data = format!(
            "{HEADER}\
             7,Old Name,I-44 EXIT 283,Big Cabin,OK,307,3.10,36.55,-95.21\n\
             9,Other,US-69,Vinita,OK,307,3.20,36.64,-95.15\n\
             7,New Name,I-44 EXIT 283,Big Cabin,OK,307,2.95,36.55,-95.21\n"
        );

        let (stops, summary) = load_csv(data.as_bytes()).unwrap();
        assert_eq!(summary, LoadSummary { created: 2, updated: 1 });
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].station.id, StationId(1));
        assert_eq!(stops[0].station.name, "New Name");
        assert_eq!(stops[0].station.price, Some(2.95));
    }

    #[test]
    fn same_opis_id_at_other_address_is_a_new_stop() {
        let data = format!(
            "{HEADER}\
             7,A,Exit 1,Big Cabin,OK,307,3.10,36.55,-95.21\n\
             7,A,Exit 2,Big Cabin,OK,307,3.10,36.56,-95.22\n"
        );

        let (stops, summary) = load_csv(data.as_bytes()).unwrap();
        assert_eq!(summary.created, 2);
        assert_ne!(stops[0].station.id, stops[1].station.id);
    }

    #[test]
    fn explicit_ids_are_kept() {
        let data = "id,OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,lat,lon\n\
                    40,7,A,Exit 1,Big Cabin,OK,307,3.10,36.55,-95.21\n\
                    ,8,B,Exit 2,Vinita,OK,307,3.20,36.64,-95.15\n";

        let (stops, _) = load_csv(data.as_bytes()).unwrap();
        assert_eq!(stops[0].station.id, StationId(40));
        assert_eq!(stops[1].station.id, StationId(41));
    }

    #[test]
    fn missing_price_is_allowed() {
        let data = format!("{HEADER}7,A,Exit 1,Big Cabin,OK,307,,36.55,-95.21\n");
        let (stops, _) = load_csv(data.as_bytes()).unwrap();
        assert_eq!(stops[0].station.price, None);
    }

    #[test]
    fn malformed_row_is_an_error() {
        let data = format!("{HEADER}seven,A,Exit 1,Big Cabin,OK,307,3.10,36.55,-95.21\n");
        let err = load_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, StationError::Csv(_)));
    }
}
