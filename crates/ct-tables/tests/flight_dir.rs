use std::fs;
use std::path::Path;

use ct_tables::{FlightTables, TablesError, list_flights};

fn write(dir: &Path, name: &str, body: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), body).unwrap();
}

fn flight_dir(root: &Path, route: &str, flight: &str, pieces: usize) -> std::path::PathBuf {
    let dir = root.join(route).join(flight);
    write(
        &dir,
        "FlightInformation.csv",
        "FlightNumber,AircraftType,ActualZeroFuelWeight,MacZFW\nKL835,789,170000,24.0\n",
    );
    let mut body = String::from("SerialNumber,NumberOfPieces,Weight\n");
    for i in 0..pieces {
        body.push_str(&format!("074-{i:08},1,100\n"));
    }
    write(&dir, "PieceInformation.csv", &body);
    write(&dir, "BuildUpInformation.csv", "ULD,AirWaybillNumber,Weight\nPMC1,00000000,100\n");
    dir
}

#[test]
fn loads_required_and_optional_tables() {
    let root = tempfile::tempdir().unwrap();
    let dir = flight_dir(root.path(), "Flights AMSSIN JAN 2024", "Flight KL0835 AMSSIN 01 JAN 2024", 2);
    write(&dir, "PaxInformation.csv", "NumberOfPax\n200\n");

    let tables = FlightTables::load(&dir, 84.0).unwrap();
    assert_eq!(tables.header.aircraft_type.as_deref(), Some("789"));
    assert_eq!(tables.pieces.len(), 2);
    assert_eq!(tables.buildup.uld_serials(), ["PMC1"]);
    assert!(tables.load_locations.is_none());
    assert_eq!(tables.pax.unwrap().total_weight_kg, 16800.0);
    assert!(tables.warnings.is_empty());
}

#[test]
fn missing_required_table_fails() {
    let root = tempfile::tempdir().unwrap();
    let dir = flight_dir(root.path(), "Flights AMSSIN JAN 2024", "Flight KL0835 AMSSIN 01 JAN 2024", 1);
    fs::remove_file(dir.join("BuildUpInformation.csv")).unwrap();
    let err = FlightTables::load(&dir, 84.0).unwrap_err();
    assert!(matches!(err, TablesError::Missing { .. }));

    let err = FlightTables::load(&root.path().join("nowhere"), 84.0).unwrap_err();
    assert!(matches!(err, TablesError::Missing { .. }));
}

#[test]
fn lists_flights_by_item_count() {
    let root = tempfile::tempdir().unwrap();
    flight_dir(root.path(), "Flights AMSSIN JAN 2024", "Flight KL0835 AMSSIN 01 JAN 2024", 3);
    flight_dir(root.path(), "Flights AMSBLR FEB 2024", "Flight KL0879 AMSBLR 02 FEB 2024", 1);
    flight_dir(root.path(), "Flights AMSBLR FEB 2024", "Flight KL0880 AMSBLR 03 FEB 2024", 1);
    fs::create_dir_all(root.path().join("Flights AMSBLR FEB 2024").join("notes")).unwrap();

    let listings = list_flights(root.path()).unwrap();
    let paths: Vec<_> = listings.iter().map(|l| (l.path.as_str(), l.item_count)).collect();
    assert_eq!(
        paths,
        [
            ("Flights AMSBLR FEB 2024/Flight KL0879 AMSBLR 02 FEB 2024", 1),
            ("Flights AMSBLR FEB 2024/Flight KL0880 AMSBLR 03 FEB 2024", 1),
            ("Flights AMSSIN JAN 2024/Flight KL0835 AMSSIN 01 JAN 2024", 3),
        ]
    );

    assert!(list_flights(&root.path().join("missing")).unwrap().is_empty());
}
