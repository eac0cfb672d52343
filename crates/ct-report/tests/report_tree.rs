use std::fs;
use std::path::Path;

use ct_core::{Compartment, FlightIdentity};
use ct_report::{ModelVariant, PrecomputedReport, ReportError, ReportLocator};

fn write_report(root: &Path, route: &str, flight: &str, body: &str, info: Option<&str>) {
    let dir = root.join(route).join(flight);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("Results.txt"), body).unwrap();
    if let Some(info) = info {
        fs::write(dir.join("General_Information.txt"), info).unwrap();
    }
}

#[test]
fn locates_and_reads_report_per_variant() {
    let project = tempfile::tempdir().unwrap();
    write_report(
        &project.path().join("Results"),
        "Results AMSSIN JAN 2024",
        "Flight KL835 AMSSIN 08 JAN 24",
        "ULD PMC32298KL with weight 1234.5 kg is loaded to position 11L\n\
         Weight in Compartment 1: 1234.5 kg\n%MAC ZFW is 18.5\n",
        Some("Flight Number: KL835\nAircraft Type: 789\nZFW: 170000 kg\n"),
    );
    // A stray file at route level is ignored.
    fs::write(project.path().join("Results").join("notes.txt"), "x").unwrap();

    let flight =
        FlightIdentity::parse("Flights AMSSIN JAN 2024/Flight KL0835 AMSSIN 08 JAN 2024").unwrap();
    let locator = ReportLocator::under(project.path());

    let dir = locator
        .locate(&flight, ModelVariant::DelgadoVenezian)
        .unwrap()
        .expect("report directory");
    let report = PrecomputedReport::read(&dir).unwrap();
    assert_eq!(report.parsed.containers.len(), 1);
    assert_eq!(
        report.parsed.weight_by_compartment.get(&Compartment::C1),
        Some(&1234.5)
    );
    assert_eq!(report.general.unwrap().zfw_kg, Some(170000.0));

    // The baseline variant has no tree at all.
    assert_eq!(locator.locate(&flight, ModelVariant::Baseline).unwrap(), None);
}

#[test]
fn missing_report_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PrecomputedReport::read(dir.path()).unwrap_err();
    assert!(matches!(err, ReportError::MissingReportFile { .. }));
}

#[test]
fn sidecar_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Results.txt"), "Infeasible\n").unwrap();
    let report = PrecomputedReport::read(dir.path()).unwrap();
    assert!(report.general.is_none());
    assert!(!report.parsed.is_usable());
}

#[test]
fn custom_root_per_variant() {
    let project = tempfile::tempdir().unwrap();
    let custom = project.path().join("elsewhere");
    write_report(
        &custom,
        "Results AMSBLR FEB 2024",
        "Flight KL879 AMSBLR 02 FEB 24",
        "ULD AKE1KL with weight 10 kg is loaded to position 31R\n",
        None,
    );
    let locator = ReportLocator::under(project.path()).with_root(ModelVariant::BaxFixed, custom);
    let flight =
        FlightIdentity::parse("Flights AMSBLR FEB 2024/Flight KL0879 AMSBLR 02 FEB 2024").unwrap();
    assert!(locator.locate(&flight, ModelVariant::BaxFixed).unwrap().is_some());
    assert!(locator.locate(&flight, ModelVariant::DelgadoVenezian).unwrap().is_none());
}
