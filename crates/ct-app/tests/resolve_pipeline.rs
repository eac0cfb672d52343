use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ct_aircraft::{AircraftGeometry, ReferenceData};
use ct_app::{
    ItemAssignment, Optimizer, OptimizerError, ResolveRequest, ResolveStage, Resolver, Settings,
    SolveInputs, SolveOutcome, SolvedContainer, list_flight_summaries,
};
use ct_core::{Compartment, Side};
use ct_report::ModelVariant;
use ct_results::Provenance;

const FLIGHT: &str = "Flights AMSSIN JAN 2024/Flight KL0835 AMSSIN 01 JAN 2024";

fn write(dir: &Path, name: &str, body: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), body).unwrap();
}

fn flight_dir(project: &Path) -> std::path::PathBuf {
    let dir = project.join("Data").join(FLIGHT);
    write(
        &dir,
        "FlightInformation.csv",
        "FlightNumber,DepartureAirport,ArrivalAirport,FlightDate,AircraftType,ActualZeroFuelWeight,MacZFW,TripFuel\n\
         KL0835,AMS,SIN,01 JAN 2024,789,150000,20.0,60000\n",
    );
    write(
        &dir,
        "PieceInformation.csv",
        "SerialNumber,NumberOfPieces,Weight,Commodity\n\
         074-11111111,2,500,GEN\n074-22222222,1,300,PER\n074-33333333,1,200,GEN\n",
    );
    write(
        &dir,
        "BuildUpInformation.csv",
        "ULD,AirWaybillNumber,Weight\nPMC1,11111111,1500\nAKE2,22222222,700\nAKE2,33333333,300\n",
    );
    write(
        &dir,
        "LoadLocations.csv",
        "SerialNumber,LoadLocation,DeadloadType,UldGrossWeight\nPMC1,11L,C,1500\nAKE2,31R,C,1000\nBAG1,41R,B,400\n",
    );
    write(&dir, "PaxInformation.csv", "TotalPaxWeight\n0\n");
    dir
}

/// Empty hold at 150 t sits at 25 % MAC; forward cargo lowers it.
fn reference() -> Arc<ReferenceData> {
    let mut data = ReferenceData::builtin();
    data.aircraft.insert(AircraftGeometry {
        ac_type: "789".into(),
        c: 150_000.0,
        k: 0.0,
        reference_arm: 0.0,
        lemac: 0.0,
        mac_formula: 100.0,
        doi: 25.0,
        cargo_delta_index: [-0.001, -0.0005, 0.0005, 0.001],
        pax_delta_index: [0.0; 7],
        max_compartment_weight: None,
    });
    Arc::new(data)
}

fn resolver(project: &Path) -> Resolver {
    Resolver::new(Settings::for_project(project), reference())
}

fn write_report(project: &Path, body: &str, info: Option<&str>) {
    let dir = project
        .join("Results")
        .join("Results AMSSIN JAN 2024")
        .join("Flight KL835 AMSSIN 01 JAN 24");
    write(&dir, "Results.txt", body);
    if let Some(info) = info {
        write(&dir, "General_Information.txt", info);
    }
}

struct FixedOptimizer(SolveOutcome);

impl Optimizer for FixedOptimizer {
    fn solve(&self, inputs: &SolveInputs) -> Result<SolveOutcome, OptimizerError> {
        assert_eq!(inputs.aircraft_type, "789");
        assert_eq!(inputs.restricted_positions, ["32R"]);
        Ok(self.0.clone())
    }
}

struct SlowOptimizer;

impl Optimizer for SlowOptimizer {
    fn solve(&self, _inputs: &SolveInputs) -> Result<SolveOutcome, OptimizerError> {
        thread::sleep(Duration::from_secs(10));
        Err(OptimizerError::NotConfigured)
    }
}

#[test]
fn estimates_from_tables_when_nothing_else_exists() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());

    let result = resolver(project.path()).resolve(&ResolveRequest::new(FLIGHT));
    assert!(result.success, "{:?}", result.error_message);
    assert_eq!(result.provenance, Some(Provenance::Estimated));
    assert_eq!(result.flight.flight_number, "KL0835");
    assert_eq!(result.flight.arrival_airport, "SIN");

    let d = &result.distribution;
    assert_eq!(d.compartment(Compartment::C1), 1500.0);
    assert_eq!(d.compartment(Compartment::C3), 1000.0);
    assert_eq!(d.side(Side::Left), 1500.0);
    assert_eq!(d.side(Side::Right), 1000.0);
    assert_eq!(d.by_position["11L"], 1500.0);
    assert_eq!(d.total_weight_kg, 2500.0);
    assert!(!d.heuristic);
    // 25 - 1.5 + 0.5
    assert!((d.mac_zfw.unwrap() - 24.0).abs() < 1e-9);

    assert_eq!(result.items[0].container, Some(0));
    assert_eq!(result.items[2].container, Some(1));

    assert!(result.warnings[0].starts_with("Live optimization unavailable"));
    assert!(result.warnings.iter().any(|w| w.starts_with("No precomputed")));

    let metrics = result.metrics.unwrap();
    let cmp = metrics.comparison.unwrap();
    assert_eq!(cmp.baseline.container_count, 2);
    assert_eq!(cmp.baseline.total_weight_kg, 2500.0);
    assert_eq!(cmp.container_count_difference, 0);
    assert_eq!(cmp.mac_difference.map(|m| (m * 1e6).round() / 1e6), Some(4.0));
    assert!(cmp.fuel_savings_kg.is_some());
    assert!(cmp.annual_impact.is_some());
    assert_eq!(metrics.optimization.solver_status, "estimated");
}

#[test]
fn heuristic_split_without_load_locations() {
    let project = tempfile::tempdir().unwrap();
    let dir = flight_dir(project.path());
    fs::remove_file(dir.join("LoadLocations.csv")).unwrap();

    let result = resolver(project.path()).resolve(&ResolveRequest::new(FLIGHT));
    assert_eq!(result.provenance, Some(Provenance::Estimated));
    let d = &result.distribution;
    assert!(d.heuristic);
    assert!(d.by_position.is_empty());
    assert_eq!(d.side(Side::Left), 1500.0);
    assert_eq!(d.side(Side::Right), 1000.0);
    let sum: f64 = d.by_compartment.values().sum();
    assert!((sum - d.total_weight_kg).abs() < 0.01);
    assert!(result.warnings.iter().any(|w| w.contains("heuristically")));
    // No load locations: baseline has a MAC but no cargo rows.
    let cmp = result.metrics.unwrap().comparison.unwrap();
    assert_eq!(cmp.baseline.container_count, 0);
}

#[test]
fn uses_precomputed_report() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());
    write_report(
        project.path(),
        "ULD PMC1 with weight 1500.0 kg is loaded to position 21L\n\
         ULD AKE2 with weight 1000.0 kg with a volume loadfactor of 0.4 is loaded to position 42R\n\
         Weight in Compartment 2: 1500.0 kg\nWeight in Compartment 4: 1000.0 kg\n\
         %MAC ZFW is 18.5\n2 ULDs are built by the model\n",
        Some("Flight Number: KL835\nAircraft Type: 789\nZFW: 151000 kg\n"),
    );

    let result = resolver(project.path()).resolve(&ResolveRequest::new(FLIGHT));
    assert_eq!(result.provenance, Some(Provenance::Precomputed));
    assert_eq!(result.containers.len(), 2);
    assert_eq!(result.containers[1].position.as_deref(), Some("42R"));
    let d = &result.distribution;
    assert_eq!(d.compartment(Compartment::C2), 1500.0);
    assert_eq!(d.compartment(Compartment::C4), 1000.0);
    assert_eq!(d.mac_zfw, Some(18.5));
    assert_eq!(d.zfw_kg, 151_000.0);
    assert!(result.source.unwrap().report_dir.is_some());
    assert!(!result.warnings.iter().any(|w| w.contains("Report states")));
    assert_eq!(result.warnings.len(), 1, "{:?}", result.warnings);
}

#[test]
fn unusable_report_falls_through_to_estimate() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());
    write_report(project.path(), "Model infeasible\n", None);

    let result = resolver(project.path()).resolve(&ResolveRequest::new(FLIGHT));
    assert_eq!(result.provenance, Some(Provenance::Estimated));
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("has no container placements"))
    );
}

#[test]
fn live_optimizer_wins() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());
    // A report exists but is not needed.
    write_report(
        project.path(),
        "ULD PMC1 with weight 1500.0 kg is loaded to position 21L\n",
        None,
    );
    let outcome = SolveOutcome {
        status: "OPTIMAL".into(),
        objective_value: Some(42.0),
        gap_percent: Some(0.1),
        runtime_seconds: Some(12.5),
        containers: vec![
            SolvedContainer {
                serial: "PMC1".into(),
                uld_type: None,
                weight_kg: 1500.0,
                max_weight_kg: None,
                position: Some("12L".into()),
            },
            SolvedContainer {
                serial: "AKE2".into(),
                uld_type: Some("AKE".into()),
                weight_kg: 1000.0,
                max_weight_kg: Some(1588.0),
                position: Some("32R".into()),
            },
        ],
        assignments: vec![
            ItemAssignment {
                item_index: 0,
                container_index: 0,
            },
            ItemAssignment {
                item_index: 7,
                container_index: 0,
            },
        ],
    };
    let resolver = resolver(project.path()).with_optimizer(Arc::new(FixedOptimizer(outcome)));
    let request = ResolveRequest::new(FLIGHT).with_restricted_positions(vec!["32R".into()]);

    let result = resolver.resolve(&request);
    assert_eq!(result.provenance, Some(Provenance::Live));
    assert_eq!(result.containers[0].max_weight_kg, Some(4500.0));
    assert_eq!(result.items[0].container, Some(0));
    assert_eq!(result.items[1].container, None);
    assert!(result.warnings.iter().any(|w| w.starts_with("Ignored 1")));

    let metrics = result.metrics.unwrap();
    assert_eq!(metrics.optimization.solver_status, "OPTIMAL");
    assert_eq!(metrics.optimization.gap_percent, Some(0.1));
    assert_eq!(metrics.optimization.runtime_seconds, 12.5);
    assert_eq!(metrics.safety.restricted_positions_used, ["32R"]);
}

#[test]
fn optimizer_deadline_falls_back() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());
    let mut settings = Settings::for_project(project.path());
    settings.optimizer.timeout_s = 1;
    let resolver = Resolver::new(settings, reference()).with_optimizer(Arc::new(SlowOptimizer));

    let result = resolver.resolve(&ResolveRequest::new(FLIGHT));
    assert_eq!(result.provenance, Some(Provenance::Estimated));
    assert!(result.warnings[0].contains("did not finish"));
}

#[test]
fn missing_tables_fail_the_request() {
    let project = tempfile::tempdir().unwrap();
    let dir = flight_dir(project.path());
    fs::remove_file(dir.join("PieceInformation.csv")).unwrap();

    let result = resolver(project.path()).resolve(&ResolveRequest::new(FLIGHT));
    assert!(!result.success);
    assert!(result.provenance.is_none());
    assert!(
        result
            .error_message
            .unwrap()
            .contains("Required input table not found")
    );
}

#[test]
fn malformed_path_fails_the_request() {
    let project = tempfile::tempdir().unwrap();
    let result = resolver(project.path()).resolve(&ResolveRequest::new("just-a-name"));
    assert!(!result.success);
    assert!(result.error_message.unwrap().contains("Malformed flight path"));
}

#[test]
fn reports_stages_in_order() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());
    let mut stages = Vec::new();
    let mut record = |e: ct_app::ResolveEvent| stages.push(e.stage);
    resolver(project.path()).resolve_with_progress(&ResolveRequest::new(FLIGHT), Some(&mut record));
    assert_eq!(
        stages,
        [
            ResolveStage::LoadingTables,
            ResolveStage::LiveAttempt,
            ResolveStage::PrecomputedAttempt,
            ResolveStage::Estimating,
            ResolveStage::Enriching,
            ResolveStage::Completed,
        ]
    );
}

#[test]
fn lists_flights_with_report_availability() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());
    write_report(
        project.path(),
        "ULD PMC1 with weight 1500.0 kg is loaded to position 21L\n",
        None,
    );
    let settings = Settings::for_project(project.path());

    let flights = list_flight_summaries(&settings, ModelVariant::DelgadoVenezian).unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].path, FLIGHT);
    assert_eq!(flights[0].item_count, 3);
    assert!(flights[0].has_precomputed);

    let flights = list_flight_summaries(&settings, ModelVariant::Baseline).unwrap();
    assert!(!flights[0].has_precomputed);
}

#[test]
fn malformed_aircraft_row_only_disables_that_type() {
    let project = tempfile::tempdir().unwrap();
    flight_dir(project.path());
    write(
        &project.path().join("Inputfiles"),
        "Main.csv",
        "ACType,C,K,ReferenceArm,LEMAC,MACFormula,DOIIndex\n\
         781,180000,45,29.0,27.0,7.1,58\n\
         789,abc,50,30.0,28.0,7.0,60\n",
    );

    let resolver = Resolver::for_project(project.path()).unwrap();
    assert!(resolver.reference().aircraft.get("781").is_some());

    let result = resolver.resolve(&ResolveRequest::new(FLIGHT));
    assert!(result.success, "{:?}", result.error_message);
    assert_eq!(result.distribution.mac_zfw, Some(20.0));
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.contains("no geometry constants for aircraft type '789'"))
    );
}
