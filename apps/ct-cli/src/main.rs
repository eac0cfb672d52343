use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ct_app::{
    AppResult, ResolveEvent, ResolveRequest, Resolver, Settings, list_flight_summaries,
};
use ct_balance::{CompartmentWeights, MacCalculator, fuel_savings};
use ct_core::{Compartment, Side};
use ct_report::{ModelVariant, PrecomputedReport};
use ct_results::{ResolvedResult, ResultArchive};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ct-cli")]
#[command(about = "cargotrim CLI - cargo load results, balance and fuel savings", long_about = None)]
struct Cli {
    /// Project root holding cargotrim.yaml, Data/ and the report trees
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the load result for one flight
    Resolve {
        /// Flight path, `<route-folder>/<flight-folder>`
        flight_path: String,
        /// Model variant whose reports are searched
        #[arg(long, default_value_t = ModelVariant::default())]
        variant: ModelVariant,
        /// Position the optimizer must leave empty (repeatable)
        #[arg(long = "restrict")]
        restricted: Vec<String>,
        /// Store the result in the project's archive
        #[arg(long)]
        archive: bool,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List flights under the data root
    Flights {
        #[arg(long, default_value_t = ModelVariant::default())]
        variant: ModelVariant,
    },
    /// Parse a report directory and print what was found
    ParseReport {
        /// Directory containing Results.txt
        dir: PathBuf,
    },
    /// Compute the MAC at zero-fuel weight
    Mac {
        /// Aircraft type code, e.g. 789
        #[arg(long = "type")]
        ac_type: String,
        /// Zero-fuel weight in kg
        #[arg(long)]
        zfw: f64,
        /// Compartment weights in kg, C1 to C4
        #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.0, 0.0, 0.0])]
        compartments: Vec<f64>,
        /// Passenger weight in kg; estimated from the type when absent
        #[arg(long)]
        pax: Option<f64>,
    },
    /// Fuel saved by flying at one MAC instead of another
    FuelSavings {
        #[arg(long = "type")]
        ac_type: String,
        /// MAC of the proposed load, % MAC
        #[arg(long)]
        optimized: f64,
        /// MAC of the as-loaded flight, % MAC
        #[arg(long)]
        baseline: f64,
        /// Trip fuel in kg
        #[arg(long)]
        trip_fuel: f64,
    },
    /// Inspect archived results
    #[command(subcommand)]
    Archive(ArchiveCommands),
}

#[derive(Subcommand)]
enum ArchiveCommands {
    /// List archived results, newest first
    List {
        /// Only results for this flight path
        #[arg(long)]
        flight: Option<String>,
    },
    /// Print an archived result as JSON
    Show { result_id: String },
    /// Remove an archived result
    Delete { result_id: String },
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project = cli.project.as_path();
    match cli.command {
        Commands::Resolve {
            flight_path,
            variant,
            restricted,
            archive,
            json,
        } => cmd_resolve(project, flight_path, variant, restricted, archive, json),
        Commands::Flights { variant } => cmd_flights(project, variant),
        Commands::ParseReport { dir } => cmd_parse_report(&dir),
        Commands::Mac {
            ac_type,
            zfw,
            compartments,
            pax,
        } => cmd_mac(project, &ac_type, zfw, &compartments, pax),
        Commands::FuelSavings {
            ac_type,
            optimized,
            baseline,
            trip_fuel,
        } => cmd_fuel_savings(project, &ac_type, optimized, baseline, trip_fuel),
        Commands::Archive(cmd) => match cmd {
            ArchiveCommands::List { flight } => cmd_archive_list(project, flight.as_deref()),
            ArchiveCommands::Show { result_id } => cmd_archive_show(project, &result_id),
            ArchiveCommands::Delete { result_id } => cmd_archive_delete(project, &result_id),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn cmd_resolve(
    project: &Path,
    flight_path: String,
    variant: ModelVariant,
    restricted: Vec<String>,
    archive: bool,
    json: bool,
) -> AppResult<()> {
    let resolver = Resolver::for_project(project)?;
    let request = ResolveRequest::new(flight_path)
        .with_variant(variant)
        .with_restricted_positions(restricted);

    let result = if json {
        resolver.resolve(&request)
    } else {
        let result =
            resolver.resolve_with_progress(&request, Some(&mut |event| render_progress(&event)));
        clear_progress_line();
        result
    };

    if archive && result.success {
        let store = ResultArchive::for_project(project)?;
        let manifest = store.save(&result, variant.as_str())?;
        eprintln!("Archived as {}", manifest.result_id);
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).map_err(ct_results::ResultsError::from)?
        );
    } else {
        print_result(&result);
    }
    Ok(())
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(100));
    let _ = io::stderr().flush();
}

fn render_progress(event: &ResolveEvent) {
    let mut line = format!(
        "\r{:<20} elapsed={:.2}s",
        event.stage.as_str(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {msg}"));
    }
    eprint!("{line}");
    let _ = io::stderr().flush();
}

fn print_result(result: &ResolvedResult) {
    if !result.success {
        println!(
            "✗ {}: {}",
            result.flight.path,
            result.error_message.as_deref().unwrap_or("failed")
        );
        print_warnings(&result.warnings);
        return;
    }

    let flight = &result.flight;
    let provenance = result.provenance.map_or("none", |p| p.as_str());
    println!(
        "✓ {} {} {}-{} ({}) [{}]",
        flight.flight_number,
        flight.date,
        flight.departure_airport,
        flight.arrival_airport,
        flight.aircraft_type,
        provenance
    );

    let d = &result.distribution;
    println!("\nDistribution:");
    for c in Compartment::ALL {
        println!("  {c}: {:>10.1} kg", d.compartment(c));
    }
    for s in Side::ALL {
        println!("  {s:?}: {:>8.1} kg", d.side(s));
    }
    println!("  Total: {:>8.1} kg", d.total_weight_kg);
    if d.unplaced_weight_kg > 0.0 {
        println!("  Unplaced: {:>5.1} kg", d.unplaced_weight_kg);
    }
    println!("  ZFW:   {:>8.0} kg", d.zfw_kg);
    match d.mac_zfw {
        Some(mac) => println!("  MAC ZFW: {mac:.2} %"),
        None => println!("  MAC ZFW: n/a"),
    }
    println!("  Containers: {}  Items: {}", result.containers.len(), result.items.len());

    if let Some(cmp) = result.metrics.as_ref().and_then(|m| m.comparison.as_ref()) {
        println!("\nAgainst the as-loaded flight:");
        if let Some(mac) = cmp.mac_difference {
            println!("  MAC difference: {mac:+.2}");
        }
        if let Some(kg) = cmp.fuel_savings_kg {
            println!("  Fuel savings:   {kg:.1} kg");
        }
        if let Some(usd) = cmp.cost_savings_usd {
            println!("  Cost savings:   {usd:.2} USD");
        }
        if let Some(annual) = &cmp.annual_impact {
            println!(
                "  Per year ({} flights): {:.0} kg fuel, {:.1} t CO2",
                annual.flights_per_year,
                annual.fuel_savings_per_year_kg,
                annual.co2_reduction_per_year_tons
            );
        }
    }

    print_warnings(&result.warnings);
    println!("\nResolved in {:.2}s", result.runtime_seconds);
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("\nWarnings:");
    for w in warnings {
        println!("  - {w}");
    }
}

fn cmd_flights(project: &Path, variant: ModelVariant) -> AppResult<()> {
    let settings = Settings::discover(project)?;
    let flights = list_flight_summaries(&settings, variant)?;

    if flights.is_empty() {
        println!("No flights found under {}", settings.data_root().display());
    } else {
        println!("Flights ({variant} reports marked *):");
        for f in flights {
            let marker = if f.has_precomputed { '*' } else { ' ' };
            println!("  {marker} {} ({} items)", f.path, f.item_count);
        }
    }
    Ok(())
}

fn cmd_parse_report(dir: &Path) -> AppResult<()> {
    let report = PrecomputedReport::read(dir)?;
    let parsed = &report.parsed;

    println!("Report: {}", report.dir.display());
    println!("  Placements: {}", parsed.containers.len());
    for p in &parsed.containers {
        println!("    {:<14} {:>8.1} kg  {}", p.serial, p.weight_kg, p.position);
    }
    for (c, kg) in &parsed.weight_by_compartment {
        println!("  {c}: {kg:.1} kg");
    }
    if let Some(mac) = parsed.mac_zfw {
        println!("  MAC ZFW: {mac:.2} %");
    }
    if let Some(dev) = parsed.fuel_deviation_kg {
        println!("  Fuel deviation: {dev:.1} kg");
    }
    if let Some(n) = parsed.declared_container_count {
        println!("  Declared ULDs: {n}");
    }
    if let Some(info) = &report.general {
        if let Some(zfw) = info.zfw_kg {
            println!("  ZFW: {zfw:.0} kg");
        }
        if let Some(t) = &info.aircraft_type {
            println!("  Aircraft type: {t}");
        }
    }
    if !parsed.is_usable() {
        println!("  (no placements; this report cannot be used)");
    }
    Ok(())
}

fn cmd_mac(
    project: &Path,
    ac_type: &str,
    zfw: f64,
    compartments: &[f64],
    pax: Option<f64>,
) -> AppResult<()> {
    let settings = Settings::discover(project)?;
    let reference = settings.load_reference()?;
    let weights: CompartmentWeights = Compartment::ALL
        .into_iter()
        .zip(compartments.iter().copied())
        .collect();
    let calculator =
        MacCalculator::new(&reference.aircraft).with_pax_estimate(settings.assumptions.pax_estimate());

    match calculator.compute(ac_type, &weights, zfw, pax) {
        Ok(mac) => println!("MAC ZFW: {mac:.2} %"),
        Err(reason) => println!("MAC ZFW not available: {reason}"),
    }
    Ok(())
}

fn cmd_fuel_savings(
    project: &Path,
    ac_type: &str,
    optimized: f64,
    baseline: f64,
    trip_fuel: f64,
) -> AppResult<()> {
    let settings = Settings::discover(project)?;
    let reference = settings.load_reference()?;

    match fuel_savings(&reference.brackets, ac_type, optimized, baseline, trip_fuel) {
        Ok(s) => {
            let flight = settings.economics.per_flight(s.fuel_savings_kg);
            let annual = settings.economics.annual(s.fuel_savings_kg);
            println!("Curve: {:?}", s.family);
            println!(
                "  Increments: {:.2} % (optimized), {:.2} % (baseline)",
                s.model_increment_percent, s.baseline_increment_percent
            );
            println!(
                "  Savings: {:.1} kg ({:.2} %), {:.2} USD, {:.1} kg CO2",
                s.fuel_savings_kg, s.fuel_savings_percent, flight.cost_usd, flight.co2_kg
            );
            println!(
                "  Per year ({} flights): {:.0} kg, {:.0} USD",
                annual.flights_per_year,
                annual.fuel_savings_per_year_kg,
                annual.cost_savings_per_year_usd
            );
        }
        Err(reason) => println!("Fuel savings not available: {reason}"),
    }
    Ok(())
}

fn cmd_archive_list(project: &Path, flight: Option<&str>) -> AppResult<()> {
    let store = ResultArchive::for_project(project)?;
    let manifests = store.list(flight)?;

    if manifests.is_empty() {
        println!("No archived results");
    } else {
        for m in manifests {
            let provenance = m.provenance.map_or("none", |p| p.as_str());
            println!(
                "  {} {} [{} {}] ({} warnings) {}",
                &m.result_id[..12.min(m.result_id.len())],
                m.flight_path,
                m.variant,
                provenance,
                m.warning_count,
                m.timestamp
            );
        }
    }
    Ok(())
}

fn cmd_archive_show(project: &Path, result_id: &str) -> AppResult<()> {
    let store = ResultArchive::for_project(project)?;
    let result = store.load_result(result_id)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&result).map_err(ct_results::ResultsError::from)?
    );
    Ok(())
}

fn cmd_archive_delete(project: &Path, result_id: &str) -> AppResult<()> {
    let store = ResultArchive::for_project(project)?;
    store.delete(result_id)?;
    println!("✓ Deleted {result_id}");
    Ok(())
}
