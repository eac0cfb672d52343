//! Flight result resolution.
//!
//! One request walks the tiers in order until one produces a load:
//!
//! 1. live: the optimizer, bounded by the configured deadline
//! 2. precomputed: a solver report located for the flight and variant
//! 3. estimated: heuristics over the raw tables, which always succeeds
//!
//! The winning load is enriched with balance, fuel and derived metrics.
//! Every fallback appends a warning; warnings are never dropped. The only
//! failed outcome is an unusable request: a malformed flight path or missing
//! mandatory tables.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use ct_aircraft::ReferenceData;
use ct_balance::MacCalculator;
use ct_core::FlightIdentity;
use ct_report::{ModelVariant, PrecomputedReport, ReportLocator};
use ct_results::{CanonicalLoad, ResolvedResult};
use ct_tables::FlightTables;

use crate::baseline;
use crate::balance;
use crate::canonical::TierContext;
use crate::config::Settings;
use crate::error::AppResult;
use crate::estimate;
use crate::live;
use crate::metrics::{self, MetricsInput};
use crate::optimizer::{
    CommandOptimizer, Optimizer, UnavailableOptimizer, solve_with_deadline,
};
use crate::precomputed;
use crate::progress::{ResolveEvent, ResolveStage};

/// Request to resolve one flight.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// `<route-folder>/<flight-folder>` below the data root.
    pub flight_path: String,
    pub variant: ModelVariant,
    /// Passed to the optimizer untouched; also checked in the safety group.
    pub restricted_positions: Vec<String>,
}

impl ResolveRequest {
    pub fn new(flight_path: impl Into<String>) -> Self {
        Self {
            flight_path: flight_path.into(),
            ..Self::default()
        }
    }

    pub fn with_variant(mut self, variant: ModelVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_restricted_positions(mut self, positions: Vec<String>) -> Self {
        self.restricted_positions = positions;
        self
    }
}

/// The resolution pipeline. Holds only immutable state, so one resolver
/// can serve independent requests.
pub struct Resolver {
    settings: Settings,
    reference: Arc<ReferenceData>,
    locator: ReportLocator,
    optimizer: Arc<dyn Optimizer>,
}

fn emit(
    progress_cb: &mut Option<&mut dyn FnMut(ResolveEvent)>,
    flight_path: &str,
    stage: ResolveStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(ResolveEvent::stage(
            flight_path,
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

impl Resolver {
    /// Resolver with the optimizer named in the settings, if any.
    pub fn new(settings: Settings, reference: Arc<ReferenceData>) -> Self {
        let timeout = settings.optimizer.timeout();
        let optimizer: Arc<dyn Optimizer> = match settings
            .optimizer
            .command
            .as_deref()
            .and_then(|cmd| CommandOptimizer::from_command(cmd, timeout))
        {
            Some(command) => Arc::new(command),
            None => Arc::new(UnavailableOptimizer),
        };
        Self {
            locator: settings.report_locator(),
            settings,
            reference,
            optimizer,
        }
    }

    /// Settings discovered under `project_root` and the reference data they
    /// name.
    pub fn for_project(project_root: &Path) -> AppResult<Self> {
        let settings = Settings::discover(project_root)?;
        let reference = Arc::new(settings.load_reference()?);
        Ok(Self::new(settings, reference))
    }

    pub fn with_optimizer(mut self, optimizer: Arc<dyn Optimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn resolve(&self, request: &ResolveRequest) -> ResolvedResult {
        self.resolve_with_progress(request, None)
    }

    /// Resolve and report each stage transition through `progress_cb`.
    pub fn resolve_with_progress(
        &self,
        request: &ResolveRequest,
        mut progress_cb: Option<&mut dyn FnMut(ResolveEvent)>,
    ) -> ResolvedResult {
        let started = Instant::now();
        let path = request.flight_path.as_str();
        let mut warnings = Vec::new();

        emit(&mut progress_cb, path, ResolveStage::LoadingTables, started, None);
        let (identity, tables) = match self.load_inputs(path) {
            Ok(inputs) => inputs,
            Err(e) => {
                tracing::error!(flight = path, error = %e, "cannot resolve flight");
                let result = ResolvedResult::failed(
                    path,
                    e.to_string(),
                    warnings,
                    started.elapsed().as_secs_f64(),
                );
                emit(
                    &mut progress_cb,
                    path,
                    ResolveStage::Completed,
                    started,
                    Some("failed".to_string()),
                );
                return result;
            }
        };
        warnings.extend(tables.warnings.iter().cloned());

        let ctx = TierContext {
            identity: &identity,
            tables: &tables,
            reference: &self.reference,
            settings: &self.settings,
        };

        emit(&mut progress_cb, path, ResolveStage::LiveAttempt, started, None);
        let mut load = self.try_live(&ctx, request, &mut warnings);

        if load.is_none() {
            emit(&mut progress_cb, path, ResolveStage::PrecomputedAttempt, started, None);
            load = self.try_precomputed(&ctx, request.variant, &mut warnings);
        }

        let mut load = match load {
            Some(load) => load,
            None => {
                emit(&mut progress_cb, path, ResolveStage::Estimating, started, None);
                estimate::from_tables(&ctx, &mut warnings)
            }
        };
        tracing::info!(
            flight = %identity.flight,
            provenance = %load.provenance,
            containers = load.containers.len(),
            "resolved load"
        );

        emit(&mut progress_cb, path, ResolveStage::Enriching, started, None);
        let calculator = MacCalculator::new(&self.reference.aircraft)
            .with_pax_estimate(self.settings.assumptions.pax_estimate());
        balance::settle_mac(
            &mut load,
            &calculator,
            tables.header.mac_zfw_percent(),
            &mut warnings,
        );
        let baseline = baseline::as_loaded(&tables, &self.settings.assumptions, &mut warnings);
        let runtime_seconds = started.elapsed().as_secs_f64();
        let derived = metrics::derive(
            &MetricsInput {
                load: &load,
                baseline: baseline.as_ref(),
                reference: &self.reference,
                settings: &self.settings,
                restricted_positions: &request.restricted_positions,
                runtime_seconds,
            },
            &mut warnings,
        );

        let result = ResolvedResult::enriched(
            load,
            derived,
            warnings,
            started.elapsed().as_secs_f64(),
        );
        emit(
            &mut progress_cb,
            path,
            ResolveStage::Completed,
            started,
            Some(format!("{} result", result.provenance.map_or("no", |p| p.as_str()))),
        );
        result
    }

    fn load_inputs(&self, path: &str) -> AppResult<(FlightIdentity, FlightTables)> {
        let identity = FlightIdentity::parse(path)?;
        let dir = self
            .settings
            .data_root()
            .join(&identity.route_folder)
            .join(&identity.flight_folder);
        let tables = FlightTables::load(&dir, self.settings.assumptions.standard_passenger_mass_kg)?;
        Ok((identity, tables))
    }

    fn try_live(
        &self,
        ctx: &TierContext<'_>,
        request: &ResolveRequest,
        warnings: &mut Vec<String>,
    ) -> Option<CanonicalLoad> {
        let inputs = live::solve_inputs(ctx, &request.restricted_positions, request.variant);
        let outcome = solve_with_deadline(
            Arc::clone(&self.optimizer),
            &inputs,
            self.settings.optimizer.timeout(),
        )
        .and_then(|outcome| live::from_outcome(outcome, ctx, warnings));
        match outcome {
            Ok(load) => Some(load),
            Err(e) => {
                tracing::warn!(flight = %ctx.identity.flight, error = %e, "live optimization failed");
                warnings.push(format!("Live optimization unavailable: {e}"));
                None
            }
        }
    }

    fn try_precomputed(
        &self,
        ctx: &TierContext<'_>,
        variant: ModelVariant,
        warnings: &mut Vec<String>,
    ) -> Option<CanonicalLoad> {
        let flight = &ctx.identity.flight;
        let dir = match self.locator.locate(ctx.identity, variant) {
            Ok(Some(dir)) => dir,
            Ok(None) => {
                tracing::warn!(%flight, %variant, "no precomputed report");
                warnings.push(format!("No precomputed {variant} report found for {flight}"));
                return None;
            }
            Err(e) => {
                tracing::warn!(%flight, error = %e, "report lookup failed");
                warnings.push(format!("Precomputed report lookup failed: {e}"));
                return None;
            }
        };
        let report = match PrecomputedReport::read(&dir) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(%flight, error = %e, "report unreadable");
                warnings.push(format!("Precomputed report unusable: {e}"));
                return None;
            }
        };
        if !report.parsed.is_usable() {
            tracing::warn!(%flight, dir = %dir.display(), "report has no placements");
            warnings.push(format!(
                "Precomputed report at {} has no container placements",
                dir.display()
            ));
            return None;
        }
        Some(precomputed::from_report(report, ctx, warnings))
    }
}
