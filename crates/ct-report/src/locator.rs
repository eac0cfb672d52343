//! Report directory lookup.
//!
//! Report trees mirror the flight data tree with different naming:
//!
//! ```text
//! Results/
//!   Results AMSSIN JAN 2024/
//!     Flight KL835 AMSSIN 08 JAN 24/
//!       Results.txt
//! ```
//!
//! A [`ReportIndex`] maps route-folder names to the flight folders below them,
//! keyed by integer flight number, so matching is independent of leading
//! zeros and of directory iteration order. Ambiguities are broken explicitly:
//!
//! 1. route folders: a folder whose name minus its first word equals the
//!    route token beats one that merely contains it, then by name;
//! 2. flight folders: exact folder name, then same day of month, then by name.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ct_core::{FlightIdentity, FlightKey};

use crate::error::{ReportError, ReportResult};
use crate::variant::ModelVariant;

/// One flight folder inside a report tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub route_folder: String,
    pub folder_name: String,
    pub key: FlightKey,
    pub day: Option<u32>,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ReportIndex {
    /// route folder name -> flight number -> entries sorted by folder name
    routes: BTreeMap<String, HashMap<u32, Vec<ReportEntry>>>,
}

impl ReportIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes the two directory levels below `root`. A missing root yields
    /// an empty index.
    pub fn scan(root: &Path) -> ReportResult<Self> {
        let mut index = Self::new();
        let routes = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(root = %root.display(), "report root does not exist");
                return Ok(index);
            }
            Err(source) => {
                return Err(ReportError::Io {
                    path: root.to_path_buf(),
                    source,
                });
            }
        };

        for route in routes {
            let route = route.map_err(|source| ReportError::Io {
                path: root.to_path_buf(),
                source,
            })?;
            let route_path = route.path();
            if !route_path.is_dir() {
                continue;
            }
            let route_name = route.file_name().to_string_lossy().into_owned();
            let flights = fs::read_dir(&route_path).map_err(|source| ReportError::Io {
                path: route_path.clone(),
                source,
            })?;
            for flight in flights {
                let flight = flight.map_err(|source| ReportError::Io {
                    path: route_path.clone(),
                    source,
                })?;
                let flight_path = flight.path();
                if !flight_path.is_dir() {
                    continue;
                }
                let flight_name = flight.file_name().to_string_lossy().into_owned();
                index.insert(&route_name, &flight_name, flight_path);
            }
        }

        tracing::debug!(root = %root.display(), flights = index.len(), "indexed report root");
        Ok(index)
    }

    /// Adds one flight folder. Folders without a flight designator are
    /// ignored.
    pub fn insert(&mut self, route_folder: &str, flight_folder: &str, path: PathBuf) {
        let Some(key) = FlightKey::find(flight_folder) else {
            tracing::debug!(route_folder, flight_folder, "skipping folder without flight number");
            return;
        };
        let entry = ReportEntry {
            route_folder: route_folder.to_string(),
            folder_name: flight_folder.to_string(),
            day: day_of_month(flight_folder),
            key,
            path,
        };
        let bucket = self
            .routes
            .entry(route_folder.to_string())
            .or_default()
            .entry(entry.key.number)
            .or_default();
        let at = bucket.partition_point(|e| e.folder_name < entry.folder_name);
        bucket.insert(at, entry);
    }

    pub fn len(&self) -> usize {
        self.routes
            .values()
            .flat_map(|flights| flights.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, flight: &FlightIdentity) -> Option<&ReportEntry> {
        let token = flight.route_token.as_str();
        let mut routes: Vec<(&String, &HashMap<u32, Vec<ReportEntry>>)> = self
            .routes
            .iter()
            .filter(|(name, _)| name.contains(token))
            .collect();
        // BTreeMap order already sorts by name; stable sort keeps it within rank.
        routes.sort_by_key(|(name, _)| !is_exact_route(name, token));

        let wanted_day = flight.date.as_deref().and_then(leading_day);
        routes.into_iter().find_map(|(_, flights)| {
            let candidates: Vec<&ReportEntry> = flights
                .get(&flight.flight.number)?
                .iter()
                .filter(|e| e.key.carrier.eq_ignore_ascii_case(&flight.flight.carrier))
                .collect();
            candidates
                .iter()
                .find(|e| e.folder_name == flight.flight_folder)
                .or_else(|| {
                    candidates
                        .iter()
                        .find(|e| wanted_day.is_some() && e.day == wanted_day)
                })
                .or_else(|| candidates.first())
                .copied()
        })
    }
}

fn is_exact_route(folder: &str, token: &str) -> bool {
    folder
        .split_once(' ')
        .is_some_and(|(_, rest)| rest.trim() == token)
}

fn leading_day(date: &str) -> Option<u32> {
    let day: u32 = date.split_whitespace().next()?.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

/// Day of month from a flight folder name: the first one- or two-digit token
/// after the flight designator.
fn day_of_month(folder: &str) -> Option<u32> {
    folder
        .split_whitespace()
        .skip_while(|t| FlightKey::find(t).is_none())
        .skip(1)
        .filter(|t| t.len() <= 2)
        .find_map(leading_day)
}

/// Report roots per model variant. Every lookup rescans the tree.
#[derive(Debug, Clone)]
pub struct ReportLocator {
    roots: BTreeMap<ModelVariant, PathBuf>,
}

impl ReportLocator {
    /// Default root folder names below `project_root`.
    pub fn under(project_root: &Path) -> Self {
        let roots = ModelVariant::ALL
            .into_iter()
            .map(|v| (v, project_root.join(v.default_root())))
            .collect();
        Self { roots }
    }

    pub fn with_root(mut self, variant: ModelVariant, root: PathBuf) -> Self {
        self.roots.insert(variant, root);
        self
    }

    pub fn root(&self, variant: ModelVariant) -> Option<&Path> {
        self.roots.get(&variant).map(PathBuf::as_path)
    }

    /// Report directory for `flight`, or `None` when no folder matches.
    pub fn locate(
        &self,
        flight: &FlightIdentity,
        variant: ModelVariant,
    ) -> ReportResult<Option<PathBuf>> {
        let Some(root) = self.root(variant) else {
            return Ok(None);
        };
        let index = ReportIndex::scan(root)?;
        let found = index.lookup(flight).map(|e| e.path.clone());
        match &found {
            Some(path) => tracing::debug!(flight = %flight.flight, path = %path.display(), "located report"),
            None => tracing::debug!(flight = %flight.flight, %variant, "no report directory"),
        }
        Ok(found)
    }
}
