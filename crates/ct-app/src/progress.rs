/// Pipeline stages, in the order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    LoadingTables,
    LiveAttempt,
    PrecomputedAttempt,
    Estimating,
    Enriching,
    Completed,
}

impl ResolveStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolveStage::LoadingTables => "loading_tables",
            ResolveStage::LiveAttempt => "live_attempt",
            ResolveStage::PrecomputedAttempt => "precomputed_attempt",
            ResolveStage::Estimating => "estimating",
            ResolveStage::Enriching => "enriching",
            ResolveStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolveEvent {
    pub flight_path: String,
    pub stage: ResolveStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl ResolveEvent {
    pub fn stage(
        flight_path: &str,
        stage: ResolveStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            flight_path: flight_path.to_string(),
            stage,
            elapsed_wall_s,
            message,
        }
    }
}
