use osc_results::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStage {
    Planning,
    Simulating,
    Parsing,
    CleaningUp,
    Saving,
    Completed,
}

impl BatchStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Simulating => "simulating",
            Self::Parsing => "parsing",
            Self::CleaningUp => "cleaning up",
            Self::Saving => "saving",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchProgressEvent {
    pub scenario: Scenario,
    pub stage: BatchStage,
    pub elapsed_wall_s: f64,
    /// Finished simulations, while simulating.
    pub completed: Option<usize>,
    pub total: Option<usize>,
    pub message: Option<String>,
}

impl BatchProgressEvent {
    pub fn stage(
        scenario: Scenario,
        stage: BatchStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            scenario,
            stage,
            elapsed_wall_s,
            completed: None,
            total: None,
            message,
        }
    }

    pub fn fraction_complete(&self) -> Option<f64> {
        match (self.completed, self.total) {
            (Some(done), Some(total)) if total > 0 => Some(done as f64 / total as f64),
            _ => None,
        }
    }
}
