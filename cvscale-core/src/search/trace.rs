use serde::Serialize;

/// One step of search narration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    Started {
        original_cv: f64,
        base_scale: f64,
        grid_points: usize,
    },
    NewBest {
        examined: usize,
        scale_multiplier: f64,
        scale_factor: f64,
        /// `None` when every element rounded to zero.
        quantized_cv: Option<f64>,
        cv_error: f64,
    },
    TargetMet {
        examined: usize,
        scale_factor: f64,
        cv_error: f64,
    },
    Exhausted {
        examined: usize,
        best_scale: f64,
        best_cv_error: f64,
    },
}

/// Receives trace events while a search runs.
pub trait SearchObserver {
    fn on_event(&mut self, event: TraceEvent);
}

/// Discards everything.
impl SearchObserver for () {
    #[inline]
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Ordered record of a single search invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTrace {
    events: Vec<TraceEvent>,
}

impl SearchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Number of times the best candidate was replaced (the seed counts).
    pub fn improvements(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::NewBest { .. }))
            .count()
    }
}

impl SearchObserver for SearchTrace {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
