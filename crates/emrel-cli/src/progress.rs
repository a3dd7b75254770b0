//! CSV progress on stdout, one line per completed window.

use std::io::Write;

use emrel_core::units::ms_to_years;
use emrel_sim::events::types::IterationCompletedEvent;
use emrel_sim::SimulationEventHandler;

/// Writes `years,<r values>` for every window.
pub struct CsvProgress;

impl CsvProgress {
    /// The header line matching the rows this handler writes.
    pub fn header(components: &[String]) -> String {
        format!("time,{}", components.join(","))
    }
}

impl SimulationEventHandler for CsvProgress {
    fn on_iteration_completed(&self, event: &IterationCompletedEvent) {
        let mut line = ms_to_years(event.elapsed_ms as f64).to_string();
        for value in event.snapshot.values() {
            line.push(',');
            line.push_str(&value.to_string());
        }
        // A closed pipe must not abort the run.
        let _ = writeln!(std::io::stdout().lock(), "{line}");
    }
}
