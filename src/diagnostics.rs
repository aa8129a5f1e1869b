//! Advisory diagnostics for one conversion run.
//!
//! Topology problems and repairs are counted unconditionally; the messages are
//! only logged when the run is not quiet. Quietness never changes geometry.

use log::warn;

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    quiet: bool,
    /// Adjacent duplicate points collapsed during ring assembly
    pub duplicates: usize,
    /// Unclosed single-way rings that were closed
    pub repairs: usize,
    /// Features dropped because their topology could not be resolved
    pub topology_errors: usize,
    /// Rings rejected for having fewer than 3 distinct points
    pub degenerate_rings: usize,
    /// Holes that no outer ring contains
    pub dropped_holes: usize,
    /// Source records skipped for missing mandatory fields
    pub skipped_records: usize,
}

impl Diagnostics {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            ..Default::default()
        }
    }

    pub fn quiet() -> Self {
        Self::new(true)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Emit an advisory message unless running quietly.
    pub fn note(&self, message: impl AsRef<str>) {
        if !self.quiet {
            warn!("{}", message.as_ref());
        }
    }

    pub fn topology_error(&mut self, message: impl AsRef<str>) {
        self.topology_errors += 1;
        self.note(message);
    }

    pub fn skipped_record(&mut self, message: impl AsRef<str>) {
        self.skipped_records += 1;
        self.note(message);
    }

    pub fn has_issues(&self) -> bool {
        self.duplicates > 0
            || self.repairs > 0
            || self.topology_errors > 0
            || self.degenerate_rings > 0
            || self.dropped_holes > 0
            || self.skipped_records > 0
    }

    pub fn summary(&self) -> String {
        if !self.has_issues() {
            "Geometry clean: no repairs needed".to_string()
        } else {
            format!(
                "Geometry issues: {} duplicate points, {} rings closed, {} topology errors, {} degenerate rings, {} orphan holes, {} skipped records",
                self.duplicates,
                self.repairs,
                self.topology_errors,
                self.degenerate_rings,
                self.dropped_holes,
                self.skipped_records
            )
        }
    }
}
