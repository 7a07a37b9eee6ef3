//! Checked schema steps.
//!
//! A migration is written as a list of [`SchemaStep`]s. Before applying, every
//! step asks the database whether its effect is already present (table,
//! column, index or constraint exists; no rows left to backfill) and skips
//! itself if so. After applying, the same check runs again and a step whose
//! postcondition does not hold fails the migration. Re-running a migration
//! against a partially migrated database therefore converges instead of
//! erroring.

mod step;

pub use step::{SchemaStep, StepOutcome, StepReport, apply_steps};
