use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::constraints::precedence_chain;
use crate::dataset::{self, Dataset};
use crate::error::Result;
use crate::session::SolverSession;
use crate::timebase;

/// A validated problem ready for the engine: one duration and one desired
/// finish time per batch, in precedence order, plus the per-minute
/// deviation fee. The batch count is the list length; the service layer
/// has already checked it against the request's declared count.
#[derive(Debug, Clone)]
pub struct JitProblem {
    pub penalty_rate: i64,
    pub durations: Vec<i64>,
    pub desired_finish: Vec<NaiveDateTime>,
}

/// The reconstructed absolute-time schedule plus solver diagnostics.
#[derive(Debug, Clone)]
pub struct JitSolution {
    pub total_fee: f64,
    pub start_datetimes: Vec<NaiveDateTime>,
    pub delta_minutes: Vec<i64>,
    pub elapsed: Duration,
    pub iterations: u64,
}

/// Drives one request through the engine: synthesizes the constraint set,
/// normalizes the deadlines onto the minute time basis, stages and solves
/// the problem, and converts the result back into absolute timestamps.
///
/// The caller must hold exclusive access to the session for the whole
/// call; the session is reset before the new problem is loaded.
pub fn solve_jit(session: &mut SolverSession, problem: &JitProblem) -> Result<JitSolution> {
    let n_batches = problem.durations.len();
    let links = precedence_chain(n_batches)?;

    let desired_offsets = timebase::to_offsets(&problem.desired_finish);
    let dataset = Dataset::build(&problem.durations, &desired_offsets)?;

    session.reset();
    session.load_model();
    session.load_constraints(links);
    session.load_dataset(dataset, problem.penalty_rate);
    let outcome = session.solve()?;

    let entries = dataset::unbuild(&outcome.start_offsets, &outcome.deltas)?;
    let start_offsets: Vec<i64> = entries.iter().map(|entry| entry.start_offset).collect();
    let delta_minutes: Vec<i64> = entries.iter().map(|entry| entry.delta).collect();
    let start_datetimes = timebase::from_offsets(&problem.desired_finish, &start_offsets)?;

    debug!(
        n_batches,
        total_fee = outcome.objective_value,
        "schedule reconstructed"
    );

    Ok(JitSolution {
        total_fee: outcome.objective_value,
        start_datetimes,
        delta_minutes,
        elapsed: outcome.elapsed,
        iterations: outcome.iterations,
    })
}
