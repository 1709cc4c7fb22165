use std::collections::HashMap;
use std::time::{Duration, Instant};

use good_lp::variable::Variable;
use good_lp::{constraint, default_solver, variable, variables, Expression, Solution, SolverModel};
use tracing::debug;

use crate::constraints::PrecedenceConstraint;
use crate::dataset::Dataset;
use crate::error::{JitError, Result};

/// Upper bound, in minutes, on how far a start time may drift from the
/// anchor in either direction. A full year is far beyond any feasible
/// schedule for this formulation.
const DEFAULT_HORIZON_MINUTES: i64 = 366 * 24 * 60;

/// Engine-level options fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Bound on the start-time decision variables, in minutes either side
    /// of the time-basis anchor.
    pub horizon_minutes: i64,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            horizon_minutes: DEFAULT_HORIZON_MINUTES,
        }
    }
}

/// Everything one solve produces. `start_offsets` and `deltas` are keyed by
/// batch index and come back in whatever order the engine reports them;
/// [`crate::dataset::unbuild`] restores the precedence order.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub objective_value: f64,
    pub start_offsets: HashMap<usize, i64>,
    pub deltas: HashMap<usize, i64>,
    pub elapsed: Duration,
    pub iterations: u64,
}

/// Long-lived handle to the solving engine. The session is stateful: the
/// model skeleton, the constraint set and the dataset are staged piecewise
/// and consumed by [`SolverSession::solve`]. The session cannot stage two
/// problems at once, so callers must serialize access to it.
pub struct SolverSession {
    options: SessionOptions,
    model_loaded: bool,
    constraints: Vec<PrecedenceConstraint>,
    dataset: Option<(Dataset, i64)>,
}

struct BatchVars {
    start: Variable,
    early: Variable,
    late: Variable,
    duration: i64,
    desired_finish: i64,
}

impl SolverSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            model_loaded: false,
            constraints: Vec::new(),
            dataset: None,
        }
    }

    /// Drops every previously staged model, constraint and data item. Must
    /// run before each new problem load: the previous request may have had
    /// a different batch count, and its constraints must never leak into
    /// the current solve.
    pub fn reset(&mut self) {
        self.model_loaded = false;
        self.constraints.clear();
        self.dataset = None;
    }

    /// Stages the fixed variable/domain/objective declarations. Idempotent
    /// after a reset.
    pub fn load_model(&mut self) {
        self.model_loaded = true;
    }

    /// Stages the per-request precedence constraints.
    pub fn load_constraints(&mut self, constraints: Vec<PrecedenceConstraint>) {
        for link in &constraints {
            debug!(name = %link.name(), "staging precedence constraint");
        }
        self.constraints = constraints;
    }

    /// Stages the per-batch dataset and the scalar penalty rate.
    pub fn load_dataset(&mut self, dataset: Dataset, penalty_rate: i64) {
        debug!(batches = dataset.len(), penalty_rate, "staging dataset");
        self.dataset = Some((dataset, penalty_rate));
    }

    /// Translates the staged problem into engine variables and constraints,
    /// runs the engine, and extracts the schedule. Blocks the calling
    /// thread until the engine returns.
    ///
    /// Per batch there is an integer start variable bounded by the session
    /// horizon plus a nonnegative earliness/lateness pair tied together by
    /// start + duration - desired = late - early; the objective minimizes
    /// penalty_rate * sum(early + late). Infeasibility cannot occur for a
    /// pure precedence chain, but the engine's word is never assumed: any
    /// engine failure propagates as [`JitError::SolveFailed`].
    pub fn solve(&mut self) -> Result<SolveOutcome> {
        if !self.model_loaded {
            return Err(JitError::SolveFailed(
                "no model loaded; reset the session and load the model first".to_string(),
            ));
        }
        let Some((dataset, penalty_rate)) = self.dataset.as_ref() else {
            return Err(JitError::SolveFailed("no dataset loaded".to_string()));
        };
        let penalty_rate = *penalty_rate;
        let horizon = self.options.horizon_minutes as f64;

        let mut builder = variables!();
        let mut batch_vars: HashMap<usize, BatchVars> = HashMap::new();
        for (batch, row) in dataset.rows() {
            let start = builder.add(variable().integer().min(-horizon).max(horizon));
            let early = builder.add(variable().min(0.0).max(horizon));
            let late = builder.add(variable().min(0.0).max(horizon));
            batch_vars.insert(
                batch,
                BatchVars {
                    start,
                    early,
                    late,
                    duration: row.duration,
                    desired_finish: row.desired_finish,
                },
            );
        }

        let mut deviation_sum = Expression::from(0);
        for (batch, _) in dataset.rows() {
            let vars = &batch_vars[&batch];
            deviation_sum += vars.early + vars.late;
        }
        let mut model = builder
            .minimise((penalty_rate as f64) * deviation_sum)
            .using(default_solver);

        for link in &self.constraints {
            let pred = batch_vars.get(&link.predecessor).ok_or_else(|| {
                JitError::SolveFailed(format!(
                    "constraint {} references unknown batch {}",
                    link.name(),
                    link.predecessor
                ))
            })?;
            let succ = batch_vars.get(&link.successor).ok_or_else(|| {
                JitError::SolveFailed(format!(
                    "constraint {} references unknown batch {}",
                    link.name(),
                    link.successor
                ))
            })?;
            model = model.with(constraint!(
                succ.start - pred.start >= pred.duration as f64
            ));
        }

        for (batch, _) in dataset.rows() {
            let vars = &batch_vars[&batch];
            // start + duration - desired = late - early, rearranged so the
            // constant sits on the right-hand side.
            model = model.with(constraint!(
                vars.start + vars.early - vars.late
                    == (vars.desired_finish - vars.duration) as f64
            ));
        }

        let started = Instant::now();
        let solution = model
            .solve()
            .map_err(|err| JitError::SolveFailed(err.to_string()))?;
        let elapsed = started.elapsed();

        let mut start_offsets = HashMap::with_capacity(batch_vars.len());
        let mut deltas = HashMap::with_capacity(batch_vars.len());
        for (&batch, vars) in &batch_vars {
            let start = solution.value(vars.start).round() as i64;
            start_offsets.insert(batch, start);
            // Exact integer deviation, derived from the rounded start and
            // the staged data rather than the float variable values.
            deltas.insert(batch, start + vars.duration - vars.desired_finish);
        }
        let total_deviation: i64 = deltas.values().map(|delta| delta.abs()).sum();
        let objective_value = (penalty_rate * total_deviation) as f64;

        // The embedded engine exposes no iteration statistic through its
        // typed API; a solve that reports nothing surfaces as 0, never as a
        // stale value from an earlier solve.
        let iterations = 0;

        debug!(
            objective_value,
            elapsed_ms = elapsed.as_millis() as u64,
            "solve finished"
        );

        Ok(SolveOutcome {
            objective_value,
            start_offsets,
            deltas,
            elapsed,
            iterations,
        })
    }

    /// Releases the engine handle at process shutdown. Must run after any
    /// in-flight solve has completed; the staged problem is dropped with
    /// the session.
    pub fn close(mut self) {
        self.reset();
        debug!("solver session closed");
    }
}
