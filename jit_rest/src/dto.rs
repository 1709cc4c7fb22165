use serde::{Deserialize, Serialize};

/// POST body for the just-in-time scheduling problem. `duration` and
/// `expected_finish` run in precedence order and must both have exactly
/// `n_batches` entries.
#[derive(Debug, Deserialize)]
pub struct JitRequest {
    pub n_batches: usize,
    pub wrong_time_fee: i64,
    pub duration: Vec<i64>,
    pub expected_finish: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JitResponse {
    pub data: ScheduleData,
    pub meta: SolveMeta,
}

#[derive(Debug, Serialize)]
pub struct ScheduleData {
    pub total_fee: f64,
    pub start_datetime: Vec<String>,
    pub delta_time: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SolveMeta {
    pub iterations: u64,
    pub computation_duration: f64,
}
