use chrono::NaiveDateTime;

use jit_core::timebase;
use jit_core::JitProblem;

use crate::dto::JitRequest;

/// Checks the rules JSON structure alone cannot express. Violations are
/// client faults and must surface before the engine is ever touched.
pub fn validate(request: &JitRequest) -> Result<JitProblem, String> {
    if request.n_batches == 0 {
        return Err("`n_batches` must be at least 1".to_string());
    }
    if request.duration.len() != request.n_batches
        || request.expected_finish.len() != request.n_batches
    {
        return Err(
            "The length of the `duration` and `expected_finish` lists must equal \
             the value of `n_batches`"
                .to_string(),
        );
    }
    if let Some(bad) = request.duration.iter().find(|duration| **duration <= 0) {
        return Err(format!("`duration` entries must be positive, got {bad}"));
    }
    if request.wrong_time_fee < 0 {
        return Err("`wrong_time_fee` must not be negative".to_string());
    }

    let desired_finish = request
        .expected_finish
        .iter()
        .map(|raw| {
            timebase::parse_datetime(raw).map_err(|err| {
                format!("`expected_finish` entry `{raw}` is not a valid `YYYY-MM-DD HH:MM` timestamp: {err}")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !is_asc_sorted(&desired_finish) {
        return Err(
            "The values in the `expected_finish` list must be ascendentally sorted".to_string(),
        );
    }

    Ok(JitProblem {
        penalty_rate: request.wrong_time_fee,
        durations: request.duration.clone(),
        desired_finish,
    })
}

/// True when every item is no earlier than the one before it.
fn is_asc_sorted(times: &[NaiveDateTime]) -> bool {
    times.windows(2).all(|pair| pair[0] <= pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        n_batches: usize,
        duration: Vec<i64>,
        expected_finish: Vec<&str>,
    ) -> JitRequest {
        JitRequest {
            n_batches,
            wrong_time_fee: 10,
            duration,
            expected_finish: expected_finish.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn accepts_a_well_formed_request() {
        let req = request(2, vec![5, 5], vec!["2019-08-22 14:00", "2019-08-22 14:10"]);
        let problem = validate(&req).unwrap();
        assert_eq!(problem.durations, vec![5, 5]);
        assert_eq!(problem.penalty_rate, 10);
    }

    #[test]
    fn rejects_list_length_disagreeing_with_batch_count() {
        let req = request(
            4,
            vec![5, 5, 5],
            vec!["2019-08-22 14:00", "2019-08-22 14:10", "2019-08-22 14:20"],
        );
        let err = validate(&req).unwrap_err();
        assert!(err.contains("must equal the value of `n_batches`"));
    }

    #[test]
    fn rejects_descending_expected_finish() {
        let req = request(2, vec![5, 5], vec!["2019-08-22 14:42", "2019-08-22 14:32"]);
        let err = validate(&req).unwrap_err();
        assert!(err.contains("ascendentally sorted"));
    }

    #[test]
    fn rejects_a_descending_last_pair() {
        // Every adjacent pair counts, including the final one.
        let req = request(
            3,
            vec![5, 5, 5],
            vec!["2019-08-22 14:00", "2019-08-22 14:10", "2019-08-22 14:05"],
        );
        assert!(validate(&req).is_err());
    }

    #[test]
    fn equal_neighbouring_deadlines_are_allowed() {
        let req = request(2, vec![5, 5], vec!["2019-08-22 14:10", "2019-08-22 14:10"]);
        assert!(validate(&req).is_ok());
    }

    #[test]
    fn rejects_zero_batches() {
        let req = request(0, vec![], vec![]);
        assert!(validate(&req).unwrap_err().contains("n_batches"));
    }

    #[test]
    fn rejects_nonpositive_durations() {
        let req = request(2, vec![5, 0], vec!["2019-08-22 14:00", "2019-08-22 14:10"]);
        assert!(validate(&req).unwrap_err().contains("positive"));
    }

    #[test]
    fn rejects_unparseable_timestamps() {
        let req = request(1, vec![5], vec!["22/08/2019 14:00"]);
        let err = validate(&req).unwrap_err();
        assert!(err.contains("not a valid"));
    }

    #[test]
    fn rejects_negative_fee() {
        let mut req = request(1, vec![5], vec!["2019-08-22 14:00"]);
        req.wrong_time_fee = -1;
        assert!(validate(&req).unwrap_err().contains("wrong_time_fee"));
    }
}
