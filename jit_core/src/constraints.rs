use serde::Serialize;

use crate::error::{JitError, Result};

/// One link of the precedence chain: the successor batch may not start
/// before the predecessor has run for its full duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrecedenceConstraint {
    pub predecessor: usize,
    pub successor: usize,
}

impl PrecedenceConstraint {
    /// Deterministic identifier derived from the two batch indices. The
    /// engine accumulates named constraints and duplicate names are an
    /// error, so identical inputs must yield identical names.
    pub fn name(&self) -> String {
        format!("ordering_{}_{}", self.successor, self.predecessor)
    }
}

/// Builds the ordered precedence constraints for a chain of `count`
/// batches: for each i in 1..count-1, start(i+1) >= start(i) + duration(i).
/// A single batch has no predecessor, so `count == 1` yields an empty set.
pub fn precedence_chain(count: usize) -> Result<Vec<PrecedenceConstraint>> {
    if count == 0 {
        return Err(JitError::InvalidBatchCount(0));
    }
    Ok((1..count)
        .map(|i| PrecedenceConstraint {
            predecessor: i,
            successor: i + 1,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_has_one_link_per_consecutive_pair() {
        let chain = precedence_chain(4).unwrap();
        assert_eq!(chain.len(), 3);
        for (i, link) in chain.iter().enumerate() {
            assert_eq!(link.predecessor, i + 1);
            assert_eq!(link.successor, i + 2);
        }
    }

    #[test]
    fn chain_is_deterministic() {
        assert_eq!(precedence_chain(5).unwrap(), precedence_chain(5).unwrap());
    }

    #[test]
    fn names_embed_both_indices() {
        let chain = precedence_chain(3).unwrap();
        let names: Vec<String> = chain.iter().map(PrecedenceConstraint::name).collect();
        assert_eq!(names, vec!["ordering_2_1", "ordering_3_2"]);
    }

    #[test]
    fn single_batch_needs_no_constraints() {
        assert!(precedence_chain(1).unwrap().is_empty());
    }

    #[test]
    fn zero_batches_is_invalid() {
        assert!(matches!(
            precedence_chain(0).unwrap_err(),
            JitError::InvalidBatchCount(0)
        ));
    }
}
