// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::stats::BnbSolverStatistics;
use stowage_core::num::PackingNumeric;
use stowage_model::packing::Packing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// A packing was found and proven to use the fewest bins.
    Optimal(Packing<T>),
    /// A packing was found, but not proven optimal.
    Feasible(Packing<T>),
    /// The search stopped without any packing.
    Unknown,
}

impl<T> SolverResult<T> {
    /// Returns the packing, if any.
    #[inline]
    pub fn packing(&self) -> Option<&Packing<T>> {
        match self {
            SolverResult::Optimal(packing) | SolverResult::Feasible(packing) => Some(packing),
            SolverResult::Unknown => None,
        }
    }

    /// Consumes the result and returns the packing, if any.
    #[inline]
    pub fn into_packing(self) -> Option<Packing<T>> {
        match self {
            SolverResult::Optimal(packing) | SolverResult::Feasible(packing) => Some(packing),
            SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolverResult::Optimal(_))
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: PackingNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Optimal(packing) => write!(f, "Optimal(bins={})", packing.num_bins()),
            SolverResult::Feasible(packing) => write!(f, "Feasible(bins={})", packing.num_bins()),
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The whole search tree was explored.
    Exhausted,
    /// The incumbent matched the root lower bound.
    LowerBoundReached,
    /// The fixed prefix handed to the solver was rejected.
    InvalidPrefix(String),
    /// A monitor stopped the search (time, nodes, interrupt).
    /// The string describes the reason.
    Aborted(String),
}

impl TerminationReason {
    /// Returns `true` if the search completed on its own.
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            TerminationReason::Exhausted | TerminationReason::LowerBoundReached
        )
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "Search Exhausted"),
            TerminationReason::LowerBoundReached => write!(f, "Lower Bound Reached"),
            TerminationReason::InvalidPrefix(reason) => write!(f, "Invalid Prefix: {}", reason),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Result of one search session after termination.
#[derive(Debug, Clone)]
pub struct BnbSolverOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
}

impl<T> BnbSolverOutcome<T> {
    #[inline]
    pub fn new(
        result: SolverResult<T>,
        termination_reason: TerminationReason,
        statistics: BnbSolverStatistics,
    ) -> Self {
        Self {
            result,
            termination_reason,
            statistics,
        }
    }

    /// The search proved `packing` optimal.
    #[inline]
    pub fn optimal(
        packing: Packing<T>,
        termination_reason: TerminationReason,
        statistics: BnbSolverStatistics,
    ) -> Self {
        debug_assert!(
            termination_reason.is_complete(),
            "called `BnbSolverOutcome::optimal` with incomplete termination reason {}",
            termination_reason
        );

        Self::new(SolverResult::Optimal(packing), termination_reason, statistics)
    }

    /// The search stopped early, keeping whatever packing it had.
    #[inline]
    pub fn aborted<R>(
        packing: Option<Packing<T>>,
        reason: R,
        statistics: BnbSolverStatistics,
    ) -> Self
    where
        R: Into<String>,
    {
        let result = match packing {
            Some(packing) => SolverResult::Feasible(packing),
            None => SolverResult::Unknown,
        };
        Self::new(result, TerminationReason::Aborted(reason.into()), statistics)
    }

    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Splits the outcome into its parts.
    #[inline]
    pub fn into_parts(self) -> (SolverResult<T>, TerminationReason, BnbSolverStatistics) {
        (self.result, self.termination_reason, self.statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_model::index::BinIndex;

    type I = i64;

    fn packing() -> Packing<I> {
        Packing::new(vec![BinIndex::new(0), BinIndex::new(1)], vec![4, 3])
    }

    #[test]
    fn test_aborted_without_packing_is_unknown() {
        let outcome =
            BnbSolverOutcome::<I>::aborted::<&str>(None, "time limit", BnbSolverStatistics::default());
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("time limit".to_string())
        );
        assert!(!outcome.termination_reason().is_complete());
    }

    #[test]
    fn test_aborted_with_packing_is_feasible() {
        let outcome =
            BnbSolverOutcome::aborted(Some(packing()), "nodes", BnbSolverStatistics::default());
        assert_eq!(format!("{}", outcome.result()), "Feasible(bins=2)");
        assert_eq!(outcome.result().packing().map(|p| p.num_bins()), Some(2));
        assert!(!outcome.result().is_optimal());
    }

    #[test]
    fn test_optimal_outcome_and_parts() {
        let outcome = BnbSolverOutcome::optimal(
            packing(),
            TerminationReason::LowerBoundReached,
            BnbSolverStatistics::default(),
        );
        assert!(outcome.result().is_optimal());
        let (result, reason, _) = outcome.into_parts();
        assert_eq!(reason, TerminationReason::LowerBoundReached);
        assert_eq!(result.into_packing().unwrap().num_bins(), 2);
    }

    #[test]
    fn test_termination_reason_display() {
        assert_eq!(format!("{}", TerminationReason::Exhausted), "Search Exhausted");
        assert_eq!(
            format!("{}", TerminationReason::Aborted("x".into())),
            "Aborted: x"
        );
    }
}
