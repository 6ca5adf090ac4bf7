use crate::dag::{Dag, NodeId, Reason, TruthValue};
use crate::formula::{Formula, Valuation};
use crate::SatResult;
use log::debug;

/// Outcome of propagating a True root through the DAG.
///
/// Propagation only performs forced deductions and never case-splits, so a run without a
/// contradiction may leave nodes undetermined. `Consistent` and `Resolved` keep the two
/// situations apart; both count as satisfiable.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Verdict {
    /// A contradiction was derived: the formula is unsatisfiable.
    Contradiction,
    /// No contradiction, but some nodes are still Unknown.
    Consistent,
    /// No contradiction and every node holds a value; the variable values form a model.
    Resolved,
}

impl Verdict {
    pub fn sat_result(self) -> SatResult {
        match self {
            Verdict::Contradiction => SatResult::Unsatisfiable,
            Verdict::Consistent | Verdict::Resolved => SatResult::Satisfiable,
        }
    }
}

pub struct DagSolver {
    dag: Dag,
    root: NodeId,
}

impl DagSolver {
    pub fn new(formula: &Formula) -> Self {
        let mut dag = Dag::new();
        let root = dag.build(formula);
        Self { dag, root }
    }

    pub fn solve(&mut self) -> Verdict {
        let verdict = if !self.dag.label(self.root, TruthValue::True, 0, Reason::Triggered) {
            Verdict::Contradiction
        } else if self.dag.is_resolved() {
            Verdict::Resolved
        } else {
            Verdict::Consistent
        };
        debug!(
            "{:?} with {} of {} nodes labeled",
            verdict,
            self.dag.trail().count(),
            self.dag.len()
        );
        verdict
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    /// Variable values fixed by propagation. Complete only after a `Resolved` verdict.
    pub fn model(&self) -> Valuation {
        self.dag.model()
    }
}
