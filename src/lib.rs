pub mod brute_force;
pub mod corpus;
pub mod dag;
pub mod formula;
mod solver;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SatResult {
    Satisfiable,
    Unsatisfiable,
}

pub use dag::{Change, Connective, Dag, Node, NodeId, Reason, TruthValue};
pub use formula::{Formula, Valuation};
pub use solver::{DagSolver, Verdict};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute_force::solve_brute_force;
    use crate::formula::{formula_strategy, v};
    use proptest::prelude::*;
    use test_env_log::test;

    fn label_root(f: &Formula) -> (Dag, bool) {
        let mut dag = Dag::new();
        let root = dag.build(f);
        let ok = dag.label(root, TruthValue::True, 0, Reason::Triggered);
        (dag, ok)
    }

    fn value_of(dag: &Dag, name: &str) -> TruthValue {
        dag.current_value(dag.lookup(name).expect("variable should be in the DAG"))
    }

    #[test]
    fn excluded_middle() {
        let (dag, ok) = label_root(&Formula::or(v("A"), Formula::not(v("A"))));
        assert!(ok);
        assert_eq!(value_of(&dag, "A"), TruthValue::Unknown);
    }

    #[test]
    fn contradiction() {
        let (dag, ok) = label_root(&Formula::and(v("p"), Formula::not(v("p"))));
        assert!(!ok);
        assert!(dag.nodes().all(|(_, node)| node.value == TruthValue::Unknown));
    }

    #[test]
    fn propagation_is_incomplete() {
        // valid formula, but nothing below the root can be forced
        let f = Formula::eq(Formula::implies(Formula::not(v("p")), v("q")), Formula::or(v("p"), v("q")));
        let (dag, ok) = label_root(&f);
        assert!(ok);
        assert_eq!(value_of(&dag, "p"), TruthValue::Unknown);
        assert_eq!(value_of(&dag, "q"), TruthValue::Unknown);
        assert_eq!(DagSolver::new(&f).solve(), Verdict::Consistent);
    }

    #[test]
    fn blocked_antecedent() {
        // (A => B) ∧ (B => C) ∧ ¬A
        let f = Formula::and(
            Formula::and(Formula::implies(v("A"), v("B")), Formula::implies(v("B"), v("C"))),
            Formula::not(v("A")),
        );
        let (dag, ok) = label_root(&f);
        assert!(ok);
        assert_eq!(value_of(&dag, "A"), TruthValue::False);
        assert_eq!(value_of(&dag, "B"), TruthValue::Unknown);
    }

    #[test]
    fn implication_chain_contradiction() {
        // (a => b) ∧ (b => c) ∧ (c => d) ∧ (d => e) ∧ (e => ¬a) ∧ a
        let f = Formula::and_all(vec![
            Formula::implies(v("a"), v("b")),
            Formula::implies(v("b"), v("c")),
            Formula::implies(v("c"), v("d")),
            Formula::implies(v("d"), v("e")),
            Formula::implies(v("e"), Formula::not(v("a"))),
            v("a"),
        ])
        .unwrap();
        let (_, ok) = label_root(&f);
        assert!(!ok);
        assert_eq!(DagSolver::new(&f).solve(), Verdict::Contradiction);
    }

    #[test]
    fn shared_subformula_in_both_positions() {
        // (x1 ∧ x2 ∧ x3) five times over: one conjunction node under a chain of disjunctions
        let triple = || Formula::and(Formula::and(v("x1"), v("x2")), v("x3"));
        let f = Formula::or(Formula::or(Formula::or(Formula::or(triple(), triple()), triple()), triple()), triple());
        let mut solver = DagSolver::new(&f);
        assert_eq!(solver.dag().len(), 9);
        assert_ne!(solver.solve(), Verdict::Contradiction);
    }

    #[test]
    fn parsed_input_end_to_end() {
        let f: Formula = "(p | q) & (p | r) & (p | s) & (p | t) & !p".parse().unwrap();
        let mut solver = DagSolver::new(&f);
        assert_eq!(solver.solve(), Verdict::Resolved);
        let model = solver.model();
        assert_eq!(model.get("p"), Some(&false));
        for name in &["q", "r", "s", "t"] {
            assert_eq!(model.get(*name), Some(&true));
        }
    }

    proptest! {
        #[test]
        fn dag_agrees_with_brute_force_when_decisive(f in formula_strategy()) {
            let brute_force = solve_brute_force(&f);
            let verdict = DagSolver::new(&f).solve();
            log::trace!("{} : {:?} vs {:?}", f, verdict, brute_force);
            match verdict {
                Verdict::Contradiction => prop_assert_eq!(brute_force, SatResult::Unsatisfiable),
                Verdict::Resolved => prop_assert_eq!(brute_force, SatResult::Satisfiable),
                Verdict::Consistent => {}
            }
        }
    }
}
