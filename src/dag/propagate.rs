//! Labeling state machine. Each node moves at most once from Unknown to a terminal value;
//! every successful move is pushed on the trail, which is what a failing label unwinds.

use super::{Change, Connective, Dag, NodeId, Reason, Saved, TruthValue};
use log::{debug, trace};

impl Dag {
    /// Tries to give `id` the terminal value `value`, propagating the consequences through the
    /// whole reachable DAG. Returns false on a contradiction, in which case every node is left
    /// exactly as it was before the call. `Unknown` is not a label and is refused the same way.
    pub fn label(&mut self, id: NodeId, value: TruthValue, level: usize, reason: Reason) -> bool {
        if !value.is_known() {
            debug!("refusing to label node {} with {} at level {}", id.0, value, level);
            return false;
        }

        let current = self.nodes[id.0].value;
        if current == value {
            return true;
        }
        if current.is_known() {
            debug!("conflict: node {} is {} but {} was forced at level {}", id.0, current, value, level);
            return false;
        }

        trace!("{:?} node {} := {} at level {}", reason, id.0, value, level);
        let mark = self.trail.len();
        let node = &mut self.nodes[id.0];
        self.trail.push(Saved {
            node: id,
            change: node.last_change,
        });
        node.last_change = Change {
            old_value: current,
            level,
            reason,
        };
        node.value = value;

        if !self.propagate_children(id, level) || !self.propagate_parents(id, level) {
            self.undo(mark);
            return false;
        }
        true
    }

    fn force(&mut self, id: NodeId, value: TruthValue, level: usize) -> bool {
        self.label(id, value, level, Reason::Triggered)
    }

    /// Downward rules: what the value of `id` says about its children.
    fn propagate_children(&mut self, id: NodeId, level: usize) -> bool {
        use crate::dag::TruthValue::*;

        let value = self.nodes[id.0].value;
        let next = level + 1;
        match (self.nodes[id.0].connective, value) {
            (_, Unknown) | (Connective::Variable, _) => true,
            (Connective::Not(a), v) => self.force(a, v.negated(), next),
            (Connective::And(a, b), True) => self.force(a, True, next) && self.force(b, True, next),
            (Connective::And(a, b), False) => self.force_last_unknown(a, b, True, False, next),
            (Connective::Or(a, b), False) => self.force(a, False, next) && self.force(b, False, next),
            (Connective::Or(a, b), True) => self.force_last_unknown(a, b, False, True, next),
            (Connective::Implies(a, b), False) => self.force(a, True, next) && self.force(b, False, next),
            (Connective::Implies(a, b), True) => {
                if self.current_value(a) == True && !self.force(b, True, next) {
                    return false;
                }
                if self.current_value(b) == False && !self.force(a, False, next) {
                    return false;
                }
                true
            }
            (Connective::Eq(a, b), v) => {
                // True mirrors a known side onto the other, False mirrors its negation
                let relate = |side: TruthValue| if v == True { side } else { side.negated() };
                let left = self.current_value(a);
                if left.is_known() && !self.force(b, relate(left), next) {
                    return false;
                }
                let right = self.current_value(b);
                if right.is_known() && !self.force(a, relate(right), next) {
                    return false;
                }
                true
            }
        }
    }

    /// Unit rule shared by And=False and Or=True: when exactly one distinct child is still
    /// Unknown and every known child holds `others`, that child must be `forced`.
    fn force_last_unknown(
        &mut self,
        a: NodeId,
        b: NodeId,
        others: TruthValue,
        forced: TruthValue,
        level: usize,
    ) -> bool {
        let (va, vb) = (self.current_value(a), self.current_value(b));
        let target = match (va, vb) {
            (TruthValue::Unknown, TruthValue::Unknown) if a == b => a,
            (TruthValue::Unknown, v) if v == others => a,
            (v, TruthValue::Unknown) if v == others => b,
            _ => return true,
        };
        self.force(target, forced, level)
    }

    /// Upward rules: for every parent, label it with whatever its children now determine,
    /// then let a parent that already had a value re-apply its downward rules to the
    /// changed neighborhood.
    fn propagate_parents(&mut self, id: NodeId, level: usize) -> bool {
        let next = level + 1;
        for i in 0..self.nodes[id.0].parents.len() {
            let parent = self.nodes[id.0].parents[i];
            let held = self.current_value(parent);

            let derived = self.evaluate(parent);
            if derived.is_known() && !self.force(parent, derived, next) {
                return false;
            }
            if held.is_known() && !self.propagate_children(parent, next) {
                return false;
            }
        }
        true
    }

    /// Three-valued value of `id` computed from its children alone.
    fn evaluate(&self, id: NodeId) -> TruthValue {
        let value = |n: NodeId| self.current_value(n);
        match self.nodes[id.0].connective {
            Connective::Variable => TruthValue::Unknown,
            Connective::Not(a) => value(a).negated(),
            Connective::And(a, b) => value(a).and(value(b)),
            Connective::Or(a, b) => value(a).or(value(b)),
            Connective::Implies(a, b) => value(a).implies(value(b)),
            Connective::Eq(a, b) => value(a).iff(value(b)),
        }
    }

    /// Reverts every assignment made since the trail had length `mark`, newest first.
    fn undo(&mut self, mark: usize) {
        let dropped = self.trail.split_off(mark);
        for saved in dropped.iter().rev() {
            let node = &mut self.nodes[saved.node.0];
            trace!("undo node {} ({} -> {})", saved.node.0, node.value, node.last_change.old_value);
            node.value = node.last_change.old_value;
            node.last_change = saved.change;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{formula_strategy, v, Formula};
    use crate::dag::TruthValue::*;
    use proptest::prelude::*;
    use test_env_log::test;

    fn built(f: &Formula) -> (Dag, NodeId) {
        let mut dag = Dag::new();
        let root = dag.build(f);
        (dag, root)
    }

    fn values(dag: &Dag) -> Vec<(TruthValue, Change)> {
        dag.nodes().map(|(_, node)| (node.value, node.last_change)).collect()
    }

    fn value_of(dag: &Dag, signature: &str) -> TruthValue {
        dag.current_value(dag.lookup(signature).expect("signature should be registered"))
    }

    #[test]
    fn label_is_idempotent() {
        let (mut dag, p) = built(&v("p"));
        assert!(dag.label(p, True, 0, Reason::Triggered));
        let before = values(&dag);
        assert!(dag.label(p, True, 7, Reason::Conflict));
        assert_eq!(values(&dag), before);
        assert_eq!(dag.node(p).last_change.level, 0);
    }

    #[test]
    fn unknown_is_refused() {
        let (mut dag, root) = built(&Formula::and(v("p"), v("q")));
        let before = values(&dag);
        assert!(!dag.label(root, Unknown, 0, Reason::Triggered));
        assert_eq!(values(&dag), before);

        assert!(dag.label(root, True, 0, Reason::Triggered));
        let before = values(&dag);
        assert!(!dag.label(root, Unknown, 1, Reason::Triggered));
        assert_eq!(values(&dag), before);
        assert_eq!(dag.trail().count(), 3);
    }

    #[test]
    fn label_is_monotonic() {
        let (mut dag, p) = built(&v("p"));
        assert!(dag.label(p, False, 0, Reason::Triggered));
        assert!(!dag.label(p, True, 0, Reason::Triggered));
        assert_eq!(dag.current_value(p), False);
    }

    #[test]
    fn change_record() {
        let (mut dag, root) = built(&Formula::not(v("p")));
        assert!(dag.label(root, False, 3, Reason::Conflict));
        assert_eq!(
            dag.node(root).last_change,
            Change {
                old_value: Unknown,
                level: 3,
                reason: Reason::Conflict
            }
        );
        let p = dag.lookup("p").unwrap();
        assert_eq!(dag.current_value(p), True);
        assert_eq!(
            dag.node(p).last_change,
            Change {
                old_value: Unknown,
                level: 4,
                reason: Reason::Triggered
            }
        );
        assert_eq!(dag.trail().collect::<Vec<_>>(), vec![(root, False, 3), (p, True, 4)]);
    }

    #[test]
    fn contradiction_is_rolled_back() {
        // p ∧ ¬p
        let (mut dag, root) = built(&Formula::and(v("p"), Formula::not(v("p"))));
        let before = values(&dag);
        assert!(!dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(values(&dag), before);
        assert_eq!(dag.trail().count(), 0);
    }

    #[test]
    fn and_downward() {
        let (mut dag, root) = built(&Formula::and(v("a"), v("b")));
        assert!(dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "a"), True);
        assert_eq!(value_of(&dag, "b"), True);

        let (mut dag, root) = built(&Formula::and(v("a"), v("b")));
        let a = dag.lookup("a").unwrap();
        assert!(dag.label(a, True, 0, Reason::Triggered));
        assert!(dag.label(root, False, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "b"), False);
    }

    #[test]
    fn and_false_with_false_sibling_forces_nothing() {
        let (mut dag, root) = built(&Formula::and(v("a"), v("b")));
        let a = dag.lookup("a").unwrap();
        assert!(dag.label(a, False, 0, Reason::Triggered));
        assert_eq!(dag.current_value(root), False);
        assert_eq!(value_of(&dag, "b"), Unknown);
    }

    #[test]
    fn repeated_operand_counts_once() {
        let (mut dag, root) = built(&Formula::and(v("p"), v("p")));
        assert!(dag.label(root, False, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "p"), False);

        let (mut dag, root) = built(&Formula::or(v("p"), v("p")));
        assert!(dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "p"), True);
    }

    #[test]
    fn or_downward() {
        let (mut dag, root) = built(&Formula::or(v("a"), v("b")));
        assert!(dag.label(root, False, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "a"), False);
        assert_eq!(value_of(&dag, "b"), False);

        let (mut dag, root) = built(&Formula::or(v("a"), v("b")));
        assert!(dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "a"), Unknown);
        let b = dag.lookup("b").unwrap();
        assert!(dag.label(b, False, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "a"), True);
    }

    #[test]
    fn implies_downward() {
        let (mut dag, root) = built(&Formula::implies(v("a"), v("b")));
        assert!(dag.label(root, False, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "a"), True);
        assert_eq!(value_of(&dag, "b"), False);

        // modus tollens
        let (mut dag, root) = built(&Formula::implies(v("a"), v("b")));
        let b = dag.lookup("b").unwrap();
        assert!(dag.label(b, False, 0, Reason::Triggered));
        assert!(dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "a"), False);
    }

    #[test]
    fn implies_upward() {
        let (mut dag, root) = built(&Formula::implies(v("a"), v("b")));
        let a = dag.lookup("a").unwrap();
        assert!(dag.label(a, False, 0, Reason::Triggered));
        assert_eq!(dag.current_value(root), True);

        let (mut dag, root) = built(&Formula::implies(v("a"), v("b")));
        let (a, b) = (dag.lookup("a").unwrap(), dag.lookup("b").unwrap());
        assert!(dag.label(a, True, 0, Reason::Triggered));
        assert_eq!(dag.current_value(root), Unknown);
        assert!(dag.label(b, False, 0, Reason::Triggered));
        assert_eq!(dag.current_value(root), False);
    }

    #[test]
    fn eq_mirrors_known_side() {
        let (mut dag, root) = built(&Formula::eq(v("a"), v("b")));
        let a = dag.lookup("a").unwrap();
        assert!(dag.label(a, True, 0, Reason::Triggered));
        assert!(dag.label(root, False, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "b"), False);

        let (mut dag, root) = built(&Formula::eq(v("a"), v("b")));
        let b = dag.lookup("b").unwrap();
        assert!(dag.label(b, False, 0, Reason::Triggered));
        assert!(dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "a"), False);
    }

    #[test]
    fn eq_upward() {
        let (mut dag, root) = built(&Formula::eq(v("a"), v("b")));
        let (a, b) = (dag.lookup("a").unwrap(), dag.lookup("b").unwrap());
        assert!(dag.label(a, False, 0, Reason::Triggered));
        assert_eq!(dag.current_value(root), Unknown);
        assert!(dag.label(b, False, 0, Reason::Triggered));
        assert_eq!(dag.current_value(root), True);
    }

    #[test]
    fn known_parent_reapplies_downward_rules() {
        // a ∧ (a => b): the implication is already True when a arrives
        let f = Formula::and(Formula::implies(v("a"), v("b")), v("a"));
        let (mut dag, root) = built(&f);
        assert!(dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "b"), True);
        assert!(dag.is_resolved());
    }

    #[test]
    fn levels_increase_along_propagation() {
        // ¬¬¬p
        let (mut dag, root) = built(&Formula::not(Formula::not(Formula::not(v("p")))));
        assert!(dag.label(root, True, 0, Reason::Triggered));
        assert_eq!(value_of(&dag, "p"), False);
        let levels: Vec<_> = dag.trail().map(|(_, _, level)| level).collect();
        assert_eq!(levels, vec![0, 1, 2, 3]);
    }

    #[test]
    fn failed_label_leaves_earlier_assignments() {
        let (mut dag, root) = built(&Formula::and(v("p"), Formula::not(v("q"))));
        let p = dag.lookup("p").unwrap();
        assert!(dag.label(p, True, 0, Reason::Triggered));
        assert!(dag.label(root, False, 0, Reason::Triggered));
        // p is True and the conjunction False, so ¬q is False and q True
        assert_eq!(value_of(&dag, "q"), True);
        let before = values(&dag);
        assert!(!dag.label(p, False, 0, Reason::Triggered));
        assert_eq!(values(&dag), before);
    }

    proptest! {
        #[test]
        fn failed_label_restores_everything(f in formula_strategy(), root_value in any::<bool>()) {
            let (mut dag, root) = built(&f);
            let before = values(&dag);
            if !dag.label(root, TruthValue::from(root_value), 0, Reason::Triggered) {
                prop_assert_eq!(values(&dag), before);
            }
        }

        #[test]
        fn labels_agree_with_children(f in formula_strategy()) {
            let (mut dag, root) = built(&f);
            if dag.label(root, True, 0, Reason::Triggered) {
                // wherever the children determine a node, the node holds that value
                for (id, node) in dag.nodes() {
                    let derived = dag.evaluate(id);
                    if derived.is_known() {
                        prop_assert_eq!(node.value, derived);
                    }
                }
            }
        }
    }
}
