//! Benchmark formulas with known answers, and a side-by-side run of both strategies.

use crate::brute_force::solve_brute_force;
use crate::formula::Formula;
use crate::solver::{DagSolver, Verdict};
use crate::SatResult;
use std::time::{Duration, Instant};

pub struct Case {
    pub label: &'static str,
    pub formula: Formula,
    pub expected: SatResult,
}

#[derive(Debug)]
pub struct Comparison {
    pub truth_table: SatResult,
    pub truth_table_time: Duration,
    pub dag: Verdict,
    pub dag_time: Duration,
}

pub fn compare(case: &Case) -> Comparison {
    let start = Instant::now();
    let truth_table = solve_brute_force(&case.formula);
    let truth_table_time = start.elapsed();

    let start = Instant::now();
    let dag = DagSolver::new(&case.formula).solve();
    let dag_time = start.elapsed();

    Comparison {
        truth_table,
        truth_table_time,
        dag,
        dag_time,
    }
}

#[derive(Default, PartialEq, Eq, Debug)]
pub struct Summary {
    pub truth_table_correct: usize,
    pub truth_table_incorrect: usize,
    pub dag_correct: usize,
    pub dag_incorrect: usize,
    pub dag_faster: usize,
    pub dag_slower: usize,
}

impl Summary {
    pub fn record(&mut self, case: &Case, comparison: &Comparison) {
        if comparison.truth_table == case.expected {
            self.truth_table_correct += 1;
        } else {
            self.truth_table_incorrect += 1;
        }
        if comparison.dag.sat_result() == case.expected {
            self.dag_correct += 1;
        } else {
            self.dag_incorrect += 1;
        }
        if comparison.dag_time < comparison.truth_table_time {
            self.dag_faster += 1;
        } else if comparison.dag_time > comparison.truth_table_time {
            self.dag_slower += 1;
        }
    }
}

fn v(name: &str) -> Formula {
    Formula::var(name)
}

fn not(f: Formula) -> Formula {
    Formula::not(f)
}

fn and(l: Formula, r: Formula) -> Formula {
    Formula::and(l, r)
}

fn or(l: Formula, r: Formula) -> Formula {
    Formula::or(l, r)
}

fn imp(l: Formula, r: Formula) -> Formula {
    Formula::implies(l, r)
}

fn disj3(a: Formula, b: Formula, c: Formula) -> Formula {
    or(or(a, b), c)
}

fn conj3(a: Formula, b: Formula, c: Formula) -> Formula {
    and(and(a, b), c)
}

fn and_all(parts: Vec<Formula>) -> Formula {
    Formula::and_all(parts).expect("can't conjoin an empty list")
}

fn cnf_abc() -> Formula {
    conj3(or(v("A"), v("B")), or(not(v("A")), v("C")), or(not(v("B")), v("C")))
}

fn cnf_def() -> Formula {
    conj3(or(v("D"), v("E")), or(not(v("D")), v("F")), or(not(v("E")), v("F")))
}

fn implies_chain(a: &str, b: &str, c: &str) -> Formula {
    and(imp(v(a), v(b)), imp(v(b), v(c)))
}

fn blocked_chain(a: &str, b: &str, c: &str) -> Formula {
    and(implies_chain(a, b, c), not(v(c)))
}

fn abc_clauses() -> Vec<Formula> {
    vec![
        disj3(v("A"), v("B"), v("C")),
        disj3(not(v("A")), not(v("B")), v("C")),
        or(not(v("C")), v("A")),
    ]
}

fn def_clauses() -> Vec<Formula> {
    vec![or(v("D"), v("E")), or(not(v("D")), v("F")), or(not(v("E")), v("F"))]
}

fn ab_cd_premise() -> Vec<Formula> {
    vec![
        and(or(v("A"), v("B")), or(not(v("A")), v("C"))),
        and(or(v("B"), v("D")), or(not(v("B")), v("E"))),
    ]
}

fn xyz_uvw() -> Vec<Formula> {
    vec![
        Formula::eq(v("X"), v("Y")),
        imp(v("Y"), v("Z")),
        or(not(v("Z")), v("X")),
        imp(v("U"), v("V")),
        imp(v("V"), v("W")),
        not(v("W")),
    ]
}

pub fn cases() -> Vec<Case> {
    use crate::SatResult::*;

    let case = |label: &'static str, formula: Formula, expected: SatResult| Case {
        label,
        formula,
        expected,
    };
    let triple = || conj3(v("x1"), v("x2"), v("x3"));
    let pq = || and(v("p"), v("q"));

    vec![
        case("A or not A", or(v("A"), not(v("A"))), Satisfiable),
        case("p and not p", and(v("p"), not(v("p"))), Unsatisfiable),
        case("A implies B", imp(v("A"), v("B")), Satisfiable),
        case("(X and Y) implies X", imp(and(v("X"), v("Y")), v("X")), Satisfiable),
        case(
            "(not p => q) <=> (p or q)",
            Formula::eq(imp(not(v("p")), v("q")), or(v("p"), v("q"))),
            Satisfiable,
        ),
        case("(A or B) and (not A or C) and (not B or C)", cnf_abc(), Satisfiable),
        case("(P=>Q) and (Q=>R) and (not R)", blocked_chain("P", "Q", "R"), Satisfiable),
        case(
            "(X<=>Y) and (Y=>Z) and (not Z or X)",
            conj3(Formula::eq(v("X"), v("Y")), imp(v("Y"), v("Z")), or(not(v("Z")), v("X"))),
            Satisfiable,
        ),
        case(
            "(A or B or C) and (not A or not B or C) and (not C or A)",
            and_all(abc_clauses()),
            Satisfiable,
        ),
        case(
            "((P&Q)=>(R&S)) and (not R or not S)",
            and(imp(and(v("P"), v("Q")), and(v("R"), v("S"))), or(not(v("R")), not(v("S")))),
            Satisfiable,
        ),
        case(
            "((A or B) and (not A or C) and (not B or C)) and ((D or E) and (not D or F) and (not E or F))",
            and(cnf_abc(), cnf_def()),
            Satisfiable,
        ),
        case(
            "(P=>Q & Q=>R & not R) or (S=>T & T=>U & not U)",
            or(blocked_chain("P", "Q", "R"), blocked_chain("S", "T", "U")),
            Satisfiable,
        ),
        case(
            "(((A or B) and (not A or C)) and ((B or D) and (not B or E))) => (F and G)",
            imp(and_all(ab_cd_premise()), and(v("F"), v("G"))),
            Satisfiable,
        ),
        case(
            "(X<=>Y) & (Y=>Z) & (not Z or X) & (U=>V) & (V=>W) & (not W)",
            {
                let mut parts = xyz_uvw();
                let uvw = parts.split_off(3);
                and(and_all(parts), and_all(uvw))
            },
            Satisfiable,
        ),
        case(
            "((A or B or C) and (not A or not B or C) and (not C or A) and (D or E) and (not D or F) and (not E or F)) or G",
            or(and_all(abc_clauses().into_iter().chain(def_clauses()).collect()), v("G")),
            Satisfiable,
        ),
        case(
            "((A or B) and (not A or C) and (not B or C)) and ((D or E) and (not D or F) and (not E or F)) and ((A or B) and (not A or C) and (not B or C))",
            and(and(cnf_abc(), cnf_def()), cnf_abc()),
            Satisfiable,
        ),
        case(
            "double UNSAT disjunction",
            or(
                or(blocked_chain("P", "Q", "R"), blocked_chain("S", "T", "U")),
                blocked_chain("P", "Q", "R"),
            ),
            Satisfiable,
        ),
        case(
            "(((A or B) and (not A or C)) and ((B or D) and (not B or E)) and ((A or B) and (not A or C))) => (F and G)",
            {
                let mut premise = ab_cd_premise();
                premise.push(and(or(v("A"), v("B")), or(not(v("A")), v("C"))));
                imp(and_all(premise), and(v("F"), v("G")))
            },
            Satisfiable,
        ),
        case(
            "(X<=>Y) & (Y=>Z) & (not Z or X) & (U=>V) & (V=>W) & (not W) & (X<=>Y) & (Y=>Z)",
            {
                let mut parts = xyz_uvw();
                parts.push(Formula::eq(v("X"), v("Y")));
                parts.push(imp(v("Y"), v("Z")));
                and_all(parts)
            },
            Satisfiable,
        ),
        case(
            "((A or B or C) and (not A or not B or C) and (not C or A) and (D or E) and (not D or F) and (not E or F)) or ((A or B or C) and (not A or not B or C))",
            or(
                and_all(abc_clauses().into_iter().chain(def_clauses()).collect()),
                and_all(abc_clauses().into_iter().take(2).collect()),
            ),
            Satisfiable,
        ),
        case(
            "((p and q) => r) and ((p and q) => s) and ((p and q) => t) and (p and q)",
            and_all(vec![imp(pq(), v("r")), imp(pq(), v("s")), imp(pq(), v("t")), pq()]),
            Satisfiable,
        ),
        case(
            "(a => b) and (b => c) and (c => d) and (d => e) and (e => not a) and a",
            and_all(vec![
                imp(v("a"), v("b")),
                imp(v("b"), v("c")),
                imp(v("c"), v("d")),
                imp(v("d"), v("e")),
                imp(v("e"), not(v("a"))),
                v("a"),
            ]),
            Unsatisfiable,
        ),
        case(
            "(x1 and x2 and x3) repeated disjunction",
            or(or(or(or(triple(), triple()), triple()), triple()), triple()),
            Satisfiable,
        ),
        case(
            "(p or q) and (p or r) and (p or s) and (p or t) and not p",
            and_all(vec![
                or(v("p"), v("q")),
                or(v("p"), v("r")),
                or(v("p"), v("s")),
                or(v("p"), v("t")),
                not(v("p")),
            ]),
            Satisfiable,
        ),
    ]
}
