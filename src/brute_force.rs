use crate::formula::{Formula, Valuation};
use crate::SatResult;

/// Truth-table baseline: tries every valuation of the formula's variables.
pub fn solve_brute_force(f: &Formula) -> SatResult {
    match find_model(f) {
        Some(_) => SatResult::Satisfiable,
        None => SatResult::Unsatisfiable,
    }
}

/// First satisfying valuation in depth-first order, each variable tried true before false.
pub fn find_model(f: &Formula) -> Option<Valuation> {
    let variables: Vec<String> = f.variables().into_iter().collect();
    let mut valuation = Valuation::new();
    if extend(f, &variables, &mut valuation) {
        Some(valuation)
    } else {
        None
    }
}

fn extend(f: &Formula, unassigned: &[String], valuation: &mut Valuation) -> bool {
    let (variable, rest) = match unassigned.split_first() {
        Some(split) => split,
        None => return f.eval(valuation),
    };
    for &value in &[true, false] {
        valuation.insert(variable.clone(), value);
        if extend(f, rest, valuation) {
            return true;
        }
    }
    valuation.remove(variable);
    false
}
