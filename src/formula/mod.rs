pub mod parse;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

/// Assignment of truth values to variable names.
pub type Valuation = BTreeMap<String, bool>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Formula {
    Var(String),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Implies(Box<Formula>, Box<Formula>),
    Eq(Box<Formula>, Box<Formula>),
}

impl Formula {
    /// `name` should be an identifier (`[A-Za-z_][A-Za-z0-9_]*`), as the parser accepts. Any
    /// other name can collide with a compound signature such as `AND(p,q)`.
    pub fn var(name: impl Into<String>) -> Self {
        Formula::Var(name.into())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Formula) -> Self {
        Formula::Not(Box::new(operand))
    }

    pub fn and(lhs: Formula, rhs: Formula) -> Self {
        Formula::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Formula, rhs: Formula) -> Self {
        Formula::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn implies(lhs: Formula, rhs: Formula) -> Self {
        Formula::Implies(Box::new(lhs), Box::new(rhs))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn eq(lhs: Formula, rhs: Formula) -> Self {
        Formula::Eq(Box::new(lhs), Box::new(rhs))
    }

    /// Left-nested conjunction of every part, `None` for an empty list.
    pub fn and_all(parts: impl IntoIterator<Item = Formula>) -> Option<Self> {
        parts.into_iter().fold(None, |acc, part| match acc {
            None => Some(part),
            Some(acc) => Some(Formula::and(acc, part)),
        })
    }

    /// Canonical structural encoding. And, Or and Eq emit their operand signatures in sorted
    /// order so that `a ∧ b` and `b ∧ a` share a signature; implication keeps its direction.
    pub fn signature(&self) -> String {
        match self {
            Formula::Var(name) => name.clone(),
            Formula::Not(operand) => negated_signature(&operand.signature()),
            Formula::And(l, r) => binary_signature("AND", &l.signature(), &r.signature(), true),
            Formula::Or(l, r) => binary_signature("OR", &l.signature(), &r.signature(), true),
            Formula::Implies(l, r) => binary_signature("IMP", &l.signature(), &r.signature(), false),
            Formula::Eq(l, r) => binary_signature("EQ", &l.signature(), &r.signature(), true),
        }
    }

    pub fn variables(&self) -> BTreeSet<String> {
        let mut variables = BTreeSet::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, into: &mut BTreeSet<String>) {
        match self {
            Formula::Var(name) => {
                into.insert(name.clone());
            }
            Formula::Not(operand) => operand.collect_variables(into),
            Formula::And(l, r) | Formula::Or(l, r) | Formula::Implies(l, r) | Formula::Eq(l, r) => {
                l.collect_variables(into);
                r.collect_variables(into);
            }
        }
    }

    /// Evaluates under `valuation`; variables it doesn't mention are false.
    pub fn eval(&self, valuation: &Valuation) -> bool {
        match self {
            Formula::Var(name) => valuation.get(name).copied().unwrap_or(false),
            Formula::Not(operand) => !operand.eval(valuation),
            Formula::And(l, r) => l.eval(valuation) && r.eval(valuation),
            Formula::Or(l, r) => l.eval(valuation) || r.eval(valuation),
            Formula::Implies(l, r) => !l.eval(valuation) || r.eval(valuation),
            Formula::Eq(l, r) => l.eval(valuation) == r.eval(valuation),
        }
    }
}

pub(crate) fn negated_signature(operand: &str) -> String {
    format!("NOT({})", operand)
}

pub(crate) fn binary_signature(op: &str, lhs: &str, rhs: &str, commutative: bool) -> String {
    if commutative && rhs < lhs {
        format!("{}({},{})", op, rhs, lhs)
    } else {
        format!("{}({},{})", op, lhs, rhs)
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Formula::Var(name) => f.write_str(name),
            Formula::Not(operand) => write!(f, "¬{}", operand),
            Formula::And(l, r) => write!(f, "({} ∧ {})", l, r),
            Formula::Or(l, r) => write!(f, "({} ∨ {})", l, r),
            Formula::Implies(l, r) => write!(f, "({} => {})", l, r),
            Formula::Eq(l, r) => write!(f, "({} <=> {})", l, r),
        }
    }
}

#[cfg(test)]
pub(crate) fn v(name: &str) -> Formula {
    Formula::var(name)
}

#[cfg(test)]
pub(crate) fn formula_strategy() -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    let leaf = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(|name| Formula::var(name));
    leaf.prop_recursive(5, 48, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Formula::not),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::or(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Formula::implies(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| Formula::eq(l, r)),
        ]
    })
}
