//! Shared DAG over a formula. Structurally equivalent subformulas (same canonical signature)
//! are merged into a single node that keeps a back-edge to every node using it.

mod propagate;

use crate::formula::{binary_signature, negated_signature, Formula, Valuation};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(usize);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Connective {
    Variable,
    Not(NodeId),
    And(NodeId, NodeId),
    Or(NodeId, NodeId),
    Implies(NodeId, NodeId),
    Eq(NodeId, NodeId),
}

impl Connective {
    /// Children in operand order. Implies and Eq are directional here even though the Eq
    /// signature is not.
    pub fn children(self) -> Vec<NodeId> {
        match self {
            Connective::Variable => vec![],
            Connective::Not(a) => vec![a],
            Connective::And(a, b) | Connective::Or(a, b) | Connective::Implies(a, b) | Connective::Eq(a, b) => {
                vec![a, b]
            }
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Connective::Variable => "",
            Connective::Not(_) => "NOT",
            Connective::And(..) => "AND",
            Connective::Or(..) => "OR",
            Connective::Implies(..) => "IMP",
            Connective::Eq(..) => "EQ",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TruthValue {
    Unknown,
    True,
    False,
}

impl TruthValue {
    pub fn is_known(self) -> bool {
        self != TruthValue::Unknown
    }

    /// The opposite terminal value; Unknown stays Unknown.
    pub fn negated(self) -> Self {
        match self {
            TruthValue::True => TruthValue::False,
            TruthValue::False => TruthValue::True,
            TruthValue::Unknown => TruthValue::Unknown,
        }
    }

    // Kleene's strong three-valued connectives. A known result is one no later assignment of
    // the Unknown operands could change.

    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (TruthValue::False, _) | (_, TruthValue::False) => TruthValue::False,
            (TruthValue::True, TruthValue::True) => TruthValue::True,
            _ => TruthValue::Unknown,
        }
    }

    pub fn or(self, other: Self) -> Self {
        self.negated().and(other.negated()).negated()
    }

    pub fn implies(self, other: Self) -> Self {
        self.negated().or(other)
    }

    pub fn iff(self, other: Self) -> Self {
        match (self, other) {
            (TruthValue::Unknown, _) | (_, TruthValue::Unknown) => TruthValue::Unknown,
            (a, b) => TruthValue::from(a == b),
        }
    }
}

impl From<bool> for TruthValue {
    fn from(b: bool) -> Self {
        if b {
            TruthValue::True
        } else {
            TruthValue::False
        }
    }
}

impl fmt::Display for TruthValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TruthValue::Unknown => "?",
            TruthValue::True => "T",
            TruthValue::False => "F",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reason {
    /// Forced by propagation, or the initial hypothesis on a root.
    Triggered,
    Conflict,
}

/// Record of a node's most recent successful transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Change {
    pub old_value: TruthValue,
    pub level: usize,
    pub reason: Reason,
}

impl Default for Change {
    fn default() -> Self {
        Change {
            old_value: TruthValue::Unknown,
            level: 0,
            reason: Reason::Triggered,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub connective: Connective,
    /// Only set for variables.
    pub name: Option<String>,
    pub signature: String,
    pub parents: Vec<NodeId>,
    pub value: TruthValue,
    pub last_change: Change,
}

impl Node {
    pub fn children(&self) -> Vec<NodeId> {
        self.connective.children()
    }
}

/// One trail entry: the node assigned and the change record it held before.
#[derive(Clone, Copy, Debug)]
struct Saved {
    node: NodeId,
    change: Change,
}

/// A single build-and-solve session. Nodes are only ever added, never removed, and all of
/// them are released together with the `Dag`.
#[derive(Default, Debug)]
pub struct Dag {
    nodes: Vec<Node>,
    signatures: HashMap<String, NodeId>,
    trail: Vec<Saved>,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds `formula` into the DAG, reusing any node already registered under the same
    /// signature in this session, and returns its root.
    pub fn build(&mut self, formula: &Formula) -> NodeId {
        let before = self.nodes.len();
        let (root, _) = self.build_node(formula);
        debug!(
            "built {} into {} ({} new nodes, {} total)",
            formula,
            root.0,
            self.nodes.len() - before,
            self.nodes.len()
        );
        root
    }

    // Returns the node and its signature. Children are resolved (and their signatures known)
    // before this node is registered, so no node can ever be its own descendant.
    fn build_node(&mut self, formula: &Formula) -> (NodeId, String) {
        let (connective, name, signature) = match formula {
            Formula::Var(name) => (Connective::Variable, Some(name.clone()), name.clone()),
            Formula::Not(operand) => {
                let (a, sig) = self.build_node(operand);
                (Connective::Not(a), None, negated_signature(&sig))
            }
            Formula::And(l, r) => {
                let (a, b, sig) = self.build_pair(l, r, "AND", true);
                (Connective::And(a, b), None, sig)
            }
            Formula::Or(l, r) => {
                let (a, b, sig) = self.build_pair(l, r, "OR", true);
                (Connective::Or(a, b), None, sig)
            }
            Formula::Implies(l, r) => {
                let (a, b, sig) = self.build_pair(l, r, "IMP", false);
                (Connective::Implies(a, b), None, sig)
            }
            Formula::Eq(l, r) => {
                let (a, b, sig) = self.build_pair(l, r, "EQ", true);
                (Connective::Eq(a, b), None, sig)
            }
        };

        if let Some(&existing) = self.signatures.get(&signature) {
            return (existing, signature);
        }

        let id = NodeId(self.nodes.len());
        for child in connective.children() {
            self.nodes[child.0].parents.push(id);
        }
        self.nodes.push(Node {
            connective,
            name,
            signature: signature.clone(),
            parents: vec![],
            value: TruthValue::Unknown,
            last_change: Change::default(),
        });
        self.signatures.insert(signature.clone(), id);
        (id, signature)
    }

    fn build_pair(&mut self, l: &Formula, r: &Formula, op: &str, commutative: bool) -> (NodeId, NodeId, String) {
        let (a, lhs) = self.build_node(l);
        let (b, rhs) = self.build_node(r);
        (a, b, binary_signature(op, &lhs, &rhs, commutative))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }

    /// Looks up the node registered under `signature`, if any.
    pub fn lookup(&self, signature: &str) -> Option<NodeId> {
        self.signatures.get(signature).copied()
    }

    pub fn signature(&self, id: NodeId) -> &str {
        &self.nodes[id.0].signature
    }

    pub fn current_value(&self, id: NodeId) -> TruthValue {
        self.nodes[id.0].value
    }

    /// Every node holds a terminal value.
    pub fn is_resolved(&self) -> bool {
        self.nodes.iter().all(|node| node.value.is_known())
    }

    /// Values of the variables that propagation has determined.
    pub fn model(&self) -> Valuation {
        self.nodes
            .iter()
            .filter_map(|node| match (&node.name, node.value) {
                (Some(name), TruthValue::True) => Some((name.clone(), true)),
                (Some(name), TruthValue::False) => Some((name.clone(), false)),
                _ => None,
            })
            .collect()
    }

    /// Successful assignments of this session, oldest first, with the level each was made at.
    pub fn trail(&self) -> impl Iterator<Item = (NodeId, TruthValue, usize)> + '_ {
        self.trail.iter().map(move |saved| {
            let node = &self.nodes[saved.node.0];
            (saved.node, node.value, node.last_change.level)
        })
    }

    /// Operator-prefix rendering of the subgraph under `id`, e.g. `AND(p,NOT(p))`. Operands
    /// appear in child order, not signature order.
    pub fn render(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        match node.connective {
            Connective::Variable => node.name.clone().unwrap_or_default(),
            Connective::Not(a) => format!("NOT({})", self.render(a)),
            c => {
                let children = c.children();
                format!("{}({},{})", c.symbol(), self.render(children[0]), self.render(children[1]))
            }
        }
    }

    /// Writes the DAG in Graphviz format. Edges point from a node to its children; doubled
    /// outlines mark nodes with more than one parent.
    pub fn write_dot<W: Write>(&self, mut f: W) -> io::Result<()> {
        writeln!(f, "digraph dag {{")?;
        for (id, node) in self.nodes() {
            let label = match &node.name {
                Some(name) => name.clone(),
                None => node.connective.symbol().to_string(),
            };
            let color = match node.value {
                TruthValue::True => "green",
                TruthValue::False => "red",
                TruthValue::Unknown => "black",
            };
            let style = if node.parents.len() > 1 { ",peripheries=2" } else { "" };
            writeln!(
                f,
                "  n{} [label=\"{}={}@{}\",color={}{}];",
                id.0, label, node.value, node.last_change.level, color, style
            )?;
            for (i, child) in node.children().into_iter().enumerate() {
                writeln!(f, "  n{} -> n{} [label=\"{}\"];", id.0, child.0, i)?;
            }
        }
        writeln!(f, "}}")?;
        Ok(())
    }
}
