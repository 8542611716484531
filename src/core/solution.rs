//! Candidate solutions.
//!
//! A [`Solution`] carries a real-valued decision vector, the objective and
//! constraint vectors produced by evaluation, and a small attribute map used
//! to tag provenance (most importantly the index of the operator that created
//! it, see [`OPERATOR_ATTRIBUTE`]).

use std::collections::BTreeMap;

use super::problem::Evaluation;

/// Attribute key under which the producing operator index is stored.
pub const OPERATOR_ATTRIBUTE: &str = "operator";

/// Value stored in a solution's attribute map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Index(usize),
    Real(f64),
    Text(String),
}

/// A candidate solution.
///
/// Objectives are minimized. A constraint value of `0.0` means the
/// constraint is satisfied; any other value is a violation whose magnitude
/// contributes to [`constraint_violation`](Solution::constraint_violation).
///
/// Solutions are evaluated exactly once. After evaluation only the attribute
/// map may change.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    variables: Vec<f64>,
    objectives: Vec<f64>,
    constraints: Vec<f64>,
    evaluated: bool,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Solution {
    /// Creates an unevaluated solution from a decision vector.
    pub fn new(variables: Vec<f64>) -> Self {
        Self {
            variables,
            objectives: Vec::new(),
            constraints: Vec::new(),
            evaluated: false,
            attributes: BTreeMap::new(),
        }
    }

    /// Creates an already-evaluated solution.
    ///
    /// Useful when evaluation happens outside the crate, e.g. in a remote
    /// worker, and for tests.
    pub fn evaluated(variables: Vec<f64>, objectives: Vec<f64>, constraints: Vec<f64>) -> Self {
        let mut solution = Self::new(variables);
        solution.apply_evaluation(Evaluation {
            objectives,
            constraints,
        });
        solution
    }

    /// Creates an evaluated solution from objectives alone (no variables,
    /// no constraints).
    pub fn from_objectives(objectives: Vec<f64>) -> Self {
        Self::evaluated(Vec::new(), objectives, Vec::new())
    }

    /// Stores the result of evaluation.
    ///
    /// # Panics
    /// Panics if the solution was already evaluated or if `evaluation` has
    /// no objectives.
    pub fn apply_evaluation(&mut self, evaluation: Evaluation) {
        assert!(!self.evaluated, "solution evaluated twice");
        assert!(
            !evaluation.objectives.is_empty(),
            "evaluation must produce at least one objective"
        );
        self.objectives = evaluation.objectives;
        self.constraints = evaluation.constraints;
        self.evaluated = true;
    }

    /// Returns an unevaluated copy of the decision vector with no attributes.
    ///
    /// This is the starting point for every offspring.
    pub fn offspring(&self) -> Self {
        Self::new(self.variables.clone())
    }

    pub fn variables(&self) -> &[f64] {
        &self.variables
    }

    /// Mutable access to the decision vector.
    ///
    /// # Panics
    /// Panics if the solution has been evaluated.
    pub fn variables_mut(&mut self) -> &mut [f64] {
        assert!(!self.evaluated, "cannot modify an evaluated solution");
        &mut self.variables
    }

    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    pub fn constraints(&self) -> &[f64] {
        &self.constraints
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Aggregate constraint violation: the sum of absolute constraint values.
    pub fn constraint_violation(&self) -> f64 {
        self.constraints.iter().map(|c| c.abs()).sum()
    }

    /// Returns `true` if every constraint is satisfied.
    pub fn is_feasible(&self) -> bool {
        self.constraints.iter().all(|&c| c == 0.0)
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(key.into(), value);
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    /// Index of the operator that produced this solution, if tagged.
    pub fn operator_index(&self) -> Option<usize> {
        match self.attributes.get(OPERATOR_ATTRIBUTE) {
            Some(AttributeValue::Index(i)) => Some(*i),
            _ => None,
        }
    }

    /// Tags this solution with the operator that produced it.
    pub fn set_operator_index(&mut self, index: usize) {
        self.set_attribute(OPERATOR_ATTRIBUTE, AttributeValue::Index(index));
    }
}
