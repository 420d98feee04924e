pub mod dimacs;

use crate::env::Environment;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Variable(pub usize);

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Literal {
    Positive(Variable),
    Negative(Variable),
}

impl Literal {
    pub fn new(variable: Variable, polarity: bool) -> Self {
        if polarity {
            Literal::Positive(variable)
        } else {
            Literal::Negative(variable)
        }
    }

    pub fn variable(&self) -> &Variable {
        match self {
            Literal::Positive(v) => v,
            Literal::Negative(v) => v,
        }
    }

    pub fn is_positive(&self) -> bool {
        match self {
            Literal::Positive(_) => true,
            Literal::Negative(_) => false,
        }
    }

    pub fn negated(&self) -> Self {
        match self {
            Literal::Positive(v) => Literal::Negative(*v),
            Literal::Negative(v) => Literal::Positive(*v),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Literal::Positive(Variable(x)) => write!(f, "{}", x),
            Literal::Negative(Variable(x)) => write!(f, "!{}", x),
        }
    }
}

/// A disjunction of literals.
///
/// Clauses are never modified in place: every operation that changes the
/// literal set returns a new clause. Cloning is cheap and shares storage,
/// so a clause that survives substitution unchanged costs one refcount bump.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clause {
    literals: Rc<Vec<Literal>>,
}

impl Clause {
    pub fn new(disjuncts: impl IntoIterator<Item = Literal>) -> Self {
        disjuncts.into_iter().fold(Self::empty(), |clause, literal| clause.add(literal))
    }

    pub fn empty() -> Self {
        Self {
            literals: Rc::new(vec![]),
        }
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    /// The first literal inserted into this clause, if any.
    pub fn choose_literal(&self) -> Option<&Literal> {
        self.literals.first()
    }

    /// Append `literal` unless it is already present. Clauses holding both a
    /// literal and its negation are kept as they are.
    pub fn add(mut self, literal: Literal) -> Self {
        if !self.contains(&literal) {
            Rc::make_mut(&mut self.literals).push(literal);
        }
        self
    }

    /// Drop the negation of `literal`, the clause that remains once `literal`
    /// has been made true.
    pub fn reduce(&self, literal: &Literal) -> Self {
        let negation = literal.negated();
        Self {
            literals: Rc::new(self.literals().filter(|l| **l != negation).copied().collect()),
        }
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.literals.len() != 1 {
            f.write_str("(")?;
        }
        let mut first_literal = true;
        for literal in self.literals() {
            if first_literal {
                first_literal = false;
            } else {
                f.write_str(" | ")?;
            }
            write!(f, "{}", literal)?;
        }
        if self.literals.len() != 1 {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// A conjunction of clauses, in insertion order.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Formula {
    clauses: Rc<Vec<Clause>>,
}

impl Formula {
    pub fn new(conjuncts: impl IntoIterator<Item = Clause>) -> Self {
        Self {
            clauses: Rc::new(conjuncts.into_iter().collect()),
        }
    }

    pub fn add_clause(mut self, clause: Clause) -> Self {
        Rc::make_mut(&mut self.clauses).push(clause);
        self
    }

    /// Remove the first clause equal to `clause`. Returns the formula unchanged
    /// if there is no such clause.
    pub fn remove(mut self, clause: &Clause) -> Self {
        if let Some(idx) = self.clauses.iter().position(|c| c == clause) {
            Rc::make_mut(&mut self.clauses).remove(idx);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn variables(&self) -> BTreeSet<Variable> {
        self.clauses()
            .flat_map(|clause| clause.literals().map(|literal| *literal.variable()))
            .collect()
    }

    pub fn num_variables(&self) -> usize {
        self.variables().len()
    }

    /// The clauses left after making `literal` true: clauses containing it are
    /// satisfied and dropped, clauses containing its negation lose that
    /// literal, and all others are shared with `self` untouched.
    pub fn substitute(&self, literal: &Literal) -> Formula {
        let negation = literal.negated();
        Formula::new(self.clauses().filter(|c| !c.contains(literal)).map(|clause| {
            if clause.contains(&negation) {
                clause.reduce(literal)
            } else {
                clause.clone()
            }
        }))
    }

    pub fn is_satisfied_by(&self, env: &Environment) -> bool {
        self.clauses().all(|clause| env.satisfies(clause))
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first_clause = true;
        for clause in self.clauses() {
            if first_clause {
                first_clause = false;
            } else {
                f.write_str(" & ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn p(x: usize) -> Literal {
    Literal::Positive(Variable(x))
}

#[cfg(test)]
pub(crate) fn n(x: usize) -> Literal {
    Literal::Negative(Variable(x))
}

#[cfg(test)]
pub(crate) fn formula_strategy(
    max_vars: usize,
    max_clauses: usize,
    max_clause_len: usize,
) -> impl proptest::strategy::Strategy<Value = Formula> {
    use proptest::prelude::*;

    let literal = (0..max_vars, any::<bool>()).prop_map(|(v, polarity)| Literal::new(Variable(v), polarity));
    let clause = prop::collection::vec(literal, 1..=max_clause_len).prop_map(Clause::new);
    prop::collection::vec(clause, 0..=max_clauses).prop_map(Formula::new)
}

#[cfg(test)]
pub(crate) fn formula_3sat_strategy() -> impl proptest::strategy::Strategy<Value = Formula> {
    formula_strategy(12, 50, 3)
}
