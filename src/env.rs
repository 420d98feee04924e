use crate::formula::{Clause, Literal, Variable};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// A partial assignment of variables to boolean values.
///
/// Environments are persistent: `put` and friends return a new environment
/// and leave the receiver untouched. The map is copied only when it is
/// shared, so threading a uniquely owned environment back up the search
/// never copies.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Environment {
    bindings: Rc<BTreeMap<Variable, bool>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(mut self, variable: Variable, value: bool) -> Self {
        Rc::make_mut(&mut self.bindings).insert(variable, value);
        self
    }

    pub fn put_true(self, variable: Variable) -> Self {
        self.put(variable, true)
    }

    pub fn put_false(self, variable: Variable) -> Self {
        self.put(variable, false)
    }

    /// Bind the literal's variable so that the literal evaluates to true.
    pub fn bind(self, literal: &Literal) -> Self {
        self.put(*literal.variable(), literal.is_positive())
    }

    pub fn get(&self, variable: &Variable) -> Option<bool> {
        self.bindings.get(variable).copied()
    }

    /// The value of `literal` under this environment, or `None` if its
    /// variable is unbound.
    pub fn value_of(&self, literal: &Literal) -> Option<bool> {
        self.get(literal.variable()).map(|value| value == literal.is_positive())
    }

    pub fn satisfies(&self, clause: &Clause) -> bool {
        clause.literals().any(|literal| self.value_of(literal) == Some(true))
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.bindings.iter().map(|(v, b)| (*v, *b))
    }

    pub fn bindings(&self) -> &BTreeMap<Variable, bool> {
        &self.bindings
    }
}

/// Prints the assignment as DIMACS literals, e.g. `1 -2 3`.
impl Display for Environment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;
        for (variable, value) in self.iter() {
            if first {
                first = false;
            } else {
                f.write_str(" ")?;
            }
            if !value {
                f.write_str("-")?;
            }
            write!(f, "{}", variable)?;
        }
        Ok(())
    }
}
