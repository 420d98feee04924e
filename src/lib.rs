//! A DPLL satisfiability solver over immutable CNF formulas.
//!
//! Formulas, clauses and environments are persistent values: the solver never
//! mutates its input, and every simplification step produces a new clause
//! collection that shares untouched clauses with its parent.

pub mod env;
pub mod formula;
pub mod solver;

#[cfg(test)]
mod brute_force;

pub use env::Environment;
pub use formula::{Clause, Formula, Literal, Variable};
pub use solver::{SolveError, Solver, SolverConfig, SolverStats};

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    Satisfiable(Environment),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        match self {
            SatResult::Satisfiable(_) => true,
            SatResult::Unsatisfiable => false,
        }
    }

    pub fn model(&self) -> Option<&Environment> {
        match self {
            SatResult::Satisfiable(env) => Some(env),
            SatResult::Unsatisfiable => None,
        }
    }

    pub fn into_model(self) -> Option<Environment> {
        match self {
            SatResult::Satisfiable(env) => Some(env),
            SatResult::Unsatisfiable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};
    use test_env_log::test;

    #[test]
    fn result_accessors() {
        let env = Environment::new().put_true(Variable(1));
        let sat = SatResult::Satisfiable(env.clone());
        assert!(sat.is_satisfiable());
        assert_eq!(sat.model(), Some(&env));
        assert_eq!(sat.into_model(), Some(env));

        assert!(!SatResult::Unsatisfiable.is_satisfiable());
        assert_eq!(SatResult::Unsatisfiable.model(), None);
    }

    #[test]
    fn trivially_satisfiable_is_not_failure() {
        // an empty model for an empty formula must still read as success
        let result = Solver::new(Formula::default()).solve();
        assert!(result.is_satisfiable());
        assert!(result.model().unwrap().is_empty());
    }

    #[test]
    fn solve_bcp_decide_sat() {
        let c1 = Clause::new(vec![p(0), p(1)]);
        let c2 = Clause::new(vec![p(0)]);
        let f = Formula::new(vec![c1, c2]);

        let result = Solver::new(f).solve();
        assert_eq!(result.model().and_then(|env| env.get(&Variable(0))), Some(true));
    }

    #[test]
    fn solve_conflict_unsat() {
        let c1 = Clause::new(vec![p(0), p(1)]);
        let c2 = Clause::new(vec![n(0)]);
        let c3 = Clause::new(vec![n(1)]);
        let f = Formula::new(vec![c1, c2, c3]);

        assert_eq!(Solver::new(f).solve(), SatResult::Unsatisfiable);
    }
}
