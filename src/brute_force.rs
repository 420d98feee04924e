use crate::*;

// Truth-table enumeration, used as an oracle in tests
pub(crate) fn solve_brute_force(f: &Formula) -> SatResult {
    let variables = f.variables().into_iter().collect::<Vec<_>>();
    assert!(variables.len() <= 16); // just for safety

    'search: for assignment in 0..2u32.pow(variables.len() as u32) {
        let env = variables
            .iter()
            .enumerate()
            .fold(Environment::new(), |env, (i, v)| env.put(*v, assignment & (1 << i) == 0));
        for clause in f.clauses() {
            if !env.satisfies(clause) {
                // this assignment falsifies a clause, so it's bogus
                continue 'search;
            }
        }
        // if we got here, every clause was satisfied, so we're done and satisfiable
        return SatResult::Satisfiable(env);
    }
    // no assignment is valid
    SatResult::Unsatisfiable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{n, p};
    use test_env_log::test;

    #[test]
    fn brute_force_sat() {
        let c1 = Clause::new(vec![p(0), p(1)]);
        let c2 = Clause::new(vec![n(0)]);
        let f = Formula::new(vec![c1, c2]);

        let result = solve_brute_force(&f);
        assert!(f.is_satisfied_by(result.model().unwrap()));
    }

    #[test]
    fn brute_force_unsat() {
        let c1 = Clause::new(vec![p(0), p(1)]);
        let c2 = Clause::new(vec![n(0)]);
        let c3 = Clause::new(vec![n(1)]);
        let f = Formula::new(vec![c1, c2, c3]);

        assert_eq!(solve_brute_force(&f), SatResult::Unsatisfiable);
    }

    #[test]
    fn brute_force_edge_cases() {
        assert!(solve_brute_force(&Formula::default()).is_satisfiable());
        let f = Formula::new(vec![Clause::new(vec![p(0)]), Clause::empty()]);
        assert_eq!(solve_brute_force(&f), SatResult::Unsatisfiable);
    }
}
