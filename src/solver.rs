use crate::env::Environment;
use crate::formula::{Formula, Literal};
use crate::SatResult;
use log::{debug, trace};
use std::convert::Infallible;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Give up once this much time has passed. Only honored by
    /// [`Solver::solve_bounded`].
    pub timeout: Option<Duration>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub decisions: u64,
    pub propagations: u64,
    pub conflicts: u64,
    pub backtracks: u64,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    Timeout { elapsed: Duration },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveError::Timeout { elapsed } => write!(f, "gave up after {:.3}s", elapsed.as_secs_f64()),
        }
    }
}

impl std::error::Error for SolveError {}

/// What the scan over a clause collection decided to do next.
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    /// No clauses left, every constraint holds.
    Satisfied,
    /// Some clause was reduced to nothing.
    Conflict,
    /// The smallest clause has one literal, which must be true.
    Unit(Literal),
    /// The smallest clause has several literals; branch on the first one.
    Branch(Literal),
}

/// One level of the search. `decision` is the literal currently assumed true
/// below it. Branch levels also keep the literal still to try if that
/// assumption fails, together with the collection to substitute it into;
/// unit levels have nothing to retry and keep nothing.
struct Frame {
    decision: Literal,
    alternative: Option<(Literal, Formula)>,
}

pub struct Solver {
    formula: Formula,
    config: SolverConfig,
    stats: SolverStats,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        Self::with_config(formula, SolverConfig::default())
    }

    pub fn with_config(formula: Formula, config: SolverConfig) -> Self {
        Self {
            formula,
            config,
            stats: SolverStats::default(),
        }
    }

    pub fn stats(&self) -> &SolverStats {
        &self.stats
    }

    pub fn solve(&mut self) -> SatResult {
        let formula = self.formula.clone();
        self.search(&formula, Environment::new())
    }

    /// Like [`Solver::solve`], but stops with [`SolveError::Timeout`] once the
    /// configured timeout has passed.
    pub fn solve_bounded(&mut self) -> Result<SatResult, SolveError> {
        let started = Instant::now();
        let formula = self.formula.clone();
        match self.config.timeout.and_then(|timeout| started.checked_add(timeout)) {
            None => Ok(self.search(&formula, Environment::new())),
            Some(deadline) => {
                let result = self.run(&formula, Environment::new(), || {
                    if Instant::now() >= deadline {
                        Err(SolveError::Timeout {
                            elapsed: started.elapsed(),
                        })
                    } else {
                        Ok(())
                    }
                });
                if let Err(e) = &result {
                    debug!("{}: {:?}", e, self.stats);
                }
                result
            }
        }
    }

    /// Search for an extension of `env` that satisfies every clause of
    /// `clauses`. The returned environment contains `env`'s bindings plus one
    /// binding per literal committed on the successful path.
    pub fn search(&mut self, clauses: &Formula, env: Environment) -> SatResult {
        match self.run(clauses, env, || Ok::<(), Infallible>(())) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// The search loop. `interrupt` runs once per visited node; an `Err` from
    /// it abandons the search.
    fn run<E>(
        &mut self,
        clauses: &Formula,
        env: Environment,
        mut interrupt: impl FnMut() -> Result<(), E>,
    ) -> Result<SatResult, E> {
        self.stats = SolverStats::default();
        let mut trail: Vec<Frame> = vec![];
        let mut current = clauses.clone();

        let result = loop {
            interrupt()?;

            match select(&current) {
                Selection::Satisfied => {
                    // Innermost commitments first, the same order a recursive
                    // search would bind them on the way back up.
                    let env = trail.iter().rev().fold(env, |env, frame| env.bind(&frame.decision));
                    break SatResult::Satisfiable(env);
                }
                Selection::Conflict => {
                    self.stats.conflicts += 1;
                    match self.backtrack(&mut trail) {
                        Some(next) => current = next,
                        None => break SatResult::Unsatisfiable,
                    }
                }
                Selection::Unit(literal) => {
                    self.stats.propagations += 1;
                    trace!("unit {} at depth {}", literal, trail.len());
                    let next = current.substitute(&literal);
                    trail.push(Frame {
                        decision: literal,
                        alternative: None,
                    });
                    current = next;
                }
                Selection::Branch(literal) => {
                    self.stats.decisions += 1;
                    trace!("decide {} at depth {}", literal, trail.len());
                    let next = current.substitute(&literal);
                    trail.push(Frame {
                        decision: literal,
                        alternative: Some((literal.negated(), current)),
                    });
                    current = next;
                }
            }
            self.stats.max_depth = self.stats.max_depth.max(trail.len());
        };

        debug!(
            "search finished ({}): {:?}",
            if result.is_satisfiable() { "sat" } else { "unsat" },
            self.stats
        );
        Ok(result)
    }

    /// Unwind the trail to the innermost frame with an untried alternative,
    /// commit that alternative, and return the collection to continue from.
    /// Returns `None` once every alternative is exhausted.
    fn backtrack(&mut self, trail: &mut Vec<Frame>) -> Option<Formula> {
        while let Some(mut frame) = trail.pop() {
            if let Some((alternative, clauses)) = frame.alternative.take() {
                self.stats.backtracks += 1;
                trace!("backtrack: {} -> {} at depth {}", frame.decision, alternative, trail.len());
                frame.decision = alternative;
                let next = clauses.substitute(&alternative);
                trail.push(frame);
                return Some(next);
            }
        }
        None
    }
}

/// Scan the collection once, looking for an empty clause and otherwise the
/// first clause of minimal length.
fn select(clauses: &Formula) -> Selection {
    let mut smallest = None;
    for clause in clauses.clauses() {
        match clause.choose_literal() {
            None => return Selection::Conflict,
            Some(literal) => match smallest {
                Some((len, _)) if len <= clause.len() => {}
                _ => smallest = Some((clause.len(), *literal)),
            },
        }
    }
    match smallest {
        None => Selection::Satisfied,
        Some((1, literal)) => Selection::Unit(literal),
        Some((_, literal)) => Selection::Branch(literal),
    }
}
