use crate::formula::{Clause, Formula, Literal, Variable};
use log::{debug, warn};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Read a CNF formula in DIMACS format.
///
/// Everything before the `p` line is header and ignored. After it, `c` lines
/// are comments and every other token is a literal; `0` closes the current
/// clause, so clauses may span lines and a bare `0` is an empty clause. A `%`
/// line ends the input, as in the SATLIB benchmark files.
pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut formula = Formula::default();
    let mut clause = Clause::empty();
    let mut header = None;

    for line in reader.lines() {
        let line = line?;
        let mut tokens = line.split_whitespace().peekable();

        if header.is_none() {
            if tokens.peek() == Some(&"p") {
                header = Some(parse_header(tokens)?);
            }
            continue;
        }

        match tokens.peek() {
            Some(&"c") | None => continue,
            Some(&"%") => break,
            Some(_) => {
                for token in tokens {
                    match parse_literal(token)? {
                        Some(l) => clause = clause.add(l),
                        None => formula = formula.add_clause(std::mem::replace(&mut clause, Clause::empty())),
                    }
                }
            }
        }
    }

    let (num_variables, num_clauses) =
        header.ok_or_else(|| DimacsParseError::Format("missing 'p' line before clauses".into()))?;

    if !clause.is_empty() {
        formula = formula.add_clause(clause);
    }

    if formula.len() != num_clauses {
        warn!("header declares {} clauses, found {}", num_clauses, formula.len());
    }
    debug!(
        "parsed {} clauses over {} variables (header: {})",
        formula.len(),
        formula.num_variables(),
        num_variables
    );

    Ok(formula)
}

pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Formula, DimacsParseError> {
    let file = File::open(path)?;
    parse(file)
}

fn parse_header<'a>(mut line: impl Iterator<Item = &'a str>) -> Result<(usize, usize), DimacsParseError> {
    let _ = line.next();

    if line.next() != Some("cnf") {
        return Err(DimacsParseError::Format("missing 'cnf'".into()));
    }

    let num_variables = line
        .next()
        .and_then(|c| c.parse::<usize>().ok())
        .ok_or_else(|| DimacsParseError::Format("invalid num_variables".into()))?;

    let num_clauses = line
        .next()
        .and_then(|c| c.parse::<usize>().ok())
        .ok_or_else(|| DimacsParseError::Format("invalid num_clauses".into()))?;

    Ok((num_variables, num_clauses))
}

fn parse_literal(s: &str) -> Result<Option<Literal>, DimacsParseError> {
    let l = s
        .parse::<isize>()
        .map_err(|_| DimacsParseError::Format(format!("invalid literal '{}'", s)))?;
    if l > 0 {
        Ok(Some(Literal::Positive(Variable(l as usize))))
    } else if l < 0 {
        Ok(Some(Literal::Negative(Variable(l.unsigned_abs()))))
    } else {
        Ok(None)
    }
}

#[derive(Debug)]
pub enum DimacsParseError {
    Io(std::io::Error),
    Format(String),
}

impl fmt::Display for DimacsParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DimacsParseError::Io(e) => write!(f, "i/o error: {}", e),
            DimacsParseError::Format(msg) => write!(f, "malformed input: {}", msg),
        }
    }
}

impl std::error::Error for DimacsParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DimacsParseError::Io(e) => Some(e),
            DimacsParseError::Format(_) => None,
        }
    }
}

impl From<std::io::Error> for DimacsParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use crate::formula::{n, p};
    use crate::{SatResult, Solver};

    use super::*;
    use test_env_log::test;

    #[test]
    fn parse_cnf_basic() {
        let cnf = "c  simple_v3_c2.cnf
c
p cnf 3 2
1 -3 0
2 3 -1 0";
        let f = parse(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(f.clauses().count(), 2);

        assert_eq!(
            f.clauses().nth(0).unwrap().literals().cloned().collect::<Vec<_>>(),
            vec![p(1), n(3)]
        );
        assert_eq!(
            f.clauses().nth(1).unwrap().literals().cloned().collect::<Vec<_>>(),
            vec![p(2), p(3), n(1)]
        );
    }

    #[test]
    fn parse_ignores_header_before_p() {
        let cnf = "this line is not a comment
neither is 1 2 3 0
p cnf 2 1
1 2 0
";
        let f = parse(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(f.len(), 1);
        assert_eq!(f.clauses().nth(0).unwrap().literals().cloned().collect::<Vec<_>>(), vec![p(1), p(2)]);
    }

    #[test]
    fn parse_clauses_spanning_lines() {
        let cnf = "p cnf 4 2
1 -2
3 0 -4
0
";
        let f = parse(cnf.as_bytes()).expect("failed to parse");
        assert_eq!(f.len(), 2);
        assert_eq!(
            f.clauses().nth(0).unwrap().literals().cloned().collect::<Vec<_>>(),
            vec![p(1), n(2), p(3)]
        );
        assert_eq!(f.clauses().nth(1).unwrap().literals().cloned().collect::<Vec<_>>(), vec![n(4)]);
    }

    #[test]
    fn parse_trailing_clause_without_zero() {
        let f = parse("p cnf 2 2\n1 0\n-1 2".as_bytes()).expect("failed to parse");
        assert_eq!(f.len(), 2);
        assert_eq!(f.clauses().nth(1).unwrap().literals().cloned().collect::<Vec<_>>(), vec![n(1), p(2)]);
    }

    #[test]
    fn parse_bare_zero_is_empty_clause() {
        let f = parse("p cnf 1 2\n1 0\n0\n".as_bytes()).expect("failed to parse");
        assert_eq!(f.len(), 2);
        assert!(f.clauses().nth(1).unwrap().is_empty());
        assert_eq!(Solver::new(f).solve(), SatResult::Unsatisfiable);
    }

    #[test]
    fn parse_stops_at_percent() {
        let f = parse("p cnf 2 1\n1 2 0\n%\n0\n\n".as_bytes()).expect("failed to parse");
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse("1 2 0\n".as_bytes()), Err(DimacsParseError::Format(_))));
        assert!(matches!(parse("p dnf 1 1\n".as_bytes()), Err(DimacsParseError::Format(_))));
        assert!(matches!(parse("p cnf x 1\n".as_bytes()), Err(DimacsParseError::Format(_))));
        assert!(matches!(parse("p cnf 1 1\n1 a 0\n".as_bytes()), Err(DimacsParseError::Format(_))));
    }

    #[test]
    fn solve_cnf_quinn() {
        let cnf = "c  quinn.cnf
c
p cnf 16 18
  1    2  0
 -2   -4  0
  3    4  0
 -4   -5  0
  5   -6  0
  6   -7  0
  6    7  0
  7  -16  0
  8   -9  0
 -8  -14  0
  9   10  0
  9  -10  0
-10  -11  0
 10   12  0
 11   12  0
 13   14  0
 14  -15  0
 15   16  0
";

        let f = parse(cnf.as_bytes()).expect("failed to parse");

        let mut solver = Solver::new(f.clone());
        let r = solver.solve();

        assert!(f.is_satisfied_by(r.model().expect("quinn.cnf is satisfiable")));
    }
}
