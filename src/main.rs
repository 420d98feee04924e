use clap::{App, Arg};
use dpllsat::formula::dimacs::{parse, parse_file};
use dpllsat::*;
use log::{error, info};
use std::time::{Duration, Instant};

const EXIT_SAT: i32 = 10;
const EXIT_UNSAT: i32 = 20;
const EXIT_TIMEOUT: i32 = 30;

fn main() {
    env_logger::init();

    let matches = App::new("dpllsat")
        .about("DPLL satisfiability solver for DIMACS CNF formulas")
        .arg(Arg::with_name("INPUT").help("input file (in CNF), stdin if omitted").index(1))
        .arg(
            Arg::with_name("timeout")
                .long("timeout")
                .value_name("SECONDS")
                .help("give up after this many seconds")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("no-model")
                .long("no-model")
                .help("don't print the satisfying assignment"),
        )
        .get_matches();

    let timeout = match matches.value_of("timeout") {
        None => None,
        Some(s) => match parse_timeout(s) {
            Some(timeout) => Some(timeout),
            None => {
                eprintln!("invalid timeout: {}", s);
                std::process::exit(1);
            }
        },
    };

    let f = if let Some(path) = matches.value_of("INPUT") {
        parse_file(path)
    } else {
        parse(std::io::stdin())
    };

    let f = match f {
        Ok(f) => f,
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(1);
        }
    };

    println!("c {} variables, {} clauses", f.num_variables(), f.len());

    let started = Instant::now();
    let mut solver = Solver::with_config(f.clone(), SolverConfig { timeout });
    let result = solver.solve_bounded();
    let elapsed = started.elapsed();
    info!("{:?}", solver.stats());

    let exit_code = match result {
        Ok(SatResult::Satisfiable(env)) => {
            if !f.is_satisfied_by(&env) {
                error!("model does not satisfy the input formula");
            }
            println!("s SATISFIABLE");
            if !matches.is_present("no-model") {
                if env.is_empty() {
                    println!("v 0");
                } else {
                    println!("v {} 0", env);
                }
            }
            EXIT_SAT
        }
        Ok(SatResult::Unsatisfiable) => {
            println!("s UNSATISFIABLE");
            EXIT_UNSAT
        }
        Err(e) => {
            println!("s UNKNOWN");
            println!("c {}", e);
            EXIT_TIMEOUT
        }
    };
    println!("c solved in {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    std::process::exit(exit_code);
}

/// Seconds as a non-negative decimal; `None` for anything a `Duration` can't hold.
fn parse_timeout(s: &str) -> Option<Duration> {
    let secs = s.parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_env_log::test;

    #[test]
    fn timeout_in_range() {
        assert_eq!(parse_timeout("0.5"), Some(Duration::from_millis(500)));
        assert_eq!(parse_timeout("0"), Some(Duration::from_secs(0)));
        assert_eq!(parse_timeout("30"), Some(Duration::from_secs(30)));
    }

    #[test]
    fn timeout_out_of_range() {
        assert_eq!(parse_timeout("1e30"), None);
        assert_eq!(parse_timeout("-1"), None);
        assert_eq!(parse_timeout("NaN"), None);
        assert_eq!(parse_timeout("inf"), None);
        assert_eq!(parse_timeout("soon"), None);
    }
}
