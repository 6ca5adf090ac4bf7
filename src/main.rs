use clap::{App, Arg, SubCommand};
use dagsat::brute_force::solve_brute_force;
use dagsat::corpus::{cases, compare, Summary};
use dagsat::formula::parse::{parse, ParseError};
use dagsat::*;
use std::fs::File;
use std::io::BufWriter;

fn main() {
    env_logger::init();

    let matches = App::new("dagsat")
        .about("propositional satisfiability by DAG propagation")
        .arg(Arg::with_name("INPUT").help("input file (one formula)").index(1))
        .arg(
            Arg::with_name("strategy")
                .long("strategy")
                .takes_value(true)
                .possible_values(&["dag", "truth-table", "both"])
                .default_value("dag")
                .help("which procedure decides the result"),
        )
        .arg(
            Arg::with_name("dot")
                .long("dot")
                .takes_value(true)
                .value_name("FILE")
                .help("write the labeled DAG in Graphviz format"),
        )
        .subcommand(SubCommand::with_name("bench").about("run both strategies over the built-in corpus"))
        .get_matches();

    if matches.subcommand_matches("bench").is_some() {
        bench();
        return;
    }

    let f = if let Some(path) = matches.value_of("INPUT") {
        parse_from_file(path)
    } else {
        parse(std::io::stdin())
    };

    match f {
        Ok(f) => {
            let strategy = matches.value_of("strategy").unwrap_or("dag");
            let result = solve(&f, strategy, matches.value_of("dot"));
            let exit_code = match result {
                SatResult::Satisfiable => 0,
                SatResult::Unsatisfiable => 1,
            };
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(-1);
        }
    }
}

fn parse_from_file(path: &str) -> Result<Formula, ParseError> {
    let file = File::open(path)?;
    parse(file)
}

fn solve(f: &Formula, strategy: &str, dot: Option<&str>) -> SatResult {
    println!("{}", f);
    println!("signature: {}", f.signature());

    let truth_table = if strategy == "dag" {
        None
    } else {
        let result = solve_brute_force(f);
        println!("truth table: {:?}", result);
        Some(result)
    };

    if let (Some(result), "truth-table") = (truth_table, strategy) {
        return result;
    }

    let mut solver = DagSolver::new(f);
    let verdict = solver.solve();
    println!("dag: {}", solver.dag().render(solver.root()));
    println!("dag verdict: {:?}", verdict);
    if verdict == Verdict::Resolved {
        println!("model: {:?}", solver.model());
    }

    if let Some(path) = dot {
        let written = File::create(path).and_then(|file| solver.dag().write_dot(BufWriter::new(file)));
        if let Err(e) = written {
            eprintln!("could not write {}: {}", path, e);
        }
    }

    match truth_table {
        Some(result) if result != verdict.sat_result() => {
            println!("strategies disagree, trusting the truth table");
            result
        }
        _ => verdict.sat_result(),
    }
}

fn bench() {
    let mut summary = Summary::default();
    for case in cases() {
        let comparison = compare(&case);
        println!("{}", case.label);
        println!("{}", case.formula);
        println!("expected: {:?}", case.expected);
        println!("- truth table result: {:?}", comparison.truth_table);
        println!(
            "- truth table time: {:.6} seconds",
            comparison.truth_table_time.as_secs_f64()
        );
        println!("- dag result: {:?}", comparison.dag);
        println!("- dag time: {:.6} seconds", comparison.dag_time.as_secs_f64());
        println!();
        summary.record(&case, &comparison);
    }

    println!("Summary:");
    println!(
        "- truth table correct: {} | incorrect: {}",
        summary.truth_table_correct, summary.truth_table_incorrect
    );
    println!(
        "- dag correct: {} | incorrect: {}",
        summary.dag_correct, summary.dag_incorrect
    );
    println!(
        "- dag faster: {} | dag slower: {}",
        summary.dag_faster, summary.dag_slower
    );
}
