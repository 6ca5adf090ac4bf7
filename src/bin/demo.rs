use dagsat::brute_force::solve_brute_force;
use dagsat::*;

fn show(f: &Formula) {
    println!("{}", f);
    println!("signature: {}", f.signature());
    println!("truth table: {:?}", solve_brute_force(f));

    let mut solver = DagSolver::new(f);
    let verdict = solver.solve();
    println!("dag: {}", solver.dag().render(solver.root()));
    println!("after labeling the root True: {:?}", verdict);
    println!();
}

fn main() {
    env_logger::init();

    let p = || Formula::var("p");
    let q = || Formula::var("q");

    // (¬p => q) <=> (p ∨ q)
    show(&Formula::eq(Formula::implies(Formula::not(p()), q()), Formula::or(p(), q())));

    // p ∧ ¬p
    show(&Formula::and(p(), Formula::not(p())));

    let pq = Formula::and(p(), q());
    let qp = Formula::and(q(), p());
    println!("{} signature: {}", pq, pq.signature());
    println!("{} signature: {}", qp, qp.signature());

    let mut dag = Dag::new();
    let first = dag.build(&pq);
    let second = dag.build(&qp);
    println!("same node: {}", first == second);
}
