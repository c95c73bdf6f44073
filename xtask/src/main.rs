use std::env;

use xtask::{
    tasks::{ci::ci, distribute::dist},
    DynError,
};

const HELP: &str = "
Usage: cargo xtask <task>

Tasks:
  ci              runs check, clippy, nextest, doc and example tests, audit and fmt,
                  stopping at the first failure
  dist            packages the library and its API docs into target/dist
";

fn main() {
    let task = env::args().nth(1);
    if let Err(e) = run(task.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(-1);
    }
}

fn run(task: Option<&str>) -> Result<(), DynError> {
    match task {
        Some("dist") => dist(),
        Some("ci") => ci(),
        None | Some("help") => {
            eprintln!("{}", HELP);
            Ok(())
        }
        Some(other) => Err(format!("Unknown task `{}`.\n{}", other, HELP).into()),
    }
}
