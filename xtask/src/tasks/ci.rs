use colored::Colorize;
use std::{
    env,
    process::{Command, ExitStatus, Stdio},
};

use crate::{project_root, DynError};

/// Runs the same checks CI does, stopping at the first one that fails.
pub fn ci() -> Result<(), DynError> {
    let tasks = vec![
        ("cargo check on code", vec!["check", "--workspace"]),
        ("cargo check on examples", vec!["check", "--examples"]),
        ("cargo clippy", vec!["clippy", "--all-targets", "--", "-D", "warnings"]),
        ("cargo nextest", vec!["nextest", "run", "--workspace"]),
        ("cargo test on docs", vec!["test", "--doc"]),
        ("cargo test on examples", vec!["test", "--examples"]),
        ("cargo audit", vec!["audit"]),
        ("cargo fmt", vec!["fmt", "--all", "--", "--check"]),
    ];

    for (name, args) in tasks {
        println!(
            "{}{}{}",
            "Running ".truecolor(255, 165, 0),
            name.truecolor(255, 165, 0),
            "...".truecolor(255, 165, 0)
        );
        let status = cargo_command(args).status()?;
        if !status.success() {
            print_error_with_status_code(name, status);
            return Err(format!("`{}` failed", name).into());
        }
    }

    println!("{}", "All checks passed.".green());
    Ok(())
}

fn print_error_with_status_code(task: &str, status: ExitStatus) {
    let code = match status.code() {
        Some(x) => x.to_string(),
        None => "<< no status code >>".to_string(),
    };
    println!(
        "{} `{}` finished with a non-zero status code: {}",
        "Error:".to_string().red(),
        task.blue(),
        code
    );
}

fn cargo_command(args: Vec<&str>) -> Command {
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let mut cmd = Command::new(cargo);
    cmd.current_dir(project_root())
        .args(args)
        .stdout(Stdio::inherit());
    cmd
}
