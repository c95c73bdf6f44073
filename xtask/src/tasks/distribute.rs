use std::{env, fs, path::Path, process::Command};

use crate::{dist_dir, project_root, DynError};

const CRATE_NAME: &str = "mongodb_client";

pub fn dist() -> Result<(), DynError> {
    let _ = fs::remove_dir_all(dist_dir());
    fs::create_dir_all(dist_dir())?;

    dist_package()?;
    dist_docs()?;

    Ok(())
}

/// Packages the library crate and copies the `.crate` archive into the dist directory.
pub fn dist_package() -> Result<(), DynError> {
    cargo(&["package", "-p", CRATE_NAME, "--allow-dirty"])?;

    let package_dir = project_root().join("target/package");
    for entry in fs::read_dir(package_dir)? {
        let entry = entry?;
        let is_archive = entry
            .path()
            .extension()
            .map(|ext| ext == "crate")
            .unwrap_or(false);
        if is_archive {
            fs::copy(entry.path(), dist_dir().join(entry.file_name()))?;
        }
    }

    Ok(())
}

/// Builds the API docs without dependencies and copies them into the dist directory.
pub fn dist_docs() -> Result<(), DynError> {
    cargo(&["doc", "-p", CRATE_NAME, "--no-deps"])?;

    copy_dir(&project_root().join("target/doc"), &dist_dir().join("doc"))
}

fn cargo(args: &[&str]) -> Result<(), DynError> {
    // Get the `cargo` command the xtask was started with
    let cargo = env::var("CARGO").unwrap_or_else(|_| "cargo".to_string());
    let status = Command::new(cargo)
        .current_dir(project_root())
        .args(args)
        .status()?;

    if !status.success() {
        return Err(format!("cargo {} failed", args.join(" ")).into());
    }
    Ok(())
}

fn copy_dir(source: &Path, destination: &Path) -> Result<(), DynError> {
    fs::create_dir_all(destination)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}
