use std::path::{Path, PathBuf};

use anyhow::Context;
use regex_lite::Regex;
use serde::Deserialize;

/// Crates that must stay pure: no runtime, transport or storage.
const PURE_CRATES: &[&str] = &["donjon-domain", "donjon-shared"];

const FORBIDDEN_DEPENDENCIES: &[&str] = &[
    "tokio",
    "axum",
    "tower",
    "tower-http",
    "sqlx",
    "dashmap",
    "futures-util",
    "dotenvy",
    "tracing-subscriber",
];

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    /// `None` for normal dependencies, `"dev"` or `"build"` otherwise
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = Vec::new();
    for package in metadata
        .packages
        .iter()
        .filter(|package| PURE_CRATES.contains(&package.name.as_str()))
    {
        violations.extend(dependency_violations(package));

        let src = package
            .manifest_path
            .parent()
            .map(|dir| dir.join("src"))
            .context("manifest path has no parent")?;
        violations.extend(source_violations(&package.name, &src)?);
    }

    if violations.is_empty() {
        println!("arch-check: ok ({} pure crates)", PURE_CRATES.len());
        return Ok(());
    }

    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} architecture violation(s)", violations.len())
}

fn dependency_violations(package: &Package) -> Vec<String> {
    package
        .dependencies
        .iter()
        .filter(|dep| dep.kind.is_none())
        .filter(|dep| FORBIDDEN_DEPENDENCIES.contains(&dep.name.as_str()))
        .map(|dep| format!("{} depends on {}", package.name, dep.name))
        .collect()
}

/// Flag IO and runtime paths used directly in source, outside of tests.
fn source_violations(crate_name: &str, src: &Path) -> anyhow::Result<Vec<String>> {
    let pattern = Regex::new(r"\b(tokio|axum|sqlx|std::fs|std::net)::")
        .context("compiling source pattern")?;

    let mut violations = Vec::new();
    for file in rust_files(src)? {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        let production = content
            .split("#[cfg(test)]")
            .next()
            .unwrap_or_default();

        for (number, line) in production.lines().enumerate() {
            if let Some(found) = pattern.find(line) {
                violations.push(format!(
                    "{crate_name}: {}:{} uses {}",
                    file.display(),
                    number + 1,
                    found.as_str()
                ));
            }
        }
    }
    Ok(violations)
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(rust_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
