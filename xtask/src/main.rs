use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for calcboy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Run tests, optionally a single suite
    Test {
        #[arg(long, value_enum)]
        suite: Option<Suite>,
    },
    /// Run benchmarks
    Bench,
    /// Run the desktop demo
    Run {
        #[arg(long)]
        release: bool,
        /// Log filter passed through RUST_LOG (e.g. "debug")
        #[arg(long)]
        log: Option<String>,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
    /// Install git hooks
    InstallHooks,
}

/// Test suites
#[derive(Clone, Copy, ValueEnum)]
enum Suite {
    /// Inline unit tests
    Unit,
    Renderer,
    Pacer,
    Save,
    Session,
}

impl Suite {
    fn cargo_args(self) -> &'static [&'static str] {
        match self {
            Suite::Unit => &["--lib"],
            Suite::Renderer => &["--test", "renderer_tests"],
            Suite::Pacer => &["--test", "pacer_tests"],
            Suite::Save => &["--test", "save_tests"],
            Suite::Session => &["--test", "session_tests"],
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { fix } => run_clippy(fix),
        Commands::Test { suite } => run_test(suite),
        Commands::Bench => cargo(&["bench"]),
        Commands::Run { release, log } => run_demo(release, log.as_deref()),
        Commands::PreCommit => run_pre_commit(),
        Commands::InstallHooks => install_hooks(),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());
    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy", || run_clippy(false), verbose)?;
    run_task("Build", || cargo(&["build", "--all-targets"]), verbose)?;
    run_task("Test", || run_test(None), verbose)?;

    finished("CI passed in", start);
    Ok(())
}

fn run_pre_commit() -> Result<()> {
    println!("{}", "=== Pre-commit Checks ===".bold().blue());
    let start = Instant::now();

    run_task("Format Check", || run_fmt(true), false)?;
    run_task("Clippy", || run_clippy(false), false)?;
    run_task("Test", || run_test(None), false)?;

    finished("Pre-commit checks passed in", start);
    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    if check {
        cargo(&["fmt", "--all", "--", "--check"])
    } else {
        cargo(&["fmt", "--all"])
    }
}

fn run_clippy(fix: bool) -> Result<()> {
    if fix {
        cargo(&["clippy", "--all-targets", "--fix"])
    } else {
        cargo(&["clippy", "--all-targets", "--", "-D", "warnings"])
    }
}

fn run_test(suite: Option<Suite>) -> Result<()> {
    let mut args = vec!["test"];
    if let Some(suite) = suite {
        args.extend_from_slice(suite.cargo_args());
    }
    cargo(&args)
}

fn run_demo(release: bool, log: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--package", "calcboy"]);
    if release {
        cmd.arg("--release");
    }
    if let Some(filter) = log {
        println!("{} RUST_LOG={}", "→".blue(), filter.cyan());
        cmd.env("RUST_LOG", filter);
    }
    execute_command(&mut cmd)
}

fn install_hooks() -> Result<()> {
    use std::fs;

    println!("{}", "Installing git hooks...".bold());

    let hook_content = r#"#!/bin/sh
# Auto-generated by cargo x install-hooks
set -e

cargo x pre-commit
"#;

    let hook_path = ".git/hooks/pre-commit";
    fs::write(hook_path, hook_content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = fs::metadata(hook_path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(hook_path, perms)?;
    }

    println!("{}", "✓ Git hooks installed".green());
    Ok(())
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);
    let start = Instant::now();

    match task() {
        Ok(()) => {
            if verbose {
                println!("{} ({:.2}s)", "✓".green().bold(), start.elapsed().as_secs_f64());
            } else {
                println!("{}", "✓".green().bold());
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn finished(message: &str, start: Instant) {
    println!(
        "\n{} {}",
        format!("✓ {}", message).green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
}

fn cargo(args: &[&str]) -> Result<()> {
    execute_command(Command::new("cargo").args(args))
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
