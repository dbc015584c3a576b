//! Build automation for the metal CLI
//!
//! Usage: cargo xtask <command>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const BIN: &str = "metal";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for the metal CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the binary
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        /// Only the tests under tests/
        #[arg(long)]
        integration: bool,
    },
    /// Package a release tarball named like the binstall metadata expects
    Dist {
        /// Target triple (default: host)
        #[arg(long)]
        target: Option<String>,
    },
    /// Install the release binary
    Install {
        #[arg(long, default_value = "/usr/local")]
        prefix: String,
    },
    /// Format check, clippy and tests
    Ci,
    Format {
        #[arg(long)]
        check: bool,
    },
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Build { release } => build(&sh, release),
        Commands::Test { integration } => test(&sh, integration),
        Commands::Dist { target } => dist(&sh, target),
        Commands::Install { prefix } => install(&sh, &prefix),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    if release {
        cmd!(sh, "cargo build --release --bin {BIN}").run()?;
        println!("built target/release/{}", BIN);
    } else {
        cmd!(sh, "cargo build --bin {BIN}").run()?;
        println!("built target/debug/{}", BIN);
    }
    Ok(())
}

fn test(sh: &Shell, integration: bool) -> Result<()> {
    if integration {
        cmd!(sh, "cargo test -p metal-cli --test '*'").run()?;
    } else {
        cmd!(sh, "cargo test --workspace").run()?;
    }
    Ok(())
}

/// Version of the CLI package, not of xtask.
fn cli_version(sh: &Shell) -> Result<String> {
    let manifest = sh.read_file(project_root()?.join("Cargo.toml"))?;
    manifest
        .lines()
        .find_map(|l| l.strip_prefix("version = "))
        .map(|v| v.trim_matches('"').to_string())
        .context("no version in Cargo.toml")
}

fn dist(sh: &Shell, target: Option<String>) -> Result<()> {
    let triple = match &target {
        Some(t) => t.clone(),
        None => {
            let info = cmd!(sh, "rustc -vV").read()?;
            info.lines()
                .find_map(|l| l.strip_prefix("host: "))
                .map(str::to_string)
                .context("unable to determine host triple")?
        }
    };

    let binary = match &target {
        Some(t) => {
            cmd!(sh, "cargo build --release --bin {BIN} --target {t}").run()?;
            project_root()?.join(format!("target/{}/release/{}", t, BIN))
        }
        None => {
            cmd!(sh, "cargo build --release --bin {BIN}").run()?;
            project_root()?.join(format!("target/release/{}", BIN))
        }
    };

    let dist_dir = project_root()?.join("dist");
    sh.create_dir(&dist_dir)?;
    sh.copy_file(&binary, dist_dir.join(BIN))?;

    let archive = format!("{}-{}.tar.gz", BIN, triple);
    cmd!(sh, "tar -czf {archive} -C dist {BIN}")
        .run()
        .context("failed to create tarball")?;

    println!("packaged {} v{} as {}", BIN, cli_version(sh)?, archive);
    Ok(())
}

fn install(sh: &Shell, prefix: &str) -> Result<()> {
    let binary = project_root()?.join(format!("target/release/{}", BIN));
    if !binary.exists() {
        cmd!(sh, "cargo build --release --bin {BIN}").run()?;
    }

    let bin_dir = Path::new(prefix).join("bin");
    sh.create_dir(&bin_dir)?;
    let install_path = bin_dir.join(BIN);
    sh.copy_file(&binary, &install_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&install_path, std::fs::Permissions::from_mode(0o755))?;
    }

    println!("installed {}", install_path.display());
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    format(sh, true)?;
    clippy(sh)?;
    test(sh, false)
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}
