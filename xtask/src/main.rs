// Query Stats Analyzer - Build Task Runner
// Unified build system using cargo xtask pattern

use anyhow::{Context, Result};
use xshell::{Shell, cmd};

fn main() -> Result<()> {
    let sh = Shell::new()?;
    let args: Vec<_> = std::env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("build") => {
            let release = args.contains(&"--release".to_string());
            build(&sh, release)
        }
        Some("test") => test(&sh),
        Some("format") => {
            let check = args.contains(&"--check".to_string());
            format(&sh, check)
        }
        Some("clippy") => clippy(&sh),
        Some("run") => run(&sh, &args[1..]),
        Some("clean") => clean(&sh),
        Some("ci") => ci(&sh),
        Some("dist") => dist(&sh),
        _ => {
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("Query Stats Analyzer - Build Commands:");
    println!();
    println!("Usage: cargo xtask <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  build [--release]   Build the analyzer");
    println!("  test                Run all tests");
    println!("  format [--check]    Format code (check mode doesn't modify)");
    println!("  clippy              Run clippy checks");
    println!("  run [ARGS...]       Build and run the analyzer");
    println!("  clean               Clean build artifacts");
    println!("  ci                  Run all CI checks (format + clippy + build + test)");
    println!("  dist                Create distribution package (tar.gz)");
    println!();
    println!("Examples:");
    println!("  cargo xtask build --release");
    println!("  cargo xtask run dump.json --web");
    println!("  cargo xtask format --check");
}

/// Build the backend crate
fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building Query Stats Analyzer...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));

    if release {
        cmd!(sh, "cargo build --release")
            .run()
            .context("Failed to build in release mode")?;
        create_distribution(sh)?;
    } else {
        cmd!(sh, "cargo build").run().context("Failed to build")?;
    }

    println!("✅ Build complete");

    Ok(())
}

/// Create distribution package structure
fn create_distribution(sh: &Shell) -> Result<()> {
    let project = project_root();
    let dist_dir = project.join("build/dist");

    cmd!(sh, "mkdir -p {dist_dir}/bin").run()?;
    cmd!(sh, "mkdir -p {dist_dir}/conf").run()?;
    cmd!(sh, "mkdir -p {dist_dir}/logs").run()?;

    let binary_src = project.join("backend/target/release/querystats-analyzer");
    let binary_dst = dist_dir.join("bin/querystats-analyzer");
    cmd!(sh, "cp {binary_src} {binary_dst}").run()?;

    create_config_file(sh, &dist_dir)?;

    Ok(())
}

/// Create default config file
fn create_config_file(_sh: &Shell, dist_dir: &std::path::Path) -> Result<()> {
    let config_path = dist_dir.join("conf/config.toml");
    let config_content = r#"[server]
host = "127.0.0.1"
port = 5000

[logging]
level = "info,querystats_analyzer=debug"
file = "logs/querystats-analyzer.log"
"#;

    std::fs::write(config_path, config_content).context("Failed to create config file")?;

    Ok(())
}

/// Run all tests
fn test(sh: &Shell) -> Result<()> {
    println!("🧪 Running tests...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));

    cmd!(sh, "cargo test --workspace").run().context("Tests failed")?;

    println!();
    println!("✅ All tests passed!");

    Ok(())
}

/// Format code
fn format(sh: &Shell, check: bool) -> Result<()> {
    println!("🎨 Formatting Rust code...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));

    if check {
        cmd!(sh, "cargo fmt --all -- --check")
            .run()
            .context("Rust code is not formatted")?;
        println!("✅ Rust code is properly formatted");
    } else {
        cmd!(sh, "cargo fmt --all").run().context("Failed to format Rust code")?;
        println!("✅ Rust code formatted");
    }

    Ok(())
}

/// Run clippy checks
fn clippy(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root().join("backend"));

    cmd!(sh, "cargo clippy --release --all-targets -- --deny warnings --allow clippy::uninlined-format-args")
        .run()
        .context("Clippy checks failed")?;

    Ok(())
}

/// Build and run the analyzer
fn run(sh: &Shell, args: &[String]) -> Result<()> {
    build(sh, false)?;

    println!();
    println!("▶️  Starting analyzer...");
    println!();

    let _dir = sh.push_dir(project_root().join("backend"));

    let mut cmd = cmd!(sh, "cargo run --");
    for arg in args {
        cmd = cmd.arg(arg);
    }

    cmd.run().context("Failed to run analyzer")?;

    Ok(())
}

/// Clean build artifacts
fn clean(sh: &Shell) -> Result<()> {
    println!("🧹 Cleaning build artifacts...");
    println!();

    let project = project_root();

    let _dir = sh.push_dir(project.join("backend"));
    cmd!(sh, "cargo clean").run()?;

    let build_dir = project.join("build");
    if build_dir.exists() {
        cmd!(sh, "rm -rf {build_dir}").run()?;
    }

    println!();
    println!("✅ Clean complete!");

    Ok(())
}

/// Run all CI checks (format + clippy + build + test)
fn ci(sh: &Shell) -> Result<()> {
    println!("🔄 Running CI pipeline...");
    println!();

    println!("📝 [1/4] Checking code format...");
    format(sh, true)?;
    println!();

    println!("🔍 [2/4] Running clippy checks...");
    clippy(sh)?;
    println!();

    println!("🔨 [3/4] Building project...");
    build(sh, true)?;
    println!();

    println!("🧪 [4/4] Running tests...");
    test(sh)?;
    println!();

    println!("🎉 CI pipeline completed successfully!");

    Ok(())
}

/// Create distribution package (tar.gz)
fn dist(sh: &Shell) -> Result<()> {
    println!("📦 Creating distribution package...");
    println!();

    build(sh, true)?;
    println!();

    let project = project_root();
    let dist_dir = project.join("build/dist");

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let package_name = format!("querystats-analyzer-{}.tar.gz", timestamp);
    let package_path = dist_dir.join(&package_name);

    println!("📋 Creating tarball: {}...", package_name);

    let _dir = sh.push_dir(&dist_dir);
    cmd!(sh, "tar czf {package_name} bin conf logs")
        .run()
        .context("Failed to create tarball")?;

    println!();
    println!("✅ Distribution package created!");
    println!("   Location: {}", package_path.display());
    println!();
    println!("📝 To extract:");
    println!("   tar xzf {}", package_name);

    Ok(())
}

fn project_root() -> std::path::PathBuf {
    std::path::Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .unwrap()
        .to_path_buf()
}
