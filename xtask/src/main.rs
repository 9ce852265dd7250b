use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "rankset workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sorted set benches and compare them with their std baselines
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Bench targets to run
        #[arg(long = "target", default_values_t = [String::from("sorted_set_benchmark"), String::from("suite")])]
        targets: Vec<String>,

        /// Criterion baseline to save into and report from
        #[arg(long, default_value = "new")]
        baseline: String,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

/// Bench functions with this prefix are the std collections rankset is measured against.
const STD_PREFIX: &str = "std_";

const CRITERION_DIR: &str = "target/criterion";
const REPORT_PATH: &str = "benchmark_results/report.md";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench {
            quick,
            targets,
            baseline,
            report_only,
        } => {
            if !report_only {
                for target in &targets {
                    run_bench(target, &baseline, quick)?;
                }
            }
            generate_report(&baseline)?;
        }
    }

    Ok(())
}

fn run_bench(target: &str, baseline: &str, quick: bool) -> Result<()> {
    println!("\n>>> Benchmarking {}", target);
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0")
        .args(["bench", "-p", "rankset", "--bench", target, "--"]);

    // `new` is where criterion writes when no baseline is named.
    if baseline != "new" {
        cmd.args(["--save-baseline", baseline]);
    }
    if quick {
        cmd.args(["--measurement-time", "0.1", "--sample-size", "10", "--noplot"]);
    }

    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn cargo bench for {}", target))?;
    if !status.success() {
        bail!("bench target {} failed with {}", target, status);
    }

    println!("Finished {} in {:.2?}", target, start.elapsed());
    Ok(())
}

/// One criterion result: `<group>/<function>[/<input>]`.
#[derive(Debug)]
struct Measurement {
    function: String,
    input: Option<String>,
    mean_ns: f64,
    elements: Option<f64>,
}

impl Measurement {
    fn is_baseline(&self) -> bool {
        self.function.starts_with(STD_PREFIX)
    }

    fn throughput(&self) -> Option<f64> {
        self.elements.map(|n| n * 1e9 / self.mean_ns)
    }
}

fn generate_report(baseline: &str) -> Result<()> {
    println!("\n>>> Generating report from baseline '{}'", baseline);

    let criterion_dir = Path::new(CRITERION_DIR);
    if !criterion_dir.exists() {
        bail!("no criterion output at {}; run without --report-only first", criterion_dir.display());
    }

    let mut groups: BTreeMap<String, Vec<Measurement>> = BTreeMap::new();
    for dir in result_dirs(criterion_dir, baseline)? {
        match read_measurement(&dir) {
            Ok((group, m)) => groups.entry(group).or_default().push(m),
            Err(err) => eprintln!("Skipping {}: {:#}", dir.display(), err),
        }
    }
    if groups.is_empty() {
        bail!("no '{}' results under {}", baseline, criterion_dir.display());
    }

    let report = render_report(&groups);
    let report_path = Path::new(REPORT_PATH);
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(report_path, report).with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("Report written to {}", report_path.display());
    Ok(())
}

/// Every `<baseline>` directory holding a criterion estimate.
fn result_dirs(dir: &Path, baseline: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        if !path.is_dir() || path.file_name().is_some_and(|n| n == "report") {
            continue;
        }
        if path.file_name().is_some_and(|n| n == baseline) && path.join("estimates.json").exists() {
            found.push(path);
        } else {
            found.extend(result_dirs(&path, baseline)?);
        }
    }
    Ok(found)
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn read_measurement(dir: &Path) -> Result<(String, Measurement)> {
    let bench = read_json(&dir.join("benchmark.json"))?;
    let estimates = read_json(&dir.join("estimates.json"))?;

    let group = bench["group_id"].as_str().context("missing group_id")?.to_string();
    let function = bench["function_id"]
        .as_str()
        .map_or_else(|| group.clone(), str::to_string);
    let input = bench["value_str"].as_str().map(str::to_string);
    let elements = bench["throughput"]["Elements"].as_f64();

    let mean_ns = estimates["mean"]["point_estimate"]
        .as_f64()
        .context("missing mean.point_estimate")?;
    if mean_ns <= 0.0 {
        bail!("non-positive mean {}", mean_ns);
    }

    Ok((
        group,
        Measurement {
            function,
            input,
            mean_ns,
            elements,
        },
    ))
}

fn render_report(groups: &BTreeMap<String, Vec<Measurement>>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Sorted Set Benchmark Report\n");
    let _ = writeln!(
        out,
        "`vs std` is the `{}*` baseline's mean time divided by this row's; above 1.00x rankset is faster.\n",
        STD_PREFIX
    );

    for (group, measurements) in groups {
        let mut rows: Vec<&Measurement> = measurements.iter().collect();
        rows.sort_by(|a, b| {
            input_key(a)
                .cmp(&input_key(b))
                .then_with(|| b.is_baseline().cmp(&a.is_baseline()))
                .then_with(|| a.function.cmp(&b.function))
        });

        let _ = writeln!(out, "## {}\n", group);
        let _ = writeln!(out, "| Function | Input | Mean | Throughput | vs std |");
        let _ = writeln!(out, "|---|---|---|---|---|");
        for m in rows {
            let std_mean = measurements
                .iter()
                .find(|b| b.is_baseline() && b.input == m.input)
                .map(|b| b.mean_ns);
            let vs_std = match std_mean {
                Some(_) if m.is_baseline() => "-".to_string(),
                Some(std_ns) => format!("**{:.2}x**", std_ns / m.mean_ns),
                None => "-".to_string(),
            };
            let throughput = m
                .throughput()
                .map_or_else(|| "-".to_string(), |ops| format!("{} elem/s", si(ops)));
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                m.function,
                m.input.as_deref().unwrap_or("-"),
                duration(m.mean_ns),
                throughput,
                vs_std
            );
        }
        out.push('\n');
    }
    out
}

/// Numeric inputs sort by value, the rest lexically after them.
fn input_key(m: &Measurement) -> (u64, String) {
    let input = m.input.clone().unwrap_or_default();
    (input.parse().unwrap_or(u64::MAX), input)
}

fn si(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}G", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.0}", value)
    }
}

fn duration(ns: f64) -> String {
    if ns >= 1e9 {
        format!("{:.2} s", ns / 1e9)
    } else if ns >= 1e6 {
        format!("{:.2} ms", ns / 1e6)
    } else if ns >= 1e3 {
        format!("{:.2} µs", ns / 1e3)
    } else {
        format!("{:.1} ns", ns)
    }
}
