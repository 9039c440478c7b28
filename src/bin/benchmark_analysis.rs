//! Run the default-catalog stress test sequentially and in parallel, print timings and speedup,
//! and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_analysis
//!   cargo run --release --bin benchmark_analysis -- --reps 2000 --log
//!
//! --log  Append one row to benchmark_log.csv (date, archetypes, repetitions, sequential_ms, parallel_ms, sims_per_sec).

use std::fs::OpenOptions;
use std::io::Write;
use std::process;
use std::time::Instant;

use balance_lab::analysis::UtilityAnalyzer;
use balance_lab::catalog::default_catalog;
use balance_lab::combat::DuelSimulator;
use balance_lab::config::AnalysisConfig;
use balance_lab::ArchetypeGenerator;

const LOG_PATH: &str = "benchmark_log.csv";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let log = args.iter().any(|a| a == "--log");
    let repetitions = args
        .iter()
        .position(|a| a == "--reps")
        .and_then(|i| args.get(i + 1))
        .and_then(|raw| raw.parse::<usize>().ok())
        .unwrap_or(1000);

    let catalog = default_catalog();
    let archetypes = ArchetypeGenerator::new(&catalog).generate_all();
    let simulator = DuelSimulator::default();
    let config = AnalysisConfig::default().with_repetitions(repetitions).with_seed(7);
    let analyzer = match UtilityAnalyzer::new(&simulator, config) {
        Ok(analyzer) => analyzer,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            process::exit(2);
        }
    };

    let n = archetypes.len();
    let total_sims = (n * repetitions) as f64;
    println!("Stress test: {n} archetypes x {repetitions} repetitions");
    println!();

    let t0 = Instant::now();
    let sequential = analyzer.run_full_analysis(&archetypes);
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} sims/s)",
        seq_ms,
        total_sims / elapsed_seq.as_secs_f64()
    );

    let t0 = Instant::now();
    let parallel = analyzer.run_full_analysis_parallel(&archetypes);
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    let sims_per_sec = total_sims / elapsed_par.as_secs_f64();
    println!("Parallel:    {:.2} ms  ({:.1} sims/s)", par_ms, sims_per_sec);

    println!();
    println!("Speedup:     {:.2}x (parallel vs sequential)", seq_ms / par_ms);

    match (sequential, parallel) {
        (Ok(seq), Ok(par)) if seq == par => println!("(Reports match sequential vs parallel)"),
        (Ok(_), Ok(_)) => {
            eprintln!("sequential and parallel reports differ");
            process::exit(1);
        }
        (Err(err), _) | (_, Err(err)) => {
            eprintln!("analysis failed: {err}");
            process::exit(1);
        }
    }

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{},{},{},{:.3},{:.3},{:.1}\n",
            date, n, repetitions, seq_ms, par_ms, sims_per_sec
        );
        if let Err(err) = append_log(&line) {
            eprintln!("failed to append {LOG_PATH}: {err}");
            process::exit(1);
        }
        println!("Appended to {LOG_PATH}");
    }
}

fn append_log(line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(LOG_PATH)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,archetypes,repetitions,sequential_ms,parallel_ms,sims_per_sec\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}
