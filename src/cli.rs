use std::env;

use crate::analysis::{rank_by_marginal_utility, rank_synergies, AnalysisReport, StressTest};
use crate::archetype::ArchetypeGenerator;
use crate::catalog::{load_catalog, load_catalog_or_default, StatCatalog};
use crate::combat::DuelSimulator;
use crate::config::{load_config, resolve_config, AnalysisConfig};
use crate::error::AnalysisError;
use crate::export::write_report_csv;
use crate::server::{self, DEFAULT_BIND_ADDR, ENV_BIND};

const USAGE: &str = "usage: balance_lab <analyze|archetypes|validate|serve>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Analyze,
    Archetypes,
    Validate,
    Serve,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("analyze") => Some(Command::Analyze),
        Some("archetypes") => Some(Command::Archetypes),
        Some("validate") => Some(Command::Validate),
        Some("serve") => Some(Command::Serve),
        _ => None,
    }
}

/// Options after the command word: one optional positional catalog path plus flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub catalog_path: Option<String>,
    pub config_path: Option<String>,
    pub repetitions: Option<usize>,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub workers: Option<usize>,
    pub table: bool,
    pub csv_dir: Option<String>,
}

pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--table" => options.table = true,
            "--parallel" => options.parallel = true,
            "--reps" => options.repetitions = Some(parse_flag_value(rest.next(), "--reps")?),
            "--seed" => options.seed = Some(parse_flag_value(rest.next(), "--seed")?),
            "--workers" => options.workers = Some(parse_flag_value(rest.next(), "--workers")?),
            "--csv" => {
                options.csv_dir = Some(rest.next().ok_or("missing value for --csv")?.clone())
            }
            "--config" => {
                options.config_path = Some(rest.next().ok_or("missing value for --config")?.clone())
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            path if options.catalog_path.is_none() => options.catalog_path = Some(path.to_string()),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }
    Ok(options)
}

fn parse_flag_value<T: std::str::FromStr>(raw: Option<&String>, name: &str) -> Result<T, String> {
    let raw = raw.ok_or_else(|| format!("missing value for {name}"))?;
    raw.parse::<T>()
        .map_err(|_| format!("invalid value for {name}: '{raw}'"))
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("{USAGE}");
            return 2;
        }
    };

    match command {
        Command::Analyze => handle_analyze(&options),
        Command::Archetypes => handle_archetypes(&options),
        Command::Validate => handle_validate(&options),
        Command::Serve => handle_serve(),
    }
}

fn handle_serve() -> i32 {
    let bind_addr = env::var(ENV_BIND).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    match server::run_server(&bind_addr) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn load_catalog_for(options: &CliOptions) -> Result<StatCatalog, i32> {
    load_catalog_or_default(options.catalog_path.as_deref()).map_err(|err| {
        eprintln!("failed to load catalog: {err}");
        1
    })
}

/// File (or default file), then environment, then flags.
fn resolve_analysis_config(options: &CliOptions) -> Result<AnalysisConfig, i32> {
    let base = match &options.config_path {
        Some(path) => load_config(path)
            .and_then(|config| config.with_env_overrides(|key| env::var(key).ok())),
        None => resolve_config(),
    };
    let mut config = base.map_err(|err| {
        eprintln!("invalid configuration: {err}");
        1
    })?;
    if let Some(repetitions) = options.repetitions {
        config.repetitions = repetitions;
    }
    if let Some(seed) = options.seed {
        config.seed = seed;
    }
    if options.parallel {
        config.parallel = true;
    }
    if let Some(workers) = options.workers {
        config.workers = workers;
    }
    Ok(config)
}

fn handle_archetypes(options: &CliOptions) -> i32 {
    let catalog = match load_catalog_for(options) {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };
    let config = match resolve_analysis_config(options) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let checked = config.validate().and_then(|()| {
        catalog
            .check_boost_scale(config.boost_scale)
            .map_err(AnalysisError::from)
    });
    if let Err(err) = checked {
        eprintln!("invalid configuration: {err}");
        return 1;
    }
    let archetypes =
        ArchetypeGenerator::with_boost_scale(&catalog, config.boost_scale).generate_all();

    if options.table {
        println!("id\tname\tstats");
        for archetype in &archetypes {
            let stats = archetype
                .stats
                .iter()
                .map(|(id, value)| format!("{id}={value}"))
                .collect::<Vec<_>>()
                .join(",");
            println!("{}\t{}\t{}", archetype.id, archetype.name, stats);
        }
        return 0;
    }

    match serde_json::to_string_pretty(&archetypes) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize archetypes: {err}");
            1
        }
    }
}

fn handle_analyze(options: &CliOptions) -> i32 {
    let catalog = match load_catalog_for(options) {
        Ok(catalog) => catalog,
        Err(code) => return code,
    };
    let config = match resolve_analysis_config(options) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let test = StressTest::new(catalog, config);
    let simulator = DuelSimulator::default();
    let report = match test.run_concurrent(&simulator) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("analysis failed: {err}");
            return 1;
        }
    };

    if let Some(dir) = &options.csv_dir {
        match write_report_csv(dir, &report, &test.catalog) {
            Ok((utilities, synergies)) => tracing::info!(
                utilities = %utilities.display(),
                synergies = %synergies.display(),
                "wrote csv export"
            ),
            Err(err) => {
                eprintln!("failed to write csv export: {err}");
                return 1;
            }
        }
    }

    if options.table {
        print_report_table(&report);
        return 0;
    }

    match serde_json::to_string_pretty(&report) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize analysis report: {err}");
            1
        }
    }
}

fn print_report_table(report: &AnalysisReport) {
    println!("repetitions\tseed\tbaseline_score");
    println!("{}\t{}\t{:.4}", report.repetitions, report.seed, report.baseline_score);
    println!();
    println!("rank\tarchetype\taverage_score\tstd_dev\tmarginal_utility_pct");
    for ranked in rank_by_marginal_utility(&report.marginal_utilities) {
        println!(
            "{}\t{}\t{:.4}\t{:.4}\t{:+.2}",
            ranked.rank,
            ranked.archetype_id,
            ranked.average_score,
            ranked.standard_deviation,
            ranked.marginal_utility
        );
    }
    println!();
    println!("pair\tsynergy_multiplier\tclassification");
    for synergy in rank_synergies(&report.synergies) {
        println!(
            "{}\t{:.4}\t{}",
            synergy.pair_archetype.id,
            synergy.synergy_multiplier,
            synergy.classification().as_str()
        );
    }
}

fn handle_validate(options: &CliOptions) -> i32 {
    let Some(path) = options.catalog_path.as_deref() else {
        eprintln!("usage: balance_lab validate <path-to-catalog.json|yaml>");
        return 2;
    };

    match load_catalog(path).and_then(|catalog| {
        catalog.ensure_non_empty()?;
        Ok(catalog)
    }) {
        Ok(catalog) => {
            println!("validation passed: {path} ({} stats)", catalog.len());
            let ungrouped = catalog.ungrouped_stats();
            if !catalog.cards().is_empty() && !ungrouped.is_empty() {
                println!("note: stats without a card: {}", ungrouped.join(", "));
            }
            0
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}
