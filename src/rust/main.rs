use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use expert_panel::{
    analyze, CaseDefinition, ClientRecord, ExpertError, ExpertRegistry, Report, TableSource,
    TrainingTable, TreeConfig,
};
use log::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file or URL of the training table (Google Sheets share links are accepted)
    #[arg(short, long, env = "EXPERT_PANEL_SOURCE")]
    source: Option<String>,

    /// Case to train, as NAME=TARGET or NAME=TARGET@SOURCE
    #[arg(short, long = "case", default_value = "Case 1=PRODUTO")]
    cases: Vec<String>,

    /// Maximum depth of each decision tree
    #[arg(long, env = "EXPERT_PANEL_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Value of an input column, as COLUMN=VALUE; missing columns are prompted for
    #[arg(short = 'v', long = "value")]
    values: Vec<String>,

    /// Also write the report as CSV to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// A `--case` argument: the case and the source it overrides, if any.
#[derive(Debug, PartialEq)]
struct CaseSpec {
    case: CaseDefinition,
    source: Option<String>,
}

fn parse_case(spec: &str) -> Result<CaseSpec> {
    let Some((name, rest)) = spec.split_once('=') else {
        bail!("Invalid case '{}', expected NAME=TARGET[@SOURCE]", spec);
    };
    let (target, source) = match rest.split_once('@') {
        Some((target, source)) => (target, Some(source.trim().to_string())),
        None => (rest, None),
    };
    if name.trim().is_empty() || target.trim().is_empty() {
        bail!("Invalid case '{}', name and target cannot be empty", spec);
    }
    Ok(CaseSpec {
        case: CaseDefinition::new(name, target),
        source: source.filter(|s| !s.is_empty()),
    })
}

fn parse_value(spec: &str) -> Result<(String, String)> {
    match spec.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), value.trim().to_string()))
        }
        _ => bail!("Invalid value '{}', expected COLUMN=VALUE", spec),
    }
}

async fn build_registry(
    specs: Vec<CaseSpec>,
    default_source: Option<&str>,
    config: TreeConfig,
) -> Result<ExpertRegistry> {
    let mut tables: HashMap<String, Result<TrainingTable, ExpertError>> = HashMap::new();
    let mut builder = ExpertRegistry::builder().with_config(config);

    for spec in specs {
        let Some(location) = spec.source.as_deref().or(default_source) else {
            error!("Case '{}' has no training table source", spec.case.case_id);
            builder = builder.add_unavailable_case(
                spec.case,
                ExpertError::DataSource("No training table source given".into()),
            )?;
            continue;
        };

        if !tables.contains_key(location) {
            let source = TableSource::parse(location);
            let loaded = source.load().await;
            if let Err(e) = &loaded {
                error!("Failed to load training table from {}: {}", source, e);
            }
            tables.insert(location.to_string(), loaded);
        }

        builder = match &tables[location] {
            Ok(table) => builder.add_case(spec.case, table.clone())?,
            Err(e) => builder.add_unavailable_case(spec.case, e.clone())?,
        };
    }

    Ok(builder.build())
}

fn collect_record(registry: &ExpertRegistry, values: &[String]) -> Result<ClientRecord> {
    let mut record = ClientRecord::new();
    for spec in values {
        let (column, value) = parse_value(spec)?;
        record.set(column, value);
    }

    let missing: Vec<String> = registry
        .input_columns()
        .into_iter()
        .filter(|c| !record.contains(c))
        .collect();
    if missing.is_empty() {
        return Ok(record);
    }

    println!("********** Answer the questions below (do not use accents) **********");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    for column in missing {
        print!("{}: ", column);
        io::stdout().flush()?;
        let value = match lines.next() {
            Some(line) => line.context("Failed to read from stdin")?,
            None => String::new(),
        };
        record.set(column, value.trim());
    }
    Ok(record)
}

fn print_report(report: &Report) {
    println!("\n================== ANALYSIS REPORT ==================");
    if report.is_empty() {
        println!("No analysis possible: no expert produced a verdict.");
    } else {
        for (analysis, label) in report.iter() {
            println!("-> {}: {}", analysis, label);
        }
    }
    println!("=====================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("=== Starting Expert Panel ===");
    let start_time = Instant::now();

    let specs = args
        .cases
        .iter()
        .map(|c| parse_case(c))
        .collect::<Result<Vec<_>>>()?;
    let config = TreeConfig::default().with_max_depth(args.max_depth);
    config.validate()?;

    let registry = build_registry(specs, args.source.as_deref(), config).await?;
    info!(
        "=== {} Expert(s) Trained (took {:.2?}) ===",
        registry.len(),
        start_time.elapsed()
    );
    for (case_id, err) in registry.failures() {
        eprintln!("Case '{}' is unavailable: {}", case_id, err);
    }

    let report = if registry.is_empty() {
        Report::default()
    } else {
        let record = collect_record(&registry, &args.values)?;
        analyze(&record, &registry)
    };
    print_report(&report);

    if let Some(path) = args.output {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        report.write_csv(file)?;
        info!("Report written to {}", path.display());
    }

    info!("Total time: {:.2?}", start_time.elapsed());
    Ok(())
}
