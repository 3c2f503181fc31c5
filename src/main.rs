// Entry point and high-level CLI flow.
//
// One invocation produces one report:
// - load records for the requested kind from a CSV or JSON file,
// - validate the optional parameter file and `--set` overrides,
// - compose the report, write it under `<out>/<kind>/` with a unique name,
// - and print a text preview of the first lines to the console.
use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use work_reports::loader::{self, CsvRecord};
use work_reports::output::{JsonBackend, RenderBackend, TextBackend};
use work_reports::params::{self, ParamBag, ReportParams};
use work_reports::reports::{
    ConstructionProgressReport, EmployeeLoadReport, ReportComposer, ReportGenerator,
    TeamEfficiencyReport,
};
use work_reports::{storage, telemetry, util};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Construction,
    Employee,
    Team,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "work-reports", about = "Compose construction, workload and team efficiency reports")]
struct Cli {
    /// Report to generate.
    #[arg(value_enum)]
    kind: Kind,

    /// Records to report on (.csv or .json).
    #[arg(short, long)]
    input: PathBuf,

    /// JSON object with report parameters.
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Extra parameter as KEY=VALUE; VALUE is read as JSON when it parses.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Base directory for stored reports.
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Report language tag, e.g. `en` or `pl`.
    #[arg(long)]
    lang: Option<String>,

    /// Number of preview lines printed after writing; 0 disables the preview.
    #[arg(long, default_value_t = 30)]
    preview_lines: usize,

    /// Fallback log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "report generation failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let bag = param_bag(cli)?;
    match cli.kind {
        Kind::Construction => generate(ConstructionProgressReport, cli, &bag),
        Kind::Employee => generate(EmployeeLoadReport, cli, &bag),
        Kind::Team => generate(TeamEfficiencyReport, cli, &bag),
    }
}

fn param_bag(cli: &Cli) -> Result<ParamBag, Box<dyn Error>> {
    let mut bag = match &cli.params {
        Some(path) => match serde_json::from_str::<Value>(&fs::read_to_string(path)?)? {
            Value::Object(map) => map,
            _ => return Err(format!("{} must hold a JSON object", path.display()).into()),
        },
        None => ParamBag::new(),
    };
    for entry in &cli.overrides {
        let (key, raw) = entry
            .split_once('=')
            .ok_or_else(|| format!("--set expects KEY=VALUE, got '{entry}'"))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        bag.insert(key.trim().to_string(), value);
    }
    if let Some(lang) = &cli.lang {
        bag.insert(params::LANGUAGE.to_string(), Value::String(lang.clone()));
    }
    Ok(bag)
}

fn generate<C>(composer: C, cli: &Cli, bag: &ParamBag) -> Result<(), Box<dyn Error>>
where
    C: ReportComposer,
    C::Record: CsvRecord,
{
    let (records, load) = loader::load_records::<C::Record>(&cli.input)?;
    println!(
        "Processing dataset... ({} rows read, {} loaded)",
        util::format_int(load.total_rows as u64),
        util::format_int(load.loaded_rows as u64)
    );
    if load.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to parse/validation errors.",
            util::format_int(load.parse_errors as u64)
        );
    }

    let params = ReportParams::from_bag(bag)?;
    let kind = C::KIND.slug();
    let (path, tree) = match cli.format {
        Format::Text => {
            let generator = ReportGenerator::new(composer, TextBackend::default());
            write_report(&generator, &records, &params, &cli.out, kind)?
        }
        Format::Json => {
            let generator = ReportGenerator::new(composer, JsonBackend);
            write_report(&generator, &records, &params, &cli.out, kind)?
        }
    };
    info!(kind, path = %path.display(), "report generated");

    if cli.preview_lines > 0 {
        println!();
        let text = TextBackend::default().render_string(&tree)?;
        for line in text.lines().take(cli.preview_lines) {
            println!("{line}");
        }
        println!();
    }
    println!("(Full report exported to {})", path.display());
    Ok(())
}

fn write_report<C, B>(
    generator: &ReportGenerator<C, B>,
    records: &[C::Record],
    params: &ReportParams,
    base: &Path,
    kind: &str,
) -> Result<(PathBuf, work_reports::BlockTree), Box<dyn Error>>
where
    C: ReportComposer,
    B: RenderBackend,
{
    let tree = generator.compose_with(records, params);
    let name = storage::unique_file_name(kind, generator.backend().extension());
    let dest = storage::resolve_report_path(base, kind, &name)?;
    let path = generator.backend().materialize_to(&tree, &dest)?;
    Ok((path, tree))
}
