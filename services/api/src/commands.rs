use chrono::{NaiveDate, Utc};
use clap::{ArgGroup, Args};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use usmca_compliance::config::AppConfig;
use usmca_compliance::error::AppError;
use usmca_compliance::telemetry;
use usmca_compliance::workflows::numeric::DeclaredNumber;
use usmca_compliance::workflows::qualification::{
    ComponentSubmission, QualificationEvaluator, QualificationReport,
};
use usmca_compliance::workflows::savings::SavingsEstimator;
use usmca_compliance::workflows::tariff_cache::{
    assess_cache_health, import_records_from_path, CacheValidator, FilterOptions, HealthStatus,
};

#[derive(Args, Debug)]
pub(crate) struct QualifyArgs {
    /// Product business type (automotive, textiles, electronics, ...)
    #[arg(long)]
    pub(crate) business_type: String,
    /// Component as ORIGIN:PERCENT[:DESCRIPTION]; repeat for each line
    #[arg(long = "component", value_parser = parse_component_arg)]
    pub(crate) components: Vec<ComponentSubmission>,
    /// CSV with description, origin_country, value_percentage[, hs_code]
    #[arg(long)]
    pub(crate) components_csv: Option<PathBuf>,
    /// Product name printed on the report
    #[arg(long)]
    pub(crate) product: Option<String>,
    /// Print the raw result as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("volume").required(true).args(["annual_value", "trade_volume"])))]
pub(crate) struct SavingsArgs {
    /// Annual import value in dollars
    #[arg(long)]
    pub(crate) annual_value: Option<f64>,
    /// Free-text trade volume such as "$1M - $5M" or "750K"
    #[arg(long)]
    pub(crate) trade_volume: Option<String>,
    /// MFN duty rate as a decimal fraction (0.25 = 25%)
    #[arg(long)]
    pub(crate) mfn_rate: f64,
    /// USMCA preferential rate as a decimal fraction
    #[arg(long)]
    pub(crate) usmca_rate: f64,
}

#[derive(Args, Debug)]
pub(crate) struct CacheValidateArgs {
    /// Tariff cache CSV export
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date for freshness checks (defaults to today, UTC)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Stop at the first invalid record
    #[arg(long)]
    pub(crate) fail_fast: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CacheHealthArgs {
    /// Tariff cache CSV export
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Evaluation date for freshness checks (defaults to today, UTC)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Exit 1 on critical findings and 2 on warnings
    #[arg(long)]
    pub(crate) alert: bool,
}

pub(crate) fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_qualify(args: QualifyArgs) -> Result<ExitCode, AppError> {
    let config = load_config()?;
    let QualifyArgs {
        business_type,
        mut components,
        components_csv,
        product,
        json,
    } = args;

    if let Some(path) = components_csv {
        components.extend(read_components_csv(&path)?);
    }

    let evaluator = QualificationEvaluator::new(config.qualification);
    let result = evaluator.evaluate_submissions(components, &business_type)?;

    if json {
        print_json(&result)?;
    } else {
        let report = QualificationReport::build(product.as_deref().unwrap_or("Unnamed product"), &result);
        print!("{}", report.render_text());
    }

    Ok(ExitCode::SUCCESS)
}

pub(crate) fn run_savings(args: SavingsArgs) -> Result<ExitCode, AppError> {
    let config = load_config()?;
    let estimator = SavingsEstimator::new(config.savings);

    let annual_import_value = match (args.annual_value, args.trade_volume.as_deref()) {
        (Some(value), _) => value,
        (None, Some(raw)) => estimator.trade_volume(raw),
        (None, None) => {
            return Err(AppError::Usage(
                "--annual-value or --trade-volume is required".to_string(),
            ))
        }
    };

    let estimate = estimator.estimate(annual_import_value, args.mfn_rate, args.usmca_rate)?;
    print_json(&estimate)?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn run_cache_validate(args: CacheValidateArgs) -> Result<ExitCode, AppError> {
    let config = load_config()?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let validator = CacheValidator::new(config.tariff_cache).as_of(today);
    let records = import_records_from_path(&args.input)?;
    info!(path = %args.input.display(), records = records.len(), "loaded tariff cache export");

    if args.fail_fast {
        let kept = validator.filter_valid_records(
            records,
            FilterOptions {
                throw_on_error: true,
            },
        )?;
        println!("{} records passed validation", kept.len());
        return Ok(ExitCode::SUCCESS);
    }

    let report = validator.validate_batch(&records);
    print_json(&report)?;

    if report.all_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

pub(crate) fn run_cache_health(args: CacheHealthArgs) -> Result<ExitCode, AppError> {
    let config = load_config()?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let records = import_records_from_path(&args.input)?;

    let report = assess_cache_health(&records, today, &config.tariff_cache);
    print!("{}", report.render_text());

    if args.alert && report.status != HealthStatus::Healthy {
        return Ok(ExitCode::from(report.status.exit_code()));
    }
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    println!("{rendered}");
    Ok(())
}

/// `ORIGIN:PERCENT[:DESCRIPTION]`. The percentage is validated later by the intake guard.
pub(crate) fn parse_component_arg(raw: &str) -> Result<ComponentSubmission, String> {
    let mut parts = raw.splitn(3, ':');
    let origin = parts.next().map(str::trim).unwrap_or_default();
    let percent = parts.next().map(str::trim);

    match (origin, percent) {
        ("", _) | (_, None) => Err(format!(
            "expected ORIGIN:PERCENT[:DESCRIPTION], got '{raw}'"
        )),
        (origin, Some(percent)) => {
            let description = parts
                .next()
                .map(str::trim)
                .filter(|description| !description.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{origin} component"));
            Ok(ComponentSubmission {
                description,
                origin_country: origin.to_string(),
                value_percentage: DeclaredNumber::from_cell(percent),
                hs_code: None,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComponentRow {
    description: String,
    origin_country: String,
    value_percentage: String,
    #[serde(default)]
    hs_code: Option<String>,
}

fn read_components_csv(path: &Path) -> Result<Vec<ComponentSubmission>, AppError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    reader
        .deserialize::<ComponentRow>()
        .map(|row| {
            let row = row.map_err(|err| AppError::Usage(format!("{}: {err}", path.display())))?;
            Ok(ComponentSubmission {
                description: row.description,
                origin_country: row.origin_country,
                value_percentage: DeclaredNumber::from_cell(&row.value_percentage),
                hs_code: row.hs_code.filter(|code| !code.is_empty()),
            })
        })
        .collect()
}
