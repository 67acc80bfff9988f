use crate::commands::load_config;
use crate::infra::InMemoryTariffCacheRepository;
use chrono::{NaiveDate, Utc};
use clap::Args;
use std::process::ExitCode;
use std::sync::Arc;
use usmca_compliance::error::AppError;
use usmca_compliance::workflows::qualification::{
    Component, QualificationEvaluator, QualificationReport, QualificationResult,
};
use usmca_compliance::workflows::savings::SavingsEstimator;
use usmca_compliance::workflows::tariff_cache::{
    IngestMode, RateField, TariffCacheRecord, TariffCacheService,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the evaluation date (defaults to today, UTC)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print full qualification reports instead of one-line summaries
    #[arg(long)]
    pub(crate) reports: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<ExitCode, AppError> {
    let config = load_config()?;
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());

    println!("USMCA compliance demo ({today})");

    let evaluator = QualificationEvaluator::new(config.qualification.clone());
    println!("\nQualification");
    let textiles = evaluator.evaluate(
        &[
            Component::new("Cotton fabric", "US", 60.0),
            Component::new("Buttons and thread", "MX", 15.0),
            Component::new("Assembly", "CA", 25.0),
        ],
        "textiles",
    )?;
    render_result("Cotton shirt", &textiles, args.reports);

    let electronics = evaluator.evaluate(
        &[
            Component::new("Display panel", "TW", 45.0),
            Component::new("Enclosure", "MX", 30.0),
            Component::new("Firmware and assembly", "CA", 25.0),
        ],
        "electronics",
    )?;
    render_result("Tablet", &electronics, args.reports);

    let estimator = SavingsEstimator::new(config.savings);
    let estimate = estimator.estimate(10_000_000.0, 0.25, 0.0)?;
    println!("\nSavings");
    println!(
        "- $10,000,000 imports at 25% MFN vs 0% USMCA: ${:.0}/year (${:.0}/month)",
        estimate.annual_savings, estimate.monthly_savings
    );

    println!("\nTariff cache gate");
    let repository = Arc::new(InMemoryTariffCacheRepository::default());
    let service = TariffCacheService::new(repository, config.tariff_cache, estimator).as_of(today);

    let records = vec![
        TariffCacheRecord::new("73269070")
            .with_rate(RateField::MfnRate, 0.25)
            .with_source("USTR Federal Register Notice 2024-xyz")
            .verified_on(today - chrono::Duration::days(40)),
        TariffCacheRecord::new("7326.9070")
            .with_rate(RateField::MfnRate, 25.0)
            .with_source("Legacy sync job")
            .verified_on(today),
    ];

    let summary = service.ingest(records, IngestMode::SkipInvalid)?;
    println!(
        "- {} inserted, {} rejected, {} warnings",
        summary.inserted, summary.rejected, summary.validation.warning_count
    );
    for entry in summary.validation.results.iter().filter(|entry| !entry.result.valid) {
        for issue in &entry.result.errors {
            println!(
                "  record {} {}: {} ({})",
                entry.index,
                issue.field,
                issue.code.as_str(),
                issue.message
            );
        }
    }

    let savings = service.estimate_savings("7326.90.7000", 1_000_000.0)?;
    println!(
        "- Lookup 7326.90.7000 matched {} ({:?}): ${:.0}/year on $1,000,000",
        savings.lookup.matched_hs_code, savings.lookup.match_type, savings.estimate.annual_savings
    );

    let health = service.health()?;
    println!("- Cache health: {:?}", health.status);

    Ok(ExitCode::SUCCESS)
}

fn render_result(product: &str, result: &QualificationResult, full_report: bool) {
    if full_report {
        print!("{}", QualificationReport::build(product, result).render_text());
    } else {
        println!("- {product}: {}", result.summary());
    }
}
