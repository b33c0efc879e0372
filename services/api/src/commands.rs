use crate::infra::parse_answer;
use afterly::config::AppConfig;
use afterly::error::AppError;
use afterly::telemetry::{self, LogSink};
use afterly::workflows::assessment::{AssessmentCatalog, AssessmentOutcome, Category};
use afterly::workflows::waitlist::{
    DeliveryStatus, SignupContext, SubmissionReceipt, WaitlistRegistrar,
};
use clap::Args;
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Selected option per question, e.g. `--answer q1=0`. Repeat for every question.
    #[arg(long = "answer", value_name = "QUESTION=OPTION", value_parser = parse_answer)]
    pub(crate) answers: Vec<(String, usize)>,
}

#[derive(Args, Debug)]
pub(crate) struct WaitlistJoinArgs {
    /// Email address to register
    #[arg(long)]
    pub(crate) email: String,
    /// Referring page recorded with the signup
    #[arg(long)]
    pub(crate) referrer: Option<String>,
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    let catalog = AssessmentCatalog::standard();
    println!(
        "LegacyScore assessment: {} questions, {} points available",
        catalog.len(),
        catalog.max_score()
    );

    for category in Category::ordered() {
        let questions = catalog.questions_in(category);
        if questions.is_empty() {
            continue;
        }
        println!("\n{}", category.label());
        for question in questions {
            println!("  [{}] {}", question.id, question.prompt);
            for (index, option) in question.options.iter().enumerate() {
                println!("      {index}) {} ({} pts)", option.label, option.points);
            }
        }
    }

    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let catalog = AssessmentCatalog::standard();
    let indices: BTreeMap<String, usize> = args.answers.into_iter().collect();
    let answers = catalog.answers_from_indices(&indices)?;
    let outcome = AssessmentOutcome::evaluate(catalog, &answers)?;
    render_outcome(&outcome);
    Ok(())
}

fn render_outcome(outcome: &AssessmentOutcome) {
    println!("Score: {} / {}", outcome.score, outcome.max_score);
    println!("Tier: {}", outcome.profile.label);
    println!("{}", outcome.profile.headline);

    println!("\nBy category");
    for category in &outcome.categories {
        println!(
            "  {:<28} {:>3} / {:<3}",
            category.label, category.earned, category.available
        );
    }

    if let Some(weakest) = outcome.gaps().first() {
        if weakest.earned < weakest.available {
            println!("\nLargest gap: {}", weakest.label);
        }
    }

    println!("\nQuick wins");
    for item in outcome.profile.quick_wins {
        println!("  - {item}");
    }
    println!("\nNext level");
    for item in outcome.profile.next_level {
        println!("  - {item}");
    }
}

pub(crate) async fn run_waitlist_join(args: WaitlistJoinArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_with_sink(&config.telemetry, LogSink::Stderr)?;

    let registrar = WaitlistRegistrar::from_config(&config.waitlist)?;
    let receipt = join_waitlist(&registrar, args).await?;
    print!("{}", render_receipt(&receipt));
    Ok(())
}

async fn join_waitlist(
    registrar: &WaitlistRegistrar,
    args: WaitlistJoinArgs,
) -> Result<SubmissionReceipt, AppError> {
    let context = SignupContext::new(args.referrer, Some(cli_user_agent()));
    Ok(registrar.submit(&args.email, context).await?)
}

fn render_receipt(receipt: &SubmissionReceipt) -> String {
    let mut out = format!(
        "{} joined the waitlist at position #{}\n",
        receipt.record.email, receipt.record.waitlist_number
    );
    for delivery in &receipt.deliveries {
        let status = match &delivery.status {
            DeliveryStatus::Delivered => "delivered".to_string(),
            DeliveryStatus::NotConfigured => "skipped (not configured)".to_string(),
            DeliveryStatus::Failed { reason } => format!("failed: {reason}"),
        };
        let _ = writeln!(out, "  {:<12} {status}", delivery.endpoint);
    }
    out
}

fn cli_user_agent() -> String {
    format!("afterly-cli/{}", env!("CARGO_PKG_VERSION"))
}
