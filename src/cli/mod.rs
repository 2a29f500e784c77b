//! Command-line interface handling and user interaction

mod args;
mod interaction;

pub use args::{Cli, Command, ListArgs, SortKeywordArgs, SortLabelArgs, SummaryArgs};
pub use interaction::{confirm, prompt_for_directory};

use log::info;

use scopesrt::listing::write_listing;
use scopesrt::models::{ChannelSet, MatchPolicy, SummaryConfig};
use scopesrt::organizer::{
    batch_summarize, sort_by_keyword, sort_by_label, KeywordRules, SortSummary, DEFAULT_LABELS,
};
use scopesrt::summary::{build_summary, default_output, SummaryOutcome};
use scopesrt::Result;

/// Run a parsed command
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Summary(args) => run_summary(args),
        Command::List(args) => run_list(args),
        Command::SortKeyword(args) => run_sort_keyword(args),
        Command::SortLabel(args) => run_sort_label(args),
    }
}

fn summary_config(args: &SummaryArgs) -> Result<SummaryConfig> {
    let channels = if args.channels.is_empty() {
        ChannelSet::default()
    } else {
        ChannelSet::parse_specs(&args.channels)?
    };
    let policy = if args.longest_match {
        MatchPolicy::LongestFirst
    } else {
        MatchPolicy::DeclaredOrder
    };
    Ok(SummaryConfig::new(channels, policy))
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let config = summary_config(&args)?;
    info!(
        "Channels: {} ({})",
        config
            .channels
            .iter()
            .map(|c| format!("{}={}", c.suffix, c.label))
            .collect::<Vec<_>>()
            .join(", "),
        config.match_policy
    );

    if let Some(batch_file) = &args.batch {
        let report = batch_summarize(batch_file, &config)?;
        for outcome in &report.completed {
            print_outcome(outcome);
        }
        println!(
            "\nBatch complete: {} decks written, {} lines skipped, {} folders failed",
            report.completed.len(),
            report.skipped.len(),
            report.failed.len()
        );
        return Ok(());
    }

    let dirs = if args.dirs.is_empty() {
        vec![prompt_for_directory()?]
    } else {
        args.dirs
    };
    let output = args
        .output
        .unwrap_or_else(|| default_output(&dirs[0]));

    let outcome = build_summary(&dirs, &output, &config)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &SummaryOutcome) {
    println!(
        "Wrote {} ({} slides, {} images, {} incomplete samples)",
        outcome.output.display(),
        outcome.report.slides,
        outcome.report.images,
        outcome.incomplete
    );
    if !outcome.report.warnings.is_empty() {
        println!("{} images could not be placed", outcome.report.warnings.len());
    }
}

fn run_list(args: ListArgs) -> Result<()> {
    let (output, count) = write_listing(&args.dir, args.output.as_deref())?;
    println!("Listed {} files into {}", count, output.display());
    Ok(())
}

fn run_sort_keyword(args: SortKeywordArgs) -> Result<()> {
    let rules = if args.rules.is_empty() {
        KeywordRules::default().with_default_folder(&args.default_folder)
    } else {
        KeywordRules::parse(&args.rules, &args.default_folder)?
    };

    if !args.dry_run
        && !args.yes
        && !confirm(&format!(
            "Move the files of {} into {}?",
            args.dir.display(),
            rules.folders().join(", ")
        ))?
    {
        println!("Nothing moved.");
        return Ok(());
    }

    let summary = sort_by_keyword(&args.dir, &rules, args.dry_run)?;
    print_sort_summary(&summary, args.dry_run);
    Ok(())
}

fn run_sort_label(args: SortLabelArgs) -> Result<()> {
    let labels: Vec<String> = if args.labels.is_empty() {
        DEFAULT_LABELS.iter().map(|l| l.to_string()).collect()
    } else {
        args.labels
    };

    if !args.dry_run
        && !args.yes
        && !confirm(&format!(
            "Move the files of {} into label folders {}?",
            args.dir.display(),
            labels.join(", ")
        ))?
    {
        println!("Nothing moved.");
        return Ok(());
    }

    let summary = sort_by_label(&args.dir, &labels, args.dry_run)?;
    print_sort_summary(&summary, args.dry_run);
    Ok(())
}

fn print_sort_summary(summary: &SortSummary, dry_run: bool) {
    let verb = if dry_run { "Would move" } else { "Moved" };
    println!(
        "{} {} files, skipped {}, failed {}",
        verb,
        summary.moved.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    for name in &summary.skipped {
        println!("  skipped: {}", name);
    }
    for name in &summary.failed {
        println!("  failed: {}", name);
    }
}
