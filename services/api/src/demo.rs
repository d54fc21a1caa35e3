use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use hirelens::error::AppError;
use hirelens::postings::PostingId;
use hirelens::reports::{
    CreateReportRequest, PollPolicy, ReportJobService, ReportPoller, ReportPayload,
};

use crate::infra::{
    seeded_directory, seeded_scores, InMemoryReportJobStore, LoggingNotificationDispatcher,
    TextArtifactRenderer,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Posting to report on (101 closed, 102 in process, 103 draft)
    #[arg(long, default_value_t = 101)]
    pub(crate) posting: i64,
    /// Rank every scored candidate instead of the top ten
    #[arg(long)]
    pub(crate) include_all: bool,
    /// Emit the completion notification to the demo dispatcher
    #[arg(long)]
    pub(crate) notify: bool,
    /// Write the rendered artifact to this path after completion
    #[arg(long)]
    pub(crate) artifact_out: Option<PathBuf>,
    /// Polling budget for the demo client
    #[arg(long, default_value_t = 50)]
    pub(crate) max_attempts: u32,
    /// Polling interval in milliseconds
    #[arg(long, default_value_t = 100)]
    pub(crate) interval_ms: u64,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let dispatcher = Arc::new(LoggingNotificationDispatcher::default());
    let service = Arc::new(ReportJobService::new(
        Arc::new(InMemoryReportJobStore::default()),
        Arc::new(seeded_directory()),
        Arc::new(seeded_scores()),
        Arc::new(TextArtifactRenderer),
        dispatcher.clone(),
    ));

    let created = service.create_job(CreateReportRequest {
        posting_id: PostingId(args.posting),
        include_all: args.include_all,
        notify_by_email: args.notify,
    })?;
    println!(
        "created job {} for posting {} ({})",
        created.job_id,
        args.posting,
        created.state.label()
    );

    let poller = ReportPoller::new(PollPolicy {
        max_attempts: args.max_attempts,
        interval: Duration::from_millis(args.interval_ms),
    });
    let payload = poller
        .await_completion(service.as_ref(), &created.job_id)
        .await?;

    print_report(&payload);

    for notification in dispatcher.sent() {
        println!(
            "notified {} about artifact {}",
            notification.recipient, notification.artifact_ref
        );
    }

    if let Some(path) = args.artifact_out {
        let bytes = service.fetch_artifact(&created.job_id)?;
        std::fs::write(&path, &bytes)?;
        println!("artifact written to {} ({} bytes)", path.display(), bytes.len());
    }

    Ok(())
}

fn print_report(payload: &ReportPayload) {
    println!();
    println!(
        "== {} at {} ({}) ==",
        payload.posting.title, payload.company.name, payload.posting.location
    );
    for entry in &payload.ranking {
        println!(
            "{:>3}. {:<28} score {:>5.1}",
            entry.position, entry.name, entry.score
        );
    }

    let stats = &payload.statistics;
    println!(
        "\ncandidates {}  mean {:.1}  top tier {}  completion {:.0}%",
        stats.total_candidates, stats.mean_score, stats.top_tier_count, stats.completion_rate_pct
    );

    if let Some(summary) = &payload.executive_summary {
        println!(
            "recommended: {} - {}",
            summary.recommended_name, summary.primary_justification
        );
        for justification in &summary.secondary_justifications {
            println!("  + {justification}");
        }
    }

    if !payload.comparative.is_empty() {
        println!("\ncomparison of the top {}:", payload.top_detailed.len());
        for row in &payload.comparative {
            let cells: Vec<String> = row
                .entries
                .iter()
                .map(|entry| format!("{} {}", entry.name, entry.value))
                .collect();
            println!("  {:<20} {}", row.criterion, cells.join(" | "));
        }
    }
}
