//! Stats command

use colored::Colorize;
use serde::Serialize;

use crate::errors::Result;
use crate::hits::{HitService, HittableRef};
use crate::interfaces::cli::CliError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetStats {
    pub hittable_type: String,
    pub hittable_id: i64,
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
    pub unique_visitors: u64,
}

/// 汇总单个实体的计数
pub async fn collect_stats(service: &HitService, target: HittableRef) -> Result<TargetStats> {
    let tracker = service.tracker_for(target);

    Ok(TargetStats {
        hittable_type: tracker.target().kind().to_string(),
        hittable_id: tracker.target().id(),
        total: tracker.total_hits_count().await?,
        today: tracker.today_hits_count().await?,
        this_week: tracker.this_week_hits_count().await?,
        this_month: tracker.this_month_hits_count().await?,
        unique_visitors: tracker.unique_visitors_count().await?,
    })
}

pub async fn show_stats(
    service: &HitService,
    kind: String,
    id: i64,
    json: bool,
) -> std::result::Result<(), CliError> {
    let stats = collect_stats(service, HittableRef::new(kind, id)).await?;

    if json {
        let output = serde_json::to_string_pretty(&stats)
            .map_err(|e| CliError::CommandError(format!("Failed to serialize stats: {}", e)))?;
        println!("{}", output);
        return Ok(());
    }

    println!(
        "{} {}#{}",
        "Hits for".bold(),
        stats.hittable_type.cyan(),
        stats.hittable_id.to_string().cyan()
    );
    println!("  {:<16} {}", "total", stats.total.to_string().magenta());
    println!("  {:<16} {}", "today", stats.today);
    println!("  {:<16} {}", "this week", stats.this_week);
    println!("  {:<16} {}", "this month", stats.this_month);
    println!("  {:<16} {}", "unique visitors", stats.unique_visitors);
    Ok(())
}
