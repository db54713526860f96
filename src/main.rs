use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;

use adsmon::account::{AccountResult, AccountSummary};
use adsmon::config::Config;
use adsmon::insights::graph::GraphClient;
use adsmon::insights::{DatePreset, TimeWindow};
use adsmon::logging::{json_log, obj, v_num, v_str};
use adsmon::orchestrator::FetchOrchestrator;
use adsmon::present::{filter_summaries, screen_totals, sort_summaries, SortOrder, Visibility};

fn window_from_env() -> TimeWindow {
    std::env::var("WINDOW")
        .ok()
        .and_then(|t| TimeWindow::parse(&t))
        .unwrap_or(TimeWindow::Preset(DatePreset::Today))
}

fn render_account(summary: &AccountSummary) {
    let marker = if summary.total_spend > 0.0 { "*" } else { " " };
    println!(
        "{} {} | spend {:.2} | {} active campaigns | {} results",
        marker,
        summary.name,
        summary.total_spend,
        summary.active_campaigns(),
        summary.total_results()
    );
    for c in &summary.campaigns {
        let mut name = c.name.clone();
        if name.chars().count() > 38 {
            name = format!("{}...", name.chars().take(35).collect::<String>());
        }
        println!(
            "   {:<40} {:<16} {:<14} spend {:>8.2} | ctr {:>5.2}% | cpm {:>6.2} | results {:>4} | cpa {:>7.2}",
            name,
            format!("{} {}", c.health.glyph(), c.health.label()),
            c.objective.label(),
            c.spend,
            c.ctr,
            c.cpm,
            c.results,
            c.cpa
        );
    }
    if summary.campaigns.is_empty() {
        println!("   (no active campaigns in this window)");
    }
}

fn render_cycle(results: Vec<AccountResult>, sort: SortOrder, visibility: Visibility) {
    let summaries: Vec<AccountSummary> = results.into_iter().map(AccountResult::into_summary).collect();
    let mut visible = filter_summaries(summaries, visibility);
    sort_summaries(&mut visible, sort);

    println!("{}", "=".repeat(100));
    for summary in &visible {
        render_account(summary);
        println!("{}", "-".repeat(100));
    }

    let (count, total) = screen_totals(&visible);
    println!("{} accounts shown | total spend {:.2}", count, total);

    // Account-level day-by-day series, merged across accounts.
    let mut trend_days: std::collections::BTreeMap<String, f64> = std::collections::BTreeMap::new();
    for summary in &visible {
        for day in &summary.daily_trend {
            *trend_days.entry(day.date.clone()).or_insert(0.0) += day.spend;
        }
    }
    if !trend_days.is_empty() {
        println!("daily spend:");
        for (date, spend) in &trend_days {
            println!("   {} {:>10.2}", date, spend);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env()?;
    let client = Arc::new(GraphClient::new(&cfg)?);
    let orchestrator = FetchOrchestrator::new(
        client,
        Duration::from_secs(cfg.cache_ttl_secs),
        cfg.pool_size,
        cfg.include_trend,
    );

    let window = window_from_env();
    let sort = SortOrder::from_env();
    let visibility = Visibility::from_env();

    json_log(
        "main",
        "startup",
        obj(&[
            ("accounts", v_num(cfg.account_ids.len() as f64)),
            ("window", v_str(&window.cache_token())),
            ("refresh_secs", v_num(cfg.refresh_secs as f64)),
        ]),
    );

    loop {
        let results = orchestrator.fetch_all(&cfg.account_ids, &window).await;
        render_cycle(results, sort, visibility);

        // TV mode: the poll interval matches the cache TTL, so each wake-up
        // is a fresh fetch rather than a guaranteed cache hit.
        sleep(Duration::from_secs(cfg.refresh_secs)).await;
    }
}
