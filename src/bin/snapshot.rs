//! One-shot console snapshot: a single sequential pass over every
//! configured account, printed as a plain-text table. No pool, no cache.

use anyhow::Result;

use adsmon::account::{fetch_account, AccountResult};
use adsmon::config::Config;
use adsmon::health::Thresholds;
use adsmon::insights::graph::GraphClient;
use adsmon::insights::{DatePreset, TimeWindow};

fn clip(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        format!("{}...", name.chars().take(max - 3).collect::<String>())
    } else {
        name.to_string()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env()?;
    let client = GraphClient::new(&cfg)?;
    let thresholds = Thresholds::default();
    let window = std::env::var("WINDOW")
        .ok()
        .and_then(|t| TimeWindow::parse(&t))
        .unwrap_or(TimeWindow::Preset(DatePreset::Today));

    println!("Monitoring {} accounts ({})\n", cfg.account_ids.len(), window.cache_token());

    for account_id in &cfg.account_ids {
        let result = fetch_account(&client, account_id, &window, &thresholds, false).await;

        match result {
            AccountResult::Failed { account_id, reason } => {
                println!("[{}] FAILED: {}\n", account_id, reason);
            }
            AccountResult::Ok(summary) => {
                println!("[{}] {}", summary.account_id, summary.name);
                if summary.campaigns.is_empty() {
                    println!("   >> no active campaigns spending in this window\n");
                    println!("{}\n", "=".repeat(78));
                    continue;
                }

                println!("   {:<40} | {:<10} | {:<8} | {:<6}", "CAMPAIGN", "SPEND", "CLICKS", "CPC");
                println!("   {}", "-".repeat(75));
                for c in &summary.campaigns {
                    println!(
                        "   {:<40} | {:<10.2} | {:<8} | {:<6.2}",
                        clip(&c.name, 38),
                        c.spend,
                        c.clicks,
                        c.cpc
                    );
                }
                println!("   {}", "-".repeat(75));
                println!("   TOTAL SPEND: {:.2}", summary.total_spend);
                println!("{}\n", "=".repeat(78));
            }
        }
    }

    Ok(())
}
