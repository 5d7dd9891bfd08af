use askgod_domain::TimelineEntry;
use chrono::Local;
use comfy_table::{presets, Table};
use reqwest::Method;

use super::TIME_LAYOUT;
use crate::client::Client;

pub async fn run(client: &Client) -> anyhow::Result<()> {
    let entries: Vec<TimelineEntry> = client.query(Method::GET, "/timeline", None::<&()>).await?;

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(["Team", "Flags", "Total", "Last submit"]);

    for entry in entries {
        let total = entry.score.last().map(|s| s.total).unwrap_or(0);
        let last = entry
            .score
            .last()
            .map(|s| {
                s.submit_time
                    .with_timezone(&Local)
                    .format(TIME_LAYOUT)
                    .to_string()
            })
            .unwrap_or_default();

        table.add_row([
            format!("<{}> {}", entry.team.country, entry.team.name),
            entry.score.len().to_string(),
            total.to_string(),
            last,
        ]);
    }

    println!("{}", table);
    Ok(())
}
