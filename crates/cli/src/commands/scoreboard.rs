use askgod_domain::ScoreboardEntry;
use chrono::Local;
use comfy_table::{presets, Table};
use futures::StreamExt;
use reqwest::Method;
use tokio_tungstenite::tungstenite::Message;

use super::TIME_LAYOUT;
use crate::client::Client;

pub async fn run(client: &Client, live: bool) -> anyhow::Result<()> {
    print_scoreboard(client).await?;

    if !live {
        return Ok(());
    }

    // Redraw on every timeline event.
    let (_sink, mut events) = client.events("timeline").await?;

    while let Some(frame) = events.next().await {
        match frame {
            Ok(Message::Text(_)) => {
                // Clear the screen and redraw from the top.
                print!("\x1b[2J\x1b[H");
                print_scoreboard(client).await?;
            }
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    Ok(())
}

async fn print_scoreboard(client: &Client) -> anyhow::Result<()> {
    let entries: Vec<ScoreboardEntry> = client.query(Method::GET, "/scoreboard", None::<&()>).await?;

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(["Team", "Points", "Last submit"]);

    for entry in entries {
        table.add_row([
            format!("<{}> {}", entry.team.country, entry.team.name),
            entry.value.to_string(),
            entry
                .last_submit_time
                .with_timezone(&Local)
                .format(TIME_LAYOUT)
                .to_string(),
        ]);
    }

    println!("{}", table);
    Ok(())
}
