use askgod_domain::{Event, EventFlag, EventLogging, SubmissionResult};
use chrono::Local;
use futures::StreamExt;
use tokio_tungstenite::tungstenite::Message;

use crate::client::Client;
use crate::utils;

const LEVELS: &[&str] = &["critical", "error", "warn", "info", "debug"];

fn level_rank(level: &str) -> usize {
    LEVELS
        .iter()
        .position(|l| *l == level)
        .unwrap_or(LEVELS.len())
}

/// Follow the server log over the websocket.
pub async fn logs(client: &Client, loglevel: &str) -> anyhow::Result<()> {
    let threshold = level_rank(loglevel);

    let (_sink, mut events) = client.events("logging").await?;

    while let Some(frame) = events.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };

        let Ok(event) = serde_json::from_str::<Event>(&text) else {
            continue;
        };

        let Ok(record) = serde_json::from_value::<EventLogging>(event.metadata) else {
            continue;
        };

        if level_rank(&record.level) > threshold {
            continue;
        }

        let context = record
            .context
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");

        println!(
            "[{}] {} {}: {} {}",
            event.server,
            event.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            record.level.to_uppercase(),
            record.message,
            context
        );
    }

    Ok(())
}

/// Follow flag submissions as they happen.
pub async fn flags(client: &Client) -> anyhow::Result<()> {
    let (_sink, mut events) = client.events("flags").await?;

    while let Some(frame) = events.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };

        let Ok(event) = serde_json::from_str::<Event>(&text) else {
            continue;
        };

        let Ok(submission) = serde_json::from_value::<EventFlag>(event.metadata) else {
            continue;
        };

        let stamp = event.timestamp.with_timezone(&Local).format("%H:%M:%S");

        match (submission.result, &submission.flag) {
            (SubmissionResult::Valid, Some(flag)) => println!(
                "[{}] {} team \"{}\" ({}) scored {} with \"{}\" (flag {} {})",
                event.server,
                stamp,
                submission.team.name,
                submission.team.id,
                submission.value,
                submission.input,
                flag.id,
                utils::render_tags(&flag.tags),
            ),
            (SubmissionResult::Duplicate, Some(flag)) => println!(
                "[{}] {} team \"{}\" ({}) resubmitted \"{}\" (flag {})",
                event.server,
                stamp,
                submission.team.name,
                submission.team.id,
                submission.input,
                flag.id,
            ),
            _ => println!(
                "[{}] {} team \"{}\" ({}) sent invalid flag \"{}\"",
                event.server, stamp, submission.team.name, submission.team.id, submission.input,
            ),
        }
    }

    Ok(())
}
