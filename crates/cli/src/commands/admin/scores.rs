use askgod_domain::AdminScore;
use chrono::Local;
use comfy_table::{presets, Table};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::client::Client;
use crate::commands::TIME_LAYOUT;
use crate::utils;

fn score_table(scores: &[AdminScore]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(["ID", "Team", "Flag", "Value", "Submitted", "Notes"]);

    for score in scores {
        table.add_row([
            score.id.to_string(),
            score.team_id.to_string(),
            score.flag_id.to_string(),
            score.value.to_string(),
            score
                .submit_time
                .with_timezone(&Local)
                .format(TIME_LAYOUT)
                .to_string(),
            score.notes.clone(),
        ]);
    }

    table
}

pub async fn list(client: &Client) -> anyhow::Result<()> {
    let scores: Vec<AdminScore> = client.query(Method::GET, "/scores", None::<&()>).await?;

    println!("{}", score_table(&scores));
    Ok(())
}

/// All score entries for one team, oldest first.
pub async fn history(client: &Client, team_id: i64) -> anyhow::Result<()> {
    let mut scores: Vec<AdminScore> = client.query(Method::GET, "/scores", None::<&()>).await?;

    scores.retain(|s| s.team_id == team_id);
    scores.sort_by_key(|s| s.submit_time);

    println!("{}", score_table(&scores));
    Ok(())
}

pub async fn add(client: &Client, fields: Vec<String>) -> anyhow::Result<()> {
    let mut record = Map::new();
    utils::apply_fields(&mut record, &fields)?;

    client
        .query_unit(Method::POST, "/scores", Some(&Value::Object(record)))
        .await
}

pub async fn update(client: &Client, id: i64, fields: Vec<String>) -> anyhow::Result<()> {
    let existing: AdminScore = client
        .query(Method::GET, &format!("/scores/{}", id), None::<&()>)
        .await?;

    let mut record = Map::new();
    record.insert("value".to_string(), existing.value.into());
    record.insert("notes".to_string(), Value::String(existing.notes));
    utils::apply_fields(&mut record, &fields)?;

    client
        .query_unit(
            Method::PUT,
            &format!("/scores/{}", id),
            Some(&Value::Object(record)),
        )
        .await
}

pub async fn delete(client: &Client, id: i64) -> anyhow::Result<()> {
    client
        .query_unit(Method::DELETE, &format!("/scores/{}", id), None::<&()>)
        .await
}
