use std::path::Path;

use askgod_domain::{AdminTeam, AdminTeamPost};
use comfy_table::{presets, Table};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::client::Client;
use crate::utils;

pub async fn list(client: &Client) -> anyhow::Result<()> {
    let teams: Vec<AdminTeam> = client.query(Method::GET, "/teams", None::<&()>).await?;

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(["ID", "Name", "Country", "Website", "Subnets", "Notes", "Tags"]);

    for team in teams {
        table.add_row([
            team.id.to_string(),
            team.name.clone(),
            team.country.clone(),
            team.website.clone(),
            team.subnets.clone(),
            team.notes.clone(),
            utils::render_tags(&team.tags),
        ]);
    }

    println!("{}", table);
    Ok(())
}

pub async fn add(client: &Client, fields: Vec<String>) -> anyhow::Result<()> {
    let mut record = Map::new();
    utils::apply_fields(&mut record, &fields)?;

    client
        .query_unit(Method::POST, "/teams", Some(&Value::Object(record)))
        .await
}

pub async fn update(client: &Client, id: i64, fields: Vec<String>) -> anyhow::Result<()> {
    let existing: AdminTeam = client
        .query(Method::GET, &format!("/teams/{}", id), None::<&()>)
        .await?;

    let mut record = match serde_json::to_value(&existing)? {
        Value::Object(record) => record,
        _ => Map::new(),
    };
    record.remove("id");
    utils::apply_fields(&mut record, &fields)?;

    client
        .query_unit(
            Method::PUT,
            &format!("/teams/{}", id),
            Some(&Value::Object(record)),
        )
        .await
}

pub async fn delete(client: &Client, id: i64) -> anyhow::Result<()> {
    client
        .query_unit(Method::DELETE, &format!("/teams/{}", id), None::<&()>)
        .await
}

pub async fn import(client: &Client, filename: &Path, flush: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(filename)?;
    let teams: Vec<AdminTeamPost> = serde_json::from_str(&content)?;

    if flush {
        client
            .query_unit(Method::DELETE, "/teams?empty=1", None::<&()>)
            .await?;
    }

    client
        .query_unit(Method::POST, "/teams?bulk=1", Some(&teams))
        .await?;

    println!("Imported {} teams", teams.len());
    Ok(())
}
