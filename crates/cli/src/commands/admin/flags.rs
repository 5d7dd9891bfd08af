use std::path::Path;

use askgod_domain::{AdminFlag, AdminFlagPost};
use comfy_table::{presets, Table};
use reqwest::Method;
use serde_json::{Map, Value};

use crate::client::Client;
use crate::utils;

pub async fn list(client: &Client) -> anyhow::Result<()> {
    let flags: Vec<AdminFlag> = client.query(Method::GET, "/flags", None::<&()>).await?;

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(["ID", "Flag", "Value", "Return string", "Description", "Tags"]);

    for flag in flags {
        table.add_row([
            flag.id.to_string(),
            flag.flag.clone(),
            flag.value.to_string(),
            flag.return_string.clone(),
            flag.description.clone(),
            utils::render_tags(&flag.tags),
        ]);
    }

    println!("{}", table);
    Ok(())
}

pub async fn add(client: &Client, fields: Vec<String>) -> anyhow::Result<()> {
    let mut record = Map::new();
    utils::apply_fields(&mut record, &fields)?;

    client
        .query_unit(Method::POST, "/flags", Some(&Value::Object(record)))
        .await
}

pub async fn update(client: &Client, id: i64, fields: Vec<String>) -> anyhow::Result<()> {
    let existing: AdminFlag = client
        .query(Method::GET, &format!("/flags/{}", id), None::<&()>)
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
            &format!("/flags/{}", id),
            Some(&Value::Object(record)),
        )
        .await
}

pub async fn delete(client: &Client, id: i64) -> anyhow::Result<()> {
    client
        .query_unit(Method::DELETE, &format!("/flags/{}", id), None::<&()>)
        .await
}

pub async fn import(client: &Client, filename: &Path, flush: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(filename)?;
    let flags: Vec<AdminFlagPost> = serde_json::from_str(&content)?;

    if flush {
        client
            .query_unit(Method::DELETE, "/flags?empty=1", None::<&()>)
            .await?;
    }

    client
        .query_unit(Method::POST, "/flags?bulk=1", Some(&flags))
        .await?;

    println!("Imported {} flags", flags.len());
    Ok(())
}
