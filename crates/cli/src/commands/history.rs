use askgod_domain::Flag;
use chrono::Local;
use comfy_table::{presets, Table};
use reqwest::Method;

use super::TIME_LAYOUT;
use crate::client::Client;

pub async fn run(client: &Client, team_id: Option<i64>) -> anyhow::Result<()> {
    // With an explicit team id, go through the admin API instead.
    if let Some(team_id) = team_id {
        return crate::commands::admin::scores::history(client, team_id).await;
    }

    let flags: Vec<Flag> = client.query(Method::GET, "/team/flags", None::<&()>).await?;

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(["ID", "Flag", "Value", "Submitted", "Notes"]);

    for flag in flags {
        table.add_row([
            flag.id.to_string(),
            flag.flag,
            flag.value.to_string(),
            flag.submit_time
                .with_timezone(&Local)
                .format(TIME_LAYOUT)
                .to_string(),
            flag.notes,
        ]);
    }

    println!("{}", table);
    Ok(())
}
