use askgod_domain::Status;
use reqwest::Method;

use crate::client::Client;

pub async fn run(client: &Client) -> anyhow::Result<()> {
    let status: Status = client.query(Method::GET, "", None::<&()>).await?;

    if !status.event_name.is_empty() {
        println!("Event: {}", status.event_name);
    }

    println!(
        "Access: admin={} team={} guest={}",
        status.is_admin, status.is_team, status.is_guest
    );
    println!(
        "Teams: self-register={} self-update={}",
        status.flags.team_self_register, status.flags.team_self_update
    );
    println!(
        "Board: read-only={} hide-others={}",
        status.flags.board_read_only, status.flags.board_hide_others
    );

    Ok(())
}
