use askgod_domain::Team;
use reqwest::Method;

use crate::client::Client;

pub async fn run(client: &Client) -> anyhow::Result<()> {
    let team: Team = client.query(Method::GET, "/team", None::<&()>).await?;

    println!("ID: {}", team.id);
    println!("Name: {}", team.name);
    println!("Country: {}", team.country);
    println!("Website: {}", team.website);

    Ok(())
}
