use askgod_domain::Config;
use reqwest::Method;

use crate::client::Client;

pub async fn run(client: &Client) -> anyhow::Result<()> {
    let config: Config = client.query(Method::GET, "/config", None::<&()>).await?;

    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}
