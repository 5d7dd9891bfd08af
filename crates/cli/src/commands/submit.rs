use askgod_domain::{Flag, FlagPost};
use reqwest::Method;

use crate::client::Client;

pub async fn run(client: &Client, flag: String, notes: Option<String>) -> anyhow::Result<()> {
    let post = FlagPost {
        flag,
        notes: notes.unwrap_or_default(),
    };

    let result: Flag = client
        .query(Method::POST, "/team/flags", Some(&post))
        .await?;

    if result.value < 0 {
        println!(
            "You shouldn't have sent that! You just lost your team {} points.",
            -result.value
        );
    } else if result.value == 0 {
        println!("You sent a valid flag, but no points have been granted.");
    } else {
        println!("Congratulations, you score your team {} points!", result.value);
    }

    if !result.return_string.is_empty() {
        println!("Message: {}", result.return_string);
    }

    Ok(())
}
