//! Walk through the Challengepost authorization flow from the command line.
//!
//! Set CHALLENGEPOST_CLIENT_ID / CHALLENGEPOST_CLIENT_SECRET, run the
//! example, open the printed authorize URL, then re-run with
//! CHALLENGEPOST_ACCESS_TOKEN set to see the normalized identity.

use challengepost_identity_oauth2::{ChallengepostConfig, ChallengepostProvider};
use std::collections::HashMap;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ChallengepostConfig::from_env(
        std::env::var("CHALLENGEPOST_CLIENT_ID")
            .unwrap_or_else(|_| "your-client-id".to_string()),
        std::env::var("CHALLENGEPOST_CLIENT_SECRET")
            .unwrap_or_else(|_| "your-client-secret".to_string()),
        "http://localhost:3000/auth/challengepost/callback",
    );
    let provider = ChallengepostProvider::new(config);

    let mut request_params = HashMap::new();
    if let Ok(scope) = std::env::var("CHALLENGEPOST_SCOPE") {
        request_params.insert("scope".to_string(), scope);
    }

    println!("Challengepost OAuth2 Example");
    println!("============================");
    println!(
        "\n1. Redirect the user to:\n   {}",
        provider.authorize_url(&request_params)?
    );
    println!("\n2. Handle the callback and exchange the code:");
    println!("   provider.authenticate_code(code).await");

    match std::env::var("CHALLENGEPOST_ACCESS_TOKEN") {
        Ok(access_token) => {
            println!("\n3. Fetching the profile with the supplied access token...");
            match provider.attempt(access_token).identity().await {
                Ok(identity) => {
                    println!("✅ Authenticated uid: {}", identity.uid);
                    println!("   info: {}", serde_json::to_string_pretty(&identity.info)?);
                }
                Err(e) => println!("❌ Authentication failed: {e}"),
            }
        }
        Err(_) => {
            println!("\n3. Set CHALLENGEPOST_ACCESS_TOKEN to fetch the profile here.");
        }
    }

    Ok(())
}
