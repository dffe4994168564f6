use wayfinder::{PlainTextRenderer, ProfileClient, ProfileStore, Renderer, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Create a client using the base URL from the environment variable WAYFINDER_PROFILE_URL
    let client = ProfileClient::new(None)?;

    let uid = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demo-user".to_string());

    // A missing document is an ordinary outcome, not an error
    let profile = client.fetch_profile(&uid).await?;

    let mut renderer = PlainTextRenderer::new();
    renderer.print_profile(profile.as_ref(), None);

    Ok(())
}
