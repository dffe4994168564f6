//! Command-line tool for one-shot profile lookups.
//!
//! This binary fetches the profile document for a uid and prints it, either
//! as a rendered summary or as raw JSON. A missing document is an ordinary
//! outcome, not a failure.
//!
//! # Usage
//!
//! ```bash
//! # Render the profile for a uid
//! wayfinder-profile u123
//!
//! # Print the raw document
//! wayfinder-profile --json u123
//!
//! # Point at a specific store and collection
//! wayfinder-profile --profile-url https://profiles.example.com/api --collection Students u123
//! ```

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use wayfinder::{PlainTextRenderer, ProfileClient, ProfileStore, Renderer};

/// Command-line arguments for the wayfinder-profile tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct Args {
    /// Profile store base URL.
    #[arrrg(optional, "Profile store base URL (default: $WAYFINDER_PROFILE_URL)", "URL")]
    profile_url: Option<String>,

    /// Collection holding profile documents.
    #[arrrg(optional, "Collection holding profile documents (default: Users)", "NAME")]
    collection: Option<String>,

    /// Bearer token sent with the lookup.
    #[arrrg(optional, "Bearer token (default: $WAYFINDER_ID_TOKEN)", "TOKEN")]
    token: Option<String>,

    /// Print the raw JSON document instead of a rendered summary.
    #[arrrg(flag, "Print the raw JSON document")]
    json: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    no_color: bool,
}

/// Main entry point for the wayfinder-profile command-line tool.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line_relaxed("wayfinder-profile [OPTIONS] UID");

    if free.len() != 1 {
        eprintln!("Error: Must specify exactly one uid");
        std::process::exit(1);
    }
    let uid = &free[0];

    let mut client = ProfileClient::with_options(args.profile_url, args.collection, None)?;
    let token = args
        .token
        .or_else(|| std::env::var("WAYFINDER_ID_TOKEN").ok());
    if let Some(token) = token {
        client = client.with_bearer(token);
    }

    let profile = client.fetch_profile(uid).await?;

    if args.json {
        match profile {
            Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
            None => println!("null"),
        }
        return Ok(());
    }

    let mut renderer = PlainTextRenderer::with_color(!args.no_color);
    renderer.print_profile(profile.as_ref(), None);
    Ok(())
}
