//! Interactive chat application for prospective students.
//!
//! This binary provides a REPL interface for talking to the counseling
//! agent, with optional password sign-in and profile lookups.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! wayfinder-chat
//!
//! # Point at a specific agent
//! wayfinder-chat --endpoint http://localhost:8080/agent
//!
//! # Enable password sign-in
//! wayfinder-chat --identity-url https://id.example.com --identity-key KEY
//!
//! # Disable colors (useful for piping output)
//! wayfinder-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/clear` - Clear conversation history
//! - `/attach <path>` - Stage a file for the next message
//! - `/profile` - Show your saved profile
//! - `/login <email> <password>` - Sign in
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use wayfinder::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, SubmitOutcome,
    help_text, parse_command,
};
use wayfinder::{
    AgentClient, Attachment, IdentityProvider, PasswordIdentity, ProfileClient, ProfileStore,
    StaticIdentity, format_message_chunks,
};

/// Main entry point for the wayfinder-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("wayfinder-chat [OPTIONS]");
    let config = ChatConfig::load(&args)?;

    let client = AgentClient::new(config.endpoint.clone())?;
    let endpoint = client.base_url().to_string();
    let mut session = ChatSession::new(client, config.namespace.clone());
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    let identity: Box<dyn IdentityProvider> = if config.has_identity_service() {
        Box::new(PasswordIdentity::new(
            config.identity_url.clone(),
            config.identity_key.clone(),
        )?)
    } else if let Some(token) = &config.token {
        Box::new(StaticIdentity::new(Some(token.clone()), None))
    } else {
        Box::new(StaticIdentity::guest())
    };
    let initial = identity.snapshot();
    if initial.id_token.is_some() {
        session.apply_identity(&initial);
    }

    let profile_store = match ProfileClient::with_options(
        config.profile_url.clone(),
        config.profile_collection.clone(),
        None,
    ) {
        Ok(client) => Some(client),
        Err(_) if config.profile_url.is_none() => None,
        Err(err) => return Err(err.into()),
    };

    println!("Wayfinder Chat (endpoint: {})", endpoint);
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("Conversation cleared.");
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Attach(path) => match Attachment::from_path(&path) {
                            Ok(attachment) => {
                                renderer.print_info(&format!(
                                    "Attached {} ({} bytes). It rides on your next message.",
                                    attachment.file_name,
                                    attachment.len()
                                ));
                                session.attach(attachment);
                            }
                            Err(err) => {
                                renderer.print_error(&format!("Failed to attach {}: {}", path, err))
                            }
                        },
                        ChatCommand::Detach => match session.detach() {
                            Some(attachment) => renderer
                                .print_info(&format!("Detached {}.", attachment.file_name)),
                            None => renderer.print_info("No file staged."),
                        },
                        ChatCommand::Profile => {
                            show_profile(identity.as_ref(), &profile_store, &mut renderer).await;
                        }
                        ChatCommand::Session => {
                            renderer.print_info(&format!("Session: {}", session.session_id()));
                        }
                        ChatCommand::Login { email, password } => {
                            match identity.sign_in(&email, &password).await {
                                Ok(principal) => {
                                    session.apply_identity(&identity.snapshot());
                                    renderer.print_info(&format!(
                                        "Signed in as {}.",
                                        principal.email.as_deref().unwrap_or(&email)
                                    ));
                                }
                                Err(err) => {
                                    renderer.print_error(&format!("Sign-in failed: {}", err))
                                }
                            }
                        }
                        ChatCommand::Logout => {
                            identity.sign_out().await;
                            session.apply_identity(&identity.snapshot());
                            renderer.print_info("Signed out.");
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&config, &endpoint, &session, profile_store.is_some());
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the agent
                println!("Agent:");
                renderer.print_pending();
                match session.submit(line).await {
                    Ok(SubmitOutcome::Replied(reply)) => {
                        renderer.print_reply(&format_message_chunks(&reply.text));
                    }
                    Ok(SubmitOutcome::Busy) => {
                        renderer.print_notice("Still sending the previous message.");
                    }
                    Ok(SubmitOutcome::Ignored) => {}
                    Err(err) => {
                        if let Some(notice) = session.notice() {
                            renderer.print_notice(notice);
                        }
                        renderer.print_error(&err.to_string());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

async fn show_profile(
    identity: &dyn IdentityProvider,
    profile_store: &Option<ProfileClient>,
    renderer: &mut PlainTextRenderer,
) {
    let snapshot = identity.snapshot();
    let Some(uid) = snapshot.uid() else {
        renderer.print_info("Sign in to view your profile.");
        return;
    };
    let Some(client) = profile_store else {
        renderer.print_info(
            "Profile store not configured. Set --profile-url or WAYFINDER_PROFILE_URL.",
        );
        return;
    };
    let client = match &snapshot.id_token {
        Some(token) => client.clone().with_bearer(token.clone()),
        None => client.clone(),
    };
    let name_hint = snapshot.principal.as_ref().and_then(|principal| {
        principal
            .display_name
            .as_deref()
            .or(principal.email.as_deref())
    });
    match client.fetch_profile(uid).await {
        Ok(profile) => renderer.print_profile(profile.as_ref(), name_hint),
        Err(err) => renderer.print_error(&format!("Failed to load profile: {}", err)),
    }
}

fn print_stats(session: &ChatSession<AgentClient>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Session: {}", stats.session_id);
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Signed in: {}",
        if stats.authenticated { "yes" } else { "no" }
    );
    match (stats.attachment_name, stats.attachment_size) {
        (Some(name), Some(size)) => println!("      Attachment: {} ({} bytes)", name, size),
        _ => println!("      Attachment: (none)"),
    }
    println!(
        "      Submissions: {} ({} replies, {} failures)",
        stats.total_submissions, stats.total_replies, stats.total_failures
    );
}

fn print_config(
    config: &ChatConfig,
    endpoint: &str,
    session: &ChatSession<AgentClient>,
    profile_configured: bool,
) {
    println!("    Current Configuration:");
    println!("      Endpoint: {}", endpoint);
    println!("      Namespace: {}", config.namespace);
    println!("      Session: {}", session.session_id());
    println!(
        "      Identity service: {}",
        if config.has_identity_service() {
            "configured"
        } else {
            "(none)"
        }
    );
    println!(
        "      Profile store: {}",
        if profile_configured {
            "configured"
        } else {
            "(none)"
        }
    );
    println!(
        "      Color: {}",
        if config.use_color { "on" } else { "off" }
    );
}
