//! Slash command parsing for the chat shell.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the chat session without sending messages
//! to the agent.

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the conversation history.
    Clear,

    /// Stage a file to send with the next message.
    Attach(String),

    /// Drop the staged file.
    Detach,

    /// Fetch and display the signed-in student's profile.
    Profile,

    /// Display the session identifier.
    Session,

    /// Sign in with the identity service.
    Login { email: String, password: String },

    /// Sign out.
    Logout,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics (message count, attachment state, etc.).
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use wayfinder::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/attach notes.pdf").is_some());
/// assert!(parse_command("Which universities fit my budget?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "attach" => match argument {
            Some(path) => ChatCommand::Attach(path.to_string()),
            None => ChatCommand::Invalid("/attach requires a file path".to_string()),
        },
        "detach" => ChatCommand::Detach,
        "profile" => ChatCommand::Profile,
        "session" => ChatCommand::Session,
        "login" => parse_login_command(argument),
        "logout" => ChatCommand::Logout,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_login_command(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid("/login requires an email and a password".to_string());
    };

    let mut parts = arg.splitn(2, ' ');
    let email = parts.next().unwrap();
    let Some(password) = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty()) else {
        return ChatCommand::Invalid("/login requires an email and a password".to_string());
    };
    ChatCommand::Login {
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /attach <path>         Stage a file to send with the next message
  /detach                Drop the staged file
  /clear                 Clear conversation history
  /profile               Show your saved profile
  /session               Show the session identifier
  /login <email> <pw>    Sign in with the identity service
  /logout                Sign out
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
