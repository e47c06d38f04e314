//! Slash command parsing for the portfolio terminal.
//!
//! Commands starting with `/` control the application locally: they render
//! portfolio views or manage the chat session, and are never sent to the
//! service. Anything else is a message for the assistant.

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Show the about/hero section.
    About,

    /// Show the project gallery.
    Projects,

    /// Show the detail view for one project.
    Project(String),

    /// Show the experience timeline.
    Experience,

    /// Show the technology stack.
    Stack,

    /// Show the social links.
    Socials,

    /// Open or close the chat widget.
    ToggleChat,

    /// Reset the conversation to the greeting.
    Clear,

    /// Display session statistics (message count, current model, etc.).
    Stats,

    /// Display help information.
    Help,

    /// Exit the application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be treated as a message for the assistant.
///
/// # Examples
///
/// ```
/// # use folio::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/project proj1").is_some());
/// assert!(parse_command("What stack do you use?").is_none());
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
        "about" => ChatCommand::About,
        "projects" => ChatCommand::Projects,
        "project" => match argument {
            Some(id) => ChatCommand::Project(id.to_string()),
            None => ChatCommand::Invalid("/project requires a project id".to_string()),
        },
        "experience" => ChatCommand::Experience,
        "stack" => ChatCommand::Stack,
        "socials" => ChatCommand::Socials,
        "chat" => ChatCommand::ToggleChat,
        "clear" => ChatCommand::Clear,
        "stats" | "status" => ChatCommand::Stats,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
///
/// The assistant lines are only shown when the chat feature is enabled;
/// pass `chat_enabled = false` to omit them entirely.
pub fn help_text(chat_enabled: bool) -> String {
    let mut help = String::from(
        "Available commands:\n\
         \x20 /about                 Show the about section\n\
         \x20 /projects              List projects\n\
         \x20 /project <id>          Show one project in detail\n\
         \x20 /experience            Show the experience timeline\n\
         \x20 /stack                 Show the technology stack\n\
         \x20 /socials               Show social links\n",
    );
    if chat_enabled {
        help.push_str(
            "\x20 /chat                  Open or close the assistant\n\
             \x20 /clear                 Reset the conversation\n\
             \x20 /stats                 Show session statistics\n",
        );
    }
    help.push_str(
        "\x20 /help                  Show this help message\n\
         \x20 /quit                  Exit",
    );
    if chat_enabled {
        help.push_str("\n\nAnything else is sent to the assistant.");
    }
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_view_commands() {
        assert_eq!(parse_command("/about"), Some(ChatCommand::About));
        assert_eq!(parse_command("/projects"), Some(ChatCommand::Projects));
        assert_eq!(parse_command("/experience"), Some(ChatCommand::Experience));
        assert_eq!(parse_command("/stack"), Some(ChatCommand::Stack));
        assert_eq!(parse_command("/socials"), Some(ChatCommand::Socials));
        assert_eq!(parse_command("/SOCIALS"), Some(ChatCommand::Socials));
    }

    #[test]
    fn parse_project_detail() {
        assert_eq!(
            parse_command("/project proj1"),
            Some(ChatCommand::Project("proj1".to_string()))
        );
        assert_eq!(
            parse_command("/project   proj2  "),
            Some(ChatCommand::Project("proj2".to_string()))
        );
        assert_eq!(
            parse_command("/project"),
            Some(ChatCommand::Invalid(
                "/project requires a project id".to_string()
            ))
        );
    }

    #[test]
    fn parse_chat_controls() {
        assert_eq!(parse_command("/chat"), Some(ChatCommand::ToggleChat));
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
    }

    #[test]
    fn unknown_command_is_invalid() {
        assert!(matches!(
            parse_command("/frobnicate"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("/frobnicate")
        ));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("What stack do you use?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_hides_assistant_when_disabled() {
        let enabled = help_text(true);
        assert!(enabled.contains("/chat"));
        assert!(enabled.contains("assistant"));

        let disabled = help_text(false);
        assert!(!disabled.contains("/chat"));
        assert!(!disabled.contains("assistant"));
        assert!(disabled.contains("/projects"));
        assert!(disabled.contains("/quit"));
    }
}
