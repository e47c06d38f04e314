//! Terminal portfolio with an embedded streaming assistant.
//!
//! This binary renders the portfolio content (about, projects, experience,
//! stack, socials) and, when a credential is configured, embeds a
//! conversational assistant that answers questions about it.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with the built-in content and default model
//! folio-chat
//!
//! # Specify a model
//! folio-chat --model gemini-2.5-pro
//!
//! # Load a different portfolio
//! folio-chat --content portfolio.yaml
//!
//! # Disable colors (useful for piping output)
//! folio-chat --no-color
//! ```
//!
//! # Commands
//!
//! - `/about`, `/projects`, `/project <id>`, `/experience`, `/stack`,
//!   `/socials` - portfolio views
//! - `/chat` - open or close the assistant
//! - `/clear` - reset the conversation
//! - `/stats` - show session statistics
//! - `/help` - show available commands
//! - `/quit` - exit
//!
//! Anything else is sent to the assistant. Without a `FOLIO_API_KEY` the
//! assistant is hidden entirely and the portfolio browses normally.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use folio::GenerativeLanguage;
use folio::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatWidget, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use folio::portfolio::{PortfolioContent, ProjectEntry};

/// Main entry point for the folio-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("folio-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let content = match &config.content_path {
        Some(path) => PortfolioContent::load(path)?,
        None => PortfolioContent::builtin(),
    };

    let session_config = config.session_config(content.system_instruction());
    let mut widget = ChatWidget::mount(GenerativeLanguage::new(None), session_config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Absorb Ctrl+C while a reply is streaming; the turn runs to completion.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("{} / Portfolio", content.owner);
    if widget.enabled() {
        widget.toggle();
        println!("Ask the assistant anything, or type /help for commands.\n");
    } else {
        println!("Type /help for commands.\n");
    }
    print_about(&content, &mut renderer);

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("> ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::About => print_about(&content, &mut renderer),
                        ChatCommand::Projects => print_projects(&content, &mut renderer),
                        ChatCommand::Project(id) => match content.project(&id) {
                            Some(project) => print_project_detail(project, &mut renderer),
                            None => renderer.print_error(&format!("No project with id: {}", id)),
                        },
                        ChatCommand::Experience => print_experience(&content, &mut renderer),
                        ChatCommand::Stack => print_stack(&content, &mut renderer),
                        ChatCommand::Socials => print_socials(&content, &mut renderer),
                        ChatCommand::ToggleChat => {
                            widget.toggle();
                            if widget.enabled() {
                                if widget.is_open() {
                                    renderer.print_info("Assistant opened.");
                                    print_conversation(&widget, &mut renderer);
                                } else {
                                    renderer.print_info("Assistant closed.");
                                }
                            }
                        }
                        ChatCommand::Clear => {
                            if widget.enabled() {
                                widget.clear();
                                renderer.print_info("Conversation cleared.");
                            }
                        }
                        ChatCommand::Stats => print_stats(&widget, &mut renderer),
                        ChatCommand::Help => {
                            for line in help_text(widget.enabled()).lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Free text goes to the assistant. With the assistant hidden
                // there is nothing to send it to; point at the commands.
                if !widget.enabled() {
                    renderer.print_info("Type /help for commands.");
                    continue;
                }
                if !widget.is_open() {
                    widget.toggle();
                }
                println!("Assistant:");
                widget.submit(line, &mut renderer).await;
                if interrupted.swap(false, Ordering::Relaxed) {
                    renderer.print_info("Replies cannot be interrupted mid-stream.");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at the prompt - clear the line and continue
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

fn print_about(content: &PortfolioContent, renderer: &mut PlainTextRenderer) {
    renderer.print_heading("About");
    println!("    {}", content.about);
}

fn print_projects(content: &PortfolioContent, renderer: &mut PlainTextRenderer) {
    renderer.print_heading("Selected Projects");
    for project in &content.projects {
        println!("    [{}] {}", project.id, project.title);
        println!("        {}", project.description);
        if !project.tags.is_empty() {
            println!("        tags: {}", project.tags.join(", "));
        }
    }
    renderer.print_info("    Use /project <id> for details.");
}

fn print_project_detail(project: &ProjectEntry, renderer: &mut PlainTextRenderer) {
    renderer.print_heading(&project.title);
    if let Some(year) = &project.year {
        println!("    Year: {}", year);
    }
    if let Some(owner_role) = &project.owner_role {
        println!("    Role: {}", owner_role);
    }
    if !project.tags.is_empty() {
        println!("    Stack: {}", project.tags.join(", "));
    }
    let description = project
        .full_description
        .as_deref()
        .unwrap_or(&project.description);
    println!("\n    {}", description);
    if let Some(challenge) = &project.challenge {
        println!("\n    The Challenge\n    {}", challenge);
    }
    if let Some(solution) = &project.solution {
        println!("\n    The Solution\n    {}", solution);
    }
    if !project.features.is_empty() {
        println!("\n    Key Features");
        for feature in &project.features {
            println!("      - {}", feature);
        }
    }
    if let Some(link) = &project.link {
        println!("\n    Visit: {}", link);
    }
    if let Some(github) = &project.github {
        println!("    Code: {}", github);
    }
}

fn print_experience(content: &PortfolioContent, renderer: &mut PlainTextRenderer) {
    renderer.print_heading("Experience");
    for experience in &content.experiences {
        println!(
            "    {} @ {} ({})",
            experience.role, experience.company, experience.period
        );
        println!("        {}", experience.description);
    }
}

fn print_stack(content: &PortfolioContent, renderer: &mut PlainTextRenderer) {
    renderer.print_heading("Technologies");
    println!("    {}", content.tech_stack.join(", "));
}

fn print_socials(content: &PortfolioContent, renderer: &mut PlainTextRenderer) {
    renderer.print_heading("Socials");
    for social in &content.socials {
        println!("    {}: {}", social.platform, social.url);
    }
}

fn print_conversation(widget: &ChatWidget, renderer: &mut PlainTextRenderer) {
    for message in widget.messages() {
        let speaker = match message.role {
            folio::Role::User => "You",
            folio::Role::Model => "Assistant",
        };
        renderer.print_info(&format!("{}: {}", speaker, message.text));
    }
}

fn print_stats(widget: &ChatWidget, renderer: &mut PlainTextRenderer) {
    let Some(session) = widget.session() else {
        renderer.print_info("Type /help for commands.");
        return;
    };
    println!("    Session Statistics:");
    println!("      Model: {}", session.model());
    println!("      Committed turns: {}", session.message_count());
    println!("      Conversation messages: {}", widget.messages().len());
    let config = session.config();
    match config.temperature {
        Some(temperature) => println!("      Temperature: {:.2}", temperature),
        None => println!("      Temperature: default"),
    }
    match config.max_output_tokens {
        Some(max_output_tokens) => println!("      Max output tokens: {}", max_output_tokens),
        None => println!("      Max output tokens: default"),
    }
    println!(
        "      Assistant: {}",
        if widget.is_open() { "open" } else { "closed" }
    );
}
