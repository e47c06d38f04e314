//! Portfolio content and the assistant's system instruction.
//!
//! The chat feature answers questions about the portfolio owner, so the
//! session's system instruction is assembled from the same content tables
//! the rest of the application displays. The bundle ships with a built-in
//! default set and can be replaced wholesale from a YAML file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One entry in the experience timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    /// Stable identifier.
    pub id: String,
    /// Job title.
    pub role: String,
    /// Employer.
    pub company: String,
    /// Human-readable date range, e.g. "2023 - Present".
    pub period: String,
    /// One-paragraph summary of the work.
    pub description: String,
}

/// One entry in the project gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Stable identifier, used by the `/project <id>` view.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Short gallery blurb.
    pub description: String,
    /// Long-form description for the detail view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    /// The problem the project set out to solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,
    /// How the project solved it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    /// Headline features for the detail view.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Technology tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Live URL, if deployed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Source repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    /// Year shipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// The owner's role on the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_role: Option<String>,
}

/// A social profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Platform name, e.g. "GitHub".
    pub platform: String,
    /// Profile URL.
    pub url: String,
}

/// The full content bundle behind the portfolio and its assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioContent {
    /// The owner's display name.
    pub owner: String,
    /// Contact address surfaced by the assistant.
    pub contact_email: String,
    /// The about/hero paragraph.
    pub about: String,
    /// Experience timeline, most recent first.
    pub experiences: Vec<ExperienceEntry>,
    /// Project gallery entries.
    pub projects: Vec<ProjectEntry>,
    /// Technology stack list.
    pub tech_stack: Vec<String>,
    /// Social profile links.
    pub socials: Vec<SocialLink>,
}

impl PortfolioContent {
    /// Loads a content bundle from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .map_err(|err| Error::io("failed to open content file", err))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|err| {
            Error::serialization("failed to parse content file", Some(Box::new(err)))
        })
    }

    /// Looks up a project by id.
    pub fn project(&self, id: &str) -> Option<&ProjectEntry> {
        self.projects.iter().find(|project| project.id == id)
    }

    /// Assembles the assistant's system instruction from the content tables.
    ///
    /// The experience and project tables are JSON-encoded so the model sees
    /// every field, not a lossy prose summary.
    pub fn system_instruction(&self) -> String {
        let experiences =
            serde_json::to_string(&self.experiences).unwrap_or_else(|_| "[]".to_string());
        let projects = serde_json::to_string(&self.projects).unwrap_or_else(|_| "[]".to_string());

        format!(
            "You are the digital assistant for {owner}'s portfolio.\n\
             Use the following context to answer visitor questions:\n\
             \n\
             About: {about}\n\
             Experience: {experiences}\n\
             Projects: {projects}\n\
             Stack: {stack}\n\
             \n\
             Tone: Professional, concise, slightly technical but accessible.\n\
             If asked about contact info, suggest emailing {email}.\n\
             If asked about something not in the context, politely mention you \
             only know about {owner}'s professional background.\n\
             Keep answers under 100 words unless requested otherwise.",
            owner = self.owner,
            about = self.about,
            experiences = experiences,
            projects = projects,
            stack = self.tech_stack.join(", "),
            email = self.contact_email,
        )
    }

    /// The built-in content bundle, used when no `--content` file is given.
    pub fn builtin() -> Self {
        Self {
            owner: "Alex Chen".to_string(),
            contact_email: "alex@example.com".to_string(),
            about: "I'm Alex, a Fullstack Engineer specialized in building AI-native \
                    applications. I bridge the gap between robust web infrastructure and \
                    cutting-edge generative AI models. Currently obsessing over agentic \
                    workflows and terminal tooling."
                .to_string(),
            experiences: vec![
                ExperienceEntry {
                    id: "1".to_string(),
                    role: "Senior AI Engineer".to_string(),
                    company: "Nexus AI".to_string(),
                    period: "2023 - Present".to_string(),
                    description: "Leading the frontend architecture for a generative AI video \
                                  platform. Implemented real-time streaming protocols and \
                                  optimized inference latency."
                        .to_string(),
                },
                ExperienceEntry {
                    id: "2".to_string(),
                    role: "Fullstack Developer".to_string(),
                    company: "Vercel (Contract)".to_string(),
                    period: "2021 - 2023".to_string(),
                    description: "Contributed to the core Next.js edge runtime. Built internal \
                                  tooling for deployment analytics."
                        .to_string(),
                },
                ExperienceEntry {
                    id: "3".to_string(),
                    role: "Frontend Engineer".to_string(),
                    company: "StartUp Inc".to_string(),
                    period: "2019 - 2021".to_string(),
                    description: "Migrated legacy PHP monolith to React/TypeScript. Improved \
                                  page load speed by 40%."
                        .to_string(),
                },
            ],
            projects: vec![
                ProjectEntry {
                    id: "proj1".to_string(),
                    title: "Cognition Flow".to_string(),
                    description: "An AI-powered workspace that auto-organizes your notes using \
                                  a large language model."
                        .to_string(),
                    full_description: Some(
                        "Cognition Flow reimagines personal knowledge management by acting as \
                         an active agent in your note-taking process. Every note is embedded \
                         into a vector space, allowing for semantic connections that surface \
                         relevant information exactly when you need it."
                            .to_string(),
                    ),
                    challenge: Some(
                        "Users hoard information but struggle to retrieve it. Keyword search \
                         fails when concepts are related conceptually but not lexically."
                            .to_string(),
                    ),
                    solution: Some(
                        "A retrieval-augmented generation pipeline analyzes every keystroke \
                         asynchronously and proactively surfaces related notes without manual \
                         tagging."
                            .to_string(),
                    ),
                    features: vec![
                        "Real-time semantic search".to_string(),
                        "Auto-tagging taxonomy".to_string(),
                        "Graph visualization of ideas".to_string(),
                        "Multi-modal input (images/audio)".to_string(),
                    ],
                    tags: vec![
                        "Next.js".to_string(),
                        "Gemini API".to_string(),
                        "Vector DB".to_string(),
                        "Tailwind".to_string(),
                    ],
                    link: Some("https://example.com".to_string()),
                    github: Some("https://github.com".to_string()),
                    year: Some("2024".to_string()),
                    owner_role: Some("Lead Engineer".to_string()),
                },
                ProjectEntry {
                    id: "proj2".to_string(),
                    title: "VoiceAgent.js".to_string(),
                    description: "Open source library for building real-time voice \
                                  conversational agents in the browser."
                        .to_string(),
                    full_description: Some(
                        "VoiceAgent.js is a lightweight abstraction over the Web Audio API and \
                         WebRTC, designed to make voice-to-voice assistants accessible to \
                         frontend developers. It handles voice activity detection, buffering, \
                         and echo cancellation out of the box."
                            .to_string(),
                    ),
                    challenge: Some(
                        "Browser audio handling is notoriously difficult: varying sampling \
                         rates, latency issues, and browser inconsistencies."
                            .to_string(),
                    ),
                    solution: Some(
                        "A framework-agnostic library that normalizes audio into a consistent \
                         16kHz 16-bit PCM format, ready for direct streaming to model \
                         WebSocket endpoints."
                            .to_string(),
                    ),
                    features: vec![
                        "Browser-agnostic AudioWorklet".to_string(),
                        "Client-side voice activity detection".to_string(),
                        "Zero-dependency".to_string(),
                    ],
                    tags: vec![
                        "TypeScript".to_string(),
                        "WebAudio API".to_string(),
                        "Node.js".to_string(),
                    ],
                    link: None,
                    github: None,
                    year: Some("2023".to_string()),
                    owner_role: Some("Maintainer".to_string()),
                },
                ProjectEntry {
                    id: "proj3".to_string(),
                    title: "Syntax UI".to_string(),
                    description: "A component library designed for AI interfaces, featuring \
                                  streaming text components."
                        .to_string(),
                    full_description: Some(
                        "Syntax UI fills the gap in static-first UI libraries. AI interfaces \
                         need components that handle streaming states, thinking indicators, \
                         and markdown rendering efficiently."
                            .to_string(),
                    ),
                    challenge: Some(
                        "Standard UI kits flash or jitter when displaying streaming tokens; \
                         there was no standardized way to visualize in-progress generation."
                            .to_string(),
                    ),
                    solution: Some(
                        "Components optimized for high-frequency updates, with a custom \
                         virtualizer for chat lists and layout-stability techniques that \
                         prevent shift during generation."
                            .to_string(),
                    ),
                    features: Vec::new(),
                    tags: vec![
                        "React".to_string(),
                        "Storybook".to_string(),
                        "CSS Modules".to_string(),
                    ],
                    link: None,
                    github: None,
                    year: Some("2023".to_string()),
                    owner_role: Some("Solo Developer".to_string()),
                },
                ProjectEntry {
                    id: "proj4".to_string(),
                    title: "RepoChat".to_string(),
                    description: "Chat with any GitHub repository. Uses retrieval over the \
                                  code to answer repo-specific questions."
                        .to_string(),
                    full_description: Some(
                        "RepoChat lets developers onboard to new codebases faster by asking \
                         natural-language questions. It indexes the syntax tree of the code \
                         to understand function relationships, not just text matches."
                            .to_string(),
                    ),
                    challenge: None,
                    solution: None,
                    features: Vec::new(),
                    tags: vec![
                        "Python".to_string(),
                        "LangChain".to_string(),
                        "React".to_string(),
                    ],
                    link: None,
                    github: Some("https://github.com".to_string()),
                    year: Some("2022".to_string()),
                    owner_role: Some("Fullstack".to_string()),
                },
            ],
            tech_stack: vec![
                "TypeScript".to_string(),
                "React".to_string(),
                "Next.js".to_string(),
                "Node.js".to_string(),
                "Python".to_string(),
                "Rust".to_string(),
                "PostgreSQL".to_string(),
                "Docker".to_string(),
                "AWS".to_string(),
                "Gemini API".to_string(),
            ],
            socials: vec![
                SocialLink {
                    platform: "GitHub".to_string(),
                    url: "https://github.com".to_string(),
                },
                SocialLink {
                    platform: "Twitter".to_string(),
                    url: "https://twitter.com".to_string(),
                },
                SocialLink {
                    platform: "LinkedIn".to_string(),
                    url: "https://linkedin.com".to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bundle_is_complete() {
        let content = PortfolioContent::builtin();
        assert!(!content.about.is_empty());
        assert_eq!(content.experiences.len(), 3);
        assert_eq!(content.projects.len(), 4);
        assert!(!content.tech_stack.is_empty());
        assert!(!content.socials.is_empty());
    }

    #[test]
    fn project_lookup() {
        let content = PortfolioContent::builtin();
        assert_eq!(content.project("proj2").unwrap().title, "VoiceAgent.js");
        assert!(content.project("nope").is_none());
    }

    #[test]
    fn system_instruction_covers_every_table() {
        let content = PortfolioContent::builtin();
        let instruction = content.system_instruction();

        assert!(instruction.contains(&content.about));
        for experience in &content.experiences {
            assert!(instruction.contains(&experience.company));
        }
        for project in &content.projects {
            assert!(instruction.contains(&project.title));
        }
        assert!(instruction.contains("TypeScript, React"));
        assert!(instruction.contains(&content.contact_email));
        assert!(instruction.contains("under 100 words"));
    }

    #[test]
    fn yaml_round_trip() {
        let content = PortfolioContent::builtin();
        let yaml = serde_yaml::to_string(&content).unwrap();
        let parsed: PortfolioContent = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, content);
    }
}
