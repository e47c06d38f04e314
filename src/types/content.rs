use serde::{Deserialize, Serialize};

/// The author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A turn written by the visitor.
    User,
    /// A turn generated by the model.
    Model,
}

/// One piece of content within a turn.
///
/// The service defines several part kinds; this crate only exchanges text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// The text content.
    pub text: String,
}

impl Part {
    /// Create a new `Part` with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A single conversation turn: an author role and its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Who authored the turn. System instructions omit the role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The pieces of the turn, in order.
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some(Role::User),
            parts: vec![Part::new(text)],
        }
    }

    /// Create a model turn with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Some(Role::Model),
            parts: vec![Part::new(text)],
        }
    }

    /// Create a role-less content block, as used for system instructions.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::new(text)],
        }
    }

    /// Joins the text of all parts into a single string.
    pub fn joined_text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn role_serialization() {
        assert_eq!(to_value(Role::User).unwrap(), json!("user"));
        assert_eq!(to_value(Role::Model).unwrap(), json!("model"));
    }

    #[test]
    fn user_turn_serialization() {
        let content = Content::user("What stack do you use?");
        let json = to_value(&content).unwrap();

        assert_eq!(
            json,
            json!({
                "role": "user",
                "parts": [{"text": "What stack do you use?"}]
            })
        );
    }

    #[test]
    fn system_content_omits_role() {
        let content = Content::system("You are a portfolio assistant.");
        let json = to_value(&content).unwrap();

        assert_eq!(
            json,
            json!({
                "parts": [{"text": "You are a portfolio assistant."}]
            })
        );
    }

    #[test]
    fn joined_text_concatenates_parts() {
        let content = Content {
            role: Some(Role::Model),
            parts: vec![Part::new("Hel"), Part::new(""), Part::new("lo")],
        };
        assert_eq!(content.joined_text(), "Hello");
    }
}
