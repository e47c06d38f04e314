//! Integration tests for the folio library.
//! These tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use folio::GenerativeLanguage;
    use folio::chat::{ChatSession, SessionConfig};
    use folio::portfolio::PortfolioContent;
    use folio::types::{Content, GenerateContentRequest, KnownModel, Model};

    #[tokio::test]
    async fn simple_generate_request() {
        // This test requires FOLIO_API_KEY to be set
        let api_key = std::env::var("FOLIO_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: FOLIO_API_KEY not set");
            return;
        }

        let client = GenerativeLanguage::new(api_key).expect("Failed to create client");

        let request = GenerateContentRequest::new(vec![Content::user("Say 'test passed'")]);
        let response = client
            .generate(&Model::Known(KnownModel::Gemini25Flash), &request)
            .await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key"
        );
    }

    #[tokio::test]
    async fn streaming_session_reply() {
        let api_key = std::env::var("FOLIO_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: FOLIO_API_KEY not set");
            return;
        }

        let client = GenerativeLanguage::new(api_key).expect("Failed to create client");
        let content = PortfolioContent::builtin();
        let mut session = ChatSession::new(
            client,
            SessionConfig::new(content.system_instruction()),
        );

        let stream = session.send("What stack do you use?").await;
        assert!(stream.is_ok(), "Stream request should succeed");

        let mut stream = stream.unwrap();
        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            reply.push_str(&fragment.expect("stream should not fail"));
        }
        assert!(!reply.is_empty(), "Expected a non-empty streamed reply");
        assert_eq!(session.message_count(), 2);
    }
}
