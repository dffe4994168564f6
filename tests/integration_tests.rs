//! Integration tests for the wayfinder library.
//! These tests require a live agent endpoint in the environment to run.

#[cfg(test)]
mod tests {
    use wayfinder::chat::{ChatSession, SubmitOutcome};
    use wayfinder::{AgentClient, AgentTransport, PromptRequest, SessionId};

    #[tokio::test]
    async fn test_simple_prompt_round_trip() {
        // This test requires WAYFINDER_AGENT_URL to be set
        let base_url = std::env::var("WAYFINDER_AGENT_URL").ok();
        if base_url.is_none() {
            eprintln!("Skipping test: WAYFINDER_AGENT_URL not set");
            return;
        }

        let client = AgentClient::new(base_url).expect("Failed to create client");
        let request = PromptRequest::new(
            "Say 'test passed'",
            SessionId::derive("integration", None),
        );

        let reply = client.deliver(request).await;
        assert!(reply.is_ok(), "Request should succeed against a live agent");
    }

    #[tokio::test]
    async fn test_session_submission() {
        let base_url = std::env::var("WAYFINDER_AGENT_URL").ok();
        if base_url.is_none() {
            eprintln!("Skipping test: WAYFINDER_AGENT_URL not set");
            return;
        }

        let client = AgentClient::new(base_url).expect("Failed to create client");
        let mut session = ChatSession::new(client, "integration");

        let outcome = session.submit("Count to 3").await;
        assert!(
            outcome.is_ok(),
            "Submission should succeed against a live agent"
        );
        assert!(matches!(outcome.unwrap(), SubmitOutcome::Replied(_)));
        assert_eq!(session.message_count(), 2);
    }
}
