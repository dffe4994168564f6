//! Wire-level behavior tests against a stubbed HTTP server.
//!
//! These pin down the request shapes, header handling, and status mapping
//! that the env-gated integration tests can only reach with a live
//! deployment.

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use wayfinder::chat::{ChatSession, SubmitOutcome};
    use wayfinder::{
        AgentClient, AgentTransport, Attachment, AttachmentMediaType, Error, IdentityProvider,
        PasswordIdentity, ProfileClient, ProfileStore, PromptRequest, ReplySource, SessionId,
    };

    #[tokio::test]
    async fn json_prompts_post_to_the_root_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(json!({
                "message": "hello",
                "session_id": "stub-guest",
            })))
            .with_status(200)
            .with_body(r#"{"response":"hi there"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = AgentClient::new(Some(server.url())).unwrap();
        let request = PromptRequest::new("hello", SessionId::derive("stub", None));
        let reply = client.deliver(request).await.unwrap();

        assert_eq!(reply.text, "hi there");
        assert_eq!(reply.source, ReplySource::Field("response"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bearer_credentials_ride_the_prompt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"reply":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = AgentClient::new(Some(server.url())).unwrap();
        let request =
            PromptRequest::new("hello", SessionId::derive("stub", Some("u1"))).with_bearer("tok");
        let reply = client.deliver(request).await.unwrap();

        assert_eq!(reply.text, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn attachments_post_to_the_upload_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/upload")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data.*".to_string()),
            )
            .with_status(200)
            .with_body(r#"{"response":"received"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = AgentClient::new(Some(server.url())).unwrap();
        let request = PromptRequest::new("review this", SessionId::derive("stub", None))
            .with_attachment(Attachment::new(
                "essay.txt",
                AttachmentMediaType::Text,
                b"draft".to_vec(),
            ));
        let reply = client.deliver(request).await.unwrap();

        assert_eq!(reply.text, "received");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn agent_errors_map_onto_the_status_ladder() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .with_header("retry-after", "7")
            .with_body(r#"{"error":"overloaded"}"#)
            .create_async()
            .await;

        let client = AgentClient::new(Some(server.url())).unwrap();
        let request = PromptRequest::new("hello", SessionId::derive("stub", None));
        let err = client.deliver(request).await.unwrap_err();

        assert!(err.is_server_error());
        let Error::ServiceUnavailable {
            message,
            retry_after,
        } = err
        else {
            panic!("expected a service-unavailable error");
        };
        assert_eq!(message, "overloaded");
        assert_eq!(retry_after, Some(7));
    }

    #[tokio::test]
    async fn a_session_round_trip_resolves_the_placeholder() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"reply":"Here is a shortlist.\n- Delft\n- Leiden"}"#)
            .create_async()
            .await;

        let client = AgentClient::new(Some(server.url())).unwrap();
        let mut session = ChatSession::new(client, "stub");
        let outcome = session.submit("Where should I apply?").await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Replied(_)));
        assert_eq!(session.message_count(), 2);
        assert!(session.messages()[1].text.contains("- Delft"));
        assert!(session.notice().is_none());
    }

    #[tokio::test]
    async fn a_missing_profile_document_is_absence() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/Users/u123")
            .with_status(404)
            .create_async()
            .await;

        let client = ProfileClient::new(Some(server.url())).unwrap();
        let profile = client.fetch_profile("u123").await.unwrap();
        assert!(profile.is_none());
    }

    #[tokio::test]
    async fn profile_documents_parse_with_the_bearer_attached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/Users/u456")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(
                r#"{"displayName":"Asha Rao","preferences":{"budget":{"annualAmount":25000,"currencyCode":"EUR"}}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let client = ProfileClient::new(Some(server.url()))
            .unwrap()
            .with_bearer("tok");
        let profile = client.fetch_profile("u456").await.unwrap().unwrap();

        assert_eq!(profile.full_name().as_deref(), Some("Asha Rao"));
        let budget = profile.preferences.unwrap().budget.unwrap();
        assert_eq!(budget.display(), "EUR 25,000");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn profile_failures_stay_scoped_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/Users/u789")
            .with_status(500)
            .with_body(r#"{"detail":"backing store down"}"#)
            .create_async()
            .await;

        let client = ProfileClient::new(Some(server.url())).unwrap();
        let err = client.fetch_profile("u789").await.unwrap_err();
        assert!(err.is_server_error());
        assert!(err.to_string().contains("backing store down"));
    }

    #[tokio::test]
    async fn sign_in_publishes_the_new_credentials() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/accounts:signInWithPassword?key=k123")
            .match_body(Matcher::Json(json!({
                "email": "asha@example.com",
                "password": "hunter2",
                "returnSecureToken": true,
            })))
            .with_status(200)
            .with_body(
                r#"{"idToken":"t1","refreshToken":"r1","localId":"u1","email":"asha@example.com"}"#,
            )
            .create_async()
            .await;

        let provider = PasswordIdentity::new(Some(server.url()), Some("k123".to_string())).unwrap();
        let mut events = provider.subscribe();
        let principal = provider
            .sign_in("asha@example.com", "hunter2")
            .await
            .unwrap();

        assert_eq!(principal.uid, "u1");
        assert_eq!(principal.email.as_deref(), Some("asha@example.com"));
        let state = events.next().await.unwrap();
        assert_eq!(state.uid(), Some("u1"));
        assert_eq!(state.id_token.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn rejected_credentials_read_as_authentication_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/accounts:signInWithPassword?key=k123")
            .with_status(400)
            .with_body(r#"{"error":{"message":"INVALID_PASSWORD","code":400}}"#)
            .create_async()
            .await;

        let provider = PasswordIdentity::new(Some(server.url()), Some("k123".to_string())).unwrap();
        let err = provider
            .sign_in("asha@example.com", "wrong")
            .await
            .unwrap_err();

        assert!(err.is_authentication());
        assert!(err.to_string().contains("INVALID_PASSWORD"));
        assert!(provider.snapshot().id_token.is_none());
    }

    #[tokio::test]
    async fn refresh_swaps_the_token_and_keeps_the_principal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/accounts:signInWithPassword?key=k123")
            .with_status(200)
            .with_body(
                r#"{"idToken":"t1","refreshToken":"r1","localId":"u1","email":"asha@example.com"}"#,
            )
            .create_async()
            .await;
        server
            .mock("POST", "/v1/token?key=k123")
            .match_body(Matcher::Json(json!({
                "grant_type": "refresh_token",
                "refresh_token": "r1",
            })))
            .with_status(200)
            .with_body(r#"{"id_token":"t2","refresh_token":"r2"}"#)
            .create_async()
            .await;

        let provider = PasswordIdentity::new(Some(server.url()), Some("k123".to_string())).unwrap();
        provider
            .sign_in("asha@example.com", "hunter2")
            .await
            .unwrap();
        provider.refresh().await.unwrap();

        let state = provider.snapshot();
        assert_eq!(state.uid(), Some("u1"));
        assert_eq!(state.id_token.as_deref(), Some("t2"));
    }
}
