use wayfinder::chat::{ChatSession, SubmitOutcome};
use wayfinder::{AgentClient, PlainTextRenderer, Renderer, Result, format_message_chunks};

#[tokio::main]
async fn main() -> Result<()> {
    // Create a client using the endpoint from the environment variable WAYFINDER_AGENT_URL
    let client = AgentClient::new(None)?;
    let mut session = ChatSession::new(client, "demo");
    let mut renderer = PlainTextRenderer::new();

    // Take the prompt from the command line, or fall back to a sample question
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What should I prepare before applying abroad?".to_string());

    println!("You: {prompt}");
    println!("Agent:");
    renderer.print_pending();

    match session.submit(&prompt).await? {
        SubmitOutcome::Replied(reply) => {
            renderer.print_reply(&format_message_chunks(&reply.text));
        }
        outcome => println!("No reply: {outcome:?}"),
    }

    Ok(())
}
