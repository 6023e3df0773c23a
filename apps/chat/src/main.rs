//! Interactive chat client for the Muselink API
//!
//! Runs a terminal conversation with the Mistral assistant, letting it
//! browse the user's Spotify library through the API's tools. One tool
//! call is executed per turn; the tool result is fed back so the
//! assistant can answer in natural language.

use anyhow::Context;
use muselink_mistral_client::{ChatMessage, MistralClient, ToolChoice};
use muselink_shared_config::{get_env_or_default, MistralConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod tools;

use tools::{tool_definitions, ToolExecutor};

const SYSTEM_PROMPT: &str = "You are a friendly music assistant with access to the user's \
    Spotify library. Use the available tools to look up playlists, tracks, and \
    recommendations when the user asks about their music. Keep replies short and \
    conversational. When a tool reports an error, explain it to the user instead \
    of retrying.";

/// Conversation state: message history plus the clients it drives
struct ChatSession {
    mistral: MistralClient,
    executor: ToolExecutor,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    fn new(mistral: MistralClient, executor: ToolExecutor) -> Self {
        Self {
            mistral,
            executor,
            messages: vec![ChatMessage::system(SYSTEM_PROMPT)],
        }
    }

    /// Send one user message and return the assistant's reply
    ///
    /// At most one tool call is executed per turn. Extra calls in the
    /// same response are answered with an error result so the model
    /// retries them one at a time.
    async fn send(&mut self, input: &str) -> anyhow::Result<String> {
        self.messages.push(ChatMessage::user(input));

        let reply = self
            .mistral
            .chat_with_tools(
                self.messages.clone(),
                Some(tool_definitions()),
                Some(ToolChoice::auto()),
            )
            .await?;

        let tool_calls = match &reply.tool_calls {
            Some(calls) if !calls.is_empty() => calls.clone(),
            _ => {
                let content = reply.content_or_empty().to_string();
                self.messages.push(reply);
                return Ok(content);
            }
        };

        self.messages.push(reply.clone());

        for (index, call) in tool_calls.iter().enumerate() {
            let result = if index == 0 {
                self.executor.execute(call).await
            } else {
                tracing::warn!(
                    tool = %call.function.name,
                    "Skipping extra tool call, one call per turn"
                );
                r#"{"error": "only one tool call is executed per turn"}"#.to_string()
            };

            self.messages.push(ChatMessage::tool_result(
                call.function.name.clone(),
                call.id.clone(),
                result,
            ));
        }

        let followup = self
            .mistral
            .chat_with_tools(
                self.messages.clone(),
                Some(tool_definitions()),
                Some(ToolChoice::auto()),
            )
            .await?;

        let content = followup.content_or_empty().to_string();
        self.messages.push(followup);
        Ok(content)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; chat output goes to stdout, logs stay on stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "muselink_chat=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let mistral_config = MistralConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load Mistral config: {}", e))?;
    let mistral = MistralClient::new(&mistral_config).context("Failed to build Mistral client")?;

    let api_url = get_env_or_default("MUSELINK_API_URL", "http://localhost:4567");
    let api_key = get_env_or_default("API_KEY", "development-api-key");
    let executor = ToolExecutor::new(api_url, api_key);

    let mut session = ChatSession::new(mistral, executor);

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(b"Muselink chat. Ask about your music library; type 'exit' to quit.\n")
        .await?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match session.send(input).await {
            Ok(reply) => {
                stdout.write_all(reply.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat turn failed");
                stdout
                    .write_all(b"Sorry, something went wrong. Try again.\n")
                    .await?;
            }
        }
    }

    stdout.write_all(b"Goodbye!\n").await?;
    Ok(())
}
