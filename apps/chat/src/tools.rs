//! Tool definitions and execution against the Muselink API
//!
//! The assistant is offered one tool per library operation. When it
//! requests a call, [`ToolExecutor`] performs the HTTP request and
//! returns the response body as the tool result. Failures become an
//! `{"error": ...}` JSON object so the assistant can explain the problem
//! instead of the conversation aborting.

use muselink_mistral_client::{Tool, ToolCall};
use serde_json::json;

/// Tools the assistant may call
pub fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool::function(
            "get_user_playlists",
            "List all playlists in the user's music library.",
            json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        ),
        Tool::function(
            "get_tracks_in_playlist",
            "List the tracks of a playlist, 15 per page. The playlist name \
             is matched case-insensitively.",
            json!({
                "type": "object",
                "properties": {
                    "playlist_name": {
                        "type": "string",
                        "description": "Playlist name to look up",
                    },
                    "page": {
                        "type": "integer",
                        "description": "Page number, starting at 1",
                    },
                },
                "required": ["playlist_name"],
            }),
        ),
        Tool::function(
            "get_track_audio_features",
            "Get the audio features (valence and energy) of a single track.",
            json!({
                "type": "object",
                "properties": {
                    "track_id": {
                        "type": "string",
                        "description": "ID of the track",
                    },
                },
                "required": ["track_id"],
            }),
        ),
        Tool::function(
            "track_recommendation",
            "Recommend a track from the user's library matching a genre and a mood. \
             Supported moods: happy, sad, energetic, calm.",
            json!({
                "type": "object",
                "properties": {
                    "genre": {
                        "type": "string",
                        "description": "Genre to match against playlist names",
                    },
                    "mood": {
                        "type": "string",
                        "description": "Desired mood of the track",
                    },
                },
                "required": ["genre", "mood"],
            }),
        ),
    ]
}

/// Executes tool calls against the Muselink API
#[derive(Clone)]
pub struct ToolExecutor {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl ToolExecutor {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Execute one tool call and return the result as a JSON string
    ///
    /// Never fails: unknown tools, bad arguments, and HTTP errors all
    /// produce an error object the assistant can relay to the user.
    pub async fn execute(&self, call: &ToolCall) -> String {
        let args: serde_json::Value = match serde_json::from_str(&call.function.arguments) {
            Ok(value) => value,
            Err(e) => return Self::error_result(format!("invalid tool arguments: {}", e)),
        };

        tracing::debug!(tool = %call.function.name, "Executing tool call");

        let result = match call.function.name.as_str() {
            "get_user_playlists" => self.get("/api/v1/playlists", &[]).await,
            "get_tracks_in_playlist" => {
                let name = match args["playlist_name"].as_str() {
                    Some(name) => name.to_string(),
                    None => {
                        return Self::error_result("missing required argument: playlist_name")
                    }
                };
                let mut query = vec![("name".to_string(), name)];
                if let Some(page) = args["page"].as_u64() {
                    query.push(("page".to_string(), page.to_string()));
                }
                self.get("/api/v1/playlist/tracks", &query).await
            }
            "get_track_audio_features" => {
                let track_id = match args["track_id"].as_str() {
                    Some(id) => id.to_string(),
                    None => return Self::error_result("missing required argument: track_id"),
                };
                self.get(&format!("/api/v1/tracks/{}/audio-features", track_id), &[])
                    .await
            }
            "track_recommendation" => {
                let genre = match args["genre"].as_str() {
                    Some(genre) => genre.to_string(),
                    None => return Self::error_result("missing required argument: genre"),
                };
                let mood = match args["mood"].as_str() {
                    Some(mood) => mood.to_string(),
                    None => return Self::error_result("missing required argument: mood"),
                };
                self.get(
                    "/api/v1/track-recommendation",
                    &[("genre".to_string(), genre), ("mood".to_string(), mood)],
                )
                .await
            }
            unknown => return Self::error_result(format!("unknown tool: {}", unknown)),
        };

        match result {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(tool = %call.function.name, error = %e, "Tool call failed");
                Self::error_result(e.to_string())
            }
        }
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> anyhow::Result<String> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http_client
            .get(&url)
            .header("X-API-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            // API errors carry a JSON body with code and message; pass it
            // through so the assistant sees the reason
            match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(json) => Ok(json!({ "error": json["message"] }).to_string()),
                Err(_) => anyhow::bail!("API returned status {}", status),
            }
        }
    }

    fn error_result(message: impl Into<String>) -> String {
        json!({ "error": message.into() }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muselink_mistral_client::FunctionCall;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: "call-1".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    #[test]
    fn test_tool_definitions_cover_all_operations() {
        let tools = tool_definitions();
        let names: Vec<&str> = tools.iter().map(|t| t.function.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "get_user_playlists",
                "get_tracks_in_playlist",
                "get_track_audio_features",
                "track_recommendation",
            ]
        );
    }

    #[tokio::test]
    async fn test_execute_recommendation_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/track-recommendation"))
            .and(query_param("genre", "rock"))
            .and(query_param("mood", "happy"))
            .and(header("X-API-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "track": {"id": "t1", "name": "Sunny Anthem"},
                "genre": "rock",
                "mood": "happy",
            })))
            .mount(&server)
            .await;

        let executor = ToolExecutor::new(server.uri(), "test-key");
        let result = executor
            .execute(&call(
                "track_recommendation",
                r#"{"genre": "rock", "mood": "happy"}"#,
            ))
            .await;

        let json: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(json["track"]["id"], "t1");
    }

    #[tokio::test]
    async fn test_execute_tracks_in_playlist_maps_arguments() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/playlist/tracks"))
            .and(query_param("name", "road trip"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "playlist": {"id": "p1", "name": "Road Trip Mix"},
                "page": 2,
                "total_pages": 2,
                "total_tracks": 20,
                "tracks": [],
            })))
            .mount(&server)
            .await;

        let executor = ToolExecutor::new(server.uri(), "test-key");
        let result = executor
            .execute(&call(
                "get_tracks_in_playlist",
                r#"{"playlist_name": "road trip", "page": 2}"#,
            ))
            .await;

        let json: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(json["page"], 2);
    }

    #[tokio::test]
    async fn test_execute_relays_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/track-recommendation"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "code": "NO_GENRE_MATCH",
                "message": "no playlists match genre: metal",
            })))
            .mount(&server)
            .await;

        let executor = ToolExecutor::new(server.uri(), "test-key");
        let result = executor
            .execute(&call(
                "track_recommendation",
                r#"{"genre": "metal", "mood": "happy"}"#,
            ))
            .await;

        let json: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(json["error"], "no playlists match genre: metal");
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let executor = ToolExecutor::new("http://localhost:0", "test-key");
        let result = executor.execute(&call("get_weather", "{}")).await;

        let json: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(json["error"].as_str().unwrap().contains("unknown tool"));
    }

    #[tokio::test]
    async fn test_execute_missing_required_argument() {
        let executor = ToolExecutor::new("http://localhost:0", "test-key");
        let result = executor.execute(&call("get_tracks_in_playlist", "{}")).await;

        let json: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert!(json["error"].as_str().unwrap().contains("playlist_name"));
    }
}
