use serde::{Deserialize, Serialize};
use reqwest::{Client, StatusCode};

const SYSTEM_PROMPT: &str = "You are an expert in science fiction literature, especially works dealing with AGI, singularity, and technological transformation. Always respond with valid JSON only.";
const DEFAULT_TROPE: &str = "Technological Transformation";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMatch {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub quote: Option<String>,
    pub connection: String,
}

impl BookMatch {
    /// Shown in place of a model answer whenever the completion call fails.
    pub fn fallback() -> Self {
        BookMatch {
            title: "Neuromancer".to_string(),
            author: "William Gibson".to_string(),
            summary: "A groundbreaking cyberpunk novel about hackers and AI in cyberspace. Gibson's vision of the digital future has proven remarkably prescient.".to_string(),
            quote: Some("The sky above the port was the color of television, tuned to a dead channel.".to_string()),
            connection: "This headline represents the kind of technological breakthrough Gibson envisioned.".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Completion API error: {0}")]
    UpstreamError(StatusCode),

    #[error("Completion request failed: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Error parsing model output: {0}")]
    ParseError(String),
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

/// The object the model is asked to produce.
#[derive(Deserialize)]
struct ModelBook {
    title: String,
    author: String,
    summary: String,
    #[serde(default)]
    quote: Option<String>,
    #[serde(default)]
    sf_trope: Option<String>,
}

impl From<ModelBook> for BookMatch {
    fn from(book: ModelBook) -> Self {
        let trope = book
            .sf_trope
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TROPE.to_string());

        BookMatch {
            title: book.title,
            author: book.author,
            summary: book.summary,
            quote: book.quote,
            connection: format!("SF Trope: {}", trope),
        }
    }
}

pub struct BookMatcher {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl BookMatcher {
    pub fn new(client: Client, url: impl Into<String>, model: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            url: url.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Asks the completion API for the classic SF book closest to `headline`.
    ///
    /// Every failure mode comes back as a distinct [`MatchError`]; choosing a
    /// substitute is left to the caller.
    pub async fn match_book(&self, headline: &str) -> Result<BookMatch, MatchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MatchError::ConfigError("completion API key not configured".to_string()))?;

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                Message {
                    role: "user".into(),
                    content: build_prompt(headline),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let res = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let error = res.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %error, "completion API returned an error");
            return Err(MatchError::UpstreamError(status));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| MatchError::ParseError(format!("completion envelope: {}", e)))?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| MatchError::ParseError("Invalid response format from LLM".to_string()))?;

        parse_book_match(reply)
    }
}

pub fn parse_book_match(content: &str) -> Result<BookMatch, MatchError> {
    let book: ModelBook = serde_json::from_str(content.trim())
        .map_err(|e| MatchError::ParseError(e.to_string()))?;
    Ok(book.into())
}

pub fn build_prompt(headline: &str) -> String {
    format!(
        r#"Analyze this real news headline that sounds like science fiction. Match it with the MOST RELEVANT classic SF book or story that explored this exact theme.

Headline: "{headline}"

This headline evokes classic SF tropes. Consider these categories:
- AI surpassing humans (HAL 9000, Skynet)
- Singularity and acceleration (Vinge, Kurzweil)
- Dystopian AI takeover (Terminator, The Matrix)
- Utopian post-scarcity (the Culture series, Star Trek)
- Human obsolescence (Player Piano, Brave New World)
- Consciousness and sentience (Do Androids Dream of Electric Sheep?, Ex Machina)
- Simulated reality (The Matrix, Simulacron-3)
- Immortality through technology (Altered Carbon, Permutation City)

Pick the MOST THEMATICALLY RELEVANT book. The connection should be obvious.

Respond with ONLY a JSON object (no markdown):
{{
    "title": "Book/Story Title",
    "author": "Author Name",
    "year": 1984,
    "summary": "2-3 sentences explaining how this book's core theme directly relates to the headline",
    "quote": "A thematically relevant quote from the book",
    "sf_trope": "The specific SF trope (e.g., 'AI Rebellion', 'Singularity', 'Post-Scarcity')"
}}

Focus on classics by: Asimov, Clarke, Dick, Gibson, Le Guin, Herbert, Bradbury, Wells, Vinge, Stephenson, Banks, Huxley, Orwell, Vonnegut"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_model_output() {
        let content = r#"{
            "title": "The Machine Stops",
            "author": "E. M. Forster",
            "year": 1909,
            "summary": "Humanity depends entirely on a global machine.",
            "quote": "The Machine is stronger than us all.",
            "sf_trope": "Human Obsolescence"
        }"#;
        let book = parse_book_match(content).expect("valid output");
        assert_eq!(book.title, "The Machine Stops");
        assert_eq!(book.quote.as_deref(), Some("The Machine is stronger than us all."));
        assert_eq!(book.connection, "SF Trope: Human Obsolescence");
    }

    #[test]
    fn missing_quote_and_trope_use_defaults() {
        let content = r#"{"title": "Blindsight", "author": "Peter Watts", "summary": "Intelligence without awareness."}"#;
        let book = parse_book_match(content).expect("valid output");
        assert_eq!(book.quote, None);
        assert_eq!(book.connection, "SF Trope: Technological Transformation");
    }

    #[test]
    fn non_json_output_is_a_parse_error() {
        let err = parse_book_match("Sure! I'd recommend Neuromancer.").unwrap_err();
        assert!(matches!(err, MatchError::ParseError(_)));
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        let err = parse_book_match(r#"{"title": "Solaris"}"#).unwrap_err();
        assert!(matches!(err, MatchError::ParseError(_)));
    }

    #[test]
    fn prompt_embeds_headline_and_schema() {
        let prompt = build_prompt("Chatbot claims to feel lonely");
        assert!(prompt.contains("Headline: \"Chatbot claims to feel lonely\""));
        assert!(prompt.contains("\"sf_trope\""));
        assert!(prompt.contains("Le Guin"));
    }

    #[test]
    fn fallback_is_neuromancer() {
        let book = BookMatch::fallback();
        assert_eq!(book.title, "Neuromancer");
        assert_eq!(book.author, "William Gibson");
    }
}
