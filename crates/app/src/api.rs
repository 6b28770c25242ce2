//! REST API client
//!
//! Thin typed wrapper over the backend's endpoints. Read-only lookups are
//! retried with exponential backoff and cached for a fixed window; writes
//! are never auto-retried and surface their failure for user-initiated
//! retry.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use blitz_core::{Difficulty, GameSummary, Question, QuestionRecord};

use crate::cache::TimedCache;
use crate::coordinator::QuestionStore;
use crate::error::{Error, Result};

/// Lookup responses stay fresh this long
const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Attempts for read-only lookups (first try + retries)
const LOOKUP_ATTEMPTS: u32 = 3;

pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    topics: Mutex<TimedCache<Vec<String>>>,
    levels: Mutex<TimedCache<Vec<String>>>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
    difficulty: Difficulty,
    count: usize,
    #[serde(rename = "useAI")]
    use_ai: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveQuestionRequest<'a> {
    text: &'a str,
    options: &'a [String],
    correct_answer_index: usize,
    category: &'a str,
    explanation: &'a str,
}

#[derive(Debug, Serialize)]
struct BulkSaveRequest<'a> {
    questions: &'a [QuestionRecord],
}

#[derive(Debug, Deserialize)]
struct TopicsResponse {
    success: bool,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LevelsResponse {
    success: bool,
    #[serde(default)]
    levels: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    success: bool,
    #[serde(default)]
    questions: Vec<QuestionRecord>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveResponse {
    /// Absent means success; only an explicit false is a failure
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

impl SaveResponse {
    fn into_result(self) -> Result<()> {
        if self.success == Some(false) {
            Err(Error::Api(self.error.unwrap_or_else(|| {
                "error desconocido al guardar".to_string()
            })))
        } else {
            Ok(())
        }
    }
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Result<Self> {
        let base = base.into();
        if base.trim().is_empty() {
            return Err(Error::Config("API base URL is empty".into()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            topics: Mutex::new(TimedCache::new()),
            levels: Mutex::new(TimedCache::new()),
        })
    }

    /// Available question topics, cached for 5 minutes
    pub async fn fetch_topics(&self) -> Result<Vec<String>> {
        if let Some(topics) = self.topics.lock().unwrap().fresh(CACHE_TTL) {
            debug!("Serving topics from cache");
            return Ok(topics);
        }

        let url = format!("{}/api/ai/topics", self.base);
        let url = url.as_str();
        let result = fetch_with_retry(LOOKUP_ATTEMPTS, move || async move {
            let body: TopicsResponse = self.get_json(url).await?;
            if body.success {
                Ok(body.topics)
            } else {
                Err(Error::Api(body.error.unwrap_or_else(|| {
                    "no hay temas disponibles".to_string()
                })))
            }
        })
        .await;

        match result {
            Ok(topics) => {
                self.topics.lock().unwrap().put(topics.clone());
                Ok(topics)
            }
            Err(e) => match self.topics.lock().unwrap().stale() {
                Some(stale) => {
                    warn!(error = %e, "Topics fetch failed, serving stale cache");
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    /// Available difficulty levels, cached for 5 minutes
    pub async fn fetch_difficulty_levels(&self) -> Result<Vec<String>> {
        if let Some(levels) = self.levels.lock().unwrap().fresh(CACHE_TTL) {
            debug!("Serving difficulty levels from cache");
            return Ok(levels);
        }

        let url = format!("{}/api/ai/difficulty-levels", self.base);
        let url = url.as_str();
        let result = fetch_with_retry(LOOKUP_ATTEMPTS, move || async move {
            let body: LevelsResponse = self.get_json(url).await?;
            if body.success {
                Ok(body.levels)
            } else {
                Err(Error::Api(body.error.unwrap_or_else(|| {
                    "no hay niveles disponibles".to_string()
                })))
            }
        })
        .await;

        match result {
            Ok(levels) => {
                self.levels.lock().unwrap().put(levels.clone());
                Ok(levels)
            }
            Err(e) => match self.levels.lock().unwrap().stale() {
                Some(stale) => {
                    warn!(error = %e, "Levels fetch failed, serving stale cache");
                    Ok(stale)
                }
                None => Err(e),
            },
        }
    }

    /// Ask the generation engine for a question set
    ///
    /// Not retried: generation is expensive and the user drives the retry.
    pub async fn generate_questions(
        &self,
        topic: &str,
        difficulty: Difficulty,
        count: usize,
        use_ai: bool,
        token: Option<&str>,
    ) -> Result<Vec<QuestionRecord>> {
        let url = format!("{}/api/ai/generate-questions", self.base);
        let mut request = self.http.post(&url).json(&GenerateRequest {
            topic,
            difficulty,
            count,
            use_ai,
        });
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let body: GenerateResponse = decode(request.send().await?).await?;
        if body.success {
            info!(topic, count = body.questions.len(), "Questions generated");
            Ok(body.questions)
        } else {
            Err(Error::Api(body.error.unwrap_or_else(|| {
                "error generando preguntas".to_string()
            })))
        }
    }

    /// Public games open to everyone
    pub async fn fetch_public_games(&self) -> Result<Vec<GameSummary>> {
        let url = format!("{}/api/games", self.base);
        let url = url.as_str();
        fetch_with_retry(LOOKUP_ATTEMPTS, move || async move {
            self.get_json::<Vec<GameSummary>>(url).await
        })
        .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        decode(self.http.get(url).send().await?).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    response.json().await.map_err(|e| {
        if e.is_decode() {
            Error::InvalidResponse
        } else {
            Error::Http(e)
        }
    })
}

/// Retry a read-only call with exponential backoff (1s, 2s, ...)
async fn fetch_with_retry<T, F, Fut>(attempts: u32, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = None;
    for attempt in 0..attempts {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(attempt = attempt + 1, error = %e, "Lookup failed");
                last_err = Some(e);
                if attempt + 1 < attempts {
                    tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                }
            }
        }
    }
    Err(last_err.unwrap_or(Error::InvalidResponse))
}

#[async_trait]
impl QuestionStore for ApiClient {
    /// `POST /api/questions` - a single authored question
    async fn store_question(&self, question: &Question, token: Option<&str>) -> Result<()> {
        let url = format!("{}/api/questions", self.base);
        let mut request = self.http.post(&url).json(&SaveQuestionRequest {
            text: &question.text,
            options: &question.options,
            correct_answer_index: question.correct_answer_index,
            category: &question.category,
            explanation: question.explanation.as_deref().unwrap_or(""),
        });
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let body: SaveResponse = decode(request.send().await?).await?;
        body.into_result()
    }

    /// `POST /api/questions/bulk` - the full batch in one call
    async fn store_bulk(&self, questions: &[QuestionRecord], token: Option<&str>) -> Result<()> {
        let url = format!("{}/api/questions/bulk", self.base);
        let mut request = self
            .http
            .post(&url)
            .json(&BulkSaveRequest { questions });
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let body: SaveResponse = decode(request.send().await?).await?;
        body.into_result()
    }
}
