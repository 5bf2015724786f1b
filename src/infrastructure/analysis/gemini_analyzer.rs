use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::application::ports::{AnalyzerError, ContentAnalyzer};
use crate::domain::{TargetLanguage, VideoAnalysis, VideoMetadata};
use crate::infrastructure::observability::sanitize_for_log;

use super::analysis_payload::{parse_analysis, parse_metadata};

const API_KEY_HEADER: &str = "x-goog-api-key";
const VIDEO_MIME: &str = "video/mp4";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
    pub request_timeout: Duration,
}

/// Video understanding through the Gemini Files and generateContent APIs.
///
/// Each call uploads the video, waits for it to become `ACTIVE`, asks for a
/// JSON transcription/translation and deletes the uploaded file.
pub struct GeminiAnalyzer {
    client: Client,
    config: GeminiConfig,
}

impl GeminiAnalyzer {
    pub fn new(config: GeminiConfig) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AnalyzerError::ApiRequestFailed(format!("client: {}", e)))?;
        Ok(Self {
            client,
            config: GeminiConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    async fn upload(&self, video: &Path) -> Result<GeminiFile, AnalyzerError> {
        let data = tokio::fs::read(video).await?;
        let display_name = video
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        let start = self
            .client
            .post(format!("{}/upload/v1beta/files", self.config.base_url))
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", data.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", VIDEO_MIME)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await
            .map_err(|e| AnalyzerError::UploadFailed(format!("start: {}", e)))?;
        let start = check_status(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AnalyzerError::UploadFailed("missing upload URL".to_string()))?
            .to_string();

        let size = data.len();
        let finished = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(data)
            .send()
            .await
            .map_err(|e| AnalyzerError::UploadFailed(format!("transfer: {}", e)))?;
        let uploaded: FileEnvelope = check_status(finished)
            .await?
            .json()
            .await
            .map_err(|e| AnalyzerError::InvalidResponse(format!("upload: {}", e)))?;

        tracing::debug!(name = %uploaded.file.name, bytes = size, "Video uploaded to Gemini");
        Ok(uploaded.file)
    }

    async fn wait_until_active(&self, mut file: GeminiFile) -> Result<GeminiFile, AnalyzerError> {
        for attempt in 0..self.config.max_poll_attempts {
            match file.state.as_deref() {
                Some("ACTIVE") => return Ok(file),
                Some("FAILED") => {
                    return Err(AnalyzerError::UploadFailed(format!(
                        "file {} failed processing",
                        file.name
                    )));
                }
                state => {
                    tracing::debug!(attempt = attempt, state = ?state, "Waiting for Gemini file processing");
                }
            }

            tokio::time::sleep(self.config.poll_interval).await;
            let response = self
                .client
                .get(format!("{}/v1beta/{}", self.config.base_url, file.name))
                .header(API_KEY_HEADER, &self.config.api_key)
                .send()
                .await
                .map_err(|e| AnalyzerError::ApiRequestFailed(format!("file status: {}", e)))?;
            file = check_status(response)
                .await?
                .json()
                .await
                .map_err(|e| AnalyzerError::InvalidResponse(format!("file status: {}", e)))?;
        }

        Err(AnalyzerError::UploadFailed(format!(
            "file {} not active after {} checks",
            file.name, self.config.max_poll_attempts
        )))
    }

    /// One JSON-mode generateContent call, optionally grounded on an
    /// uploaded file.
    async fn generate(&self, file: Option<&GeminiFile>, prompt: &str) -> Result<String, AnalyzerError> {
        tracing::debug!(prompt = %sanitize_for_log(prompt), model = %self.config.model, "Requesting generation");

        let mut parts = Vec::with_capacity(2);
        if let Some(file) = file {
            parts.push(serde_json::json!({
                "file_data": { "mime_type": file.mime_type.as_deref().unwrap_or(VIDEO_MIME), "file_uri": file.uri }
            }));
        }
        parts.push(serde_json::json!({ "text": prompt }));
        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.config.base_url, self.config.model
            ))
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzerError::ApiRequestFailed(format!("generate: {}", e)))?;

        let reply: GenerateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AnalyzerError::InvalidResponse(format!("generate: {}", e)))?;

        let text = reply
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .filter_map(|p| p.text)
            .collect::<String>();
        if text.trim().is_empty() {
            return Err(AnalyzerError::InvalidResponse("empty model reply".to_string()));
        }

        tracing::debug!(reply = %sanitize_for_log(&text), "Model reply received");
        Ok(text)
    }

    async fn delete(&self, file: &GeminiFile) {
        let result = self
            .client
            .delete(format!("{}/v1beta/{}", self.config.base_url, file.name))
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, name = %file.name, "Failed to delete Gemini file");
        }
    }
}

#[async_trait]
impl ContentAnalyzer for GeminiAnalyzer {
    #[tracing::instrument(skip(self, video), fields(model = %self.config.model))]
    async fn analyze_video(
        &self,
        video: &Path,
        target_language: &str,
    ) -> Result<VideoAnalysis, AnalyzerError> {
        let uploaded = self.upload(video).await?;
        let reply = match self.wait_until_active(uploaded.clone()).await {
            Ok(active) => {
                self.generate(Some(&active), &build_analysis_prompt(target_language))
                    .await
            }
            Err(e) => Err(e),
        };
        self.delete(&uploaded).await;

        let analysis = parse_analysis(&reply?)?;
        tracing::info!(
            segments = analysis.segments.len(),
            detected_language = %analysis.detected_language,
            "Gemini analysis completed"
        );
        Ok(analysis)
    }

    #[tracing::instrument(skip(self), fields(model = %self.config.model))]
    async fn generate_metadata(
        &self,
        video_title: &str,
        target_language: &str,
    ) -> Result<VideoMetadata, AnalyzerError> {
        let prompt = build_metadata_prompt(video_title, target_language);
        let reply = self.generate(None, &prompt).await?;
        let metadata = parse_metadata(&reply, target_language)?;
        tracing::info!(tags = metadata.tags.len(), "Gemini metadata generated");
        Ok(metadata)
    }
}

/// Maps a non-success response to a typed error. Rate limits and overloads
/// are the retryable classes.
pub fn classify_failure(status: StatusCode, body: &str) -> AnalyzerError {
    let detail = format!("status {}: {}", status, sanitize_for_log(body));
    let upper = body.to_uppercase();

    if status == StatusCode::TOO_MANY_REQUESTS || upper.contains("RESOURCE_EXHAUSTED") || upper.contains("QUOTA") {
        AnalyzerError::RateLimited(detail)
    } else if status == StatusCode::SERVICE_UNAVAILABLE || upper.contains("UNAVAILABLE") || upper.contains("OVERLOADED") {
        AnalyzerError::Unavailable(detail)
    } else {
        AnalyzerError::ApiRequestFailed(detail)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AnalyzerError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(status, &body))
}

fn build_analysis_prompt(target_language: &str) -> String {
    format!(
        r#"You are a localization expert adapting spoken video content for {lang} audiences.

Watch the video and reply with JSON only, shaped like:
{{
  "video_title": "<short descriptive title>",
  "detected_language": "<spoken language>",
  "segments": [
    {{
      "start_time": "<MM:SS.mmm>",
      "end_time": "<MM:SS.mmm>",
      "original_text": "<exact speech>",
      "translated_text": "<{lang} transcreation>",
      "cultural_notes": "<what was adapted, if anything>"
    }}
  ],
  "cultural_analysis": [
    {{
      "timestamp": "<MM:SS>",
      "type": "<idiom|metaphor|reference|gesture|sensitivity>",
      "context": "<what the original said or showed>",
      "adaptation": "<how it was adapted>",
      "reasoning": "<why>"
    }}
  ],
  "tts_instructions": {{ "recommended_voice_gender": "<male|female|mixed>" }}
}}

Transcreate rather than translate word for word: replace idioms and cultural references with natural {lang} equivalents.
Keep technical terms where translating them would lose meaning. Timestamps must match the speech closely."#,
        lang = target_language
    )
}

/// `Hindi (हिंदी)` for supported codes, the raw value otherwise.
fn language_label(target_language: &str) -> String {
    match target_language.parse::<TargetLanguage>() {
        Ok(language) => format!("{} ({})", language.display_name(), language.native_name()),
        Err(_) => target_language.to_string(),
    }
}

fn build_metadata_prompt(video_title: &str, target_language: &str) -> String {
    format!(
        r#"You are a YouTube SEO expert for Indian language content.

A video titled "{title}" has been localized to {lang}. Write publishing metadata in {lang} that helps Indian audiences find it.

Reply with JSON only, shaped like:
{{
  "title": "<catchy title in {lang}, at most 100 characters, primary keyword included>",
  "description": "<200 to 500 characters in {lang}, hook in the first line, ends with a call to action>",
  "tags": ["<15 to 20 tags mixing {lang} and English>"]
}}"#,
        title = video_title,
        lang = language_label(target_language)
    )
}

#[derive(Debug, Deserialize)]
struct FileEnvelope {
    file: GeminiFile,
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiFile {
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default, rename = "mimeType")]
    mime_type: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}
