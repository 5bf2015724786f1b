use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use nativity::application::ports::{
    AnalyzerError, ContentAnalyzer, JobRegistry, MediaEngine, MediaError, MediaProbe, MuxRequest,
    RegistryError, SpeechSynthesizer, StorageError, SynthesisError, SynthesizedClip,
    TranscodeRequest, VideoStore,
};
use nativity::domain::{
    Job, JobId, JobStatus, JobTransition, StorageKey, UserId, VideoAnalysis, VideoMetadata,
    VoiceGender,
};
use nativity::infrastructure::persistence::InMemoryJobRegistry;

const MB: u64 = 1024 * 1024;

/// Object store kept in a map. Uploads read the real file so tests can
/// inspect what was published.
pub struct MockVideoStore {
    configured: bool,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    failing_prefix: Option<String>,
}

impl MockVideoStore {
    pub fn new() -> Self {
        Self {
            configured: true,
            objects: Mutex::new(HashMap::new()),
            failing_prefix: None,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Uploads to keys starting with `prefix` fail.
    pub fn failing_uploads_to(prefix: &str) -> Self {
        Self {
            failing_prefix: Some(prefix.to_string()),
            ..Self::new()
        }
    }

    pub fn put(&self, key: &StorageKey, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn object(&self, key: &StorageKey) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key.as_str()).cloned()
    }

    pub fn contains(&self, key: &StorageKey) -> bool {
        self.objects.lock().unwrap().contains_key(key.as_str())
    }

    pub fn remove(&self, key: &StorageKey) {
        self.objects.lock().unwrap().remove(key.as_str());
    }
}

pub fn signed(key: &StorageKey, expires_in: Duration) -> String {
    format!("https://signed.test/{}?expires={}", key, expires_in.as_secs())
}

#[async_trait]
impl VideoStore for MockVideoStore {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn download(&self, key: &StorageKey, destination: &Path) -> Result<u64, StorageError> {
        let data = self
            .object(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        tokio::fs::write(destination, &data).await?;
        Ok(data.len() as u64)
    }

    async fn upload(&self, source: &Path, key: &StorageKey) -> Result<u64, StorageError> {
        if let Some(prefix) = &self.failing_prefix {
            if key.as_str().starts_with(prefix.as_str()) {
                return Err(StorageError::UploadFailed(format!("refused {}", key)));
            }
        }
        let data = tokio::fs::read(source).await?;
        let size = data.len() as u64;
        self.put(key, &data);
        Ok(size)
    }

    async fn presign_download(&self, key: &StorageKey, expires_in: Duration) -> Result<String, StorageError> {
        Ok(signed(key, expires_in))
    }

    async fn presign_upload(
        &self,
        key: &StorageKey,
        _content_type: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        Ok(format!("{}&method=put", signed(key, expires_in)))
    }
}

enum Fallback {
    Analysis(VideoAnalysis),
    Error(fn() -> AnalyzerError),
}

/// Scripted analyzer: queued errors are returned first, then the fallback.
pub struct MockAnalyzer {
    configured: bool,
    queued: Mutex<VecDeque<AnalyzerError>>,
    fallback: Fallback,
    calls: AtomicU32,
    metadata_requests: Mutex<Vec<(String, String)>>,
}

impl MockAnalyzer {
    pub fn returning(analysis: VideoAnalysis) -> Self {
        Self {
            configured: true,
            queued: Mutex::new(VecDeque::new()),
            fallback: Fallback::Analysis(analysis),
            calls: AtomicU32::new(0),
            metadata_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn always_failing(error: fn() -> AnalyzerError) -> Self {
        Self {
            fallback: Fallback::Error(error),
            ..Self::returning(VideoAnalysis::default())
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::returning(VideoAnalysis::default())
        }
    }

    pub fn with_failures(self, errors: Vec<AnalyzerError>) -> Self {
        *self.queued.lock().unwrap() = errors.into();
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(video_title, target_language)` per metadata call.
    pub fn metadata_requests(&self) -> Vec<(String, String)> {
        self.metadata_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentAnalyzer for MockAnalyzer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn analyze_video(&self, video: &Path, _target_language: &str) -> Result<VideoAnalysis, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !video.exists() {
            return Err(AnalyzerError::UploadFailed(format!("{} missing", video.display())));
        }
        if let Some(error) = self.queued.lock().unwrap().pop_front() {
            return Err(error);
        }
        match &self.fallback {
            Fallback::Analysis(analysis) => Ok(analysis.clone()),
            Fallback::Error(make) => Err(make()),
        }
    }

    async fn generate_metadata(&self, video_title: &str, target_language: &str) -> Result<VideoMetadata, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.metadata_requests
            .lock()
            .unwrap()
            .push((video_title.to_string(), target_language.to_string()));
        if let Some(error) = self.queued.lock().unwrap().pop_front() {
            return Err(error);
        }
        if let Fallback::Error(make) = &self.fallback {
            return Err(make());
        }
        Ok(VideoMetadata {
            title: format!("{} ({})", video_title, target_language),
            description: "Localized for you".to_string(),
            tags: vec![target_language.to_string(), "localized".to_string()],
            language: target_language.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisCall {
    pub text: String,
    pub language: String,
    pub gender: VoiceGender,
}

/// Writes a tiny clip per call. Texts listed in `failing_text` error out.
pub struct MockSpeechSynthesizer {
    configured: bool,
    failing_text: Option<String>,
    reports_duration: bool,
    calls: Mutex<Vec<SynthesisCall>>,
}

impl MockSpeechSynthesizer {
    pub fn new() -> Self {
        Self {
            configured: true,
            failing_text: None,
            reports_duration: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(text: &str) -> Self {
        Self {
            failing_text: Some(text.to_string()),
            ..Self::new()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Clips come back without a length, like voices that do not report one.
    pub fn without_durations() -> Self {
        Self {
            reports_duration: false,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn synthesize(
        &self,
        text: &str,
        language: &str,
        gender: VoiceGender,
        destination: &Path,
    ) -> Result<SynthesizedClip, SynthesisError> {
        self.calls.lock().unwrap().push(SynthesisCall {
            text: text.to_string(),
            language: language.to_string(),
            gender,
        });
        if self.failing_text.as_deref() == Some(text) {
            return Err(SynthesisError::ApiRequestFailed(format!("voice rejected {:?}", text)));
        }

        // Shorter texts finish later so completion order differs from input order.
        tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(text.len() as u64))).await;
        tokio::fs::write(destination, text.as_bytes()).await?;
        Ok(SynthesizedClip {
            path: destination.to_path_buf(),
            duration_seconds: self.reports_duration.then_some(1.0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MuxFault {
    Error,
    Panic,
}

/// Codec engine that writes placeholder files and reports configured sizes.
///
/// Probes of `localized_*` files report `output_size_mb`, `whatsapp_*`
/// files report `compact_size_mb`; anything else is the source video.
pub struct MockMediaEngine {
    configured: bool,
    output_size_mb: f64,
    compact_size_mb: f64,
    duration_seconds: f64,
    fail_transcode: bool,
    mux_fault: Option<MuxFault>,
    concats: Mutex<Vec<Vec<PathBuf>>>,
    muxes: Mutex<Vec<MuxRequest>>,
    transcodes: Mutex<Vec<TranscodeRequest>>,
}

impl MockMediaEngine {
    pub fn new() -> Self {
        Self {
            configured: true,
            output_size_mb: 10.0,
            compact_size_mb: 14.0,
            duration_seconds: 60.0,
            fail_transcode: false,
            mux_fault: None,
            concats: Mutex::new(Vec::new()),
            muxes: Mutex::new(Vec::new()),
            transcodes: Mutex::new(Vec::new()),
        }
    }

    pub fn producing_output_of(size_mb: f64) -> Self {
        Self {
            output_size_mb: size_mb,
            ..Self::new()
        }
    }

    pub fn with_failing_transcode(self) -> Self {
        Self {
            fail_transcode: true,
            ..self
        }
    }

    pub fn with_failing_mux(self) -> Self {
        Self {
            mux_fault: Some(MuxFault::Error),
            ..self
        }
    }

    pub fn panicking_on_mux(self) -> Self {
        Self {
            mux_fault: Some(MuxFault::Panic),
            ..self
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn concats(&self) -> Vec<Vec<PathBuf>> {
        self.concats.lock().unwrap().clone()
    }

    pub fn muxes(&self) -> Vec<MuxRequest> {
        self.muxes.lock().unwrap().clone()
    }

    pub fn transcodes(&self) -> Vec<TranscodeRequest> {
        self.transcodes.lock().unwrap().clone()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl MediaEngine for MockMediaEngine {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn version(&self) -> Result<String, MediaError> {
        Ok("ffmpeg version 6.1-test".to_string())
    }

    async fn probe(&self, path: &Path) -> Result<MediaProbe, MediaError> {
        if !path.exists() {
            return Err(MediaError::ProbeFailed(format!("{} missing", path.display())));
        }
        let name = file_name(path);
        let size_mb = if name.starts_with("localized_") {
            self.output_size_mb
        } else if name.starts_with("whatsapp_") {
            self.compact_size_mb
        } else {
            1.0
        };
        Ok(MediaProbe {
            duration_seconds: self.duration_seconds,
            size_bytes: (size_mb * MB as f64) as u64,
            width: Some(1280),
            height: Some(720),
        })
    }

    async fn concat_audio(&self, inputs: &[PathBuf], output: &Path) -> Result<(), MediaError> {
        self.concats.lock().unwrap().push(inputs.to_vec());
        tokio::fs::write(output, b"combined").await?;
        Ok(())
    }

    async fn replace_audio(&self, request: &MuxRequest) -> Result<(), MediaError> {
        self.muxes.lock().unwrap().push(request.clone());
        match self.mux_fault {
            Some(MuxFault::Error) => {
                return Err(MediaError::CommandFailed {
                    tool: "ffmpeg".to_string(),
                    exit_code: 1,
                    message: "muxer rejected stream".to_string(),
                });
            }
            Some(MuxFault::Panic) => panic!("muxer state corrupted"),
            None => {}
        }
        tokio::fs::write(&request.output, b"localized").await?;
        Ok(())
    }

    async fn transcode(&self, request: &TranscodeRequest) -> Result<(), MediaError> {
        self.transcodes.lock().unwrap().push(request.clone());
        if self.fail_transcode {
            return Err(MediaError::CommandFailed {
                tool: "ffmpeg".to_string(),
                exit_code: 1,
                message: "encoder exploded".to_string(),
            });
        }
        tokio::fs::write(&request.output, b"compact").await?;
        Ok(())
    }
}

/// In-memory registry that yields before every read and records each
/// accepted transition, so tests can interleave callers and inspect the
/// progress a job reported.
pub struct RecordingRegistry {
    inner: InMemoryJobRegistry,
    transitions: Mutex<Vec<(JobId, JobStatus, u8, String)>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self {
            inner: InMemoryJobRegistry::new(),
            transitions: Mutex::new(Vec::new()),
        }
    }

    pub async fn job_count(&self) -> usize {
        self.inner.job_count().await
    }

    /// `(status, progress, message)` in the order they were applied.
    pub fn transitions(&self, id: JobId) -> Vec<(JobStatus, u8, String)> {
        self.transitions
            .lock()
            .unwrap()
            .iter()
            .filter(|(job_id, ..)| *job_id == id)
            .map(|(_, status, progress, message)| (*status, *progress, message.clone()))
            .collect()
    }

    fn record(&self, id: JobId, status: JobStatus, progress: u8, message: &str) {
        self.transitions
            .lock()
            .unwrap()
            .push((id, status, progress, message.to_string()));
    }
}

#[async_trait]
impl JobRegistry for RecordingRegistry {
    async fn create(
        &self,
        input_reference: StorageKey,
        target_language: &str,
        owner: Option<UserId>,
    ) -> Result<JobId, RegistryError> {
        self.inner.create(input_reference, target_language, owner).await
    }

    async fn transition(&self, id: JobId, transition: JobTransition) -> Result<(), RegistryError> {
        let (status, progress, message) = (transition.status, transition.progress, transition.message.clone());
        self.inner.transition(id, transition).await?;
        self.record(id, status, progress, &message);
        Ok(())
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<(), RegistryError> {
        self.inner.fail(id, error).await?;
        self.record(id, JobStatus::Failed, 0, error);
        Ok(())
    }

    async fn restart(&self, id: JobId, message: &str) -> Result<Job, RegistryError> {
        let previous = self.inner.restart(id, message).await?;
        self.record(id, JobStatus::Pending, 0, message);
        Ok(previous)
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, RegistryError> {
        tokio::task::yield_now().await;
        self.inner.get(id).await
    }
}
