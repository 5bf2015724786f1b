use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::application::ports::{
    AnalyzerError, ContentAnalyzer, HistoryStore, JobRegistry, MediaEngine, MediaError,
    RegistryError, SpeechSynthesizer, VideoStore,
};
use crate::application::services::job_workspace::JobWorkspace;
use crate::application::services::media_stitcher::{MediaStitcher, StitchRequest};
use crate::application::services::pipeline_error::PipelineError;
use crate::application::services::retry::RetryPolicy;
use crate::application::services::speech_coordinator::SpeechSynthesisCoordinator;
use crate::application::services::subtitle_formatter::render_captions;
use crate::domain::{
    DraftResult, FinalizeResult, HistoryStatus, Job, JobHistoryRecord, JobId, JobStatus,
    JobTransition, PhaseResult, Segment, StatusUpdate, StorageKey, TargetLanguage, UserId,
    VideoMetadata, VoiceGender, count_words,
};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 100;
const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "video/mp4";

pub struct PipelineCollaborators {
    pub registry: Arc<dyn JobRegistry>,
    pub store: Arc<dyn VideoStore>,
    pub analyzer: Arc<dyn ContentAnalyzer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub media: Arc<dyn MediaEngine>,
    pub history: Arc<dyn HistoryStore>,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub retry: RetryPolicy,
    pub compact_threshold_mb: f64,
    pub compact_target_mb: f64,
    pub url_ttl: Duration,
    pub optimize_for_mobile: bool,
    pub temp_root: PathBuf,
    pub synthesis_concurrency: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            compact_threshold_mb: 15.0,
            compact_target_mb: 14.5,
            url_ttl: Duration::from_secs(3600),
            optimize_for_mobile: true,
            temp_root: std::env::temp_dir(),
            synthesis_concurrency: 1,
        }
    }
}

/// Handle to a job's background task.
///
/// The task runs to completion whether or not the handle is awaited;
/// dropping or detaching it never cancels the job.
pub struct JobHandle {
    job_id: JobId,
    task: JoinHandle<()>,
}

impl JobHandle {
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Waits for the task to finish. Job failures are recorded on the job
    /// itself, not returned here.
    pub async fn wait(self) -> JobId {
        if let Err(e) = self.task.await {
            tracing::error!(job_id = %self.job_id, error = %e, "Job task did not complete");
        }
        self.job_id
    }

    pub fn detach(self) -> JobId {
        self.job_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub upload_url: String,
    pub file_key: StorageKey,
    pub expires_in: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub record: JobHistoryRecord,
    pub output_url: Option<String>,
    pub compact_url: Option<String>,
    pub subtitle_url: Option<String>,
    pub input_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub total_projects: usize,
    pub languages_used: usize,
    pub words_localized: u64,
}

impl HistoryStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a JobHistoryRecord>) -> Self {
        let mut languages = HashSet::new();
        let mut stats = HistoryStats::default();
        for record in records {
            stats.total_projects += 1;
            languages.insert(record.target_language.as_str());
            if record.status == HistoryStatus::Complete {
                stats.words_localized += record.words_localized.unwrap_or(0);
            }
        }
        stats.languages_used = languages.len();
        stats
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
    pub stats: HistoryStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub storage: bool,
    pub analyzer: bool,
    pub speech: bool,
    pub history: bool,
    pub media: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Draft,
    Finalize,
}

impl Phase {
    fn as_str(&self) -> &'static str {
        match self {
            Phase::Draft => "draft",
            Phase::Finalize => "finalize",
        }
    }
}

struct FinalizeInput {
    input: StorageKey,
    target_language: String,
    segments: Vec<Segment>,
    voice_gender: VoiceGender,
}

/// Drives the two-phase localization workflow.
///
/// Phase 1 downloads and analyzes a video into draft segments for review.
/// Phase 2 takes the reviewed segments, synthesizes speech, stitches it into
/// the video and publishes the outputs. Each phase runs as its own spawned
/// task that is the only writer of its job's state.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    registry: Arc<dyn JobRegistry>,
    store: Arc<dyn VideoStore>,
    analyzer: Arc<dyn ContentAnalyzer>,
    history: Arc<dyn HistoryStore>,
    media: Arc<dyn MediaEngine>,
    speech: Arc<SpeechSynthesisCoordinator>,
    stitcher: Arc<MediaStitcher>,
    settings: Arc<PipelineSettings>,
}

impl PipelineOrchestrator {
    pub fn new(collaborators: PipelineCollaborators, settings: PipelineSettings) -> Self {
        let speech = SpeechSynthesisCoordinator::new(
            collaborators.synthesizer,
            collaborators.media.clone(),
            settings.synthesis_concurrency,
        );
        let stitcher = MediaStitcher::new(
            collaborators.media.clone(),
            settings.compact_threshold_mb,
            settings.compact_target_mb,
        );

        Self {
            registry: collaborators.registry,
            store: collaborators.store,
            analyzer: collaborators.analyzer,
            history: collaborators.history,
            media: collaborators.media,
            speech: Arc::new(speech),
            stitcher: Arc::new(stitcher),
            settings: Arc::new(settings),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            storage: self.store.is_configured(),
            analyzer: self.analyzer.is_configured(),
            speech: self.speech.is_configured(),
            history: self.history.is_configured(),
            media: self.stitcher.is_configured(),
        }
    }

    pub async fn media_version(&self) -> Option<String> {
        if !self.media.is_configured() {
            return None;
        }
        self.media
            .version()
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Media engine version check failed"))
            .ok()
    }

    pub async fn request_upload_url(
        &self,
        file_name: &str,
        content_type: Option<&str>,
    ) -> Result<UploadTicket, PipelineError> {
        let file_name = file_name.trim();
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') || file_name.contains("..") {
            return Err(PipelineError::Validation(format!("invalid file name: {:?}", file_name)));
        }
        if !self.store.is_configured() {
            return Err(PipelineError::Configuration("object storage"));
        }

        let content_type = content_type
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_CONTENT_TYPE);
        let file_key = StorageKey::upload(file_name);
        let upload_url = self
            .store
            .presign_upload(&file_key, content_type, self.settings.url_ttl)
            .await?;

        tracing::info!(file_key = %file_key, "Upload URL issued");
        Ok(UploadTicket {
            upload_url,
            file_key,
            expires_in: self.settings.url_ttl,
        })
    }

    /// Registers a job and starts Phase 1 in the background.
    pub async fn create_draft(
        &self,
        input: StorageKey,
        target_language: &str,
        owner: Option<UserId>,
    ) -> Result<JobHandle, PipelineError> {
        if input.as_str().trim().is_empty() {
            return Err(PipelineError::Validation("file key is required".to_string()));
        }
        let input = StorageKey::parse(input.as_str())
            .map_err(|e| PipelineError::Validation(e.to_string()))?;
        if target_language.trim().is_empty() {
            return Err(PipelineError::Validation("target language is required".to_string()));
        }
        let target_language = target_language
            .parse::<TargetLanguage>()
            .map_err(|e| PipelineError::Validation(e.to_string()))?
            .code();
        if !self.store.is_configured() {
            return Err(PipelineError::Configuration("object storage"));
        }
        if !self.analyzer.is_configured() {
            return Err(PipelineError::Configuration("content analyzer"));
        }

        let job_id = self
            .registry
            .create(input.clone(), target_language, owner.clone())
            .await?;
        tracing::info!(
            job_id = %job_id,
            input = %input,
            target_language = %target_language,
            "Draft job created"
        );

        let this = self.clone();
        let language = target_language.to_string();
        let span = tracing::info_span!("localization_job", job_id = %job_id, phase = Phase::Draft.as_str());
        let task = tokio::spawn(
            async move { this.run_draft(job_id, input, language, owner).await }.instrument(span),
        );

        Ok(JobHandle { job_id, task })
    }

    /// Accepts reviewed segments for an existing job and starts Phase 2.
    ///
    /// Validation happens before the job is touched: an empty segment list,
    /// an unknown or foreign job, or a job whose previous phase is still
    /// running are all rejected without any state change.
    pub async fn finalize(
        &self,
        job_id: JobId,
        segments: Vec<Segment>,
        caller: Option<UserId>,
    ) -> Result<JobHandle, PipelineError> {
        if segments.is_empty() {
            return Err(PipelineError::Validation(
                "approved segments must not be empty".to_string(),
            ));
        }

        self.find_job(job_id, caller.as_ref()).await?;
        if !self.store.is_configured() {
            return Err(PipelineError::Configuration("object storage"));
        }
        if !self.speech.is_configured() {
            return Err(PipelineError::Configuration("speech synthesizer"));
        }
        if !self.stitcher.is_configured() {
            return Err(PipelineError::Configuration("media engine"));
        }

        // Check-and-set in one step; a second concurrent call sees Pending.
        let job = self
            .registry
            .restart(job_id, "Finalization queued")
            .await
            .map_err(|e| match e {
                RegistryError::Busy(id) => PipelineError::JobBusy(id),
                other => other.into(),
            })?;

        let owner = job.owner.clone();
        if let Some(owner) = &owner {
            if let Err(e) = self
                .history
                .update_segments(owner, job_id, &segments, Some(HistoryStatus::Processing))
                .await
            {
                tracing::warn!(job_id = %job_id, error = %e, "Failed to record edited segments");
            }
        }

        let voice_gender = match &job.result {
            Some(PhaseResult::Draft(draft)) => draft.voice_gender,
            _ => VoiceGender::default(),
        };
        let input = FinalizeInput {
            input: job.input_reference,
            target_language: job.target_language,
            segments,
            voice_gender,
        };

        tracing::info!(job_id = %job_id, segments = input.segments.len(), "Finalization accepted");

        let this = self.clone();
        let span = tracing::info_span!("localization_job", job_id = %job_id, phase = Phase::Finalize.as_str());
        let task = tokio::spawn(async move { this.run_finalize(job_id, input, owner).await }.instrument(span));

        Ok(JobHandle { job_id, task })
    }

    /// Current snapshot of a job, including its phase result once complete.
    pub async fn poll_status(&self, job_id: JobId, caller: Option<&UserId>) -> Result<Job, PipelineError> {
        self.find_job(job_id, caller).await
    }

    /// Publishing copy for a completed job. Jobs no longer held in memory
    /// are looked up in the caller's history.
    pub async fn generate_metadata(
        &self,
        job_id: JobId,
        caller: Option<&UserId>,
    ) -> Result<VideoMetadata, PipelineError> {
        let (input, language) = match self.registry.get(job_id).await? {
            Some(job) if job.is_accessible_by(caller) => {
                if job.status != JobStatus::Complete {
                    return Err(PipelineError::Validation("job is not yet complete".to_string()));
                }
                (job.input_reference, job.target_language)
            }
            _ => self.archived_job(job_id, caller).await?,
        };
        if !self.analyzer.is_configured() {
            return Err(PipelineError::Configuration("content analyzer"));
        }

        let title = title_from_key(&input);
        let metadata = self
            .settings
            .retry
            .run(
                || self.analyzer.generate_metadata(&title, &language),
                AnalyzerError::is_transient,
            )
            .await?;
        tracing::info!(job_id = %job_id, title = %title, tags = metadata.tags.len(), "Metadata generated");
        Ok(metadata)
    }

    async fn archived_job(
        &self,
        job_id: JobId,
        caller: Option<&UserId>,
    ) -> Result<(StorageKey, String), PipelineError> {
        let Some(user_id) = caller else {
            return Err(PipelineError::JobNotFound(job_id));
        };
        if !self.history.is_configured() {
            return Err(PipelineError::JobNotFound(job_id));
        }
        self.history
            .get_history(user_id, MAX_HISTORY_LIMIT)
            .await?
            .into_iter()
            .find(|record| record.job_id == job_id)
            .map(|record| (record.input_key, record.target_language))
            .ok_or(PipelineError::JobNotFound(job_id))
    }

    /// The caller's history, newest first, with access URLs minted for this
    /// read only.
    pub async fn get_history(&self, user_id: &UserId, limit: Option<usize>) -> Result<HistoryPage, PipelineError> {
        if !self.history.is_configured() {
            return Err(PipelineError::Configuration("history store"));
        }

        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);
        let records = self.history.get_history(user_id, limit).await?;
        let stats = HistoryStats::from_records(&records);

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let output_url = self.fresh_url(record.output_key.as_ref()).await;
            let compact_url = self.fresh_url(record.compact_key.as_ref()).await;
            let subtitle_url = self.fresh_url(record.subtitle_key.as_ref()).await;
            let input_url = self.fresh_url(Some(&record.input_key)).await;
            entries.push(HistoryEntry {
                record,
                output_url,
                compact_url,
                subtitle_url,
                input_url,
            });
        }

        Ok(HistoryPage { entries, stats })
    }

    pub async fn delete_job(&self, user_id: &UserId, job_id: JobId) -> Result<(), PipelineError> {
        if !self.history.is_configured() {
            return Err(PipelineError::Configuration("history store"));
        }

        self.history.delete_job(user_id, job_id).await?;
        tracing::info!(job_id = %job_id, user_id = %user_id, "History record deleted");
        Ok(())
    }

    async fn find_job(&self, job_id: JobId, caller: Option<&UserId>) -> Result<Job, PipelineError> {
        match self.registry.get(job_id).await? {
            Some(job) if job.is_accessible_by(caller) => Ok(job),
            _ => Err(PipelineError::JobNotFound(job_id)),
        }
    }

    async fn advance(&self, job_id: JobId, transition: JobTransition) -> Result<(), PipelineError> {
        tracing::debug!(
            job_id = %job_id,
            status = %transition.status,
            progress = transition.progress,
            message = %transition.message,
            "Job status changed"
        );
        self.registry.transition(job_id, transition).await?;
        Ok(())
    }

    async fn run_draft(&self, job_id: JobId, input: StorageKey, target_language: String, owner: Option<UserId>) {
        let workspace = match JobWorkspace::create(&self.settings.temp_root, &job_id, Phase::Draft.as_str()) {
            Ok(workspace) => workspace,
            Err(e) => {
                self.record_failure(job_id, Phase::Draft, owner.as_ref(), &PipelineError::Workspace(e).to_string())
                    .await;
                return;
            }
        };

        let outcome = AssertUnwindSafe(self.draft_steps(job_id, &workspace, &input, &target_language, owner.as_ref()))
            .catch_unwind()
            .await;
        self.settle(job_id, Phase::Draft, owner.as_ref(), outcome).await;
        workspace.cleanup();
    }

    async fn draft_steps(
        &self,
        job_id: JobId,
        workspace: &JobWorkspace,
        input: &StorageKey,
        target_language: &str,
        owner: Option<&UserId>,
    ) -> Result<(), PipelineError> {
        self.advance(job_id, JobTransition::new(JobStatus::Uploading, 10, "Downloading video from storage"))
            .await?;
        let video = workspace.file("source_video.mp4");
        let bytes = self.store.download(input, &video).await?;
        tracing::debug!(bytes = bytes, "Source video downloaded");
        self.advance(job_id, JobTransition::new(JobStatus::Uploading, 25, "Video downloaded"))
            .await?;

        self.advance(
            job_id,
            JobTransition::new(JobStatus::Analyzing, 30, "Transcribing and translating with AI"),
        )
        .await?;
        let analysis = self
            .settings
            .retry
            .run(
                || self.analyzer.analyze_video(&video, target_language),
                AnalyzerError::is_transient,
            )
            .await?;
        self.advance(job_id, JobTransition::new(JobStatus::Analyzing, 90, "Analysis complete"))
            .await?;

        let mut draft = DraftResult::from_analysis(analysis);
        for segment in &mut draft.segments {
            segment.approved = false;
        }
        tracing::info!(
            segments = draft.segments.len(),
            cultural_notes = draft.cultural_analysis.len(),
            voice_gender = %draft.voice_gender,
            "Draft analysis ready"
        );

        if let Some(owner) = owner {
            let record = JobHistoryRecord::draft(
                owner.clone(),
                job_id,
                target_language.to_string(),
                input.clone(),
                draft.segments.clone(),
                draft.cultural_analysis.clone(),
            );
            if let Err(e) = self.history.save_draft(&record).await {
                tracing::warn!(error = %e, "Failed to save draft to history");
            }
        }

        let segments = draft.segments.len();
        self.advance(
            job_id,
            JobTransition::new(
                JobStatus::Complete,
                100,
                format!("Draft ready for review ({} segments)", segments),
            )
            .with_result(PhaseResult::Draft(draft)),
        )
        .await
    }

    async fn run_finalize(&self, job_id: JobId, input: FinalizeInput, owner: Option<UserId>) {
        let workspace = match JobWorkspace::create(&self.settings.temp_root, &job_id, Phase::Finalize.as_str()) {
            Ok(workspace) => workspace,
            Err(e) => {
                self.record_failure(
                    job_id,
                    Phase::Finalize,
                    owner.as_ref(),
                    &PipelineError::Workspace(e).to_string(),
                )
                .await;
                return;
            }
        };

        let outcome = AssertUnwindSafe(self.finalize_steps(job_id, &workspace, &input, owner.as_ref()))
            .catch_unwind()
            .await;
        self.settle(job_id, Phase::Finalize, owner.as_ref(), outcome).await;
        workspace.cleanup();
    }

    async fn finalize_steps(
        &self,
        job_id: JobId,
        workspace: &JobWorkspace,
        input: &FinalizeInput,
        owner: Option<&UserId>,
    ) -> Result<(), PipelineError> {
        let language = input.target_language.as_str();

        self.advance(job_id, JobTransition::new(JobStatus::Uploading, 5, "Downloading original video"))
            .await?;
        let video = workspace.file("source_video.mp4");
        self.store.download(&input.input, &video).await?;
        self.advance(job_id, JobTransition::new(JobStatus::Uploading, 15, "Video downloaded"))
            .await?;

        self.advance(
            job_id,
            JobTransition::new(
                JobStatus::GeneratingAudio,
                20,
                format!("Generating speech for {} segments", input.segments.len()),
            ),
        )
        .await?;
        let audio = self
            .speech
            .synthesize_segments(&input.segments, language, input.voice_gender, &workspace.file("audio"))
            .await?;
        self.advance(
            job_id,
            JobTransition::new(JobStatus::GeneratingAudio, 50, format!("Generated {} audio clips", audio.len())),
        )
        .await?;

        self.advance(job_id, JobTransition::new(JobStatus::Stitching, 55, "Stitching audio and video"))
            .await?;
        let audio_delay_seconds = input
            .segments
            .first()
            .map(|segment| segment.start_time.max(0.0))
            .unwrap_or(0.0);
        let request = StitchRequest {
            video,
            audio,
            audio_delay_seconds,
            work_dir: workspace.path().to_path_buf(),
            output: workspace.file(&format!("localized_{}.mp4", language)),
            compact_output: workspace.file(&format!("whatsapp_{}.mp4", language)),
            optimize_for_mobile: self.settings.optimize_for_mobile,
        };
        let outcome = self.stitcher.stitch_with_compact(&request).await?;
        let primary_path = outcome
            .primary
            .output()
            .ok_or_else(|| MediaError::InvalidInput("stitched output missing".to_string()))?;

        self.advance(job_id, JobTransition::new(JobStatus::Stitching, 80, "Uploading localized video"))
            .await?;
        let output_key = StorageKey::localized_output(&job_id, language);
        self.store.upload(primary_path, &output_key).await?;
        let output_url = self
            .store
            .presign_download(&output_key, self.settings.url_ttl)
            .await?;

        let (compact_key, compact_url) = match outcome.compact.as_ref().and_then(|c| c.output()) {
            Some(path) => self.publish_compact(job_id, language, path).await,
            None => (None, None),
        };

        self.advance(job_id, JobTransition::new(JobStatus::Stitching, 85, "Generating subtitles"))
            .await?;
        let subtitle_key = self.publish_subtitles(job_id, workspace, &input.segments).await;

        let words_localized = count_words(&input.segments);
        let size_mb = outcome.primary.size_mb();
        let compact_error = outcome
            .compact
            .as_ref()
            .and_then(|compact| compact.error())
            .map(String::from);
        if let Some(reason) = &compact_error {
            tracing::warn!(reason = %reason, "Compact variant not produced");
        }
        let result = FinalizeResult {
            output_key: output_key.clone(),
            output_url,
            compact_key: compact_key.clone(),
            compact_url,
            subtitle_key: subtitle_key.clone(),
            compact_error,
            size_mb,
            duration_seconds: outcome.primary.duration_seconds(),
            words_localized,
        };

        self.advance(
            job_id,
            JobTransition::new(JobStatus::Complete, 100, "Localization complete")
                .with_output(output_key.clone())
                .with_result(PhaseResult::Finalized(result)),
        )
        .await?;

        if let Some(owner) = owner {
            let update = StatusUpdate {
                status: HistoryStatus::Complete,
                output_key: Some(output_key),
                compact_key,
                subtitle_key,
                words_localized: Some(words_localized as u64),
                size_mb: Some(size_mb),
                error: None,
            };
            if let Err(e) = self.history.update_status(owner, job_id, &update).await {
                tracing::warn!(error = %e, "Failed to record completion in history");
            }
        }

        tracing::info!(size_mb = size_mb, words = words_localized, "Localization complete");
        Ok(())
    }

    async fn publish_compact(
        &self,
        job_id: JobId,
        language: &str,
        path: &std::path::Path,
    ) -> (Option<StorageKey>, Option<String>) {
        let key = StorageKey::compact_output(&job_id, language);
        if let Err(e) = self.store.upload(path, &key).await {
            tracing::warn!(error = %e, "Failed to upload compact variant");
            return (None, None);
        }
        match self.store.presign_download(&key, self.settings.url_ttl).await {
            Ok(url) => (Some(key), Some(url)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to sign compact variant URL");
                (Some(key), None)
            }
        }
    }

    /// Writes and uploads the caption track. Failures are logged only.
    async fn publish_subtitles(
        &self,
        job_id: JobId,
        workspace: &JobWorkspace,
        segments: &[Segment],
    ) -> Option<StorageKey> {
        let path = workspace.file("subtitles.vtt");
        if let Err(e) = tokio::fs::write(&path, render_captions(segments)).await {
            tracing::warn!(error = %e, "Failed to write subtitles");
            return None;
        }

        let key = StorageKey::subtitles(&job_id);
        match self.store.upload(&path, &key).await {
            Ok(_) => Some(key),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to upload subtitles");
                None
            }
        }
    }

    async fn settle(
        &self,
        job_id: JobId,
        phase: Phase,
        owner: Option<&UserId>,
        outcome: Result<Result<(), PipelineError>, Box<dyn Any + Send>>,
    ) {
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Job failed");
                self.record_failure(job_id, phase, owner, &e.to_string()).await;
            }
            Err(panic) => {
                let error = PipelineError::Panicked(panic_message(panic.as_ref()));
                tracing::error!(error = %error, "Job task panicked");
                self.record_failure(job_id, phase, owner, &error.to_string()).await;
            }
        }
    }

    async fn record_failure(&self, job_id: JobId, phase: Phase, owner: Option<&UserId>, error: &str) {
        if let Err(e) = self.registry.fail(job_id, error).await {
            tracing::error!(error = %e, "Failed to mark job as failed");
        }

        if phase == Phase::Finalize {
            if let Some(owner) = owner {
                let update = StatusUpdate::failed(error);
                if let Err(e) = self.history.update_status(owner, job_id, &update).await {
                    tracing::warn!(error = %e, "Failed to record failure in history");
                }
            }
        }
    }

    async fn fresh_url(&self, key: Option<&StorageKey>) -> Option<String> {
        let key = key?;
        if !self.store.is_configured() {
            return None;
        }
        self.store
            .presign_download(key, self.settings.url_ttl)
            .await
            .inspect_err(|e| tracing::warn!(key = %key, error = %e, "Failed to sign history URL"))
            .ok()
    }
}

/// `uploads/masala_chai.mp4` becomes `Masala Chai`.
fn title_from_key(key: &StorageKey) -> String {
    let name = key.file_name();
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let title = stem
        .replace('_', " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    if title.is_empty() {
        "Localized Video".to_string()
    } else {
        title
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
