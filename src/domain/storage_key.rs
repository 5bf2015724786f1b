use std::fmt;

use super::JobId;

/// Object-store key following the bucket layout shared with the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn upload(file_name: &str) -> Self {
        Self(format!("uploads/{}", file_name))
    }

    pub fn localized_output(job_id: &JobId, target_language: &str) -> Self {
        Self(format!("outputs/{}/localized_{}.mp4", job_id, target_language))
    }

    pub fn compact_output(job_id: &JobId, target_language: &str) -> Self {
        Self(format!("outputs/{}/whatsapp_{}.mp4", job_id, target_language))
    }

    pub fn subtitles(job_id: &JobId) -> Self {
        Self(format!("subtitles/{}.vtt", job_id))
    }

    /// Validates a client-supplied key: relative, `/`-separated, no empty,
    /// `.` or `..` components and no backslashes.
    pub fn parse(raw: &str) -> Result<Self, InvalidStorageKey> {
        let raw = raw.trim();
        let malformed = raw.is_empty()
            || raw.contains('\\')
            || raw
                .split('/')
                .any(|part| part.is_empty() || part == "." || part == "..");
        if malformed {
            return Err(InvalidStorageKey(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path component, e.g. `lecture.mp4` for `uploads/lecture.mp4`.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid storage key {0:?}")]
pub struct InvalidStorageKey(pub String);

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
