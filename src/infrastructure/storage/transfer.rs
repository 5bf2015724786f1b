use std::io;
use std::path::Path;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::application::ports::StorageError;
use crate::domain::StorageKey;

/// Multipart part size; S3 rejects non-final parts under 5 MiB.
const PART_SIZE: usize = 8 * 1024 * 1024;

pub(super) fn location(key: &StorageKey) -> StorePath {
    StorePath::from(key.as_str())
}

pub(super) async fn download_to_file(
    store: &dyn ObjectStore,
    key: &StorageKey,
    destination: &Path,
) -> Result<u64, StorageError> {
    let result = store.get(&location(key)).await.map_err(|e| match e {
        object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
        other => StorageError::DownloadFailed(other.to_string()),
    })?;

    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::File::create(destination).await?;
    let mut stream = result.into_stream();
    let mut total_bytes: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
        file.write_all(&bytes).await?;
        total_bytes += bytes.len() as u64;
    }
    file.flush().await?;

    tracing::debug!(key = %key, bytes = total_bytes, "Object downloaded");
    Ok(total_bytes)
}

pub(super) async fn upload_from_file(
    store: &dyn ObjectStore,
    source: &Path,
    key: &StorageKey,
) -> Result<u64, StorageError> {
    let mut file = tokio::fs::File::open(source).await?;
    let length = file.metadata().await?.len();
    let location = location(key);

    if length <= PART_SIZE as u64 {
        let mut data = Vec::with_capacity(length as usize);
        file.read_to_end(&mut data).await?;
        let sent = data.len() as u64;
        store
            .put(&location, PutPayload::from(Bytes::from(data)))
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        tracing::debug!(key = %key, bytes = sent, "Object uploaded");
        return Ok(sent);
    }

    let mut upload = store
        .put_multipart(&location)
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

    let mut total_bytes: u64 = 0;

    loop {
        let part = match read_part(&mut file).await {
            Ok(part) => part,
            Err(e) => {
                let _ = upload.abort().await;
                return Err(StorageError::Io(e));
            }
        };
        if part.is_empty() {
            break;
        }
        total_bytes += part.len() as u64;
        if let Err(e) = upload.put_part(PutPayload::from(Bytes::from(part))).await {
            let _ = upload.abort().await;
            return Err(StorageError::UploadFailed(e.to_string()));
        }
    }

    upload
        .complete()
        .await
        .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

    tracing::debug!(key = %key, bytes = total_bytes, "Object uploaded in parts");
    Ok(total_bytes)
}

async fn read_part(file: &mut tokio::fs::File) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0u8; PART_SIZE];
    let mut filled = 0;
    while filled < PART_SIZE {
        let read = file.read(&mut buffer[filled..]).await?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    buffer.truncate(filled);
    Ok(buffer)
}
