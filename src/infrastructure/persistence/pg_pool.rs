use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::{info, instrument, warn};

use crate::application::ports::HistoryError;

const CONNECT_ATTEMPTS: u32 = 5;

/// Connects to the history database, retrying with a doubling delay while
/// the server comes up.
#[instrument(skip(url))]
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, HistoryError> {
    let mut attempt = 1;
    let mut delay = Duration::from_millis(500);

    loop {
        let connected = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(url)
            .await;

        match connected {
            Ok(pool) => {
                info!(attempt = attempt, "History database pool established");
                return Ok(pool);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(
                    error = %e,
                    attempt = attempt,
                    delay_ms = delay.as_millis() as u64,
                    "History database unreachable, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => return Err(HistoryError::ConnectionFailed(e.to_string())),
        }
    }
}
