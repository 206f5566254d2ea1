use crate::domain::service::{JournalLines, JournalQuery, JournalReader, ServiceError};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// サービスのジャーナルを表示するユースケース
pub struct FollowLogsUseCase {
    reader: Arc<dyn JournalReader>,
}

impl FollowLogsUseCase {
    pub fn new(reader: Arc<dyn JournalReader>) -> Self {
        Self { reader }
    }

    /// Forward journal lines to `sink` until the reader ends or Ctrl-C.
    pub async fn execute<F>(&self, query: &JournalQuery, sink: F) -> Result<usize, ServiceError>
    where
        F: FnMut(&str),
    {
        let shutdown = async {
            // If the handler cannot be installed, run until the stream ends.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        self.execute_until(query, shutdown, sink).await
    }

    /// Same as [`execute`](Self::execute) with a caller supplied shutdown signal.
    /// Returns the number of lines forwarded, or the reader's failure unless
    /// shutdown came first.
    pub async fn execute_until<S, F>(
        &self,
        query: &JournalQuery,
        shutdown: S,
        mut sink: F,
    ) -> Result<usize, ServiceError>
    where
        S: Future<Output = ()>,
        F: FnMut(&str),
    {
        info!(
            "Reading journal of {} (lines: {}, follow: {})",
            query.unit, query.lines, query.follow
        );
        let mut lines = self.reader.open(query).await?;
        let mut forwarded = 0;

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                line = lines.recv() => match line {
                    Some(Ok(line)) => {
                        sink(&line);
                        forwarded += 1;
                    }
                    Some(Err(e)) => return Err(e),
                    None => {
                        debug!("Journal stream ended");
                        break;
                    }
                },
                _ = &mut shutdown => {
                    info!("Interrupted, stopping log stream");
                    break;
                }
            }
        }

        Ok(forwarded)
    }
}
