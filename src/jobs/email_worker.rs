use crate::services::email_service::EmailClient;
use tokio::sync::mpsc;

const QUEUE_CAPACITY: usize = 256;

/// Notification job handed from request handlers to the worker.
#[derive(Debug, Clone)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Handle shared with request handlers. Enqueue failures are logged and
/// swallowed: notification delivery never fails a request.
#[derive(Clone)]
pub struct EmailQueue {
    tx: mpsc::Sender<EmailJob>,
}

impl EmailQueue {
    pub fn enqueue(&self, job: EmailJob) {
        if let Err(e) = self.tx.try_send(job) {
            log::warn!("📭 Email queue full or closed, dropping notification: {}", e);
        }
    }
}

/// Spawns the worker task consuming the queue; the client's lifecycle
/// is owned here, not by a global.
pub fn start_email_worker(client: EmailClient) -> EmailQueue {
    let (tx, mut rx) = mpsc::channel::<EmailJob>(QUEUE_CAPACITY);

    tokio::spawn(async move {
        log::info!("📬 Email worker started");
        while let Some(job) = rx.recv().await {
            match client.send(&job.to, &job.subject, &job.body).await {
                Ok(()) => log::info!("📧 Sent '{}' to {}", job.subject, job.to),
                Err(e) => log::error!("❌ Failed to send '{}' to {}: {}", job.subject, job.to, e),
            }
        }
        log::info!("📬 Email worker stopped");
    });

    EmailQueue { tx }
}
