use crate::utils::AppError;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Explicitly constructed SMTP client; lifecycle is owned by the
/// process bootstrap, which hands it to the email worker.
#[derive(Clone)]
pub struct EmailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailClient {
    /// Build from environment. Credentials are optional so local dev
    /// servers (MailHog/Mailpit) work without auth.
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string());
        let port: u16 = std::env::var("SMTP_PORT")
            .unwrap_or_else(|_| "1025".to_string())
            .parse()
            .unwrap_or(1025);
        let from_email =
            std::env::var("SMTP_FROM_EMAIL").unwrap_or_else(|_| "noreply@localhost".to_string());
        let from_name =
            std::env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Profile Service".to_string());

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&host).port(port);

        if let (Ok(username), Ok(password)) =
            (std::env::var("SMTP_USERNAME"), std::env::var("SMTP_PASSWORD"))
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        let from = format!("{} <{}>", from_name, from_email)
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid SMTP_FROM_EMAIL: {}", e)))?;

        Ok(EmailClient {
            transport: builder.build(),
            from,
        })
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e| AppError::Validation(format!("Invalid recipient: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Validation(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::IoError(format!("SMTP send failed: {}", e)))?;

        Ok(())
    }
}
