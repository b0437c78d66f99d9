pub mod email_worker;

pub use email_worker::{start_email_worker, EmailJob, EmailQueue};
