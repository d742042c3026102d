use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

/// One outbound report email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportEmail {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
    pub attachment: Option<PathBuf>,
}

/// Mail delivery boundary. Object-safe so the orchestrator can hold a
/// `&dyn Mailer` and the scenario tests can substitute a recorder.
pub trait Mailer {
    fn name(&self) -> &'static str;

    fn send(&self, email: &ReportEmail) -> Result<()>;
}

/// Dry-run mailer: logs the email instead of delivering it. Default when
/// no SMTP relay is configured.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn name(&self) -> &'static str {
        "log"
    }

    fn send(&self, email: &ReportEmail) -> Result<()> {
        info!(
            subject = %email.subject,
            recipients = ?email.recipients,
            attachment = ?email.attachment,
            "dry-run mail (no relay configured)"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_mailer_always_succeeds() {
        let mailer: Box<dyn Mailer> = Box::new(LogMailer);
        assert_eq!(mailer.name(), "log");
        mailer
            .send(&ReportEmail {
                subject: "Survey QC failure report 2026-08-27".into(),
                body: "1 feature(s) could not be processed.".into(),
                recipients: vec!["qc@example.com".into()],
                attachment: None,
            })
            .unwrap();
    }
}
