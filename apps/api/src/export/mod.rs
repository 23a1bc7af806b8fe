//! Export Pipeline: print layout -> document engine -> downloadable artifact.
//! A failed export is reported once and never retried; the record is only borrowed.

pub mod engine;
pub mod notify;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::export::engine::{DocumentEngine, EngineError};
use crate::export::notify::{NotificationState, Notifier};
use crate::layout::print::render_print;
use crate::models::resume::ResumeRecord;
use crate::templates::TemplateId;

/// Stable id for export notifications; each state replaces the previous one.
pub const EXPORT_NOTIFICATION_ID: &str = "pdf-download";

const MSG_IN_PROGRESS: &str = "Generating PDF...";
const MSG_SUCCESS: &str = "Resume downloaded successfully!";
const MSG_FAILURE: &str = "Failed to generate PDF. Please try again.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document generation failed: {0}")]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// `{fullName}_CV.pdf`, or `Resume_CV.pdf` when no name has been entered.
pub fn export_filename(record: &ResumeRecord) -> String {
    let name = record.personal_info.full_name.as_str();
    let stem = if name.is_empty() { "Resume" } else { name };
    format!("{stem}_CV.pdf")
}

pub async fn export_resume(
    record: &ResumeRecord,
    template: TemplateId,
    engine: &dyn DocumentEngine,
    notifier: &dyn Notifier,
) -> Result<ExportArtifact, ExportError> {
    notifier.notify(
        EXPORT_NOTIFICATION_ID,
        NotificationState::InProgress,
        MSG_IN_PROGRESS,
    );

    let document = render_print(record, template);
    info!(
        template = %template,
        pages = document.pages.len(),
        sections = ?document.section_kinds(),
        "Rendering export"
    );

    match engine.render(&document).await {
        Ok(bytes) => {
            notifier.notify(EXPORT_NOTIFICATION_ID, NotificationState::Success, MSG_SUCCESS);
            Ok(ExportArtifact {
                filename: export_filename(record),
                content_type: engine.content_type(),
                bytes,
            })
        }
        Err(e) => {
            warn!("Export failed: {e}");
            notifier.notify(EXPORT_NOTIFICATION_ID, NotificationState::Error, MSG_FAILURE);
            Err(e.into())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{FailingEngine, StaticEngine};
    use super::*;
    use crate::export::notify::NotificationBoard;

    fn named(name: &str) -> ResumeRecord {
        let mut record = ResumeRecord::default();
        record.personal_info.full_name = name.to_string();
        record
    }

    #[test]
    fn test_filename_uses_full_name() {
        assert_eq!(export_filename(&named("Jane Doe")), "Jane Doe_CV.pdf");
    }

    #[test]
    fn test_filename_defaults_to_resume() {
        assert_eq!(export_filename(&ResumeRecord::default()), "Resume_CV.pdf");
    }

    #[tokio::test]
    async fn test_successful_export_notifies_success() {
        let record = named("Jane");
        let board = NotificationBoard::default();

        let artifact = export_resume(&record, TemplateId::Modern, &StaticEngine, &board)
            .await
            .unwrap();

        assert_eq!(artifact.filename, "Jane_CV.pdf");
        assert_eq!(artifact.content_type, "application/pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
        let note = board.get(EXPORT_NOTIFICATION_ID).unwrap();
        assert_eq!(note.state, NotificationState::Success);
        assert_eq!(note.message, MSG_SUCCESS);
    }

    #[tokio::test]
    async fn test_failed_export_notifies_error_and_leaves_record() {
        let record = named("Jane");
        let before = record.clone();
        let board = NotificationBoard::default();

        let result = export_resume(&record, TemplateId::Elegant, &FailingEngine, &board).await;

        assert!(matches!(result, Err(ExportError::Engine(EngineError::Render(_)))));
        assert_eq!(record, before);
        let notes = board.snapshot();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].state, NotificationState::Error);
        assert_eq!(notes[0].message, MSG_FAILURE);
    }

    #[tokio::test]
    async fn test_retry_after_failure_succeeds() {
        let record = named("Jane");
        let board = NotificationBoard::default();

        assert!(export_resume(&record, TemplateId::Modern, &FailingEngine, &board)
            .await
            .is_err());
        assert!(export_resume(&record, TemplateId::Modern, &StaticEngine, &board)
            .await
            .is_ok());
        assert_eq!(
            board.get(EXPORT_NOTIFICATION_ID).map(|n| n.state),
            Some(NotificationState::Success)
        );
    }
}
