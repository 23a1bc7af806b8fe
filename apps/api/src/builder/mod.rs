//! Builder Orchestrator: a session owns one ResumeRecord and the selected template.
//! Editors and renderers only ever borrow the record for a single pass.

pub mod handlers;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use maud::Markup;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::editor::{skills_text, FormEditor};
use crate::export::notify::NotificationBoard;
use crate::layout::contract::{build_layout, ResumeLayout};
use crate::layout::print::{render_print, PrintDocument};
use crate::models::resume::ResumeRecord;
use crate::preview::render_preview_page;
use crate::templates::TemplateId;

pub struct BuilderSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    record: ResumeRecord,
    template: TemplateId,
    notifications: Arc<NotificationBoard>,
    exporting: Arc<AtomicBool>,
    /// Last time any request reached this session; drives idle eviction.
    last_seen: Mutex<Instant>,
}

impl BuilderSession {
    pub fn new(template: TemplateId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            record: ResumeRecord::default(),
            template,
            notifications: Arc::new(NotificationBoard::default()),
            exporting: Arc::new(AtomicBool::new(false)),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let last_seen = *self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        now.saturating_duration_since(last_seen)
    }

    pub fn record(&self) -> &ResumeRecord {
        &self.record
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    /// Switches templates. The record is untouched.
    pub fn select_template(&mut self, template: TemplateId) {
        self.template = template;
        self.updated_at = Utc::now();
    }

    /// Runs one edit against the record through a [`FormEditor`].
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut FormEditor<'_>) -> R) -> R {
        let mut editor = FormEditor::new(&mut self.record);
        let result = f(&mut editor);
        self.updated_at = Utc::now();
        result
    }

    pub fn layout(&self) -> ResumeLayout {
        build_layout(&self.record)
    }

    pub fn preview(&self) -> Markup {
        render_preview_page(&self.record, self.template)
    }

    pub fn print_document(&self) -> PrintDocument {
        render_print(&self.record, self.template)
    }

    pub fn notifications(&self) -> Arc<NotificationBoard> {
        Arc::clone(&self.notifications)
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    /// Claims the session's single export slot and snapshots what to export.
    /// Returns `None` while another export is in flight.
    pub fn begin_export(&self) -> Option<ExportTicket> {
        self.exporting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(ExportTicket {
            record: self.record.clone(),
            template: self.template,
            notifications: self.notifications(),
            _guard: ExportGuard(Arc::clone(&self.exporting)),
        })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id,
            template: self.template,
            record: self.record.clone(),
            skills_text: skills_text(&self.record),
            exporting: self.is_exporting(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Everything an export needs, detached from the session lock.
pub struct ExportTicket {
    pub record: ResumeRecord,
    pub template: TemplateId,
    pub notifications: Arc<NotificationBoard>,
    _guard: ExportGuard,
}

/// Releases the export slot when the ticket is dropped, on success or failure.
struct ExportGuard(Arc<AtomicBool>);

impl Drop for ExportGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub template: TemplateId,
    pub record: ResumeRecord,
    pub skills_text: String,
    pub exporting: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Session store
// ────────────────────────────────────────────────────────────────────────────

/// In-memory builder sessions. Nothing is persisted.
///
/// Clients rarely say goodbye: a reload or a closed tab simply stops sending
/// requests. Sessions idle for longer than `idle_ttl` are evicted, unless an
/// export is still running for them.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, BuilderSession>>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            idle_ttl,
        }
    }

    /// Opens an empty session. Idle sessions are evicted first; returns
    /// `None` when the store is still full.
    pub async fn open(&self, template: TemplateId) -> Option<SessionView> {
        let mut sessions = self.sessions.write().await;
        evict_idle(&mut sessions, self.idle_ttl);
        if sessions.len() >= self.max_sessions {
            return None;
        }
        let session = BuilderSession::new(template);
        let view = session.view();
        info!(session_id = %session.id, %template, "Builder session opened");
        sessions.insert(session.id, session);
        Some(view)
    }

    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&BuilderSession) -> R) -> Option<R> {
        self.sessions.read().await.get(&id).map(|session| {
            session.touch();
            f(session)
        })
    }

    pub async fn with_session_mut<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut BuilderSession) -> R,
    ) -> Option<R> {
        self.sessions.write().await.get_mut(&id).map(|session| {
            session.touch();
            f(session)
        })
    }

    /// Evicts idle sessions. Returns how many were removed.
    pub async fn prune_idle(&self) -> usize {
        evict_idle(&mut *self.sessions.write().await, self.idle_ttl)
    }

    /// Runs [`SessionStore::prune_idle`] every `period` for the life of the process.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            loop {
                tick.tick().await;
                let evicted = store.prune_idle().await;
                if evicted > 0 {
                    debug!(evicted, "Idle sweep finished");
                }
            }
        })
    }

    /// Discards a session and its record. Returns false if it did not exist.
    pub async fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Builder session closed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn evict_idle(sessions: &mut HashMap<Uuid, BuilderSession>, ttl: Duration) -> usize {
    let now = Instant::now();
    let before = sessions.len();
    sessions.retain(|id, session| {
        let keep = session.is_exporting() || session.idle_for(now) < ttl;
        if !keep {
            info!(session_id = %id, "Builder session expired");
        }
        keep
    });
    before - sessions.len()
}
