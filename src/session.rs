//! Session-scoped transcript storage.
//!
//! Holds the most recently analyzed transcript per user session, in memory
//! only. Sessions are fully isolated from each other; a transcript lives
//! until the next successful analysis in the same session replaces it.

use crate::transcription::Transcript;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory per-session transcript store.
pub struct SessionStore {
    transcripts: RwLock<HashMap<String, Transcript>>,
}

impl SessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            transcripts: RwLock::new(HashMap::new()),
        }
    }

    /// Store a transcript for a session, replacing any previous one.
    pub fn put(&self, session_id: &str, transcript: Transcript) {
        let mut transcripts = self.transcripts.write().unwrap();
        transcripts.insert(session_id.to_string(), transcript);
    }

    /// Get the transcript stored for a session, if any.
    pub fn get(&self, session_id: &str) -> Option<Transcript> {
        let transcripts = self.transcripts.read().unwrap();
        transcripts.get(session_id).cloned()
    }

    /// Remove a session's transcript.
    pub fn remove(&self, session_id: &str) -> Option<Transcript> {
        let mut transcripts = self.transcripts.write().unwrap();
        transcripts.remove(session_id)
    }

    /// Number of sessions currently holding a transcript.
    pub fn len(&self) -> usize {
        let transcripts = self.transcripts.read().unwrap();
        transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
