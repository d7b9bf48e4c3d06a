use crate::models::Note;

/// In-memory store of note records.
///
/// Created once at process start, injected into the service, and dropped
/// with the process; nothing survives a restart. There is no size cap or
/// eviction. Durable storage would slot in here, behind `NoteService`.
pub struct Registry {
    notes: Vec<Note>,
}

impl Registry {
    pub const fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Appends a record. Insertion order is the only ordering; reads never
    /// reorder.
    pub fn append(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn list(&self) -> Vec<Note> {
        self.notes.clone()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Removes the record with the given id. Returns false when no such
    /// record exists, so repeated deletes stay harmless.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        before != self.notes.len()
    }
}
