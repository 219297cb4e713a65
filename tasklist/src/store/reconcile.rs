//! Pure reconciliation of the local task collection against server responses.
//!
//! Every function here takes the server's entity as authoritative and never
//! derives task fields locally. Position in the collection is preserved on
//! replacement so the list does not jump around after an edit or toggle.

use tasklist_proto::task::{Task, TaskId};

/// Appends a freshly created task to the end of the collection.
pub fn append_task(tasks: &mut Vec<Task>, created: Task) {
    tasks.push(created);
}

/// Replaces the task that was requested as `id` with the server's entity.
///
/// The slot is found by the requested id, not by the id the server echoed
/// back. Returns `false` (and leaves `tasks` untouched) if no local task has
/// that id, e.g. because it was removed while the request was in flight.
pub fn replace_task(tasks: &mut [Task], id: &TaskId, updated: Task) -> bool {
    match tasks.iter_mut().find(|t| &t.id == id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Removes the task with the given id.
///
/// Returns `true` if an entry was removed.
pub fn remove_task(tasks: &mut Vec<Task>, id: &TaskId) -> bool {
    let before = tasks.len();
    tasks.retain(|t| &t.id != id);
    tasks.len() != before
}
