//! Interactive confirmation before a deletion is sent.

/// Asks the user whether a student should really be deleted.
///
/// Implemented for any `FnMut(&str) -> bool`, so tests and scripts can pass
/// a closure.
pub trait DeleteConfirmation {
    /// Return `true` to proceed with deleting `student_id`.
    fn confirm_delete(&mut self, student_id: &str) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm_delete(&mut self, student_id: &str) -> bool {
        self(student_id)
    }
}
