//! Case-insensitive search over the loaded record set.

use crate::model::Student;

/// Return the records whose `studentId + name + email` contains `query`,
/// ignoring case, in their original order.
///
/// The query is trimmed first; a blank query matches every record.
pub fn filter_by_search<'a>(records: &'a [Student], query: &str) -> Vec<&'a Student> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    records
        .iter()
        .filter(|student| student.search_text().contains(&needle))
        .collect()
}
