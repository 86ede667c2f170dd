//! Data model types exchanged with the students API.

use serde::{Deserialize, Serialize};

/// A single student record as returned by `GET /students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Resource key, immutable once created
    pub student_id: String,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
}

impl Student {
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Lower-cased `studentId + name + email`, the haystack for search.
    pub fn search_text(&self) -> String {
        format!("{}{}{}", self.student_id, self.name, self.email).to_lowercase()
    }
}

/// Fields submitted when creating a student.
///
/// Values are kept as typed by the user; [`StudentFields::trimmed`] produces
/// the request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    pub student_id: String,
    pub name: String,
    pub email: String,
}

impl StudentFields {
    pub fn new(
        student_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Copy with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            student_id: self.student_id.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }

    /// True when any field is empty after trimming.
    pub fn has_blank(&self) -> bool {
        self.student_id.trim().is_empty()
            || self.name.trim().is_empty()
            || self.email.trim().is_empty()
    }
}

/// Partial update body for `PUT /students/{studentId}`.
///
/// Absent fields are omitted from the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl StudentPatch {
    /// Build a patch from raw form input, keeping only non-blank trimmed values.
    pub fn from_input(name: &str, email: &str) -> Self {
        fn keep(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }

        Self {
            name: keep(name),
            email: keep(email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_uses_camel_case_keys() {
        let json = r#"[{"studentId":"S1","name":"A","email":"a@x.com"}]"#;
        let students: Vec<Student> = serde_json::from_str(json).unwrap();
        assert_eq!(students, vec![Student::new("S1", "A", "a@x.com")]);
    }

    #[test]
    fn fields_serialize_with_student_id_key() {
        let body = serde_json::to_value(StudentFields::new("S2", "B", "b@x.com")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"studentId": "S2", "name": "B", "email": "b@x.com"})
        );
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        assert!(StudentFields::new("S1", "   ", "a@x.com").has_blank());
        assert!(StudentFields::new("", "A", "a@x.com").has_blank());
        assert!(!StudentFields::new(" S1 ", "A", "a@x.com").has_blank());
    }

    #[test]
    fn trimmed_strips_each_field() {
        let fields = StudentFields::new("  S1 ", " A", "a@x.com  ").trimmed();
        assert_eq!(fields, StudentFields::new("S1", "A", "a@x.com"));
    }

    #[test]
    fn patch_omits_blank_fields() {
        let patch = StudentPatch::from_input("", " new@x.com ");
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"email":"new@x.com"}"#
        );
        assert!(StudentPatch::from_input("  ", "").is_empty());
    }

    #[test]
    fn search_text_is_lowercase_concatenation() {
        let s = Student::new("S1", "Isaac Tan", "IT@X.com");
        assert_eq!(s.search_text(), "s1isaac tanit@x.com");
    }
}
