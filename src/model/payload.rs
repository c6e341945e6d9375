use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the structured data file that marks a project leaf.
pub const DATA_FILE: &str = "project.json";

/// Key of the opaque rich-document field owned by the external editor.
pub const NOTES_DOC_KEY: &str = "notesDoc";

/// Input kind of an editable payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// The stable editable key set, in display order.
pub const FIELDS: &[(&str, FieldKind)] = &[
    ("title", FieldKind::Text),
    ("description", FieldKind::Text),
    ("type", FieldKind::Text),
    ("building", FieldKind::Text),
    ("percentComplete", FieldKind::Number),
    ("status", FieldKind::Text),
    ("assignedDate", FieldKind::Date),
    ("ecDate", FieldKind::Date),
    ("actualEcDate", FieldKind::Date),
    ("priority", FieldKind::Number),
    ("divRep", FieldKind::Text),
    ("moc", FieldKind::Text),
];

/// Look up the kind of an editable field, or None for unknown keys.
pub fn field_kind(key: &str) -> Option<FieldKind> {
    FIELDS.iter().find(|(k, _)| *k == key).map(|(_, kind)| *kind)
}

/// The JSON object stored in a project's backing file.
///
/// Keys keep their file order; unknown keys and the opaque `notesDoc`
/// document round-trip verbatim. This engine never interprets `notesDoc`
/// beyond an existence check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(pub IndexMap<String, Value>);

impl Payload {
    /// Parse backing-file text. Malformed JSON, or JSON that is not an
    /// object, yields an empty payload instead of an error.
    pub fn from_json(text: &str) -> Payload {
        serde_json::from_str(text).unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field's string value, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// Set a field, preserving the position of an existing key.
    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    pub fn has_notes_doc(&self) -> bool {
        self.0.contains_key(NOTES_DOC_KEY)
    }

    /// Serialize with tab indentation and a trailing newline, matching the
    /// format of backing files written by earlier tooling.
    pub fn to_tab_json(&self) -> String {
        let mut buf = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
        if Serialize::serialize(self, &mut ser).is_err() {
            return "{}\n".to_string();
        }
        buf.push(b'\n');
        String::from_utf8(buf).unwrap_or_else(|_| "{}\n".to_string())
    }
}
