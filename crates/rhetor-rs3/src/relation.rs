use serde::Serialize;

/// A relation declared in the document header (`<rel name=".." type=".."/>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub name: String,
    /// `rst` or `multinuc` in practice; descriptive only.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
