use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn new(name: impl Into<String>) -> Self {
        NewTag { name: name.into() }
    }
}

/// Tag names as the edit form shows them: `"dog,labrador"`.
pub fn join_tag_names(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Splits the comma separated `tags` field of the upload form.
///
/// Blank entries are dropped and a name is kept only the first time it appears,
/// so the result preserves the order the user typed.
pub fn parse_tag_names(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }

    names
}
