use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub mal_id: i32,
    pub name: String,
}

impl Genre {
    pub fn new(mal_id: i32, name: impl Into<String>) -> Self {
        Self {
            mal_id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
