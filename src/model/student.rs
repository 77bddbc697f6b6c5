use serde::{Deserialize, Serialize};

/// An enrolled student. Students belong to exactly one class group; the set of valid groups is
/// configured in `config.json`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// One of the configured class groups, e.g. "Turma A - Manhã".
    pub class_group: String,
}
