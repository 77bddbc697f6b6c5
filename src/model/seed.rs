//! Default data for a freshly-created store: the course's task list and the currently enrolled
//! class. These match the deployment this tool was built for; `init --empty` skips them.

use crate::model::{Part, Student};

pub fn seed_parts() -> Vec<Part> {
    [
        ("T1", "1003198", "Tarefa 1", 70),
        ("T2", "1003197", "Tarefa 2", 70),
        ("T5A", "1001583", "Tarefa 5A", 170),
        ("T5B", "1014521", "Tarefa 5B", 70),
        ("T6/9", "1001584", "Tarefa 6/9", 140),
        ("T7", "1020433", "Tarefa 7", 110),
        ("T10", "1020430", "Tarefa 10", 70),
        ("T11", "1012117", "Tarefa 11", 70),
        ("T13", "1001614", "Tarefa 13", 190),
        ("T14", "1020421", "Tarefa 14", 40),
        ("T15", "1014525", "Tarefa 15", 65),
        ("T19", "1014526", "Tarefa 19", 75),
        ("T21", "1014527", "Tarefa 21", 80),
        ("T22", "1014528", "Tarefa 22", 90),
        ("T23", "1014529", "Tarefa 23", 20),
        ("T25", "1014530", "Tarefa 25", 30),
    ]
    .into_iter()
    .map(|(id, code, name, target_quantity)| Part {
        id: id.to_string(),
        code: code.to_string(),
        name: name.to_string(),
        target_quantity,
    })
    .collect()
}

pub fn seed_students() -> Vec<Student> {
    [
        ("1", "Guilherme André Costa"),
        ("2", "João Gabriel Pontes"),
        ("3", "Leonardo C. Silva"),
        ("4", "Mateus Fernando Queiroz"),
        ("5", "Nicolas Ianili"),
        ("6", "Renan Oliverio Domingos"),
        ("7", "Rivair Sales Neto"),
        ("8", "Sara Machado dos Santos"),
        ("9", "Guilherme Almeida de Lima"),
        ("10", "Júlio Cesar Volpe"),
        ("11", "Kael Henrique da Silva"),
        ("12", "Nicollas D. G. de Oliveira"),
    ]
    .into_iter()
    .map(|(id, name)| Student {
        id: id.to_string(),
        name: name.to_string(),
        class_group: "Turma B - Tarde".to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let parts = seed_parts();
        let ids: HashSet<_> = parts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), parts.len());

        let students = seed_students();
        let ids: HashSet<_> = students.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), students.len());
    }
}
