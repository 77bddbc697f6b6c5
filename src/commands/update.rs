use crate::args::{UpdatePartArgs, UpdateStudentArgs};
use crate::commands::Out;
use crate::model::{Part, Student};
use crate::{Config, Result};
use anyhow::bail;

/// Updates a part's code, name and/or target quantity. Fields left out are unchanged.
///
/// # Errors
/// - Returns an error if no part with the given ID exists or if the new target is negative.
pub async fn update_part(config: Config, args: UpdatePartArgs) -> Result<Out<Part>> {
    if matches!(args.target(), Some(t) if t < 0) {
        bail!("The target quantity cannot be negative");
    }

    let store = config.store().await?;
    let mut parts = store.get_parts().await?;
    let Some(part) = parts.iter_mut().find(|p| p.id == args.id()) else {
        bail!("No part with ID '{}' exists", args.id());
    };

    if let Some(code) = args.code() {
        part.code = code.to_string();
    }
    if let Some(name) = args.name() {
        part.name = name.to_string();
    }
    if let Some(target) = args.target() {
        part.target_quantity = target;
    }
    let updated = part.clone();
    store.save_parts(&parts).await?;

    Ok(Out::new(format!("Updated part '{}'", updated.id), updated))
}

/// Updates a student's name and/or class group. Fields left out are unchanged.
///
/// # Errors
/// - Returns an error if no student with the given ID exists or if the new class group is not
///   one of the configured groups.
pub async fn update_student(config: Config, args: UpdateStudentArgs) -> Result<Out<Student>> {
    if let Some(group) = args.class_group() {
        if !config.class_groups().iter().any(|g| g == group) {
            bail!(
                "Unknown class group '{}', expected one of: {}",
                group,
                config.class_groups().join(", ")
            );
        }
    }

    let store = config.store().await?;
    let mut students = store.get_students().await?;
    let Some(student) = students.iter_mut().find(|s| s.id == args.id()) else {
        bail!("No student with ID '{}' exists", args.id());
    };

    if let Some(name) = args.name() {
        student.name = name.to_string();
    }
    if let Some(group) = args.class_group() {
        student.class_group = group.to_string();
    }
    let updated = student.clone();
    store.save_students(&students).await?;

    Ok(Out::new(
        format!("Updated student '{}'", updated.name),
        updated,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_update_part_partial_fields() {
        let env = TestEnv::new().await;
        let args = UpdatePartArgs::new("T1", None, None, Some(99));

        let out = update_part(env.config().clone(), args).await.unwrap();

        let part = out.structure().unwrap();
        assert_eq!(part.target_quantity, 99);
        // Name and code are untouched.
        assert_eq!(part.name, "Tarefa 1");
        let stored = env.data().await;
        assert_eq!(
            stored.parts.iter().find(|p| p.id == "T1").unwrap().target_quantity,
            99
        );
    }

    #[tokio::test]
    async fn test_update_part_unknown_id() {
        let env = TestEnv::new().await;
        let args = UpdatePartArgs::new("T99", None, Some("x".to_string()), None);

        assert!(update_part(env.config().clone(), args).await.is_err());
    }

    #[tokio::test]
    async fn test_update_student_class_group_validated() {
        let env = TestEnv::new().await;
        let id = env.data().await.students[0].id.clone();

        let bad = UpdateStudentArgs::new(&id, None, Some("Turma Z".to_string()));
        assert!(update_student(env.config().clone(), bad).await.is_err());

        let ok = UpdateStudentArgs::new(&id, None, Some("Turma A - Manhã".to_string()));
        let out = update_student(env.config().clone(), ok).await.unwrap();
        assert_eq!(out.structure().unwrap().class_group, "Turma A - Manhã");
    }
}
