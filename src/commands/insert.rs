use crate::args::{InsertPartArgs, InsertStudentArgs, InsertTransactionArgs};
use crate::commands::Out;
use crate::model::{Part, Student, Transaction};
use crate::{utils, Config, Result};
use anyhow::bail;
use chrono::Local;
use tracing::warn;

/// Inserts a new part.
///
/// # Errors
/// - Returns an error if a part with the same ID already exists or if the target is negative.
pub async fn insert_part(config: Config, args: InsertPartArgs) -> Result<Out<Part>> {
    if args.target() < 0 {
        bail!("The target quantity cannot be negative: {}", args.target());
    }
    let store = config.store().await?;
    let mut parts = store.get_parts().await?;
    if parts.iter().any(|p| p.id == args.id()) {
        bail!("A part with ID '{}' already exists", args.id());
    }

    let part = Part {
        id: args.id().to_string(),
        code: args.code().to_string(),
        name: args.name().to_string(),
        target_quantity: args.target(),
    };
    parts.push(part.clone());
    store.save_parts(&parts).await?;

    Ok(Out::new(format!("Inserted part '{}'", part.id), part))
}

/// Inserts a new student with a generated ID.
///
/// # Errors
/// - Returns an error if the class group is not one of the configured groups.
pub async fn insert_student(config: Config, args: InsertStudentArgs) -> Result<Out<Student>> {
    if !config
        .class_groups()
        .iter()
        .any(|g| g == args.class_group())
    {
        bail!(
            "Unknown class group '{}', expected one of: {}",
            args.class_group(),
            config.class_groups().join(", ")
        );
    }

    let store = config.store().await?;
    let mut students = store.get_students().await?;
    let student = Student {
        id: utils::generate_id(),
        name: args.name().to_string(),
        class_group: args.class_group().to_string(),
    };
    students.push(student.clone());
    store.save_students(&students).await?;

    Ok(Out::new(
        format!("Inserted student '{}' with ID {}", student.name, student.id),
        student,
    ))
}

/// Inserts a new stock transaction with a generated ID. The date defaults to today.
///
/// A transaction whose part ID does not match any part is accepted with a warning. Parts are
/// sometimes registered after their material arrives, and the summary simply ignores movements
/// of unknown parts until the part exists.
///
/// # Errors
/// - Returns an error if the quantity is not positive.
pub async fn insert_transaction(
    config: Config,
    args: InsertTransactionArgs,
) -> Result<Out<Transaction>> {
    if args.quantity() <= 0 {
        bail!("The quantity must be positive: {}", args.quantity());
    }

    let store = config.store().await?;
    let data = store.load_all().await?;
    if !data.parts.iter().any(|p| p.id == args.part_id()) {
        warn!(
            "No part with ID '{}' exists, the movement will not appear in the summary until \
            the part is registered",
            args.part_id()
        );
    }

    let transaction = Transaction {
        id: utils::generate_id(),
        date: args.date().unwrap_or_else(|| Local::now().date_naive()),
        kind: args.kind(),
        description: args.description().to_string(),
        part_id: args.part_id().to_string(),
        quantity: args.quantity(),
    };
    let mut transactions = data.transactions;
    transactions.push(transaction.clone());
    store.save_transactions(&transactions).await?;

    Ok(Out::new(
        format!(
            "Recorded {} of {} unit(s) of '{}'",
            transaction.kind, transaction.quantity, transaction.part_id
        ),
        transaction,
    ))
}
