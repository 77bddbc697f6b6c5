use crate::backup::PRE_DELETE;
use crate::commands::Out;
use crate::store::ChangeSet;
use crate::{Config, Result};
use anyhow::bail;
use tracing::info;

/// Deletes a part along with every withdrawal that points at it. The part and its withdrawals
/// are removed in a single atomic unit so the datastore never holds a withdrawal of a part
/// that no longer exists. Stock transactions referencing the part are kept as history.
///
/// A snapshot of the datastore is written to `.backups/` before anything is removed.
///
/// # Errors
/// - Returns an error if no part with the given ID exists.
pub async fn delete_part(config: Config, id: &str) -> Result<Out<()>> {
    let store = config.store().await?;
    let data = store.load_all().await?;
    if !data.parts.iter().any(|p| p.id == id) {
        bail!("No part with ID '{id}' exists");
    }

    let backup_path = config.backup().save_json(PRE_DELETE, &data).await?;
    info!("Saved a snapshot to '{}'", backup_path.display());

    let withdrawals_before = data.withdrawals.len();
    let parts = data.parts.into_iter().filter(|p| p.id != id).collect();
    let withdrawals: Vec<_> = data
        .withdrawals
        .into_iter()
        .filter(|w| w.part_id != id)
        .collect();
    let cascaded = withdrawals_before - withdrawals.len();

    store
        .transact(ChangeSet::new().parts(parts).withdrawals(withdrawals))
        .await?;

    Ok(format!("Deleted part '{id}' and {cascaded} withdrawal(s) of it").into())
}

/// Deletes a student. Their withdrawals are kept: the material left the stockroom while they
/// were enrolled and the balance must continue to reflect that.
///
/// A snapshot of the datastore is written to `.backups/` before anything is removed.
///
/// # Errors
/// - Returns an error if no student with the given ID exists.
pub async fn delete_student(config: Config, id: &str) -> Result<Out<()>> {
    let store = config.store().await?;
    let data = store.load_all().await?;
    if !data.students.iter().any(|s| s.id == id) {
        bail!("No student with ID '{id}' exists");
    }

    let backup_path = config.backup().save_json(PRE_DELETE, &data).await?;
    info!("Saved a snapshot to '{}'", backup_path.display());

    let students: Vec<_> = data.students.into_iter().filter(|s| s.id != id).collect();
    store.save_students(&students).await?;

    Ok(format!("Deleted student '{id}'").into())
}

/// Deletes a stock transaction.
///
/// A snapshot of the datastore is written to `.backups/` before anything is removed.
///
/// # Errors
/// - Returns an error if no transaction with the given ID exists.
pub async fn delete_transaction(config: Config, id: &str) -> Result<Out<()>> {
    let store = config.store().await?;
    let data = store.load_all().await?;
    if !data.transactions.iter().any(|t| t.id == id) {
        bail!("No transaction with ID '{id}' exists");
    }

    let backup_path = config.backup().save_json(PRE_DELETE, &data).await?;
    info!("Saved a snapshot to '{}'", backup_path.display());

    let transactions: Vec<_> = data
        .transactions
        .into_iter()
        .filter(|t| t.id != id)
        .collect();
    store.save_transactions(&transactions).await?;

    Ok(format!("Deleted transaction '{id}'").into())
}
