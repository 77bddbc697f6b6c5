use crate::args::WithdrawArgs;
use crate::commands::Out;
use crate::model::Withdrawal;
use crate::summary::part_balance;
use crate::{Config, Result};
use anyhow::bail;
use chrono::Utc;

/// Toggles a student's withdrawal of a part's material.
///
/// If the student has not withdrawn the part, a withdrawal is recorded, provided there is
/// stock on hand to hand out. If the student has already withdrawn the part, the withdrawal
/// is removed and the material goes back into the balance.
///
/// # Errors
/// - Returns an error if the student or part does not exist, or if a grant is attempted with
///   no stock on hand.
pub async fn withdraw(config: Config, args: WithdrawArgs) -> Result<Out<Withdrawal>> {
    let store = config.store().await?;
    let data = store.load_all().await?;

    let Some(student) = data.students.iter().find(|s| s.id == args.student_id()) else {
        bail!("No student with ID '{}' exists", args.student_id());
    };
    if !data.parts.iter().any(|p| p.id == args.part_id()) {
        bail!("No part with ID '{}' exists", args.part_id());
    }

    let mut withdrawals = data.withdrawals.clone();
    if let Some(pos) = withdrawals
        .iter()
        .position(|w| w.matches(args.student_id(), args.part_id()))
    {
        let removed = withdrawals.remove(pos);
        store.save_withdrawals(&withdrawals).await?;
        return Ok(Out::new(
            format!(
                "Returned '{}' material from {}",
                args.part_id(),
                student.name
            ),
            removed,
        ));
    }

    // part_balance is Some because the part was found above.
    let balance = part_balance(&data, args.part_id()).unwrap_or(0);
    if balance <= 0 {
        bail!(
            "Cannot hand out '{}': the balance is {balance}, record an entry first",
            args.part_id()
        );
    }

    let withdrawal = Withdrawal {
        student_id: args.student_id().to_string(),
        part_id: args.part_id().to_string(),
        date: Utc::now(),
    };
    withdrawals.push(withdrawal.clone());
    store.save_withdrawals(&withdrawals).await?;

    Ok(Out::new(
        format!("Handed out '{}' material to {}", args.part_id(), student.name),
        withdrawal,
    ))
}
