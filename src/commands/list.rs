use crate::args::{ListStudentsArgs, ListTransactionsArgs, ListWithdrawalsArgs};
use crate::commands::Out;
use crate::model::{cmp_task_ids, Part, Student, Transaction, Withdrawal};
use crate::{Config, Result};
use std::fmt::Write;

/// Lists all parts in task order.
pub async fn list_parts(config: Config) -> Result<Out<Vec<Part>>> {
    let store = config.store().await?;
    let mut parts = store.get_parts().await?;
    parts.sort_by(|a, b| cmp_task_ids(&a.id, &b.id));

    let mut message = format!("{} part(s)", parts.len());
    for p in &parts {
        write!(
            message,
            "\n  {:<6} {:<10} {:<20} target {}",
            p.id, p.code, p.name, p.target_quantity
        )?;
    }
    Ok(Out::new(message, parts))
}

/// Lists students, optionally filtered by class group.
pub async fn list_students(config: Config, args: ListStudentsArgs) -> Result<Out<Vec<Student>>> {
    let store = config.store().await?;
    let mut students = store.get_students().await?;
    if let Some(group) = args.class_group() {
        students.retain(|s| s.class_group == group);
    }

    let mut message = format!("{} student(s)", students.len());
    for s in &students {
        write!(message, "\n  {:<10} {:<30} {}", s.id, s.name, s.class_group)?;
    }
    Ok(Out::new(message, students))
}

/// Lists stock transactions, optionally filtered by part and/or kind.
pub async fn list_transactions(
    config: Config,
    args: ListTransactionsArgs,
) -> Result<Out<Vec<Transaction>>> {
    let store = config.store().await?;
    let mut transactions = store.get_transactions().await?;
    if let Some(part_id) = args.part_id() {
        transactions.retain(|t| t.part_id == part_id);
    }
    if let Some(kind) = args.kind() {
        transactions.retain(|t| t.kind == kind);
    }
    transactions.sort_by(|a, b| a.date.cmp(&b.date));

    let mut message = format!("{} transaction(s)", transactions.len());
    for t in &transactions {
        write!(
            message,
            "\n  {} {:<5} {:<6} {:>5}  {}",
            t.date, t.kind, t.part_id, t.quantity, t.description
        )?;
    }
    Ok(Out::new(message, transactions))
}

/// Lists withdrawals, optionally filtered by student and/or part.
pub async fn list_withdrawals(
    config: Config,
    args: ListWithdrawalsArgs,
) -> Result<Out<Vec<Withdrawal>>> {
    let store = config.store().await?;
    let mut withdrawals = store.get_withdrawals().await?;
    if let Some(student_id) = args.student_id() {
        withdrawals.retain(|w| w.student_id == student_id);
    }
    if let Some(part_id) = args.part_id() {
        withdrawals.retain(|w| w.part_id == part_id);
    }
    withdrawals.sort_by(|a, b| a.date.cmp(&b.date));

    let mut message = format!("{} withdrawal(s)", withdrawals.len());
    for w in &withdrawals {
        write!(
            message,
            "\n  {}  student {:<10} part {}",
            w.date.format("%Y-%m-%d %H:%M"),
            w.student_id,
            w.part_id
        )?;
    }
    Ok(Out::new(message, withdrawals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TransactionKind, Withdrawal};
    use crate::test::TestEnv;
    use chrono::{NaiveDate, Utc};

    #[tokio::test]
    async fn test_list_parts_in_task_order() {
        let env = TestEnv::new().await;

        let out = list_parts(env.config().clone()).await.unwrap();

        let parts = out.structure().unwrap();
        assert_eq!(parts.first().unwrap().id, "T1");
        // T10 sorts after T7, not after T1.
        let pos_t7 = parts.iter().position(|p| p.id == "T7").unwrap();
        let pos_t10 = parts.iter().position(|p| p.id == "T10").unwrap();
        assert!(pos_t7 < pos_t10);
    }

    #[tokio::test]
    async fn test_list_students_filter_by_class_group() {
        let env = TestEnv::new().await;

        let all = list_students(env.config().clone(), ListStudentsArgs::default())
            .await
            .unwrap();
        assert_eq!(all.structure().unwrap().len(), 12);

        let args = ListStudentsArgs::new(Some("Turma A - Manhã".to_string()));
        let none = list_students(env.config().clone(), args).await.unwrap();
        assert!(none.structure().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_transactions_filters() {
        let env = TestEnv::new().await;
        let store = env.config().store().await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        store
            .save_transactions(&[
                crate::model::Transaction {
                    id: "a".to_string(),
                    date,
                    kind: TransactionKind::Entry,
                    description: String::new(),
                    part_id: "T1".to_string(),
                    quantity: 10,
                },
                crate::model::Transaction {
                    id: "b".to_string(),
                    date,
                    kind: TransactionKind::Exit,
                    description: String::new(),
                    part_id: "T2".to_string(),
                    quantity: 3,
                },
            ])
            .await
            .unwrap();

        let args = ListTransactionsArgs::new(None, Some(TransactionKind::Exit));
        let out = list_transactions(env.config().clone(), args).await.unwrap();

        let txns = out.structure().unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].part_id, "T2");
    }

    #[tokio::test]
    async fn test_list_withdrawals_filter_by_student() {
        let env = TestEnv::new().await;
        let store = env.config().store().await.unwrap();
        store
            .save_withdrawals(&[
                Withdrawal {
                    student_id: "1".to_string(),
                    part_id: "T1".to_string(),
                    date: Utc::now(),
                },
                Withdrawal {
                    student_id: "2".to_string(),
                    part_id: "T1".to_string(),
                    date: Utc::now(),
                },
            ])
            .await
            .unwrap();

        let args = ListWithdrawalsArgs::new(Some("2".to_string()), None);
        let out = list_withdrawals(env.config().clone(), args).await.unwrap();

        let withdrawals = out.structure().unwrap();
        assert_eq!(withdrawals.len(), 1);
        assert_eq!(withdrawals[0].student_id, "2");
    }
}
