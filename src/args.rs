//! These structs provide the CLI interface for the stockroom CLI.

use crate::config::Backend;
use crate::model::TransactionKind;
use crate::summary::PurchasePolicy;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// stockroom: A command-line tool for tracking course material inventory.
///
/// The purpose of this program is to record part stock movements (entries and exits), track
/// which students have withdrawn their material, and tell you what needs to be purchased so
/// every student can complete every task. Data lives in a local datastore under the stockroom
/// home directory.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration and datastore.
    ///
    /// This is the first command you should run. Decide what directory you want to store data
    /// in and pass it as --home (or set STOCKROOM_HOME). By default it will be $HOME/stockroom.
    ///
    /// Unless --empty is given, the datastore starts out populated with the standard course
    /// task list and roster so you can begin recording movements immediately.
    Init(InitArgs),
    /// Insert a part, student or stock transaction.
    Insert(InsertArgs),
    /// Update a part or student.
    Update(UpdateArgs),
    /// Delete a part, student or stock transaction.
    ///
    /// Deleting a part also removes every withdrawal that points at it. A snapshot of the
    /// datastore is written to .backups/ before anything is removed.
    Delete(DeleteArgs),
    /// List parts, students, transactions or withdrawals.
    List(ListArgs),
    /// Toggle a student's withdrawal of a part's material.
    ///
    /// Running the command a second time with the same student and part returns the material.
    Withdraw(WithdrawArgs),
    /// Show the stock summary: entries, exits, balance and purchasing needs per part.
    Summary(SummaryArgs),
    /// Show only the parts that need to be purchased, with quantities.
    Plan(PlanArgs),
    /// Export the stock summary as CSV.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where stockroom data and configuration is held. Defaults to ~/stockroom
    #[arg(long, env = "STOCKROOM_HOME", default_value_t = default_stockroom_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `stockroom init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The storage backend to use: "json" or "sqlite".
    #[arg(long, value_enum, default_value_t = Backend::Json)]
    backend: Backend,

    /// Which target the purchase recommendation is measured against.
    #[arg(long, value_enum, default_value_t = PurchasePolicy::FixedTarget)]
    policy: PurchasePolicy,

    /// Start with empty collections instead of the standard task list and roster.
    #[arg(long)]
    empty: bool,
}

impl InitArgs {
    pub fn new(backend: Backend, policy: PurchasePolicy, empty: bool) -> Self {
        Self {
            backend,
            policy,
            empty,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn policy(&self) -> PurchasePolicy {
        self.policy
    }

    pub fn empty(&self) -> bool {
        self.empty
    }
}

/// Args for the `stockroom insert` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertArgs {
    #[command(subcommand)]
    entity: InsertSubcommand,
}

impl InsertArgs {
    pub fn entity(&self) -> &InsertSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum InsertSubcommand {
    /// Insert a part (a course task with a target quantity).
    Part(InsertPartArgs),
    /// Insert a student.
    Student(InsertStudentArgs),
    /// Insert a stock transaction (an entry or an exit).
    Transaction(InsertTransactionArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct InsertPartArgs {
    /// The part's task identifier, e.g. "T26".
    #[arg(long)]
    id: String,

    /// The part's drawing or catalog code.
    #[arg(long)]
    code: String,

    /// The part's display name.
    #[arg(long)]
    name: String,

    /// How many units should be on hand.
    #[arg(long)]
    target: i64,
}

impl InsertPartArgs {
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        target: i64,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            target,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> i64 {
        self.target
    }
}

#[derive(Debug, Parser, Clone)]
pub struct InsertStudentArgs {
    /// The student's full name.
    #[arg(long)]
    name: String,

    /// The class group the student belongs to, e.g. "Turma B - Tarde".
    #[arg(long)]
    class_group: String,
}

impl InsertStudentArgs {
    pub fn new(name: impl Into<String>, class_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_group: class_group.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_group(&self) -> &str {
        &self.class_group
    }
}

#[derive(Debug, Parser, Clone)]
pub struct InsertTransactionArgs {
    /// The movement date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// The kind of movement: "entry" or "exit".
    #[arg(long, value_enum)]
    kind: TransactionKind,

    /// A free-form description, e.g. an invoice number.
    #[arg(long, default_value = "")]
    description: String,

    /// The part this movement applies to.
    #[arg(long)]
    part_id: String,

    /// How many units moved. Must be positive.
    #[arg(long)]
    quantity: i64,
}

impl InsertTransactionArgs {
    pub fn new(
        date: Option<NaiveDate>,
        kind: TransactionKind,
        description: impl Into<String>,
        part_id: impl Into<String>,
        quantity: i64,
    ) -> Self {
        Self {
            date,
            kind,
            description: description.into(),
            part_id: part_id.into(),
            quantity,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn part_id(&self) -> &str {
        &self.part_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// Args for the `stockroom update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    #[command(subcommand)]
    entity: UpdateSubcommand,
}

impl UpdateArgs {
    pub fn entity(&self) -> &UpdateSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum UpdateSubcommand {
    /// Update a part's code, name or target quantity.
    Part(UpdatePartArgs),
    /// Update a student's name or class group.
    Student(UpdateStudentArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct UpdatePartArgs {
    /// The part to update.
    #[arg(long)]
    id: String,

    /// A new drawing or catalog code.
    #[arg(long)]
    code: Option<String>,

    /// A new display name.
    #[arg(long)]
    name: Option<String>,

    /// A new target quantity.
    #[arg(long)]
    target: Option<i64>,
}

impl UpdatePartArgs {
    pub fn new(
        id: impl Into<String>,
        code: Option<String>,
        name: Option<String>,
        target: Option<i64>,
    ) -> Self {
        Self {
            id: id.into(),
            code,
            name,
            target,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn target(&self) -> Option<i64> {
        self.target
    }
}

#[derive(Debug, Parser, Clone)]
pub struct UpdateStudentArgs {
    /// The student to update.
    #[arg(long)]
    id: String,

    /// A new name.
    #[arg(long)]
    name: Option<String>,

    /// A new class group.
    #[arg(long)]
    class_group: Option<String>,
}

impl UpdateStudentArgs {
    pub fn new(
        id: impl Into<String>,
        name: Option<String>,
        class_group: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name,
            class_group,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn class_group(&self) -> Option<&str> {
        self.class_group.as_deref()
    }
}

/// Args for the `stockroom delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    #[command(subcommand)]
    entity: DeleteSubcommand,
}

impl DeleteArgs {
    pub fn entity(&self) -> &DeleteSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum DeleteSubcommand {
    /// Delete a part and all withdrawals that point at it.
    Part(DeleteByIdArgs),
    /// Delete a student.
    Student(DeleteByIdArgs),
    /// Delete a stock transaction.
    Transaction(DeleteByIdArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct DeleteByIdArgs {
    /// The identifier of the record to delete.
    id: String,
}

impl DeleteByIdArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `stockroom list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    #[command(subcommand)]
    entity: ListSubcommand,
}

impl ListArgs {
    pub fn entity(&self) -> &ListSubcommand {
        &self.entity
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ListSubcommand {
    /// List parts in task order.
    Parts,
    /// List students.
    Students(ListStudentsArgs),
    /// List stock transactions.
    Transactions(ListTransactionsArgs),
    /// List withdrawals.
    Withdrawals(ListWithdrawalsArgs),
}

#[derive(Debug, Parser, Clone, Default)]
pub struct ListStudentsArgs {
    /// Only show students in this class group.
    #[arg(long)]
    class_group: Option<String>,
}

impl ListStudentsArgs {
    pub fn new(class_group: Option<String>) -> Self {
        Self { class_group }
    }

    pub fn class_group(&self) -> Option<&str> {
        self.class_group.as_deref()
    }
}

#[derive(Debug, Parser, Clone, Default)]
pub struct ListTransactionsArgs {
    /// Only show transactions for this part.
    #[arg(long)]
    part_id: Option<String>,

    /// Only show transactions of this kind.
    #[arg(long, value_enum)]
    kind: Option<TransactionKind>,
}

impl ListTransactionsArgs {
    pub fn new(part_id: Option<String>, kind: Option<TransactionKind>) -> Self {
        Self { part_id, kind }
    }

    pub fn part_id(&self) -> Option<&str> {
        self.part_id.as_deref()
    }

    pub fn kind(&self) -> Option<TransactionKind> {
        self.kind
    }
}

#[derive(Debug, Parser, Clone, Default)]
pub struct ListWithdrawalsArgs {
    /// Only show withdrawals by this student.
    #[arg(long)]
    student_id: Option<String>,

    /// Only show withdrawals of this part.
    #[arg(long)]
    part_id: Option<String>,
}

impl ListWithdrawalsArgs {
    pub fn new(student_id: Option<String>, part_id: Option<String>) -> Self {
        Self {
            student_id,
            part_id,
        }
    }

    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    pub fn part_id(&self) -> Option<&str> {
        self.part_id.as_deref()
    }
}

/// Args for the `stockroom withdraw` command.
#[derive(Debug, Parser, Clone)]
pub struct WithdrawArgs {
    /// The student withdrawing or returning material.
    student_id: String,

    /// The part whose material is being withdrawn or returned.
    part_id: String,
}

impl WithdrawArgs {
    pub fn new(student_id: impl Into<String>, part_id: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            part_id: part_id.into(),
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn part_id(&self) -> &str {
        &self.part_id
    }
}

/// Args for the `stockroom summary` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SummaryArgs {
    /// Override the configured purchase policy for this invocation.
    #[arg(long, value_enum)]
    policy: Option<PurchasePolicy>,
}

impl SummaryArgs {
    pub fn new(policy: Option<PurchasePolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> Option<PurchasePolicy> {
        self.policy
    }
}

/// Args for the `stockroom plan` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct PlanArgs {
    /// Override the configured purchase policy for this invocation.
    #[arg(long, value_enum)]
    policy: Option<PurchasePolicy>,
}

impl PlanArgs {
    pub fn new(policy: Option<PurchasePolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> Option<PurchasePolicy> {
        self.policy
    }
}

/// Args for the `stockroom export` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportArgs {
    /// Where to write the CSV file. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the configured purchase policy for this invocation.
    #[arg(long, value_enum)]
    policy: Option<PurchasePolicy>,
}

impl ExportArgs {
    pub fn new(output: Option<PathBuf>, policy: Option<PurchasePolicy>) -> Self {
        Self { output, policy }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn policy(&self) -> Option<PurchasePolicy> {
        self.policy
    }
}

fn default_stockroom_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("stockroom"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or STOCKROOM_HOME instead of relying on the default \
                stockroom home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("stockroom")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_insert_transaction() {
        let args = Args::parse_from([
            "stockroom",
            "--home",
            "/tmp/stockroom",
            "insert",
            "transaction",
            "--kind",
            "entry",
            "--part-id",
            "T1",
            "--quantity",
            "12",
            "--description",
            "NF 123",
        ]);
        match args.command() {
            Command::Insert(insert) => match insert.entity() {
                InsertSubcommand::Transaction(t) => {
                    assert_eq!(t.kind(), TransactionKind::Entry);
                    assert_eq!(t.part_id(), "T1");
                    assert_eq!(t.quantity(), 12);
                    assert_eq!(t.description(), "NF 123");
                    assert!(t.date().is_none());
                }
                other => panic!("unexpected entity {other:?}"),
            },
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_with_backend() {
        let args = Args::parse_from(["stockroom", "init", "--backend", "sqlite", "--empty"]);
        match args.command() {
            Command::Init(init) => {
                assert_eq!(init.backend(), Backend::Sqlite);
                assert!(init.empty());
                assert_eq!(init.policy(), PurchasePolicy::FixedTarget);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_withdraw() {
        let args = Args::parse_from(["stockroom", "withdraw", "3", "T10"]);
        match args.command() {
            Command::Withdraw(w) => {
                assert_eq!(w.student_id(), "3");
                assert_eq!(w.part_id(), "T10");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
