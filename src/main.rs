use clap::Parser;
use std::process::ExitCode;
use stockroom::args::{
    Args, Command, DeleteSubcommand, InsertSubcommand, ListSubcommand, UpdateSubcommand,
};
use stockroom::{commands, Config, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Insert(insert_args) => {
            let config = Config::load(home).await?;
            match insert_args.entity() {
                InsertSubcommand::Part(args) => {
                    commands::insert_part(config, args.clone()).await?.print()
                }
                InsertSubcommand::Student(args) => {
                    commands::insert_student(config, args.clone()).await?.print()
                }
                InsertSubcommand::Transaction(args) => {
                    commands::insert_transaction(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Update(update_args) => {
            let config = Config::load(home).await?;
            match update_args.entity() {
                UpdateSubcommand::Part(args) => {
                    commands::update_part(config, args.clone()).await?.print()
                }
                UpdateSubcommand::Student(args) => {
                    commands::update_student(config, args.clone()).await?.print()
                }
            }
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            match delete_args.entity() {
                DeleteSubcommand::Part(args) => {
                    commands::delete_part(config, args.id()).await?.print()
                }
                DeleteSubcommand::Student(args) => {
                    commands::delete_student(config, args.id()).await?.print()
                }
                DeleteSubcommand::Transaction(args) => {
                    commands::delete_transaction(config, args.id()).await?.print()
                }
            }
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            match list_args.entity() {
                ListSubcommand::Parts => commands::list_parts(config).await?.print(),
                ListSubcommand::Students(args) => {
                    commands::list_students(config, args.clone()).await?.print()
                }
                ListSubcommand::Transactions(args) => {
                    commands::list_transactions(config, args.clone())
                        .await?
                        .print()
                }
                ListSubcommand::Withdrawals(args) => {
                    commands::list_withdrawals(config, args.clone())
                        .await?
                        .print()
                }
            }
        }

        Command::Withdraw(withdraw_args) => {
            let config = Config::load(home).await?;
            commands::withdraw(config, withdraw_args.clone())
                .await?
                .print()
        }

        Command::Summary(summary_args) => {
            let config = Config::load(home).await?;
            commands::summary(config, summary_args.clone()).await?.print()
        }

        Command::Plan(plan_args) => {
            let config = Config::load(home).await?;
            commands::plan(config, plan_args.clone()).await?.print()
        }

        Command::Export(export_args) => {
            let config = Config::load(home).await?;
            commands::export(config, export_args.clone()).await?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
