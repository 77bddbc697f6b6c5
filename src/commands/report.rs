use crate::args::{ExportArgs, PlanArgs, SummaryArgs};
use crate::commands::Out;
use crate::summary::{summarize, StockSummary};
use crate::{utils, Config, Result};
use anyhow::Context;
use std::fmt::Write;

/// Shows the full stock summary: entries, exits, balance and purchasing needs per part, in
/// task order.
pub async fn summary(config: Config, args: SummaryArgs) -> Result<Out<Vec<StockSummary>>> {
    let policy = args.policy().unwrap_or_else(|| config.purchase_policy());
    let store = config.store().await?;
    let data = store.load_all().await?;
    let rows = summarize(&data, policy);

    let message = render_table(&rows)?;
    Ok(Out::new(message, rows))
}

/// Shows only the parts that need to be purchased, with the quantity to buy.
pub async fn plan(config: Config, args: PlanArgs) -> Result<Out<Vec<StockSummary>>> {
    let policy = args.policy().unwrap_or_else(|| config.purchase_policy());
    let store = config.store().await?;
    let data = store.load_all().await?;
    let rows: Vec<StockSummary> = summarize(&data, policy)
        .into_iter()
        .filter(|s| s.to_buy > 0)
        .collect();

    if rows.is_empty() {
        return Ok(Out::new("Nothing needs to be purchased".to_string(), rows));
    }
    let mut message = format!("{} part(s) need to be purchased", rows.len());
    for row in &rows {
        write!(
            message,
            "\n  {:<6} {:<10} {:<20} buy {}",
            row.part_id, row.code, row.name, row.to_buy
        )?;
    }
    Ok(Out::new(message, rows))
}

/// Exports the stock summary as CSV, either to a file or to stdout.
pub async fn export(config: Config, args: ExportArgs) -> Result<Out<Vec<StockSummary>>> {
    let policy = args.policy().unwrap_or_else(|| config.purchase_policy());
    let store = config.store().await?;
    let data = store.load_all().await?;
    let rows = summarize(&data, policy);

    let csv = to_csv(&rows)?;
    let message = match args.output() {
        Some(path) => {
            utils::write(path, &csv).await?;
            format!("Exported {} row(s) to '{}'", rows.len(), path.display())
        }
        None => {
            // The CSV goes to stdout so it can be piped; logging goes to stderr.
            print!("{csv}");
            format!("Exported {} row(s)", rows.len())
        }
    };
    Ok(Out::new(message, rows))
}

fn to_csv(rows: &[StockSummary]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .context("Unable to serialize a summary row to CSV")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Unable to flush the CSV writer")?;
    String::from_utf8(bytes).context("The CSV output was not valid UTF-8")
}

fn render_table(rows: &[StockSummary]) -> Result<String> {
    let mut message = format!(
        "{:<6} {:<10} {:<20} {:>7} {:>6} {:>9} {:>7} {:>7}  {}",
        "part", "code", "name", "entries", "exits", "withdrawn", "balance", "to buy", "situation"
    );
    for row in rows {
        write!(
            message,
            "\n{:<6} {:<10} {:<20} {:>7} {:>6} {:>9} {:>7} {:>7}  {}",
            row.part_id,
            row.code,
            row.name,
            row.entries,
            row.exits,
            row.student_exits,
            row.balance,
            row.to_buy,
            row.situation
        )?;
    }
    Ok(message)
}
