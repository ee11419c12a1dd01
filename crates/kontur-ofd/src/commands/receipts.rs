//! Receipt command handler.

use tabled::Tabled;

use kontur_ofd_api::{OfdClient, Receipt};

use crate::cli::{GlobalOpts, ReceiptsArgs};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReceiptRow {
    #[tabled(rename = "FD #")]
    document: i64,
    #[tabled(rename = "Time")]
    date_time: String,
    #[tabled(rename = "Cashbox")]
    cashbox: String,
    #[tabled(rename = "Shift")]
    shift: i64,
    #[tabled(rename = "Op")]
    operation: i64,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Cash")]
    cash: String,
    #[tabled(rename = "Card")]
    ecash: String,
}

impl From<&Receipt> for ReceiptRow {
    fn from(r: &Receipt) -> Self {
        Self {
            document: r.fiscal_document_number,
            date_time: r.date_time.clone(),
            cashbox: r.kkt_reg_id.clone(),
            shift: r.shift_number,
            operation: r.operation_type,
            items: r.items.len(),
            total: output::rubles(r.total_sum),
            cash: output::rubles(r.cash_total_sum),
            ecash: output::rubles(r.ecash_total_sum),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &OfdClient,
    settings: &Settings,
    args: ReceiptsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let receipts = client
        .get_receipts(&settings.credentials, &args.date)
        .await?;

    let out = output::render_list(
        global.output,
        &receipts,
        |r| ReceiptRow::from(r),
        |r| format!("{}\t{}", r.kkt_reg_id, r.fiscal_document_number),
    );
    output::print_output(&out, global.quiet)?;
    Ok(())
}
