//! Cashbox command handler.

use tabled::Tabled;

use kontur_ofd_api::{Cashbox, OfdClient};

use crate::cli::{CashboxesArgs, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CashboxRow {
    #[tabled(rename = "Reg. number")]
    reg_number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Serial")]
    serial_number: String,
    #[tabled(rename = "Fiscal drive")]
    fiscal_drive: String,
    #[tabled(rename = "Sales point")]
    sales_point: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Cashbox> for CashboxRow {
    fn from(c: &Cashbox) -> Self {
        Self {
            reg_number: c.reg_number.clone(),
            name: c.name.clone(),
            serial_number: c.serial_number.clone(),
            fiscal_drive: c.fiscal_drive.fiscal_driver_number.clone(),
            sales_point: c.sales_point_name.clone(),
            address: c.address.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &OfdClient,
    settings: &Settings,
    args: CashboxesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = client.authenticate(&settings.credentials).await?;
    let cashboxes = client.list_cashboxes(&session, &args.org).await?;

    let out = output::render_list(
        global.output,
        &cashboxes,
        |c| CashboxRow::from(c),
        |c| c.reg_number.clone(),
    );
    output::print_output(&out, global.quiet)?;
    Ok(())
}
