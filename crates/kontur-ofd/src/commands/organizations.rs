//! Organization command handler.

use tabled::Tabled;

use kontur_ofd_api::{OfdClient, Organization};

use crate::cli::GlobalOpts;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrganizationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "INN")]
    inn: String,
    #[tabled(rename = "KPP")]
    kpp: String,
    #[tabled(rename = "OGRN")]
    ogrn: String,
}

impl From<&Organization> for OrganizationRow {
    fn from(o: &Organization) -> Self {
        Self {
            id: o.id.clone(),
            name: o.short_name.clone(),
            inn: o.inn.clone(),
            kpp: o.kpp.clone(),
            ogrn: o.ogrn.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &OfdClient,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let session = client.authenticate(&settings.credentials).await?;
    let organizations = client.list_organizations(&session).await?;

    let out = output::render_list(
        global.output,
        &organizations,
        |o| OrganizationRow::from(o),
        |o| o.id.clone(),
    );
    output::print_output(&out, global.quiet)?;
    Ok(())
}
