//! Command handlers, one module per resource.

pub mod cashboxes;
pub mod organizations;
pub mod receipts;

use kontur_ofd_api::OfdClient;

use crate::cli::{Command, GlobalOpts};
use crate::config::Settings;
use crate::error::CliError;

/// Route an API-backed command to its handler.
pub async fn dispatch(
    cmd: Command,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = OfdClient::new(settings.endpoints.clone(), &settings.transport)?;

    match cmd {
        Command::Receipts(args) => receipts::handle(&client, settings, args, global).await,
        Command::Organizations => organizations::handle(&client, settings, global).await,
        Command::Cashboxes(args) => cashboxes::handle(&client, settings, args, global).await,
        Command::Completions(_) => unreachable!("handled before dispatch"),
    }
}
