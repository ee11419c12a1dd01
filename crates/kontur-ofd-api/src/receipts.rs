// Receipt endpoints and the account-wide receipt traversal
//
// `get_receipts` walks organizations -> cashboxes -> documents strictly in
// order, one request at a time, and flattens every document list into a
// single vector. The first failure anywhere aborts the walk and drops
// whatever was collected.

use tracing::{debug, info};

use crate::auth::{Credentials, Endpoints, Session};
use crate::client::OfdClient;
use crate::error::Error;
use crate::models::Receipt;
use crate::transport::TransportConfig;

impl OfdClient {
    /// List the fiscal documents a cashbox recorded on `date`.
    ///
    /// `GET /v2/organizations/{orgId}/cashboxes/{regNumber}/documents?date={date}`
    ///
    /// The date is passed through untouched; the server decides its format.
    pub async fn list_receipts(
        &self,
        session: &Session,
        organization_id: &str,
        reg_number: &str,
        date: &str,
    ) -> Result<Vec<Receipt>, Error> {
        let url = self.api_url(
            &[
                "v2",
                "organizations",
                organization_id,
                "cashboxes",
                reg_number,
                "documents",
            ],
            &[("date", date)],
        )?;
        debug!(organization_id, reg_number, date, "listing receipts");
        self.get_list(session, url).await
    }

    /// Collect every receipt recorded on `date` across all organizations and
    /// cashboxes of the account.
    ///
    /// Authenticates first, then visits organizations and their cashboxes in
    /// the order the server returns them. The result is the concatenation of
    /// every cashbox's document list in traversal order. Any error aborts the
    /// whole call; partial results are never returned.
    pub async fn get_receipts(
        &self,
        credentials: &Credentials,
        date: &str,
    ) -> Result<Vec<Receipt>, Error> {
        let session = self.authenticate(credentials).await?;
        let organizations = self.list_organizations(&session).await?;
        debug!(count = organizations.len(), "organizations fetched");

        let mut receipts = Vec::new();
        for organization in &organizations {
            let cashboxes = self.list_cashboxes(&session, &organization.id).await?;
            debug!(
                organization_id = %organization.id,
                count = cashboxes.len(),
                "cashboxes fetched"
            );

            for cashbox in &cashboxes {
                let batch = self
                    .list_receipts(&session, &organization.id, &cashbox.reg_number, date)
                    .await?;
                receipts.extend(batch);
            }
        }

        info!(
            date,
            organizations = organizations.len(),
            receipts = receipts.len(),
            "receipt traversal complete"
        );
        Ok(receipts)
    }
}

/// Fetch every receipt recorded on `date` for the account, using the default
/// Kontur endpoints and transport settings.
pub async fn get_receipts(credentials: &Credentials, date: &str) -> Result<Vec<Receipt>, Error> {
    let client = OfdClient::new(Endpoints::default(), &TransportConfig::default())?;
    client.get_receipts(credentials, date).await
}
