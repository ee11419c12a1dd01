// Cashbox endpoints

use tracing::debug;

use crate::auth::Session;
use crate::client::OfdClient;
use crate::error::Error;
use crate::models::Cashbox;

impl OfdClient {
    /// List the cashboxes registered to an organization.
    ///
    /// `GET /v2/organizations/{orgId}/cashboxes`
    pub async fn list_cashboxes(
        &self,
        session: &Session,
        organization_id: &str,
    ) -> Result<Vec<Cashbox>, Error> {
        let url = self.api_url(&["v2", "organizations", organization_id, "cashboxes"], &[])?;
        debug!(organization_id, "listing cashboxes");
        self.get_list(session, url).await
    }
}
