// Organization endpoints

use tracing::debug;

use crate::auth::Session;
use crate::client::OfdClient;
use crate::error::Error;
use crate::models::Organization;

impl OfdClient {
    /// List all organizations visible to the account.
    ///
    /// `GET /v2/organizations`
    pub async fn list_organizations(&self, session: &Session) -> Result<Vec<Organization>, Error> {
        let url = self.api_url(&["v2", "organizations"], &[])?;
        debug!("listing organizations");
        self.get_list(session, url).await
    }
}
