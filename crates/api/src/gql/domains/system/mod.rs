use async_graphql::Object;

use crate::gql::scalars::DateTime;

#[derive(Default)]
pub struct SystemQuery;

#[Object]
impl SystemQuery {
    /// Current server time.
    async fn server_time(&self) -> DateTime {
        DateTime::now()
    }
}
