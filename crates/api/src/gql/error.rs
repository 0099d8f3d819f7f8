use infra::StoreError;

/// Error returned by resolvers.
///
/// Converts into `async_graphql::Error` through its `Display` impl, so `?`
/// works directly in resolver bodies. Store failures are logged in full and
/// reach clients only as a generic message.
#[derive(Debug)]
pub enum GqlError {
    Store(StoreError),
    InvalidId(String),
    MalformedInput { field: String, detail: String },
}

impl GqlError {
    pub fn malformed(field: impl Into<String>, detail: impl Into<String>) -> Self {
        GqlError::MalformedInput {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Store(e) => {
                // Log the real error server-side; return a generic message to clients
                tracing::error!("Store error: {e}");
                write!(f, "Internal store error")
            }
            GqlError::InvalidId(detail) => write!(f, "Invalid ID: {detail}"),
            GqlError::MalformedInput { field, detail } => {
                write!(f, "Malformed input for field '{field}': {detail}")
            }
        }
    }
}

impl std::error::Error for GqlError {}

impl From<StoreError> for GqlError {
    fn from(e: StoreError) -> Self {
        GqlError::Store(e)
    }
}

/// Routes store failures through [`GqlError`] so `?` never leaks backend
/// detail to clients.
///
/// Usage: `talhoes::get_by_id(&db, id).await.sanitized()?`
pub trait StoreResultExt<T> {
    fn sanitized(self) -> Result<T, GqlError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn sanitized(self) -> Result<T, GqlError> {
        self.map_err(GqlError::Store)
    }
}
