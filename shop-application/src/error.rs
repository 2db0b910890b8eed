use shop_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("api: {0}")]
    Api(String),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("no pending order")]
    NoPendingOrder,
}

pub type AppResult<T> = Result<T, AppError>;
