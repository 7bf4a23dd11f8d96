use thiserror::Error;

/// Reasons a registry operation is rejected.
///
/// Every variant is detected before the registry mutates anything, so a
/// failed call never leaves partial state behind.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BountyError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Deadline must be in the future")]
    InvalidDeadline,

    #[error("Bounty not found")]
    BountyNotFound,

    #[error("Bounty not open")]
    BountyNotOpen,

    #[error("Issuer cannot fulfill their own bounty")]
    IssuerCannotFulfillOwnBounty,

    #[error("Caller is not the issuer of this bounty")]
    NotIssuer,

    #[error("Fulfillment not found")]
    FulfillmentNotFound,
}

impl BountyError {
    /// Stable machine readable name of the error kind
    pub fn code(&self) -> &'static str {
        match self {
            BountyError::InvalidAmount => "InvalidAmount",
            BountyError::InvalidDeadline => "InvalidDeadline",
            BountyError::BountyNotFound => "BountyNotFound",
            BountyError::BountyNotOpen => "BountyNotOpen",
            BountyError::IssuerCannotFulfillOwnBounty => "IssuerCannotFulfillOwnBounty",
            BountyError::NotIssuer => "NotIssuer",
            BountyError::FulfillmentNotFound => "FulfillmentNotFound",
        }
    }
}

pub type Result<T> = std::result::Result<T, BountyError>;
