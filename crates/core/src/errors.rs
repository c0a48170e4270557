use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejected before it reaches the valuation arithmetic.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("room size must be greater than zero, got {0}")]
    NonPositiveSize(Decimal),
    #[error("distance to university cannot be negative, got {0}")]
    NegativeDistance(Decimal),
    #[error("floor cannot be negative, got {0}")]
    NegativeFloor(i32),
    #[error("unknown room type `{0}` (expected private|shared|studio)")]
    UnknownRoomType(String),
    #[error("room features are out of range: valuation overflowed at the {0} stage")]
    ValueOutOfRange(&'static str),
    #[error("room features value the room at {0}, which is not a positive rent")]
    NonPositivePrice(i64),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("reference listing #{index} ({location}) has non-positive size {size}")]
    NonPositiveSize { index: usize, location: String, size: Decimal },
    #[error("reference listing #{index} ({location}) has non-positive price {price}")]
    NonPositivePrice { index: usize, location: String, price: Decimal },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The room details could not be valued. Check inputs and try again."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::Internal { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Validation(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Dataset(error) => {
                Self::Internal { message: error.to_string(), correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
