use std::fmt;

use bootcamp_store::StoreError;

use crate::geocoder::GeocodeError;

#[derive(Debug)]
pub enum BootcampHttpError {
    Store(StoreError),
    Geocode(GeocodeError),
    NotFound(String),
    ZipcodeNotFound(String),
    BadRequest(String),
}

impl fmt::Display for BootcampHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootcampHttpError::Store(e) => write!(f, "store error: {e}"),
            BootcampHttpError::Geocode(e) => write!(f, "geocode error: {e}"),
            BootcampHttpError::NotFound(id) => write!(f, "bootcamp not found: {id}"),
            BootcampHttpError::ZipcodeNotFound(zip) => write!(f, "zipcode not found: {zip}"),
            BootcampHttpError::BadRequest(msg) => write!(f, "bad request: {msg}"),
        }
    }
}

impl std::error::Error for BootcampHttpError {}

impl BootcampHttpError {
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            BootcampHttpError::Store(e) => match e {
                StoreError::InvalidId(_) => http::StatusCode::NOT_FOUND,
                StoreError::DuplicateKey(_) | StoreError::Query(_) => http::StatusCode::BAD_REQUEST,
                StoreError::Encoding(_) | StoreError::Storage(_) => {
                    http::StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            BootcampHttpError::Geocode(_) => http::StatusCode::BAD_GATEWAY,
            BootcampHttpError::NotFound(_) | BootcampHttpError::ZipcodeNotFound(_) => {
                http::StatusCode::NOT_FOUND
            }
            BootcampHttpError::BadRequest(_) => http::StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the client. Internal failures are not detailed.
    pub fn client_message(&self) -> String {
        match self {
            BootcampHttpError::Store(e) => match e {
                StoreError::InvalidId(id) => format!("Resource not found with id of {id}"),
                StoreError::DuplicateKey(_) => "Duplicate field value entered".into(),
                StoreError::Query(msg) => msg.clone(),
                StoreError::Encoding(_) | StoreError::Storage(_) => "Server Error".into(),
            },
            BootcampHttpError::Geocode(_) => "Geocoding failed".into(),
            BootcampHttpError::NotFound(id) => format!("Bootcamp not found with id of {id}"),
            BootcampHttpError::ZipcodeNotFound(zip) => {
                format!("No location found for zipcode {zip}")
            }
            BootcampHttpError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl From<StoreError> for BootcampHttpError {
    fn from(e: StoreError) -> Self {
        BootcampHttpError::Store(e)
    }
}

impl From<GeocodeError> for BootcampHttpError {
    fn from(e: GeocodeError) -> Self {
        BootcampHttpError::Geocode(e)
    }
}
