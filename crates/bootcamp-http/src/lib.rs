mod error;
mod geocoder;
mod json;
mod routes;

pub use error::BootcampHttpError;
pub use geocoder::{GeocodeError, Geocoder, NoopGeocoder, StaticGeocoder};
pub use json::{document_to_json, documents_to_json};
pub use routes::{BASE_PATH, BootcampHttp};
