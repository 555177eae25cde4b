pub mod credentials;

pub use credentials::{ApiCredentials, API_KEY_HEADER};
