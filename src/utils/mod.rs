pub mod key_generator;
pub mod url_validator;

pub use key_generator::{KeyGenerator, RandomKeyGenerator, is_valid_short_key};
pub use url_validator::validate_url;
