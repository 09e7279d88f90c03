pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{ensure_scheme, host_without_port, url_authority, url_host};
