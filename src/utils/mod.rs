pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    absolutize, is_auth_wall, is_login_page, is_valid_url, profile_base_url, strip_query,
};
