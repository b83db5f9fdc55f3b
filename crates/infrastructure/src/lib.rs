//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_directory_client;
mod jwt_token_codec;

pub use http_directory_client::{
    DirectoryEndpoints, HttpDirectoryClient, LOGIN_ACCEPTED_BODY, evaluate_login_response,
    parse_identity,
};
pub use jwt_token_codec::JwtTokenCodec;
