//! HTTP inbound adapter exposing the survey endpoints.

pub mod error;
pub mod health;
pub mod home;
pub mod session;
pub mod state;
pub mod survey;
#[cfg(test)]
pub mod test_utils;

pub use crate::domain::ApiResult;

use actix_web::HttpResponse;
use actix_web::http::header;

/// `303 See Other` redirect; the survey flow chains pages with these.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
