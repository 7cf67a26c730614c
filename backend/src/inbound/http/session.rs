//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting and retrieving the respondent's
//! email identity.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, RespondentEmail};

pub(crate) const EMAIL_KEY: &str = "respondent_email";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the respondent's email in the session cookie.
    pub fn persist_email(&self, email: &RespondentEmail) -> Result<(), Error> {
        self.0
            .insert(EMAIL_KEY, email.as_ref())
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Fetch the current respondent identity, if any.
    ///
    /// A stored value that no longer validates is treated as absent so the
    /// respondent is routed back to the entry form rather than erroring.
    pub fn respondent(&self) -> Result<Option<RespondentEmail>, Error> {
        let raw = self
            .0
            .get::<String>(EMAIL_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))?;
        match raw {
            Some(value) => match RespondentEmail::new(&value) {
                Ok(email) => Ok(Some(email)),
                Err(err) => {
                    tracing::warn!("invalid email in session cookie: {err}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
