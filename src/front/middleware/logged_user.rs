use ntex::{
    http::Payload,
    web::{Error, FromRequest, HttpRequest},
};
use ntex_identity::RequestIdentity;

use crate::front::errors;
use crate::models;

/// Optional session, for the handlers open to everyone that behave
/// differently for a logged staff member
pub struct MaybeLoggedUser(pub Option<models::user_app::AuthSession>);

/// Reads the [AuthSession](models::user_app::AuthSession) remembered in the
/// identity cookie, expired sessions count as logged out
fn get_logged_session(
    identity_cookie: Option<String>,
) -> Result<models::user_app::AuthSession, Error> {
    match serde_json::from_str::<models::user_app::AuthSession>(&identity_cookie.unwrap_or_default())
    {
        Ok(session) if !session.is_expired() => Ok(session),
        _ => Err(errors::UserError::Unauthorized.into()),
    }
}

impl<Err> FromRequest<Err> for models::user_app::AuthSession {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let identity_cookie = req.get_identity();
        futures::future::ready(get_logged_session(identity_cookie))
    }
}

impl<Err> FromRequest<Err> for MaybeLoggedUser {
    type Error = Error;

    fn from_request(
        req: &HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let identity_cookie = req.get_identity();
        futures::future::ready(Ok(Self(get_logged_session(identity_cookie).ok())))
    }
}
