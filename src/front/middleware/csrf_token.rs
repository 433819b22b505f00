use base64::{Engine, prelude::BASE64_STANDARD};
use csrf::{AesGcmCsrfProtection, CsrfProtection};
use ntex::{http::Payload, web};
use ntex_session::{Session, UserSession};

use crate::{
    consts,
    front::{AppState, errors},
};

/// Token pair stored in the private session cookie of a logged user.
///
/// Any handler taking it as an argument rejects the request with
/// [InvalidCsrfToken](errors::ServerError::InvalidCsrfToken) when the pair is
/// missing or doesn't verify.
#[derive(Default, serde::Serialize, serde::Deserialize)]
pub struct CsrfToken {
    pub token_base64: String,
    pub cookie_base64: String,
}

impl CsrfToken {
    /// New pair valid for the lifetime of the login cookies
    pub fn generate(csrf_protec: &AesGcmCsrfProtection) -> anyhow::Result<Self> {
        let (token, cookie) = csrf_protec
            .generate_token_pair(None, consts::MAX_AGE_COOKIES)
            .map_err(|e| anyhow::anyhow!("csrf token pair could not be generated: {e}"))?;

        Ok(Self {
            token_base64: token.b64_string(),
            cookie_base64: cookie.b64_string(),
        })
    }

    /// Generates a pair and stores it in the session cookie
    pub fn store_new(
        csrf_protec: &AesGcmCsrfProtection,
        session: &Session,
    ) -> Result<(), web::Error> {
        let pair = Self::generate(csrf_protec).map_err(|e| {
            errors::ServerError::InternalServerError(format!("cant set token csrf protection: {e}"))
        })?;

        session.set(consts::CSRF_TOKEN_COOKIE_NAME, serde_json::to_string(&pair)?)?;
        Ok(())
    }

    pub fn verify(&self, csrf_protec: &AesGcmCsrfProtection) -> bool {
        let token = BASE64_STANDARD
            .decode(self.token_base64.as_bytes())
            .map(|token| csrf_protec.parse_token(&token));
        let cookie = BASE64_STANDARD
            .decode(self.cookie_base64.as_bytes())
            .map(|cookie| csrf_protec.parse_cookie(&cookie));

        match (token, cookie) {
            (Ok(Ok(token)), Ok(Ok(cookie))) => {
                csrf_protec.verify_token_pair(&token, &cookie).is_ok()
            }
            _ => false,
        }
    }
}

fn stored_pair(req: &web::HttpRequest) -> Option<CsrfToken> {
    req.get_session()
        .get::<String>(consts::CSRF_TOKEN_COOKIE_NAME)
        .ok()
        .flatten()
        .and_then(|pair| serde_json::from_str::<CsrfToken>(&pair).ok())
}

impl<Err> web::FromRequest<Err> for CsrfToken {
    type Error = web::Error;

    fn from_request(
        req: &web::HttpRequest,
        _: &mut Payload,
    ) -> impl std::future::Future<Output = Result<Self, Self::Error>> {
        let verified = match (stored_pair(req), req.app_state::<AppState>()) {
            (Some(pair), Some(app_state)) if pair.verify(&app_state.csrf_protec) => Ok(pair),
            _ => Err(errors::ServerError::InvalidCsrfToken.into()),
        };

        std::future::ready(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_pair_verifies() {
        let csrf_protec = AesGcmCsrfProtection::from_key([7u8; 32]);

        let pair = CsrfToken::generate(&csrf_protec).unwrap();

        assert!(pair.verify(&csrf_protec));
    }

    #[test]
    fn test_pair_from_another_key_is_rejected() {
        let pair = CsrfToken::generate(&AesGcmCsrfProtection::from_key([7u8; 32])).unwrap();

        assert!(!pair.verify(&AesGcmCsrfProtection::from_key([8u8; 32])));
        assert!(!CsrfToken::default().verify(&AesGcmCsrfProtection::from_key([7u8; 32])));
    }
}
