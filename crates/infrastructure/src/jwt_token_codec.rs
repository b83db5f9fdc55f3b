use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use toolgate_application::TokenCodec;
use toolgate_core::{AppError, AppResult};
use toolgate_domain::{GrantedClaim, RequestedPermission, SignedToken};

/// HS256 JWT implementation of the gateway token codec.
///
/// Holds only the server secret; verification is a pure function of the
/// token, the secret and the clock.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    /// Creates a codec signing with `secret`.
    pub fn new(secret: &[u8]) -> AppResult<Self> {
        if secret.is_empty() {
            return Err(AppError::Validation(
                "token signing secret must not be empty".to_owned(),
            ));
        }

        // Expiry is checked against `verify_at`'s clock without leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Mints a token as if issued at `issued_at`.
    pub fn mint_at(
        &self,
        subject_id: &str,
        permission: &RequestedPermission,
        issued_at: DateTime<Utc>,
    ) -> AppResult<(SignedToken, GrantedClaim)> {
        let claim = GrantedClaim::issue(subject_id, permission.as_str(), issued_at);
        let token = encode(&Header::new(Algorithm::HS256), &claim, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign token: {error}")))?;

        Ok((SignedToken::new(token), claim))
    }

    /// Verifies a token against the clock value `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<GrantedClaim> {
        let claim = decode::<GrantedClaim>(token, &self.decoding_key, &self.validation)
            .map_err(|error| match error.kind() {
                ErrorKind::InvalidSignature => AppError::InvalidSignature,
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                // With a readable header the undecodable segment is the signature.
                ErrorKind::Base64(_) if decode_header(token).is_ok() => AppError::InvalidSignature,
                _ => AppError::MalformedToken(error.to_string()),
            })?
            .claims;

        if claim.is_expired_at(now) {
            return Err(AppError::TokenExpired);
        }

        Ok(claim)
    }
}

impl TokenCodec for JwtTokenCodec {
    fn mint(
        &self,
        subject_id: &str,
        permission: &RequestedPermission,
    ) -> AppResult<(SignedToken, GrantedClaim)> {
        self.mint_at(subject_id, permission, Utc::now())
    }

    fn verify(&self, token: &str) -> AppResult<GrantedClaim> {
        self.verify_at(token, Utc::now())
    }
}
