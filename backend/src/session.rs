use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::{debug, error, warn};

/// SHA-256 of the master password; the plaintext is not in the source.
const MASTER_HASH: &str = "613dbe3d6c1ba08e5e4f8383f3148ec8e33aa334ede1f7536db8eaf7e4742383";

const MAX_SESSIONS: usize = 10_000;

/// Gates the mutating endpoints. One comparison strategy only: the submitted
/// secret is hashed and checked against the reference digest; a match issues
/// a random session token that lives for the process lifetime. Not a serious
/// security boundary, and the failure message deliberately says nothing about
/// why a login failed.
pub struct AdminGate {
    reference_hash: String,
    sessions: Mutex<HashSet<String>>,
    rng: SystemRandom,
}

impl AdminGate {
    /// Reference digest comes from `ADMIN_SECRET_SHA256` when set, otherwise
    /// the built-in constant.
    pub fn new() -> Self {
        let reference = std::env::var("ADMIN_SECRET_SHA256")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| MASTER_HASH.to_string());
        Self::with_reference(reference)
    }

    pub fn with_reference(reference_hash: impl Into<String>) -> Self {
        Self {
            reference_hash: reference_hash.into().trim().to_lowercase(),
            sessions: Mutex::new(HashSet::new()),
            rng: SystemRandom::new(),
        }
    }

    pub fn digest(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// `Some(token)` on a correct secret, `None` otherwise.
    pub fn login(&self, password: &str) -> Option<String> {
        if Self::digest(password.trim()) != self.reference_hash {
            warn!("admin login rejected");
            return None;
        }
        self.issue_token()
    }

    pub fn logout(&self, token: &str) -> bool {
        match self.sessions.lock() {
            Ok(mut sessions) => sessions.remove(token),
            Err(e) => {
                error!("failed to acquire session lock: {e}");
                false
            }
        }
    }

    pub fn is_authorized(&self, token: &str) -> bool {
        self.sessions
            .lock()
            .map(|sessions| sessions.contains(token))
            .unwrap_or(false)
    }

    fn issue_token(&self) -> Option<String> {
        let mut bytes = [0u8; 32];
        if self.rng.fill(&mut bytes).is_err() {
            error!("failed to generate session token");
            return None;
        }
        let token = URL_SAFE_NO_PAD.encode(bytes);
        match self.sessions.lock() {
            Ok(mut sessions) => {
                if sessions.len() >= MAX_SESSIONS {
                    sessions.clear();
                }
                sessions.insert(token.clone());
                debug!("admin session issued");
                Some(token)
            }
            Err(e) => {
                error!("failed to acquire session lock: {e}");
                None
            }
        }
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new()
    }
}

mod guard {
    use rocket::http::Status;
    use rocket::request::{FromRequest, Outcome};
    use rocket::Request;

    use crate::routes::AppState;

    /// Proof of an authenticated admin session, taken from the
    /// `X-Admin-Token` header.
    pub struct AdminToken(pub String);

    #[rocket::async_trait]
    impl<'r> FromRequest<'r> for AdminToken {
        type Error = ();

        async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
            let Some(state) = req.rocket().state::<AppState>() else {
                return Outcome::Error((Status::InternalServerError, ()));
            };
            match req.headers().get_one("X-Admin-Token") {
                Some(token) if state.admin.is_authorized(token) => {
                    Outcome::Success(AdminToken(token.to_string()))
                }
                _ => Outcome::Error((Status::Unauthorized, ())),
            }
        }
    }
}

pub use guard::AdminToken;
