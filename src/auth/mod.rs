//! Authentication and session infrastructure.
//!
//! Three sign-in paths feed the same JWT session model:
//!
//! - email/password (Argon2id hashes, HS256 access + refresh tokens)
//! - phone verification codes (one-time 6-digit codes with a TTL)
//! - Google sign-in (ID token verified against the tokeninfo endpoint)
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - Token encoding/decoding and password hashing
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and `AuthUser` extractor
//! - [`auth::otp`](crate::auth::otp) - Phone verification codes
//! - [`auth::google`](crate::auth::google) - Google ID token verification
//! - [`auth::messages`](crate::auth::messages) - Error code to human message table
//!
//! # Usage
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/protected", get(handler))
//!     .layer(middleware::from_fn(move |req, next| {
//!         atrium::auth::middleware::auth_middleware(auth_service.clone(), req, next)
//!     }));
//! ```

/// Google ID token verification.
pub mod google;
/// JWT token generation, validation, and password hashing services.
pub mod jwt;
/// Auth error code to human-readable message mapping.
pub mod messages;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Phone one-time verification codes.
pub mod otp;
