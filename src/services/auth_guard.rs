// services/auth_guard.rs
//
// Bearer-token request guard for the /admin surface. Failures stash their
// error code in the request-local cache so the 401 catcher can render the
// precise {message, code} body.

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

use crate::jwt::jwt_helper::{verify_access_token, AuthKeys};
use crate::models::user::User;
use crate::repository::user_repository::UserRepository;

#[derive(Clone, Default)]
pub struct AuthFailure(pub Option<(&'static str, &'static str)>);

pub struct AuthUser {
    pub user: User,
}

fn extract_bearer_token<'a>(request: &'a Request<'_>) -> Option<&'a str> {
    request
        .headers()
        .get_one("Authorization")
        .and_then(|header| header.strip_prefix("Bearer "))
}

fn fail(request: &Request<'_>, code: &'static str, message: &'static str) -> Outcome<AuthUser, ()> {
    request.local_cache(|| AuthFailure(Some((code, message))));
    Outcome::Error((Status::Unauthorized, ()))
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(token) = extract_bearer_token(request) else {
            return fail(request, "NO_TOKEN", "Unauthorized");
        };

        let Some(keys) = request.rocket().state::<AuthKeys>() else {
            return Outcome::Error((Status::InternalServerError, ()));
        };
        let Some(claims) = verify_access_token(keys, token) else {
            return fail(request, "INVALID_TOKEN", "Invalid or expired token");
        };

        let Some(user_repo) = request.rocket().state::<UserRepository>() else {
            return Outcome::Error((Status::InternalServerError, ()));
        };
        let Some(user) = user_repo.find_by_id(&claims.sub) else {
            return fail(request, "USER_NOT_FOUND", "User not found");
        };

        Outcome::Success(AuthUser { user })
    }
}

// Optional Idempotency-Key header; the appointment POST handlers require it.
pub struct IdempotencyKey(pub Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for IdempotencyKey {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let key = request
            .headers()
            .get_one("Idempotency-Key")
            .map(str::to_string);
        Outcome::Success(IdempotencyKey(key))
    }
}
