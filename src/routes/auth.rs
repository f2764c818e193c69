use crate::{
    auth::BearerToken,
    error::AppError,
    models::{LoginRequest, SignupRequest},
    onboarding::AccountOnboarding,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Login user
///
/// Signs in with the identity provider and makes sure a local user record exists.
///
/// ## Responses:
/// - `200 OK`: `{user, session, newUser?, email, message}`.
/// - `400 Bad Request`: the identity provider rejected the credentials.
/// - `422 Unprocessable Entity`: email or password is empty.
/// - `500 Internal Server Error`: the record store failed or holds duplicate emails.
#[post("/login")]
pub async fn login(
    onboarding: web::Data<AccountOnboarding>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let response = onboarding.login(login_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Register a new user
///
/// Creates the account with the identity provider and stores the matching user record.
///
/// ## Responses:
/// - `200 OK`: `{user, session, message}`.
/// - `400 Bad Request`: the identity provider refused the signup.
/// - `422 Unprocessable Entity`: email or password is empty.
/// - `500 Internal Server Error`: the user record could not be saved.
#[post("/signup")]
pub async fn signup(
    onboarding: web::Data<AccountOnboarding>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    let response = onboarding.signup(signup_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Logout user
///
/// Revokes the caller's session, if a bearer token was sent.
#[post("/logout")]
pub async fn logout(
    onboarding: web::Data<AccountOnboarding>,
    token: Option<BearerToken>,
) -> Result<impl Responder, AppError> {
    let response = onboarding
        .logout(token.as_ref().map(|t| t.0.as_str()))
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
