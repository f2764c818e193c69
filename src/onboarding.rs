//! Account onboarding: login, signup and logout against the identity provider, with the
//! local `users` table reconciled against the provider's identity.
//!
//! Handlers stay thin; everything that decides a status code lives here.

use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{
    IdentitySession, IdentityUser, LoginRequest, NewUserRecord, SignupRequest, UserRecord,
};
use crate::provider::IdentityProvider;
use crate::store::{RecordStore, StoreError};

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Multiple users found with the same email.";
pub const SIGNUP_STORE_FAILURE_MESSAGE: &str = "An error occurred while saving user to database";

/// Choices about what the flow stores and echoes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingPolicy {
    /// Include the submitted password in the login response.
    pub echo_password: bool,
    /// Write the submitted password into the `users` record.
    pub persist_password: bool,
    /// Write the optional username into the `users` record on signup.
    pub store_username: bool,
}

impl Default for OnboardingPolicy {
    fn default() -> Self {
        Self {
            echo_password: false,
            persist_password: true,
            store_username: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: IdentityUser,
    pub session: IdentitySession,
    #[serde(rename = "newUser", skip_serializing_if = "Option::is_none")]
    pub new_user: Option<UserRecord>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: IdentityUser,
    pub session: Option<IdentitySession>,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

pub struct AccountOnboarding {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn RecordStore>,
    policy: OnboardingPolicy,
}

impl AccountOnboarding {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
        policy: OnboardingPolicy,
    ) -> Self {
        Self {
            identity,
            store,
            policy,
        }
    }

    /// Signs the caller in, creating their `users` record on first login.
    ///
    /// A provider rejection stops before the store is touched. Store failures after a
    /// successful sign-in are reported as 500 and do not undo the sign-in.
    pub async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, AppError> {
        let signed_in = self
            .identity
            .sign_in_with_password(&credentials.email, &credentials.password)
            .await
            .map_err(|e| {
                info!("login rejected by identity provider: {}", e);
                AppError::from(e)
            })?;

        let new_user = self
            .reconcile_user(&credentials)
            .await?
            .map(|record| self.response_record(record));

        Ok(LoginResponse {
            user: signed_in.user,
            session: signed_in.session,
            new_user,
            email: credentials.email,
            password: self.policy.echo_password.then_some(credentials.password),
            message: "logged in",
        })
    }

    /// Returns the record created for a first-time login, `None` when one already existed.
    async fn reconcile_user(
        &self,
        credentials: &LoginRequest,
    ) -> Result<Option<UserRecord>, AppError> {
        let existing = self.store.find_users_by_email(&credentials.email).await?;
        match existing.len() {
            0 => {
                let record = NewUserRecord::new(credentials.email.clone()).with_password(
                    self.policy
                        .persist_password
                        .then(|| credentials.password.clone()),
                );
                match self.store.insert_user(record).await {
                    Ok(created) => {
                        info!("created user record {} on first login", created.id);
                        Ok(Some(created))
                    }
                    // Lost a race with a concurrent first login; the row exists now.
                    Err(StoreError::Conflict(msg)) => {
                        warn!("user record already created concurrently: {}", msg);
                        Ok(None)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            1 => Ok(None),
            n => {
                error!("{} user records share the email used to log in", n);
                Err(AppError::InternalServerError(DUPLICATE_EMAIL_MESSAGE.into()))
            }
        }
    }

    /// The stored password only leaves the server when echoing is switched on.
    fn response_record(&self, record: UserRecord) -> UserRecord {
        if self.policy.echo_password {
            record
        } else {
            UserRecord {
                password: None,
                ..record
            }
        }
    }

    /// Creates the provider account, then the matching `users` record.
    ///
    /// If the insert fails the provider account stays behind without a local record.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, AppError> {
        let signed_up = self
            .identity
            .sign_up(&request.email, &request.password)
            .await
            .map_err(|e| {
                info!("signup rejected by identity provider: {}", e);
                AppError::from(e)
            })?;

        let record = NewUserRecord::new(request.email)
            .with_id(signed_up.user.id)
            .with_username(request.username.filter(|_| self.policy.store_username))
            .with_password(self.policy.persist_password.then_some(request.password));

        if let Err(e) = self.store.insert_user(record).await {
            error!(
                "failed to insert user {} into database: {}",
                signed_up.user.id, e
            );
            return Err(AppError::InternalServerError(
                SIGNUP_STORE_FAILURE_MESSAGE.into(),
            ));
        }

        Ok(SignupResponse {
            user: signed_up.user,
            session: signed_up.session,
            message: "registered",
        })
    }

    pub async fn logout(&self, access_token: Option<&str>) -> Result<LogoutResponse, AppError> {
        self.identity.sign_out(access_token).await?;
        Ok(LogoutResponse {
            message: "Logout successful",
        })
    }
}
