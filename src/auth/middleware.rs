use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{error, warn};
use std::rc::Rc;

use crate::auth::{bearer_token, SessionLookup};
use crate::error::AppError;

/// Session gate for protected scopes.
///
/// Requests without a bearer token are turned away before any lookup happens. Otherwise
/// the `SessionLookup` registered as `web::Data<dyn SessionLookup>` decides, and the
/// resolved `Session` is stored in the request extensions.
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
                return Ok(reject(req, AppError::unauthorized()));
            };

            let Some(lookup) = req.app_data::<web::Data<dyn SessionLookup>>().cloned() else {
                error!("no session lookup registered for {}", req.path());
                return Ok(reject(
                    req,
                    AppError::InternalServerError("Session lookup is not configured".into()),
                ));
            };

            match lookup.lookup(&token).await {
                Ok(Some(session)) => {
                    req.extensions_mut().insert(session);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Ok(None) => Ok(reject(req, AppError::unauthorized())),
                Err(e) => {
                    warn!("session lookup failed: {}", e);
                    Ok(reject(req, AppError::unauthorized()))
                }
            }
        })
    }
}

fn reject<B>(req: ServiceRequest, error: AppError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(error.error_response())
        .map_into_right_body()
}
