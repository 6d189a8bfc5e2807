use crate::infrastructure::security::validate_token;
use crate::presentation::handlers::ApiError;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{AUTHORIZATION, HeaderName, HeaderValue},
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
    time::Instant,
};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const RESPONSE_TIME_HEADER: &str = "x-response-time";

const MAX_REQUEST_ID_LEN: usize = 64;

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Correlation id of the current request, echoed back in `x-request-id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Keeps a caller-supplied id when it is short printable ASCII, otherwise
    /// mints a fresh UUID.
    fn from_request(req: &ServiceRequest) -> Self {
        let incoming = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_REQUEST_ID_LEN
                    && id.bytes().all(|b| b.is_ascii_graphic())
            });

        match incoming {
            Some(id) => RequestId(id.to_string()),
            None => RequestId(Uuid::new_v4().to_string()),
        }
    }
}

/// Tags each request with a [`RequestId`] and runs the rest of the chain
/// inside an `http_request` span carrying it.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = RequestId::from_request(&req);
        let span = info_span!("http_request", request_id = %request_id.0);
        let header = HeaderValue::from_str(&request_id.0).ok();

        req.extensions_mut().insert(request_id);
        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                if let Some(value) = header {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// Adds `x-response-time` and logs one line per request, at `error` for 5xx
/// responses and `warn` for 4xx.
pub struct TimingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService { service }))
    }
}

pub struct TimingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let route = format!("{} {}", req.method(), req.path());
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

            if let Ok(value) = HeaderValue::from_str(&format!("{:.3}ms", elapsed_ms)) {
                res.headers_mut()
                    .insert(HeaderName::from_static(RESPONSE_TIME_HEADER), value);
            }

            let status = res.status();
            if status.is_server_error() {
                error!(route = %route, status = status.as_u16(), elapsed_ms, "Request failed");
            } else if status.is_client_error() {
                warn!(route = %route, status = status.as_u16(), elapsed_ms, "Request rejected");
            } else {
                info!(route = %route, status = status.as_u16(), elapsed_ms, "Request served");
            }

            Ok(res)
        })
    }
}

/// Rejects requests without a valid `Authorization: Bearer <token>` header
/// and attaches an [`AuthenticatedUser`] to the ones that carry one.
pub struct JwtAuthMiddleware {
    secret: Rc<String>,
}

impl JwtAuthMiddleware {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

impl<S> JwtAuthMiddlewareService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<AuthenticatedUser, ApiError> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                warn!(path = %req.path(), "Missing Authorization header");
                ApiError::Unauthenticated("Missing authorization token".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").map(str::trim).ok_or_else(|| {
            warn!(path = %req.path(), "Malformed Authorization header");
            ApiError::Unauthenticated("Malformed authorization header".to_string())
        })?;

        let user_id = validate_token(token, &self.secret).map_err(|e| {
            warn!(path = %req.path(), error = %e, "Rejected bearer token");
            ApiError::Unauthenticated("Invalid or expired token".to_string())
        })?;

        debug!(user_id = %user_id, "Bearer token verified");
        Ok(AuthenticatedUser { user_id })
    }
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            // Answered here so the protected handler never runs.
            Err(err) => {
                let res = req.into_response(err.error_response()).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
