//! Tower middleware that guards protected routes.
//!
//! The [`SessionGuardLayer`] verifies every request through the
//! [`SessionGateway`] before the wrapped service runs. On failure it clears
//! the session cookie and answers 401 without calling the inner service. On
//! success it attaches a [`RequestContext`] and forwards any freshly issued
//! cookie on the response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response};
use axum::response::IntoResponse;
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::context::RequestContext;
use crate::error::AuthError;
use crate::gateway::{SessionGateway, Verified};

type VerifyFuture = Pin<Box<dyn Future<Output = Result<Verified, AuthError>> + Send>>;

/// Tower layer that requires a verified session.
#[derive(Clone)]
pub struct SessionGuardLayer {
    gateway: Arc<SessionGateway>,
}

impl SessionGuardLayer {
    /// Create a new guard layer backed by `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<SessionGateway>) -> Self {
        Self { gateway }
    }
}

impl<S> Layer<S> for SessionGuardLayer {
    type Service = SessionGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionGuardService {
            inner,
            gateway: Arc::clone(&self.gateway),
        }
    }
}

/// The session guard service.
#[derive(Clone)]
pub struct SessionGuardService<S> {
    inner: S,
    gateway: Arc<SessionGateway>,
}

impl<S> Service<Request<Body>> for SessionGuardService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = SessionGuardFuture<S>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Take the service that was driven to readiness, leave a clone behind
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);

        let gateway = Arc::clone(&self.gateway);
        let headers = req.headers().clone();
        let verify: VerifyFuture = Box::pin(async move { gateway.verify(&headers).await });

        SessionGuardFuture {
            state: GuardState::Verifying {
                verify,
                inner: Some(inner),
                req: Some(req),
            },
            gateway: Arc::clone(&self.gateway),
        }
    }
}

pin_project! {
    /// Future for the session guard service.
    pub struct SessionGuardFuture<S>
    where
        S: Service<Request<Body>>,
    {
        #[pin]
        state: GuardState<S>,
        gateway: Arc<SessionGateway>,
    }
}

pin_project! {
    #[project = GuardStateProj]
    enum GuardState<S>
    where
        S: Service<Request<Body>>,
    {
        Verifying {
            verify: VerifyFuture,
            inner: Option<S>,
            req: Option<Request<Body>>,
        },
        Calling {
            #[pin]
            future: S::Future,
            cookie: Option<HeaderValue>,
        },
        Done,
    }
}

impl<S> Future for SessionGuardFuture<S>
where
    S: Service<Request<Body>, Response = Response<Body>>,
{
    type Output = Result<S::Response, S::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let mut this = self.as_mut().project();

            match this.state.as_mut().project() {
                GuardStateProj::Verifying { verify, inner, req } => {
                    let outcome = ready!(verify.as_mut().poll(cx));
                    let (Some(mut service), Some(mut request)) = (inner.take(), req.take()) else {
                        panic!("polled after completion");
                    };

                    match outcome {
                        Ok(verified) => {
                            request
                                .extensions_mut()
                                .insert(RequestContext::new(verified.user, verified.source));
                            let future = service.call(request);
                            this.state.set(GuardState::Calling {
                                future,
                                cookie: verified.cookie,
                            });
                        }
                        Err(err) => {
                            tracing::debug!(error = %err, path = %request.uri().path(), "Access denied");
                            let response = reject(this.gateway);
                            this.state.set(GuardState::Done);
                            return Poll::Ready(Ok(response));
                        }
                    }
                }
                GuardStateProj::Calling { future, cookie } => {
                    let mut response = ready!(future.poll(cx))?;
                    if let Some(cookie) = cookie.take() {
                        response.headers_mut().append(header::SET_COOKIE, cookie);
                    }
                    this.state.set(GuardState::Done);
                    return Poll::Ready(Ok(response));
                }
                GuardStateProj::Done => {
                    panic!("polled after completion");
                }
            }
        }
    }
}

/// 401 that also clears whatever session cookie the client holds.
fn reject(gateway: &SessionGateway) -> Response<Body> {
    let mut response = AuthError::LoginRequired.into_response();
    match gateway.cookie_config().clear() {
        Ok(cookie) => {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        Err(e) => tracing::error!(error = %e, "Failed to build clearing cookie"),
    }
    response
}
