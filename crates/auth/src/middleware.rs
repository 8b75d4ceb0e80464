use super::*;
use actix_web::Error;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use actix_web::body::EitherBody;
use actix_web::body::MessageBody;
use actix_web::dev::Payload;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::web;
use std::future::Ready;
use std::future::ready;

/// Expected authorization scheme.
pub const SCHEME: &str = "Bearer";

/// Splits an `Authorization` header value.
/// `None` when absent or blank; otherwise exactly `<scheme> <token>`.
pub fn credential(header: Option<&str>) -> Result<Option<&str>, AuthError> {
    let Some(header) = header.filter(|h| !h.trim().is_empty()) else {
        return Ok(None);
    };
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(token), None) => Ok(Some(token)),
        (Some(_), Some(_), None) => Err(AuthError::Scheme),
        _ => Err(AuthError::Malformed),
    }
}

/// Classifies a request as anonymous or authenticated.
///
/// Auth faults come back as errors for a 401; store trouble comes back
/// as a system fault and must not be read as "unauthenticated".
pub async fn resolve<R: Members>(
    manager: &Manager,
    members: &R,
    header: Option<&str>,
) -> Result<User, AuthError> {
    let Some(token) = credential(header)? else {
        return Ok(User::from(Lurker));
    };
    let id = manager.verify(token)?;
    bounded(manager.settings().timeout, members.find_by_id(id))
        .await?
        .map(User::from)
        .ok_or(AuthError::IdentityNotFound)
}

/// Authentication middleware. Attaches a [`User`] to every request it lets through.
///
/// Install with `actix_web::middleware::from_fn(authenticate::<R, _>)` where `R`
/// is the member store registered as `web::Data<R>`.
pub async fn authenticate<R, B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    R: Members + 'static,
    B: MessageBody + 'static,
{
    let outcome = match (
        req.app_data::<web::Data<Manager>>().cloned(),
        req.app_data::<web::Data<R>>().cloned(),
    ) {
        (Some(manager), Some(members)) => {
            let header = req
                .headers()
                .get(header::AUTHORIZATION)
                .map(|h| h.to_str().map_err(|_| AuthError::Malformed));
            match header.transpose() {
                Ok(header) => resolve(&manager, members.get_ref(), header).await,
                Err(e) => Err(e),
            }
        }
        (None, _) => Err(AuthError::Unconfigured("token manager")),
        (_, None) => Err(AuthError::Unconfigured("member store")),
    };
    let mut response = match outcome {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.call(req).await?.map_into_left_body()
        }
        Err(e) => req.error_response(e).map_into_right_body(),
    };
    response.headers_mut().append(
        header::VARY,
        header::HeaderValue::from_static("Authorization"),
    );
    Ok(response)
}

fn attached(req: &HttpRequest) -> Result<User, AuthError> {
    req.extensions()
        .get::<User>()
        .cloned()
        .ok_or(AuthError::Unconfigured("authentication middleware"))
}

/// Authorization guard. Extracting it rejects anonymous requests with 401.
pub struct Auth(pub Member);

impl Auth {
    pub fn member(&self) -> &Member {
        &self.0
    }
}

impl FromRequest for Auth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(attached(req).and_then(|user| user.member().cloned().map(Auth)))
    }
}

/// Whoever the middleware resolved, anonymous included. Never rejects.
pub struct MaybeAuth(pub User);

impl MaybeAuth {
    pub fn user(&self) -> &User {
        &self.0
    }
}

impl FromRequest for MaybeAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(attached(req).map(MaybeAuth))
    }
}
