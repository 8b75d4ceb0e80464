use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::cookie::Cookie;
use actix_web::cookie::SameSite;
use actix_web::web;
use rlt_core::ID;
use rlt_core::Unique;

/// Refresh cookie carrying `value`, shaped by the environment.
pub fn cookie(settings: &Settings, value: &str) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, value.to_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(actix_web::cookie::time::Duration::seconds(
            settings.session.as_secs() as i64,
        ))
        .finish()
}

/// Rejects unreadable JSON bodies with 422 instead of actix's default 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1_048_576)
        .error_handler(|e, _| AuthError::Body(e.to_string()).into())
}

async fn credentials<R: Members>(
    db: &R,
    hasher: &Hasher,
    tokens: &Manager,
    req: &LoginRequest,
) -> Result<Member, AuthError> {
    req.validate()?;
    let Some(member) = bounded(tokens.settings().timeout, db.find_by_email(req.email.trim())).await?
    else {
        hasher.decoy(&req.password);
        return Err(AuthError::IdentityNotFound);
    };
    hasher.verify(&req.password, member.hashword())?;
    Ok(member)
}

pub async fn register<R: Members + 'static>(
    db: web::Data<R>,
    hasher: web::Data<Hasher>,
    tokens: web::Data<Manager>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    req.validate()?;
    let registration = Registration {
        id: ID::default(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        hashword: hasher.hash(&req.password)?,
    };
    let member = bounded(tokens.settings().timeout, db.create(&registration)).await?;
    log::info!("registered member {}", member.id());
    Ok(HttpResponse::Created().json(UserInfo::from(&member)))
}

/// Cookie flavor: refresh secret travels as an HttpOnly cookie.
pub async fn login<R: Members + Sessions + 'static>(
    db: web::Data<R>,
    hasher: web::Data<Hasher>,
    tokens: web::Data<Manager>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let member = credentials(db.get_ref(), &hasher, &tokens, &req).await?;
    let pair = tokens.pair(db.get_ref(), member.id()).await?;
    log::info!("member {} logged in", member.id());
    Ok(HttpResponse::Created()
        .cookie(cookie(tokens.settings(), pair.refresh.expose()))
        .json(TokenResponse::bearer(pair.access)))
}

/// Body flavor: both credentials returned in the payload.
pub async fn token<R: Members + Sessions + 'static>(
    db: web::Data<R>,
    hasher: web::Data<Hasher>,
    tokens: web::Data<Manager>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let member = credentials(db.get_ref(), &hasher, &tokens, &req).await?;
    let pair = tokens.pair(db.get_ref(), member.id()).await?;
    log::info!("member {} logged in", member.id());
    Ok(HttpResponse::Created().json(PairResponse::from(pair)))
}

/// Refresh from the cookie. A missing cookie reads the same as an unknown session.
pub async fn refresh<R: Sessions + 'static>(
    db: web::Data<R>,
    tokens: web::Data<Manager>,
    req: HttpRequest,
) -> Result<HttpResponse, AuthError> {
    let cookie = req
        .cookie(REFRESH_COOKIE)
        .ok_or(AuthError::SessionNotFound)?;
    let access = tokens.refresh(db.get_ref(), cookie.value()).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access)))
}

/// Refresh from the body.
pub async fn exchange<R: Sessions + 'static>(
    db: web::Data<R>,
    tokens: web::Data<Manager>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AuthError> {
    let access = tokens.refresh(db.get_ref(), &req.refresh_token).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::bearer(access)))
}

/// Clears the client's cookie. The server-side session lives until it expires.
pub async fn logout(tokens: web::Data<Manager>) -> HttpResponse {
    let mut cookie = cookie(tokens.settings(), "");
    cookie.make_removal();
    HttpResponse::NoContent().cookie(cookie).finish()
}

pub async fn me(auth: Auth) -> HttpResponse {
    HttpResponse::Ok().json(UserInfo::from(auth.member()))
}
