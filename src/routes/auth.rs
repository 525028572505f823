use crate::{
    auth::{
        hash_password, verify_password, LoginForm, RegisterRequest, TokenResponse, TokenService,
    },
    error::{is_unique_violation, AppError},
    models::User,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Creates an account.
///
/// Answers with the public account record; the caller logs in separately
/// to obtain a token. A taken email is refused with a 400.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    registration: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    registration.validate()?;

    let taken = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE email = $1")
        .bind(&registration.email)
        .fetch_optional(&**pool)
        .await?;

    if taken.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&registration.password)?;

    let account = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING id, email, created_at",
    )
    .bind(&registration.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await
    .map_err(|error| {
        // Two concurrent registrations can both pass the existence check;
        // the unique index decides and the loser gets the same answer.
        if is_unique_violation(&error) {
            AppError::BadRequest("Email already registered".into())
        } else {
            AppError::from(error)
        }
    })?;

    Ok(HttpResponse::Created().json(account))
}

/// Exchanges credentials for a bearer token.
///
/// The body follows the OAuth2 password flow, so it is form-encoded and the
/// email travels in the `username` field.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let found = sqlx::query_as::<_, (i64, String, String)>(
        "SELECT id, email, password_hash FROM users WHERE email = $1",
    )
    .bind(&form.username)
    .fetch_optional(&**pool)
    .await?;

    // An unknown email and a wrong password produce the same response.
    match found {
        Some((id, email, password_hash)) if verify_password(&form.password, &password_hash) => {
            let access_token = tokens.issue(id, &email)?;
            Ok(HttpResponse::Ok().json(TokenResponse {
                access_token,
                token_type: "bearer".into(),
            }))
        }
        _ => Err(AppError::Unauthorized(
            "Incorrect email or password".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use jsonwebtoken::Algorithm;
    use serde_json::json;
    use sqlx::PgPool;

    // Never connects; handlers that fail validation answer before touching
    // the database.
    fn lazy_pool() -> PgPool {
        PgPool::connect_lazy("postgres://localhost/unused").unwrap()
    }

    #[actix_rt::test]
    async fn test_register_rejects_invalid_fields() {
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(lazy_pool()))
                .service(register),
        )
        .await;

        let malformed_email = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "email": "not-an-address",
                "password": "long-enough-pw"
            }))
            .to_request();
        let resp = test::call_service(&app, malformed_email).await;
        assert_eq!(resp.status(), 422);

        let short_password = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "email": "someone@tasknest.test",
                "password": "tiny"
            }))
            .to_request();
        let resp = test::call_service(&app, short_password).await;
        assert_eq!(resp.status(), 422);
    }

    #[actix_rt::test]
    async fn test_login_requires_form_fields() {
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(TokenService::new(
                    "route-test-secret",
                    Algorithm::HS256,
                    60,
                )))
                .service(login),
        )
        .await;

        // Missing password: rejected by the form extractor.
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "someone@tasknest.test")])
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
