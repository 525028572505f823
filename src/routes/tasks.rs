use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Task, TaskCreate, TaskQuery, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Lists the caller's tasks.
///
/// Supports exact-match filters on `completed` and `priority`, AND-combined
/// when both are given. Results come back ordered by id, which is creation
/// order.
///
/// ## Query parameters
/// - `completed` (optional): `true` or `false`.
/// - `priority` (optional): exact priority value.
///
/// ## Responses
/// - `200 OK` with a JSON array of tasks.
/// - `401 Unauthorized` without a valid token.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    filters: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    // Every branch keeps the ownership restriction; filters only narrow
    // within the caller's own rows.
    let mut sql = String::from(
        "SELECT id, title, description, priority, completed, user_id \
         FROM tasks WHERE user_id = $1",
    );

    let mut clauses: Vec<String> = Vec::new();
    if filters.completed.is_some() {
        clauses.push(format!("completed = ${}", clauses.len() + 2));
    }
    if filters.priority.is_some() {
        clauses.push(format!("priority = ${}", clauses.len() + 2));
    }
    if !clauses.is_empty() {
        sql.push_str(" AND ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY id");

    let mut query = sqlx::query_as::<_, Task>(&sql).bind(user.0.id);
    if let Some(completed) = filters.completed {
        query = query.bind(completed);
    }
    if let Some(priority) = filters.priority {
        query = query.bind(priority);
    }

    let tasks = query.fetch_all(&**pool).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the caller.
///
/// The owner is always the authenticated user, and a new task always starts
/// incomplete, whatever the payload says.
///
/// ## Request body
/// - `title`: required, 1-255 characters.
/// - `description` (optional).
/// - `priority` (optional): defaults to 1.
///
/// ## Responses
/// - `201 Created` with the stored task.
/// - `401 Unauthorized` without a valid token.
/// - `422 Unprocessable Entity` when the title is empty or too long.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    payload: web::Json<TaskCreate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    payload.validate()?;

    let task = sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (title, description, priority, user_id)
         VALUES ($1, $2, $3, $4)
         RETURNING id, title, description, priority, completed, user_id",
    )
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.priority)
    .bind(user.0.id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(task))
}

/// Fetches one task by id.
///
/// Ownership is folded into the lookup itself, so a task owned by someone
/// else answers exactly like a task that does not exist.
///
/// ## Responses
/// - `200 OK` with the task.
/// - `401 Unauthorized` without a valid token.
/// - `404 Not Found` when the id is absent or owned by another user.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    id: web::Path<i64>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, priority, completed, user_id
         FROM tasks WHERE id = $1 AND user_id = $2",
    )
    .bind(id.into_inner())
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Applies a partial update to one task.
///
/// Only the fields present in the body change; absent fields keep their
/// stored values. The ownership rule is the same as for fetching.
///
/// ## Request body
/// Any subset of `title`, `description`, `priority` and `completed`.
///
/// ## Responses
/// - `200 OK` with the task after the patch.
/// - `401 Unauthorized` without a valid token.
/// - `404 Not Found` when the id is absent or owned by another user.
/// - `422 Unprocessable Entity` when a patched title is empty or too long.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    id: web::Path<i64>,
    patch: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    // Absent fields arrive as NULL and COALESCE keeps the stored value.
    // Ownership sits in the WHERE clause, so a foreign task is
    // indistinguishable from a missing one.
    let task = sqlx::query_as::<_, Task>(
        "UPDATE tasks
         SET title = COALESCE($1, title),
             description = COALESCE($2, description),
             priority = COALESCE($3, priority),
             completed = COALESCE($4, completed)
         WHERE id = $5 AND user_id = $6
         RETURNING id, title, description, priority, completed, user_id",
    )
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(patch.priority)
    .bind(patch.completed)
    .bind(id.into_inner())
    .bind(user.0.id)
    .fetch_optional(&**pool)
    .await?;

    match task {
        Some(task) => Ok(HttpResponse::Ok().json(task)),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Deletes one task.
///
/// ## Responses
/// - `204 No Content` on success, with an empty body.
/// - `401 Unauthorized` without a valid token.
/// - `404 Not Found` when the id is absent or owned by another user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    id: web::Path<i64>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let outcome = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(id.into_inner())
        .bind(user.0.id)
        .execute(&**pool)
        .await?;

    if outcome.rows_affected() == 0 {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
