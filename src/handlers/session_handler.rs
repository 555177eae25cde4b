use actix_web::{
    delete, get,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    post, web, HttpResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::CreateSessionRequest,
        response::{DeleteResponse, SessionDto},
    },
};

#[post("/api/sessions")]
pub async fn create_session(
    state: web::Data<AppState>,
    request: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let session = state
        .session_service
        .create_session(request.topic.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(SessionDto::from(session)))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

#[delete("/api/sessions/{id}")]
pub async fn delete_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.session_service.delete_session(&id).await?;
    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Session '{}' deleted", id),
    }))
}

#[get("/api/sessions/{id}/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(session.questions))
}

#[delete("/api/sessions/{id}/questions")]
pub async fn clear_questions(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let session = state.question_service.clear_session(&id).await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(session)))
}

#[get("/api/sessions/{id}/export")]
pub async fn export_questions(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let file = state.question_service.export_session(&id).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name)],
        })
        .body(file.body))
}
