use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::ApiCredentials,
    errors::AppError,
    models::{
        domain::QuizQuestion,
        dto::request::{GenerateQuestionsRequest, ParseCompletionRequest},
    },
    services::question_service::QuestionService,
};

#[post("/api/sessions/{id}/questions")]
pub async fn generate_questions(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<GenerateQuestionsRequest>,
    credentials: ApiCredentials,
) -> Result<HttpResponse, AppError> {
    let response = state
        .question_service
        .generate(&id, request.into_inner(), &credentials)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/questions/parse")]
pub async fn parse_completion(
    request: web::Json<ParseCompletionRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    Ok(HttpResponse::Ok().json(QuestionService::parse_completion(&request.raw)))
}

#[get("/api/questions/schema")]
pub async fn question_schema() -> HttpResponse {
    HttpResponse::Ok().json(schemars::schema_for!(QuizQuestion))
}

#[post("/api/credentials/verify")]
pub async fn verify_credentials(
    state: web::Data<AppState>,
    credentials: ApiCredentials,
) -> Result<HttpResponse, AppError> {
    let response = state.question_service.verify_credentials(&credentials).await?;
    Ok(HttpResponse::Ok().json(response))
}
