use actix_web::{get, web, HttpResponse};

pub mod question_handler;
pub mod session_handler;

pub use question_handler::{
    generate_questions, parse_completion, question_schema, verify_credentials,
};
pub use session_handler::{
    clear_questions, create_session, delete_session, export_questions, get_session,
    list_questions,
};

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn register_endpoints(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(create_session)
        .service(get_session)
        .service(delete_session)
        .service(list_questions)
        .service(generate_questions)
        .service(clear_questions)
        .service(export_questions)
        .service(parse_completion)
        .service(question_schema)
        .service(verify_credentials);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().service(health_check)).await;

        let req = test::TestRequest::get().uri("/health").to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
