pub mod completion_client;
pub mod export_service;
pub mod generation_cache;
pub mod prompt_builder;
pub mod question_service;
pub mod response_parser;
pub mod session_service;
