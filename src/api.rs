use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::debug;

use crate::{
    curriculum,
    errors::{ApiError, ErrorContext},
    models::*,
    tutor_service::TutorService,
};

// Import logging macros
use crate::{log_api_error, log_api_start, log_api_success, log_validation};

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Clone)]
pub struct AppState {
    pub tutor: TutorService,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

fn validate_grade(grade: &str) -> Result<(), ApiError> {
    if curriculum::topics_for(grade).is_none() {
        return Err(ApiError::ValidationError(format!("Unknown grade '{}'", grade)));
    }
    Ok(())
}

fn validate_problem_text(problem: &str) -> Result<(), ApiError> {
    if problem.trim().is_empty() {
        return Err(ApiError::ValidationError("Problem text must not be empty".to_string()));
    }
    Ok(())
}

fn reject(error: ApiError, context: ErrorContext) -> (StatusCode, Json<ApiResponse<()>>) {
    log_validation!(failure, "api_request", error = error);
    error.to_response_with_context(context)
}

pub async fn get_curriculum() -> Json<ApiResponse<CurriculumResponse>> {
    debug!("Listing curriculum");
    Json(ApiResponse::success(curriculum::curriculum_response()))
}

pub async fn generate_problem(
    State(state): State<AppState>,
    Json(request): Json<GenerateProblemRequest>,
) -> ApiResult<Problem> {
    log_api_start!("generate_problem", grade = request.grado, topic = request.tema);
    let context = || {
        ErrorContext::new("generate_problem")
            .with_grade(&request.grado)
            .with_topic(&request.tema)
    };

    validate_grade(&request.grado).map_err(|e| reject(e, context()))?;
    if !curriculum::is_known_topic(&request.grado, &request.tema) {
        let error = ApiError::ValidationError(format!(
            "Topic '{}' is not part of {}",
            request.tema, request.grado
        ));
        return Err(reject(error, context()));
    }

    let exercise_type = request
        .tipo
        .as_deref()
        .map(ExerciseType::from_label)
        .unwrap_or_default();

    match state
        .tutor
        .generate_problem(&request.grado, &request.tema, exercise_type)
        .await
    {
        Ok(problem) => {
            log_api_success!("generate_problem", grade = request.grado, "problem generated");
            Ok(Json(ApiResponse::success(problem)))
        }
        Err(e) => {
            log_api_error!("generate_problem", grade = request.grado, error = e, "could not generate problem");
            Err(ApiError::from(e).to_response_with_context(context()))
        }
    }
}

pub async fn verify_answer(
    State(state): State<AppState>,
    Json(request): Json<VerifyAnswerRequest>,
) -> ApiResult<Feedback> {
    log_api_start!("verify_answer", grade = request.grado);
    let context = || ErrorContext::new("verify_answer").with_grade(&request.grado);

    validate_grade(&request.grado).map_err(|e| reject(e, context()))?;
    validate_problem_text(&request.problema).map_err(|e| reject(e, context()))?;

    match state
        .tutor
        .verify_answer(
            &request.problema,
            &request.respuesta_correcta,
            &request.respuesta_usuario,
            &request.grado,
        )
        .await
    {
        Ok(feedback) => {
            log_api_success!("verify_answer", grade = request.grado, "answer verified");
            Ok(Json(ApiResponse::success(feedback)))
        }
        Err(e) => {
            log_api_error!("verify_answer", grade = request.grado, error = e, "could not verify answer");
            Err(ApiError::from(e).to_response_with_context(context()))
        }
    }
}

pub async fn step_help(
    State(state): State<AppState>,
    Json(request): Json<StepHelpRequest>,
) -> ApiResult<StepHelpResponse> {
    log_api_start!("step_help", grade = request.grado);
    let context = || ErrorContext::new("step_help").with_grade(&request.grado);

    validate_grade(&request.grado).map_err(|e| reject(e, context()))?;
    validate_problem_text(&request.problema).map_err(|e| reject(e, context()))?;

    match state.tutor.step_help(&request.problema, &request.grado).await {
        Ok(explicacion) => {
            log_api_success!("step_help", grade = request.grado, "help generated");
            Ok(Json(ApiResponse::success(StepHelpResponse { explicacion })))
        }
        Err(e) => {
            log_api_error!("step_help", grade = request.grado, error = e, "could not generate help");
            Err(ApiError::from(e).to_response_with_context(context()))
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/curriculum", get(get_curriculum))
        .route("/api/problems", post(generate_problem))
        .route("/api/answers/verify", post(verify_answer))
        .route("/api/help", post(step_help))
        .with_state(state)
}
