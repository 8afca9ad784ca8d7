use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::errors::TutorError;
use crate::models::{ExerciseType, Feedback, Problem};
use crate::normalizer::{clean_json_text, parse_number};
use crate::prompts::{build_generate_prompt, build_help_prompt, build_verify_prompt};
use crate::router::{FallbackRouter, TextGenerator};

pub const NUMERIC_MATCH_MESSAGE: &str =
    "Excelente, tu resultado coincide con la respuesta correcta. ¡Sigue así! 💪";

/// The three operations offered to the presentation layer
#[derive(Clone)]
pub struct TutorService {
    generator: Arc<dyn TextGenerator>,
}

impl TutorService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub fn with_router(router: FallbackRouter) -> Self {
        Self::new(Arc::new(router))
    }

    pub async fn generate_problem(
        &self,
        grade: &str,
        topic: &str,
        exercise_type: ExerciseType,
    ) -> Result<Problem, TutorError> {
        info!(
            grade = %grade,
            topic = %topic,
            exercise_type = %exercise_type,
            "Generating practice problem"
        );

        let prompt = build_generate_prompt(grade, topic, exercise_type);
        let response_text = self.generator.generate(&prompt).await?;
        debug!(response_content = %response_text, "Raw LLM response for problem generation");

        let mut object = parse_json_object(&response_text)?;

        // Some models answer with "respuesta" instead of "respuesta_correcta"
        if !object.contains_key("respuesta_correcta") {
            if let Some(answer) = object.remove("respuesta") {
                object.insert("respuesta_correcta".to_string(), answer);
            }
        }

        let problem = Problem {
            statement: required_text(&object, "problema")?,
            correct_answer: required_text(&object, "respuesta_correcta")?,
        };

        info!(
            grade = %grade,
            topic = %topic,
            statement_length = problem.statement.len(),
            "Successfully generated practice problem"
        );
        Ok(problem)
    }

    /// Numerically equal answers are accepted locally. Everything else,
    /// including numeric mismatches, is judged by the model.
    pub async fn verify_answer(
        &self,
        problem: &str,
        correct_answer: &str,
        user_answer: &str,
        grade: &str,
    ) -> Result<Feedback, TutorError> {
        if let (Some(expected), Some(given)) = (parse_number(correct_answer), parse_number(user_answer)) {
            if expected == given {
                debug!(grade = %grade, "Answer matched numerically, skipping model check");
                return Ok(Feedback {
                    is_correct: true,
                    message: NUMERIC_MATCH_MESSAGE.to_string(),
                });
            }
        }

        info!(grade = %grade, "Asking model to verify answer");

        let prompt = build_verify_prompt(problem, correct_answer, user_answer, grade);
        let response_text = self.generator.generate(&prompt).await?;
        debug!(response_content = %response_text, "Raw LLM response for answer verification");

        let object = parse_json_object(&response_text)?;
        let is_correct = match object.get("es_correcta") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => true,
            Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => false,
            Some(other) => {
                return Err(TutorError::InvalidResponse(format!(
                    "'es_correcta' must be a boolean, got {}",
                    other
                )));
            }
            None => return Err(missing_key("es_correcta")),
        };

        Ok(Feedback {
            is_correct,
            message: required_text(&object, "mensaje")?,
        })
    }

    pub async fn step_help(&self, problem: &str, grade: &str) -> Result<String, TutorError> {
        info!(grade = %grade, "Requesting step-by-step help");

        let prompt = build_help_prompt(problem, grade);
        let response_text = self.generator.generate(&prompt).await?;
        Ok(response_text.trim().to_string())
    }
}

fn parse_json_object(response_text: &str) -> Result<Map<String, Value>, TutorError> {
    let cleaned = clean_json_text(response_text);
    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(TutorError::InvalidResponse(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => {
            error!(error = %e, json_content = %cleaned, "Failed to parse LLM JSON response");
            Err(TutorError::Json(e))
        }
    }
}

fn missing_key(key: &str) -> TutorError {
    TutorError::InvalidResponse(format!("missing key '{}'", key))
}

/// Strings are taken as-is; numbers and booleans are stringified.
fn required_text(object: &Map<String, Value>, key: &str) -> Result<String, TutorError> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
        None | Some(Value::Null) => Err(missing_key(key)),
        Some(other) => Err(TutorError::InvalidResponse(format!(
            "'{}' must be text, got {}",
            key, other
        ))),
    }
}
