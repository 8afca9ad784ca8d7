use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use math_practice::tutor_service::NUMERIC_MATCH_MESSAGE;
use math_practice::{
    CompletionProvider, ExerciseType, FallbackRouter, LLMProviderType, ProviderError,
    ProviderOrder, ProviderRegistry, TextGenerator, TutorError, TutorService,
};

/// Replies with a fixed text and remembers every prompt it was given
struct RecordingGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, TutorError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Fails the test run's expectations if it is ever reached
struct UnreachableGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for UnreachableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, TutorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TutorError::ProvidersExhausted {
            last_error: "router must not be called".to_string(),
        })
    }
}

fn service(generator: Arc<dyn TextGenerator>) -> TutorService {
    TutorService::new(generator)
}

#[tokio::test]
async fn test_generate_problem_parses_fenced_json() {
    let generator = RecordingGenerator::new(
        "```json\n{\"problema\": \"Un libro cuesta $8.000 y tiene 25% de descuento. ¿Cuánto pagas?\", \"respuesta_correcta\": \"6000\"}\n```",
    );
    let problem = service(generator.clone())
        .generate_problem("5° Básico", "Porcentajes (básico)", ExerciseType::Automatic)
        .await
        .unwrap();

    assert!(!problem.statement.is_empty());
    assert_eq!(problem.correct_answer, "6000");
    assert_eq!(generator.calls(), 1);
    assert!(generator.last_prompt().contains("Porcentajes (básico)"));
    assert!(generator.last_prompt().contains("5° Básico"));
}

#[tokio::test]
async fn test_generate_problem_renames_respuesta() {
    let generator = RecordingGenerator::new(r#"{"problema": "Resuelve: 2x + 2 = 6", "respuesta": "x = 2"}"#);
    let problem = service(generator)
        .generate_problem("8° Básico", "Ecuaciones lineales", ExerciseType::Direct)
        .await
        .unwrap();

    assert_eq!(problem.correct_answer, "x = 2");
}

#[tokio::test]
async fn test_generate_problem_keeps_respuesta_correcta_when_both_present() {
    let generator = RecordingGenerator::new(
        r#"{"problema": "p", "respuesta": "otra", "respuesta_correcta": "la buena"}"#,
    );
    let problem = service(generator)
        .generate_problem("8° Básico", "Inecuaciones", ExerciseType::Automatic)
        .await
        .unwrap();

    assert_eq!(problem.correct_answer, "la buena");
}

#[tokio::test]
async fn test_generate_problem_handles_smart_quotes_and_numeric_answer() {
    let generator = RecordingGenerator::new("{\u{201C}problema\u{201D}: \u{201C}¿Cuánto es 7 x 8?\u{201D}, \u{201C}respuesta_correcta\u{201D}: 56}");
    let problem = service(generator)
        .generate_problem("3° Básico", "Multiplicación y división (tablas)", ExerciseType::Direct)
        .await
        .unwrap();

    assert_eq!(problem.statement, "¿Cuánto es 7 x 8?");
    assert_eq!(problem.correct_answer, "56");
}

#[tokio::test]
async fn test_generate_problem_surfaces_parse_errors() {
    let prose = RecordingGenerator::new("Claro, aquí tienes un problema: ...");
    let err = service(prose)
        .generate_problem("1° Básico", "Patrones", ExerciseType::Automatic)
        .await
        .unwrap_err();
    assert!(matches!(err, TutorError::Json(_)));

    let missing = RecordingGenerator::new(r#"{"problema": "sin respuesta"}"#);
    let err = service(missing)
        .generate_problem("1° Básico", "Patrones", ExerciseType::Automatic)
        .await
        .unwrap_err();
    assert!(matches!(err, TutorError::InvalidResponse(_)));
    assert!(err.to_string().contains("respuesta_correcta"));
}

#[tokio::test]
async fn test_verify_answer_numeric_match_skips_router() {
    let pairs = vec![("12", "12,0"), ("3.5", "3,5"), ("0,25", " 0.25 "), ("-4", "-4.00")];

    for (correct, given) in pairs {
        let generator = Arc::new(UnreachableGenerator { calls: AtomicUsize::new(0) });
        let feedback = service(generator.clone())
            .verify_answer("problema", correct, given, "5° Básico")
            .await
            .unwrap();

        assert!(feedback.is_correct, "{} vs {}", correct, given);
        assert_eq!(feedback.message, NUMERIC_MATCH_MESSAGE);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_verify_answer_non_numeric_asks_the_model() {
    let generator = RecordingGenerator::new(r#"{"es_correcta": true, "mensaje": "¡Bien! x = 3 es correcto."}"#);
    let feedback = service(generator.clone())
        .verify_answer("Resuelve: x + 1 = 4", "x = 3", "x=3", "7° Básico")
        .await
        .unwrap();

    assert_eq!(generator.calls(), 1);
    assert!(feedback.is_correct);
    assert!(generator.last_prompt().contains("Respuesta del estudiante: x=3"));
}

#[tokio::test]
async fn test_verify_answer_numeric_mismatch_still_asks_the_model() {
    let generator = RecordingGenerator::new(
        "```json\n{\"es_correcta\": false, \"mensaje\": \"Revisa la multiplicación: 7 x 8 = 56.\"}\n```",
    );
    let feedback = service(generator.clone())
        .verify_answer("¿Cuánto es 7 x 8?", "56", "54", "3° Básico")
        .await
        .unwrap();

    assert_eq!(generator.calls(), 1);
    assert!(!feedback.is_correct);
    assert!(feedback.message.contains("56"));
}

#[tokio::test]
async fn test_verify_answer_accepts_string_booleans() {
    let generator = RecordingGenerator::new(r#"{"es_correcta": "False", "mensaje": "Casi."}"#);
    let feedback = service(generator)
        .verify_answer("p", "x = 3", "x = 4", "8° Básico")
        .await
        .unwrap();
    assert!(!feedback.is_correct);
}

#[tokio::test]
async fn test_verify_answer_requires_keys() {
    let generator = RecordingGenerator::new(r#"{"mensaje": "sin veredicto"}"#);
    let err = service(generator)
        .verify_answer("p", "x = 3", "x = 4", "8° Básico")
        .await
        .unwrap_err();
    assert!(matches!(err, TutorError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_step_help_trims_and_allows_empty() {
    let generator = RecordingGenerator::new("\n\n1. Lee el problema.\n2. Resuelve.\n  ");
    let help = service(generator.clone()).step_help("p", "4° Básico").await.unwrap();
    assert_eq!(help, "1. Lee el problema.\n2. Resuelve.");
    assert!(generator.last_prompt().contains("paso a paso"));

    let empty = RecordingGenerator::new("");
    assert_eq!(service(empty).step_help("p", "4° Básico").await.unwrap(), "");
}

#[tokio::test]
async fn test_router_errors_propagate_unchanged() {
    let generator = Arc::new(UnreachableGenerator { calls: AtomicUsize::new(0) });
    let err = service(generator.clone()).step_help("p", "2° Básico").await.unwrap_err();

    assert!(matches!(err, TutorError::ProvidersExhausted { .. }));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

struct FlakyProvider {
    name: &'static str,
    reply: Option<&'static str>,
}

#[async_trait]
impl CompletionProvider for FlakyProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.reply
            .map(str::to_string)
            .ok_or_else(|| ProviderError::MissingCredential(format!("{}_API_KEY", self.name.to_uppercase())))
    }

    fn provider_name(&self) -> &'static str {
        self.name
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[tokio::test]
async fn test_service_over_real_router_with_mock_providers() {
    let mut registry = ProviderRegistry::new();
    registry.register(LLMProviderType::Groq, Arc::new(FlakyProvider { name: "groq", reply: None }));
    registry.register(
        LLMProviderType::Gemini,
        Arc::new(FlakyProvider {
            name: "gemini",
            reply: Some(r#"{"problema": "¿Cuánto es 1/2 + 1/4?", "respuesta_correcta": "3/4"}"#),
        }),
    );

    let tutor = TutorService::with_router(FallbackRouter::new(registry, ProviderOrder::parse("groq,gemini")));
    let problem = tutor
        .generate_problem("5° Básico", "Operaciones con fracciones", ExerciseType::Automatic)
        .await
        .unwrap();

    assert_eq!(problem.correct_answer, "3/4");
}

#[tokio::test]
async fn test_all_mock_providers_failing_reports_last() {
    let mut registry = ProviderRegistry::new();
    registry.register(LLMProviderType::Groq, Arc::new(FlakyProvider { name: "groq", reply: None }));
    registry.register(LLMProviderType::Gemini, Arc::new(FlakyProvider { name: "gemini", reply: None }));

    let tutor = TutorService::with_router(FallbackRouter::new(registry, ProviderOrder::default()));
    let err = tutor.step_help("p", "6° Básico").await.unwrap_err();

    assert!(err.to_string().contains("GEMINI_API_KEY"), "got: {}", err);
}
