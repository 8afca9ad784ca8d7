use serde::{Deserialize, Serialize};
use std::fmt;

/// A generated exercise. Field names are the wire names the presentation
/// layer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "problema")]
    pub statement: String,
    #[serde(rename = "respuesta_correcta")]
    pub correct_answer: String,
}

/// Verdict on a student's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "es_correcta")]
    pub is_correct: bool,
    #[serde(rename = "mensaje")]
    pub message: String,
}

/// Presentation style requested for a generated exercise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseType {
    #[default]
    #[serde(rename = "Automático")]
    Automatic,
    #[serde(rename = "Problema contextualizado")]
    Contextualized,
    #[serde(rename = "Ejercicio directo")]
    Direct,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 3] = [
        ExerciseType::Automatic,
        ExerciseType::Contextualized,
        ExerciseType::Direct,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExerciseType::Automatic => "Automático",
            ExerciseType::Contextualized => "Problema contextualizado",
            ExerciseType::Direct => "Ejercicio directo",
        }
    }

    /// Any label other than the two explicit styles means automatic.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Problema contextualizado" => ExerciseType::Contextualized,
            "Ejercicio directo" => ExerciseType::Direct,
            _ => ExerciseType::Automatic,
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateProblemRequest {
    pub grado: String,
    pub tema: String,
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAnswerRequest {
    pub problema: String,
    pub respuesta_correcta: String,
    pub respuesta_usuario: String,
    pub grado: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepHelpRequest {
    pub problema: String,
    pub grado: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepHelpResponse {
    pub explicacion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeTopics {
    pub grado: String,
    pub temas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurriculumResponse {
    pub grados: Vec<GradeTopics>,
    pub tipos_ejercicio: Vec<String>,
}
