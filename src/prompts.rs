use crate::models::ExerciseType;

fn style_directive(exercise_type: ExerciseType) -> &'static str {
    match exercise_type {
        ExerciseType::Contextualized => {
            "Genera un problema contextualizado con una historia breve y realista del día a día."
        }
        ExerciseType::Direct => {
            "Genera un ejercicio directo y simbólico, por ejemplo: Resuelve: 2x + 2 = 5."
        }
        ExerciseType::Automatic => {
            "Para Fracciones/Porcentajes/Proporciones/Volumen prefiere problema contextualizado; \
             para Álgebra/Ecuaciones/Inecuaciones prefiere ejercicio directo y simbólico."
        }
    }
}

/// Prompt asking for one exercise as a `{problema, respuesta_correcta}` object.
pub fn build_generate_prompt(grade: &str, topic: &str, exercise_type: ExerciseType) -> String {
    format!(
        r#"
Eres un profesor de matemáticas para estudiantes de {grade}.
Crea UN ejercicio del tema: "{topic}".

El ejercicio puede ser:
- Un problema contextualizado (historia breve y clara), o
- Un ejercicio directo (p. ej., Resuelve: 2x + 2 = 5)

{directive}

Requisitos:
- Enunciado corto y preciso (1–3 líneas).
- Una única respuesta correcta (numérica o expresión corta).
- Nivel adecuado a {grade}.
- Español de Chile. Sin adornos.

Devuelve SOLO un JSON válido (sin texto extra, sin comentarios, sin ```):
{{
  "problema": "Texto del problema o ejercicio.",
  "respuesta_correcta": "Respuesta correcta."
}}
"#,
        directive = style_directive(exercise_type),
    )
}

/// Prompt asking the model to grade an answer as `{es_correcta, mensaje}`.
pub fn build_verify_prompt(problem: &str, correct_answer: &str, user_answer: &str, grade: &str) -> String {
    format!(
        r#"
Evalúa la respuesta de un estudiante chileno de {grade}.

Problema: {problem}
Respuesta correcta: {correct_answer}
Respuesta del estudiante: {user_answer}

Indica si es correcta. Si es incorrecta, explica brevemente por qué y cómo resolverlo correctamente, en un tono amable y claro.

Devuelve SOLO JSON (sin texto extra):
{{
  "es_correcta": true/false,
  "mensaje": "Texto explicativo breve para el estudiante."
}}
"#
    )
}

/// Free-text prompt for a numbered walkthrough.
pub fn build_help_prompt(problem: &str, grade: &str) -> String {
    format!(
        r#"
Explica paso a paso cómo resolver este problema matemático para un estudiante de {grade}.
Problema: {problem}

Usa pasos numerados, lenguaje amigable y claro (Chile). Devuelve solo el texto de la explicación.
"#
    )
}
