//! Chilean primary-school math curriculum, 1° to 8° Básico.

use crate::models::{CurriculumResponse, ExerciseType, GradeTopics};

pub const CURRICULUM: &[(&str, &[&str])] = &[
    (
        "1° Básico",
        &[
            "Conteo hasta 100",
            "Sumas y restas simples",
            "Figuras geométricas básicas",
            "Patrones",
            "Medidas no estandarizadas",
        ],
    ),
    (
        "2° Básico",
        &[
            "Números hasta 1.000",
            "Sumas y restas con llevadas",
            "Multiplicación como suma reiterada",
            "Mitades y cuartos",
            "Reloj y monedas",
        ],
    ),
    (
        "3° Básico",
        &[
            "Multiplicación y división (tablas)",
            "Fracciones unitarias",
            "Perímetro de figuras simples",
            "Medición estandarizada",
        ],
    ),
    (
        "4° Básico",
        &[
            "Números hasta 1.000.000",
            "Multiplicación y división (mayores)",
            "Fracciones equivalentes",
            "Decimales (introducción)",
            "Área de cuadrados y rectángulos",
        ],
    ),
    (
        "5° Básico",
        &[
            "Operaciones con fracciones",
            "Operaciones con decimales",
            "Porcentajes (básico)",
            "Triángulos y cuadriláteros",
            "Coordenadas en el plano",
            "Área de figuras planas",
        ],
    ),
    (
        "6° Básico",
        &[
            "Fracciones, decimales y porcentajes (equivalencia)",
            "Proporcionalidad y razones",
            "Perímetro y área (polígonos)",
            "Volumen de prismas",
            "Gráficos y tablas simples",
        ],
    ),
    (
        "7° Básico",
        &[
            "Números enteros",
            "Potencias y raíces simples",
            "Razones y proporciones",
            "Ecuaciones de primer grado (simples)",
            "Área y volumen (cuerpos)",
            "Estadística: media, mediana y moda",
        ],
    ),
    (
        "8° Básico",
        &[
            "Álgebra (expresiones)",
            "Ecuaciones lineales",
            "Inecuaciones",
            "Funciones lineales (introducción)",
            "Volumen (cilindros, conos, esferas)",
            "Probabilidades",
            "Porcentajes avanzados",
        ],
    ),
];

pub fn grades() -> impl Iterator<Item = &'static str> {
    CURRICULUM.iter().map(|(grade, _)| *grade)
}

pub fn topics_for(grade: &str) -> Option<&'static [&'static str]> {
    CURRICULUM
        .iter()
        .find(|(name, _)| *name == grade)
        .map(|(_, topics)| *topics)
}

pub fn is_known_topic(grade: &str, topic: &str) -> bool {
    topics_for(grade).is_some_and(|topics| topics.iter().any(|t| *t == topic))
}

pub fn curriculum_response() -> CurriculumResponse {
    CurriculumResponse {
        grados: CURRICULUM
            .iter()
            .map(|(grade, topics)| GradeTopics {
                grado: grade.to_string(),
                temas: topics.iter().map(|t| t.to_string()).collect(),
            })
            .collect(),
        tipos_ejercicio: ExerciseType::ALL.iter().map(|t| t.label().to_string()).collect(),
    }
}
