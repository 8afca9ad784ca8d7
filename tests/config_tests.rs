use math_practice::config::{DEFAULT_GEMINI_MODEL, DEFAULT_GROQ_MODEL};
use math_practice::{Config, LLMProviderType, ProviderOrder, SecretsStore};

use LLMProviderType::{Gemini, Groq};

#[test]
fn test_provider_order_parsing() {
    let test_cases = vec![
        ("groq,gemini", vec![Groq, Gemini]),
        ("gemini,groq", vec![Gemini, Groq]),
        ("  Gemini , GROQ ", vec![Gemini, Groq]),
        ("gemini", vec![Gemini]),
        ("groq", vec![Groq]),
        ("openai,gemini,claude", vec![Gemini]),
        ("gemini,gemini,groq,gemini", vec![Gemini, Groq]),
    ];

    for (input, expected) in test_cases {
        let order = ProviderOrder::parse(input);
        assert_eq!(order.providers(), expected.as_slice(), "Input '{}'", input);
        println!("✅ '{}' -> {:?}", input, order.providers());
    }
}

#[test]
fn test_unrecognized_order_falls_back_to_default() {
    let unknown_orders = vec!["", ",", "openai", "claude, llama", "  ,  , "];

    for raw in unknown_orders {
        assert_eq!(
            ProviderOrder::parse(raw).providers(),
            &[Groq, Gemini],
            "'{}' should fall back to the default order",
            raw
        );
    }
}

#[test]
fn test_parsed_order_preserves_relative_input_order() {
    let raw = "x, gemini, y, groq, z";
    let order = ProviderOrder::parse(raw);
    assert_eq!(order.providers(), &[Gemini, Groq]);
}

#[test]
fn test_environment_variable_scenarios() {
    struct EnvTestCase {
        llm_order: Option<&'static str>,
        secrets: &'static str,
        expected_order: Vec<LLMProviderType>,
        description: &'static str,
    }

    let test_cases = vec![
        EnvTestCase {
            llm_order: None,
            secrets: "",
            expected_order: vec![Groq, Gemini],
            description: "Nothing set",
        },
        EnvTestCase {
            llm_order: Some("gemini"),
            secrets: "LLM_ORDER = \"groq\"",
            expected_order: vec![Gemini],
            description: "Environment wins over secrets",
        },
        EnvTestCase {
            llm_order: None,
            secrets: "LLM_ORDER = \"gemini,groq\"",
            expected_order: vec![Gemini, Groq],
            description: "Secrets used when environment is unset",
        },
        EnvTestCase {
            llm_order: Some(""),
            secrets: "LLM_ORDER = \"gemini\"",
            expected_order: vec![Gemini],
            description: "Empty environment value falls through to secrets",
        },
        EnvTestCase {
            llm_order: Some("mistral"),
            secrets: "",
            expected_order: vec![Groq, Gemini],
            description: "Only unknown providers",
        },
    ];

    for case in test_cases {
        let secrets = SecretsStore::from_toml_str(case.secrets).unwrap();
        let env = |key: &str| match key {
            "LLM_ORDER" => case.llm_order.map(str::to_string),
            _ => None,
        };

        let config = Config::from_sources(env, &secrets).unwrap();
        assert_eq!(
            config.llm.order.providers(),
            case.expected_order.as_slice(),
            "{}",
            case.description
        );
        println!("✅ {}", case.description);
    }
}

#[test]
fn test_provider_models_and_keys() {
    let env = |key: &str| match key {
        "GROQ_API_KEY" => Some("gsk-test".to_string()),
        "GEMINI_MODEL" => Some("gemini-1.5-pro".to_string()),
        _ => None,
    };

    let config = Config::from_sources(env, &SecretsStore::default()).unwrap();

    assert!(config.llm.groq.is_configured());
    assert_eq!(config.llm.groq.model_id, DEFAULT_GROQ_MODEL);
    assert_eq!(config.llm.provider(Gemini).model_id, "gemini-1.5-pro");
    assert_ne!(config.llm.provider(Gemini).model_id, DEFAULT_GEMINI_MODEL);
}

#[test]
fn test_missing_keys_are_not_a_config_error() {
    let config = Config::from_sources(|_| None, &SecretsStore::default()).unwrap();

    assert!(!config.llm.groq.is_configured());
    assert!(!config.llm.gemini.is_configured());
    assert!(config.validate().is_ok());
}
