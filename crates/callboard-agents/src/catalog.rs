//! Voice and model option lists offered by the profile form.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoiceOption {
    pub id: &'static str,
    pub name: &'static str,
    pub gender: &'static str,
    pub accent: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn voice(
    id: &'static str,
    gender: &'static str,
    accent: &'static str,
    name: &'static str,
) -> VoiceOption {
    VoiceOption {
        id,
        name,
        gender,
        accent,
    }
}

const fn model(id: &'static str, name: &'static str, description: &'static str) -> ModelOption {
    ModelOption {
        id,
        name,
        description,
    }
}

const VAPI_VOICES: &[VoiceOption] = &[
    voice("Elliot", "male", "American", "Elliot"),
    voice("Kylie", "female", "American", "Kylie"),
    voice("Rohan", "male", "British", "Rohan"),
    voice("Lily", "female", "British", "Lily"),
    voice("Savannah", "female", "American", "Savannah"),
    voice("Hana", "female", "Asian", "Hana"),
    voice("Neha", "female", "Indian", "Neha"),
    voice("Cole", "male", "American", "Cole"),
    voice("Harry", "male", "British", "Harry"),
    voice("Paige", "female", "American", "Paige"),
];

const ELEVENLABS_VOICES: &[VoiceOption] = &[
    voice("rachel", "female", "American", "Rachel"),
    voice("domi", "female", "American", "Domi"),
    voice("bella", "female", "American", "Bella"),
    voice("antoni", "male", "American", "Antoni"),
    voice("josh", "male", "American", "Josh"),
    voice("adam", "male", "American", "Adam"),
];

const OPENAI_VOICES: &[VoiceOption] = &[
    voice("alloy", "neutral", "American", "Alloy"),
    voice("echo", "male", "American", "Echo"),
    voice("fable", "male", "British", "Fable"),
    voice("onyx", "male", "American", "Onyx"),
    voice("nova", "female", "American", "Nova"),
    voice("shimmer", "female", "American", "Shimmer"),
];

const OPENAI_MODELS: &[ModelOption] = &[
    model("gpt-4o", "GPT-4 Optimized", "Most capable model, best for complex tasks"),
    model("gpt-4-turbo", "GPT-4 Turbo", "Fast and capable"),
    model("gpt-3.5-turbo", "GPT-3.5 Turbo", "Fast and cost-effective"),
];

const ANTHROPIC_MODELS: &[ModelOption] = &[
    model("claude-3-opus-20240229", "Claude 3 Opus", "Most capable Claude model"),
    model("claude-3-sonnet-20240229", "Claude 3 Sonnet", "Balanced performance"),
    model("claude-3-haiku-20240307", "Claude 3 Haiku", "Fast and efficient"),
];

const GOOGLE_MODELS: &[ModelOption] = &[
    model("gemini-pro", "Gemini Pro", "Google's advanced model"),
    model("gemini-pro-vision", "Gemini Pro Vision", "Multimodal capabilities"),
];

const GROQ_MODELS: &[ModelOption] = &[
    model("llama2-70b-4096", "Llama 2 70B", "Open source, powerful"),
    model("mixtral-8x7b-32768", "Mixtral 8x7B", "Fast inference"),
];

/// Known voices keyed by voice provider slug.
pub fn voice_options() -> &'static [(&'static str, &'static [VoiceOption])] {
    &[
        ("vapi", VAPI_VOICES),
        ("11labs", ELEVENLABS_VOICES),
        ("openai", OPENAI_VOICES),
    ]
}

/// Known models keyed by model provider slug.
pub fn model_options() -> &'static [(&'static str, &'static [ModelOption])] {
    &[
        ("openai", OPENAI_MODELS),
        ("anthropic", ANTHROPIC_MODELS),
        ("google", GOOGLE_MODELS),
        ("groq", GROQ_MODELS),
    ]
}
