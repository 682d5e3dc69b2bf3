//! Built-in agent templates.

use callboard_types::{AgentCategory, AgentProfile, AgentTemplate, ModelConfig, VoiceConfig};
use once_cell::sync::Lazy;

struct Seed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    category: AgentCategory,
    first_message: &'static str,
    duties: &'static [&'static str],
    preamble: &'static str,
    model: (&'static str, &'static str, f32),
    voice: (&'static str, &'static str, f32),
}

impl Seed {
    fn build(&self) -> AgentTemplate {
        let mut prompt = String::from(self.preamble);
        for duty in self.duties {
            prompt.push_str("\n- ");
            prompt.push_str(duty);
        }

        let (provider, model, temperature) = self.model;
        let (voice_provider, voice_id, speed) = self.voice;

        AgentTemplate {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            category: self.category,
            config: AgentProfile {
                name: self.name.to_string(),
                description: Some(self.description.to_string()),
                first_message: Some(self.first_message.to_string()),
                system_prompt: prompt,
                model: ModelConfig {
                    provider: provider.to_string(),
                    model: model.to_string(),
                    temperature: Some(temperature),
                    ..ModelConfig::default()
                },
                voice: VoiceConfig {
                    provider: voice_provider.to_string(),
                    voice_id: voice_id.to_string(),
                    speed: Some(speed),
                    ..VoiceConfig::default()
                },
                ..AgentProfile::default()
            },
        }
    }
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "customer-support",
        name: "Customer Support Agent",
        description: "Professional support agent for handling customer inquiries and issues",
        icon: "🎧",
        category: AgentCategory::CustomerService,
        first_message: "Hello! Welcome to our customer support. How can I assist you today?",
        preamble: "You are a professional customer support agent. Your role is to:",
        duties: &[
            "Listen carefully to customer concerns",
            "Provide helpful and accurate information",
            "Be empathetic and patient",
            "Resolve issues efficiently",
            "Escalate when necessary",
            "Always maintain a friendly and professional tone",
        ],
        model: ("openai", "gpt-3.5-turbo", 0.7),
        voice: ("vapi", "Savannah", 1.0),
    },
    Seed {
        id: "technical-support",
        name: "Technical Support Specialist",
        description: "Expert technical support for troubleshooting and problem-solving",
        icon: "🔧",
        category: AgentCategory::CustomerService,
        first_message:
            "Hello! I'm here to help you with any technical issues. What seems to be the problem?",
        preamble: "You are a knowledgeable technical support specialist. Your responsibilities include:",
        duties: &[
            "Diagnosing technical issues systematically",
            "Providing step-by-step troubleshooting guidance",
            "Explaining technical concepts in simple terms",
            "Being patient with non-technical users",
            "Suggesting preventive measures",
        ],
        model: ("openai", "gpt-4-turbo", 0.5),
        voice: ("vapi", "Cole", 0.95),
    },
    Seed {
        id: "sales-representative",
        name: "Sales Representative",
        description: "Engaging sales agent for product inquiries and purchases",
        icon: "💼",
        category: AgentCategory::Sales,
        first_message: "Hi there! Thanks for your interest in our products. What brings you here today?",
        preamble: "You are an enthusiastic and knowledgeable sales representative. Your approach should:",
        duties: &[
            "Build rapport with customers",
            "Understand their needs through active listening",
            "Present product benefits that match their needs",
            "Handle objections professionally",
            "Be persuasive but not pushy",
            "Always be honest about product capabilities",
        ],
        model: ("openai", "gpt-3.5-turbo", 0.8),
        voice: ("11labs", "rachel", 1.05),
    },
    Seed {
        id: "appointment-scheduler",
        name: "Appointment Scheduler",
        description: "Efficient agent for booking and managing appointments",
        icon: "📅",
        category: AgentCategory::Sales,
        first_message: "Hello! I'm here to help you schedule an appointment. What type of appointment would you like to book?",
        preamble: "You are an efficient appointment scheduling assistant. Your tasks include:",
        duties: &[
            "Gathering necessary appointment information",
            "Offering suitable time slots",
            "Confirming appointment details",
            "Being flexible with rescheduling needs",
        ],
        model: ("openai", "gpt-3.5-turbo", 0.6),
        voice: ("vapi", "Lily", 1.0),
    },
    Seed {
        id: "healthcare-assistant",
        name: "Healthcare Assistant",
        description: "Compassionate assistant for healthcare inquiries and support",
        icon: "🏥",
        category: AgentCategory::Healthcare,
        first_message: "Hello, I'm your healthcare assistant. How can I help you with your health-related questions today?",
        preamble: "You are a compassionate healthcare assistant. Remember to:",
        duties: &[
            "Never provide medical diagnoses",
            "Encourage consulting with healthcare professionals",
            "Provide general health information",
            "Respect privacy and confidentiality",
            "Always err on the side of caution",
        ],
        model: ("openai", "gpt-4-turbo", 0.5),
        voice: ("vapi", "Neha", 0.95),
    },
    Seed {
        id: "tutor",
        name: "Personal Tutor",
        description: "Patient educator for personalized learning assistance",
        icon: "📚",
        category: AgentCategory::Education,
        first_message: "Hi! I'm your personal tutor. What subject would you like to work on today?",
        preamble: "You are a patient and knowledgeable tutor. Your teaching style should:",
        duties: &[
            "Adapt to the student's learning pace",
            "Break down complex concepts",
            "Use examples and analogies",
            "Check understanding regularly",
            "Celebrate progress",
        ],
        model: ("openai", "gpt-4-turbo", 0.7),
        voice: ("vapi", "Rohan", 0.95),
    },
    Seed {
        id: "personal-assistant",
        name: "Personal Assistant",
        description: "Helpful assistant for daily tasks and organization",
        icon: "🤖",
        category: AgentCategory::Personal,
        first_message: "Hello! I'm your personal assistant. How can I help you today?",
        preamble: "You are a highly capable personal assistant. Your role involves:",
        duties: &[
            "Managing schedules and reminders",
            "Helping with task organization",
            "Being proactive with suggestions",
            "Maintaining privacy and discretion",
        ],
        model: ("openai", "gpt-3.5-turbo", 0.7),
        voice: ("vapi", "Elliot", 1.0),
    },
    Seed {
        id: "business-consultant",
        name: "Business Consultant",
        description: "Strategic advisor for business insights and solutions",
        icon: "📊",
        category: AgentCategory::Business,
        first_message: "Good day! I'm here to help with your business challenges. What aspect of your business would you like to discuss?",
        preamble: "You are an experienced business consultant. Your expertise includes:",
        duties: &[
            "Analyzing business challenges",
            "Providing strategic recommendations",
            "Identifying growth opportunities",
            "Maintaining professionalism and confidentiality",
        ],
        model: ("openai", "gpt-4o", 0.6),
        voice: ("vapi", "Harry", 1.0),
    },
];

static TEMPLATES: Lazy<Vec<AgentTemplate>> = Lazy::new(|| SEEDS.iter().map(Seed::build).collect());

/// All built-in templates, in catalog order.
pub fn templates() -> &'static [AgentTemplate] {
    &TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static AgentTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn templates_in(category: AgentCategory) -> impl Iterator<Item = &'static AgentTemplate> {
    TEMPLATES.iter().filter(move |t| t.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_is_a_valid_profile() {
        for template in templates() {
            assert!(
                template.config.validate().is_ok(),
                "template {} should validate",
                template.id
            );
            assert!(template.config.id.is_empty());
        }
    }

    #[test]
    fn template_ids_are_unique() {
        let mut ids: Vec<_> = templates().iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), templates().len());
    }

    #[test]
    fn prompt_lists_duties() {
        let support = find_template("customer-support").unwrap();
        assert!(support
            .config
            .system_prompt
            .starts_with("You are a professional customer support agent."));
        assert!(support.config.system_prompt.contains("\n- Escalate when necessary"));
    }

    #[test]
    fn filter_by_category() {
        let sales: Vec<_> = templates_in(AgentCategory::Sales).map(|t| t.id.as_str()).collect();
        assert_eq!(sales, vec!["sales-representative", "appointment-scheduler"]);
        assert!(find_template("nope").is_none());
    }
}
