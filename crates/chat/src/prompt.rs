//! Prompt text for the conversation engine and the weather chain.

use chrono::Utc;

/// Persona for ordinary conversation.
pub const PERSONA_PROMPT: &str = "\
You are a helpful and friendly chatbot named Yumi. You have a sweet and \
cheerful personality; you are confident and knowledgeable, yet modest and \
considerate. Answer the user's questions directly, and if you don't know \
something, say so. Keep answers concise.";

/// Instruction for the structured location-extraction step of the weather
/// chain. The reply must be machine-parseable.
pub const WEATHER_EXTRACT_PROMPT: &str = "\
You help with weather-related queries. Determine which city the user is \
asking about, plus the state code (US only) and the ISO 3166 country code \
when you can tell, joined by commas. If you are unsure, pick the most \
likely city. Respond with ONLY a JSON object of the form \
{\"city\": \"<city,state,country>\", \"units\": \"imperial\" | \"metric\"}. \
Default units to imperial unless the user asked for Celsius or metric.";

/// Prompt for turning a raw weather API response into a friendly report.
pub fn weather_report_prompt(api_response: &str) -> String {
    format!(
        "This is the response from api.openweathermap.org about the current \
         weather conditions:\n\n{api_response}\n\nBased on this response, \
         write a friendly weather report with relevant, fun emojis. Also \
         mention the current date and time, which is {} US Eastern Time.",
        current_eastern_time()
    )
}

/// Current time rendered in US Eastern, e.g. "Monday, June 3 2024, 04:15 PM".
fn current_eastern_time() -> String {
    Utc::now()
        .with_timezone(&chrono_tz::America::New_York)
        .format("%A, %B %-d %Y, %I:%M %p")
        .to_string()
}
