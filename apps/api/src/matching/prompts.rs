// All LLM prompt constants for the Match Engine.

/// Keyword extraction is an extraction task, not generative writing — run it
/// at the lowest creativity setting for deterministic-leaning output.
pub const KEYWORD_TEMPERATURE: f32 = 0.0;

/// Suggestions are free-form writing; exact wording is not contractually
/// fixed, so a higher creativity setting is acceptable.
pub const SUGGESTION_TEMPERATURE: f32 = 0.7;

/// Missing-keyword prompt template. Replace `{resume}` and `{job}` before
/// sending. The contract with the model: a comma-separated list of at most
/// 10 terms, or the literal token "None" when nothing is missing.
pub const MISSING_KEYWORDS_PROMPT_TEMPLATE: &str = r#"You are an ATS keyword analyst. Compare the resume and the job description below.

List up to 10 technical skills, tools, or domain terms that appear in the job description but are absent from the resume.

Respond with ONLY a comma-separated list of the missing terms, in order of importance.
If nothing is missing, respond with exactly: None
Do not add explanations, numbering, or any other text.

Resume:
{resume}

Job Description:
{job}"#;

/// Improvement-suggestion prompt template. Replace `{resume}` and `{job}`
/// before sending. Output is free-form markdown.
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = r#"You are a resume optimization assistant. Based on the resume and job description below, suggest improvements to align the resume with the job role.

Format your suggestions as a markdown bulleted list of concrete, actionable items.

Resume:
{resume}

Job Description:
{job}

List your suggestions:"#;

/// Renders a template by substituting the resume and job placeholders.
pub fn render_prompt(template: &str, resume_text: &str, job_text: &str) -> String {
    template
        .replace("{resume}", resume_text)
        .replace("{job}", job_text)
}
