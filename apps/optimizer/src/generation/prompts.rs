// Prompt constants for resume generation and suggestion application.
// JSON-only output rules and the resume shape come from llm_client::prompts.

/// System prompt for both generation calls. Append `JSON_ONLY_SYSTEM`.
pub const RESUME_SYSTEM: &str = "You are a world-class solution architect and an expert \
    human resources specialist who rewrites resumes for specific roles.";

/// Resume generation prompt template.
/// Replace: {personal_details_json}, {resume_text}, {target_block}, {resume_shape}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Act as a world-class solution architect and an expert human resources specialist. Your task is to analyze the provided resume against the target role/job description and generate an optimized resume.

Here is the user's information:
- Personal Details: {personal_details_json}
- Current Resume Text:
---
{resume_text}
---
{target_block}

Based on this information, perform the following tasks and provide the output in a single, valid JSON object. Do not include any introductory text, explanations, or markdown formatting.

1.  **feedback**: Provide concise, constructive feedback. Identify exactly 3 strengths and exactly 3 areas for improvement from the original resume, as {"strengths": [...], "improvements": [...]}.
2.  **optimizedResume**: Generate the full content for a new, optimized resume.
    - **contactInfo**: Use the provided personal details.
    - **summary**: Write a new, powerful professional summary (3-5 sentences).
    - **skills**: Create a list of relevant skills based on the job description and resume.
    - **experience**: Rephrase bullet points to be action-oriented and results-driven, incorporating keywords from the job description.
    - **education**: Extract and list educational background.
    - **projects**: If present in the original resume, extract and list projects. If not, provide an empty array.
    - **certifications**, **extraCourses**, **languages**: Extract them if present, otherwise empty arrays.

The optimizedResume object MUST have this shape:
{resume_shape}"#;

/// Header of the optional target block. Followed by one or both target lines.
pub const TARGET_BLOCK_HEADER: &str = "\nHere is the target the user is applying for:";

/// Apply-suggestion prompt template.
/// Replace: {suggestion}, {resume_json}, {resume_shape}
pub const APPLY_SUGGESTION_PROMPT_TEMPLATE: &str = r#"Below is a resume in JSON form and one improvement recommended by a reviewer.

Revise the resume so that it fully addresses the improvement. Keep every fact that is already present; do not invent employers, dates, degrees or certifications. Leave sections the improvement does not concern unchanged.

IMPROVEMENT:
{suggestion}

CURRENT RESUME:
{resume_json}

Return the COMPLETE revised resume as a single JSON object with this shape:
{resume_shape}"#;
