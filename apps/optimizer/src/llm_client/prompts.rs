// Prompt fragments shared by every JSON-producing call.
// Each feature keeps its own prompts.rs next to the code that sends them.

/// System prompt suffix that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Shape of `optimizedResume` / a revised resume, shown to the model verbatim.
pub const RESUME_JSON_SHAPE: &str = r#"{
  "contactInfo": {"name": "", "email": "", "phone": "", "linkedin": ""},
  "summary": "",
  "skills": [""],
  "experience": [{"role": "", "company": "", "dates": "", "description": [""]}],
  "projects": [{"name": "", "description": [""]}],
  "education": [{"institution": "", "degree": "", "dates": ""}],
  "certifications": [{"name": "", "authority": "", "date": ""}],
  "extraCourses": [{"name": "", "institution": "", "dates": ""}],
  "languages": [""]
}"#;
