// Resume Generation: the AI seam (`ResumeAi`), its prompts, input and
// response validation, and the handlers that drive it.
// All provider calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
