// Resume analysis against a job description. The uploaded PDF is sent to the
// model as an inline attachment and released as soon as the answer is prepared.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
