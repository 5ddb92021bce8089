// Career-guidance chat. Free-text answers, no structured parsing.

pub mod handlers;
pub mod prompts;
