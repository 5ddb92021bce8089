// Mock-interview content: multiple-choice questions and study material.
// All model calls go through the TextGenerator seam; answers through the normalizer.

pub mod generator;
pub mod handlers;
pub mod prompts;
