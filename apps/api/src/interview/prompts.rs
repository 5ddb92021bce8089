// All LLM prompt constants for the interview module.
// Reuses the JSON-only instruction from llm_client::prompts.

/// MCQ prompt template. Replace `{subject}` and `{json_only}` before sending.
pub const MCQ_PROMPT_TEMPLATE: &str = r#"You are an expert technical interviewer. Generate exactly 10 multiple choice questions about "{subject}" suitable for technical interviews.

Requirements:
- Questions should be practical and relevant to real-world scenarios
- Each question must have exactly 4 options
- Only one option should be correct
- Include a brief explanation for the correct answer
- Mix difficulty levels: 3 easy, 4 medium, 3 hard
- Focus on concepts, best practices, and problem-solving

{json_only}
[
  {
    "id": 1,
    "question": "Question text here?",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correct": 0,
    "explanation": "Brief explanation why this is correct",
    "difficulty": "easy"
  }
]

Subject: {subject}"#;

/// Study material prompt template. Replace `{subject}` and `{json_only}` before sending.
pub const STUDY_PROMPT_TEMPLATE: &str = r#"You are an expert technical educator. Create comprehensive study material about "{subject}" for technical interview preparation.

Generate exactly 5 important topics with detailed explanations that cover:
1. Core concepts and fundamentals
2. Key advantages and use cases
3. Common interview questions
4. Best practices and real-world applications

{json_only}
[
  {
    "id": 1,
    "question": "Topic/Question title",
    "answer": "Detailed explanation with multiple paragraphs. Use bullet points with • symbol for lists. Include practical examples and make it comprehensive and easy to understand."
  }
]

Subject: {subject}"#;
