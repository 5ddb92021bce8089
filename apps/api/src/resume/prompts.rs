/// Resume analysis prompt. Replace `{job_description}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"Analyze this resume against the following job description and provide a detailed analysis:

1. **Match Percentage**: Calculate how well the resume matches the job description (0-100%)
2. **Key Skills Matched**: List the skills from the resume that match the job requirements
3. **Missing Skills**: List important skills mentioned in the job description but not found in the resume
4. **Suggestions for Improvement**: Provide specific, actionable suggestions to improve the resume

Format your response in a clear, structured way with headers and bullet points.

Job Description:
{job_description}"#;
