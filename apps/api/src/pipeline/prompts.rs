// All LLM prompt constants and builders for the review pipeline.
// Every prompt demands a strict JSON object so the gateway can parse the
// response into its typed draft.

/// System prompt for the primary rewrite call.
pub const REWRITE_SYSTEM: &str = "\
You are an expert resume coach focused on software engineering and tech internships.

You improve resume bullets so they:
- Are tailored to a specific job description
- Are concrete, quantified where honest
- Avoid exaggeration or hallucinated achievements

You must:
- Preserve factual correctness based on the original bullet and resume context.
- Explain why each change was made.
- Explain why the final bullet works better for this job.
- Perform a self-critique pass checking for hallucinations or weak claims.";

/// System prompt for the relevance-targeted refinement call.
pub const REFINE_SYSTEM: &str = "\
You are an expert resume coach specializing in improving job description relevance.

Your goal is to significantly increase how well a resume bullet matches a job description while:
- Staying truthful to the original resume content
- Emphasizing skills/experiences that directly align with JD requirements
- Using JD-specific terminology and keywords naturally
- Making the connection to JD requirements more explicit and clear";

/// System prompt for the dedicated fact-check pass.
pub const CRITIQUE_SYSTEM: &str = "\
You are a rigorous fact-checker. You validate resume improvements against original facts \
and flag any hallucinations or exaggerations.";

/// Builds the primary rewrite prompt for one bullet.
pub fn build_rewrite_prompt(bullet: &str, resume_text: &str, job_description: &str) -> String {
    format!(
        r#"ORIGINAL BULLET:
{bullet}

FULL RESUME CONTEXT:
{resume_text}

JOB DESCRIPTION:
{job_description}

TASK:
1. Improve this bullet for this specific job.
2. Explain each change you make.
3. Explain why the final bullet is stronger for this job (relevance, clarity, impact).
4. Do a self-critique pass:
   - Check if the improved bullet is fully supported by the original resume.
   - Flag any hallucinated or exaggerated claims.
   - Suggest a safer alternative if needed.

Respond in strict JSON with this shape:
{{
  "improved": "string",
  "explanation": "string",
  "why_it_works": "string",
  "self_critique": "string"
}}"#
    )
}

/// Builds the refinement prompt that pushes a bullet toward a target
/// relevance. Percentages are rounded for readability, matching how the
/// scores are surfaced to users.
pub fn build_refine_prompt(
    current_bullet: &str,
    original_bullet: &str,
    resume_text: &str,
    job_description: &str,
    current_relevance: f64,
    target_relevance: f64,
) -> String {
    let current_pct = (current_relevance * 100.0).round() as i64;
    let target_pct = (target_relevance * 100.0).round() as i64;
    format!(
        r#"CURRENT BULLET (Relevance: {current_pct}%):
{current_bullet}

ORIGINAL BULLET:
{original_bullet}

FULL RESUME CONTEXT:
{resume_text}

JOB DESCRIPTION:
{job_description}

TASK:
This bullet currently has a {current_pct}% relevance to the job description. Your goal is to improve it to ~{target_pct}% relevance.

To increase relevance:
1. Identify key requirements, skills, and keywords from the job description
2. Find connections in the original resume that relate to those requirements
3. Rewrite the bullet to explicitly highlight those connections
4. Use terminology from the job description naturally
5. Emphasize the most relevant aspects while staying truthful to the original

IMPORTANT:
- DO NOT invent achievements or metrics not in the resume
- DO NOT exaggerate your role or impact
- DO focus on making existing relevant experiences more prominent
- DO use JD keywords naturally in context
- DO emphasize transferable skills that match JD requirements

Respond in strict JSON:
{{
  "improved": "string - the new improved bullet",
  "explanation": "string - why these changes improve JD relevance",
  "why_it_works": "string - how this version better matches JD requirements",
  "relevance_improvements": "string - specific JD requirements addressed"
}}"#
    )
}

/// Builds the fact-check prompt validating an improved bullet against the
/// resume.
pub fn build_critique_prompt(
    original_bullet: &str,
    improved_bullet: &str,
    resume_text: &str,
    job_description: &str,
) -> String {
    format!(
        r#"ORIGINAL BULLET:
{original_bullet}

IMPROVED BULLET:
{improved_bullet}

FULL RESUME CONTEXT:
{resume_text}

JOB DESCRIPTION:
{job_description}

TASK: Perform a rigorous self-critique of the improved bullet.

Check:
1. Is every claim in the improved bullet supported by the original resume?
2. Are there any hallucinated achievements, metrics, or technologies?
3. Are there any exaggerated or unsupported claims?
4. What evidence from the resume supports (or contradicts) the improved bullet?
5. Should any parts be toned down or made more accurate?

Respond in strict JSON:
{{
  "self_critique": "Detailed critique analysis",
  "is_supported_by_resume": true,
  "issues": ["list of specific issues found"],
  "evidence_snippets": ["quotes from resume that support/contradict claims"]
}}"#
    )
}
