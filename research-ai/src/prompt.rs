//! Prompt builders shared by all providers.
//!
//! Keeping prompt text here means switching providers never changes what the
//! model is asked to do, only where the request is sent.

/// Prompt asking for statistical method recommendations for a research design.
///
/// The model is instructed to answer with a JSON object holding a
/// `recommendations` array so callers can parse it into structured records.
pub fn recommendations(context: &str) -> String {
    format!(
        r#"You are an expert in research methodology and statistics. Based on the following research context, recommend suitable analysis methods.

Research Context:
{context}

Provide recommendations as JSON with the following structure:
{{
  "recommendations": [
    {{
      "method": "name of the analysis method",
      "category": "descriptive/inferential/correlation/regression",
      "reasoning": "why this method fits",
      "priority": 1,
      "assumptions": "assumptions that must hold"
    }}
  ]
}}

Provide at least 3-5 relevant method recommendations, ordered by priority."#
    )
}

/// Prompt asking for a plain-language interpretation of analysis output.
pub fn interpretation(method: &str, results: &str) -> String {
    format!(
        r#"You are a research statistician. Interpret the following analysis results in plain language.

Analysis Method: {method}
Results: {results}

Provide the interpretation as JSON:
{{
  "interpretation": "explanation of the results in simple terms",
  "effect_size": "effect size interpretation if applicable",
  "practical_implications": "practical implications of the results",
  "conclusion": "conclusion with respect to the research hypothesis/goals"
}}"#
    )
}

/// Prompt asking for a comprehensive project-level research summary.
pub fn research_summary(analysis_context: &str) -> String {
    format!(
        r#"You are an experienced academic writer. Write a comprehensive summary of the following research analysis session.

{analysis_context}

Provide the summary as JSON:
{{
  "executive_summary": "2-3 paragraph executive summary",
  "key_findings": ["key finding 1", "key finding 2", ...],
  "methodology_notes": "notes on the methodology used",
  "limitations": ["limitation 1", "limitation 2", ...],
  "future_recommendations": ["recommendations for follow-up research"]
}}"#
    )
}

/// Prompt asking the model to rework an earlier analysis summary.
pub fn refinement(instructions: &str, original_summary: &str) -> String {
    format!(
        "Please refine the following analysis based on these instructions:\n\n\
         Instructions: {instructions}\n\n\
         Original Analysis: {original_summary}\n\n\
         Please provide a refined version that addresses the instructions."
    )
}
