//! Prompt text for the suggester, the feedback simulator, and the scoring
//! judge.
//!
//! Dynamic content is spliced into these templates with plain string
//! replacement; the placeholder names here are internal and unrelated to
//! the enrichment slot contract in `promptloop-core`.

/// System prompt for the suggester agent.
pub const SUGGESTER_SYSTEM: &str = "You are an expert in prompt engineering for LLMs, \
focused on optimizing prompts that enrich e-commerce product attribute sheets.";

/// User prompt template for the suggester agent.
///
/// Placeholders: `{evaluation_summary}`, `{current_prompts}`,
/// `{num_suggestions}`.
pub const SUGGESTER_TEMPLATE: &str = r#"Analyze the evaluation results below for prompts used to enrich product attribute sheets.

## Evaluation Results

{evaluation_summary}

## Current Prompts

{current_prompts}

## Your Task

Based on the results, suggest {num_suggestions} new prompt variations that would improve the scores.

For each suggestion:
1. Identify the weaknesses of the current prompts
2. Explain the rationale behind the proposed improvement (be detailed)
3. Provide the complete template of the new prompt

IMPORTANT: The templates MUST use exactly these substitution slots:
{product_name}, {category}, {description}, {brand}, {attributes}

Respond ONLY with a valid JSON array in the format:
[
    {
        "id": "prompt_vN",
        "name": "Descriptive name of the variation",
        "template": "The complete prompt template using {product_name}, {category}, {description}, {brand}, {attributes}",
        "rationale": "Detailed explanation of the rationale and proposed improvements"
    }
]"#;

/// System prompt for the feedback simulator.
pub const FEEDBACK_SYSTEM: &str = "You are an e-commerce catalog quality analyst. \
Your role is to simulate the feedback of a human reviewer checking product \
attribute sheets enriched by an AI. Be critical and realistic.";

/// User prompt template for the feedback simulator.
///
/// Placeholders: `{product_name}`, `{category}`, `{description}`,
/// `{original_attributes}`, `{expected_attributes}`, `{enriched_output}`,
/// `{prompt_name}`.
pub const FEEDBACK_TEMPLATE: &str = r#"Review the enriched attributes below for the given product.
Compare them against the expected attributes (ground truth) and the original attributes.

## Product
- Name: {product_name}
- Category: {category}
- Description: {description}

## Original attributes (input)
{original_attributes}

## Expected attributes (ground truth)
{expected_attributes}

## Attributes generated by the LLM
{enriched_output}

## Prompt used
{prompt_name}

## Your Task
For EACH generated attribute, give a verdict:
- "positive" if the attribute is correct, relevant, and well formatted
- "negative" if the attribute is incorrect, invented, irrelevant, or badly formatted

Respond ONLY with a valid JSON object in the format:
{
    "total_attributes": <int>,
    "positives": <int>,
    "negatives": <int>,
    "verdicts": [
        {
            "attribute": "<attribute name>",
            "generated_value": "<value the LLM generated>",
            "verdict": "positive" | "negative",
            "reason": "<short explanation>"
        }
    ],
    "overall_comment": "<overall assessment in 1-2 sentences>"
}"#;

/// System prompt for the scoring judge.
pub const JUDGE_SYSTEM: &str = "You are a strict evaluation judge. You score AI output \
against a single named criterion and explain your score. You never score anything \
the criterion does not cover.";

/// User prompt template for the scoring judge.
///
/// Placeholders: `{criterion_name}`, `{criterion_instructions}`,
/// `{input}`, `{actual_output}`, `{expected_block}`, `{context_block}`.
pub const JUDGE_TEMPLATE: &str = r#"Score the following test case against one criterion.

## Criterion: {criterion_name}
{criterion_instructions}

## Input prompt
{input}

## Actual output
{actual_output}
{expected_block}{context_block}
## Your Task
Return a score between 0.0 (criterion completely unmet) and 1.0 (criterion fully met),
with a short reason.

Respond ONLY with a valid JSON object in the format:
{"score": <float 0.0-1.0>, "reason": "<short explanation>"}"#;
