//! Prompt templates for the workshop flow

use super::context::TurnContext;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt for an ordinary participant turn
    pub fn participant_turn(ctx: &TurnContext) -> String {
        format!(
            r#"[CONTEXT]
You are: {}
You are participating in this workshop: {}
Here is the transcript so far:
{}
[/CONTEXT]
[INSTRUCTIONS]
It's your turn to contribute: ask a question, challenge something, or make a comment.
[/INSTRUCTIONS]
[GUIDANCE]
Be concise, be clear, and be authentic to your persona.
Reply with your contribution only, without prefixing your name.
[/GUIDANCE]"#,
            ctx.persona,
            ctx.workshop,
            ctx.transcript_block()
        )
    }

    /// Prompt for a facilitator turn opened by the engine
    ///
    /// `opening` carries the caller's opening text on the first turn.
    pub fn facilitator_turn(ctx: &TurnContext, opening: Option<&str>) -> String {
        let mut prompt = format!(
            r#"[CONTEXT]
You are the workshop facilitator: {}
Here are the workshop details: {}
Here is the transcript so far:
{}
[/CONTEXT]
[INSTRUCTIONS]
Review the transcript and the goals.
Use your skill to ask open-ended questions to keep the conversation flowing."#,
            ctx.persona,
            ctx.workshop,
            ctx.transcript_block()
        );
        if let Some(opening) = opening {
            prompt.push_str(&format!("\nOpen the session based on this: '{}'", opening));
        }
        prompt.push_str(
            r#"
[/INSTRUCTIONS]
[GUIDANCE]
Be concise, be clear, and be authentic to your persona.
[/GUIDANCE]"#,
        );
        prompt
    }

    /// Prompt for the facilitator delivering caller-supplied text
    pub fn facilitator_say(ctx: &TurnContext, content: &str) -> String {
        format!(
            r#"[CONTEXT]
You are participating in a workshop as facilitator: {}
Here are the workshop details: {}
Here is the transcript so far:
{}
[/CONTEXT]
[INSTRUCTIONS]
Say this '{}' in your voice.
[/INSTRUCTIONS]
[GUIDANCE]
Be concise, be clear, and be authentic to your persona.
[/GUIDANCE]"#,
            ctx.persona,
            ctx.workshop,
            ctx.transcript_block(),
            content
        )
    }

    /// System message for next-speaker suggestion
    pub fn next_speaker_system() -> &'static str {
        "You analyse conversations and provide a single name."
    }

    /// Prompt asking the provider who should speak next
    pub fn next_speaker(
        workshop: &str,
        transcript: &[String],
        candidates: &[String],
        previous: Option<&str>,
        facilitator: Option<&str>,
    ) -> String {
        let transcript = if transcript.is_empty() {
            "(no contributions yet)".to_string()
        } else {
            transcript.join("\n")
        };
        let mut constraints = vec![
            format!(
                "- Suggested participant must be one of: {}",
                candidates.join(", ")
            ),
        ];
        if let Some(previous) = previous {
            constraints.push(format!(
                "- Suggested participant must not be the previous speaker ({})",
                previous
            ));
        }
        if let Some(facilitator) = facilitator {
            constraints.push(format!(
                "- Suggested participant must not be the facilitator ({})",
                facilitator
            ));
        }
        constraints.push("- Only respond in the format: 'Next speaker: Participant Name'".into());
        constraints.push("- Any other response format will fail.".into());

        format!(
            r#"[CONTEXT]
You are an AI assistant helping to manage a workshop. Here are the workshop details: {}
Here is the transcript so far:
{}
[/CONTEXT]
[INSTRUCTIONS]
Based on the conversation flow and content, suggest which participant should speak next.
Consider factors like:
- Who was asked a direct question
- Who might have relevant expertise for the current topic
- Who hasn't spoken in a while
[/INSTRUCTIONS]
[CONSTRAINTS]
{}
[/CONSTRAINTS]"#,
            workshop,
            transcript,
            constraints.join("\n")
        )
    }

    /// System message for transcript compression
    pub fn summarize_system() -> &'static str {
        "You are a summarizer, you compress text."
    }

    /// Prompt asking the provider to compress the transcript
    pub fn summarize(transcript: &[String]) -> String {
        format!(
            r#"[TASK]
Compress the following content, the goal is to reduce tokens, without losing information.
[/TASK]
[GUIDANCE]
Prioritise key predicates, ideas, insights, and conclusions.
Discard irrelevant information.
[/GUIDANCE]
[CONTENT]
{}
[/CONTENT]"#,
            transcript.join("\n")
        )
    }

    /// System message for the persona-compliance check
    pub fn compliance_system() -> &'static str {
        "You review workshop contributions against a fixed guidance policy and answer PASS or FAIL."
    }

    /// Prompt asking whether a contribution follows the guidance policy
    pub fn compliance(persona: &str, contribution: &str) -> String {
        format!(
            r#"[CONTEXT]
Speaker persona: {}
Contribution:
{}
[/CONTEXT]
[POLICY]
- The speaker stays in persona.
- The reply is a single contribution by this speaker only, not a script for several people.
- The reply does not break the workshop frame (no mention of being an AI, prompts or instructions).
[/POLICY]
[INSTRUCTIONS]
Answer with 'PASS' if the contribution follows every policy line.
Otherwise answer with 'FAIL: <short reason>'.
[/INSTRUCTIONS]"#,
            persona, contribution
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> TurnContext {
        TurnContext::new(
            json!({"name": "Ann", "role": "Dev"}),
            r#"{"name":"Retro"}"#,
            vec!["Host (F): Welcome".to_string()],
        )
    }

    #[test]
    fn test_participant_turn_includes_context() {
        let prompt = PromptTemplate::participant_turn(&ctx());
        assert!(prompt.contains("\"name\":\"Ann\""));
        assert!(prompt.contains("Retro"));
        assert!(prompt.contains("Host (F): Welcome"));
    }

    #[test]
    fn test_facilitator_turn_opening() {
        let with = PromptTemplate::facilitator_turn(&ctx(), Some("Talk about wins"));
        assert!(with.contains("Talk about wins"));
        let without = PromptTemplate::facilitator_turn(&ctx(), None);
        assert!(!without.contains("Open the session"));
    }

    #[test]
    fn test_say_quotes_content() {
        let prompt = PromptTemplate::facilitator_say(&ctx(), "Let's take a break");
        assert!(prompt.contains("Say this 'Let's take a break' in your voice."));
    }

    #[test]
    fn test_next_speaker_constraints() {
        let prompt = PromptTemplate::next_speaker(
            "{}",
            &[],
            &["Ann".into(), "Bob".into()],
            Some("Ann"),
            Some("Host"),
        );
        assert!(prompt.contains("must be one of: Ann, Bob"));
        assert!(prompt.contains("previous speaker (Ann)"));
        assert!(prompt.contains("facilitator (Host)"));
        assert!(prompt.contains("'Next speaker: Participant Name'"));
    }

    #[test]
    fn test_summarize_embeds_transcript() {
        let prompt = PromptTemplate::summarize(&["Ann: one".into(), "Bob: two".into()]);
        assert!(prompt.contains("Ann: one\nBob: two"));
    }

    #[test]
    fn test_compliance_prompt() {
        let prompt = PromptTemplate::compliance("Ann, Dev", "I agree.");
        assert!(prompt.contains("Ann, Dev"));
        assert!(prompt.contains("FAIL: <short reason>"));
    }
}
