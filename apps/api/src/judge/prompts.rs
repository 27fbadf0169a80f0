// Prompt for the appeal judge. Reuses the JSON-only system fragment from llm_client.

/// Builds the judging prompt. Both inputs are embedded verbatim, in one pass,
/// so neither can expand placeholders inside the other.
pub fn build_judge_prompt(ban_reason: &str, appeal_text: &str) -> String {
    format!(
        r#"You are the "Ban Appeal Judge". A user has been banned and is appealing.

Ban Reason: "{ban_reason}"
Appeal Text: "{appeal_text}"

Analyze this appeal. The "Copium Index" measures how much the person is coping/making excuses vs being genuine.

Look for:
1. AI Writing (Does it sound like ChatGPT wrote it?) → HIGH COPIUM
2. Blame Shifting ("my brother did it", "I was hacked") → HIGH COPIUM
3. Emotional Manipulation (guilt-tripping, playing victim) → HIGH COPIUM
4. Clichés ("I have learned my lesson") → HIGH COPIUM
5. Taking Real Responsibility → LOW COPIUM
6. Specific acknowledgment of wrongdoing → LOW COPIUM

Return a JSON response strictly in this format:
{{
  "verdict": "DENIED" or "GRANTED",
  "copiumIndex": number (0-100, where 100 = maximum cope/excuses, 0 = completely genuine),
  "redFlag": "If DENIED: quote the most cope-filled/suspicious part. If GRANTED: quote the most genuine part",
  "reasoning": "2-3 sentence explanation of your verdict",
  "styles": ["List applicable flags like: AI Written, Blame Shifter, Manipulative, Cliché Abuser, Takes Responsibility, Genuinely Remorseful, Maximum Cope"]
}}

GUIDELINES:
- Copium 70%+ = DENIED (too much cope)
- Copium 40-70% = borderline, use judgment
- Copium below 40% = likely GRANTED (genuine)
- "My brother/sister/friend did it" = instant 80%+ copium
- Taking full responsibility with specifics = 20-30% copium

ONLY return valid JSON, nothing else."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_inputs_verbatim() {
        let prompt = build_judge_prompt("Spamming \"links\"", "I'm sorry {appeal_text}");
        assert!(prompt.contains("Ban Reason: \"Spamming \"links\"\""));
        assert!(prompt.contains("Appeal Text: \"I'm sorry {appeal_text}\""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_judge_prompt("a", "b"),
            build_judge_prompt("a", "b")
        );
    }

    #[test]
    fn test_prompt_carries_schema_and_guidelines() {
        let prompt = build_judge_prompt("a", "b");
        for key in ["\"verdict\"", "\"copiumIndex\"", "\"redFlag\"", "\"reasoning\"", "\"styles\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Copium 70%+ = DENIED"));
        assert!(prompt.trim_end().ends_with("ONLY return valid JSON, nothing else."));
    }
}
