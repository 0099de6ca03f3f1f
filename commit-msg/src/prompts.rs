// LLM prompt templates for commit-msg

pub const SYSTEM_PROMPT: &str = "You are an experienced software engineer who writes clear, \
concise Conventional Commit messages.";

pub fn commit_message_prompt(context: &str) -> String {
    let types = pr_title::COMMIT_TYPES.join(", ");
    format!(
        r#"Write a commit message for the staged changes below.

Requirements:
- Conventional Commit format: a type from [{types}], a colon and space, then a short imperative summary.
- Single line for simple changes; add a body separated by a blank line only when the change needs explanation.
- Describe what changed and why, not how. Stick to facts visible in the diff; do not speculate.
- Mark breaking changes with "!" before the colon or a "BREAKING CHANGE:" footer.
- No emoji, no URLs, no email addresses.

Reply in exactly this structure:

<thinking>
Brief notes on what the diff does, and a draft or two of the message.
</thinking>
<message>
type: the final commit message
</message>

Staged changes:

{context}
"#
    )
}

pub fn reformat_prompt(original_prompt: &str, previous_response: &str) -> String {
    format!(
        r#"Your previous reply did not follow the required structure. You MUST wrap your notes in <thinking> tags and the final commit message in <message> tags.

Original instructions:

{original_prompt}

Previous reply:

{previous_response}
"#
    )
}

pub fn scrub_prompt(message: &str) -> String {
    format!(
        r#"This commit message contains content that is not allowed (emoji, URLs, or email addresses). Rewrite it with the offending content removed, preserving the meaning and the Conventional Commit format. Reply with only the rewritten message, no tags and no commentary.

{message}
"#
    )
}
