// LLM prompt templates for pr-summary

pub const SYSTEM_PROMPT: &str = "You are an experienced engineering manager who writes accurate, \
specific performance review material.";

pub fn summary_prompt(author: &str, since: &str, until: &str, prs: &str) -> String {
    format!(
        r#"Below is the list of pull requests {author} merged between {since} and {until}.

Write performance-review prose summarizing this body of work:
- Group related PRs into themes rather than listing them one by one.
- Lead each theme with the impact, then the supporting work.
- Use plain, specific language; no superlatives the PRs don't support.
- Mention rough scale (number of PRs, breadth of areas) once.
- Write in third person, 3-6 paragraphs.

Merged pull requests:

{prs}
"#
    )
}
