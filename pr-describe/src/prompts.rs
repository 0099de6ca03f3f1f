// LLM prompt templates for pr-describe

pub const SYSTEM_PROMPT: &str = "You are an experienced software engineer who writes clear, \
reviewer-friendly pull request descriptions.";

pub fn description_prompt(branch: &str, commits: &str, changes: &str, hint: &str) -> String {
    let types = pr_title::COMMIT_TYPES.join(", ");
    let hint_block = if hint.is_empty() {
        String::new()
    } else {
        format!("The author describes the change as: {}\n\n", hint)
    };

    format!(
        r#"Write a pull request description for the branch below.

{hint_block}Requirements:
- Start with a heading line of exactly this form:
  ## PR Title: <type>: <short imperative summary>
  where <type> is one of [{types}].
- Follow with a short markdown body: what changed, why, and anything a reviewer should look at first.
- Stick to facts visible in the commits and file changes; do not speculate.
- Keep it concise. A small change deserves a short description.

Branch: {branch}

Commits:
{commits}

File changes:
{changes}
"#
    )
}
