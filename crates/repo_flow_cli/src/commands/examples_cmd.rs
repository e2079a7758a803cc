use colored::Colorize;
use repo_flow_core::{ExampleRepository, EXAMPLE_REPOSITORIES};

#[cfg(test)]
#[path = "examples_cmd_tests.rs"]
mod tests;

/// Lists the sample repositories that can be analyzed without a token.
pub fn render_examples() -> String {
    format_examples(&EXAMPLE_REPOSITORIES)
}

fn format_examples(examples: &[ExampleRepository]) -> String {
    let mut output = format!("\n{}\n\n", "Example repositories".bold());

    for example in examples {
        output.push_str(&format!("  {}\n", example.title.bold().bright_cyan()));
        output.push_str(&format!("    {}\n", example.description));
        output.push_str(&format!("    {}\n\n", example.url.dimmed()));
    }

    output.push_str(&format!(
        "Run {} to analyze one.\n",
        "repo-flow analyze <URL>".green()
    ));
    output
}
