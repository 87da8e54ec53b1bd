//! Terminal output

use kiln_core::{TaskRegistry, TaskResult};
use kiln_foundation::Error;

/// Print every registered task in registration order
pub fn task_list(registry: &TaskRegistry) {
    let width = registry
        .all_tasks()
        .iter()
        .map(|task| task.name.len())
        .max()
        .unwrap_or(0);

    println!("Available tasks:\n");
    for task in registry.all_tasks() {
        println!("  {:<width$}  {}", task.name, task.description, width = width);
    }
    println!("\nRun a task with: kiln <TASK> [-p KEY=VALUE]...");
}

/// Print a dry-run execution plan
pub fn plan(task: &str, order: &[String]) {
    println!("Execution plan for {}:", task);
    for (i, name) in order.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
}

/// Print per-task timing
pub fn results(results: &[TaskResult]) {
    for result in results {
        let mark = if result.success { "✓" } else { "✗" };
        println!("{} {} ({}ms)", mark, result.name, result.duration.as_millis());
    }
}

pub fn task_failure(result: &TaskResult) {
    eprintln!(
        "Error: task {} failed: {}",
        result.name,
        result.error.as_deref().unwrap_or("unknown error")
    );
}

/// Print a fatal error, formatted by kind
pub fn error(err: &Error) {
    eprintln!("{}", format_error(err));
}

fn format_error(err: &Error) -> String {
    match err {
        Error::UnknownTask { name, suggestions } if !suggestions.is_empty() => format!(
            "Error: unknown task '{}'\n\nDid you mean:\n{}",
            name,
            bullet_list(suggestions)
        ),
        Error::UnknownTask { name, .. } => format!(
            "Error: unknown task '{}'\nRun `kiln` without arguments to list tasks.",
            name
        ),
        Error::TaskCycle { cycle } => format!(
            "Error: circular dependency between tasks\n\n  {}",
            cycle.join(" -> ")
        ),
        Error::PluginCycle { cycle } => format!(
            "Error: circular dependency between plugins\n\n  {}",
            cycle.join(" -> ")
        ),
        Error::ConfigValidation { messages } => format!(
            "Error: invalid configuration\n\n{}",
            bullet_list(messages)
        ),
        Error::UnknownNetwork { name, available } if !available.is_empty() => format!(
            "Error: unknown network '{}'\n\nConfigured networks:\n{}",
            name,
            bullet_list(available)
        ),
        other => format!("Error: {}", other),
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_validation_message_is_printed() {
        let err = Error::ConfigValidation {
            messages: vec!["[a] first".into(), "[b] second".into()],
        };
        let text = format_error(&err);
        assert!(text.contains("  - [a] first"));
        assert!(text.contains("  - [b] second"));
    }

    #[test]
    fn test_suggestions() {
        let err = Error::unknown_task("compil", vec!["compile".into()]);
        assert!(format_error(&err).contains("Did you mean:\n  - compile"));
    }

    #[test]
    fn test_cycles_are_distinguished() {
        let cycle = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let task = format_error(&Error::TaskCycle {
            cycle: cycle.clone(),
        });
        let plugin = format_error(&Error::PluginCycle { cycle });

        assert!(task.contains("between tasks"));
        assert!(plugin.contains("between plugins"));
        assert!(task.contains("a -> b -> a"));
    }
}
