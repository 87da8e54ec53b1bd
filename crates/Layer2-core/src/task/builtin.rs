//! 내장 Task

use super::context::TaskContext;
use super::definition::TaskDefinition;
use serde_json::{json, Value};

/// 사용자/플러그인 Task보다 먼저 등록되는 Task
pub fn builtin_tasks() -> Vec<TaskDefinition> {
    vec![config_task(), networks_task(), plugins_task()]
}

fn config_task() -> TaskDefinition {
    TaskDefinition::new(
        "config",
        "Print the resolved configuration",
        |ctx: TaskContext| async move {
            let value = ctx.config.to_json();
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(value)
        },
    )
}

fn networks_task() -> TaskDefinition {
    TaskDefinition::new(
        "networks",
        "List configured networks",
        |ctx: TaskContext| async move {
            let networks = &ctx.config.settings.networks;
            if networks.is_empty() {
                println!("No networks configured (using {})", ctx.network_name);
            }

            for (name, network) in networks {
                let marker = if *name == ctx.network_name { "*" } else { " " };
                let url = network.url.as_deref().unwrap_or("-");
                println!("{} {:<16} {}", marker, name, url);
            }

            Ok(json!({
                "selected": ctx.network_name,
                "networks": networks.keys().collect::<Vec<_>>(),
            }))
        },
    )
}

fn plugins_task() -> TaskDefinition {
    TaskDefinition::new(
        "plugins",
        "List resolved plugins in load order",
        |ctx: TaskContext| async move {
            for plugin in &ctx.config.plugins {
                match &plugin.package {
                    Some(package) => println!("{} ({})", plugin.id, package),
                    None => println!("{}", plugin.id),
                }
            }
            Ok(Value::from(ctx.config.plugin_ids()))
        },
    )
}
