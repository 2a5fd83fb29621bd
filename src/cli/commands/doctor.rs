//! Doctor command - verify system requirements and configuration.

use crate::config::Settings;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
struct CheckResult {
    name: String,
    ok: bool,
    message: String,
    hint: Option<String>,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            ok: true,
            message: message.to_string(),
            hint: None,
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            ok: false,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = if self.ok {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);
        if let Some(hint) = &self.hint {
            println!("      {}", style(hint).dim());
        }
    }
}

/// Run the doctor command.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    println!("\n{}\n", style("Dishscout system check").bold().underlined());

    let checks = vec![
        check_api_key(),
        check_config_file(),
        CheckResult::ok("Model", &settings.model.model),
        CheckResult::ok("Search", &settings.search.base_url),
    ];

    let mut failures = 0;
    for check in &checks {
        check.print();
        if !check.ok {
            failures += 1;
        }
    }

    println!();
    if failures == 0 {
        println!("{}", style("All checks passed.").green());
        Ok(())
    } else {
        println!("{}", style(format!("{} check(s) failed.", failures)).red());
        anyhow::bail!("system check failed")
    }
}

fn check_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => CheckResult::ok("OPENAI_API_KEY", "set"),
        _ => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "export OPENAI_API_KEY='sk-...'",
        ),
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("Config file", &path.display().to_string())
    } else {
        CheckResult::ok("Config file", "not present (using defaults)")
    }
}
