use anyhow::bail;

use crate::asana::Task;

/// Build the single-line label for a task:
/// `✓ <name> / <parent name> (<project name>)`, with every part after the
/// name optional. Only the first membership's project is shown; additional
/// memberships are ignored (known limitation, kept as observed).
pub fn format_task_label(task: &Task) -> anyhow::Result<String> {
    let mut membership = String::new();

    if let Some(parent) = &task.parent {
        let Some(parent_name) = parent.name.as_deref() else {
            bail!("task parent name required to format");
        };
        membership.push_str(&format!(" / {parent_name}"));
    }

    if let Some(project) = task.memberships.first().and_then(|m| m.project.as_ref()) {
        membership.push_str(&format!(" ({})", project.name));
    }

    let Some(name) = task.name.as_deref() else {
        bail!("task name required to format");
    };

    let checkmark = if task.completed { "✓ " } else { "" };
    Ok(format!("{checkmark}{name}{membership}"))
}

/// Escape text for an XML-styled description surface (the browser omnibox).
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
