//! `:layout` subcommands.
//!
//! Loading creates zones through the shared creation path and keeps
//! going when an individual zone fails (a PTY that cannot spawn, a port
//! in use); the summary reports what stuck.

use crate::app::App;
use crate::commands::{tail_after, CommandResult};
use crate::layouts::{Layout, LayoutCursor};
use crate::project::ZoneDescriptor;

pub fn run(app: &mut App, args: &[&str], rest: &str) -> CommandResult {
    let Some(subcmd) = args.first() else {
        return CommandResult::error(
            "Usage: layout list | load NAME [--clear] | save NAME [DESC] | delete NAME | info NAME",
        );
    };
    let args = &args[1..];
    match subcmd.to_ascii_lowercase().as_str() {
        "list" => cmd_list(app),
        "load" => cmd_load(app, args),
        "save" => cmd_save(app, args, rest),
        "delete" => cmd_delete(app, args),
        "info" => cmd_info(app, args),
        other => CommandResult::error(format!("Unknown layout subcommand: {other}")),
    }
}

fn cmd_list(app: &App) -> CommandResult {
    let layouts = app.layouts.list();
    if layouts.is_empty() {
        return CommandResult::ok("No layouts saved");
    }
    let lines: Vec<String> = layouts
        .into_iter()
        .map(|(name, description)| {
            if description.is_empty() {
                name
            } else {
                format!("{name} - {description}")
            }
        })
        .collect();
    CommandResult::ok(lines.join("\n"))
}

/// Create every zone a layout describes. Returns `(created, failures)`.
pub fn apply_layout(app: &mut App, layout: &Layout) -> (usize, Vec<String>) {
    let mut created = 0usize;
    let mut failures = Vec::new();
    for descriptor in &layout.zones {
        let config = match descriptor.config.clone().into_config() {
            Ok(config) => config,
            Err(err) => {
                failures.push(format!("{}: {err}", descriptor.name));
                continue;
            }
        };
        let result = super::zone::create_zone(
            app,
            &descriptor.name,
            descriptor.x,
            descriptor.y,
            descriptor.width,
            descriptor.height,
            config,
            descriptor.bookmark,
            descriptor.description.clone(),
        );
        match result {
            Ok(()) => created += 1,
            Err(err) => failures.push(format!("{}: {err}", descriptor.name)),
        }
    }
    if let Some(cursor) = &layout.cursor {
        app.viewport.set_cursor(cursor.x, cursor.y);
        app.viewport.center_on_cursor();
    }
    (created, failures)
}

fn cmd_load(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first().filter(|arg| !arg.starts_with("--")) else {
        return CommandResult::error("Usage: layout load NAME [--clear]");
    };
    let clear = args.contains(&"--clear");
    let layout = match app.layouts.load(name) {
        Ok(layout) => layout,
        Err(err) => return CommandResult::error(err),
    };

    if clear {
        let names = app.zones.names();
        for existing in names {
            let _ = app.delete_zone(&existing);
        }
    }

    let (created, failures) = apply_layout(app, &layout);
    app.project.mark_dirty();
    if failures.is_empty() {
        CommandResult::ok(format!("Loaded layout '{name}': {created} zones"))
    } else {
        CommandResult::ok(format!(
            "Loaded layout '{name}': {created} zones, {} failed ({})",
            failures.len(),
            failures.join("; ")
        ))
    }
}

fn cmd_save(app: &mut App, args: &[&str], rest: &str) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: layout save NAME [DESC]");
    };
    let description = tail_after(rest, 2).to_string();
    let layout = Layout {
        name: name.to_string(),
        description,
        cursor: Some(LayoutCursor {
            x: app.viewport.cursor.x,
            y: app.viewport.cursor.y,
        }),
        zones: app.zones.iter().map(ZoneDescriptor::from_zone).collect(),
    };
    match app.layouts.save(&layout) {
        Ok(path) => CommandResult::ok(format!(
            "Saved layout '{name}' ({} zones) to {}",
            layout.zones.len(),
            path.display()
        )),
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_delete(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: layout delete NAME");
    };
    match app.layouts.delete(name) {
        Ok(()) => CommandResult::ok(format!("Deleted layout '{name}'")),
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_info(app: &App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: layout info NAME");
    };
    match app.layouts.load(name) {
        Ok(layout) => {
            let zones: Vec<String> = layout
                .zones
                .iter()
                .map(|z| format!("  {} ({},{}) {}x{}", z.name, z.x, z.y, z.width, z.height))
                .collect();
            let mut message = format!("Layout '{}': {} zones", layout.name, layout.zones.len());
            if !layout.description.is_empty() {
                message.push_str(&format!(" - {}", layout.description));
            }
            if !zones.is_empty() {
                message.push('\n');
                message.push_str(&zones.join("\n"));
            }
            CommandResult::ok(message)
        }
        Err(err) => CommandResult::error(err),
    }
}
