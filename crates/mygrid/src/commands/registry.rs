//! Command registry and metadata.

/// Specification for a single command, used for the help listing.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub usage: &'static str,
    pub description: &'static str,
}

/// Top-level command names, aliases included.
pub const TOP_LEVEL_COMMANDS: &[&str] = &[
    "quit", "q", "write", "w", "wq", "goto", "g", "origin", "pan", "clear", "rect", "line",
    "text", "fill", "grid", "mark", "delmark", "delmarks", "marks", "export", "import", "ydir",
    "yank", "paste", "clipboard", "color", "palette", "border", "search", "zone", "zones",
    "layout", "status", "help",
];

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        usage: "quit",
        description: "Exit (alias: q)",
    },
    CommandSpec {
        usage: "write [FILE]",
        description: "Save the project (alias: w); wq saves and exits",
    },
    CommandSpec {
        usage: "goto X Y",
        description: "Move the cursor to canvas coordinates (alias: g)",
    },
    CommandSpec {
        usage: "origin [X Y | here]",
        description: "Move the origin marker",
    },
    CommandSpec {
        usage: "pan X Y",
        description: "Pan the viewport by a delta",
    },
    CommandSpec {
        usage: "clear",
        description: "Clear the whole canvas",
    },
    CommandSpec {
        usage: "rect W H [GLYPH]",
        description: "Draw a rectangle at the cursor",
    },
    CommandSpec {
        usage: "line X2 Y2 [GLYPH]",
        description: "Draw a line from the cursor",
    },
    CommandSpec {
        usage: "text MESSAGE",
        description: "Write text at the cursor",
    },
    CommandSpec {
        usage: "fill [X Y] W H CHAR",
        description: "Fill a rectangle with a glyph",
    },
    CommandSpec {
        usage: "grid major|minor|N|lines|markers|dots|off|rulers|labels|interval MAJOR [MINOR]",
        description: "Configure the grid overlay",
    },
    CommandSpec {
        usage: "mark KEY [X Y]",
        description: "Set a bookmark (a-z, 0-9)",
    },
    CommandSpec {
        usage: "delmark KEY",
        description: "Delete a bookmark; delmarks deletes all",
    },
    CommandSpec {
        usage: "marks",
        description: "List bookmarks",
    },
    CommandSpec {
        usage: "export [FILE]",
        description: "Export the canvas as plain text",
    },
    CommandSpec {
        usage: "import FILE",
        description: "Paste a text file at the cursor",
    },
    CommandSpec {
        usage: "ydir up|down",
        description: "Set the Y axis direction",
    },
    CommandSpec {
        usage: "yank W H | yank zone NAME | yank system",
        description: "Copy a region, a zone buffer, or the OS clipboard",
    },
    CommandSpec {
        usage: "paste [system|opaque]",
        description: "Paste at the cursor, or push to the OS clipboard",
    },
    CommandSpec {
        usage: "clipboard [clear | zone [NAME [W H]]]",
        description: "Inspect or manage the clipboard",
    },
    CommandSpec {
        usage: "color FG [BG] | color off | color apply W H",
        description: "Set drawing colors",
    },
    CommandSpec {
        usage: "palette",
        description: "Show the color palette",
    },
    CommandSpec {
        usage: "border [ascii|unicode|rounded|double|heavy]",
        description: "Set the border style for rect and draw mode",
    },
    CommandSpec {
        usage: "search PATTERN",
        description: "Jump to the next match on the canvas",
    },
    CommandSpec {
        usage: "zone create|pipe|watch|pty|fifo|socket|pager|delete|goto|info|refresh|pause|resume|send|focus|rename|resize|move|link|export ...",
        description: "Manage zones; `zones` lists them",
    },
    CommandSpec {
        usage: "layout list | load NAME [--clear] | save NAME [DESC] | delete NAME | info NAME",
        description: "Manage layout templates",
    },
    CommandSpec {
        usage: "status",
        description: "Report structured editor state",
    },
    CommandSpec {
        usage: "help",
        description: "Show this list",
    },
];

/// Formatted help text, one line per command.
pub fn help_lines() -> Vec<String> {
    let width = COMMANDS
        .iter()
        .map(|spec| spec.usage.len())
        .max()
        .unwrap_or(0);
    COMMANDS
        .iter()
        .map(|spec| format!(":{:width$}  {}", spec.usage, spec.description))
        .collect()
}
