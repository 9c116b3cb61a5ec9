//! Plain-text presentation of the controller state.

use std::fmt::Write as _;

use crate::api::{CatalogItem, PromptDetail, PromptFile};
use crate::core::catalog::Catalog;
use crate::core::view::{ViewController, ViewError, ViewMode};

pub const LOADING_TEXT: &str = "Loading prompts...";
pub const NO_MCP_PROMPTS: &str = "No MCP prompts found.";
pub const NO_MCP_TOOLS: &str = "No MCP tools found.";
pub const NO_PROMPT_FILES: &str =
    "No prompt files found. Add markdown files to the prompts directory.";

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Turn `weekly_status_report` into `Weekly Status Report`.
pub fn display_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_ascii_alphanumeric() {
            title.push(if at_word_start {
                ch.to_ascii_uppercase()
            } else {
                ch
            });
            at_word_start = false;
        } else {
            title.push(ch);
            at_word_start = true;
        }
    }
    title
}

pub fn render_view(controller: &ViewController) -> String {
    if controller.is_loading() {
        return format!("{LOADING_TEXT}\n");
    }

    let mut out = String::new();
    if let Some(notice) = controller.notice() {
        let _ = writeln!(out, "ℹ️  {notice}");
    }

    match controller.error() {
        Some(err @ ViewError::Aggregate(_)) => {
            let _ = writeln!(out, "❌ {err}");
            return out;
        }
        Some(err @ ViewError::Detail(_)) => {
            let _ = writeln!(out, "⚠️  {err}");
            let _ = writeln!(out);
        }
        None => {}
    }

    match controller.mode() {
        ViewMode::Detail(detail) => render_detail(&mut out, detail),
        ViewMode::Listing => render_listing(&mut out, controller.catalog()),
    }
    out
}

pub fn render_detail(out: &mut String, detail: &PromptDetail) {
    let title = display_title(&detail.name);
    let _ = writeln!(out, "← Back to prompts");
    let _ = writeln!(out);
    let _ = writeln!(out, "📄 {title}");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", detail.content.trim_end_matches('\n'));
}

pub fn render_listing(out: &mut String, catalog: &Catalog) {
    let _ = writeln!(out, "🧭 MCP Discovery");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);

    let _ = writeln!(out, "MCP Prompts (Slash Commands)");
    if catalog.mcp_prompts.is_empty() {
        let _ = writeln!(out, "  {NO_MCP_PROMPTS}");
    } else {
        for prompt in &catalog.mcp_prompts {
            render_item(out, &format!("/{}", prompt.name), prompt);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "MCP Tools");
    if catalog.mcp_tools.is_empty() {
        let _ = writeln!(out, "  {NO_MCP_TOOLS}");
    } else {
        for tool in &catalog.mcp_tools {
            render_item(out, &tool.name, tool);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Prompt Files");
    if catalog.prompt_files.is_empty() {
        let _ = writeln!(out, "  {NO_PROMPT_FILES}");
    } else {
        for file in &catalog.prompt_files {
            render_prompt_file(out, file);
        }
    }
}

fn render_item(out: &mut String, heading: &str, item: &CatalogItem) {
    let _ = writeln!(out, "  • {heading}");
    write_description(out, &item.description);
}

fn render_prompt_file(out: &mut String, file: &PromptFile) {
    let _ = writeln!(
        out,
        "  • {} ({}, `mcpdeck show {}`)",
        display_title(&file.name),
        file.filename,
        file.name
    );
    write_description(out, &file.description);
}

fn write_description(out: &mut String, description: &str) {
    for line in description.trim().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let _ = writeln!(out, "    {line}");
    }
}
