//! Pretty terminal output for message view models.

use std::time::Instant;

use console::{Style, Term, style};
use knowmore_core::config::RenderConfig;
use knowmore_core::interaction::{Feedback, MessageInteraction};
use knowmore_core::sources::SearchResultRecord;
use knowmore_core::{MessageRole, MessageViewModel, RenderBlock};

/// Icons for terminal output - uses Nerd Font icons if available, ASCII fallbacks otherwise.
struct Icons {
    search: &'static str,
    globe: &'static str,
    copy: &'static str,
    check: &'static str,
    thumbs_up: &'static str,
    thumbs_down: &'static str,
}

impl Icons {
    fn detect() -> Self {
        if Self::has_nerd_font() {
            Self {
                search: "\u{f002} ",      // nf-fa-search
                globe: "\u{f0ac} ",       // nf-fa-globe
                copy: "\u{f0c5}",         // nf-fa-copy
                check: "\u{f00c}",        // nf-fa-check
                thumbs_up: "\u{f164}",    // nf-fa-thumbs_up
                thumbs_down: "\u{f165}",  // nf-fa-thumbs_down
            }
        } else {
            Self {
                search: "",
                globe: "",
                copy: "copy",
                check: "copied",
                thumbs_up: "+1",
                thumbs_down: "-1",
            }
        }
    }

    /// Detect if a Nerd Font is likely available.
    fn has_nerd_font() -> bool {
        // Users can set NERD_FONT=1 to force
        if let Ok(val) = std::env::var("NERD_FONT") {
            return val != "0" && !val.is_empty();
        }

        if let Ok(term_prog) = std::env::var("TERM_PROGRAM") {
            let modern_terminals = ["WezTerm", "Alacritty", "kitty", "iTerm.app", "ghostty"];
            if modern_terminals.iter().any(|t| term_prog.contains(t)) {
                return true;
            }
        }

        std::env::var("STARSHIP_SESSION_KEY").is_ok()
    }
}

/// Terminal width for formatting, with fallback.
fn term_width() -> usize {
    Term::stdout().size().1 as usize
}

/// Style for role badges.
fn role_style(role: MessageRole) -> Style {
    match role {
        MessageRole::User => Style::new().cyan().bold(),
        MessageRole::Assistant => Style::new().green().bold(),
        MessageRole::System => Style::new().magenta().bold(),
        MessageRole::Tool => Style::new().yellow().bold(),
        MessageRole::Other => Style::new().white(),
    }
}

/// Truncate to `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    let clean = s.replace(['\n', '\r'], " ");
    if clean.chars().count() <= max_chars {
        return clean;
    }
    let cut: String = clean.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Wrap text to the terminal width, indenting continuation lines.
fn wrap_text(s: &str, indent: usize) -> Vec<String> {
    let width = term_width().min(100).saturating_sub(indent + 2).max(40);
    s.lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|cow| cow.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Print one message view.
pub fn print_view(
    view: &MessageViewModel,
    render: &RenderConfig,
    interaction: Option<&MessageInteraction>,
) {
    let icons = Icons::detect();
    let width = term_width().min(100);
    let role = view.role.to_string();

    println!(
        "{} {}",
        role_style(view.role).apply_to(&role),
        style(&view.message_id).dim()
    );

    for block in &view.blocks {
        match block {
            RenderBlock::SourcesLoading => print_sources_placeholder(&icons),
            RenderBlock::Sources {
                filter_tags,
                search_results,
            } => print_sources(&icons, filter_tags, search_results, render, width),
            RenderBlock::Text { content } => {
                for line in wrap_text(content, 2) {
                    println!("  {line}");
                }
            }
        }
    }

    if render.show_affordances && view.has_affordances() {
        print_affordances(&icons, interaction);
    }
    println!();
}

fn print_sources_placeholder(icons: &Icons) {
    println!(
        "  {}",
        style(format!("{}Searching the web...", icons.search))
            .dim()
            .italic()
    );
    println!("  {}", style("░░░░░░░░  ░░░░░░  ░░░░░░░░░░").dim());
}

fn print_sources(
    icons: &Icons,
    filter_tags: &[String],
    records: &[SearchResultRecord],
    render: &RenderConfig,
    width: usize,
) {
    let separator = "─".repeat(width.saturating_sub(4));

    println!("  {}", style(&separator).dim());
    println!(
        "  {}{}",
        style(format!("{}Sources Found", icons.search)).bold().white(),
        style(format!("  {} Results", records.len())).dim()
    );

    if !filter_tags.is_empty() {
        let tags = filter_tags
            .iter()
            .take(render.max_tags)
            .map(|tag| style(format!("[{tag}]")).yellow().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("  {tags}");
    }

    for record in records {
        println!(
            "  {} {} {}",
            style(format!("[{}]", record.favicon)).cyan().bold(),
            style(&record.title).bold(),
            style(format!("{}{}", icons.globe, record.domain)).blue()
        );
        println!(
            "      {}",
            style(truncate_chars(&record.preview, render.max_preview_chars)).dim()
        );
    }
    println!("  {}", style(&separator).dim());
}

fn print_affordances(icons: &Icons, interaction: Option<&MessageInteraction>) {
    let now = Instant::now();
    let copied = interaction
        .filter(|state| state.is_copied(now))
        .and_then(|state| state.copied_remaining(now));
    let feedback = interaction.map_or(Feedback::Unset, MessageInteraction::feedback);

    let copy = if let Some(left) = copied {
        format!(
            "{} {}",
            style(icons.check).green(),
            style(format!("{:.1}s", left.as_secs_f64())).dim()
        )
    } else {
        style(icons.copy).dim().to_string()
    };
    let up = match feedback {
        Feedback::Helpful => style(icons.thumbs_up).green().bold().to_string(),
        _ => style(icons.thumbs_up).dim().to_string(),
    };
    let down = match feedback {
        Feedback::NotHelpful => style(icons.thumbs_down).red().bold().to_string(),
        _ => style(icons.thumbs_down).dim().to_string(),
    };
    println!("  {copy}  {up}  {down}");
}

/// Print a one-line summary of an intermediate frame.
pub fn print_frame(revision: u64, view: &MessageViewModel) {
    println!(
        "{} {}",
        style(format!("[rev {revision}]")).dim(),
        view.summary()
    );
}
