use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tasklist::{Priority, StoreConfig, Summary, Task, TaskId, TaskStore, ViewFilter};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Tasklist - in-memory personal task list (state lasts for the session only)")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: <config_dir>/tasklist/tasklist.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the demonstration task set
    #[arg(long)]
    seed: bool,

    /// Print views as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// One line of session input
#[derive(Parser)]
#[command(no_binary_name = true)]
struct Line {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, PartialEq, Subcommand)]
enum Commands {
    /// Add a task (sets the pending priority first when --priority is given)
    #[command(alias = "a")]
    Add {
        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Toggle a task by visible row number or id
    #[command(alias = "t")]
    Toggle { target: String },

    /// Delete a task by visible row number or id
    #[command(alias = "rm")]
    Delete { target: String },

    /// Remove all completed tasks
    Clear,

    /// Show all, active or completed tasks
    Filter { filter: ViewFilter },

    /// Set the priority for the next new task
    Priority { priority: Priority },

    /// Show the visible tasks
    #[command(alias = "ls")]
    List,

    /// Show counts and progress
    Stats,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Serialize)]
struct View<'a> {
    filter: ViewFilter,
    pending_priority: Priority,
    tasks: Vec<&'a Task>,
    summary: Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let mut config = StoreConfig::load_or_default(cli.config.as_deref())?;
    config.seed |= cli.seed;
    let mut store = TaskStore::new(config)?;

    render(&store, cli.json)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "{} ", ">".dimmed())?;
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input).context("Failed to read input")? == 0 {
            break;
        }

        let command = match parse_line(&input) {
            None => continue,
            Some(Ok(command)) => command,
            Some(Err(e)) => {
                println!("{}", e);
                continue;
            }
        };

        if !run_command(&mut store, command) {
            break;
        }
        render(&store, cli.json)?;
    }

    Ok(())
}

/// Parse one line of input, `None` if it is blank
///
/// The text of `add` is taken from the raw line rather than the split
/// words, so runs of spaces and tabs inside it survive.
fn parse_line(input: &str) -> Option<Result<Commands, clap::Error>> {
    let input = input.trim_end_matches(['\r', '\n']);
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let parsed = Line::try_parse_from(words.iter().copied()).map(|line| match line.command {
        Commands::Add { priority, text } => {
            // text holds the trailing words, everything before it is command and options
            let consumed = words.len() - text.len();
            Commands::Add {
                priority,
                text: vec![skip_words(input, consumed).to_string()],
            }
        }
        other => other,
    });
    Some(parsed)
}

/// Drop the first `n` whitespace-separated words, keeping the rest verbatim
fn skip_words(input: &str, n: usize) -> &str {
    let mut rest = input.trim_start();
    for _ in 0..n {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest
}

/// Apply one command, returning false when the session should end
fn run_command(store: &mut TaskStore, command: Commands) -> bool {
    match command {
        Commands::Add { priority, text } => {
            if let Some(priority) = priority {
                store.set_pending_priority(priority);
            }
            if store.add_task(&text.join(" ")).is_none() {
                println!("{}", "Nothing to add".yellow());
            }
        }
        Commands::Toggle { target } => match resolve_target(store, &target) {
            Some(id) if store.toggle_task(id).is_some() => {}
            _ => println!("{} {}", "No such task:".yellow(), target),
        },
        Commands::Delete { target } => match resolve_target(store, &target) {
            Some(id) if store.delete_task(id).is_some() => {}
            _ => println!("{} {}", "No such task:".yellow(), target),
        },
        Commands::Clear => {
            let removed = store.clear_completed();
            println!("Cleared {} completed task(s)", removed);
        }
        Commands::Filter { filter } => store.set_filter(filter),
        Commands::Priority { priority } => store.set_pending_priority(priority),
        Commands::List | Commands::Stats => {}
        Commands::Quit => return false,
    }
    true
}

/// Map a 1-based visible row number or a full id to a task id
fn resolve_target(store: &TaskStore, target: &str) -> Option<TaskId> {
    if let Ok(row) = target.parse::<usize>() {
        return row
            .checked_sub(1)
            .and_then(|i| store.visible_tasks().get(i).map(|t| t.id));
    }
    target.parse().ok()
}

fn render(store: &TaskStore, json: bool) -> Result<()> {
    if json {
        let view = View {
            filter: store.filter(),
            pending_priority: store.pending_priority(),
            tasks: store.visible_tasks(),
            summary: store.summary(),
        };
        println!("{}", serde_json::to_string(&view).context("Failed to serialize view")?);
        return Ok(());
    }

    let summary = store.summary();
    println!();
    println!(
        "{}  {}  {}%",
        "My Tasks".bold(),
        summary.to_string().dimmed(),
        summary.progress
    );

    let tabs: Vec<String> = ViewFilter::ALL
        .iter()
        .map(|f| {
            if *f == store.filter() {
                f.label().to_uppercase().bold().to_string()
            } else {
                f.label().to_uppercase().dimmed().to_string()
            }
        })
        .collect();
    println!(
        "{}   next priority: {}",
        tabs.join(" "),
        color_priority(store.pending_priority())
    );

    let visible = store.visible_tasks();
    if visible.is_empty() {
        println!("  {}", store.filter().empty_message().dimmed());
    }
    for (i, task) in visible.iter().enumerate() {
        let mark = if task.completed { "[x]" } else { "[ ]" };
        let text = if task.completed {
            task.text.strikethrough().dimmed().to_string()
        } else {
            task.text.clone()
        };
        println!("{:>3}. {} {} {}", i + 1, mark, text, color_priority(task.priority));
    }

    if !store.is_empty() {
        let chips: Vec<String> = Priority::ALL
            .iter()
            .filter(|p| summary.breakdown.get(**p) > 0)
            .map(|p| format!("{} {}", summary.breakdown.get(*p), p.label().to_uppercase()))
            .collect();
        let mut footer = format!("{} remaining", summary.remaining);
        if !chips.is_empty() {
            footer = format!("{}  {}", chips.join(" "), footer);
        }
        if store.has_completed() {
            footer.push_str("  (clear done: `clear`)");
        }
        println!("{}", footer.dimmed());
    }

    Ok(())
}

fn color_priority(priority: Priority) -> colored::ColoredString {
    match priority {
        Priority::Low => priority.label().green(),
        Priority::Medium => priority.label().yellow(),
        Priority::High => priority.label().red(),
    }
}
