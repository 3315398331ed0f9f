// UI layer: interactive menu loop built on `dialoguer`. Each iteration
// renders the menu, dispatches one action against the tag manager and
// reports the outcome; adapter errors never take the loop down.

use crate::api::{FileRecord, FileStore};
use crate::manager::TagManager;
use crate::tags::TagSet;
use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    List,
    Add,
    Search,
    Remove,
    Exit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 5] = [
        MenuChoice::List,
        MenuChoice::Add,
        MenuChoice::Search,
        MenuChoice::Remove,
        MenuChoice::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuChoice::List => "List all files",
            MenuChoice::Add => "Add tag to file",
            MenuChoice::Search => "Search files by tag",
            MenuChoice::Remove => "Remove tag from file",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// What one menu iteration decided about the loop.
enum LoopOutcome {
    Continue,
    Exit,
}

/// Main interactive loop. Runs until the user picks "Exit" or interrupts a
/// prompt; between iterations it pauses briefly to stay under the remote
/// API rate limit.
pub fn main_menu<S: FileStore>(manager: &TagManager<S>, menu_delay: Duration) -> Result<()> {
    println!("Drive Tag Manager");
    loop {
        match run_iteration(manager) {
            Ok(LoopOutcome::Continue) => {}
            Ok(LoopOutcome::Exit) => {
                report_success("Exiting application. Goodbye!");
                info!("user exited the application");
                break;
            }
            Err(err) if interrupted(&err) => {
                println!();
                report_error("Interrupted by user. Exiting application.");
                warn!("interrupted by user");
                break;
            }
            Err(err) => {
                error!("menu iteration failed: {err:#}");
                report_error(&format!("Unexpected error: {err:#}"));
            }
        }
        thread::sleep(menu_delay);
    }
    Ok(())
}

fn run_iteration<S: FileStore>(manager: &TagManager<S>) -> Result<LoopOutcome> {
    let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
    let selection = Select::new()
        .with_prompt("Choose an option")
        .items(&labels)
        .default(0)
        .interact()?;
    let choice = MenuChoice::ALL[selection];
    info!(?choice, "menu option selected");

    match choice {
        MenuChoice::List => handle_list(manager)?,
        MenuChoice::Add => handle_add(manager)?,
        MenuChoice::Search => handle_search(manager)?,
        MenuChoice::Remove => handle_remove(manager)?,
        MenuChoice::Exit => return Ok(LoopOutcome::Exit),
    }
    Ok(LoopOutcome::Continue)
}

fn handle_list<S: FileStore>(manager: &TagManager<S>) -> Result<()> {
    let files = fetch_files(manager)?;
    print_file_table(&files);
    info!(count = files.len(), "listed files");
    Ok(())
}

fn handle_add<S: FileStore>(manager: &TagManager<S>) -> Result<()> {
    let files = fetch_files(manager)?;
    if files.is_empty() {
        report_warning("No files found in the folder.");
        return Ok(());
    }
    print_file_table(&files);
    let file = select_file(&files, "Enter the number of the file to tag")?;
    let tag = prompt_tag("Enter the tag to add")?;

    let added = with_spinner("Updating tags...", || manager.add_tag(&file.id, &tag))?;
    if added {
        report_success(&format!(
            "Tag '{}' added successfully to '{}'!",
            tag, file.name
        ));
    } else {
        report_warning(&format!("File '{}' already has tag '{}'.", file.name, tag));
    }
    Ok(())
}

fn handle_search<S: FileStore>(manager: &TagManager<S>) -> Result<()> {
    let tag = prompt_tag("Enter the tag to search for")?;
    let files = with_spinner("Searching...", || manager.search_by_tag(&tag))?;
    if files.is_empty() {
        report_warning(&format!("No files found with tag '{}'.", tag));
    } else {
        print_file_table(&files);
    }
    info!(tag = %tag, count = files.len(), "searched files by tag");
    Ok(())
}

fn handle_remove<S: FileStore>(manager: &TagManager<S>) -> Result<()> {
    let files = fetch_files(manager)?;
    if files.is_empty() {
        report_warning("No files found in the folder.");
        return Ok(());
    }
    print_file_table(&files);
    let file = select_file(&files, "Enter the number of the file to remove a tag from")?;

    // Tags come from the listing snapshot; the removal below re-reads the
    // live property bag before writing.
    let tags = TagSet::from_properties(&file.properties);
    if tags.is_empty() {
        report_warning(&format!("File '{}' has no tags.", file.name));
        return Ok(());
    }
    println!("\nAvailable tags:");
    for (idx, tag) in tags.iter().enumerate() {
        println!("{:>4}. {}", idx + 1, tag);
    }
    let tag_idx = prompt_ordinal("Enter the number of the tag to remove", tags.len())?;
    let tag = tags
        .iter()
        .nth(tag_idx)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("tag selection out of range"))?;

    let removed = with_spinner("Updating tags...", || manager.remove_tag(&file.id, &tag))?;
    if removed {
        report_success(&format!(
            "Tag '{}' removed successfully from '{}'!",
            tag, file.name
        ));
    } else {
        report_warning(&format!("Tag '{}' is no longer on '{}'.", tag, file.name));
    }
    Ok(())
}

fn fetch_files<S: FileStore>(manager: &TagManager<S>) -> Result<Vec<FileRecord>> {
    Ok(with_spinner("Fetching files...", || manager.list_files())?)
}

fn select_file<'a>(files: &'a [FileRecord], prompt: &str) -> Result<&'a FileRecord> {
    let idx = prompt_ordinal(prompt, files.len())?;
    files
        .get(idx)
        .ok_or_else(|| anyhow::anyhow!("file selection out of range"))
}

/// 1-based ordinal prompt. `dialoguer` re-asks until the validator accepts,
/// so out-of-range and non-numeric input loop back to the prompt.
fn prompt_ordinal(prompt: &str, len: usize) -> Result<usize> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| parse_ordinal(input, len).map(|_| ()))
        .interact_text()?;
    parse_ordinal(&input, len).map_err(|msg| anyhow::anyhow!(msg))
}

/// Resolve user input to a 0-based index into a list of `len` entries.
fn parse_ordinal(input: &str, len: usize) -> Result<usize, String> {
    let n: usize = input
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid number".to_string())?;
    if (1..=len).contains(&n) {
        Ok(n - 1)
    } else {
        Err(format!("Please enter a number between 1 and {len}"))
    }
}

fn prompt_tag(prompt: &str) -> Result<String> {
    let tag: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| validate_tag(input))
        .interact_text()?;
    Ok(tag.trim().to_string())
}

/// Commas are the encoding separator, so they cannot appear inside a tag.
fn validate_tag(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Tag must not be empty".into());
    }
    if trimmed.contains(',') {
        return Err("Tag must not contain a comma".into());
    }
    Ok(())
}

fn print_file_table(files: &[FileRecord]) {
    if files.is_empty() {
        report_warning("No files found in the folder.");
        return;
    }
    println!(
        "{:>4}  {:<44}  {:<30}  {:<30}  {}",
        "No.", "ID", "Name", "Type", "Tags"
    );
    for (idx, file) in files.iter().enumerate() {
        let tags = TagSet::from_properties(&file.properties);
        let tag_str = if tags.is_empty() {
            "No tags".to_string()
        } else {
            tags.iter().collect::<Vec<_>>().join(", ")
        };
        println!(
            "{:>4}  {:<44}  {:<30}  {:<30}  {}",
            idx + 1,
            file.id,
            file.name,
            file.mime_type,
            tag_str
        );
    }
}

/// Runs `f` with a spinner visible, clearing it afterwards so the next
/// table renders cleanly.
fn with_spinner<T>(message: &str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

/// A prompt aborted with ctrl-c surfaces as an `Interrupted` io error.
fn interrupted(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::Interrupted)
        .unwrap_or(false)
}

fn report_success(message: &str) {
    println!("✓ {message}");
}

fn report_error(message: &str) {
    println!("✗ {message}");
}

fn report_warning(message: &str) {
    println!("⚠ {message}");
}
