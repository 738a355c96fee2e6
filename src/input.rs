// Input collection: turns answers from an `InputSource` into a validated
// `PublishRequest`. Nothing here touches the network; the only side effect
// besides reading answers is checking that the graph file exists.
//
// Only the title is re-prompted when invalid. Every other field fails the
// run on the first bad answer.

use crate::error::{PublishError, Result};
use crate::request::{PublishRequest, Visibility};
use dialoguer::{Input, Password};
use regex::Regex;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Graph file used when the operator leaves the path prompt empty.
pub const DEFAULT_GRAPH_FILE: &str = "graph.json";

/// Where answers come from. The terminal in production, canned answers in
/// tests.
pub trait InputSource {
    /// Read the next answer. `prompt` may be empty for continuation lines.
    fn next_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Read an answer that should not be echoed.
    fn next_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.next_line(prompt)
    }

    /// Show a heading or a warning to the operator.
    fn notify(&mut self, _message: &str) {}
}

/// Any `FnMut(prompt) -> answer` works as an input source.
impl<F> InputSource for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn next_line(&mut self, prompt: &str) -> io::Result<String> {
        self(prompt)
    }
}

/// Interactive terminal prompts backed by `dialoguer`.
#[derive(Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn next_line(&mut self, prompt: &str) -> io::Result<String> {
        // `allow_empty` so blank answers reach our own validation (description
        // terminator, default graph path).
        Input::<String>::new()
            .with_prompt(if prompt.is_empty() { ">" } else { prompt })
            .allow_empty(true)
            .interact_text()
    }

    fn next_secret(&mut self, prompt: &str) -> io::Result<String> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Replays a fixed list of answers. Running out of answers reads as
/// end-of-input, which the collector reports as an interruption.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    notices: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            answers: answers.into_iter().map(Into::into).collect(),
            notices: Vec::new(),
        }
    }

    /// Messages passed to `notify`, in order.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_line(&mut self, _prompt: &str) -> io::Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

/// Replace every whitespace run with a single hyphen, dropping leading and
/// trailing whitespace. Applying it twice changes nothing.
pub fn normalize_title(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Alphanumeric runs joined by single hyphens.
pub fn is_valid_title(title: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9]+(-[A-Za-z0-9]+)*$").expect("title pattern compiles"))
        .is_match(title)
}

/// Ask for a title until a valid one is given.
pub fn collect_title<S: InputSource + ?Sized>(source: &mut S) -> Result<String> {
    loop {
        let raw = source.next_line("Enter topic title").map_err(PublishError::from_input)?;
        let title = normalize_title(&raw);
        if is_valid_title(&title) {
            return Ok(title);
        }
        warn!(title = %title, "rejected topic title");
        source.notify("Title must be letters and digits separated by single hyphens or spaces, try again.");
    }
}

/// Read description lines until two consecutive empty ones.
pub fn collect_description<S: InputSource + ?Sized>(source: &mut S) -> Result<String> {
    source.notify("\nEnter topic description (press Enter twice when finished):");
    let mut lines: Vec<String> = Vec::new();
    loop {
        let line = source.next_line("").map_err(PublishError::from_input)?;
        if line.is_empty() && lines.last().map_or(false, |l| l.is_empty()) {
            // drop the first half of the terminating pair
            lines.pop();
            break;
        }
        lines.push(line);
    }
    let description = lines.join("\n").trim().to_string();
    if description.is_empty() {
        return Err(PublishError::Validation("Description cannot be empty".into()));
    }
    Ok(description)
}

/// Resolve the graph path answer against `base_dir`, defaulting to
/// [`DEFAULT_GRAPH_FILE`]. The path must be an existing regular file, so a
/// directory is rejected here rather than after the topic is created.
pub fn resolve_graph_path(answer: &str, base_dir: &Path) -> Result<PathBuf> {
    let answer = answer.trim();
    let relative = if answer.is_empty() { DEFAULT_GRAPH_FILE } else { answer };
    let path = base_dir.join(relative);
    if !path.is_file() {
        return Err(PublishError::GraphNotFound { path });
    }
    debug!(path = %path.display(), "resolved graph file");
    Ok(path)
}

/// Directory holding the running executable. Relative graph paths are
/// resolved against it, not against the working directory.
pub fn program_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"))
}

/// Strict y/n answer. Surrounding whitespace is ignored, nothing else is.
pub fn parse_yes_no(answer: &str, field: &str) -> Result<bool> {
    match answer.trim() {
        "y" => Ok(true),
        "n" => Ok(false),
        other => Err(PublishError::Validation(format!(
            "Invalid {} answer {:?}, expected y or n",
            field, other
        ))),
    }
}

/// Run every prompt in order and build the request. Fails on the first
/// invalid field other than the title.
pub fn collect_request<S: InputSource + ?Sized>(source: &mut S, base_dir: &Path) -> Result<PublishRequest> {
    let title = collect_title(source)?;
    let description = collect_description(source)?;

    source.notify("\nEnter relative path to graph file (leave blank for default graph.json):");
    let answer = source.next_line("Graph file").map_err(PublishError::from_input)?;
    let graph_path = resolve_graph_path(&answer, base_dir)?;

    source.notify("\nMake the graph visible to everyone? (y/n)");
    let answer = source.next_line("Visible").map_err(PublishError::from_input)?;
    let visibility = if parse_yes_no(&answer, "visibility")? {
        Visibility::Public
    } else {
        Visibility::Private
    };

    source.notify("\nAllow anyone to edit the graph? (y/n)");
    let answer = source.next_line("Editable").map_err(PublishError::from_input)?;
    let allow_anyone_to_edit = parse_yes_no(&answer, "allow anyone to edit")?;

    source.notify("\nEnter app session cookie:");
    let credential = source
        .next_secret("Session")
        .map_err(PublishError::from_input)?
        .trim()
        .to_string();
    if credential.is_empty() {
        return Err(PublishError::Validation("App session cookie cannot be empty".into()));
    }

    Ok(PublishRequest {
        title,
        description,
        graph_path,
        visibility,
        allow_anyone_to_edit,
        credential,
    })
}
