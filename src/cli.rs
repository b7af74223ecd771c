//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::backends::clipboard::{hold, SystemClipboard, HOLD_SUBCOMMAND};
use crate::backends::manifest::read_manifest;
use crate::backends::probe::LocalFs;
use crate::backends::scan::{load_selection, LoadOptions};
use crate::core::model::{Resolution, TreeNode};
use crate::core::paths::relativize;
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::flows::command::{execute, is_visible, prepare, Outcome, Prepared, Workspace};
use crate::flows::reference::reference_tokens;
use crate::flows::resolve::resolve_detailed;

/// copyref - copy workspace files as #file:'...' references for AI chat inputs.
#[derive(Parser, Debug)]
#[command(name = "copyref")]
#[command(
    author,
    version,
    about,
    long_about = r#"copyref turns a selection of files, folders, projects or the whole workspace
into space-separated #file:'<path>' references and places them on the clipboard,
ready to paste into an AI assistant's chat input.

Paths in references are relative to ROOT when possible and always use '/'.

Selections come from PATHS on the command line (relative to ROOT unless absolute)
and/or from a JSON selection manifest written by an editor integration.

Examples:
    copyref copy src/main.rs src/cli.rs
    copyref copy src --print
    copyref check src/lib.rs
    copyref copy --selection selection.json
    copyref relativize 'C:\Sol' 'C:\Sol\src\a.cs'
"#
)]
pub struct Cli {
    /// Workspace root; references are relative to it.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Workspace root (defaults to the current directory).\n\n\
References are made relative to this directory, and positional PATHS are\n\
interpreted relative to it. A selection manifest may override it with its own root."
    )]
    pub root: PathBuf,

    /// Output format for printed results (text/json/jsonl).
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_name = "FORMAT",
        long_help = "Select the output format for results printed to stdout.\n\n\
Supported values:\n\
- text (default): the reference string, or one resolved file per line\n\
- json: a single JSON document\n\
- jsonl: one JSON object per line"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Include hidden files/directories (dotfiles).
    #[arg(
        long,
        global = true,
        long_help = "Include hidden files and directories (dotfiles) when expanding\n\
selected directories. By default, hidden entries are skipped."
    )]
    pub hidden: bool,

    /// Disable .gitignore and other ignore rules.
    #[arg(
        long,
        global = true,
        long_help = "Disable respect for ignore files (.gitignore, .ignore, global ignores)\n\
when expanding selected directories."
    )]
    pub no_ignore: bool,

    /// Disable colored output (when applicable).
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Do not print the confirmation line after copying to the clipboard."
    )]
    pub quiet: bool,

    /// Verbose mode (more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Report skipped folders/projects, missing files and paths that could not be\n\
made relative on stderr."
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy references for the selection to the clipboard.
    #[command(
        long_about = "Resolve the selection into the files it contains, format each as\n\
#file:'<path>' and copy the space-separated result to the clipboard.\n\n\
Folders, projects and the workspace root are expanded recursively. Files are\n\
deduplicated case-insensitively. If nothing resolves, the clipboard is left untouched.\n\n\
Examples:\n\
  copyref copy src/main.rs\n\
  copyref copy . --print\n\
  copyref copy --selection - < selection.json\n"
    )]
    Copy {
        /// Selected paths (relative to ROOT unless absolute).
        #[arg(value_name = "PATHS", num_args = 0..)]
        paths: Vec<PathBuf>,

        /// JSON selection manifest ('-' for stdin).
        #[arg(long, value_name = "FILE")]
        selection: Option<PathBuf>,

        /// Print the result instead of copying it.
        #[arg(
            long,
            long_help = "Print the result to stdout (in --format) instead of writing the clipboard."
        )]
        print: bool,

        /// Emit absolute paths instead of paths relative to ROOT.
        #[arg(long)]
        absolute: bool,
    },

    /// Report whether the copy command applies to the selection.
    #[command(
        long_about = "Print true if any selected item is usable (an existing file, a folder,\n\
a project or the workspace root), false otherwise. Exits with status 1 when false.\n\n\
Directories are not expanded, so this stays cheap for large selections.\n\n\
Example:\n\
  copyref check src/main.rs\n"
    )]
    Check {
        /// Selected paths (relative to ROOT unless absolute).
        #[arg(value_name = "PATHS", num_args = 0..)]
        paths: Vec<PathBuf>,

        /// JSON selection manifest ('-' for stdin).
        #[arg(long, value_name = "FILE")]
        selection: Option<PathBuf>,
    },

    /// List the files a selection resolves to.
    #[command(
        long_about = "Resolve the selection and print the absolute file paths it contains,\n\
in traversal order.\n\n\
Example:\n\
  copyref resolve src --format json\n"
    )]
    Resolve {
        /// Selected paths (relative to ROOT unless absolute).
        #[arg(value_name = "PATHS", num_args = 0..)]
        paths: Vec<PathBuf>,

        /// JSON selection manifest ('-' for stdin).
        #[arg(long, value_name = "FILE")]
        selection: Option<PathBuf>,
    },

    /// Print TARGET relative to the directory BASE.
    #[command(
        long_about = "Print TARGET relative to the directory BASE, with '/' separators.\n\n\
TARGET is printed unchanged (separators normalized) when BASE is empty, when the\n\
two are on different volumes, or when either is not an absolute path.\n\n\
Example:\n\
  copyref relativize 'C:\\Sol' 'C:\\Sol\\src\\a.cs'\n"
    )]
    Relativize {
        #[arg(value_name = "BASE")]
        base: String,

        #[arg(value_name = "TARGET")]
        target: String,
    },

    /// Keep serving clipboard text read from stdin until it is replaced.
    #[command(name = HOLD_SUBCOMMAND, hide = true)]
    HoldClipboard,
}

/// Current workspace as seen from the command line
#[derive(Debug, Default)]
struct Session {
    base: Option<String>,
    selection: Vec<TreeNode>,
}

impl Workspace for Session {
    fn is_open(&self) -> bool {
        true
    }

    fn base_dir(&self) -> Option<&str> {
        self.base.as_deref()
    }

    fn selection(&self) -> &[TreeNode] {
        &self.selection
    }
}

/// Build the session from a manifest (if any) followed by the positional paths
fn load_session(
    root: &Path,
    paths: &[PathBuf],
    manifest: Option<&Path>,
    options: &LoadOptions,
) -> Result<Session> {
    let mut session = Session {
        base: Some(root.to_string_lossy().into_owned()),
        selection: Vec::new(),
    };

    if let Some(source) = manifest {
        let manifest = read_manifest(source)?;
        if let Some(manifest_root) = manifest.root {
            session.base = Some(manifest_root);
        }
        session.selection.extend(manifest.selection);
    }

    session
        .selection
        .extend(load_selection(root, paths, options));
    Ok(session)
}

fn note(message: impl std::fmt::Display) {
    eprintln!("{} {}", "note:".yellow().bold(), message);
}

fn report_skipped(resolution: &Resolution) {
    for skip in &resolution.skipped {
        note(skip);
    }
}

fn report_prepared(session: &Session, prepared: &Prepared) {
    report_skipped(&prepared.resolution);
    if session.base.is_none() {
        return;
    }
    for reference in reference_tokens(session.base_dir(), &prepared.resolution.files)
        .iter()
        .filter(|r| !r.relative)
    {
        note(format!("kept absolute path for {}", reference.file));
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let renderer = Renderer::with_config(RenderConfig::with_pretty(format, cli.pretty));
    let options = LoadOptions::new(cli.hidden, !cli.no_ignore);

    // Get absolute root path
    let root = cli.root.canonicalize().unwrap_or(cli.root);

    match cli.command {
        Commands::Copy {
            paths,
            selection,
            print,
            absolute,
        } => {
            let mut session = load_session(&root, &paths, selection.as_deref(), &options)?;
            if absolute {
                session.base = None;
            }

            if print {
                let prepared = prepare(&session, &LocalFs);
                if cli.verbose {
                    report_prepared(&session, &prepared);
                }

                let references = reference_tokens(session.base_dir(), &prepared.resolution.files);
                let output = renderer.render_references(
                    &prepared.text,
                    &references,
                    &prepared.resolution.skipped,
                );
                if !output.is_empty() {
                    println!("{}", output);
                }
                return Ok(ExitCode::SUCCESS);
            }

            let mut clipboard = SystemClipboard::new();
            let outcome =
                execute(&session, &LocalFs, &mut clipboard).context("Failed to copy references")?;
            if cli.verbose {
                report_prepared(&session, outcome.prepared());
            }

            match outcome {
                Outcome::Copied(prepared) => {
                    if !cli.quiet {
                        eprintln!(
                            "{} {} reference(s) to the clipboard",
                            "Copied".green().bold(),
                            prepared.count()
                        );
                    }
                }
                Outcome::Nothing(_) => {
                    if cli.verbose {
                        note("nothing to copy");
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Check { paths, selection } => {
            let session =
                load_session(&root, &paths, selection.as_deref(), &options.shallow())?;
            let visible = is_visible(&session, &LocalFs);
            println!("{}", visible);
            Ok(if visible {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Resolve { paths, selection } => {
            let session = load_session(&root, &paths, selection.as_deref(), &options)?;
            let resolution = resolve_detailed(session.selection(), &LocalFs);
            if cli.verbose {
                report_skipped(&resolution);
            }

            let output = renderer.render_resolution(&resolution);
            if !output.is_empty() {
                println!("{}", output);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Relativize { base, target } => {
            println!("{}", relativize(Some(base.as_str()), &target));
            Ok(ExitCode::SUCCESS)
        }

        Commands::HoldClipboard => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read clipboard text from stdin")?;
            if !text.is_empty() {
                hold(&text).context("Failed to hold clipboard")?;
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
