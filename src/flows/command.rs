//! Command surface
//!
//! The two entry points a host wires into its context menu: a visibility check
//! and the copy action itself.

use crate::backends::clipboard::{ClipboardError, ClipboardSink};
use crate::backends::probe::FileProbe;
use crate::core::model::{Resolution, TreeNode};
use crate::flows::reference::format;
use crate::flows::resolve::{is_usable, resolve_detailed};

/// What the host exposes about the current workspace
pub trait Workspace {
    /// False when no solution/workspace is open
    fn is_open(&self) -> bool;

    /// Directory references are made relative to
    fn base_dir(&self) -> Option<&str>;

    /// Current selection, in selection order
    fn selection(&self) -> &[TreeNode];
}

/// Everything the copy action computed before delivery
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prepared {
    pub resolution: Resolution,
    pub text: String,
}

impl Prepared {
    /// Number of references in `text`
    pub fn count(&self) -> usize {
        self.resolution.files.len()
    }
}

/// Result of running the copy action
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Text was written to the clipboard
    Copied(Prepared),
    /// Nothing to copy; the clipboard was left untouched
    Nothing(Prepared),
}

impl Outcome {
    pub fn prepared(&self) -> &Prepared {
        match self {
            Outcome::Copied(prepared) | Outcome::Nothing(prepared) => prepared,
        }
    }
}

/// Whether the command should be shown/enabled for the current selection
pub fn is_visible<W, P>(workspace: &W, probe: &P) -> bool
where
    W: Workspace + ?Sized,
    P: FileProbe + ?Sized,
{
    workspace.is_open()
        && workspace
            .selection()
            .iter()
            .any(|node| is_usable(node, probe))
}

/// Resolve and format the current selection without delivering it
pub fn prepare<W, P>(workspace: &W, probe: &P) -> Prepared
where
    W: Workspace + ?Sized,
    P: FileProbe + ?Sized,
{
    if !workspace.is_open() {
        return Prepared::default();
    }

    let resolution = resolve_detailed(workspace.selection(), probe);
    let text = format(workspace.base_dir(), &resolution.files);

    Prepared { resolution, text }
}

/// Copy references for the current selection to the clipboard.
///
/// The clipboard is written at most once, and only for non-empty output.
pub fn execute<W, P, C>(workspace: &W, probe: &P, sink: &mut C) -> Result<Outcome, ClipboardError>
where
    W: Workspace + ?Sized,
    P: FileProbe + ?Sized,
    C: ClipboardSink + ?Sized,
{
    deliver(prepare(workspace, probe), sink)
}

fn deliver<C: ClipboardSink + ?Sized>(
    prepared: Prepared,
    sink: &mut C,
) -> Result<Outcome, ClipboardError> {
    if prepared.text.is_empty() {
        return Ok(Outcome::Nothing(prepared));
    }

    sink.set_text(&prepared.text)?;
    Ok(Outcome::Copied(prepared))
}
