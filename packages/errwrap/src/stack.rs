//! Call-stack snapshots attached to chain levels
//!
//! A [`StackTrace`] records raw instruction pointers when a chain level is
//! built. Symbol lookup is deferred until a [`Frame`] is rendered, and the
//! result is cached on the frame so repeated formatting stays cheap.

use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Upper bound on the number of frames recorded per snapshot
pub const MAX_FRAMES: usize = 32;

const UNKNOWN: &str = "unknown";

/// Frames walked past the limit while still looking for the capture anchor
const ANCHOR_SEARCH_SLACK: usize = 16;

/// Granularity used when rendering a single [`Frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStyle {
    /// Base name of the source file
    File,
    /// `file:line` using the base name of the source file
    FileLine,
    /// Function name and full source path separated by `\n\t`
    Function,
    /// Function name and full source path with line, `function\n\tpath:line`
    FunctionLine,
    /// Function name without its crate prefix
    ShortName,
    /// Single-line `function path:line`, or `unknown` when unresolved
    Compact,
}

#[derive(Debug, Clone, Default)]
struct Symbol {
    function: Option<String>,
    file: Option<PathBuf>,
    line: Option<u32>,
}

/// One recorded call frame
///
/// Holds the instruction pointer only; function, file and line are resolved
/// on first use.
#[derive(Clone)]
pub struct Frame {
    ip: usize,
    symbol: OnceLock<Symbol>,
}

impl Frame {
    fn new(ip: usize) -> Self {
        Self {
            ip,
            symbol: OnceLock::new(),
        }
    }

    /// Raw instruction pointer recorded for this frame
    #[must_use]
    pub fn ip(&self) -> usize {
        self.ip
    }

    fn symbol(&self) -> &Symbol {
        self.symbol.get_or_init(|| {
            let mut resolved = Symbol::default();
            // Inlined calls report several symbols for one address; keep the first.
            backtrace::resolve(self.ip as *mut c_void, |symbol| {
                if resolved.function.is_some() {
                    return;
                }
                resolved.function = symbol.name().map(|name| format!("{name:#}"));
                resolved.file = symbol.filename().map(Path::to_path_buf);
                resolved.line = symbol.lineno();
            });
            resolved
        })
    }

    /// Fully qualified function name, or `unknown`
    #[must_use]
    pub fn function_name(&self) -> &str {
        self.symbol().function.as_deref().unwrap_or(UNKNOWN)
    }

    /// Full source path, or `unknown`
    #[must_use]
    pub fn file_path(&self) -> String {
        self.symbol()
            .file
            .as_ref()
            .map_or_else(|| UNKNOWN.to_string(), |p| p.display().to_string())
    }

    /// Base name of the source file, or `unknown`
    #[must_use]
    pub fn file_name(&self) -> String {
        self.symbol()
            .file
            .as_ref()
            .and_then(|p| p.file_name())
            .map_or_else(|| UNKNOWN.to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// Source line, `0` when unresolved
    #[must_use]
    pub fn line_number(&self) -> u32 {
        self.symbol().line.unwrap_or(0)
    }

    /// Whether the address mapped to a known function
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.symbol().function.is_some()
    }

    /// Render this frame at the requested granularity
    #[must_use]
    pub fn render(&self, style: FrameStyle) -> String {
        match style {
            FrameStyle::File => self.file_name(),
            FrameStyle::FileLine => format!("{}:{}", self.file_name(), self.line_number()),
            FrameStyle::Function => format!("{}\n\t{}", self.function_name(), self.file_path()),
            FrameStyle::FunctionLine => format!(
                "{}\n\t{}:{}",
                self.function_name(),
                self.file_path(),
                self.line_number()
            ),
            FrameStyle::ShortName => short_name(self.function_name()).to_string(),
            FrameStyle::Compact => {
                if self.is_resolved() {
                    format!(
                        "{} {}:{}",
                        self.function_name(),
                        self.file_path(),
                        self.line_number()
                    )
                } else {
                    UNKNOWN.to_string()
                }
            }
        }
    }
}

/// Strips the leading crate segment from a function path.
fn short_name(name: &str) -> &str {
    name.split_once("::").map_or(name, |(_, rest)| rest)
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str(&self.render(FrameStyle::FunctionLine))
        } else {
            f.write_str(&self.render(FrameStyle::FileLine))
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:#x})", self.ip)
    }
}

/// Ordered call frames, innermost first
///
/// Cloning is cheap: clones share the same frames and their resolved symbols.
#[derive(Clone)]
pub struct StackTrace {
    frames: Arc<[Frame]>,
}

impl Default for StackTrace {
    fn default() -> Self {
        Self::from_frames(Vec::new())
    }
}

impl StackTrace {
    /// Capture the stack of the calling function
    #[inline(never)]
    #[must_use]
    pub fn capture() -> Self {
        Self::from_frames(capture_frames(1))
    }

    /// Capture the stack of whoever called the errwrap entry point that
    /// invoked this.
    #[inline(never)]
    pub(crate) fn capture_caller() -> Self {
        Self::from_frames(capture_frames(2))
    }

    fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    /// Recorded frames
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Iterate the frames from innermost to outermost
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Number of recorded frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render each frame with `style`, one per line
    #[must_use]
    pub fn render(&self, style: FrameStyle) -> String {
        self.frames
            .iter()
            .map(|frame| frame.render(style))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            for frame in self.frames.iter() {
                write!(f, "\n{frame:#}")?;
            }
            return Ok(());
        }

        f.write_str("[")?;
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{frame}")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.frames.iter()).finish()
    }
}

/// Walks the current stack and keeps the frames above `capture_frames`
/// itself, dropping `skip` more frames first.
#[cfg(feature = "full-backtrace")]
#[inline(never)]
fn capture_frames(skip: usize) -> Vec<Frame> {
    let anchor = capture_frames as fn(usize) -> Vec<Frame> as usize;
    let mut ips = Vec::with_capacity(MAX_FRAMES + ANCHOR_SEARCH_SLACK);
    let mut found_anchor = false;
    let mut seen = 0usize;

    backtrace::trace(|frame| {
        seen += 1;
        if !found_anchor {
            if frame.symbol_address() as usize == anchor {
                found_anchor = true;
                seen = 0;
                ips.clear();
                return true;
            }
            ips.push(frame.ip() as usize);
            return ips.len() < MAX_FRAMES + ANCHOR_SEARCH_SLACK;
        }
        if seen <= skip {
            return true;
        }
        ips.push(frame.ip() as usize);
        ips.len() < MAX_FRAMES
    });

    // Some unwinders cannot report symbol addresses; then the walk never
    // meets the anchor and only the topmost frames are kept.
    if !found_anchor {
        log::trace!("stack anchor not found, keeping {} raw frames", ips.len());
    }
    ips.truncate(MAX_FRAMES);
    ips.into_iter().map(Frame::new).collect()
}

#[cfg(not(feature = "full-backtrace"))]
fn capture_frames(_skip: usize) -> Vec<Frame> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_crate() {
        assert_eq!(short_name("errwrap::chain::wrap"), "chain::wrap");
        assert_eq!(short_name("main"), "main");
    }

    #[test]
    fn test_unresolvable_frame_is_unknown() {
        let frame = Frame::new(0);
        assert_eq!(frame.function_name(), "unknown");
        assert_eq!(frame.file_name(), "unknown");
        assert_eq!(frame.line_number(), 0);
        assert_eq!(frame.render(FrameStyle::Compact), "unknown");
        assert_eq!(frame.render(FrameStyle::FileLine), "unknown:0");
        assert_eq!(frame.render(FrameStyle::FunctionLine), "unknown\n\tunknown:0");
    }

    #[test]
    fn test_empty_trace_display() {
        let trace = StackTrace::default();
        assert!(trace.is_empty());
        assert_eq!(format!("{trace}"), "[]");
        assert_eq!(format!("{trace:#}"), "");
    }

    #[cfg(feature = "full-backtrace")]
    #[test]
    fn test_capture_is_bounded_and_restartable() {
        let trace = StackTrace::capture();
        assert!(!trace.is_empty());
        assert!(trace.len() <= MAX_FRAMES);

        let first: Vec<usize> = trace.iter().map(Frame::ip).collect();
        let second: Vec<usize> = trace.iter().map(Frame::ip).collect();
        assert_eq!(first, second);
    }

    #[inline(never)]
    fn capture_at_depth(depth: usize) -> StackTrace {
        if depth == 0 {
            StackTrace::capture()
        } else {
            let trace = capture_at_depth(depth - 1);
            std::hint::black_box(depth);
            trace
        }
    }

    #[cfg(feature = "full-backtrace")]
    #[test]
    fn test_capture_in_deep_recursion_stays_bounded() {
        let trace = capture_at_depth(200);
        assert_eq!(trace.len(), MAX_FRAMES);
        assert!(trace
            .iter()
            .any(|frame| frame.function_name().contains("capture_at_depth")));
    }
}
