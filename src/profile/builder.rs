//! Call tree profile builder.
//!
//! Replays open/close frame events into a tree of call paths with total and
//! self time per node, the structure flamegraph and timeline viewers draw.

use crate::parser::schema::{Frame, ValueUnit};
use crate::utils::error::ProfileError;

/// Frame identity and metadata passed to a builder
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInfo {
    /// Index in the frame table
    pub key: usize,
    pub name: String,
    pub file: String,
    pub line: u32,
}

impl FrameInfo {
    pub fn from_frame(key: usize, frame: &Frame) -> Self {
        Self {
            key,
            name: frame.name.clone(),
            file: frame.file.clone(),
            line: frame.line,
        }
    }
}

/// How profile values are rendered for people
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormatter {
    #[default]
    Raw,
    Time(ValueUnit),
}

impl ValueFormatter {
    pub fn format(&self, value: f64) -> String {
        match self {
            ValueFormatter::Raw => format!("{value:.2}"),
            ValueFormatter::Time(ValueUnit::Seconds) => format_seconds(value),
        }
    }
}

fn format_seconds(seconds: f64) -> String {
    let magnitude = seconds.abs();
    if magnitude >= 1.0 {
        format!("{seconds:.2}s")
    } else if magnitude >= 1e-3 {
        format!("{:.2}ms", seconds * 1e3)
    } else {
        format!("{:.2}µs", seconds * 1e6)
    }
}

/// Consumer of frame events
///
/// Calls must arrive in stack order: every `leave_frame` closes the most
/// recent unclosed `enter_frame`, and times never go backwards.
pub trait ProfileBuilder {
    type Profile;

    fn set_name(&mut self, name: &str);

    fn set_value_formatter(&mut self, formatter: ValueFormatter);

    fn enter_frame(&mut self, frame: &FrameInfo, at: f64) -> Result<(), ProfileError>;

    fn leave_frame(&mut self, frame: &FrameInfo, at: f64) -> Result<(), ProfileError>;

    fn build(self) -> Result<Self::Profile, ProfileError>;
}

/// One call path in the tree. The root has no frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTreeNode {
    pub frame: Option<FrameInfo>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,

    /// Time spent in this path including children
    pub total: f64,

    /// Time spent in this path excluding children
    pub self_time: f64,
}

impl CallTreeNode {
    fn new(frame: Option<FrameInfo>, parent: Option<usize>) -> Self {
        Self {
            frame,
            parent,
            children: Vec::new(),
            total: 0.0,
            self_time: 0.0,
        }
    }

    pub fn name(&self) -> &str {
        self.frame.as_ref().map_or("root", |f| f.name.as_str())
    }
}

/// Finished call tree profile
#[derive(Debug, Clone, PartialEq)]
pub struct CallTreeProfile {
    pub name: String,
    pub formatter: ValueFormatter,
    pub start_value: f64,
    pub end_value: f64,

    /// Arena of nodes; index 0 is the root
    pub nodes: Vec<CallTreeNode>,
}

impl CallTreeProfile {
    pub const ROOT: usize = 0;

    /// The root node, absent only for a hand-built profile with no nodes
    pub fn root(&self) -> Option<&CallTreeNode> {
        self.nodes.get(Self::ROOT)
    }

    /// Total time covered by all top-level calls
    pub fn total_weight(&self) -> f64 {
        self.root().map_or(0.0, |root| root.total)
    }

    /// Frame names from the outermost call down to `node`, root excluded
    pub fn path(&self, node: usize) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = Some(node);

        while let Some(index) = current {
            let Some(n) = self.nodes.get(index) else { break };
            if n.frame.is_some() {
                names.push(n.name());
            }
            current = n.parent;
        }

        names.reverse();
        names
    }
}

/// Builds a `CallTreeProfile` from frame events
#[derive(Debug)]
pub struct CallTreeProfileBuilder {
    name: String,
    formatter: ValueFormatter,
    nodes: Vec<CallTreeNode>,

    /// (node, time it was entered) for each open call
    open: Vec<(usize, f64)>,

    start_value: Option<f64>,
    last_value: f64,
}

impl Default for CallTreeProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CallTreeProfileBuilder {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            formatter: ValueFormatter::default(),
            nodes: vec![CallTreeNode::new(None, None)],
            open: Vec::new(),
            start_value: None,
            last_value: 0.0,
        }
    }

    fn advance(&mut self, at: f64) -> Result<(), ProfileError> {
        if self.start_value.is_some() && at < self.last_value {
            return Err(ProfileError::NonMonotonic {
                at,
                previous: self.last_value,
            });
        }
        self.start_value.get_or_insert(at);
        self.last_value = at;
        Ok(())
    }

    fn child_for(&mut self, parent: usize, frame: &FrameInfo) -> usize {
        let existing = self.nodes[parent].children.iter().copied().find(|&child| {
            self.nodes[child]
                .frame
                .as_ref()
                .is_some_and(|f| f.key == frame.key)
        });
        if let Some(child) = existing {
            return child;
        }

        let child = self.nodes.len();
        self.nodes
            .push(CallTreeNode::new(Some(frame.clone()), Some(parent)));
        self.nodes[parent].children.push(child);
        child
    }
}

impl ProfileBuilder for CallTreeProfileBuilder {
    type Profile = CallTreeProfile;

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_value_formatter(&mut self, formatter: ValueFormatter) {
        self.formatter = formatter;
    }

    fn enter_frame(&mut self, frame: &FrameInfo, at: f64) -> Result<(), ProfileError> {
        self.advance(at)?;

        let parent = self
            .open
            .last()
            .map_or(CallTreeProfile::ROOT, |&(node, _)| node);
        let node = self.child_for(parent, frame);
        self.open.push((node, at));
        Ok(())
    }

    fn leave_frame(&mut self, frame: &FrameInfo, at: f64) -> Result<(), ProfileError> {
        self.advance(at)?;

        let Some(&(node, entered)) = self.open.last() else {
            return Err(ProfileError::UnexpectedClose {
                frame: frame.key,
                at,
            });
        };

        let open_key = self.nodes[node].frame.as_ref().map_or(usize::MAX, |f| f.key);
        if open_key != frame.key {
            return Err(ProfileError::MismatchedClose {
                frame: frame.key,
                open: open_key,
                at,
            });
        }

        self.open.pop();
        self.nodes[node].total += at - entered;
        Ok(())
    }

    fn build(mut self) -> Result<CallTreeProfile, ProfileError> {
        if !self.open.is_empty() {
            return Err(ProfileError::UnclosedFrames(self.open.len()));
        }

        let root_total: f64 = self.nodes[CallTreeProfile::ROOT]
            .children
            .iter()
            .map(|&child| self.nodes[child].total)
            .sum();
        self.nodes[CallTreeProfile::ROOT].total = root_total;

        for index in 0..self.nodes.len() {
            let children: f64 = self.nodes[index]
                .children
                .iter()
                .map(|&child| self.nodes[child].total)
                .sum();
            let node = &mut self.nodes[index];
            node.self_time = (node.total - children).max(0.0);
        }

        Ok(CallTreeProfile {
            name: self.name,
            formatter: self.formatter,
            start_value: self.start_value.unwrap_or(0.0),
            end_value: self.last_value,
            nodes: self.nodes,
        })
    }
}
