//! Rebuild call nesting from a flat, time-ordered list of trace entries.
//!
//! xtrace only reports a depth per statement, not explicit call/return
//! events. A statement at depth `d` ends every open statement at depth
//! `>= d`; a deeper statement is a child of the one before it.
//!
//! Example, one entry per line as `(depth, time) name`:
//! ```text
//! (1, 100.0) funcA   -> O funcA
//! (2, 100.5) funcB   -> O funcB
//! (1, 101.0) funcA   -> C funcB, C funcA, O funcA
//! ```

use crate::parser::schema::{ExecutedCode, Frame, FrameEvent};
use crate::parser::ParsedEntry;
use log::debug;
use std::collections::HashMap;

/// Events and the frame table they index into
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallTree {
    pub events: Vec<FrameEvent>,
    pub frames: Vec<Frame>,
}

impl CallTree {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// One open call instance
#[derive(Debug, Clone)]
struct StackEntry {
    frame_id: usize,
    level: u32,
    timestamp: f64,
    code: String,
}

/// Frame table plus the `(name, line)` -> id index
#[derive(Debug, Default)]
struct FrameTable {
    frames: Vec<Frame>,
    ids: HashMap<(String, u32), usize>,
}

impl FrameTable {
    fn id_for(&mut self, entry: &ParsedEntry) -> usize {
        let key = (entry.name.clone(), entry.line_number);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }

        let id = self.frames.len();
        self.frames
            .push(Frame::new(&entry.name, &entry.file, entry.line_number));
        self.ids.insert(key, id);
        id
    }

    fn record(&mut self, frame_id: usize, code: String, duration: f64) {
        // ids only ever come from id_for
        if let Some(frame) = self.frames.get_mut(frame_id) {
            frame.executed_code.push(ExecutedCode { code, duration });
        }
    }
}

/// Build open/close events and the frame table from ordered entries
///
/// **Public** - main entry point for call tree reconstruction
///
/// # Arguments
/// * `entries` - Trace entries sorted by timestamp
///
/// # Returns
/// A `CallTree` whose events are balanced and properly nested
///
/// # Algorithm
/// 1. Look up or allocate the frame for `(name, line)`
/// 2. Pop and close every open call at the same depth or deeper
/// 3. Open the current call and push it
/// 4. At the end, close whatever is left at the last event's time
pub fn build_call_tree(entries: &[ParsedEntry]) -> CallTree {
    debug!("Building call tree from {} entries", entries.len());

    let mut table = FrameTable::default();
    let mut events: Vec<FrameEvent> = Vec::with_capacity(entries.len() * 2);
    let mut stack: Vec<StackEntry> = Vec::new();

    for entry in entries {
        let frame_id = table.id_for(entry);

        // >= so that a sibling at the same depth closes its predecessor
        while stack.last().is_some_and(|top| top.level >= entry.level) {
            let Some(open) = stack.pop() else { break };
            table.record(open.frame_id, open.code, entry.timestamp - open.timestamp);
            events.push(FrameEvent::close(open.frame_id, entry.timestamp));
        }

        events.push(FrameEvent::open(frame_id, entry.timestamp));
        stack.push(StackEntry {
            frame_id,
            level: entry.level,
            timestamp: entry.timestamp,
            code: entry.code.clone(),
        });
    }

    close_unterminated(&mut stack, &mut table, &mut events, entries.last());

    debug!(
        "Built {} events over {} unique frames",
        events.len(),
        table.frames.len()
    );

    CallTree {
        events,
        frames: table.frames,
    }
}

/// Close calls still open when the trace ended (typically process exit)
///
/// The real end time is unknown, so every remaining call ends at the last
/// event's time and is labelled with the last entry's statement.
fn close_unterminated(
    stack: &mut Vec<StackEntry>,
    table: &mut FrameTable,
    events: &mut Vec<FrameEvent>,
    last_entry: Option<&ParsedEntry>,
) {
    let (Some(last_event), Some(last_entry)) = (events.last().copied(), last_entry) else {
        return;
    };

    if !stack.is_empty() {
        debug!("Closing {} unterminated frame(s) at {}", stack.len(), last_event.at);
    }

    while let Some(open) = stack.pop() {
        table.record(
            open.frame_id,
            last_entry.code.clone(),
            last_event.at - open.timestamp,
        );
        events.push(FrameEvent::close(open.frame_id, last_event.at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::EventType;

    fn entry(level: u32, timestamp: f64, name: &str, line: u32) -> ParsedEntry {
        ParsedEntry {
            level,
            timestamp,
            name: name.to_string(),
            file: "t.zsh".to_string(),
            line_number: line,
            code: format!("{name}:{line}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let tree = build_call_tree(&[]);
        assert!(tree.is_empty());
        assert!(tree.frames.is_empty());
    }

    #[test]
    fn test_single_entry_is_auto_closed() {
        let tree = build_call_tree(&[entry(1, 5.0, "main", 1)]);

        assert_eq!(
            tree.events,
            vec![FrameEvent::open(0, 5.0), FrameEvent::close(0, 5.0)]
        );
        assert_eq!(tree.frames[0].executed_code.len(), 1);
        assert_eq!(tree.frames[0].executed_code[0].duration, 0.0);
    }

    #[test]
    fn test_siblings_close_each_other() {
        let tree = build_call_tree(&[entry(1, 1.0, "a", 1), entry(1, 2.0, "b", 2)]);

        assert_eq!(
            tree.events,
            vec![
                FrameEvent::open(0, 1.0),
                FrameEvent::close(0, 2.0),
                FrameEvent::open(1, 2.0),
                FrameEvent::close(1, 2.0),
            ]
        );
        assert_eq!(tree.frames[0].executed_code[0].duration, 1.0);
    }

    #[test]
    fn test_shallower_entry_unwinds_all_deeper_frames() {
        let tree = build_call_tree(&[
            entry(1, 1.0, "a", 1),
            entry(2, 2.0, "b", 1),
            entry(3, 3.0, "c", 1),
            entry(1, 4.0, "d", 1),
        ]);

        let closes: Vec<usize> = tree
            .events
            .iter()
            .filter(|e| e.event_type == EventType::CloseFrame && e.at == 4.0)
            .map(|e| e.frame)
            .collect();
        // c, b, a unwound by d; d itself closed at the end
        assert_eq!(closes, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_depth_jump_is_accepted() {
        let tree = build_call_tree(&[entry(1, 1.0, "a", 1), entry(5, 2.0, "deep", 1)]);

        assert_eq!(
            tree.events,
            vec![
                FrameEvent::open(0, 1.0),
                FrameEvent::open(1, 2.0),
                FrameEvent::close(1, 2.0),
                FrameEvent::close(0, 2.0),
            ]
        );
    }

    #[test]
    fn test_unterminated_frames_use_last_code() {
        let mut last = entry(2, 3.0, "inner", 7);
        last.code = "exit 0".to_string();
        let tree = build_call_tree(&[entry(1, 1.0, "outer", 1), last]);

        let outer = &tree.frames[0];
        assert_eq!(outer.executed_code.len(), 1);
        assert_eq!(outer.executed_code[0].code, "exit 0");
        assert_eq!(outer.executed_code[0].duration, 2.0);
    }

    #[test]
    fn test_frames_keyed_by_name_and_line_only() {
        let mut other_file = entry(1, 2.0, "f", 3);
        other_file.file = "elsewhere.zsh".to_string();
        let tree = build_call_tree(&[entry(1, 1.0, "f", 3), other_file, entry(1, 3.0, "f", 4)]);

        assert_eq!(tree.frames.len(), 2);
        assert_eq!(tree.frames[0].file, "t.zsh");
        assert_eq!(tree.frames[0].executed_code.len(), 2);
    }
}
