use pretty_assertions::assert_eq;
use zsh_trace_studio::aggregator::{build_call_tree, CallTree};
use zsh_trace_studio::parser::{parse_trace_text, EventType, FrameEvent};

fn tree_for(log: &str) -> CallTree {
    build_call_tree(&parse_trace_text(log).entries)
}

/// Every prefix has at least as many opens as closes, every close matches
/// the innermost open frame and is not earlier than it
fn assert_well_nested(events: &[FrameEvent]) {
    let mut open: Vec<(usize, f64)> = Vec::new();

    for event in events {
        match event.event_type {
            EventType::OpenFrame => open.push((event.frame, event.at)),
            EventType::CloseFrame => {
                let (frame, opened) = open.pop().expect("close without open");
                assert_eq!(frame, event.frame);
                assert!(event.at >= opened, "negative duration for frame {frame}");
            }
        }
    }

    assert!(open.is_empty(), "{} frame(s) left open", open.len());
}

#[test]
fn test_worked_example() {
    let tree = tree_for(
        "\
+0mZ|1|100.0|funcA|a.sh|10> echo a
+0mZ|2|100.5|funcB|a.sh|20> echo b
+0mZ|1|101.0|funcA|a.sh|10> echo a2
",
    );

    let frames: Vec<(&str, u32)> = tree
        .frames
        .iter()
        .map(|f| (f.name.as_str(), f.line))
        .collect();
    assert_eq!(frames, vec![("funcA", 10), ("funcB", 20)]);

    assert_eq!(
        tree.events,
        vec![
            FrameEvent::open(0, 100.0),
            FrameEvent::open(1, 100.5),
            FrameEvent::close(1, 101.0),
            FrameEvent::close(0, 101.0),
            FrameEvent::open(0, 101.0),
            FrameEvent::close(0, 101.0),
        ]
    );

    let func_a = &tree.frames[0].executed_code;
    assert_eq!(func_a.len(), 2);
    assert_eq!(func_a[0].code, "echo a");
    assert_eq!(func_a[0].duration, 1.0);
    assert_eq!(func_a[1].code, "echo a2");
    assert_eq!(func_a[1].duration, 0.0);

    let func_b = &tree.frames[1].executed_code;
    assert_eq!(func_b[0].code, "echo b");
    assert_eq!(func_b[0].duration, 0.5);
}

#[test]
fn test_empty_input() {
    let tree = tree_for("");
    assert!(tree.events.is_empty());
    assert!(tree.frames.is_empty());
}

#[test]
fn test_recursion_accumulates_on_one_frame() {
    let tree = tree_for(
        "\
+0mZ|1|1.0|fib|f.zsh|2> fib 3
+0mZ|2|2.0|fib|f.zsh|2> fib 2
+0mZ|3|3.0|fib|f.zsh|2> fib 1
+0mZ|1|4.0|main|m.zsh|9> print done
",
    );

    assert_eq!(tree.frames.len(), 2);
    let durations: Vec<f64> = tree.frames[0]
        .executed_code
        .iter()
        .map(|c| c.duration)
        .collect();
    // Innermost call closes first
    assert_eq!(durations, vec![1.0, 2.0, 3.0]);
    assert_well_nested(&tree.events);
}

#[test]
fn test_unterminated_frames_closed_at_last_event() {
    let tree = tree_for(
        "\
+0mZ|1|1.0|main|m.zsh|1> source plugins.zsh
+0mZ|2|1.25|load|p.zsh|4> . ./slow.zsh
+0mZ|3|1.75|slow|s.zsh|1> sleep 1
",
    );

    let last = tree.events.last().unwrap();
    assert_eq!(last.event_type, EventType::CloseFrame);
    assert_eq!(last.at, 1.75);

    let closes_at_end = tree
        .events
        .iter()
        .filter(|e| e.event_type == EventType::CloseFrame && e.at == 1.75)
        .count();
    assert_eq!(closes_at_end, 3);
    assert_eq!(tree.frames[0].executed_code[0].duration, 0.75);
    assert_eq!(tree.frames[0].executed_code[0].code, "sleep 1");
    assert_well_nested(&tree.events);
}

#[test]
fn test_interleaved_subshell_output_is_well_nested() {
    let tree = tree_for(
        "\
+0mZ|1|10.000|main|m.zsh|1> ( worker ) &
+0mZ|2|10.300|worker|w.zsh|3> compute+0mZ|1|10.100|main|m.zsh|2> wait
+0mZ|3|10.200|helper|w.zsh|8> true
+0mZ|2|10.050|worker|w.zsh|1> setup
+0mZ|1|10.400|main|m.zsh|3> exit
garbage line
+0mZ|5|10.350|deep|d.zsh|1> jump
",
    );

    assert_well_nested(&tree.events);
    let times: Vec<f64> = tree.events.iter().map(|e| e.at).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}
