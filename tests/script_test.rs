//! Tests for script parsing and execution

use rstest::rstest;

use tocedit::application::script::parse_line;
use tocedit::application::{
    ApplicationError, ApplicationResult, EditorSession, ScriptCommand, ScriptRunner, ScriptSink,
    SequentialGenerator, SessionOptions,
};
use tocedit::domain::{Forest, Node, NodeId, Position};

/// Records a snapshot of the forest on every show/export.
#[derive(Default)]
struct RecordingSink {
    shown: Vec<Forest>,
    exported: usize,
}

impl ScriptSink for RecordingSink {
    fn show(&mut self, session: &EditorSession) -> ApplicationResult<()> {
        self.shown.push(session.forest().clone());
        Ok(())
    }

    fn export(&mut self, _session: &EditorSession) -> ApplicationResult<()> {
        self.exported += 1;
        Ok(())
    }
}

fn session_with(forest: Forest) -> EditorSession {
    let ids = Box::new(SequentialGenerator::after("n", &forest));
    EditorSession::new(forest, ids, SessionOptions::default())
}

// ============================================================
// Parsing
// ============================================================

#[rstest]
#[case::blank("   ")]
#[case::comment("# just a note")]
fn given_blank_or_comment_when_parsing_then_none(#[case] line: &str) {
    assert_eq!(parse_line(line, 1).unwrap(), None);
}

#[test]
fn given_add_with_quoted_title_and_alias_when_parsing_then_splits_parts() {
    let cmd = parse_line(r#"add - "Part One" as p1"#, 1).unwrap();
    assert_eq!(
        cmd,
        Some(ScriptCommand::Add {
            parent: None,
            title: "Part One".to_string(),
            alias: Some("p1".to_string()),
        })
    );
}

#[test]
fn given_add_with_unquoted_words_when_parsing_then_joins_title() {
    let cmd = parse_line("add p1 Getting started", 1).unwrap();
    assert_eq!(
        cmd,
        Some(ScriptCommand::Add {
            parent: Some("p1".to_string()),
            title: "Getting started".to_string(),
            alias: None,
        })
    );
}

#[test]
fn given_move_when_parsing_then_reads_position() {
    let cmd = parse_line("MOVE a after b", 1).unwrap();
    assert_eq!(
        cmd,
        Some(ScriptCommand::Move {
            dragged: "a".to_string(),
            position: Position::After,
            target: "b".to_string(),
        })
    );
}

#[rstest]
#[case::unknown_verb("frobnicate x")]
#[case::bad_position("move a inside b")]
#[case::missing_target("move a before")]
#[case::delete_without_id("delete")]
#[case::show_with_args("show now")]
#[case::unterminated_quote(r#"rename a "oops"#)]
fn given_invalid_line_when_parsing_then_script_error_with_line(#[case] line: &str) {
    match parse_line(line, 7) {
        Err(ApplicationError::Script { line, .. }) => assert_eq!(line, 7),
        other => panic!("expected script error, got {other:?}"),
    }
}

// ============================================================
// Execution
// ============================================================

#[test]
fn given_script_when_running_then_builds_forest_through_aliases() {
    let mut session = session_with(Forest::new());
    let mut runner = ScriptRunner::new();
    let mut sink = RecordingSink::default();

    let report = runner
        .run(
            &mut session,
            r#"
# build a small book
add - "Part One" as p1
add p1 "Chapter 1" as c1
add p1 "Chapter 2" as c2
rename c1 "Getting started"
move c2 before c1
show
export
"#,
            &mut sink,
        )
        .unwrap();

    assert_eq!(report.applied, 5);
    assert_eq!(report.rejected, 0);
    assert_eq!(sink.shown.len(), 1);
    assert_eq!(sink.exported, 1);

    let p1 = runner.alias("p1").unwrap();
    let part = session.forest().find(p1).unwrap();
    let titles: Vec<_> = part.children.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Chapter 2", "Getting started"]);
}

#[test]
fn given_rejected_move_when_running_then_counts_and_continues() {
    let forest = Forest::from(vec![
        Node::new("1", "A").with_children(vec![Node::new("1-1", "B")]),
    ]);
    let mut session = session_with(forest.clone());
    let mut sink = RecordingSink::default();

    let report = ScriptRunner::new()
        .run(
            &mut session,
            "move 1 after 1-1\nmove ghost before 1\nrename nonexistent X\nshow",
            &mut sink,
        )
        .unwrap();

    assert_eq!(report.rejected, 2);
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.applied, 0);
    assert_eq!(sink.shown, vec![forest]);
}

#[test]
fn given_literal_ids_when_running_then_resolves_without_alias() {
    let forest = Forest::from(vec![Node::new("n1", "A"), Node::new("n2", "B")]);
    let mut session = session_with(forest);
    let mut sink = RecordingSink::default();

    ScriptRunner::new()
        .run(&mut session, "add n2 Child\ndelete n1", &mut sink)
        .unwrap();

    let roots = session.forest().roots();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].children[0].id, NodeId::from("n3"));
}

#[test]
fn given_add_under_unknown_parent_when_running_then_fails_with_line() {
    let mut session = session_with(Forest::new());
    let mut sink = RecordingSink::default();

    let err = ScriptRunner::new()
        .run(&mut session, "add - A\nadd ghost B", &mut sink)
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Script { line: 2, .. }));
    assert_eq!(session.forest().node_count(), 1);
}

#[test]
fn given_expansion_commands_when_running_then_updates_view_state() {
    let mut session = session_with(Forest::new());
    let mut sink = RecordingSink::default();

    ScriptRunner::new()
        .run(
            &mut session,
            "add - A as a\nadd a B as b\nadd b C\ncollapse-all\nexpand-all\ntoggle a",
            &mut sink,
        )
        .unwrap();

    assert!(!session.is_expanded(&NodeId::from("n1")));
    assert!(session.is_expanded(&NodeId::from("n2")));
}
