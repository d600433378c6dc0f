#![allow(clippy::float_cmp)]

use frames::participant::Participant;
use frames::stroke::{CommittedStroke, Point, Tool};
use uuid::Uuid;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn participant(id: Uuid) -> Participant {
    Participant { id, color: "#FF5733".into(), cursor: Point::default() }
}

fn committed(id: u64, author_id: Uuid, points: Vec<Point>) -> CommittedStroke {
    CommittedStroke {
        id,
        tool: Tool::Brush,
        color: "#ff5733".into(),
        width: 5.0,
        points,
        ts: 1_700_000_000_000,
        author_id,
    }
}

fn live(author_id: Uuid) -> LiveStroke {
    LiveStroke {
        author_id,
        tool: Tool::Brush,
        color: "#33ff57".into(),
        width: 3.0,
        points: vec![Point::new(0.0, 0.0)],
    }
}

fn has_cursor_move(actions: &[Action]) -> bool {
    actions
        .iter()
        .any(|a| matches!(a, Action::EmitCursorMove { .. }))
}

// =============================================================
// Network intake
// =============================================================

#[test]
fn apply_init_populates_replica_and_participants() {
    let mut core = EngineCore::new();
    let me = Uuid::new_v4();
    let peer = Uuid::new_v4();

    core.apply_init(
        participant(me),
        vec![participant(me), participant(peer)],
        vec![committed(0, peer, vec![Point::new(0.0, 0.0)])],
    );

    assert_eq!(core.self_id(), Some(me));
    assert!(core.participant(&peer).is_some());
    assert_eq!(core.replica.history().len(), 1);
    assert!(core.replica.take_dirty());
}

#[test]
fn remote_stroke_lifecycle_retires_overlay_without_duplication() {
    let mut core = EngineCore::new();
    let author = Uuid::new_v4();
    core.apply_participant_joined(participant(author));

    core.apply_remote_draw_start(live(author));
    for i in 1..=4 {
        core.apply_remote_draw_continue(&author, Point::new(f64::from(i), 0.0));
    }
    assert_eq!(
        core.replica.live_stroke(&author).expect("open stroke").points.len(),
        5
    );
    let _ = core.replica.take_dirty();

    // draw:end carries the full point list; the committed stroke arrives
    // with all k+1 points.
    let points: Vec<Point> = (0..=4).map(|i| Point::new(f64::from(i), 0.0)).collect();
    core.apply_stroke_added(committed(0, author, points));

    // Exactly one copy remains: the live overlay entry is gone and the
    // replica holds the committed stroke.
    assert!(core.replica.live_stroke(&author).is_none());
    assert_eq!(core.replica.history().len(), 1);
    assert_eq!(core.replica.history()[0].points.len(), 5);
    assert!(core.replica.take_dirty());
}

#[test]
fn history_update_rewrites_replica() {
    let mut core = EngineCore::new();
    let author = Uuid::new_v4();
    core.apply_stroke_added(committed(0, author, vec![Point::new(0.0, 0.0)]));
    core.apply_stroke_added(committed(1, author, vec![Point::new(1.0, 1.0)]));
    let _ = core.replica.take_dirty();

    core.apply_history_update(vec![committed(0, author, vec![Point::new(0.0, 0.0)])]);

    assert_eq!(core.replica.history().len(), 1);
    assert!(core.replica.take_dirty());
}

#[test]
fn participant_left_discards_presence_and_live_stroke() {
    let mut core = EngineCore::new();
    let author = Uuid::new_v4();
    core.apply_participant_joined(participant(author));
    core.apply_remote_draw_start(live(author));

    core.apply_participant_left(&author);

    // A disconnect mid-stroke is the only cleanup path for that overlay.
    assert!(core.participant(&author).is_none());
    assert!(core.replica.live_stroke(&author).is_none());
}

#[test]
fn cursor_update_tracks_known_participants_only() {
    let mut core = EngineCore::new();
    let known = Uuid::new_v4();
    core.apply_participant_joined(participant(known));

    core.apply_cursor_update(&known, 50.0, 60.0);
    assert_eq!(core.participant(&known).expect("known").cursor.x, 50.0);
    assert_eq!(core.participant(&known).expect("known").cursor.y, 60.0);

    // Unknown author: ignored, not created.
    let unknown = Uuid::new_v4();
    core.apply_cursor_update(&unknown, 1.0, 1.0);
    assert!(core.participant(&unknown).is_none());
}

// =============================================================
// Pointer input
// =============================================================

#[test]
fn pointer_down_opens_local_stroke_and_emits_start() {
    let mut core = EngineCore::new();
    core.set_color("#3357ff");
    core.set_width(8.0);

    let actions = core.pointer_down(10.0, 20.0);

    assert!(core.is_drawing());
    assert_eq!(core.replica.local().expect("draft open").points.len(), 1);
    assert_eq!(
        actions,
        vec![Action::EmitDrawStart {
            tool: Tool::Brush,
            color: "#3357ff".into(),
            width: 8.0,
            point: Point::new(10.0, 20.0),
        }]
    );
}

#[test]
fn pointer_move_without_drawing_emits_cursor_only() {
    let mut core = EngineCore::new();

    let actions = core.pointer_move(5.0, 5.0);

    assert_eq!(actions, vec![Action::EmitCursorMove { x: 5.0, y: 5.0 }]);
    assert!(core.replica.local().is_none());
}

#[test]
fn pointer_move_while_drawing_extends_draft_and_emits_continue() {
    let mut core = EngineCore::new();
    core.pointer_down(0.0, 0.0);

    let actions = core.pointer_move(1.0, 2.0);

    assert!(has_cursor_move(&actions));
    assert!(
        actions
            .iter()
            .any(|a| matches!(a, Action::EmitDrawContinue { x, y } if *x == 1.0 && *y == 2.0))
    );
    assert_eq!(core.replica.local().expect("draft open").points.len(), 2);
}

#[test]
fn pointer_up_emits_the_completed_draft() {
    let mut core = EngineCore::new();
    core.pointer_down(0.0, 0.0);
    for i in 1..=3 {
        core.pointer_move(f64::from(i), 0.0);
    }

    let actions = core.pointer_up();

    assert!(!core.is_drawing());
    assert!(core.replica.local().is_none());
    let [Action::EmitDrawEnd(draft)] = actions.as_slice() else {
        panic!("expected a single EmitDrawEnd, got {actions:?}");
    };
    assert_eq!(draft.points.len(), 4);
}

#[test]
fn pointer_up_without_drawing_emits_nothing() {
    let mut core = EngineCore::new();
    assert!(core.pointer_up().is_empty());
}

#[test]
fn eraser_pins_the_draft_color() {
    let mut core = EngineCore::new();
    core.set_color("#3357ff");
    core.set_tool(Tool::Eraser);

    let actions = core.pointer_down(0.0, 0.0);

    let [Action::EmitDrawStart { tool, color, .. }] = actions.as_slice() else {
        panic!("expected a single EmitDrawStart, got {actions:?}");
    };
    assert_eq!(*tool, Tool::Eraser);
    assert_eq!(color, "#000000");
    assert_eq!(core.replica.local().expect("draft open").color, "#000000");
}

// =============================================================
// Viewport / dirty flag
// =============================================================

#[test]
fn set_viewport_records_size_and_marks_dirty() {
    let mut core = EngineCore::new();
    let _ = core.replica.take_dirty();

    core.set_viewport(800.0, 600.0, 2.0);

    assert_eq!(core.viewport_width, 800.0);
    assert_eq!(core.viewport_height, 600.0);
    assert_eq!(core.dpr, 2.0);
    assert!(core.replica.take_dirty());
}

#[test]
fn dirty_flag_is_consumed_once_per_change() {
    let mut core = EngineCore::new();
    let _ = core.replica.take_dirty();

    core.apply_stroke_added(committed(0, Uuid::new_v4(), vec![Point::new(0.0, 0.0)]));

    assert!(core.replica.take_dirty());
    assert!(!core.replica.take_dirty());
}
