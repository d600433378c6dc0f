use frames::stroke::{DraftStroke, Point, Tool};
use uuid::Uuid;

use super::*;

fn draft(tool: Tool, color: &str, points: &[(f64, f64)]) -> DraftStroke {
    DraftStroke {
        tool,
        color: color.into(),
        width: 5.0,
        points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
    }
}

#[test]
fn commit_appends_and_assigns_sequence() {
    let mut engine = HistoryEngine::new();
    let author = Uuid::new_v4();

    let s0 = engine
        .commit(draft(Tool::Brush, "#ff5733", &[(0.0, 0.0)]), author)
        .expect("commit");
    let s1 = engine
        .commit(draft(Tool::Brush, "#ff5733", &[(1.0, 1.0)]), author)
        .expect("commit");

    assert_eq!(s0.id, 0);
    assert_eq!(s1.id, 1);
    assert_eq!(s0.author_id, author);
    assert!(s0.ts > 0);
    assert_eq!(engine.snapshot().len(), 2);
}

#[test]
fn commit_grows_history_by_one_and_empties_redo() {
    let mut engine = HistoryEngine::new();
    let author = Uuid::new_v4();

    engine
        .commit(draft(Tool::Brush, "#ff5733", &[(0.0, 0.0), (1.0, 1.0)]), author)
        .expect("commit");
    assert!(engine.undo());
    assert_eq!(engine.redo_depth(), 1);

    let before = engine.snapshot().len();
    engine
        .commit(draft(Tool::Brush, "#33ff57", &[(2.0, 2.0)]), author)
        .expect("commit");

    assert_eq!(engine.snapshot().len(), before + 1);
    assert_eq!(engine.redo_depth(), 0);
}

#[test]
fn commit_rejects_empty_stroke() {
    let mut engine = HistoryEngine::new();
    let err = engine
        .commit(draft(Tool::Brush, "#ff5733", &[]), Uuid::new_v4())
        .expect_err("empty stroke must be rejected");
    assert!(matches!(err, HistoryError::InvalidStroke));
    assert!(engine.snapshot().is_empty());
}

#[test]
fn single_point_stroke_is_committed() {
    let mut engine = HistoryEngine::new();
    let stroke = engine
        .commit(draft(Tool::Brush, "#ff5733", &[(5.0, 5.0)]), Uuid::new_v4())
        .expect("a dot is a legal stroke");
    assert_eq!(stroke.points.len(), 1);
    assert_eq!(engine.snapshot().len(), 1);
}

#[test]
fn undo_then_redo_restores_history_exactly() {
    let mut engine = HistoryEngine::new();
    let author = Uuid::new_v4();
    engine
        .commit(draft(Tool::Brush, "#ff5733", &[(0.0, 0.0), (1.0, 2.0)]), author)
        .expect("commit");

    let before = engine.snapshot().to_vec();
    assert!(engine.undo());
    assert!(engine.redo());

    // Same id, points, and timestamp — not a re-commit.
    assert_eq!(engine.snapshot(), before.as_slice());
    assert_eq!(engine.redo_depth(), 0);
}

#[test]
fn undo_on_empty_history_is_a_no_op() {
    let mut engine = HistoryEngine::new();
    assert!(!engine.undo());
    assert!(engine.snapshot().is_empty());
    assert_eq!(engine.redo_depth(), 0);
}

#[test]
fn redo_on_empty_buffer_is_a_no_op() {
    let mut engine = HistoryEngine::new();
    engine
        .commit(draft(Tool::Brush, "#ff5733", &[(0.0, 0.0)]), Uuid::new_v4())
        .expect("commit");

    let before = engine.snapshot().to_vec();
    assert!(!engine.redo());
    assert_eq!(engine.snapshot(), before.as_slice());
}

#[test]
fn new_commit_permanently_drops_undone_strokes() {
    let mut engine = HistoryEngine::new();
    let author = Uuid::new_v4();

    let s1 = engine
        .commit(draft(Tool::Brush, "#ff5733", &[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]), author)
        .expect("commit S1");
    let s2 = engine
        .commit(draft(Tool::Eraser, "#000000", &[(1.0, 1.0)]), author)
        .expect("commit S2");

    assert!(engine.undo());
    assert_eq!(engine.snapshot(), &[s1.clone()]);
    assert_eq!(engine.redo_depth(), 1);

    let s3 = engine
        .commit(draft(Tool::Brush, "#3357ff", &[(9.0, 9.0)]), author)
        .expect("commit S3");

    // Redo buffer cleared: S2 is unrecoverable.
    assert_eq!(engine.redo_depth(), 0);
    assert_eq!(engine.snapshot(), &[s1, s3]);
    assert!(!engine.redo());
    assert!(engine.snapshot().iter().all(|s| s.id != s2.id));
}

#[test]
fn ids_stay_unique_after_undo_and_commit() {
    let mut engine = HistoryEngine::new();
    let author = Uuid::new_v4();

    engine
        .commit(draft(Tool::Brush, "#ff5733", &[(0.0, 0.0)]), author)
        .expect("commit");
    assert!(engine.undo());
    let next = engine
        .commit(draft(Tool::Brush, "#ff5733", &[(1.0, 1.0)]), author)
        .expect("commit");

    // The sequence never rewinds, so the replacement gets a fresh id.
    assert_eq!(next.id, 1);
}
