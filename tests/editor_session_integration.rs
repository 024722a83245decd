//! End-to-end editing scenarios
//!
//! Drives `EditorSession` the way the UI does: a stream of commands in, a
//! stream of notifications out.

use rhythm_builder::command::{RhythmAction, ToolbarProps};
use rhythm_builder::sequencer::{Arp, ArpPattern, SUBBEAT, is_overlap_free};
use rhythm_builder::{
    CommandOutcome, EditCommand, EditMode, EditorConfig, EditorSession, NotificationKind,
    ProjectData, QuantizeLevel, RhythmCell, drain_notifications,
};

fn spans(session: &EditorSession) -> Vec<(f64, f64)> {
    session
        .project()
        .rhythm
        .iter()
        .map(|c| (c.position(), c.duration()))
        .collect()
}

fn kinds(rx: &mut rhythm_builder::messaging::NotificationConsumer) -> Vec<NotificationKind> {
    drain_notifications(rx).into_iter().map(|n| n.kind).collect()
}

#[test]
fn test_build_edit_and_walk_history() {
    let (mut session, _rx) = EditorSession::new(ProjectData::new("Groove"), EditorConfig::default());

    session.apply(EditCommand::AddCell { duration: Some(0.25) });
    session.apply(EditCommand::AddCell { duration: Some(0.25) });
    session.apply(EditCommand::AddRest { duration: 0.5 });
    session.apply(EditCommand::AddCell { duration: Some(1.0) });
    let built = session.project().timeline_state();
    assert_eq!(spans(&session), vec![(0.0, 0.25), (0.25, 0.25), (1.0, 1.0)]);
    assert_eq!(session.rangehead(), 2.0);

    // Drop the last cell on top of the first one
    session.apply(EditCommand::MoveCell {
        index: 2,
        position: 0.0,
    });
    assert!(is_overlap_free(&session.project().rhythm));
    assert_eq!(spans(&session), vec![(0.0, 0.25), (0.25, 1.0), (1.25, 0.25)]);
    assert_eq!(session.rangehead(), 1.5);

    // Undo brings back the exact state before the move
    assert!(session.apply(EditCommand::Undo).is_applied());
    assert_eq!(session.project().timeline_state(), built);

    // Redo replays it
    session.apply(EditCommand::Redo);
    assert_eq!(session.rangehead(), 1.5);

    // A new edit after undo discards the redo branch
    session.apply(EditCommand::Undo);
    session.apply(EditCommand::DeleteCell { index: 0 });
    assert!(!session.history().can_redo());
    assert_eq!(session.apply(EditCommand::Redo), CommandOutcome::NoOp);
}

#[test]
fn test_history_round_trip_to_opening_state() {
    let mut project = ProjectData::new("Existing");
    project.rhythm.push(RhythmCell::new(0.0, 0.5, 90));
    project.duration = 0.5;
    let opening = project.timeline_state();

    let (mut session, _rx) = EditorSession::new(project, EditorConfig::default());
    session.apply_all([
        EditCommand::AddCell { duration: Some(0.25) },
        EditCommand::ResizeCell {
            index: 0,
            duration: 1.0,
        },
        EditCommand::Quantize {
            level: QuantizeLevel::Bar,
        },
        EditCommand::ClearAll,
    ]);

    let mut steps = 0;
    while session.apply(EditCommand::Undo).is_applied() {
        steps += 1;
    }
    assert_eq!(steps, 4);
    assert_eq!(session.project().timeline_state(), opening);
}

#[test]
fn test_snapshot_isolation() {
    let (mut session, _rx) = EditorSession::new(ProjectData::new("Snap"), EditorConfig::default());
    session.apply(EditCommand::AddCell { duration: Some(0.5) });
    session.apply(EditCommand::CaptureSnapshot);
    let captured = session.project().snapshot_data.get(0).unwrap().state.clone();

    // Edits after capture do not reach the snapshot
    session.apply(EditCommand::ResizeCell {
        index: 0,
        duration: 2.0,
    });
    session.apply(EditCommand::AddCell { duration: Some(0.25) });
    assert_eq!(session.project().snapshot_data.get(0).unwrap().state, captured);

    // Edits after restore do not reach it either
    session.apply(EditCommand::RestoreSnapshot { index: 0 });
    assert_eq!(session.project().timeline_state(), captured);
    session.apply(EditCommand::MoveCell {
        index: 0,
        position: 3.0,
    });
    assert_eq!(session.project().snapshot_data.get(0).unwrap().state, captured);

    // Undo does not touch the store
    session.apply(EditCommand::DeleteSnapshot { index: 0 });
    session.apply(EditCommand::Undo);
    assert!(session.project().snapshot_data.is_empty());
}

#[test]
fn test_restore_clears_selection() {
    let (mut session, mut rx) =
        EditorSession::new(ProjectData::new("Snap"), EditorConfig::default());
    session.apply(EditCommand::AddCell { duration: Some(0.5) });
    session.apply(EditCommand::CaptureSnapshot);
    session.apply(EditCommand::SelectCell { index: 0 });
    kinds(&mut rx);

    session.apply(EditCommand::RestoreSnapshot { index: 0 });
    assert!(session.selected_cell().is_none());
    let seen = kinds(&mut rx);
    assert!(seen.contains(&NotificationKind::ToolbarChanged {
        mode: EditMode::Rhythm
    }));
    assert!(seen.contains(&NotificationKind::DataChanged { reload: true }));
}

#[test]
fn test_quantize_gesture_defers_history() {
    let mut project = ProjectData::new("Loose");
    project.rhythm.push(RhythmCell::new(0.05, 0.2, 100));
    project.rhythm.push(RhythmCell::new(0.3, 0.2, 100));
    project.duration = 0.5;
    let (mut session, mut rx) = EditorSession::new(project, EditorConfig::default());
    kinds(&mut rx);

    session.apply(EditCommand::BeginQuantize);
    for level in QuantizeLevel::ALL {
        session.apply(EditCommand::PreviewQuantize { level });
    }
    // Deleting mid-gesture is not recorded and does not reload
    session.apply(EditCommand::DeleteCell { index: 1 });
    assert_eq!(session.history().undo_count(), 1);

    let during = kinds(&mut rx);
    assert!(
        !during
            .iter()
            .any(|k| matches!(k, NotificationKind::HistoryChanged { .. }))
    );
    assert!(during.contains(&NotificationKind::DataChanged { reload: false }));

    session.apply(EditCommand::EndQuantize);
    assert_eq!(session.history().undo_count(), 2);
    assert_eq!(
        kinds(&mut rx),
        vec![
            NotificationKind::HistoryChanged {
                can_undo: true,
                can_redo: false
            },
            NotificationKind::DataChanged { reload: true },
        ]
    );

    // Subbeat preview computed from the origin, not from the Beat preview
    assert_eq!(spans(&session), vec![(0.0625, 0.1875)]);
}

#[test]
fn test_recording_flow_with_tap_recorder() {
    let (mut session, _rx) = EditorSession::new(ProjectData::new("Taps"), EditorConfig::default());
    session.apply(EditCommand::SetMode(EditMode::Record));

    // 120 BPM: one bar = 2 seconds
    let mut recorder = session.tap_recorder();
    session.apply_all(recorder.tap_down(0.0));
    session.apply_all(recorder.tap_hold(0.25));
    assert_eq!(session.project().rhythm[0].duration(), 0.125);
    session.apply_all(recorder.tap_up(0.5));
    session.apply_all(recorder.tap_down(1.0));

    match session.toolbar_props() {
        ToolbarProps::Record(props) => assert!(props.is_recording),
        other => panic!("unexpected props {:?}", other),
    }
    // Nothing is recorded in history until the pass ends
    assert_eq!(session.history().undo_count(), 1);

    session.apply_all(recorder.finalize_recording(2.0));
    assert!(!session.is_recording());
    assert_eq!(spans(&session), vec![(0.0, 0.25), (0.5, 0.5)]);
    assert_eq!(session.rangehead(), 1.0);
    assert_eq!(session.history().undo_count(), 2);

    // One undo removes the whole pass
    session.apply(EditCommand::Undo);
    assert!(session.project().is_empty());
}

#[test]
fn test_stale_indices_are_ignored() {
    let (mut session, mut rx) =
        EditorSession::new(ProjectData::new("Stale"), EditorConfig::default());
    session.apply(EditCommand::AddCell { duration: Some(0.25) });
    kinds(&mut rx);

    let stale = [
        EditCommand::UpdateCell {
            index: 1,
            position: 0.0,
            duration: 1.0,
        },
        EditCommand::MoveCell {
            index: 1,
            position: 0.0,
        },
        EditCommand::ResizeCell {
            index: 9,
            duration: 1.0,
        },
        EditCommand::DeleteCell { index: 1 },
        EditCommand::SelectCell { index: 1 },
        EditCommand::RestoreSnapshot { index: 0 },
        EditCommand::DeleteSnapshot { index: 3 },
    ];
    assert_eq!(session.apply_all(stale), 0);
    assert!(kinds(&mut rx).is_empty());
    assert_eq!(session.history().undo_count(), 2);
}

#[test]
fn test_toolbar_modes() {
    let (mut session, _rx) = EditorSession::new(ProjectData::new("Modes"), EditorConfig::default());
    session.apply(EditCommand::AddCell { duration: Some(0.25) });

    match session.toolbar_props() {
        ToolbarProps::Rhythm(props) => assert_eq!(props.action, RhythmAction::AddRhythm),
        other => panic!("unexpected props {:?}", other),
    }

    session.apply(EditCommand::SelectCell { index: 0 });
    assert_eq!(session.toolbar_props().title(), "Edit Rhythm");

    session.apply(EditCommand::SetMode(EditMode::Arp));
    session.apply(EditCommand::SetArp {
        arp: Some(Arp::new(ArpPattern::UpDown, 2, 9)),
    });
    match session.toolbar_props() {
        ToolbarProps::Arp(props) => {
            let arp = props.arp.unwrap();
            assert_eq!(arp.pattern, ArpPattern::UpDown);
            assert_eq!(arp.octaves, 4);
        }
        other => panic!("unexpected props {:?}", other),
    }

    session.apply(EditCommand::SetMode(EditMode::Snapshots));
    session.apply(EditCommand::CaptureSnapshot);
    session.apply(EditCommand::SetSnapshotTriggerChannel { cc: 200 });
    match session.toolbar_props() {
        ToolbarProps::Snapshots(props) => {
            assert_eq!(props.names, vec!["Snapshot 1".to_string()]);
            assert_eq!(props.cc, 127);
        }
        other => panic!("unexpected props {:?}", other),
    }
}

#[test]
fn test_rangehead_grid_picker() {
    let mut project = ProjectData::new("Grid");
    project.rhythm.push(RhythmCell::new(0.0, 1.0, 100));
    project.duration = 1.3;
    let (mut session, _rx) = EditorSession::new(project, EditorConfig::default());

    let points = session.rangehead_snap_points();
    assert_eq!(points.len(), 17);
    assert_eq!(points[0].label, "2");
    assert_eq!(points[1].label, "2.1.2");
    assert_eq!(points[4].label, "2.2");
    assert_eq!(points[16].label, "3");

    session.apply(EditCommand::SnapRangeheadToGrid {
        position: points[5].position,
    });
    assert_eq!(session.rangehead(), 1.0 + 5.0 * SUBBEAT);

    // New cells start at the picked point
    session.apply(EditCommand::AddCell { duration: Some(0.25) });
    assert_eq!(session.project().rhythm[1].position(), 1.3125);
}

#[test]
fn test_history_limit_from_config() {
    let config = EditorConfig::from_ron_str("(history_limit: Some(3))").unwrap();
    let (mut session, _rx) = EditorSession::new(ProjectData::new("Limited"), config);

    for _ in 0..10 {
        session.apply(EditCommand::AddCell { duration: Some(0.25) });
    }
    assert_eq!(session.history().undo_count(), 3);
    assert_eq!(session.apply_all([EditCommand::Undo, EditCommand::Undo, EditCommand::Undo]), 2);
    assert_eq!(session.project().cell_count(), 8);
}

#[test]
fn test_snapshot_thumbnail() {
    let (mut session, _rx) = EditorSession::new(ProjectData::new("Thumb"), EditorConfig::default());
    session.apply(EditCommand::AddCell { duration: Some(1.0) });
    session.apply(EditCommand::CaptureSnapshot);

    let thumbnail = session.snapshot_thumbnail(0).unwrap();
    let style = &session.config().thumbnail;
    assert_eq!(thumbnail.side(), 100);
    assert_eq!(thumbnail.pixel(50, 2), Some(style.background));
    assert_eq!(thumbnail.pixel(50, 50), Some(style.fill));
    assert!(session.snapshot_thumbnail(1).is_none());
}
