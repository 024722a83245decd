// Quick demonstration of the rhythm editing engine
// Run with: RUST_LOG=debug cargo run --bin demo_editor_session

use rhythm_builder::project::{ProjectLoadOptions, ProjectManager};
use rhythm_builder::{
    EditCommand, EditMode, EditorConfig, EditorSession, NotificationKind, QuantizeLevel,
    drain_notifications,
};

fn print_timeline(session: &EditorSession) {
    for (index, cell) in session.project().rhythm.iter().enumerate() {
        println!(
            "   [{}] {:>7.4} +{:.4} bars (vel {})",
            index,
            cell.position(),
            cell.duration(),
            cell.velocity()
        );
    }
    println!("   rangehead: {:.4}", session.rangehead());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("🥁 Rhythm Builder - Editing Session Demo");
    println!("========================================");

    let config = EditorConfig::from_ron_str("(history_limit: Some(64), default_tempo: 100.0)")?;
    let manager = ProjectManager::new();
    let mut project = manager.create_new_project("Demo Rhythm");
    project.tempo = config.tempo();

    let (mut session, mut notifications) = EditorSession::new(project, config);

    // Build a simple groove
    session.apply_all([
        EditCommand::AddCell { duration: Some(0.25) },
        EditCommand::AddCell { duration: Some(0.125) },
        EditCommand::AddRest { duration: 0.125 },
        EditCommand::AddCell { duration: Some(0.5) },
    ]);
    println!("\n✅ Added cells:");
    print_timeline(&session);

    // Drag a cell on top of its neighbour, then drop it
    session.apply(EditCommand::UpdateCell {
        index: 2,
        position: 0.3,
        duration: 0.5,
    });
    session.apply(EditCommand::MoveCell {
        index: 2,
        position: 0.3,
    });
    println!("\n↔️  After moving cell 2 onto cell 1:");
    print_timeline(&session);

    // Quantize with a continuous gesture
    session.apply(EditCommand::BeginQuantize);
    for level in QuantizeLevel::ALL {
        session.apply(EditCommand::PreviewQuantize { level });
    }
    session.apply(EditCommand::EndQuantize);
    println!("\n📏 Quantized to 1/16:");
    print_timeline(&session);

    // Record two taps at the rangehead
    session.apply(EditCommand::SetMode(EditMode::Record));
    let mut recorder = session.tap_recorder();
    session.apply_all(recorder.tap_down(0.0));
    session.apply_all(recorder.tap_up(0.3));
    session.apply_all(recorder.tap_down(0.6));
    session.apply_all(recorder.finalize_recording(0.9));
    println!("\n🎙️  Recorded at {}:", recorder.tempo());
    print_timeline(&session);

    // Snapshots
    session.apply(EditCommand::CaptureSnapshot);
    session.apply(EditCommand::ClearAll);
    session.apply(EditCommand::RestoreSnapshot { index: 0 });
    if let Some(thumbnail) = session.snapshot_thumbnail(0) {
        println!(
            "\n📸 Snapshot restored, thumbnail {}x{} px",
            thumbnail.side(),
            thumbnail.side()
        );
    }

    // History
    let undone = session.apply_all([EditCommand::Undo, EditCommand::Undo]);
    println!(
        "\n↩️  Undid {} steps (undo depth {}, redo depth {})",
        undone,
        session.history().undo_count(),
        session.history().redo_count()
    );
    session.apply_all([EditCommand::Redo, EditCommand::Redo]);

    let drained = drain_notifications(&mut notifications);
    let history_updates = drained
        .iter()
        .filter(|n| matches!(n.kind, NotificationKind::HistoryChanged { .. }))
        .count();
    println!(
        "\n🔔 {} notifications ({} history updates)",
        drained.len(),
        history_updates
    );

    // Save and reload
    let project_path = std::env::temp_dir().join("demo_rhythm.json");
    let project = session.into_project();
    manager.save_project(&project, &project_path)?;
    let loaded = manager.load_project(&project_path, &ProjectLoadOptions::default())?;
    assert_eq!(project.cell_count(), loaded.cell_count());
    assert_eq!(project.snapshot_data.len(), loaded.snapshot_data.len());
    println!("\n💾 Saved and reloaded {}", project_path.display());

    std::fs::remove_file(&project_path)?;
    println!("\n🎉 Demo completed successfully!");

    Ok(())
}
