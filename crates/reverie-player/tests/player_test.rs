//! Player loop tests on paused tokio time.

use std::time::Duration;

use reverie_audio::domain::track::TrackId;
use reverie_narrative::domain::scene::SceneId;
use reverie_narrative::manifest::NarrativeManifest;
use reverie_player::driver::{Input, Player};
use reverie_player::renderer::TerminalRenderer;
use reverie_test_support::{BackendCall, RecordingBackend};
use tokio::io::BufReader;

fn player(backend: &RecordingBackend) -> Player<Vec<u8>> {
    let sequencer = NarrativeManifest::reference()
        .build(Box::new(backend.clone()))
        .unwrap();
    let mut player = Player::new(
        sequencer,
        TerminalRenderer::new(Vec::new()),
        Duration::from_millis(16),
    );
    player.start().unwrap();
    player
}

fn output(player: &Player<Vec<u8>>) -> String {
    String::from_utf8(player.renderer().writer().clone()).unwrap()
}

async fn advance_and_tick(player: &mut Player<Vec<u8>>, ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    player.tick().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_enter_at_gate_brings_in_the_intro() {
    // Arrange
    let backend = RecordingBackend::new();
    let mut player = player(&backend);

    // Act
    player.handle_input(Input::Advance).unwrap();
    let in_flight = player.sequencer().transition_in_flight();
    advance_and_tick(&mut player, 1200).await;

    // Assert
    assert!(in_flight);
    assert_eq!(player.sequencer().current_scene(), SceneId::Fireworks);
    assert_eq!(player.renderer().mounted(), Some(SceneId::Fireworks));
    assert!(output(&player).contains("~ ~ ~ fireworks ~ ~ ~"));
    assert!(backend.last_volume("chernova").is_some_and(|v| v > 0.0));
}

#[tokio::test(start_paused = true)]
async fn test_second_enter_during_dissolve_changes_nothing() {
    let backend = RecordingBackend::new();
    let mut player = player(&backend);

    player.handle_input(Input::Advance).unwrap();
    player.handle_input(Input::Advance).unwrap();
    advance_and_tick(&mut player, 1200).await;

    assert_eq!(player.sequencer().current_scene(), SceneId::Fireworks);
    assert_eq!(
        backend.count(|c| matches!(c, BackendCall::Play(t) if t.as_str() == "chernova")),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_timed_scene_advances_on_its_own() {
    // Arrange
    let backend = RecordingBackend::new();
    let mut player = player(&backend);
    player.handle_input(Input::Advance).unwrap();
    advance_and_tick(&mut player, 1200).await;

    // Act
    advance_and_tick(&mut player, 17_000).await;
    let started = player.sequencer().pending_target();
    advance_and_tick(&mut player, 1200).await;

    // Assert
    assert_eq!(started, Some(SceneId::Globe));
    assert_eq!(player.sequencer().current_scene(), SceneId::Globe);
    assert!(output(&player).contains("Happy birthday."));
}

#[tokio::test(start_paused = true)]
async fn test_restart_mid_story_is_refused_gently() {
    let backend = RecordingBackend::new();
    let mut player = player(&backend);

    let keep_running = player.handle_input(Input::Restart).unwrap();

    assert!(keep_running);
    assert_eq!(player.sequencer().current_scene(), SceneId::Gate);
    assert!(output(&player).contains("replay is available at the end"));
}

#[tokio::test(start_paused = true)]
async fn test_enter_on_forever_replays_from_the_intro() {
    // Arrange
    let backend = RecordingBackend::new();
    let mut player = player(&backend);
    for _ in 0..40 {
        if player.sequencer().current_scene() == SceneId::Forever {
            break;
        }
        player.handle_input(Input::Advance).unwrap();
        advance_and_tick(&mut player, 25_000).await;
    }
    assert_eq!(player.sequencer().current_scene(), SceneId::Forever);
    advance_and_tick(&mut player, 2_000).await;

    // Act
    player.handle_input(Input::Advance).unwrap();

    // Assert
    assert_eq!(player.sequencer().current_scene(), SceneId::Fireworks);
    assert!(!player.sequencer().transition_in_flight());
    assert_eq!(player.renderer().mounted(), Some(SceneId::Fireworks));
    assert_eq!(
        player.sequencer().audio().current_track(),
        Some(&TrackId::from("chernova"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_mute_toggle_is_reported() {
    let backend = RecordingBackend::new();
    let mut player = player(&backend);

    player.handle_input(Input::ToggleMute).unwrap();

    assert!(player.sequencer().audio().is_muted());
    assert!(output(&player).contains("[muted]"));
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_on_quit() {
    // Arrange
    let backend = RecordingBackend::new();
    let mut player = player(&backend);
    let input = BufReader::new(&b"\nm\nq\n"[..]);

    // Act
    player
        .run(input, std::future::pending::<()>())
        .await
        .unwrap();

    // Assert
    assert!(player.sequencer().audio().is_muted());
    assert_eq!(player.sequencer().pending_target(), Some(SceneId::Fireworks));
}

#[tokio::test(start_paused = true)]
async fn test_run_keeps_playing_after_input_closes() {
    // Arrange
    let backend = RecordingBackend::new();
    let mut player = player(&backend);
    let input = BufReader::new(&b"\n"[..]);

    // Act
    player
        .run(input, tokio::time::sleep(Duration::from_secs(20)))
        .await
        .unwrap();

    // Assert
    assert_eq!(player.sequencer().current_scene(), SceneId::Globe);
    assert_eq!(player.renderer().mounted(), Some(SceneId::Globe));
}
