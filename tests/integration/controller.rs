use crate::common::mocks::{
    FakeSink, MockVoice, parts, parts_with_voice, quiet_notifier, voice_expecting_disconnects,
};
use crate::common::{fixtures, wait_until};
use crate::{assert_eq, assert_matches, rstest, test_utils};
use rusty_jukebox::player::{
    ControllerParts, MusicError, PlaybackController, PlayerPhase, SkipOutcome,
};
use std::sync::Arc;
use std::time::Duration;

const IDLE: Duration = Duration::from_secs(60);

fn spawn(sink: &Arc<FakeSink>) -> Arc<PlaybackController> {
    test_utils::init();
    PlaybackController::spawn(fixtures::guild(), parts(sink), fixtures::config(IDLE))
}

/// Spawn a controller and start playing `first`.
async fn playing(sink: &Arc<FakeSink>, first: &str) -> Arc<PlaybackController> {
    let controller = spawn(sink);
    controller.enqueue(fixtures::track(first)).unwrap();
    wait_until(|| controller.is_playing()).await;
    controller
}

#[tokio::test(start_paused = true)]
async fn test_plays_tracks_in_order() {
    let sink = FakeSink::new();
    let controller = spawn(&sink);

    for name in ["A", "B", "C"] {
        controller.enqueue(fixtures::track(name)).unwrap();
    }

    wait_until(|| sink.play_count() == 1).await;
    assert_eq!(controller.current_track().unwrap().title, "A");
    assert_eq!(controller.phase(), PlayerPhase::Playing);

    assert!(sink.finish_current(Ok(())));
    wait_until(|| sink.play_count() == 2).await;
    assert!(sink.finish_current(Ok(())));
    wait_until(|| sink.play_count() == 3).await;
    assert!(sink.finish_current(Ok(())));

    wait_until(|| controller.phase() == PlayerPhase::AwaitingTrack).await;
    assert_eq!(sink.played(), vec!["A", "B", "C"]);
    assert_eq!(controller.current_track(), None);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_removed_track_is_never_played() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;
    controller.enqueue(fixtures::track("B")).unwrap();
    controller.enqueue(fixtures::track("C")).unwrap();

    let removed = controller.remove_at(0).unwrap();
    assert_eq!(removed.title, "B");

    sink.finish_current(Ok(()));
    wait_until(|| sink.play_count() == 2).await;
    assert_eq!(sink.played(), vec!["A", "C"]);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_requester_skips_immediately() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;
    controller.enqueue(fixtures::track("B")).unwrap();

    assert_eq!(
        controller.vote_skip(fixtures::requester()).unwrap(),
        SkipOutcome::Skipped
    );

    wait_until(|| sink.play_count() == 2).await;
    assert_eq!(controller.current_track().unwrap().title, "B");
    assert_eq!(sink.stop_count(), 1);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_three_listeners_skip() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;

    assert_eq!(
        controller.vote_skip(fixtures::listener(1)).unwrap(),
        SkipOutcome::VoteAdded {
            votes: 1,
            required: 3
        }
    );
    assert_eq!(
        controller.vote_skip(fixtures::listener(2)).unwrap(),
        SkipOutcome::VoteAdded {
            votes: 2,
            required: 3
        }
    );
    assert_eq!(
        controller.vote_skip(fixtures::listener(3)).unwrap(),
        SkipOutcome::Skipped
    );

    wait_until(|| !controller.is_playing()).await;
    assert_eq!(controller.skip_votes(), 0);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_two_listeners_do_not_skip() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;

    controller.vote_skip(fixtures::listener(1)).unwrap();
    controller.vote_skip(fixtures::listener(2)).unwrap();
    assert_matches!(
        controller.vote_skip(fixtures::listener(2)),
        Ok(SkipOutcome::AlreadyVoted { votes: 2, .. })
    );

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(controller.is_playing());
    assert_eq!(controller.current_track().unwrap().title, "A");
    assert_eq!(controller.skip_votes(), 2);
    assert_eq!(sink.stop_count(), 0);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_votes_reset_for_next_track() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;
    controller.enqueue(fixtures::track("B")).unwrap();

    controller.vote_skip(fixtures::listener(1)).unwrap();
    sink.finish_current(Ok(()));
    wait_until(|| sink.play_count() == 2).await;

    assert_eq!(controller.skip_votes(), 0);
    assert_matches!(
        controller.vote_skip(fixtures::listener(1)),
        Ok(SkipOutcome::VoteAdded { votes: 1, .. })
    );

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_skip_without_track() {
    let sink = FakeSink::new();
    let controller = spawn(&sink);

    assert_matches!(
        controller.vote_skip(fixtures::requester()),
        Err(MusicError::NothingPlaying)
    );
    assert_matches!(controller.force_skip(), Err(MusicError::NothingPlaying));

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_force_skip() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;

    controller.force_skip().unwrap();
    wait_until(|| controller.phase() == PlayerPhase::AwaitingTrack).await;
    assert_eq!(sink.stop_count(), 1);

    controller.stop().await;
}

#[rstest]
#[case(0.0)]
#[case(0.35)]
#[case(1.0)]
#[tokio::test(start_paused = true)]
async fn test_volume_in_range(#[case] volume: f32) {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;

    controller.set_volume(volume).unwrap();
    assert_eq!(controller.volume(), volume);
    assert_eq!(sink.applied_volume(), Some(volume));

    controller.stop().await;
}

#[rstest]
#[case(-0.1)]
#[case(1.1)]
#[tokio::test(start_paused = true)]
async fn test_volume_out_of_range(#[case] volume: f32) {
    let sink = FakeSink::new();
    let controller = spawn(&sink);
    let before = controller.volume();

    assert_matches!(
        controller.set_volume(volume),
        Err(MusicError::VolumeOutOfRange(v)) if v == volume
    );
    assert_eq!(controller.volume(), before);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_volume_carries_to_next_track() {
    let sink = FakeSink::new();
    let controller = spawn(&sink);

    controller.set_volume(0.2).unwrap();
    assert_eq!(sink.applied_volume(), None);

    controller.enqueue(fixtures::track("A")).unwrap();
    wait_until(|| controller.is_playing()).await;
    assert_eq!(sink.applied_volume(), Some(0.2));

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_loop_replays_without_dequeuing() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;
    controller.enqueue(fixtures::track("B")).unwrap();
    controller.set_loop(true);

    sink.finish_current(Ok(()));
    wait_until(|| sink.play_count() == 2).await;
    assert_eq!(sink.played(), vec!["A", "A"]);
    assert_eq!(controller.queue().len(), 1);
    assert_eq!(controller.peek_queue().unwrap().title, "B");

    assert!(!controller.toggle_loop());
    sink.finish_current(Ok(()));
    wait_until(|| sink.play_count() == 3).await;
    assert_eq!(sink.played(), vec!["A", "A", "B"]);

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failing_looped_track_disables_loop() {
    let sink = FakeSink::failing();
    let controller = spawn(&sink);
    controller.set_loop(true);

    controller.enqueue(fixtures::track("A")).unwrap();
    controller.enqueue(fixtures::track("B")).unwrap();

    wait_until(|| sink.play_count() == 2).await;
    assert_eq!(sink.played(), vec!["A", "B"]);
    assert!(!controller.is_looping());

    // The loop survives normal endings once the stream works again
    sink.set_failing(false);
    controller.set_loop(true);
    controller.enqueue(fixtures::track("C")).unwrap();
    wait_until(|| controller.is_playing()).await;
    sink.finish_current(Ok(()));
    wait_until(|| sink.play_count() == 4).await;
    assert_eq!(sink.played(), vec!["A", "B", "C", "C"]);
    assert!(controller.is_looping());

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume() {
    let sink = FakeSink::new();
    let controller = spawn(&sink);
    assert_matches!(controller.pause(), Err(MusicError::NothingPlaying));

    controller.enqueue(fixtures::track("A")).unwrap();
    wait_until(|| controller.is_playing()).await;

    controller.pause().unwrap();
    assert!(controller.is_paused());
    assert!(sink.is_paused());

    controller.resume().unwrap();
    assert!(!controller.is_paused());
    assert!(!sink.is_paused());

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_shuffle_and_clear_keep_current_track() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;
    for name in ["B", "C", "D"] {
        controller.enqueue(fixtures::track(name)).unwrap();
    }

    controller.shuffle_queue();
    let mut queued: Vec<String> = controller
        .snapshot_queue()
        .into_iter()
        .map(|t| t.title)
        .collect();
    queued.sort();
    assert_eq!(queued, vec!["B", "C", "D"]);

    assert_eq!(controller.clear_queue(), 3);
    assert!(controller.queue().is_empty());
    assert_eq!(controller.current_track().unwrap().title, "A");

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;
    controller.enqueue(fixtures::track("B")).unwrap();

    controller.stop().await;
    controller.stop().await;

    assert_eq!(controller.phase(), PlayerPhase::Disconnected);
    assert!(controller.is_disconnected());
    assert!(controller.queue().is_empty());
    assert_eq!(controller.current_track(), None);
    assert_eq!(sink.stop_count(), 1);
    assert_matches!(
        controller.enqueue(fixtures::track("C")),
        Err(MusicError::NotConnected)
    );
}

#[tokio::test(start_paused = true)]
async fn test_idle_timeout_disconnects() {
    let sink = FakeSink::new();
    let controller = spawn(&sink);

    tokio::time::sleep(IDLE + Duration::from_secs(1)).await;
    wait_until(|| controller.is_disconnected()).await;
    assert_eq!(controller.phase(), PlayerPhase::Disconnected);

    // Already torn down, so this must not release voice a second time
    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_activity_resets_idle_timer() {
    let sink = FakeSink::new();
    let controller = spawn(&sink);

    tokio::time::sleep(IDLE / 2).await;
    controller.enqueue(fixtures::track("A")).unwrap();
    wait_until(|| controller.is_playing()).await;

    // A long track keeps the controller alive past the idle timeout
    tokio::time::sleep(IDLE * 2).await;
    assert!(controller.is_playing());

    sink.finish_current(Ok(()));
    wait_until(|| controller.phase() == PlayerPhase::AwaitingTrack).await;
    tokio::time::sleep(IDLE / 2).await;
    assert!(!controller.is_disconnected());

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_move_to_other_channel() {
    let sink = FakeSink::new();
    let mut voice = voice_expecting_disconnects(1);
    voice
        .expect_move_to()
        .withf(|channel| *channel == fixtures::text_channel())
        .times(1)
        .returning(|_| Ok(()));

    let controller = PlaybackController::spawn(
        fixtures::guild(),
        parts_with_voice(&sink, voice),
        fixtures::config(IDLE),
    );
    controller.move_to(fixtures::text_channel()).await.unwrap();

    controller.stop().await;
    assert_matches!(
        controller.move_to(fixtures::text_channel()).await,
        Err(MusicError::NotConnected)
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_voice_release_still_tears_down() {
    let sink = FakeSink::new();
    let mut voice = MockVoice::new();
    voice
        .expect_disconnect()
        .times(1)
        .returning(|| Err(MusicError::JoinError("gateway gone".to_string())));

    let controller = PlaybackController::spawn(
        fixtures::guild(),
        ControllerParts {
            sink: sink.clone(),
            voice: Arc::new(voice),
            notifier: Arc::new(quiet_notifier()),
            text_channel: fixtures::text_channel(),
        },
        fixtures::config(IDLE),
    );

    controller.stop().await;
    assert!(controller.is_disconnected());
}

#[tokio::test(start_paused = true)]
async fn test_skip_while_looping_replays_current() {
    let sink = FakeSink::new();
    let controller = playing(&sink, "A").await;
    controller.enqueue(fixtures::track("B")).unwrap();
    controller.set_loop(true);

    assert_eq!(
        controller.vote_skip(fixtures::requester()).unwrap(),
        SkipOutcome::Skipped
    );

    wait_until(|| sink.play_count() == 2).await;
    assert_eq!(sink.played(), vec!["A", "A"]);
    assert_eq!(controller.current_track().unwrap().title, "A");
    assert_eq!(controller.queue().len(), 1);
    assert_eq!(controller.peek_queue().unwrap().title, "B");

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_lost_voice_tears_down_instead_of_draining() {
    let sink = FakeSink::new();
    sink.set_disconnected(true);
    let controller = spawn(&sink);

    for name in ["A", "B", "C", "D", "E"] {
        controller.enqueue(fixtures::track(name)).unwrap();
    }

    wait_until(|| controller.is_disconnected()).await;
    assert_eq!(sink.play_count(), 0);
    assert_eq!(controller.phase(), PlayerPhase::Disconnected);
    assert!(controller.is_released());

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_play_refused_for_lost_voice_tears_down() {
    let sink = FakeSink::new();
    sink.set_rejecting(true);
    let controller = spawn(&sink);

    for name in ["A", "B", "C", "D", "E"] {
        controller.enqueue(fixtures::track(name)).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    wait_until(|| controller.is_disconnected()).await;
    assert_eq!(controller.phase(), PlayerPhase::Disconnected);
    assert_eq!(controller.current_track(), None);
    assert_matches!(
        controller.enqueue(fixtures::track("F")),
        Err(MusicError::NotConnected)
    );

    controller.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_enqueue_after_teardown_leaves_queue_empty() {
    let sink = FakeSink::new();
    let controller = spawn(&sink);
    controller.stop().await;

    assert_matches!(
        controller.enqueue(fixtures::track("A")),
        Err(MusicError::NotConnected)
    );
    assert!(controller.queue().is_empty());
    assert_eq!(sink.play_count(), 0);
}
