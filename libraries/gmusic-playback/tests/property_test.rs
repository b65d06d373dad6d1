//! Property-based tests for the playback controller
//!
//! Random command sequences against the simulated backend. Every property
//! checks a session invariant, not just that nothing panicked.

use gmusic_core::{Catalog, Track};
use gmusic_playback::{
    BoundaryPolicy, PlaybackController, PlaybackState, PlayerConfig, SimulatedBackend,
};
use proptest::prelude::*;
use std::sync::Arc;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Load(usize),
    Play,
    Pause,
    Toggle,
    Stop,
    Next,
    Previous,
    Seek(u64),
    Tick,
}

fn arbitrary_op(len: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..len).prop_map(Op::Load),
        Just(Op::Play),
        Just(Op::Pause),
        Just(Op::Toggle),
        Just(Op::Stop),
        Just(Op::Next),
        Just(Op::Previous),
        (0u64..400_000).prop_map(Op::Seek),
        Just(Op::Tick),
    ]
}

fn catalog(len: usize) -> Catalog {
    Catalog::new(
        (0..len)
            .map(|i| Track::new(format!("t{i}"), format!("Track {i}"), "Artist", format!("{i}.mp3")))
            .collect(),
    )
    .unwrap()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

async fn apply(controller: &mut PlaybackController, op: &Op) {
    let _ = match op {
        Op::Load(i) => controller.load_track(*i).await,
        Op::Play => controller.play().await,
        Op::Pause => controller.pause().await,
        Op::Toggle => controller.toggle_play_pause().await,
        Op::Stop => controller.stop().await,
        Op::Next => controller.skip_to_next().await,
        Op::Previous => controller.skip_to_previous().await,
        Op::Seek(ms) => controller.seek(*ms).await,
        Op::Tick => controller.tick().await.map(|_| ()),
    };
}

// ===== Property Tests =====

proptest! {
    /// Loading any valid index leaves exactly that track loaded, paused, at zero
    #[test]
    fn load_track_always_resets_session(
        len in 1usize..8,
        ops in prop::collection::vec(any::<prop::sample::Index>(), 1..20),
    ) {
        runtime().block_on(async {
            let backend = SimulatedBackend::new().with_default_duration(120_000);
            let mut controller =
                PlaybackController::new(catalog(len), Arc::new(backend.clone()), PlayerConfig::default());

            for pick in ops {
                let index = pick.index(len);
                controller.play().await.unwrap();
                controller.load_track(index).await.unwrap();

                prop_assert_eq!(controller.current_index(), index);
                prop_assert_eq!(controller.state(), PlaybackState::Paused);
                prop_assert_eq!(controller.position_ms(), 0);
                prop_assert_eq!(backend.live_resources(), 1);
            }
            Ok(())
        })?;
    }

    /// Index stays in range and at most one resource is ever alive
    #[test]
    fn random_commands_keep_session_consistent(
        len in 1usize..6,
        clamp in any::<bool>(),
        ops in (1usize..6).prop_flat_map(|len| prop::collection::vec(arbitrary_op(len), 1..40)),
    ) {
        let boundary = if clamp { BoundaryPolicy::Clamp } else { BoundaryPolicy::Wrap };
        let config = PlayerConfig { boundary, ..PlayerConfig::default() };

        runtime().block_on(async {
            let backend = SimulatedBackend::new().with_default_duration(180_000);
            let mut controller = PlaybackController::new(catalog(len), Arc::new(backend.clone()), config);
            controller.mount().await.unwrap();

            for op in &ops {
                // Generated loads may target a longer catalog; those must be rejected
                apply(&mut controller, op).await;

                prop_assert!(controller.current_index() < len);
                prop_assert!(backend.live_resources() <= 1);
                prop_assert_eq!(controller.is_loaded(), controller.state().is_loaded());
                prop_assert!(controller.position_ms() <= controller.duration_ms());
            }
            Ok(())
        })?;
    }

    /// Toggling twice is the identity on the playing flag
    #[test]
    fn toggle_twice_is_identity(start_playing in any::<bool>(), index in 0usize..4) {
        runtime().block_on(async {
            let backend = SimulatedBackend::new().with_default_duration(60_000);
            let mut controller =
                PlaybackController::new(catalog(4), Arc::new(backend), PlayerConfig::default());
            controller.load_track(index).await.unwrap();
            if start_playing {
                controller.play().await.unwrap();
            }

            let before = controller.is_playing();
            controller.toggle_play_pause().await.unwrap();
            prop_assert_ne!(controller.is_playing(), before);
            controller.toggle_play_pause().await.unwrap();
            prop_assert_eq!(controller.is_playing(), before);
            prop_assert_eq!(controller.current_index(), index);
            Ok(())
        })?;
    }

    /// Seeks never leave the position past the duration
    #[test]
    fn seek_is_bounded_by_duration(duration in 1u64..600_000, target in any::<u64>()) {
        runtime().block_on(async {
            let backend = SimulatedBackend::new().with_default_duration(duration);
            let mut controller =
                PlaybackController::new(catalog(1), Arc::new(backend), PlayerConfig::default());
            controller.mount().await.unwrap();

            controller.seek(target).await.unwrap();
            prop_assert_eq!(controller.position_ms(), target.min(duration));
            prop_assert_eq!(controller.state(), PlaybackState::Paused);
            Ok(())
        })?;
    }
}
