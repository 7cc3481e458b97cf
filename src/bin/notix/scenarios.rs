use std::time::Duration;

use notix::animation::Rect;
use notix::{
    ActionButton, AnimationMode, Position, PromiseOptions, Resolver, ToastManager, ToastOptions,
};
use tokio::time::sleep;
use tracing::info;

use super::cli::Scenario;

/// Bouton fictif qui déclenche les toasts ancrés.
const TRIGGER: Rect = Rect::new(560.0, 340.0, 160.0, 40.0);

pub async fn play(manager: &ToastManager, scenario: Scenario) {
    match scenario {
        Scenario::Timed => timed(manager).await,
        Scenario::Promise => promise(manager).await,
        Scenario::Morph => morph(manager).await,
        Scenario::Sticky => sticky(manager).await,
        Scenario::All => {
            timed(manager).await;
            promise(manager).await;
            morph(manager).await;
            sticky(manager).await;
        }
    }
}

/// Attend la fin des animations de sortie.
async fn settle(manager: &ToastManager) {
    sleep(manager.settings().exit_duration + Duration::from_millis(100)).await;
}

/// Toast de 5 s survolé de 1 s à 4 s : il part à 8 s.
async fn timed(manager: &ToastManager) {
    info!(scenario = "timed", "showing a 5s toast");
    let id = manager.info(
        ToastOptions::titled("Sync complete")
            .id("timed")
            .description("hover pauses the countdown")
            .duration(Duration::from_secs(5)),
    );

    sleep(Duration::from_secs(1)).await;
    manager.pause_timers();
    info!(scenario = "timed", remaining = ?manager.remaining(&id), "pointer entered, timers paused");

    sleep(Duration::from_secs(3)).await;
    manager.resume_timers();
    info!(scenario = "timed", remaining = ?manager.remaining(&id), "pointer left, timers resumed");

    sleep(Duration::from_secs(4)).await;
    settle(manager).await;
}

async fn promise(manager: &ToastManager) {
    info!(scenario = "promise", "tracking a save that succeeds");
    let saved = manager
        .promise(
            async {
                sleep(Duration::from_millis(200)).await;
                Ok::<_, String>(3_u32)
            },
            PromiseOptions::new(
                ToastOptions::titled("Saving").id("save"),
                Resolver::with(|files: &u32| {
                    ToastOptions::titled("Saved").description(format!("{files} files written"))
                }),
                Resolver::with(|err: &String| ToastOptions::titled("Save failed").description(err.clone())),
            )
            .action(|files: &u32| {
                ToastOptions::titled("Saved")
                    .description(format!("{files} files written"))
                    .action(ActionButton::new("Undo", || info!("undo requested")))
            }),
        )
        .await;
    info!(scenario = "promise", outcome = ?saved, "save settled");

    info!(scenario = "promise", "tracking an upload that fails");
    let uploaded = manager
        .promise(
            async {
                sleep(Duration::from_millis(300)).await;
                Err::<(), _>("connection reset".to_string())
            },
            PromiseOptions::new(
                ToastOptions::titled("Uploading"),
                ToastOptions::titled("Uploaded"),
                Resolver::with(|err: &String| ToastOptions::titled("Upload failed").description(err.clone())),
            ),
        )
        .await;
    info!(scenario = "promise", outcome = ?uploaded, "upload settled");

    sleep(manager.settings().default_duration.auto_dismiss_after().unwrap_or_default()).await;
    settle(manager).await;
}

async fn morph(manager: &ToastManager) {
    info!(scenario = "morph", "anchored toasts");
    manager.success(
        ToastOptions::titled("Copied")
            .animation(AnimationMode::Morph)
            .anchor_rect(TRIGGER)
            .duration(Duration::from_secs(2)),
    );
    sleep(Duration::from_millis(400)).await;
    manager.info(
        ToastOptions::titled("Sent to inbox")
            .animation(AnimationMode::Fly)
            .anchor_rect(TRIGGER)
            .position(Position::BottomCenter)
            .duration(Duration::from_secs(2)),
    );
    sleep(Duration::from_millis(400)).await;
    info!(scenario = "morph", "morph without an anchor falls back to slide");
    manager.warning(
        ToastOptions::titled("No anchor")
            .animation(AnimationMode::Morph)
            .duration(Duration::from_secs(2)),
    );

    sleep(Duration::from_secs(2)).await;
    settle(manager).await;
}

async fn sticky(manager: &ToastManager) {
    info!(scenario = "sticky", "persistent toasts and scoped clear");
    let pinned = manager.warning(
        ToastOptions::titled("Offline")
            .description("changes are kept locally")
            .persistent(),
    );
    manager.loading(ToastOptions::titled("Reconnecting").position(Position::BottomLeft));
    manager.error(
        ToastOptions::titled("Retry failed")
            .position(Position::BottomLeft)
            .duration(Duration::ZERO),
    );

    sleep(Duration::from_secs(1)).await;
    let cleared = manager.clear(Some(Position::BottomLeft));
    info!(scenario = "sticky", cleared = cleared.len(), "bottom-left stack cleared");

    sleep(Duration::from_secs(1)).await;
    manager.dismiss(&pinned);
    settle(manager).await;
}
