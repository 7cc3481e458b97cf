use std::collections::HashSet;

use async_channel::Receiver;
use notix::animation::{Keyframe, Motion, Phase, Rect, strategy_for};
use notix::{Lifecycle, Position, Snapshot, Toast, ToastId, ToastManager};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use super::cli::SnapshotFormat;

const VIEWPORT_WIDTH: f32 = 1280.0;
const VIEWPORT_HEIGHT: f32 = 720.0;
const TOAST_WIDTH: f32 = 356.0;
const TOAST_HEIGHT: f32 = 64.0;
const GAP: f32 = 14.0;
const MARGIN: f32 = 24.0;

/// Rendu console : affiche chaque frame, joue l'entrée et la sortie une seule
/// fois par instance et signale le premier affichage au moteur.
pub struct Renderer {
    manager: ToastManager,
    format: SnapshotFormat,
    frame: u64,
    exits_played: HashSet<Uuid>,
}

#[derive(Serialize)]
struct Frame<'a> {
    frame: u64,
    toasts: Vec<notix::toast::ToastView<'a>>,
    motions: Vec<MotionEvent<'a>>,
}

#[derive(Serialize)]
struct MotionEvent<'a> {
    id: &'a ToastId,
    phase: Phase,
    strategy: &'static str,
    motion: Motion,
}

impl Renderer {
    pub fn new(manager: ToastManager, format: SnapshotFormat) -> Self {
        Self {
            manager,
            format,
            frame: 0,
            exits_played: HashSet::new(),
        }
    }

    pub async fn run(mut self, rx: Receiver<Snapshot>) {
        while let Ok(snapshot) = rx.recv().await {
            self.draw(&snapshot);
        }
        debug!(frames = self.frame, "renderer stopped");
    }

    fn draw(&mut self, snapshot: &Snapshot) {
        self.frame += 1;
        let placed = layout(snapshot);
        let motions = self.motions(&placed);

        let rendered = match self.format {
            SnapshotFormat::Text => Ok(render_text(self.frame, &placed, &motions)),
            SnapshotFormat::Json => serde_json::to_string(&Frame {
                frame: self.frame,
                toasts: snapshot.iter().map(Toast::view).collect(),
                motions,
            }),
        };
        match rendered {
            Ok(text) => println!("{text}"),
            Err(err) => error!(error = %err, frame = self.frame, "failed to render frame"),
        }

        for (toast, _) in placed {
            if toast.lifecycle == Lifecycle::Entering {
                self.manager.mark_visible(&toast.id);
            }
        }
    }

    fn motions<'a>(&mut self, placed: &[(&'a Toast, Rect)]) -> Vec<MotionEvent<'a>> {
        placed
            .iter()
            .filter_map(|&(toast, rect)| {
                let phase = if toast.exiting {
                    if !self.exits_played.insert(toast.instance_id) {
                        return None;
                    }
                    Phase::Exit
                } else if toast.lifecycle == Lifecycle::Entering {
                    Phase::Enter
                } else {
                    return None;
                };
                let motion = self.manager.motion(&toast.id, phase, Some(rect))?;
                Some(MotionEvent {
                    id: &toast.id,
                    phase,
                    strategy: strategy_for(toast.animation).name(),
                    motion,
                })
            })
            .collect()
    }
}

/// Position à l'écran de chaque toast, empilé par position dans l'ordre d'insertion.
fn layout(snapshot: &[Toast]) -> Vec<(&Toast, Rect)> {
    let mut placed = Vec::with_capacity(snapshot.len());
    for position in Position::ALL {
        let stack = snapshot.iter().filter(|toast| toast.position == position);
        for (slot, toast) in stack.enumerate() {
            placed.push((toast, slot_rect(position, slot)));
        }
    }
    placed
}

#[allow(clippy::cast_precision_loss)]
fn slot_rect(position: Position, slot: usize) -> Rect {
    let x = match position {
        Position::TopLeft | Position::BottomLeft => MARGIN,
        Position::TopCenter | Position::BottomCenter => (VIEWPORT_WIDTH - TOAST_WIDTH) / 2.0,
        Position::TopRight | Position::BottomRight => VIEWPORT_WIDTH - MARGIN - TOAST_WIDTH,
    };
    let step = slot as f32 * (TOAST_HEIGHT + GAP);
    let y = if position.is_top() {
        MARGIN + step
    } else {
        VIEWPORT_HEIGHT - MARGIN - TOAST_HEIGHT - step
    };
    Rect::new(x, y, TOAST_WIDTH, TOAST_HEIGHT)
}

fn render_text(frame: u64, placed: &[(&Toast, Rect)], motions: &[MotionEvent<'_>]) -> String {
    let mut out = format!("── frame {frame}: {} toast(s)", placed.len());
    for (toast, _) in placed {
        out.push_str(&format!(
            "\n  {:<13} {:<7} {:<8} {}",
            toast.position.as_str(),
            toast.kind.as_str(),
            toast.lifecycle.to_string(),
            toast.title.as_deref().unwrap_or("-"),
        ));
        if let Some(description) = &toast.description {
            out.push_str(&format!(" · {description}"));
        }
        if let Some(action) = &toast.action {
            out.push_str(&format!(" [{}]", action.label));
        }
        out.push_str(&format!(" ({})", toast.duration));
    }
    for event in motions {
        let from = event.motion.first().copied().unwrap_or(Keyframe::REST);
        out.push_str(&format!(
            "\n    {:?} {} {}ms from translate({:.0}, {:.0}) scale({:.2}, {:.2}) opacity {:.1}",
            event.phase,
            event.strategy,
            event.motion.timing.duration.as_millis(),
            from.translate_x,
            from.translate_y,
            from.scale_x,
            from.scale_y,
            from.opacity,
        ));
    }
    out
}
