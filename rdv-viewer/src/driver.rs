//! Scripted session driver.
//!
//! ```text
//!   script lines ─┐
//!   scroll ticks ─┼─► select! ─► ViewportController ─► outbound ─► JSON lines
//!   resizes ──────┘
//! ```
//!
//! Everything runs on the caller's task; the only spawned work is the
//! autoscroll interval, which reports back through the tick channel.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use rdv_core::{
    CapabilitySet, ClipboardEvent, Collaborators, CursorShape, FrameBuffer, IntervalTimer,
    KeySequence, OutboundEvent, PanelCommand, PixelFormat, RawInput, RdvError, ScrollTick, Size,
    ViewportController,
};

use crate::channel::ChannelSession;
use crate::config::{InputSection, ViewerConfig};
use crate::headless::{HeadlessSurface, HeadlessWindow, LogNotifier, MemoryClipboard, PresetDialog};
use crate::script::ScriptEvent;

/// Largest frame or cursor side a script may ask for.
pub const MAX_SCRIPT_EXTENT: u32 = 16_384;

/// Counters reported when a run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub script_events: usize,
    pub outbound_events: usize,
    pub scroll_ticks: usize,
}

pub struct Viewer {
    controller: ViewportController,
    ticks: mpsc::UnboundedReceiver<ScrollTick>,
    resized: mpsc::UnboundedReceiver<Size>,
    outbound: mpsc::UnboundedReceiver<OutboundEvent>,
    clipboard: MemoryClipboard,
    input: InputSection,
    key_sequence: KeySequence,
}

impl Viewer {
    /// Build the controller and its headless collaborators. The autoscroll
    /// timer spawns onto `runtime`.
    pub fn new(config: &ViewerConfig, runtime: Handle) -> Self {
        let (resized_tx, resized) = mpsc::unbounded_channel();
        let (timer, ticks) = IntervalTimer::with_channel(runtime);
        let (channel, outbound) = ChannelSession::pair();
        let clipboard = MemoryClipboard::default();

        let collab = Collaborators {
            surface: Box::new(HeadlessSurface::default()),
            window: Box::new(HeadlessWindow::new(&config.display, resized_tx)),
            channel: Box::new(channel),
            clipboard: Box::new(clipboard.clone()),
            dialog: Box::new(PresetDialog::new(&config.dialog)),
            notifier: Box::new(LogNotifier),
            timer: Box::new(timer),
        };

        Self {
            controller: ViewportController::new(config.session.descriptor(), collab),
            ticks,
            resized,
            outbound,
            clipboard,
            input: config.input.clone(),
            key_sequence: config.input.key_sequence(),
        }
    }

    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// What the session put on the local clipboard.
    pub fn local_clipboard(&self) -> Option<ClipboardEvent> {
        self.clipboard.contents()
    }

    /// Drive the controller from `script` until the window closes, writing
    /// every outbound event to `out` as a JSON line. End of script closes
    /// the window.
    pub async fn run<R, W>(&mut self, script: R, out: &mut W) -> Result<RunSummary, RdvError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = script.lines();
        let mut summary = RunSummary::default();
        let mut script_done = false;
        let mut resume_at: Option<Instant> = None;

        loop {
            tokio::select! {
                biased;

                Some(event) = self.outbound.recv() => {
                    summary.outbound_events += 1;
                    let line = event.to_json()?;
                    out.write_all(line.as_bytes()).await?;
                    out.write_all(b"\n").await?;
                    if event == OutboundEvent::WindowClosed {
                        break;
                    }
                }

                Some(size) = self.resized.recv() => {
                    self.controller.on_window_resized(size);
                }

                Some(_) = self.ticks.recv() => {
                    summary.scroll_ticks += 1;
                    self.controller.on_scroll_tick();
                }

                _ = tokio::time::sleep_until(resume_at.unwrap_or_else(Instant::now)), if resume_at.is_some() => {
                    resume_at = None;
                }

                line = lines.next_line(), if !script_done && resume_at.is_none() => {
                    match line? {
                        Some(line) => match ScriptEvent::parse_line(&line) {
                            Ok(Some(event)) => {
                                summary.script_events += 1;
                                if let Some(wait) = self.apply(event) {
                                    resume_at = Some(Instant::now() + wait);
                                }
                            }
                            Ok(None) => {}
                            Err(err) => warn!(%err, %line, "skipping script line"),
                        },
                        None => {
                            script_done = true;
                            debug!("script finished; closing window");
                            self.controller.on_close_requested();
                        }
                    }
                }
            }
        }

        out.flush().await?;
        info!(
            script = summary.script_events,
            sent = summary.outbound_events,
            ticks = summary.scroll_ticks,
            "session finished"
        );
        Ok(summary)
    }

    /// Apply one script event. Returns how long to pause script reading.
    pub fn apply(&mut self, event: ScriptEvent) -> Option<Duration> {
        trace!(?event, "script");
        let ctl = &mut self.controller;

        match event {
            ScriptEvent::Capabilities {
                video_encodings,
                features,
            } => ctl.announce_capabilities(CapabilitySet::new(video_encodings, features)),
            ScriptEvent::ScreenSize { width, height } => {
                ctl.update_screen_size(Size::new(width, height))
            }
            ScriptEvent::Frame { width, height } => {
                if within_extent("frame", width, height) {
                    match FrameBuffer::blank(width, height, PixelFormat::Bgra8) {
                        Some(frame) => ctl.deliver_frame(&frame),
                        None => warn!(width, height, "frame does not fit in memory"),
                    }
                }
            }
            ScriptEvent::Cursor {
                width,
                height,
                hotspot,
            } => {
                if within_extent("cursor", width, height) {
                    ctl.deliver_cursor(&CursorShape {
                        width,
                        height,
                        hotspot,
                        data: vec![0; width as usize * height as usize * 4],
                    });
                }
            }
            ScriptEvent::Clipboard { text } => {
                ctl.deliver_clipboard_event(ClipboardEvent::text(&text))
            }
            ScriptEvent::LocalClipboard { text } => {
                ctl.on_local_clipboard(ClipboardEvent::text(&text))
            }
            ScriptEvent::ConfigRequest { mut config } => {
                let outcome = ctl.request_config_change(&mut config);
                info!(?outcome, "config change request");
            }
            ScriptEvent::Input { source, input } => {
                let enabled = match input {
                    RawInput::Key { .. } => self.input.forward_keyboard,
                    _ => self.input.forward_pointer,
                };
                if enabled {
                    let consumed = ctl.handle_input(source, input);
                    trace!(consumed, "input routed");
                }
            }
            ScriptEvent::KeySequence { keys } => {
                let sequence = match keys {
                    None => self.key_sequence.clone(),
                    Some(keys) => match keys.parse() {
                        Ok(sequence) => sequence,
                        Err(err) => {
                            warn!(%err, "ignoring key sequence");
                            return None;
                        }
                    },
                };
                ctl.handle_panel(PanelCommand::KeySequence(sequence));
            }
            ScriptEvent::Settings => ctl.handle_panel(PanelCommand::Settings),
            ScriptEvent::Autosize => ctl.handle_panel(PanelCommand::Autosize),
            ScriptEvent::Fullscreen { enabled } => {
                ctl.handle_panel(PanelCommand::Fullscreen(enabled))
            }
            ScriptEvent::WindowResized { width, height } => {
                ctl.on_window_resized(Size::new(width, height))
            }
            ScriptEvent::WindowStateChanged { state } => ctl.on_window_state_changed(state),
            ScriptEvent::FocusLost => ctl.on_focus_lost(),
            ScriptEvent::Wait { ms } => return Some(Duration::from_millis(ms)),
            ScriptEvent::Close => ctl.on_close_requested(),
        }
        None
    }
}

fn within_extent(what: &str, width: u32, height: u32) -> bool {
    let ok = width <= MAX_SCRIPT_EXTENT && height <= MAX_SCRIPT_EXTENT;
    if !ok {
        warn!(what, width, height, max = MAX_SCRIPT_EXTENT, "script size too large");
    }
    ok
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use rdv_core::{Features, KeyAction, SessionConfig, WindowState};

    use super::*;

    async fn run(config: &ViewerConfig, script: &str) -> (Viewer, RunSummary, Vec<OutboundEvent>) {
        let mut viewer = Viewer::new(config, Handle::current());
        let mut out = Vec::new();
        let summary = viewer.run(script.as_bytes(), &mut out).await.unwrap();

        let events = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| OutboundEvent::from_json(line).unwrap())
            .collect();
        (viewer, summary, events)
    }

    #[tokio::test(start_paused = true)]
    async fn edge_pointer_scrolls_until_closed() {
        let script = r#"
            {"type":"screen_size","width":1920,"height":1080}
            {"type":"input","source":"viewport","input":{"kind":"pointer_move","position":{"x":1880,"y":400},"buttons":""}}
            {"type":"wait","ms":100}
            {"type":"close"}
        "#;
        let (viewer, summary, events) = run(&ViewerConfig::default(), script).await;

        assert_eq!(viewer.controller().window_state(), WindowState::Maximized);
        assert!(summary.scroll_ticks >= 4, "ticks: {}", summary.scroll_ticks);
        let bar = viewer.controller().scroll_area().horizontal();
        assert_eq!(bar.position(), bar.maximum());

        assert!(matches!(events[0], OutboundEvent::Pointer { .. }));
        assert_eq!(events.last(), Some(&OutboundEvent::WindowClosed));
        assert!(!viewer.controller().scroll_state().timer_active);
    }

    #[tokio::test(start_paused = true)]
    async fn clipboard_round_trip() {
        let script = r#"
            {"type":"capabilities","video_encodings":"VP8","features":"CLIPBOARD"}
            {"type":"clipboard","text":"from host"}
            {"type":"local_clipboard","text":"from host"}
            {"type":"local_clipboard","text":"typed here"}
        "#;
        let (viewer, _, events) = run(&ViewerConfig::default(), script).await;

        assert_eq!(viewer.local_clipboard(), Some(ClipboardEvent::text("from host")));
        assert_eq!(
            events,
            vec![
                OutboundEvent::Clipboard(ClipboardEvent::text("typed here")),
                OutboundEvent::WindowClosed,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn settings_follow_preset_dialog() {
        let mut config = ViewerConfig::default();
        config.dialog.features = Some(Features::empty());

        let script = r#"{"type":"settings"}"#;
        let (_, _, events) = run(&config, script).await;
        assert_eq!(
            events[0],
            OutboundEvent::ConfigChanged(SessionConfig {
                features: Features::empty(),
                ..SessionConfig::default()
            })
        );

        config.dialog.accept = false;
        let (_, _, events) = run(&config, script).await;
        assert_eq!(events, vec![OutboundEvent::WindowClosed]);
    }

    #[tokio::test(start_paused = true)]
    async fn key_sequence_uses_configured_chord() {
        let mut config = ViewerConfig::default();
        config.input.key_sequence = "ctrl+shift+escape".into();

        let (_, _, events) = run(&config, r#"{"type":"key_sequence"}"#).await;
        let keys: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                OutboundEvent::Key(k) => Some((k.key, k.action)),
                _ => None,
            })
            .collect();
        assert_eq!(keys.len(), 6);
        assert_eq!(keys[2], (rdv_core::KeyCode::ESCAPE, KeyAction::Press));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_keyboard_drops_keys() {
        let mut config = ViewerConfig::default();
        config.input.forward_keyboard = false;

        let script = r#"{"type":"input","source":"viewport","input":{"kind":"key","key":458793,"modifiers":"","pressed":true}}"#;
        let (_, _, events) = run(&config, script).await;
        assert_eq!(events, vec![OutboundEvent::WindowClosed]);
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_frames_are_ignored() {
        let script = r#"
            {"type":"capabilities","video_encodings":"VP8","features":"CURSOR_SHAPE"}
            {"type":"frame","width":1073741824,"height":1}
            {"type":"frame","width":100000,"height":100000}
            {"type":"cursor","width":4294967295,"height":4294967295}
            {"type":"frame","width":64,"height":32}
        "#;
        let (viewer, summary, events) = run(&ViewerConfig::default(), script).await;
        assert_eq!(summary.script_events, 5);
        assert_eq!(events, vec![OutboundEvent::WindowClosed]);
        assert!(viewer.controller().is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn bad_lines_are_skipped() {
        let script = "# comment\nnot json\n{\"type\":\"focus_lost\"}\n";
        let (_, summary, events) = run(&ViewerConfig::default(), script).await;
        assert_eq!(summary.script_events, 1);
        assert_eq!(events, vec![OutboundEvent::WindowClosed]);
    }
}
