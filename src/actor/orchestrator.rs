//! Keeps the published window positions in step with tab state.
//!
//! The orchestrator subscribes to three sources: registry snapshots, layout
//! controls (mode and lock) and the viewport size. A change on any of them
//! schedules one recompute through the orchestrator's own mailbox, so the
//! recompute runs on the next turn of the loop rather than inside the change
//! notification. Several changes landing before that turn share one
//! recompute.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tracing::{debug, info, instrument, trace};

use crate::actor::{self, broadcast::BroadcastEvent, broadcast::BroadcastSender};
use crate::common::config::LayoutMode;
use crate::layout_engine::{PositionMap, TilingEngine, Viewport};
use crate::model::{TabSnapshot, active_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutControls {
    pub mode: LayoutMode,
    /// While set, positions are left exactly as they were last published.
    pub locked: bool,
}

#[derive(Debug)]
pub enum Event {
    TabsChanged(TabSnapshot),
    ControlsChanged(LayoutControls),
    ViewportResized(Viewport),
    Recompute,
    /// Answered once every change seen so far has been laid out.
    Flush(oneshot::Sender<()>),
}

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

pub struct LayoutOrchestrator {
    engine: TilingEngine,
    tabs: TabSnapshot,
    controls: LayoutControls,
    viewport: Viewport,
    /// Tiled positions from the last floating recompute.
    floating: PositionMap,
    recompute_pending: bool,
    positions_tx: watch::Sender<Arc<PositionMap>>,
    events_tx: Sender,
    events_rx: Receiver,
    tabs_rx: watch::Receiver<TabSnapshot>,
    controls_rx: watch::Receiver<LayoutControls>,
    viewport_rx: watch::Receiver<Viewport>,
    broadcast: Option<BroadcastSender>,
}

impl LayoutOrchestrator {
    /// Creates the orchestrator and the handle used to drive it.
    ///
    /// The first recompute is already scheduled; nothing is published until
    /// the orchestrator runs.
    pub fn new(
        engine: TilingEngine,
        mut tabs_rx: watch::Receiver<TabSnapshot>,
        controls: LayoutControls,
        viewport: Viewport,
        broadcast: Option<BroadcastSender>,
    ) -> (Self, LayoutHandle) {
        let (controls_tx, controls_rx) = watch::channel(controls);
        let (viewport_tx, viewport_rx) = watch::channel(viewport);
        let (positions_tx, positions_rx) = watch::channel(Arc::new(PositionMap::new()));
        let (events_tx, events_rx) = actor::channel();
        let tabs = tabs_rx.borrow_and_update().clone();

        let mut orchestrator = Self {
            engine,
            tabs,
            controls,
            viewport,
            floating: PositionMap::new(),
            recompute_pending: false,
            positions_tx,
            events_tx,
            events_rx,
            tabs_rx,
            controls_rx,
            viewport_rx,
            broadcast,
        };
        orchestrator.schedule_recompute();

        let handle = LayoutHandle {
            events_tx: orchestrator.events_tx.clone(),
            controls_tx,
            viewport_tx,
            positions_rx,
        };
        (orchestrator, handle)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some((span, event)) = self.events_rx.recv() => {
                    let _guard = span.enter();
                    self.handle_event(event);
                }
                changed = self.tabs_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let tabs = self.tabs_rx.borrow_and_update().clone();
                    self.handle_event(Event::TabsChanged(tabs));
                }
                Ok(()) = self.controls_rx.changed() => {
                    let controls = *self.controls_rx.borrow_and_update();
                    self.handle_event(Event::ControlsChanged(controls));
                }
                Ok(()) = self.viewport_rx.changed() => {
                    let viewport = *self.viewport_rx.borrow_and_update();
                    self.handle_event(Event::ViewportResized(viewport));
                }
            }
        }

        // The registry is gone; settle what it last told us.
        while let Ok((span, event)) = self.events_rx.try_recv() {
            let _guard = span.enter();
            self.handle_event(event);
        }
        debug!("layout orchestrator stopped");
    }

    #[instrument(name = "orchestrator::handle_event", skip(self))]
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::TabsChanged(tabs) => {
                self.tabs = tabs;
                self.schedule_recompute();
            }
            Event::ControlsChanged(controls) => {
                if controls.mode == LayoutMode::Floating && self.controls.mode != LayoutMode::Floating
                {
                    self.floating.clear();
                }
                if controls.mode != self.controls.mode {
                    info!(from = %self.controls.mode, to = %controls.mode, "layout mode changed");
                    self.broadcast(BroadcastEvent::LayoutModeChanged { mode: controls.mode });
                }
                if controls.locked != self.controls.locked {
                    info!(locked = controls.locked, "position lock changed");
                    self.broadcast(BroadcastEvent::PositionsLocked { locked: controls.locked });
                }
                self.controls = controls;
                self.schedule_recompute();
            }
            Event::ViewportResized(viewport) => {
                self.viewport = viewport;
                self.schedule_recompute();
            }
            Event::Recompute => {
                self.recompute_pending = false;
                self.recompute();
            }
            Event::Flush(done) => {
                if self.absorb_pending_changes() {
                    // Go again behind the recompute that was just scheduled.
                    self.events_tx.send(Event::Flush(done));
                } else {
                    _ = done.send(());
                }
            }
        }
    }

    /// Feeds subscription updates that have not been picked up yet through
    /// `handle_event`. Returns whether a recompute is outstanding afterwards.
    fn absorb_pending_changes(&mut self) -> bool {
        if self.tabs_rx.has_changed().unwrap_or(false) {
            let tabs = self.tabs_rx.borrow_and_update().clone();
            self.handle_event(Event::TabsChanged(tabs));
        }
        if self.controls_rx.has_changed().unwrap_or(false) {
            let controls = *self.controls_rx.borrow_and_update();
            self.handle_event(Event::ControlsChanged(controls));
        }
        if self.viewport_rx.has_changed().unwrap_or(false) {
            let viewport = *self.viewport_rx.borrow_and_update();
            self.handle_event(Event::ViewportResized(viewport));
        }
        self.recompute_pending
    }

    fn schedule_recompute(&mut self) {
        if self.recompute_pending {
            trace!("recompute already scheduled");
            return;
        }
        self.recompute_pending = true;
        self.events_tx.send(Event::Recompute);
    }

    fn recompute(&mut self) {
        if self.controls.locked {
            debug!("positions locked, skipping recompute");
            return;
        }

        let mode = self.controls.mode;
        let mut positions = match mode {
            LayoutMode::Floating => {
                self.floating =
                    self.engine.compute_floating_layout(&self.tabs, &self.floating, self.viewport);
                self.floating.clone()
            }
            _ => self.engine.compute_layout(
                mode,
                &self.tabs,
                active_id(&self.tabs),
                self.viewport,
            ),
        };

        let maximized = self.tabs.iter().find(|t| t.maximized && t.is_shown()).map(|t| &t.id);
        if let Some(id) = maximized {
            positions.insert(id.clone(), self.engine.maximized_frame(self.viewport));
        }

        debug!(%mode, windows = positions.len(), ?maximized, "publishing positions");
        self.broadcast(BroadcastEvent::LayoutApplied {
            mode,
            windows: positions.keys().map(ToString::to_string).collect(),
            maximized: maximized.map(ToString::to_string),
        });
        self.positions_tx.send_replace(Arc::new(positions));
    }

    fn broadcast(&self, event: BroadcastEvent) {
        if let Some(tx) = &self.broadcast {
            tx.send(event);
        }
    }
}

/// Control surface of a running orchestrator.
#[derive(Debug)]
pub struct LayoutHandle {
    events_tx: Sender,
    controls_tx: watch::Sender<LayoutControls>,
    viewport_tx: watch::Sender<Viewport>,
    positions_rx: watch::Receiver<Arc<PositionMap>>,
}

impl LayoutHandle {
    pub fn set_layout_mode(&self, mode: LayoutMode) {
        self.controls_tx.send_if_modified(|controls| {
            let changed = controls.mode != mode;
            controls.mode = mode;
            changed
        });
    }

    pub fn current_layout(&self) -> LayoutMode { self.controls_tx.borrow().mode }

    pub fn set_lock_positions(&self, locked: bool) {
        self.controls_tx.send_if_modified(|controls| {
            let changed = controls.locked != locked;
            controls.locked = locked;
            changed
        });
    }

    pub fn is_locked(&self) -> bool { self.controls_tx.borrow().locked }

    pub fn resize(&self, viewport: Viewport) { self.viewport_tx.send_replace(viewport); }

    pub fn viewport(&self) -> Viewport { *self.viewport_tx.borrow() }

    /// Positions as last published.
    pub fn positions(&self) -> Arc<PositionMap> { self.positions_rx.borrow().clone() }

    pub fn subscribe_positions(&self) -> watch::Receiver<Arc<PositionMap>> {
        self.positions_rx.clone()
    }

    /// Waits until every change made before the call has been laid out and
    /// published. Returns immediately if the orchestrator has stopped.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.events_tx.try_send(Event::Flush(tx)).is_ok() {
            _ = rx.await;
        }
    }
}
