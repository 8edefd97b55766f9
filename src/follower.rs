use std::sync::Arc;

use crate::clock::Clock;
use crate::control::{Controller, ControllerConfig, LaneFrame, RawLaneSummary};
use crate::dispatch::{CommandSink, Dispatcher};

/// Drives a vehicle along a lane from per-frame lane summaries.
///
/// Ties a [Controller] to a clock and a [Dispatcher]. Frames must be fed from
/// a single thread, in capture order.
pub struct LaneFollower {
    clock: Arc<dyn Clock>,
    controller: Controller,
    dispatcher: Dispatcher,
    frames: usize,
}

impl LaneFollower {
    /// Creates a follower whose controller starts at the clock's current time.
    pub fn new(
        config: ControllerConfig,
        clock: impl Clock + 'static,
        sink: impl CommandSink + 'static,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(clock);
        let controller = Controller::new(config, clock.now());
        let dispatcher = Dispatcher::spawn(clock.clone(), sink);
        Self {
            clock,
            controller,
            dispatcher,
            frames: 0,
        }
    }

    /// Processes one frame and hands the resulting commands to the dispatcher.
    pub fn process(&mut self, frame: &LaneFrame) {
        let actions = self.controller.process_frame(self.clock.now(), frame);
        self.dispatcher.submit(actions);
        self.frames += 1;
    }

    /// Processes one frame in the lane detector's native encoding.
    pub fn process_raw(&mut self, raw: RawLaneSummary) {
        self.process(&LaneFrame::from(raw));
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// The number of frames processed so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Stops the dispatcher. Returns the number of scheduled commands that never fired.
    pub fn shutdown(self) -> usize {
        log::info!(
            "lane follower stopping after {} frames (emergency stop: {}, stopping zone: {})",
            self.frames,
            self.controller.is_stopped(),
            self.controller.stopping_zone_detected()
        );
        self.dispatcher.shutdown()
    }
}
