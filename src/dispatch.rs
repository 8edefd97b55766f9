//! Delivery of commands to the actuator side.
//!
//! The [Dispatcher] owns a worker thread. Commands submitted to it are
//! delivered from that thread, so the caller never waits on the actuator
//! transport, and delayed commands sit in a [TaskQueue] until due.

use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::clock::Clock;
use crate::control::{Action, Command, TaskKey};
use crate::error::SinkError;
use crate::schedule::TaskQueue;

/// Longest the worker sleeps with tasks pending before re-reading the clock.
const MAX_WAIT: Duration = Duration::from_millis(20);

/// The boundary to the actuator transport.
pub trait CommandSink: Send {
    fn send(&mut self, command: &Command) -> Result<(), SinkError>;
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn send(&mut self, command: &Command) -> Result<(), SinkError> {
        (**self).send(command)
    }
}

/// Forwards commands over a channel.
#[derive(Clone)]
pub struct ChannelSink {
    tx: Sender<Command>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Command>) -> Self {
        Self { tx }
    }

    /// Creates a sink and the receiver its commands arrive on.
    pub fn pair() -> (Self, Receiver<Command>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }
}

impl CommandSink for ChannelSink {
    fn send(&mut self, command: &Command) -> Result<(), SinkError> {
        self.tx
            .send(command.clone())
            .map_err(|_| SinkError::Disconnected)
    }
}

/// Writes one wire-format line per command.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> CommandSink for WriterSink<W> {
    fn send(&mut self, command: &Command) -> Result<(), SinkError> {
        writeln!(self.writer, "{}", command)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Logs commands instead of delivering them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl CommandSink for LogSink {
    fn send(&mut self, command: &Command) -> Result<(), SinkError> {
        log::info!("command: {}", command);
        Ok(())
    }
}

enum Request {
    Send(Command),
    Schedule {
        key: TaskKey,
        due: Duration,
        command: Command,
    },
    Cancel(TaskKey),
    Shutdown,
}

/// Runs [Action]s on a background thread.
pub struct Dispatcher {
    clock: Arc<dyn Clock>,
    tx: Sender<Request>,
    worker: Option<JoinHandle<usize>>,
}

impl Dispatcher {
    /// Starts the worker thread.
    pub fn spawn(clock: Arc<dyn Clock>, sink: impl CommandSink + 'static) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let worker_clock = clock.clone();
        let worker = thread::spawn(move || run_worker(worker_clock, sink, rx));
        Self {
            clock,
            tx,
            worker: Some(worker),
        }
    }

    /// Hands actions to the worker without waiting for them to be carried out.
    ///
    /// Delays are measured from the moment of submission.
    pub fn submit(&self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            let request = match action {
                Action::Send(command) => Request::Send(command),
                Action::Schedule {
                    key,
                    delay,
                    command,
                } => Request::Schedule {
                    key,
                    due: self.clock.now() + delay,
                    command,
                },
                Action::Cancel(key) => Request::Cancel(key),
            };
            if self.tx.send(request).is_err() {
                log::error!("dispatcher worker has exited, dropping action");
            }
        }
    }

    /// Stops the worker, discarding commands that have not fired yet.
    ///
    /// Returns the number of discarded commands.
    pub fn shutdown(mut self) -> usize {
        self.stop()
    }

    fn stop(&mut self) -> usize {
        let Some(worker) = self.worker.take() else {
            return 0;
        };
        let _ = self.tx.send(Request::Shutdown);
        worker.join().unwrap_or_else(|_| {
            log::error!("dispatcher worker panicked");
            0
        })
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_worker(clock: Arc<dyn Clock>, mut sink: impl CommandSink, rx: Receiver<Request>) -> usize {
    let mut queue = TaskQueue::new();
    log::debug!("dispatcher started");

    loop {
        let now = clock.now();
        for command in queue.pop_due(now) {
            deliver(&mut sink, &command);
        }

        let request = match queue.next_due() {
            Some(due) => rx.recv_timeout(due.saturating_sub(now).min(MAX_WAIT)),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match request {
            Ok(Request::Send(command)) => deliver(&mut sink, &command),
            Ok(Request::Schedule { key, due, command }) => {
                log::debug!("scheduling {} at {:?}", command, due);
                queue.schedule(key, due, command);
            }
            Ok(Request::Cancel(key)) => {
                if let Some(command) = queue.cancel(key) {
                    log::info!("withdrew pending {}", command);
                }
            }
            Ok(Request::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    let discarded = queue.clear();
    if discarded > 0 {
        log::warn!("dispatcher stopped, {} pending commands discarded", discarded);
    }
    discarded
}

/// Failed deliveries are logged and not retried.
fn deliver(sink: &mut impl CommandSink, command: &Command) {
    if let Err(err) = sink.send(command) {
        log::warn!("could not deliver {}: {}", command, err);
    }
}
