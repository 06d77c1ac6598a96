//! Thread-timer host for the [`Scheduler`].
//!
//! Each run gets one background thread that sleeps on a stop channel for the
//! interval returned by the previous trigger, then calls `tick()`. Triggers
//! therefore never overlap and never fire early. [`Player::stop`] marks the
//! scheduler idle under its lock before signalling the thread, so a trigger
//! that was already due finds nothing to do.

use std::{
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use rand::{rngs::StdRng, Rng};

use crate::{
    engine::scheduler::Scheduler,
    error::{Error, Result},
    mapping::MusicalParameters,
    synth::AudioEngine,
};

struct Run {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct Player<E: AudioEngine, R = StdRng> {
    scheduler: Arc<Mutex<Scheduler<E, R>>>,
    run: Option<Run>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<E: AudioEngine, R> Player<E, R> {
    pub fn new(scheduler: Scheduler<E, R>) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            run: None,
        }
    }

    /// Cancel pending triggers and wait for the timer thread to exit.
    /// Voices keep sounding; see [`Player::shutdown`].
    pub fn stop(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        lock(&self.scheduler).stop();
        // The thread may already have exited on an engine error.
        let _ = run.stop_tx.send(());
        if run.handle.join().is_err() {
            tracing::warn!("melody thread panicked");
        }
    }

    /// Stop triggering and silence every voice.
    pub fn shutdown(&mut self) {
        self.stop();
        lock(&self.scheduler).silence();
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.handle.is_finished())
    }

    /// Inspect or adjust the scheduler under its lock.
    pub fn with_scheduler<T>(&self, f: impl FnOnce(&mut Scheduler<E, R>) -> T) -> T {
        f(&mut lock(&self.scheduler))
    }
}

impl<E, R> Player<E, R>
where
    E: AudioEngine + Send + 'static,
    E::Voice: Send + 'static,
    R: Rng + Send + 'static,
{
    /// Replace whatever is playing with a fresh run of `params`.
    pub fn play(&mut self, params: MusicalParameters) -> Result<()> {
        self.stop();
        let first = lock(&self.scheduler).start(params)?;

        let (stop_tx, stop_rx) = mpsc::channel();
        let scheduler = Arc::clone(&self.scheduler);
        let handle = thread::Builder::new()
            .name("soundscape-melody".into())
            .spawn(move || drive(&scheduler, &stop_rx, first))
            .map_err(|e| Error::Audio(format!("failed to spawn melody thread: {e}")))?;

        self.run = Some(Run { stop_tx, handle });
        Ok(())
    }
}

impl<E: AudioEngine, R> Drop for Player<E, R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn drive<E: AudioEngine, R: Rng>(
    scheduler: &Mutex<Scheduler<E, R>>,
    stop_rx: &mpsc::Receiver<()>,
    mut delay: Duration,
) {
    loop {
        match stop_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let mut scheduler = lock(scheduler);
        match scheduler.tick() {
            Ok(Some(trigger)) => delay = trigger.next_interval,
            Ok(None) => break,
            Err(err) => {
                tracing::error!(%err, "melody trigger failed; stopping");
                scheduler.stop();
                break;
            }
        }
    }
}
