//! Timer-driven playback on tokio.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{PlaybackController, PlaybackState};
use crate::error::Result;
use crate::rsvp::RsvpWord;

struct Inner {
    controller: PlaybackController,
    /// When the pending tick fires, if one is scheduled.
    next_tick: Option<Instant>,
    /// Bumped by every operation. A tick task whose generation is stale
    /// lost a race with `abort` and must not touch the controller.
    generation: u64,
}

/// Drives a [`PlaybackController`] in real time.
///
/// At most one tick task exists. Every operation aborts it before touching
/// the controller and re-arms it afterwards if still playing, so two ticks
/// can never advance the cursor concurrently. A task that already woke and
/// is waiting on the lock when it is aborted sees a newer generation and
/// exits without ticking.
///
/// Listeners run while the session's lock is held and must not call back
/// into the session. Must be created and used inside a tokio runtime.
pub struct PlaybackSession {
    inner: Arc<Mutex<Inner>>,
    slot: Option<JoinHandle<()>>,
    closed: bool,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlaybackSession {
    pub fn new(controller: PlaybackController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                controller,
                next_tick: None,
                generation: 0,
            })),
            slot: None,
            closed: false,
        }
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.slot.take() {
            handle.abort();
        }
    }

    /// Schedule the next tick at `at`, or after the current word's delay.
    fn arm(&mut self, at: Option<Instant>) {
        let (deadline, generation) = {
            let mut inner = lock(&self.inner);
            if !inner.controller.is_playing() {
                inner.next_tick = None;
                return;
            }
            let deadline = at.unwrap_or_else(|| Instant::now() + inner.controller.current_delay());
            inner.next_tick = Some(deadline);
            (deadline, inner.generation)
        };
        self.slot = Some(tokio::spawn(run(Arc::clone(&self.inner), deadline, generation)));
    }

    /// Run `op` on the controller with the tick slot cancelled, then re-arm.
    fn apply<T>(
        &mut self,
        keep_deadline: bool,
        op: impl FnOnce(&mut PlaybackController) -> T,
    ) -> T {
        self.cancel();
        let (out, pending) = {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            let pending = inner.next_tick.take();
            (op(&mut inner.controller), pending)
        };
        self.arm(if keep_deadline { pending } else { None });
        out
    }

    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        self.apply(false, PlaybackController::play);
    }

    pub fn pause(&mut self) {
        self.apply(false, PlaybackController::pause);
    }

    pub fn toggle(&mut self) {
        self.apply(false, PlaybackController::toggle);
    }

    /// Move the cursor; when playing, the new word gets a full delay.
    pub fn seek(&mut self, delta: i64) {
        self.apply(false, |c| c.seek(delta));
    }

    pub fn skip_forward(&mut self) {
        self.apply(false, PlaybackController::skip_forward);
    }

    pub fn skip_backward(&mut self) {
        self.apply(false, PlaybackController::skip_backward);
    }

    pub fn restart(&mut self) {
        self.apply(false, PlaybackController::restart);
    }

    /// Change the rate. The word on screen keeps its original deadline and
    /// the new rate applies from the next tick.
    pub fn set_rate(&mut self, wpm: i64) -> Result<u32> {
        self.apply(true, |c| c.set_rate(wpm))
    }

    pub fn position(&self) -> usize {
        lock(&self.inner).controller.position()
    }

    pub fn state(&self) -> PlaybackState {
        lock(&self.inner).controller.state()
    }

    pub fn is_playing(&self) -> bool {
        lock(&self.inner).controller.is_playing()
    }

    pub fn wpm(&self) -> u32 {
        lock(&self.inner).controller.wpm()
    }

    pub fn progress(&self) -> u32 {
        lock(&self.inner).controller.progress()
    }

    pub fn current_word(&self) -> RsvpWord {
        lock(&self.inner).controller.current_word()
    }

    /// Stop the timer and send the final position to the listeners.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel();
        let mut inner = lock(&self.inner);
        inner.generation += 1;
        inner.next_tick = None;
        inner.controller.pause();
        log::debug!("closing playback session at word {}", inner.controller.position());
        inner.controller.flush_position();
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The tick loop: sleep until the deadline, advance, repeat while playing.
async fn run(inner: Arc<Mutex<Inner>>, mut deadline: Instant, generation: u64) {
    loop {
        tokio::time::sleep_until(deadline).await;
        let mut guard = lock(&inner);
        if guard.generation != generation {
            log::trace!("dropping stale tick from generation {generation}");
            return;
        }
        match guard.controller.tick() {
            Some(delay) => {
                deadline += delay;
                guard.next_tick = Some(deadline);
            }
            None => {
                guard.next_tick = None;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::sleep;

    fn session(words: &[&str], wpm: u32) -> (PlaybackSession, Arc<Mutex<Vec<usize>>>) {
        let mut controller = PlaybackController::new(
            words.iter().map(|w| w.to_string()).collect(),
            0,
            wpm,
            0,
        );
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.on_position_change(move |p| sink.lock().unwrap().push(p));
        (PlaybackSession::new(controller), seen)
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_to_completion() {
        let (mut s, seen) = session(&["a", "b", "c"], 300);
        s.play();
        sleep(Duration::from_millis(150)).await;
        assert_eq!(s.position(), 0);
        sleep(Duration::from_millis(100)).await;
        assert_eq!(s.position(), 1);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(s.state(), PlaybackState::Completed);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);

        s.play();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(s.position(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_pending_tick() {
        let (mut s, _) = session(&["a", "b", "c", "d"], 300);
        s.play();
        sleep(Duration::from_millis(250)).await;
        s.pause();
        sleep(Duration::from_secs(10)).await;
        assert_eq!(s.position(), 1);
        assert_eq!(s.state(), PlaybackState::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_reschedules_from_new_word() {
        let (mut s, _) = session(&["a", "b", "c", "d", "e", "f"], 300);
        s.play();
        sleep(Duration::from_millis(150)).await;
        s.seek(2);
        assert_eq!(s.position(), 2);
        // the old deadline at 200ms is gone, the new one is at 350ms
        sleep(Duration::from_millis(100)).await;
        assert_eq!(s.position(), 2);
        sleep(Duration::from_millis(110)).await;
        assert_eq!(s.position(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_rate_applies_from_next_tick() {
        let (mut s, _) = session(&["a", "b", "c", "d"], 300);
        s.play();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(s.set_rate(100).unwrap(), 100);
        sleep(Duration::from_millis(150)).await;
        assert_eq!(s.position(), 1, "in-flight tick keeps its 200ms deadline");
        sleep(Duration::from_millis(450)).await;
        assert_eq!(s.position(), 1);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(s.position(), 2);

        assert!(s.set_rate(-1).is_err());
        assert_eq!(s.wpm(), 100);
        assert!(s.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_tick_task_does_not_advance() {
        let (mut s, _) = session(&["a", "b", "c", "d"], 300);
        s.play();
        let stale = lock(&s.inner).generation;
        s.seek(1);
        assert_eq!(s.position(), 1);

        // a task armed before the seek, woken after it
        let ghost = tokio::spawn(run(Arc::clone(&s.inner), Instant::now(), stale));
        ghost.await.unwrap();
        assert_eq!(s.position(), 1);
        assert!(lock(&s.inner).next_tick.is_some(), "live task's deadline untouched");

        sleep(Duration::from_millis(210)).await;
        assert_eq!(s.position(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_final_position() {
        let (mut s, seen) = session(&["a", "b", "c", "d"], 300);
        s.play();
        sleep(Duration::from_millis(450)).await;
        s.close();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_flushes_once() {
        let (mut s, seen) = session(&["a", "b"], 300);
        s.seek(1);
        drop(s);
        assert_eq!(*seen.lock().unwrap(), vec![1, 1]);
    }
}
