use std::time::Duration;

use crate::document::progress_percent;
use crate::error::{Error, Result};
use crate::preferences::{MAX_WPM, clamp_wpm};
use crate::rsvp::{RsvpWord, delay, process_word};

/// Words jumped by [`PlaybackController::skip_forward`] and
/// [`PlaybackController::skip_backward`].
pub const SKIP_WORDS: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
    /// Paused on the last word. Only a seek or restart leaves it.
    Completed,
}

type PositionListener = Box<dyn FnMut(usize) + Send>;
type CompletedListener = Box<dyn FnMut() + Send>;

/// Cursor and play state over a fixed token sequence.
///
/// Every cursor change notifies the position listeners. The controller
/// imposes no cadence of its own; throttling is the listener's business.
pub struct PlaybackController {
    words: Vec<String>,
    position: usize,
    state: PlaybackState,
    wpm: u32,
    punctuation_pause_ms: u32,
    position_listeners: Vec<PositionListener>,
    completed_listeners: Vec<CompletedListener>,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("words", &self.words.len())
            .field("position", &self.position)
            .field("state", &self.state)
            .field("wpm", &self.wpm)
            .field("punctuation_pause_ms", &self.punctuation_pause_ms)
            .finish()
    }
}

impl PlaybackController {
    /// Start `Stopped` at `position` (clamped), or `Completed` when there
    /// are no words.
    pub fn new(words: Vec<String>, position: usize, wpm: u32, punctuation_pause_ms: u32) -> Self {
        let position = position.min(words.len().saturating_sub(1));
        let state = if words.is_empty() {
            PlaybackState::Completed
        } else {
            PlaybackState::Stopped
        };
        Self {
            words,
            position,
            state,
            wpm: clamp_wpm(wpm),
            punctuation_pause_ms,
            position_listeners: Vec::new(),
            completed_listeners: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn punctuation_pause_ms(&self) -> u32 {
        self.punctuation_pause_ms
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn last_index(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    pub fn on_position_change(&mut self, listener: impl FnMut(usize) + Send + 'static) {
        self.position_listeners.push(Box::new(listener));
    }

    pub fn on_completed(&mut self, listener: impl FnMut() + Send + 'static) {
        self.completed_listeners.push(Box::new(listener));
    }

    /// Re-send the current position to every position listener.
    pub fn flush_position(&mut self) {
        self.emit_position();
    }

    fn emit_position(&mut self) {
        let position = self.position;
        for listener in &mut self.position_listeners {
            listener(position);
        }
    }

    fn complete(&mut self) {
        log::debug!("playback completed at word {}", self.position);
        self.state = PlaybackState::Completed;
        for listener in &mut self.completed_listeners {
            listener();
        }
    }

    /// Start or resume. A completed controller stays where it is.
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Completed => log::debug!("play ignored: playback completed"),
            PlaybackState::Playing => {}
            PlaybackState::Stopped | PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
                log::debug!("playing from word {} at {} wpm", self.position, self.wpm);
            }
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            log::debug!("paused at word {}", self.position);
        }
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance one word while playing.
    ///
    /// Returns the display time of the new current word when playback
    /// continues, `None` when it has stopped (not playing, or just reached
    /// the last word).
    pub fn tick(&mut self) -> Option<Duration> {
        if self.state != PlaybackState::Playing {
            return None;
        }
        if self.position >= self.last_index() {
            self.complete();
            return None;
        }

        self.position += 1;
        self.emit_position();

        if self.position == self.last_index() {
            self.complete();
            return None;
        }
        Some(self.current_delay())
    }

    /// Move the cursor by `delta`, clamped to the word range. The play
    /// state is kept, except that leaving the last word un-completes.
    pub fn seek(&mut self, delta: i64) {
        if self.words.is_empty() {
            return;
        }
        let target = (self.position as i64).saturating_add(delta);
        self.position = target.clamp(0, self.last_index() as i64) as usize;
        if self.state == PlaybackState::Completed && self.position < self.last_index() {
            self.state = PlaybackState::Paused;
        }
        self.emit_position();
    }

    pub fn skip_forward(&mut self) {
        self.seek(SKIP_WORDS);
    }

    pub fn skip_backward(&mut self) {
        self.seek(-SKIP_WORDS);
    }

    /// Back to the first word, paused.
    pub fn restart(&mut self) {
        if self.words.is_empty() {
            return;
        }
        self.position = 0;
        self.state = PlaybackState::Paused;
        self.emit_position();
    }

    /// Change the rate for future delays. Non-positive rates are rejected
    /// and leave the current rate in place; others are clamped.
    pub fn set_rate(&mut self, wpm: i64) -> Result<u32> {
        if wpm <= 0 {
            return Err(Error::InvalidRate(wpm));
        }
        self.wpm = clamp_wpm(wpm.min(i64::from(MAX_WPM)) as u32);
        log::debug!("rate set to {} wpm", self.wpm);
        Ok(self.wpm)
    }

    pub fn set_punctuation_pause(&mut self, pause_ms: u32) {
        self.punctuation_pause_ms = pause_ms;
    }

    pub fn current_word(&self) -> RsvpWord {
        self.words
            .get(self.position)
            .map(|w| process_word(w))
            .unwrap_or_default()
    }

    /// How long the current word stays on screen at the current rate.
    pub fn current_delay(&self) -> Duration {
        let word = self.words.get(self.position).map_or("", String::as_str);
        let ms = delay(word, self.wpm, self.punctuation_pause_ms);
        Duration::from_micros((ms * 1000.0).round() as u64)
    }

    /// Percentage through the words, as stored on the document.
    pub fn progress(&self) -> u32 {
        progress_percent(self.position, self.words.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    fn recorded(controller: &mut PlaybackController) -> Arc<Mutex<Vec<usize>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        controller.on_position_change(move |p| sink.lock().unwrap().push(p));
        seen
    }

    #[test]
    fn test_ticks_reach_completed_and_play_is_noop() {
        let n = 5;
        let mut c = PlaybackController::new(words(n), 0, 300, 150);
        let completions = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&completions);
        c.on_completed(move || *sink.lock().unwrap() += 1);

        c.play();
        for _ in 0..n - 1 {
            c.tick();
        }
        assert_eq!(c.state(), PlaybackState::Completed);
        assert_eq!(c.position(), n - 1);
        assert_eq!(*completions.lock().unwrap(), 1);

        c.play();
        assert_eq!(c.state(), PlaybackState::Completed);
        assert_eq!(c.position(), n - 1);
        assert_eq!(c.tick(), None);
    }

    #[test]
    fn test_tick_returns_delay_of_new_word() {
        let list = vec!["one".to_string(), "two.".to_string(), "three".to_string()];
        let mut c = PlaybackController::new(list, 0, 300, 150);
        assert_eq!(c.tick(), None, "not playing yet");
        c.play();
        assert_eq!(c.tick(), Some(Duration::from_millis(350)));
        assert_eq!(c.tick(), None);
        assert_eq!(c.state(), PlaybackState::Completed);
    }

    #[test]
    fn test_every_cursor_change_notifies() {
        let mut c = PlaybackController::new(words(20), 0, 300, 150);
        let seen = recorded(&mut c);
        c.play();
        c.tick();
        c.seek(5);
        c.skip_backward();
        c.restart();
        assert_eq!(*seen.lock().unwrap(), vec![1, 6, 0, 0]);
        assert_eq!(c.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_seek_keeps_state() {
        let mut c = PlaybackController::new(words(30), 0, 300, 150);
        c.play();
        c.skip_forward();
        assert_eq!(c.position(), 10);
        assert!(c.is_playing());
        c.pause();
        c.seek(-3);
        assert_eq!(c.state(), PlaybackState::Paused);
        assert_eq!(c.position(), 7);
    }

    #[test]
    fn test_seek_out_of_completed() {
        let mut c = PlaybackController::new(words(3), 0, 300, 150);
        c.play();
        c.tick();
        c.tick();
        assert_eq!(c.state(), PlaybackState::Completed);
        c.seek(-1);
        assert_eq!(c.state(), PlaybackState::Paused);
        c.play();
        assert!(c.is_playing());
    }

    #[test]
    fn test_set_rate_validation() {
        let mut c = PlaybackController::new(words(3), 0, 300, 150);
        assert!(matches!(c.set_rate(0), Err(Error::InvalidRate(0))));
        assert!(matches!(c.set_rate(-50), Err(Error::InvalidRate(-50))));
        assert_eq!(c.wpm(), 300);

        assert_eq!(c.set_rate(50).unwrap(), 100);
        assert_eq!(c.set_rate(i64::MAX).unwrap(), 1000);
        assert_eq!(c.set_rate(450).unwrap(), 450);
        assert_eq!(c.current_delay(), Duration::from_micros(133_333));
    }

    #[test]
    fn test_toggle() {
        let mut c = PlaybackController::new(words(3), 0, 300, 150);
        c.toggle();
        assert!(c.is_playing());
        c.toggle();
        assert_eq!(c.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_empty_words() {
        let mut c = PlaybackController::new(Vec::new(), 4, 300, 150);
        assert_eq!(c.state(), PlaybackState::Completed);
        assert_eq!(c.position(), 0);
        assert_eq!(c.current_word(), RsvpWord::default());
        c.play();
        c.seek(3);
        c.restart();
        assert_eq!(c.state(), PlaybackState::Completed);
        assert_eq!(c.progress(), 0);
    }

    #[test]
    fn test_start_position_clamped() {
        let c = PlaybackController::new(words(4), 100, 300, 150);
        assert_eq!(c.position(), 3);
        assert_eq!(c.current_word().word, "w3");
        assert_eq!(c.progress(), 75);
    }

    proptest! {
        #[test]
        fn prop_seek_clamps(n in 1usize..200, start in 0usize..200, delta in any::<i64>()) {
            let mut c = PlaybackController::new(words(n), start, 300, 150);
            c.seek(delta);
            prop_assert!(c.position() < n);
            if delta >= 0 {
                prop_assert!(c.position() >= start.min(n - 1));
            } else {
                prop_assert!(c.position() <= start.min(n - 1));
            }
        }
    }
}
