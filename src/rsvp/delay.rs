/// Display time in milliseconds for `word` at `wpm`.
///
/// Sentence punctuation adds the full pause, a trailing comma half of it,
/// and a long word without either is shown 20% longer. `wpm` is assumed
/// positive; callers clamp it first.
pub fn delay(word: &str, wpm: u32, punctuation_pause_ms: u32) -> f64 {
    let base = 60_000.0 / f64::from(wpm);
    let pause = f64::from(punctuation_pause_ms);

    match word.chars().last() {
        Some('.' | '!' | '?' | ';' | ':') => base + pause,
        Some(',') => base + pause / 2.0,
        _ if word.chars().count() > 10 => base * 1.2,
        _ => base,
    }
}
