use anyhow::Result;
use fantoccini::elements::Element;
use rand::rngs::OsRng;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Default)]
/// Produces human‑like pauses and typing so form fields react like they do
/// for a person (date pickers validate on each keystroke).
pub struct BehavioralEngine {
    disabled: bool,
}

impl BehavioralEngine {
    pub fn new() -> Self {
        Self { disabled: false }
    }

    /// An engine that never sleeps.
    pub fn instant() -> Self {
        Self { disabled: true }
    }

    /// Sleep for a random duration between `min` and `max` milliseconds.
    pub async fn random_delay(&self, min: u64, max: u64) {
        if self.disabled {
            return;
        }
        sleep(Duration::from_millis(self.pick_delay(min, max))).await;
    }

    fn pick_delay(&self, min: u64, max: u64) -> u64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        OsRng.gen_range(lo..=hi)
    }

    /// Type the provided text with small random delays between characters.
    pub async fn type_text_human_like(&self, element: &Element, text: &str) -> Result<()> {
        if self.disabled {
            element.send_keys(text).await?;
            return Ok(());
        }
        for ch in text.chars() {
            element.send_keys(&ch.to_string()).await?;
            self.random_delay(30, 150).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_stays_within_bounds_even_when_swapped() {
        let engine = BehavioralEngine::new();
        for _ in 0..100 {
            let ms = engine.pick_delay(150, 30);
            assert!((30..=150).contains(&ms));
        }
    }

    #[tokio::test]
    async fn instant_engine_does_not_sleep() {
        let started = std::time::Instant::now();
        BehavioralEngine::instant().random_delay(5_000, 6_000).await;
        assert!(started.elapsed() < Duration::from_millis(1_000));
    }
}
