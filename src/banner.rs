//! Success and error banners with independent auto-hide deadlines.

use std::time::{Duration, Instant};

pub const DEFAULT_BANNER_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct Banner {
    text: String,
    hide_at: Option<Instant>,
}

impl Banner {
    pub fn show(&mut self, text: &str, now: Instant, timeout: Duration) {
        self.text = text.to_string();
        self.hide_at = Some(now + timeout);
    }

    pub fn hide(&mut self) {
        self.hide_at = None;
    }

    pub fn is_visible(&self) -> bool {
        self.hide_at.is_some()
    }

    /// Text last shown, kept after hiding
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hide the banner if its deadline has passed. Returns true if it was hidden.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }
}

/// The pair of banners a contact form shows
#[derive(Debug, Clone)]
pub struct Banners {
    pub success: Banner,
    pub error: Banner,
    timeout: Duration,
}

impl Banners {
    pub fn new(timeout: Duration) -> Self {
        Self {
            success: Banner::default(),
            error: Banner::default(),
            timeout,
        }
    }

    pub fn get(&self, kind: BannerKind) -> &Banner {
        match kind {
            BannerKind::Success => &self.success,
            BannerKind::Error => &self.error,
        }
    }

    fn get_mut(&mut self, kind: BannerKind) -> &mut Banner {
        match kind {
            BannerKind::Success => &mut self.success,
            BannerKind::Error => &mut self.error,
        }
    }

    pub fn show(&mut self, kind: BannerKind, text: &str, now: Instant) {
        let timeout = self.timeout;
        self.get_mut(kind).show(text, now, timeout);
    }

    pub fn hide(&mut self, kind: BannerKind) {
        self.get_mut(kind).hide();
    }

    pub fn expire(&mut self, now: Instant) {
        self.success.expire(now);
        self.error.expire(now);
    }
}

impl Default for Banners {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_TIMEOUT)
    }
}
