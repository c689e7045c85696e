//! Synthesized engagement numbers
//!
//! The social API has no engagement data, so comment counts and post times are
//! made up on every computation pass: `(post.id mod K) + uniform[0, M)` for
//! comments, "now minus up to 24h" for timestamps. Each view uses its own K and
//! M. The numbers are not consistent between views or between passes.
//!
//! Everything goes through a seedable PRNG; setting `ENGAGEMENT_SEED` makes
//! every pass reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::Post;

pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Comment count shape for one view: `(id mod modulus) + uniform[0, spread)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementProfile {
    pub modulus: i64,
    pub spread: u64,
}

impl EngagementProfile {
    pub const FEED: Self = Self {
        modulus: 15,
        spread: 30,
    };
    pub const TOP_USERS: Self = Self {
        modulus: 20,
        spread: 30,
    };
    pub const TRENDING: Self = Self {
        modulus: 20,
        spread: 50,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Feed,
    TopUsers,
    Trending,
}

impl View {
    pub fn profile(self) -> EngagementProfile {
        match self {
            View::Feed => EngagementProfile::FEED,
            View::TopUsers => EngagementProfile::TOP_USERS,
            View::Trending => EngagementProfile::TRENDING,
        }
    }

    // Keeps views on distinct streams when a fixed seed is configured
    fn salt(self) -> u64 {
        match self {
            View::Feed => 0x9e37_79b9_7f4a_7c15,
            View::TopUsers => 0xbf58_476d_1ce4_e5b9,
            View::Trending => 0x94d0_49bb_1331_11eb,
        }
    }
}

pub struct EngagementSimulator {
    profile: EngagementProfile,
    rng: StdRng,
}

impl EngagementSimulator {
    pub fn new(profile: EngagementProfile, rng: StdRng) -> Self {
        Self { profile, rng }
    }

    pub fn comment_count(&mut self, post: &Post) -> u64 {
        let base = post.id.rem_euclid(self.profile.modulus.max(1)) as u64;
        let noise = if self.profile.spread == 0 {
            0
        } else {
            self.rng.gen_range(0..self.profile.spread)
        };
        base + noise
    }

    /// A moment within the 24 hours before `now_millis`
    pub fn timestamp_before(&mut self, now_millis: i64) -> i64 {
        now_millis - self.rng.gen_range(0..DAY_MILLIS)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Hands out a simulator per computation pass
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementSeed(Option<u64>);

impl EngagementSeed {
    pub fn fixed(seed: u64) -> Self {
        Self(Some(seed))
    }

    pub fn entropy() -> Self {
        Self(None)
    }

    pub fn simulator(&self, view: View) -> EngagementSimulator {
        EngagementSimulator::new(view.profile(), self.rng(view.salt()))
    }

    /// Generator for purely decorative card numbers (likes, shares)
    pub fn card_rng(&self) -> StdRng {
        self.rng(0x2545_f491_4f6c_dd1d)
    }

    fn rng(&self, salt: u64) -> StdRng {
        match self.0 {
            Some(seed) => StdRng::seed_from_u64(seed ^ salt),
            None => StdRng::from_entropy(),
        }
    }
}
