use configs::ClientConfig;

/// A source the mirror can answer from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Remote,
    Local,
}

/// What happens to records created by the remote tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergePolicy {
    /// Store the returned record in the local copy as well.
    CacheRemoteCreates,
    NoMerge,
}

/// Tier order plus merge behaviour for an [`crate::OrderMirror`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionPolicy {
    tiers: Vec<Tier>,
    pub merge: MergePolicy,
}

impl ResolutionPolicy {
    pub fn new(tiers: Vec<Tier>, merge: MergePolicy) -> Self {
        let mut deduped = Vec::with_capacity(tiers.len());
        for tier in tiers {
            if !deduped.contains(&tier) {
                deduped.push(tier);
            }
        }
        Self { tiers: deduped, merge }
    }

    /// Backend first, local copy on failure, remote creates cached locally.
    pub fn remote_first() -> Self {
        Self::new(vec![Tier::Remote, Tier::Local], MergePolicy::CacheRemoteCreates)
    }

    pub fn local_only() -> Self {
        Self::new(vec![Tier::Local], MergePolicy::NoMerge)
    }

    pub fn from_config(cfg: &ClientConfig) -> Self {
        if cfg.use_backend { Self::remote_first() } else { Self::local_only() }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn caches_remote_creates(&self) -> bool {
        self.merge == MergePolicy::CacheRemoteCreates
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self::remote_first()
    }
}
