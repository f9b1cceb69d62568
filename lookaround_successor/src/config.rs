/// Options for lookaround merging.
///
/// ```
/// use lookaround_successor::Config;
///
/// let config = Config::new().canonicalize_lookaheads(true);
/// assert!(config.get_canonicalize_lookaheads());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Config {
    canonicalize_lookaheads: Option<bool>,
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    /// Run the canonicalizer once more after all lookaheads are folded.
    ///
    /// Lookbehind contributions are always partitioned into disjoint
    /// character sets. Lookahead folding is not, so after two or more
    /// lookaheads the resolved builders may overlap. Enabling this makes the
    /// output of `resolve` pairwise disjoint in every case.
    ///
    /// This is disabled by default.
    pub fn canonicalize_lookaheads(mut self, yes: bool) -> Config {
        self.canonicalize_lookaheads = Some(yes);
        self
    }

    pub fn get_canonicalize_lookaheads(&self) -> bool {
        self.canonicalize_lookaheads.unwrap_or(false)
    }
}
