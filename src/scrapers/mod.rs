//! Site-specific layouts for pages that generic extraction cannot read.
//!
//! Some publishers still serve archive pages built from nested tables, long
//! before `<article>` and `<main>` existed. Each module here describes one such
//! site: which hosts it owns and which selectors locate the story body, in the
//! order they should be tried.
//!
//! # Registered Sites
//!
//! | Site | Module | Hosts | Layout |
//! |------|--------|-------|--------|
//! | CNN  | [`cnn`] | `cnn.com` and subdomains | Table cells and legacy paragraph classes |
//!
//! Adding a site means adding a module with a [`LegacySite`] constant and
//! listing it in [`REGISTRY`]. Nothing else needs to change.

pub mod cnn;

/// A legacy-markup site and the selectors that find its story text.
#[derive(Debug, Clone, Copy)]
pub struct LegacySite {
    /// Short name used in logs.
    pub name: &'static str,
    /// Whether a (lowercase) host belongs to this site.
    pub matches_host: fn(&str) -> bool,
    /// CSS selectors for the story body, highest priority first.
    pub selectors: &'static [&'static str],
}

/// Every known legacy site, checked in order.
pub static REGISTRY: &[LegacySite] = &[cnn::SITE];

/// Find the site in `registry` that owns `host`, if any.
pub fn lookup(registry: &'static [LegacySite], host: &str) -> Option<&'static LegacySite> {
    let host = host.to_ascii_lowercase();
    registry.iter().find(|site| (site.matches_host)(&host))
}

/// Whether `host` is `domain` or one of its subdomains.
pub fn host_in_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
