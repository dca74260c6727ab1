//! CNN legacy article layout.
//!
//! CNN archive pages from the late 1990s through the 2000s put the story in
//! table cells rather than semantic containers. Depending on the era the body
//! lives in one of:
//!
//! - `<td class="cnnBodyText">` cells
//! - the 70% wide content column of the page table
//! - `<p class="cnn_storypgraphtxt">` paragraphs
//!
//! # URL Pattern
//!
//! Archive stories look like `http://www.cnn.com/2003/WORLD/meast/03/20/sprj.irq.main/`,
//! and are also served from regional subdomains such as `edition.cnn.com`.

use super::{LegacySite, host_in_domain};

/// The CNN entry in [`super::REGISTRY`].
pub const SITE: LegacySite = LegacySite {
    name: "cnn",
    matches_host,
    selectors: &[
        "td.cnnBodyText",
        "td[width=\"70%\"]",
        "p.cnn_storypgraphtxt",
    ],
};

fn matches_host(host: &str) -> bool {
    host_in_domain(host, "cnn.com")
}
