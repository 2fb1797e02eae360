//! Expansion of sender declarations into addressed fixture instances
//!
//! Runs once when the consumer is built. The result is immutable and is shared
//! with the refresh worker without locking.

use std::net::{Ipv4Addr, SocketAddr};

use crate::config::{Configuration, FixtureDecl, FixtureType, SenderDecl};
use crate::error::{ArtNetError, Result};
use crate::geometry::{Rectangle, RectangleSolver};

/// One physical fixture with its resolved channel offset and sample area
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedFixture {
    pub fixture_type: FixtureType,
    /// 0-based offset into the universe
    pub address: usize,
    pub rectangle: Rectangle,
}

/// A sender with a resolved endpoint and its flattened fixture list
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedSender {
    pub endpoint: SocketAddr,
    pub universe: u16,
    pub fixtures: Vec<ComputedFixture>,
}

/// Expand every declared fixture group into one instance per repeat index.
///
/// Instance `i` of a group is addressed at `start_address + i * fixture_channels`.
pub fn compute_fixtures(
    fixtures: &[FixtureDecl],
    solver: &dyn RectangleSolver,
) -> Vec<ComputedFixture> {
    fixtures
        .iter()
        .flat_map(|decl| {
            (0..decl.fixture_count).map(move |i| ComputedFixture {
                fixture_type: decl.fixture_type,
                address: decl.start_address + i * decl.fixture_channels,
                rectangle: solver.compute_rectangle(&decl.fixture_box, i, decl.fixture_count),
            })
        })
        .collect()
}

/// Resolve a sender's host and port to a socket address.
///
/// Art-Net runs over IPv4, so the host must be an IPv4 literal.
pub fn resolve_endpoint(host: &str, port: u16) -> Result<SocketAddr> {
    let ip: Ipv4Addr = host.trim().parse().map_err(|source| ArtNetError::InvalidHost {
        host: host.to_string(),
        source,
    })?;
    Ok(SocketAddr::new(ip.into(), port))
}

/// Build the immutable sender list for a validated configuration.
pub fn compute_senders(
    config: &Configuration,
    solver: &dyn RectangleSolver,
) -> Result<Vec<ComputedSender>> {
    config
        .senders()
        .iter()
        .map(|sender| compute_sender(sender, solver))
        .collect()
}

fn compute_sender(sender: &SenderDecl, solver: &dyn RectangleSolver) -> Result<ComputedSender> {
    let endpoint = resolve_endpoint(&sender.host, sender.port)?;
    let fixtures = compute_fixtures(&sender.fixtures, solver);

    tracing::debug!(
        "Computed sender {} (universe {}) with {} fixtures",
        endpoint,
        sender.universe,
        fixtures.len()
    );

    Ok(ComputedSender {
        endpoint,
        universe: sender.universe,
        fixtures,
    })
}
