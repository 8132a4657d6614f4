use core::net::Ipv4Addr;

use rand::Rng;

/// Generates a random IPv4 address.
///
/// Each octet is uniformly distributed in `0..255`.
pub fn ipv4() -> Ipv4Addr {
    let mut rng = rand::rng();

    Ipv4Addr::new(
        rng.random_range(0..255),
        rng.random_range(0..255),
        rng.random_range(0..255),
        rng.random_range(0..255),
    )
}
