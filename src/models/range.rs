// file: src/models/range.rs
// description: validated CIDR range model with address family detection
// reference: RFC 8805 geofeed format, RFC 4632 CIDR notation

use ipnet::IpNet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    pub fn from_net(net: &IpNet) -> Self {
        match net {
            IpNet::V4(_) => AddressFamily::V4,
            IpNet::V6(_) => AddressFamily::V6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "v4",
            AddressFamily::V6 => "v6",
        }
    }
}

/// A range that passed validation. `address` keeps the text the feed used, so
/// `2001:DB8::/32` is written back as `2001:DB8::/32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRange {
    pub family: AddressFamily,
    pub net: IpNet,
    pub address: String,
}

impl ParsedRange {
    /// Pairs a validated network with the address text it was parsed from.
    pub fn written(net: IpNet, address: impl Into<String>) -> Self {
        Self {
            family: AddressFamily::from_net(&net),
            net,
            address: address.into(),
        }
    }

    pub fn mask(&self) -> u8 {
        self.net.prefix_len()
    }
}

impl fmt::Display for ParsedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.mask())
    }
}

/// How a single geofeed line was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Blank line or `#` comment.
    Comment,
    Range {
        range: ParsedRange,
        candidate: &'a str,
    },
    Malformed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn host(text: &str) -> ParsedRange {
        let address: IpAddr = text.parse().unwrap();
        ParsedRange::written(IpNet::from(address), text)
    }

    #[test]
    fn test_host_networks_use_full_mask() {
        let v4 = host("198.51.100.1");
        assert_eq!(v4.family, AddressFamily::V4);
        assert_eq!(v4.to_string(), "198.51.100.1/32");

        let v6 = host("::1");
        assert_eq!(v6.family, AddressFamily::V6);
        assert_eq!(v6.to_string(), "::1/128");
    }

    #[test]
    fn test_written_keeps_address_text() {
        let net: IpNet = "2001:db8::/32".parse().unwrap();
        let range = ParsedRange::written(net, "2001:DB8::");
        assert_eq!(range.family, AddressFamily::V6);
        assert_eq!(range.mask(), 32);
        assert_eq!(range.to_string(), "2001:DB8::/32");
    }

    #[test]
    fn test_family_labels() {
        assert_eq!(AddressFamily::V4.as_str(), "v4");
        assert_eq!(AddressFamily::V6.as_str(), "v6");
    }
}
