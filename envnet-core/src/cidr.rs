//! IPv4 CIDR blocks
//!
//! A [`Cidr`] is a network address plus prefix length. Parsing rejects
//! addresses with host bits set, so every value is a canonical network.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum IPv4 prefix length
pub const MAX_LENGTH: u8 = 32;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrError {
    #[error("Invalid CIDR format '{0}': expected IP/prefix")]
    Format(String),

    #[error("Invalid IP address '{0}': expected 4 octets of 0-255")]
    Address(String),

    #[error("Invalid prefix length '{0}': must be 0-32")]
    PrefixLength(String),

    #[error("'{0}' has host bits set; network address is {1}")]
    HostBits(String, Ipv4Addr),
}

/// An IPv4 network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cidr {
    addr: Ipv4Addr,
    len: u8,
}

/// Netmask for a prefix length as u32
pub fn mask(len: u8) -> u32 {
    match len {
        0 => 0,
        l if l >= MAX_LENGTH => u32::MAX,
        l => u32::MAX << (MAX_LENGTH - l),
    }
}

impl Cidr {
    pub fn new(addr: Ipv4Addr, len: u8) -> Result<Self, CidrError> {
        if len > MAX_LENGTH {
            return Err(CidrError::PrefixLength(len.to_string()));
        }
        let bits = u32::from(addr);
        let network = bits & mask(len);
        if network != bits {
            return Err(CidrError::HostBits(
                format!("{}/{}", addr, len),
                Ipv4Addr::from(network),
            ));
        }
        Ok(Self { addr, len })
    }

    /// Block of length `len` containing `addr`, clearing any host bits
    pub fn truncate(addr: Ipv4Addr, len: u8) -> Self {
        let len = len.min(MAX_LENGTH);
        Self {
            addr: Ipv4Addr::from(u32::from(addr) & mask(len)),
            len,
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Last address in the block
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) | !mask(self.len))
    }

    /// Total number of addresses in the block
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.len)
    }

    /// True if `other` lies entirely within this block
    pub fn contains(&self, other: &Cidr) -> bool {
        other.len >= self.len && u32::from(other.addr) & mask(self.len) == u32::from(self.addr)
    }

    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ip, prefix) = s
            .split_once('/')
            .ok_or_else(|| CidrError::Format(s.to_string()))?;
        let addr: Ipv4Addr = ip
            .parse()
            .map_err(|_| CidrError::Address(ip.to_string()))?;
        let len: u8 = prefix
            .parse()
            .map_err(|_| CidrError::PrefixLength(prefix.to_string()))?;
        Cidr::new(addr, len)
    }
}
