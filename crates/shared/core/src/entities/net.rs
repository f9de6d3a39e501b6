use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Side of a group's net exposure (long minus short)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetSide {
    NetLong,
    NetShort,
    Flat,
}

impl NetSide {
    /// Classify a net exposure value by sign
    pub fn from_net(net: Decimal) -> Self {
        if net > Decimal::ZERO {
            NetSide::NetLong
        } else if net < Decimal::ZERO {
            NetSide::NetShort
        } else {
            NetSide::Flat
        }
    }

    /// Returns the opposite side; FLAT has no opposite
    pub fn opposite(&self) -> Option<Self> {
        match self {
            NetSide::NetLong => Some(NetSide::NetShort),
            NetSide::NetShort => Some(NetSide::NetLong),
            NetSide::Flat => None,
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, NetSide::Flat)
    }
}

/// Relationship between the two primary groups' net exposure sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetAlignment {
    /// Both groups net on the same side, neither flat
    SameSide,
    /// Groups net on opposite sides, neither flat
    OppositeSide,
    /// At least one group is flat
    Unknown,
}

impl NetAlignment {
    /// Classify the relationship between two net sides
    pub fn compare(a: NetSide, b: NetSide) -> Self {
        if a.is_flat() || b.is_flat() {
            NetAlignment::Unknown
        } else if a == b {
            NetAlignment::SameSide
        } else {
            NetAlignment::OppositeSide
        }
    }
}
