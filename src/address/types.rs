//! Core types for address decomposition.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which slot of [`AddressFragments`] a rule fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Region,
    Settlement,
    Street,
    House,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region => write!(f, "region"),
            Self::Settlement => write!(f, "settlement"),
            Self::Street => write!(f, "street"),
            Self::House => write!(f, "house"),
        }
    }
}

/// Typed pieces of a decomposed address. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFragments {
    pub region: Option<String>,
    pub settlement: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
}

impl AddressFragments {
    pub fn get(&self, kind: FragmentKind) -> Option<&str> {
        match kind {
            FragmentKind::Region => self.region.as_deref(),
            FragmentKind::Settlement => self.settlement.as_deref(),
            FragmentKind::Street => self.street.as_deref(),
            FragmentKind::House => self.house.as_deref(),
        }
    }

    pub fn set(&mut self, kind: FragmentKind, value: String) {
        let slot = match kind {
            FragmentKind::Region => &mut self.region,
            FragmentKind::Settlement => &mut self.settlement,
            FragmentKind::Street => &mut self.street,
            FragmentKind::House => &mut self.house,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.settlement.is_none() && self.street.is_none() && self.house.is_none()
    }
}
