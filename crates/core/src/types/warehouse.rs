//! Warehouse sites.

use serde::{Deserialize, Serialize};

/// Error returned when a warehouse name does not match a known site.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown warehouse: {0}. Valid warehouses: Lorenzo, Oroquieta")]
pub struct UnknownWarehouse(pub String);

/// One of the two physical warehouse sites stock can sit in.
///
/// Stock records store the site as a plain string so that files written by
/// newer deployments (with sites this build does not know) still round-trip.
/// Use [`Warehouse::from_name`] to check whether a stored name refers to a
/// known site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Warehouse {
    /// Main showroom warehouse in San Lorenzo.
    Lorenzo,
    /// Overflow warehouse on Oroquieta Street.
    Oroquieta,
}

impl Warehouse {
    /// All known sites, in display order.
    pub const ALL: [Self; 2] = [Self::Lorenzo, Self::Oroquieta];

    /// Get the site name as stored in stock records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lorenzo => "Lorenzo",
            Self::Oroquieta => "Oroquieta",
        }
    }

    /// Look up a site by its exact stored name.
    ///
    /// Returns `None` for names this build does not know. Stock held under
    /// unknown names is preserved but excluded from availability totals.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|site| site.as_str() == name)
    }
}

impl std::fmt::Display for Warehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Warehouse {
    type Err = UnknownWarehouse;

    /// Parse a site from user input, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|site| site.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownWarehouse(s.to_owned()))
    }
}
