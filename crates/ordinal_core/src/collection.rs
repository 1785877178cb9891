//! Collection registry.
//!
//! Every ordered collection is a variant of [`Collection`], mapped at compile
//! time to its physical table and columns. An unsupported collection cannot
//! be named inside the library; names only arrive as strings at the edges
//! (CLI arguments, config files) where [`Collection::from_str`] rejects them.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical location of a collection's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionDescriptor {
    /// Logical name used by callers.
    pub name: &'static str,
    /// Table holding the rows.
    pub table: &'static str,
    /// Column holding the row id.
    pub id_field: &'static str,
    /// Column holding the position.
    pub position_field: &'static str,
}

/// An independently ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Points of interest.
    Places,
    /// Guided excursions.
    Excursions,
    /// Restaurants.
    Restaurants,
    /// Supermarkets.
    Supermarkets,
    /// Local services.
    Services,
    /// Destinations grouping places.
    Destinations,
}

impl Collection {
    /// Every registered collection.
    pub const ALL: [Collection; 6] = [
        Collection::Places,
        Collection::Excursions,
        Collection::Restaurants,
        Collection::Supermarkets,
        Collection::Services,
        Collection::Destinations,
    ];

    /// Returns the registry entry for this collection.
    #[must_use]
    pub const fn descriptor(self) -> CollectionDescriptor {
        match self {
            Collection::Places => CollectionDescriptor {
                name: "places",
                table: "places",
                id_field: "id",
                position_field: "position",
            },
            Collection::Excursions => CollectionDescriptor {
                name: "excursions",
                table: "excursions",
                id_field: "id",
                position_field: "position",
            },
            Collection::Restaurants => CollectionDescriptor {
                name: "restaurants",
                table: "restaurants",
                id_field: "id",
                position_field: "position",
            },
            Collection::Supermarkets => CollectionDescriptor {
                name: "supermarkets",
                table: "supermarkets",
                id_field: "id",
                position_field: "position",
            },
            Collection::Services => CollectionDescriptor {
                name: "services",
                table: "services",
                id_field: "id",
                position_field: "display_order",
            },
            Collection::Destinations => CollectionDescriptor {
                name: "destinations",
                table: "destinations",
                id_field: "id",
                position_field: "order_position",
            },
        }
    }

    /// Logical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::unknown_collection(wanted))
    }
}
