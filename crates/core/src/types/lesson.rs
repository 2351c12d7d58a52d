//! Catalog item type.

use serde::{Deserialize, Serialize};

use crate::types::{LessonId, Price};

/// A purchasable lesson with a finite number of remaining spaces.
///
/// The backend names the identifier `_id`; plain `id` is accepted too.
/// Unknown fields (images, icons) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Identifier assigned by the remote store. May go stale if the store's
    /// records are recreated.
    #[serde(rename = "_id", alias = "id")]
    pub id: LessonId,
    /// What is taught.
    pub subject: String,
    /// Where it is taught.
    pub location: String,
    /// Cost per space.
    pub price: Price,
    /// Remaining purchasable spaces.
    pub spaces: u32,
}

impl Lesson {
    /// Whether at least one space is left.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.spaces > 0
    }

    /// Whether this lesson has the given subject, location and price.
    ///
    /// Used to rediscover a lesson whose id has gone stale.
    #[must_use]
    pub fn same_listing(&self, subject: &str, location: &str, price: Price) -> bool {
        self.subject == subject && self.location == location && self.price == price
    }
}
