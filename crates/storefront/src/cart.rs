//! Client-side cart and space reservations.
//!
//! Reserving a space takes it from the lesson immediately, so the catalog
//! always shows what is left after the cart. For a lesson that stays in the
//! catalog, `lesson.spaces + cart quantity` is constant across any sequence
//! of [`Cart::reserve`] and [`Cart::release`].

use serde::Serialize;
use tracing::debug;

use lesson_shop_core::{Lesson, LessonId, OrderItem, Price};

/// Reserved spaces of one lesson, with a snapshot of the lesson taken when
/// the first space was reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub lesson_id: LessonId,
    pub subject: String,
    pub location: String,
    pub price: Price,
    pub quantity: u32,
}

impl CartLine {
    fn snapshot(lesson: &Lesson) -> Self {
        Self {
            lesson_id: lesson.id.clone(),
            subject: lesson.subject.clone(),
            location: lesson.location.clone(),
            price: lesson.price,
            quantity: 1,
        }
    }

    /// Price of every space on this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The shopper's cart. Holds at most one line per lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a lesson, if any.
    #[must_use]
    pub fn line(&self, lesson_id: &LessonId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.lesson_id == lesson_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total spaces across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Total price across all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Reserve one space of `lesson`.
    ///
    /// Does nothing and returns `false` when the lesson has no spaces left.
    /// Otherwise takes the space from `lesson` and adds it to the cart.
    pub fn reserve(&mut self, lesson: &mut Lesson) -> bool {
        if lesson.spaces == 0 {
            debug!(lesson_id = %lesson.id, "No spaces left, not reserving");
            return false;
        }

        lesson.spaces -= 1;

        match self.lines.iter_mut().find(|line| line.lesson_id == lesson.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine::snapshot(lesson)),
        }

        debug!(lesson_id = %lesson.id, spaces_left = lesson.spaces, "Reserved space");
        true
    }

    /// Give back one reserved space of `lesson_id`.
    ///
    /// The space returns to the matching lesson in `catalog`. If the lesson is
    /// no longer in the catalog (it was refreshed after the reservation), the
    /// space is not restored anywhere. Returns `false` when the cart holds no
    /// line for `lesson_id`.
    pub fn release(&mut self, lesson_id: &LessonId, catalog: &mut [Lesson]) -> bool {
        let Some(index) = self
            .lines
            .iter()
            .position(|line| &line.lesson_id == lesson_id)
        else {
            return false;
        };

        match catalog.iter_mut().find(|lesson| &lesson.id == lesson_id) {
            Some(lesson) => lesson.spaces = lesson.spaces.saturating_add(1),
            None => debug!(%lesson_id, "Lesson not in catalog, space not restored"),
        }

        let remove = self
            .lines
            .get_mut(index)
            .is_some_and(|line| {
                if line.quantity > 1 {
                    line.quantity -= 1;
                    false
                } else {
                    true
                }
            });
        if remove {
            self.lines.remove(index);
        }

        true
    }

    /// One order item per line.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|line| OrderItem {
                lesson_id: line.lesson_id.clone(),
                quantity: line.quantity,
            })
            .collect()
    }

    /// Drop every line without touching the catalog.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
