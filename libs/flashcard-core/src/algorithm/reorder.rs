//! Fractional-rank reinsertion of a rated card.

use crate::types::Rating;

/// Order given to a card when it is the only one in the queue.
pub const FIRST_ORDER: f64 = 1.0;

/// Gap left after the tail when a card is appended.
pub const TAIL_GAP: f64 = 10.0;

/// Where a rated card lands among the `count` other cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// 0-based slot in the sequence of other cards.
    pub index: usize,
    pub count: usize,
}

/// Rows of the ordered sequence that the new order is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

impl Placement {
    pub fn new(index: usize, count: usize) -> Self {
        Self {
            index: index.min(count),
            count,
        }
    }

    pub fn for_rating(rating: Rating, count: usize) -> Self {
        Self::new(rating.target_index(count), count)
    }

    /// Neighbour rows needed to compute the new order, `None` for an empty queue.
    pub fn window(&self) -> Option<Window> {
        if self.count == 0 {
            None
        } else if self.index >= self.count {
            Some(Window {
                offset: self.count - 1,
                limit: 1,
            })
        } else if self.index == 0 {
            Some(Window { offset: 0, limit: 1 })
        } else {
            Some(Window {
                offset: self.index - 1,
                limit: 2,
            })
        }
    }

    /// Compute the new order from the orders returned for [`Placement::window`].
    ///
    /// A window shorter than requested means the queue shrank since it was
    /// counted; the card is then placed after whatever was found.
    pub fn order_from(&self, window: &[f64]) -> f64 {
        if self.count == 0 {
            return FIRST_ORDER;
        }

        match window {
            [] => FIRST_ORDER,
            [first, ..] if self.index == 0 => first / 2.0,
            [prev, next, ..] if self.index < self.count => (prev + next) / 2.0,
            [.., last] => last + TAIL_GAP,
        }
    }
}

/// New order for a card rated `rating`, given the ascending orders of every
/// other card.
#[cfg(test)]
fn new_order(sorted_orders: &[f64], rating: Rating) -> f64 {
    let placement = Placement::for_rating(rating, sorted_orders.len());
    let window: &[f64] = match placement.window() {
        Some(w) => &sorted_orders[w.offset..w.offset + w.limit],
        None => &[],
    };
    placement.order_from(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sequence(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn empty_queue_starts_at_one() {
        for rating in Rating::ALL {
            assert_eq!(new_order(&[], rating), 1.0);
        }
    }

    #[test]
    fn empty_queue_has_no_window() {
        assert_eq!(Placement::new(0, 0).window(), None);
    }

    #[test]
    fn study_more_lands_after_ten_cards() {
        let orders = sequence(30);
        // Between the 10th (10.0) and 11th (11.0) card.
        assert_eq!(new_order(&orders, Rating::StudyMore), 10.5);
    }

    #[test]
    fn so_so_lands_after_twenty_five_cards() {
        let orders = sequence(40);
        assert_eq!(new_order(&orders, Rating::SoSo), 25.5);
    }

    #[test]
    fn understood_in_short_queue_uses_midpoint() {
        let orders = vec![1.0, 2.0, 4.0, 8.0, 16.0];
        // floor(5 * 0.9) = 4 -> between orders[3] and orders[4].
        assert_eq!(new_order(&orders, Rating::Understood), 12.0);
    }

    #[test]
    fn short_queue_appends_past_tail() {
        let orders = vec![3.0, 7.0];
        assert_eq!(new_order(&orders, Rating::StudyMore), 17.0);
        assert_eq!(new_order(&orders, Rating::SoSo), 17.0);
    }

    #[test]
    fn single_card_understood_goes_before_head() {
        // floor(1 * 0.9) = 0 -> insert before the head.
        assert_eq!(new_order(&[6.0], Rating::Understood), 3.0);
    }

    #[test]
    fn window_for_middle_slot_covers_both_neighbours() {
        let placement = Placement::for_rating(Rating::StudyMore, 30);
        assert_eq!(placement.index, 10);
        assert_eq!(placement.window(), Some(Window { offset: 9, limit: 2 }));
    }

    #[test]
    fn window_for_tail_is_last_row() {
        let placement = Placement::for_rating(Rating::SoSo, 7);
        assert_eq!(placement.window(), Some(Window { offset: 6, limit: 1 }));
    }

    #[test]
    fn window_for_head_is_first_row() {
        let placement = Placement::new(0, 3);
        assert_eq!(placement.window(), Some(Window { offset: 0, limit: 1 }));
        assert_eq!(placement.order_from(&[5.0]), 2.5);
    }

    #[test]
    fn index_is_clamped_to_count() {
        assert_eq!(Placement::new(9, 4).index, 4);
    }

    #[test]
    fn shrunk_window_falls_back_to_after_found_row() {
        let placement = Placement::new(5, 20);
        assert_eq!(placement.order_from(&[4.0]), 14.0);
        assert_eq!(placement.order_from(&[]), 1.0);
    }

    #[test]
    fn result_is_reproducible() {
        let orders: Vec<f64> = (0..50).map(|i| i as f64 * 1.5).collect();
        for rating in Rating::ALL {
            assert_eq!(new_order(&orders, rating), new_order(&orders, rating));
        }
    }

    #[test]
    fn new_order_preserves_neighbours() {
        let orders: Vec<f64> = (1..=60).map(|i| i as f64).collect();
        for rating in Rating::ALL {
            let placement = Placement::for_rating(rating, orders.len());
            let order = new_order(&orders, rating);
            if placement.index > 0 {
                assert!(order > orders[placement.index - 1]);
            }
            if placement.index < orders.len() {
                assert!(order < orders[placement.index]);
            }
        }
    }
}
