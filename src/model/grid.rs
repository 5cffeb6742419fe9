//! Sort state for the comparison grid

use super::quote::Quote;
use std::cmp::Ordering;

/// Sort applied to the price column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceSort {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl PriceSort {
    /// An ascending column flips to descending; anything else becomes ascending
    pub fn toggled(self) -> PriceSort {
        match self {
            PriceSort::Ascending => PriceSort::Descending,
            PriceSort::Unsorted | PriceSort::Descending => PriceSort::Ascending,
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            PriceSort::Unsorted => "↕",
            PriceSort::Ascending => "↑",
            PriceSort::Descending => "↓",
        }
    }
}

/// Row order for the grid, as indices into `quotes`
///
/// The key is whatever price is currently displayed, so switching the view
/// while sorted reorders against the new value. Rows without a displayed
/// price go last in either direction; ties keep load order.
pub fn row_order(quotes: &[Quote], normalize: bool, sort: PriceSort) -> Vec<usize> {
    let mut order: Vec<usize> = (0..quotes.len()).collect();
    if sort == PriceSort::Unsorted {
        return order;
    }

    order.sort_by(|&a, &b| {
        let left = quotes[a].displayed_price(normalize);
        let right = quotes[b].displayed_price(normalize);
        match (left, right) {
            (Some(l), Some(r)) => match sort {
                PriceSort::Descending => r.total_cmp(&l),
                _ => l.total_cmp(&r),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::fixtures::quote;

    fn priced(id: &str, raw: f64, normalized: Option<f64>) -> Quote {
        let mut q = quote(id);
        q.total_price = raw;
        q.normalized_total_price_usd = normalized;
        q
    }

    fn ids(quotes: &[Quote], order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| quotes[i].id.to_string()).collect()
    }

    #[test]
    fn test_toggle_cycle() {
        let sort = PriceSort::Unsorted.toggled();
        assert_eq!(sort, PriceSort::Ascending);
        let sort = sort.toggled();
        assert_eq!(sort, PriceSort::Descending);
        assert_eq!(sort.toggled(), PriceSort::Ascending);
    }

    #[test]
    fn test_unsorted_keeps_load_order() {
        let quotes = vec![priced("a", 3.0, None), priced("b", 1.0, None)];
        assert_eq!(row_order(&quotes, false, PriceSort::Unsorted), vec![0, 1]);
    }

    #[test]
    fn test_view_switch_resorts_on_displayed_value() {
        // Raw prices are in mixed currencies, so raw and USD order disagree
        let quotes = vec![
            priced("cny", 7000.0, Some(980.0)),
            priced("usd", 1000.0, Some(1000.0)),
            priced("eur", 900.0, Some(990.0)),
        ];

        let raw = row_order(&quotes, false, PriceSort::Ascending);
        assert_eq!(ids(&quotes, &raw), vec!["eur", "usd", "cny"]);

        let normalized = row_order(&quotes, true, PriceSort::Ascending);
        assert_eq!(ids(&quotes, &normalized), vec!["cny", "eur", "usd"]);
    }

    #[test]
    fn test_missing_normalized_price_sorts_last() {
        let quotes = vec![
            priced("none", 10.0, None),
            priced("high", 20.0, Some(200.0)),
            priced("low", 30.0, Some(100.0)),
        ];

        let asc = row_order(&quotes, true, PriceSort::Ascending);
        assert_eq!(ids(&quotes, &asc), vec!["low", "high", "none"]);

        let desc = row_order(&quotes, true, PriceSort::Descending);
        assert_eq!(ids(&quotes, &desc), vec!["high", "low", "none"]);
    }
}
