use sea_orm::sea_query::Order;

/// The orderings a list endpoint accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    RatingDesc,
    /// Creation time descending
    #[default]
    Newest,
}

/// Map the `sort` keyword onto a [`SortKey`]; unknown or absent input sorts newest first.
#[must_use]
pub fn parse_sort(sort: Option<&str>) -> SortKey {
    match sort {
        Some("price_asc") => SortKey::PriceAsc,
        Some("price_desc") => SortKey::PriceDesc,
        Some("rating_desc") => SortKey::RatingDesc,
        _ => SortKey::Newest,
    }
}

/// Columns a catalog can be ordered by
#[derive(Debug, Clone, Copy)]
pub struct SortColumns<C> {
    pub price: C,
    pub rating: C,
    pub created_at: C,
}

impl<C: Copy> SortColumns<C> {
    /// The primary ordering for `key`
    #[must_use]
    pub fn order_for(&self, key: SortKey) -> (C, Order) {
        match key {
            SortKey::PriceAsc => (self.price, Order::Asc),
            SortKey::PriceDesc => (self.price, Order::Desc),
            SortKey::RatingDesc => (self.rating, Order::Desc),
            SortKey::Newest => (self.created_at, Order::Desc),
        }
    }
}
