use sea_orm::{ColumnTrait, Condition, Value};

use super::sanitize::{
    PrescriptionFlag, PriceRange, build_price_filter, map_ui_status, parse_in_stock_flag,
    parse_prescription_flag, parse_product_kind, sanitize_category,
};
use super::search::{TextSearch, make_text_search_or};
use crate::models::{ListQuery, PrescriptionStatus, ProductKind};

/// The filter dimensions a resource allows, each bound to a fixed column.
///
/// A dimension left as `None` is not on the allow-list: its query parameter
/// is never read. Column tokens are the entity's `Column` variants, so no
/// field name in a filter can come from the request.
#[derive(Debug, Clone)]
pub struct FilterColumns<C> {
    pub kind: Option<C>,
    pub category: Option<C>,
    pub in_stock: Option<C>,
    pub prescription: Option<C>,
    pub price: Option<C>,
    pub status: Option<C>,
    pub search: Vec<C>,
}

impl<C> Default for FilterColumns<C> {
    fn default() -> Self {
        Self {
            kind: None,
            category: None,
            in_stock: None,
            prescription: None,
            price: None,
            status: None,
            search: Vec::new(),
        }
    }
}

impl<C: ColumnTrait> FilterColumns<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, column: C) -> Self {
        self.kind = Some(column);
        self
    }

    #[must_use]
    pub fn category(mut self, column: C) -> Self {
        self.category = Some(column);
        self
    }

    #[must_use]
    pub fn in_stock(mut self, column: C) -> Self {
        self.in_stock = Some(column);
        self
    }

    #[must_use]
    pub fn prescription(mut self, column: C) -> Self {
        self.prescription = Some(column);
        self
    }

    #[must_use]
    pub fn price(mut self, column: C) -> Self {
        self.price = Some(column);
        self
    }

    #[must_use]
    pub fn status(mut self, column: C) -> Self {
        self.status = Some(column);
        self
    }

    /// Columns searched by `q`; a row matches if any of them contains the term
    #[must_use]
    pub fn search(mut self, columns: impl IntoIterator<Item = C>) -> Self {
        self.search = columns.into_iter().collect();
        self
    }
}

/// Validated, typed list constraints for one request.
///
/// Every field is either absent or already validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    pub kind: Option<ProductKind>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    pub prescription: PrescriptionFlag,
    pub text_query: Option<String>,
    pub price: Option<PriceRange>,
    pub status: Option<PrescriptionStatus>,
}

impl FilterSpec {
    /// Read the dimensions `columns` allows from the raw query; ignore the rest
    #[must_use]
    pub fn from_query<C>(query: &ListQuery, columns: &FilterColumns<C>) -> Self {
        let mut spec = Self::default();
        if columns.kind.is_some() {
            spec.kind = parse_product_kind(query.kind.as_deref());
        }
        if columns.category.is_some() {
            spec.category = sanitize_category(query.category.as_deref());
        }
        if columns.in_stock.is_some() {
            spec.in_stock = parse_in_stock_flag(query.in_stock.as_deref());
        }
        if columns.prescription.is_some() {
            spec.prescription = parse_prescription_flag(query.prescription.as_deref());
        }
        if columns.price.is_some() {
            spec.price = build_price_filter(query.price_min.as_deref(), query.price_max.as_deref());
        }
        if columns.status.is_some() {
            spec.status = map_ui_status(query.status.as_deref());
        }
        if !columns.search.is_empty() {
            spec.text_query = query.q.as_deref().and_then(trimmed_search);
        }
        spec
    }
}

/// Trim a raw `q`. An empty term stays present and fails closed; a term of
/// only whitespace is treated as no search at all.
fn trimmed_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() && !raw.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// One predicate of a [`SafeFilter`]
#[derive(Debug, Clone)]
pub enum Predicate<C> {
    Equals(C, Value),
    AtLeast(C, f64),
    AtMost(C, f64),
    AnyContains(TextSearch<C>),
}

impl<C: ColumnTrait> Predicate<C> {
    fn to_condition(&self) -> Condition {
        match self {
            Self::Equals(column, value) => Condition::all().add(column.eq(value.clone())),
            Self::AtLeast(column, bound) => Condition::all().add(column.gte(*bound)),
            Self::AtMost(column, bound) => Condition::all().add(column.lte(*bound)),
            Self::AnyContains(search) => search.to_condition(),
        }
    }
}

/// The predicate set handed to the store: fixed columns, user-supplied values only.
///
/// All predicates are combined with AND. The same `SafeFilter` drives both
/// the count and the page fetch of a list request.
#[derive(Debug, Clone)]
pub struct SafeFilter<C> {
    predicates: Vec<Predicate<C>>,
}

impl<C: ColumnTrait> SafeFilter<C> {
    #[must_use]
    pub fn assemble(spec: &FilterSpec, columns: &FilterColumns<C>) -> Self {
        let mut predicates = Vec::new();

        if let (Some(column), Some(kind)) = (columns.kind, spec.kind) {
            predicates.push(Predicate::Equals(column, kind.into()));
        }
        if let (Some(column), Some(category)) = (columns.category, &spec.category) {
            predicates.push(Predicate::Equals(column, category.clone().into()));
        }
        if let (Some(column), Some(in_stock)) = (columns.in_stock, spec.in_stock) {
            predicates.push(Predicate::Equals(column, in_stock.into()));
        }
        if let (Some(column), Some(required)) = (columns.prescription, spec.prescription.required()) {
            predicates.push(Predicate::Equals(column, required.into()));
        }
        if let Some(search) = make_text_search_or(spec.text_query.as_deref(), &columns.search) {
            predicates.push(Predicate::AnyContains(search));
        }
        if let (Some(column), Some(range)) = (columns.price, spec.price) {
            if let Some(gte) = range.gte {
                predicates.push(Predicate::AtLeast(column, gte));
            }
            if let Some(lte) = range.lte {
                predicates.push(Predicate::AtMost(column, lte));
            }
        }
        if let (Some(column), Some(status)) = (columns.status, spec.status) {
            predicates.push(Predicate::Equals(column, status.into()));
        }

        Self { predicates }
    }

    /// Parse and assemble in one step
    #[must_use]
    pub fn from_query(query: &ListQuery, columns: &FilterColumns<C>) -> Self {
        Self::assemble(&FilterSpec::from_query(query, columns), columns)
    }

    #[must_use]
    pub fn predicates(&self) -> &[Predicate<C>] {
        &self.predicates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Lower to a sea-orm condition
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        self.predicates
            .iter()
            .fold(Condition::all(), |all, predicate| all.add(predicate.to_condition()))
    }
}
