//! Read-side projections of the catalog: grouping by type and type filters.
//!
//! These functions are pure. They never drop a product: anything whose type
//! cannot be resolved lands in the [`OTHER_GROUP`] bucket.

use serde::Serialize;

use super::model::{ProductDetail, ProductType};

/// Filter label that matches every product.
pub const ALL_TYPES: &str = "All";

/// Group name used for products whose type cannot be resolved.
pub const OTHER_GROUP: &str = "Other";

/// Anything that can report the name of its product type.
pub trait Categorized {
    fn type_name(&self) -> Option<&str>;
}

impl Categorized for ProductDetail {
    fn type_name(&self) -> Option<&str> {
        Self::type_name(self)
    }
}

impl<T: Categorized> Categorized for &T {
    fn type_name(&self) -> Option<&str> {
        (**self).type_name()
    }
}

/// Products sharing one type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeGroup<T> {
    #[serde(rename = "type")]
    pub type_name: String,
    pub products: Vec<T>,
}

/// Products partitioned by type name.
///
/// Groups keep the order in which their type was first seen in the input,
/// and products keep their input order inside a group. Serializes as a list
/// of `{ "type", "products" }` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupedCatalog<T> {
    groups: Vec<TypeGroup<T>>,
}

impl<T> GroupedCatalog<T> {
    /// Products in the named group.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&[T]> {
        self.groups
            .iter()
            .find(|g| g.type_name == type_name)
            .map(|g| g.products.as_slice())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.type_name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeGroup<T>> {
        self.groups.iter()
    }

    /// Total number of products across all groups.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.groups.iter().map(|g| g.products.len()).sum()
    }
}

impl<T> IntoIterator for GroupedCatalog<T> {
    type Item = TypeGroup<T>;
    type IntoIter = std::vec::IntoIter<TypeGroup<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition products by their type name.
///
/// Every input product appears in exactly one group; unresolved types go to
/// [`OTHER_GROUP`].
pub fn group_by_type<T, I>(products: I) -> GroupedCatalog<T>
where
    T: Categorized,
    I: IntoIterator<Item = T>,
{
    let mut groups: Vec<TypeGroup<T>> = Vec::new();
    for product in products {
        let name = product.type_name().unwrap_or(OTHER_GROUP).to_owned();
        match groups.iter_mut().find(|g| g.type_name == name) {
            Some(group) => group.products.push(product),
            None => groups.push(TypeGroup {
                type_name: name,
                products: vec![product],
            }),
        }
    }
    GroupedCatalog { groups }
}

/// The active type filter on a catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Named(String),
}

impl TypeFilter {
    /// Whether a group with this name passes the filter.
    #[must_use]
    pub fn matches(&self, type_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == type_name,
        }
    }

    /// The label this filter shows as.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_TYPES,
            Self::Named(name) => name,
        }
    }
}

impl From<&str> for TypeFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_TYPES {
            Self::All
        } else {
            Self::Named(value.to_owned())
        }
    }
}

impl From<Option<&str>> for TypeFilter {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::All, Self::from)
    }
}

/// Narrow a grouping to the active type.
///
/// `All` returns the grouping unchanged; a name keeps only the group with
/// exactly that name, if there is one.
#[must_use]
pub fn filter_by_type<T>(mut grouped: GroupedCatalog<T>, filter: &TypeFilter) -> GroupedCatalog<T> {
    grouped.groups.retain(|g| filter.matches(&g.type_name));
    grouped
}

/// Products of exactly the named type (case-sensitive), in input order.
pub fn by_type_name<T, I>(products: I, type_name: &str) -> Vec<T>
where
    T: Categorized,
    I: IntoIterator<Item = T>,
{
    products
        .into_iter()
        .filter(|p| p.type_name() == Some(type_name))
        .collect()
}

/// Filter labels for a catalog page: `All` followed by each type name.
#[must_use]
pub fn filter_options(types: &[ProductType]) -> Vec<String> {
    std::iter::once(ALL_TYPES.to_owned())
        .chain(types.iter().map(|t| t.name.clone()))
        .collect()
}

/// A browse page: the active filter, the available filters, and the
/// matching products grouped by type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView<T> {
    pub active_type: String,
    pub filters: Vec<String>,
    pub groups: GroupedCatalog<T>,
}

impl<T: Categorized> CatalogView<T> {
    /// Build a browse page.
    ///
    /// `types` is `None` when the type list could not be loaded; the page
    /// then offers only the `All` filter.
    pub fn build<I>(products: I, types: Option<&[ProductType]>, active: &TypeFilter) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            active_type: active.label().to_owned(),
            filters: filter_options(types.unwrap_or_default()),
            groups: filter_by_type(group_by_type(products), active),
        }
    }
}
