pub mod classify;
pub mod fields;
pub mod group;
pub mod layout;
pub mod patterns;
pub mod route;

pub use classify::{classify, classify_batch};
pub use group::{group_and_sort, GroupedStore, ProductInput};
pub use layout::{
    layout_flower, layout_prepacks, layout_prerolls, layout_products, FlowerLayout, LayoutTree,
    LineHeight, PrepackLayout, ProductLayout, Section,
};
pub use route::{
    route_flower_tiers, route_prerolls, FlowerTier, FlowerTiers, PrerollCategory, PrerollMenu,
};
