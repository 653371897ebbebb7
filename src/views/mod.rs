pub mod selector_view;

pub use selector_view::DomSelectorView;
